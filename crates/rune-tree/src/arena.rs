//! Index-addressed storage for resolved node trees.
//!
//! Every resolution pass allocates its nodes into one [`NodeArena`]. Trees are
//! linked through `parent`/`first_child`/`next_sibling` indices, so moving a
//! subtree from one tree to another is a matter of rewiring a few indices.
//! Several roots (e.g. a "from" tree and a "to" tree) can share one arena.

use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use crate::error::TreeError;
use crate::node::{NodeIdx, ResolvedNode};

#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<ResolvedNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store a node; any links it carries are cleared.
    pub fn alloc(&mut self, mut node: ResolvedNode) -> NodeIdx {
        node.parent = None;
        node.first_child = None;
        node.next_sibling = None;
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    pub fn get(&self, idx: NodeIdx) -> Option<&ResolvedNode> {
        self.nodes.get(idx.index())
    }

    pub fn get_mut(&mut self, idx: NodeIdx) -> Option<&mut ResolvedNode> {
        self.nodes.get_mut(idx.index())
    }

    fn check(&self, idx: NodeIdx) -> Result<(), TreeError> {
        if idx.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(idx))
        }
    }

    fn check_detached(&self, idx: NodeIdx) -> Result<(), TreeError> {
        self.check(idx)?;
        match self[idx].parent {
            Some(parent) => Err(TreeError::AlreadyAttached { child: idx, parent }),
            None => Ok(()),
        }
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeIdx, child: NodeIdx) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check_detached(child)?;
        self.link_last(parent, child);
        Ok(())
    }

    pub(crate) fn link_last(&mut self, parent: NodeIdx, child: NodeIdx) {
        self[child].parent = Some(parent);
        self[child].next_sibling = None;
        match self.last_child(parent) {
            Some(last) => self[last].next_sibling = Some(child),
            None => self[parent].first_child = Some(child),
        }
    }

    pub fn last_child(&self, parent: NodeIdx) -> Option<NodeIdx> {
        self.children(parent).last()
    }

    /// Iterate the children of `parent` in sibling order.
    pub fn children(&self, parent: NodeIdx) -> Children<'_> {
        Children {
            arena: self,
            next: self.get(parent).and_then(|node| node.first_child),
        }
    }

    /// Unlink `child` from `parent`'s chain, joining its neighbours.
    ///
    /// Returns `false` when `child` is not in the chain.
    pub fn detach_child(&mut self, parent: NodeIdx, child: NodeIdx) -> bool {
        let mut prev = None;
        let mut cursor = self.get(parent).and_then(|node| node.first_child);
        while let Some(current) = cursor {
            if current == child {
                let next = self[current].next_sibling.take();
                match prev {
                    Some(prev) => self[prev].next_sibling = next,
                    None => self[parent].first_child = next,
                }
                self[current].parent = None;
                return true;
            }
            prev = Some(current);
            cursor = self[current].next_sibling;
        }
        false
    }

    /// Link the detached `node` into `parent` immediately before `before`.
    pub fn insert_before(
        &mut self,
        parent: NodeIdx,
        node: NodeIdx,
        before: NodeIdx,
    ) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check_detached(node)?;
        self.check(before)?;
        if self[before].parent != Some(parent) {
            return Err(TreeError::NotAChild {
                child: before,
                parent,
            });
        }

        let prev = self.children(parent).take_while(|&c| c != before).last();
        self[node].parent = Some(parent);
        self[node].next_sibling = Some(before);
        match prev {
            Some(prev) => self[prev].next_sibling = Some(node),
            None => self[parent].first_child = Some(node),
        }
        Ok(())
    }

    /// Detach every child of `parent`, returning them in sibling order.
    pub fn take_children(&mut self, parent: NodeIdx) -> Vec<NodeIdx> {
        let taken: Vec<NodeIdx> = self.children(parent).collect();
        if let Some(node) = self.get_mut(parent) {
            node.first_child = None;
        }
        for &child in &taken {
            self[child].parent = None;
            self[child].next_sibling = None;
        }
        taken
    }

    /// Splice detached `nodes`, in order, onto the front of `parent`'s children.
    pub fn prepend_children(&mut self, parent: NodeIdx, nodes: &[NodeIdx]) -> Result<(), TreeError> {
        self.check(parent)?;
        for &node in nodes {
            self.check_detached(node)?;
        }
        let Some((&last, _)) = nodes.split_last() else {
            return Ok(());
        };

        let old_first = self[parent].first_child;
        for pair in nodes.windows(2) {
            self[pair[0]].next_sibling = Some(pair[1]);
        }
        for &node in nodes {
            self[node].parent = Some(parent);
        }
        self[last].next_sibling = old_first;
        self[parent].first_child = Some(nodes[0]);
        Ok(())
    }

    /// Depth-first search from `root` for a node whose resolved or stable id
    /// equals `id`.
    pub fn find(&self, root: NodeIdx, id: &str) -> Option<NodeIdx> {
        self.walk(root)
            .into_iter()
            .find(|&idx| self[idx].has_id(id))
    }

    /// Pre-order traversal, which is also paint order.
    pub fn walk(&self, root: NodeIdx) -> Vec<NodeIdx> {
        let mut order = Vec::new();
        if self.get(root).is_none() {
            return order;
        }
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let start = stack.len();
            stack.extend(self.children(idx));
            stack[start..].reverse();
        }
        order
    }

    /// A tree is well formed when the child chains reach every node exactly
    /// once and every child points back at its real parent.
    pub fn is_well_formed(&self, root: NodeIdx) -> bool {
        if self.get(root).is_none() {
            return false;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return false;
            }
            let mut cursor = self[idx].first_child;
            while let Some(child) = cursor {
                if self.get(child).is_none() || self[child].parent != Some(idx) {
                    return false;
                }
                if seen.contains(&child) {
                    return false;
                }
                stack.push(child);
                cursor = self[child].next_sibling;
                if stack.len() > self.nodes.len() {
                    return false;
                }
            }
        }
        true
    }

    /// Deep copy the subtree at `root` into fresh, detached nodes.
    pub fn clone_subtree(&mut self, root: NodeIdx) -> NodeIdx {
        let copy = self.alloc(self[root].clone());
        let children: Vec<NodeIdx> = self.children(root).collect();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.link_last(copy, child_copy);
        }
        copy
    }
}

impl Index<NodeIdx> for NodeArena {
    type Output = ResolvedNode;

    fn index(&self, idx: NodeIdx) -> &ResolvedNode {
        &self.nodes[idx.index()]
    }
}

impl IndexMut<NodeIdx> for NodeArena {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut ResolvedNode {
        &mut self.nodes[idx.index()]
    }
}

/// Iterator over a node's child chain.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    arena: &'a NodeArena,
    next: Option<NodeIdx>,
}

impl Iterator for Children<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = self.arena.get(current).and_then(|node| node.next_sibling);
        Some(current)
    }
}
