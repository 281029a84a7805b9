//! Lifecycle events for variant transitions.
//!
//! The tracker records an event whenever a transition starts, replaces a
//! running one, finishes, or is dropped because the merge found nothing to
//! animate. Hosts poll the queue after each render pass or tick.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::AnimationId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    Started {
        id: AnimationId,
        component_id: String,
        from_variant: String,
        to_variant: String,
    },
    /// A running transition was replaced by `by`.
    Interrupted {
        id: AnimationId,
        by: AnimationId,
        component_id: String,
    },
    Ended {
        id: AnimationId,
        component_id: String,
    },
    /// The merge produced no animation; the target was shown immediately.
    Failed {
        id: AnimationId,
        component_id: String,
    },
}

impl TransitionEvent {
    pub fn id(&self) -> AnimationId {
        match self {
            Self::Started { id, .. }
            | Self::Interrupted { id, .. }
            | Self::Ended { id, .. }
            | Self::Failed { id, .. } => *id,
        }
    }

    pub fn component_id(&self) -> &str {
        match self {
            Self::Started { component_id, .. }
            | Self::Interrupted { component_id, .. }
            | Self::Ended { component_id, .. }
            | Self::Failed { component_id, .. } => component_id,
        }
    }

    /// True for events after which the transition no longer runs.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<TransitionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<TransitionEvent> {
        self.events.pop_front()
    }

    pub fn peek(&self) -> Option<&TransitionEvent> {
        self.events.front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ended(id: u64) -> TransitionEvent {
        TransitionEvent::Ended {
            id: AnimationId(id),
            component_id: format!("c{id}"),
        }
    }

    #[test]
    fn test_accessors() {
        let started = TransitionEvent::Started {
            id: AnimationId(3),
            component_id: "toggle".into(),
            from_variant: "Off".into(),
            to_variant: "On".into(),
        };
        assert_eq!(started.id(), AnimationId(3));
        assert_eq!(started.component_id(), "toggle");
        assert!(!started.is_terminal());

        let interrupted = TransitionEvent::Interrupted {
            id: AnimationId(3),
            by: AnimationId(4),
            component_id: "toggle".into(),
        };
        assert!(interrupted.is_terminal());
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());
        queue.push(ended(1));
        queue.push(ended(2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().map(TransitionEvent::id), Some(AnimationId(1)));

        let drained: Vec<_> = queue.drain().map(|e| e.id()).collect();
        assert_eq!(drained, vec![AnimationId(1), AnimationId(2)]);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_serialization_tag() {
        #[derive(Serialize)]
        struct Wrapper {
            event: TransitionEvent,
        }
        let text = toml::to_string(&Wrapper { event: ended(7) }).unwrap();
        assert!(text.contains("type = \"ended\""));
        assert!(text.contains("component_id = \"c7\""));
    }
}
