use anyhow::{Context, Result};
use rune_transition::{AnimatedProperty, merge_animation};
use rune_tree::{
    ArcShape, FlexDirection, FlexLayoutSolver, LayoutSolver, NodeArena, NodeBuilder, NodeIdx,
    Paint, StrokeCap, Viewport,
};

const VIEWPORT: Viewport = Viewport {
    width: 360.0,
    height: 640.0,
};

fn screen(component: NodeBuilder) -> NodeBuilder {
    NodeBuilder::rect("screen", "Screen")
        .direction(FlexDirection::Column)
        .padding(16.0)
        .gap(8.0)
        .child(NodeBuilder::text("title", "Title", "Settings", 20.0))
        .child(component)
}

/// Lay out both trees the way the pipeline does before merging.
fn laid_out(from: NodeBuilder, to: NodeBuilder) -> Result<(NodeArena, NodeIdx, NodeIdx)> {
    let mut arena = NodeArena::new();
    let mut solver = FlexLayoutSolver::new();
    let from_root = from.build(&mut arena);
    let to_root = to.build(&mut arena);
    solver.solve(&mut arena, from_root, VIEWPORT)?;
    solver.solve(&mut arena, to_root, VIEWPORT)?;
    Ok((arena, from_root, to_root))
}

fn ids(arena: &NodeArena, parent: NodeIdx) -> Vec<&str> {
    arena
        .children(parent)
        .map(|child| arena[child].id.as_str())
        .collect()
}

#[test]
fn button_press_crossfades_variants() -> Result<()> {
    let button = |variant: &str, color: &str| -> Result<NodeBuilder> {
        Ok(NodeBuilder::rect(format!("button#{variant}"), variant)
            .unresolved_id("button")
            .fill(Paint::from_hex(color).context("bad color")?)
            .size(120.0, 40.0)
            .child(NodeBuilder::text("label", "Label", "Continue", 14.0)))
    };
    let (mut arena, from, to) = laid_out(
        screen(button("Default", "#3366ff")?),
        screen(button("Pressed", "#1a3380")?),
    )?;
    let default_node = arena.find(from, "button#Default").context("default")?;
    let pressed_node = arena.find(to, "button#Pressed").context("pressed")?;

    let merged = merge_animation(&mut arena, from, "button#Default", to, "button#Pressed")
        .context("merge produced nothing")?;

    let kinds: Vec<(&str, NodeIdx)> = merged
        .properties
        .iter()
        .map(|property| {
            let kind = match property {
                AnimatedProperty::FadeIn { .. } => "fade_in",
                AnimatedProperty::FadeOut { .. } => "fade_out",
                AnimatedProperty::LayoutInterpolate { .. } => "layout",
                AnimatedProperty::ShapeInterpolate { .. } => "shape",
            };
            (kind, property.target())
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("fade_in", pressed_node),
            ("fade_out", default_node),
            ("layout", pressed_node),
            ("layout", default_node),
        ]
    );
    assert_eq!(
        ids(&arena, to),
        vec!["title", "button#Default", "button#Pressed"]
    );
    assert!(arena.is_well_formed(to));

    for property in &merged.properties {
        property.apply(&mut arena, 0.0);
    }
    assert_eq!(arena[pressed_node].style.opacity, 0.0);
    assert_eq!(arena[default_node].style.opacity, 1.0);
    for property in &merged.properties {
        property.apply(&mut arena, 1.0);
    }
    assert_eq!(arena[pressed_node].style.opacity, 1.0);
    assert_eq!(arena[default_node].style.opacity, 0.0);
    Ok(())
}

#[test]
fn icon_swap_fades_renamed_child() -> Result<()> {
    let toggle = |variant: &str, icon: NodeBuilder| {
        NodeBuilder::rect(format!("toggle#{variant}"), "Toggle")
            .unresolved_id("toggle")
            .fill(Paint::solid([0.9, 0.9, 0.9, 1.0]))
            .size(48.0, 48.0)
            .child(icon)
    };
    let (mut arena, from, to) = laid_out(
        screen(toggle(
            "Off",
            NodeBuilder::path("icon-moon", "Moon", "M4 4h16v16z").size(24.0, 24.0),
        )),
        screen(toggle(
            "On",
            NodeBuilder::path("icon-sun", "Sun", "M12 2v20").size(24.0, 24.0),
        )),
    )?;
    let moon = arena.find(from, "icon-moon").context("moon")?;
    let sun = arena.find(to, "icon-sun").context("sun")?;
    let toggle_on = arena.find(to, "toggle#On").context("toggle")?;

    let merged =
        merge_animation(&mut arena, from, "toggle", to, "toggle").context("merge failed")?;

    assert_eq!(
        merged.properties,
        vec![
            AnimatedProperty::FadeIn {
                target: sun,
                opacity: 1.0
            },
            AnimatedProperty::FadeOut {
                target: moon,
                opacity: 1.0
            },
        ]
    );
    assert_eq!(ids(&arena, toggle_on), vec!["icon-moon", "icon-sun"]);
    Ok(())
}

#[test]
fn arc_gauge_interpolates_sweep() -> Result<()> {
    let gauge = |variant: &str, sweep: f32, cap: StrokeCap| {
        NodeBuilder::arc(
            format!("gauge#{variant}"),
            "Gauge",
            ArcShape {
                start_angle_degrees: 135.0,
                sweep_angle_degrees: sweep,
                inner_radius: 0.75,
                corner_radius: 2.0,
                stroke_cap: cap,
                is_mask: false,
            },
        )
        .unresolved_id("gauge")
        .fill(Paint::solid([0.1, 0.7, 0.3, 1.0]))
        .size(120.0, 120.0)
    };
    let (mut arena, from, to) = laid_out(
        screen(gauge("Low", 30.0, StrokeCap::None)),
        screen(gauge("High", 270.0, StrokeCap::Round)),
    )?;
    let target = arena.find(to, "gauge").context("gauge")?;

    let merged = merge_animation(&mut arena, from, "gauge", to, "gauge").context("merge")?;

    // Same size and position: only the arc changes.
    assert_eq!(merged.properties.len(), 1);
    let property = &merged.properties[0];
    assert!(matches!(property, AnimatedProperty::ShapeInterpolate { .. }));

    property.apply(&mut arena, 0.5);
    let Some(rune_tree::Shape::Arc(arc)) = arena[target].kind.shape().cloned() else {
        panic!("gauge is no longer an arc");
    };
    assert_eq!(arc.sweep_angle_degrees, 150.0);
    assert_eq!(arc.stroke_cap, StrokeCap::Round);
    Ok(())
}

#[test]
fn identical_trees_merge_without_properties() -> Result<()> {
    let card = NodeBuilder::round_rect("card", "Card", 8.0)
        .fill(Paint::solid([1.0, 1.0, 1.0, 1.0]))
        .padding(12.0)
        .child(NodeBuilder::text("headline", "Headline", "Morning", 18.0))
        .child(NodeBuilder::vector_rect("divider", "Divider", 0.0).size(100.0, 1.0))
        .child(
            NodeBuilder::arc("ring", "Ring", ArcShape::default())
                .size(40.0, 40.0)
                .child(NodeBuilder::path("glyph", "Glyph", "M0 0L1 1")),
        );
    let (mut arena, from, to) = laid_out(screen(card.clone()), screen(card))?;
    let before = arena.walk(to).len();

    let merged = merge_animation(&mut arena, from, "screen", to, "screen").context("merge")?;

    assert!(merged.properties.is_empty(), "{:?}", merged.properties);
    assert_eq!(arena.walk(to).len(), before);
    assert!(arena.is_well_formed(to));
    Ok(())
}

#[test]
fn duplicate_names_match_in_sibling_order() -> Result<()> {
    let list = |rows: &[(&str, &str)]| {
        rows.iter().fold(
            NodeBuilder::rect("list", "List").direction(FlexDirection::Column),
            |list, (id, text)| {
                list.child(NodeBuilder::rect(*id, "Row").size(200.0, 30.0).child(
                    NodeBuilder::text(format!("{id}-text"), "Text", *text, 12.0),
                ))
            },
        )
    };
    let (mut arena, from, to) = laid_out(
        list(&[("a", "Alpha"), ("b", "Beta")]),
        list(&[("c", "Alpha")]),
    )?;
    let b = arena.find(from, "b").context("b")?;

    let merged = merge_animation(&mut arena, from, "list", to, "list").context("merge")?;

    // "a" pairs with "c" (identical text), "b" is left over and fades out.
    assert_eq!(
        merged.properties,
        vec![AnimatedProperty::FadeOut {
            target: b,
            opacity: 1.0
        }]
    );
    assert_eq!(ids(&arena, to), vec!["b", "c"]);
    Ok(())
}
