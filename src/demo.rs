//! Scripted settings screen driven through the transition pipeline.
//!
//! The screen holds a switch and a battery gauge. Each step of the script
//! requests new variants, renders once and then ticks at 60 Hz until the
//! transitions settle or the step's frame budget runs out.

use anyhow::Result;
use rune_config::RuneConfig;
use rune_transition::{RenderedFrame, Resolver, TransitionPipeline, VariantScope, VariantTracker};
use rune_tree::{
    Align, ArcShape, FlexDirection, FlexLayoutSolver, Justify, NodeArena, NodeBuilder, NodeIdx,
    Paint, Shape, StrokeCap, Viewport,
};
use tracing::{debug, info};

const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy)]
struct Step {
    label: &'static str,
    switch: &'static str,
    gauge: &'static str,
    /// Frames to run before the next step; a short budget interrupts.
    frames: u32,
}

const SCRIPT: &[Step] = &[
    Step {
        label: "initial",
        switch: "Off",
        gauge: "Low",
        frames: 0,
    },
    Step {
        label: "switch on",
        switch: "On",
        gauge: "Low",
        frames: 90,
    },
    Step {
        label: "charge",
        switch: "On",
        gauge: "Full",
        frames: 8,
    },
    Step {
        label: "discharge mid-flight",
        switch: "On",
        gauge: "Low",
        frames: 90,
    },
    Step {
        label: "switch off",
        switch: "Off",
        gauge: "Low",
        frames: 90,
    },
];

#[derive(Debug, Default)]
struct SettingsScreen {
    switch: &'static str,
    gauge: &'static str,
}

impl SettingsScreen {
    fn switch(&self, scope: &mut VariantScope<'_>) -> NodeBuilder {
        let variant = scope.select_variant("wifi-switch", self.switch);
        let id = format!("wifi-switch#{variant}");
        scope.selected_variant("wifi-switch", "Switch", &id);

        let (track, knob_left) = match variant.as_str() {
            "On" => ([0.2, 0.7, 0.3, 1.0], 26.0),
            _ => ([0.75, 0.75, 0.75, 1.0], 2.0),
        };
        NodeBuilder::round_rect(id, "Switch", 12.0)
            .unresolved_id("wifi-switch")
            .fill(Paint::solid(track))
            .size(48.0, 24.0)
            .child(
                NodeBuilder::round_rect("knob", "Knob", 10.0)
                    .fill(Paint::solid([1.0, 1.0, 1.0, 1.0]))
                    .size(20.0, 20.0)
                    .absolute(knob_left, 2.0),
            )
    }

    fn gauge(&self, scope: &mut VariantScope<'_>) -> NodeBuilder {
        let variant = scope.select_variant("battery", self.gauge);
        let id = format!("battery#{variant}");
        scope.selected_variant("battery", "Gauge", &id);

        let (sweep, label) = match variant.as_str() {
            "Full" => (270.0, "100%"),
            _ => (40.0, "15%"),
        };
        NodeBuilder::arc(
            id,
            "Gauge",
            ArcShape {
                start_angle_degrees: 135.0,
                sweep_angle_degrees: sweep,
                inner_radius: 0.8,
                corner_radius: 0.0,
                stroke_cap: StrokeCap::Round,
                is_mask: false,
            },
        )
        .unresolved_id("battery")
        .fill(Paint::solid([0.1, 0.6, 0.9, 1.0]))
        .size(96.0, 96.0)
        .align(Align::Center, Justify::Center)
        .child(NodeBuilder::text(
            format!("battery-label#{variant}"),
            "Label",
            label,
            14.0,
        ))
    }
}

impl Resolver for SettingsScreen {
    fn resolve(&mut self, arena: &mut NodeArena, scope: &mut VariantScope<'_>) -> Result<NodeIdx> {
        let row = NodeBuilder::rect("wifi-row", "Row")
            .direction(FlexDirection::Row)
            .gap(12.0)
            .align(Align::Center, Justify::SpaceBetween)
            .child(NodeBuilder::text("wifi-title", "Title", "Wi-Fi", 16.0))
            .child(self.switch(scope));
        Ok(NodeBuilder::rect("settings", "Screen")
            .direction(FlexDirection::Column)
            .padding(24.0)
            .gap(16.0)
            .child(row)
            .child(self.gauge(scope))
            .build(arena))
    }
}

/// Run the scripted scenario with `config`.
pub fn run(config: &RuneConfig) -> Result<()> {
    let viewport = Viewport::new(config.layout.width, config.layout.height);
    let mut pipeline = TransitionPipeline::new(VariantTracker::from_config(&config.transitions));
    let mut solver = FlexLayoutSolver::new();
    let mut screen = SettingsScreen::default();
    let mut now_ms = 0.0;

    for step in SCRIPT {
        screen.switch = step.switch;
        screen.gauge = step.gauge;
        let frame = pipeline.render(&mut screen, &mut solver, viewport)?;
        info!(
            step = step.label,
            transitions = frame.transitions,
            nodes = frame.arena.len(),
            "rendered"
        );
        log_state(frame, "after render");

        let mut ticks = 0;
        while ticks < step.frames && pipeline.tick(now_ms) {
            ticks += 1;
            now_ms += FRAME_MS;
            if let Some(frame) = pipeline.frame().filter(|_| ticks % 10 == 0) {
                log_state(frame, "tick");
            }
        }
        if let Some(frame) = pipeline.frame() {
            log_state(frame, "settled");
        }
        info!(step = step.label, ticks, animating = pipeline.is_animating(), "step done");

        for event in pipeline.drain_events() {
            info!(id = %event.id(), component = event.component_id(), ?event, "transition event");
        }
    }
    Ok(())
}

fn log_state(frame: &RenderedFrame, stage: &str) {
    let arena = &frame.arena;
    let knob = arena
        .find(frame.root, "wifi-switch")
        .and_then(|switch| arena.children(switch).last())
        .and_then(|knob| arena[knob].layout);
    let sweep = arena
        .find(frame.root, "battery")
        .and_then(|gauge| match arena[gauge].kind.shape() {
            Some(Shape::Arc(arc)) => Some(arc.sweep_angle_degrees),
            _ => None,
        });
    debug!(
        stage,
        knob_x = knob.map(|rect| rect.x),
        sweep,
        "frame state"
    );
}
