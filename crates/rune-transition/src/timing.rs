//! Transition timing and per-component timing selection.

use std::collections::BTreeMap;
use std::fmt;

use rune_config::{TimingConfig, TransitionsConfig};
use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::spring::SpringSpec;

/// How progress of a variant transition evolves over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionTiming {
    Tween {
        duration_ms: f32,
        delay_ms: f32,
        easing: EasingFunction,
    },
    Spring { spec: SpringSpec, delay_ms: f32 },
}

impl Default for TransitionTiming {
    /// Smart-animate spring.
    fn default() -> Self {
        Self::Spring {
            spec: SpringSpec::default(),
            delay_ms: 0.0,
        }
    }
}

impl TransitionTiming {
    pub fn tween(duration_ms: f32, easing: EasingFunction) -> Self {
        Self::Tween {
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    pub fn spring(damping_ratio: f32, stiffness: f32) -> Self {
        Self::Spring {
            spec: SpringSpec::new(damping_ratio, stiffness),
            delay_ms: 0.0,
        }
    }

    pub fn from_spring(spec: SpringSpec) -> Self {
        Self::Spring {
            spec,
            delay_ms: 0.0,
        }
    }

    /// Timing for a configured entry; `None` when transitions are disabled.
    pub fn from_config(config: &TimingConfig) -> Option<Self> {
        let timing = match *config {
            TimingConfig::Spring {
                damping_ratio,
                stiffness,
                delay_ms,
            } => Self::spring(damping_ratio, stiffness).with_delay(delay_ms),
            TimingConfig::CustomSpring {
                mass,
                stiffness,
                damping,
                delay_ms,
            } => Self::from_spring(SpringSpec::from_physical(mass, stiffness, damping))
                .with_delay(delay_ms),
            TimingConfig::SpringPreset { preset, delay_ms } => {
                Self::from_spring(preset.into()).with_delay(delay_ms)
            }
            TimingConfig::Tween {
                duration_ms,
                delay_ms,
                ref easing,
            } => Self::tween(duration_ms, easing.into()).with_delay(delay_ms),
            TimingConfig::Disabled => return None,
        };
        Some(timing)
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        match &mut self {
            Self::Tween { delay_ms, .. } | Self::Spring { delay_ms, .. } => {
                *delay_ms = delay.max(0.0)
            }
        }
        self
    }

    pub fn delay_ms(&self) -> f32 {
        match *self {
            Self::Tween { delay_ms, .. } | Self::Spring { delay_ms, .. } => delay_ms,
        }
    }

    /// Progress at `elapsed_ms` since the transition started; 0 during the
    /// delay, exactly 1 once finished.
    pub fn progress_at(&self, elapsed_ms: f32) -> f32 {
        let active = elapsed_ms - self.delay_ms();
        if active <= 0.0 {
            return 0.0;
        }
        match *self {
            Self::Tween {
                duration_ms,
                easing,
                ..
            } => {
                if duration_ms <= 0.0 || active >= duration_ms {
                    1.0
                } else {
                    easing.evaluate(active / duration_ms)
                }
            }
            Self::Spring { spec, .. } => spec.value_at(active),
        }
    }

    pub fn is_finished(&self, elapsed_ms: f32) -> bool {
        let active = elapsed_ms - self.delay_ms();
        match *self {
            Self::Tween { duration_ms, .. } => active >= duration_ms.max(0.0),
            Self::Spring { spec, .. } => active >= 0.0 && spec.is_settled(active),
        }
    }
}

/// What a component is transitioning between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionContext<'a> {
    pub component_id: &'a str,
    pub component_name: &'a str,
    pub from_variant: &'a str,
    pub to_variant: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingSelection {
    /// Use the tracker's default timing.
    UseDefault,
    Custom(TransitionTiming),
    /// Show the target variant without animating.
    Disabled,
}

/// Chooses the timing of each new variant transition.
pub trait TransitionSelector: fmt::Debug {
    fn select(&self, context: &TransitionContext<'_>) -> TimingSelection;
}

/// Selector backed by the `[transitions]` configuration table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredSelector {
    enabled: bool,
    fallback: TimingSelection,
    overrides: BTreeMap<String, TimingSelection>,
}

fn selection(timing: &TimingConfig) -> TimingSelection {
    TransitionTiming::from_config(timing)
        .map_or(TimingSelection::Disabled, TimingSelection::Custom)
}

impl ConfiguredSelector {
    /// Overrides are keyed by component name; other components use the
    /// configured default.
    pub fn from_config(config: &TransitionsConfig) -> Self {
        Self {
            enabled: config.enabled,
            fallback: selection(&config.default),
            overrides: config
                .overrides
                .iter()
                .map(|(name, timing)| (name.clone(), selection(timing)))
                .collect(),
        }
    }
}

impl TransitionSelector for ConfiguredSelector {
    fn select(&self, context: &TransitionContext<'_>) -> TimingSelection {
        if !self.enabled {
            return TimingSelection::Disabled;
        }
        self.overrides
            .get(context.component_name)
            .copied()
            .unwrap_or(self.fallback)
    }
}
