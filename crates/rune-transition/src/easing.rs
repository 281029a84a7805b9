//! Easing curves for tweened variant transitions.
//!
//! `Ease` is the CSS default curve. The other named curves are the design
//! tool's presets, including the Back curves that overshoot on one or both
//! ends. `CubicBezier` accepts any control points with x values clamped into
//! `[0, 1]`.
//!
//! ```
//! use rune_transition::easing::EasingFunction;
//!
//! let ease = EasingFunction::EaseOut;
//! assert_eq!(ease.evaluate(0.0), 0.0);
//! assert_eq!(ease.evaluate(1.0), 1.0);
//! assert!(ease.evaluate(0.5) > 0.5);
//! ```

use rune_config::{EasingConfig, EasingName};
use serde::{Deserialize, Serialize};

/// Maps linear time progress (0.0 to 1.0) onto eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    #[default]
    Ease,
    /// `cubic-bezier(0.12, 0, 0.39, 0)`
    EaseIn,
    /// `cubic-bezier(0.61, 1, 0.88, 1)`
    EaseOut,
    /// `cubic-bezier(0.37, 0, 0.63, 1)`
    EaseInOut,
    /// `cubic-bezier(0.36, 0, 0.66, -0.56)`
    EaseInBack,
    /// `cubic-bezier(0.34, 1.56, 0.64, 1)`
    EaseOutBack,
    /// `cubic-bezier(0.68, -0.6, 0.32, 1.6)`
    EaseInOutBack,
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl EasingFunction {
    /// Custom curve; x control values are clamped into `[0, 1]`.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::CubicBezier {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Evaluate at linear progress `t`. Exact at 0 and 1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::Ease => bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => bezier(0.12, 0.0, 0.39, 0.0, t),
            Self::EaseOut => bezier(0.61, 1.0, 0.88, 1.0, t),
            Self::EaseInOut => bezier(0.37, 0.0, 0.63, 1.0, t),
            Self::EaseInBack => bezier(0.36, 0.0, 0.66, -0.56, t),
            Self::EaseOutBack => bezier(0.34, 1.56, 0.64, 1.0, t),
            Self::EaseInOutBack => bezier(0.68, -0.6, 0.32, 1.6, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier(x1, y1, x2, y2, t),
        }
    }
}

impl From<&EasingConfig> for EasingFunction {
    fn from(config: &EasingConfig) -> Self {
        match config {
            EasingConfig::Named(EasingName::Linear) => Self::Linear,
            EasingConfig::Named(EasingName::Ease) => Self::Ease,
            EasingConfig::Named(EasingName::EaseIn) => Self::EaseIn,
            EasingConfig::Named(EasingName::EaseOut) => Self::EaseOut,
            EasingConfig::Named(EasingName::EaseInOut) => Self::EaseInOut,
            EasingConfig::Named(EasingName::EaseInBack) => Self::EaseInBack,
            EasingConfig::Named(EasingName::EaseOutBack) => Self::EaseOutBack,
            EasingConfig::Named(EasingName::EaseInOutBack) => Self::EaseInOutBack,
            EasingConfig::Bezier { bezier: [x1, y1, x2, y2] } => {
                Self::cubic_bezier(*x1, *y1, *x2, *y2)
            }
        }
    }
}

fn bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }
    let t = solve_curve_x(x1, x2, progress);
    sample(y1, y2, t)
}

/// One coordinate of the curve with endpoints fixed at 0 and 1.
#[inline]
fn sample(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn sample_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Newton-Raphson first, bisection when the slope is too flat.
fn solve_curve_x(x1: f32, x2: f32, target: f32) -> f32 {
    let mut t = target;
    for _ in 0..8 {
        let error = sample(x1, x2, t) - target;
        if error.abs() < 1e-6 {
            return t;
        }
        let slope = sample_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    t = target;
    for _ in 0..32 {
        let x = sample(x1, x2, t);
        if (x - target).abs() < 1e-6 {
            break;
        }
        if x < target {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) * 0.5;
    }
    t
}
