//! Analytic damped spring used as the default variant transition timing.
//!
//! The spring has unit mass and starts displaced by one unit from its rest
//! position with zero velocity. Progress is `1 - displacement`, so it begins
//! at 0, overshoots when under-damped and settles at 1.

use rune_config::SpringPreset;
use serde::{Deserialize, Serialize};

/// Displacement below which the spring counts as settled.
const SETTLE_THRESHOLD: f32 = 0.001;
/// Upper bound on settle time so degenerate parameters still finish.
const MAX_SETTLE_MS: f32 = 10_000.0;
/// An undamped spring never settles.
const MIN_DAMPING_RATIO: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringSpec {
    /// 1.0 is critically damped; below 1.0 overshoots.
    pub damping_ratio: f32,
    /// Stiffness per unit mass, `omega^2`.
    pub stiffness: f32,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: 0.75,
            stiffness: 100.0,
        }
    }
}

impl SpringSpec {
    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio: damping_ratio.max(MIN_DAMPING_RATIO),
            stiffness: stiffness.max(f32::EPSILON),
        }
    }

    /// Spring given by mass, stiffness and damping coefficient.
    pub fn from_physical(mass: f32, stiffness: f32, damping: f32) -> Self {
        let mass = mass.max(f32::EPSILON);
        let stiffness = stiffness.max(f32::EPSILON);
        Self::new(damping / (2.0 * (stiffness * mass).sqrt()), stiffness / mass)
    }

    pub fn gentle() -> Self {
        Self::from_physical(1.0, 100.0, 15.0)
    }

    pub fn quick() -> Self {
        Self::from_physical(1.0, 300.0, 20.0)
    }

    pub fn bouncy() -> Self {
        Self::from_physical(1.0, 600.0, 15.0)
    }

    pub fn slow() -> Self {
        Self::from_physical(1.0, 80.0, 20.0)
    }

    fn zeta(&self) -> f32 {
        self.damping_ratio.max(MIN_DAMPING_RATIO)
    }

    fn omega(&self) -> f32 {
        self.stiffness.max(f32::EPSILON).sqrt()
    }

    /// Signed displacement from rest at `elapsed_ms`.
    fn displacement(&self, elapsed_ms: f32) -> f32 {
        let t = (elapsed_ms / 1000.0).max(0.0);
        let omega = self.omega();
        let zeta = self.zeta();
        let x0 = -1.0_f32;

        if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let decay = (-zeta * omega * t).exp();
            let b = zeta * omega * x0 / omega_d;
            let (sin, cos) = (omega_d * t).sin_cos();
            decay * (x0 * cos + b * sin)
        } else if zeta == 1.0 {
            (-omega * t).exp() * (x0 + omega * x0 * t)
        } else {
            let (r1, r2, c1, c2) = self.overdamped_terms(omega, zeta);
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        }
    }

    /// Roots and coefficients of `c1 e^(r1 t) + c2 e^(r2 t)`; `r1` decays slower.
    fn overdamped_terms(&self, omega: f32, zeta: f32) -> (f32, f32, f32, f32) {
        let x0 = -1.0_f32;
        let root = (zeta * zeta - 1.0).sqrt();
        let r1 = -omega * (zeta - root);
        let r2 = -omega * (zeta + root);
        let c2 = (r1 * x0) / (r1 - r2);
        (r1, r2, x0 - c2, c2)
    }

    /// Progress towards the target at `elapsed_ms`, not clamped.
    pub fn value_at(&self, elapsed_ms: f32) -> f32 {
        if self.is_settled(elapsed_ms) {
            return 1.0;
        }
        1.0 + self.displacement(elapsed_ms)
    }

    pub fn is_settled(&self, elapsed_ms: f32) -> bool {
        elapsed_ms >= self.settle_time_ms()
    }

    /// Time after which the displacement envelope `A e^(-rate t)` stays
    /// under the threshold.
    pub fn settle_time_ms(&self) -> f32 {
        let omega = self.omega();
        let zeta = self.zeta();
        let (amplitude, rate) = if zeta < 1.0 {
            (1.0 / (1.0 - zeta * zeta).sqrt(), zeta * omega)
        } else if zeta == 1.0 {
            // (1 + wt) e^(-wt) <= 2 e^(-wt/2)
            (2.0, omega * 0.5)
        } else {
            let (r1, _, c1, c2) = self.overdamped_terms(omega, zeta);
            (c1.abs() + c2.abs(), -r1)
        };
        let seconds = (amplitude / SETTLE_THRESHOLD).ln() / rate;
        (seconds * 1000.0).clamp(0.0, MAX_SETTLE_MS)
    }
}

impl From<SpringPreset> for SpringSpec {
    fn from(preset: SpringPreset) -> Self {
        match preset {
            SpringPreset::Gentle => Self::gentle(),
            SpringPreset::Quick => Self::quick(),
            SpringPreset::Bouncy => Self::bouncy(),
            SpringPreset::Slow => Self::slow(),
        }
    }
}
