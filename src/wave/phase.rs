//! Phase integration
//!
//! The phase is kept as a fraction of one wavelength so that changing the
//! wavelength mid-animation never makes the curve jump.

use serde::Deserialize;

/// Speed values are divided by this before integration
pub const SPEED_SCALE: f64 = 100.0;
/// Motion is calibrated to look the same as a 60 fps fixed-step loop
pub const FPS_NORMALIZATION: f64 = 60.0;

/// How the phase advances between ticks
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseMode {
    /// Scaled by elapsed wall-clock time, independent of refresh rate
    #[default]
    Timed,
    /// Fixed increment per tick, tied to the refresh rate
    FixedStep,
}

#[derive(Clone, Debug, Default)]
pub struct PhaseIntegrator {
    normalized_phase: f64,
    last_tick: Option<f64>,
    mode: PhaseMode,
}

impl PhaseIntegrator {
    pub fn new(mode: PhaseMode) -> Self {
        Self {
            normalized_phase: 0.0,
            last_tick: None,
            mode,
        }
    }

    /// Start from a given normalized phase
    pub fn with_phase(mode: PhaseMode, normalized_phase: f64) -> Self {
        let mut integrator = Self::new(mode);
        if normalized_phase.is_finite() {
            integrator.normalized_phase = normalized_phase;
        }
        integrator
    }

    pub fn mode(&self) -> PhaseMode {
        self.mode
    }

    pub fn normalized_phase(&self) -> f64 {
        self.normalized_phase
    }

    /// Phase in curve units for the wavelength in effect this frame
    pub fn actual_phase(&self, wavelength: f64) -> f64 {
        let phase = self.normalized_phase * wavelength;
        if phase.is_finite() {
            phase
        } else {
            0.0
        }
    }

    /// Forget the previous timestamp so the next tick does not advance
    pub fn reset_clock(&mut self) {
        self.last_tick = None;
    }

    /// Advance by the time elapsed since the previous tick (`now` in seconds).
    /// Returns the new normalized phase.
    pub fn tick(&mut self, speed: f64, now: f64) -> f64 {
        if !now.is_finite() {
            return self.normalized_phase;
        }

        let Some(last) = self.last_tick.replace(now) else {
            return self.normalized_phase;
        };

        let increment = match self.mode {
            PhaseMode::Timed => {
                let dt = (now - last).max(0.0);
                (speed / SPEED_SCALE) * dt * FPS_NORMALIZATION
            }
            PhaseMode::FixedStep => speed / SPEED_SCALE,
        };

        if increment.is_finite() {
            self.normalized_phase += increment;
        }
        self.normalized_phase
    }
}
