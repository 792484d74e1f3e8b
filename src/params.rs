use crate::FluidError;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    pub gravity: f32,
    pub density: f32,
    /// In `(0, 2)`.
    pub over_relaxation: f32,
    pub cell_size: f32,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            density: 1.0,
            over_relaxation: 1.9,
            cell_size: 1.0,
        }
    }
}

impl FluidParams {
    pub fn validate(&self) -> Result<(), FluidError> {
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", self.gravity));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(invalid("density", self.density));
        }
        if !(self.over_relaxation > 0.0 && self.over_relaxation < 2.0) {
            return Err(invalid("over_relaxation", self.over_relaxation));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(invalid("cell_size", self.cell_size));
        }
        Ok(())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_over_relaxation(env_over_relaxation())
    }

    fn with_over_relaxation(mut self, omega: Option<f32>) -> Self {
        if let Some(omega) = omega {
            self.over_relaxation = omega;
        }
        self
    }
}

fn invalid(name: &'static str, value: f32) -> FluidError {
    FluidError::InvalidParameter { name, value }
}

fn env_over_relaxation() -> Option<f32> {
    static OMEGA: OnceLock<Option<f32>> = OnceLock::new();
    *OMEGA.get_or_init(|| {
        let omega = parse_over_relaxation(std::env::var("SIM_OVER_RELAXATION").ok().as_deref());
        if let Some(omega) = omega {
            log::debug!("over_relaxation overridden to {omega}");
        }
        omega
    })
}

fn parse_over_relaxation(value: Option<&str>) -> Option<f32> {
    value.and_then(|value| value.trim().parse::<f32>().ok())
}
