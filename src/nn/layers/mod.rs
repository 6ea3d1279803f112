// src/nn/layers/mod.rs
// Activation layers and the containers that hold them

use crate::error::{QuorumError, Result};

pub mod activation;
pub mod parametric;
pub mod quorum;
pub mod sequential;

pub use activation::{ELU, LeakyReLU, ThresholdedLinear, ThresholdedReLU};
pub use parametric::{PReLU, ParametricSoftplus};
pub use quorum::{Quorum, uniform_weights};
pub use sequential::Sequential;

pub(crate) fn finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QuorumError::config(format!(
            "{} must be finite, got {}",
            what, value
        )))
    }
}
