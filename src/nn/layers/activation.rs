// src/nn/layers/activation.rs
// Activation layers driven by a fixed scalar hyper-parameter.
// None of them own weights, so they accept inputs of any shape and building is a no-op.

use crate::error::Result;
use crate::graph::{Engine, NodeId};
use crate::nn::Module;
use crate::nn::config::LayerConfig;
use crate::nn::layers::finite;

/// Leaky rectifier: f(x) = x for x >= 0, alpha * x otherwise
#[derive(Debug, Clone)]
pub struct LeakyReLU {
    alpha: f64,
    training: bool,
}

impl LeakyReLU {
    pub fn new(alpha: f64) -> Result<Self> {
        Ok(Self {
            alpha: finite(alpha, "LeakyReLU alpha")?,
            training: true,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for LeakyReLU {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            training: true,
        }
    }
}

impl Module for LeakyReLU {
    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        graph.leaky_relu(input, self.alpha)
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::LeakyReLU { alpha: self.alpha }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

/// Exponential linear unit: f(x) = relu(x) + alpha * (exp(min(x, 0)) - 1)
///
/// The negative part is computed as `(x - |x|) / 2`, which equals `min(x, 0)` and keeps the
/// whole expression differentiable through the graph.
#[derive(Debug, Clone)]
pub struct ELU {
    alpha: f64,
    training: bool,
}

impl ELU {
    pub fn new(alpha: f64) -> Result<Self> {
        Ok(Self {
            alpha: finite(alpha, "ELU alpha")?,
            training: true,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Default for ELU {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            training: true,
        }
    }
}

impl Module for ELU {
    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        let pos = graph.relu(input)?;

        let magnitude = graph.abs(input)?;
        let doubled_neg = graph.sub(input, magnitude)?;
        let neg = graph.mul_scalar(doubled_neg, 0.5)?;

        let exp_neg = graph.exp(neg)?;
        let shifted = graph.add_scalar(exp_neg, -1.0)?;
        let scaled = graph.mul_scalar(shifted, self.alpha)?;
        graph.add(pos, scaled)
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::ELU { alpha: self.alpha }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

/// f(x) = 0 where |x| < theta, x elsewhere
#[derive(Debug, Clone)]
pub struct ThresholdedLinear {
    theta: f64,
    training: bool,
}

impl ThresholdedLinear {
    pub fn new(theta: f64) -> Result<Self> {
        Ok(Self {
            theta: finite(theta, "ThresholdedLinear theta")?,
            training: true,
        })
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }
}

impl Default for ThresholdedLinear {
    fn default() -> Self {
        Self {
            theta: 1.0,
            training: true,
        }
    }
}

impl Module for ThresholdedLinear {
    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        graph.thresholded_linear(input, self.theta)
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::ThresholdedLinear { theta: self.theta }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

/// f(x) = x where x > theta, 0 elsewhere
#[derive(Debug, Clone)]
pub struct ThresholdedReLU {
    theta: f64,
    training: bool,
}

impl ThresholdedReLU {
    pub fn new(theta: f64) -> Result<Self> {
        Ok(Self {
            theta: finite(theta, "ThresholdedReLU theta")?,
            training: true,
        })
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }
}

impl Default for ThresholdedReLU {
    fn default() -> Self {
        Self {
            theta: 1.0,
            training: true,
        }
    }
}

impl Module for ThresholdedReLU {
    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        graph.thresholded_relu(input, self.theta)
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::ThresholdedReLU { theta: self.theta }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
