// Gradient-based optimizers for layer parameters.

use crate::error::Result;
use crate::graph::Engine;
use crate::nn::parameter::Parameter;

pub mod sgd;

pub use sgd::SGD;

/// Updates parameters from the gradients left on a graph by `Engine::backward`.
///
/// Parameters are passed in the order returned by `Module::parameters_mut`; optimizers with
/// per-parameter state rely on that order staying the same between steps.
pub trait Optimizer {
    /// Applies one update. Fixed parameters are skipped, as are parameters that did not take
    /// part in the last forward pass over `graph`.
    fn step(&mut self, params: Vec<&mut Parameter>, graph: &Engine) -> Result<()>;

    fn lr(&self) -> f64;

    fn set_lr(&mut self, lr: f64);

    /// Drops any per-parameter state (momentum buffers and the like).
    fn reset(&mut self) {}
}
