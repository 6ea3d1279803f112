// Neural network layers built on top of the automatic differentiation engine.

pub mod activations;
pub mod config;
pub mod initializers;
pub mod layers;
pub mod module;
pub mod optim;
pub mod parameter;
mod tests;

pub use activations::{ActivationClosure, ActivationFn};
pub use config::LayerConfig;
pub use initializers::Initializer;
pub use layers::{
    ELU, LeakyReLU, PReLU, ParametricSoftplus, Quorum, Sequential, ThresholdedLinear,
    ThresholdedReLU, uniform_weights,
};
pub use module::Module;
pub use optim::{Optimizer, SGD};
pub use parameter::Parameter;
