//! # Quorum
//!
//! Trainable activation layers on top of a small reverse-mode automatic differentiation
//! engine over `ndarray`.
//!
//! ## Features
//!
//! - Fixed-scalar activations: `LeakyReLU`, `ELU`, `ThresholdedLinear`, `ThresholdedReLU`
//! - Activations with learned per-feature parameters: `PReLU`, `ParametricSoftplus`
//! - `Quorum`, a learned weighted mixture of activation functions with optional weight clipping
//! - JSON layer configurations that recreate layers from their constructor arguments
//! - SGD with momentum for training the learned parameters
//!
//! ```rust
//! use quorum::nn::{ActivationFn, Module, Quorum};
//! use quorum::Engine;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut layer = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Tanh]).unwrap();
//! layer.build(&[2], &mut StdRng::seed_from_u64(0)).unwrap();
//!
//! let mut graph = Engine::new();
//! let x = graph.tensor_from_vec(vec![1.0, -1.0], &[1, 2], false).unwrap();
//! let y = layer.forward(&mut graph, x).unwrap();
//! assert_eq!(graph.get_shape(y), Some(vec![1, 2]));
//! ```

pub mod error;
pub mod graph;
pub mod nn;
pub mod ops;
pub mod tensor;

pub use error::{QuorumError, Result};
pub use graph::{Engine, NodeId};
pub use nn::Parameter;
pub use tensor::Tensor;
