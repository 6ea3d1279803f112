use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use crate::nn::config::LayerConfig;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use rand::RngCore;

/// The base trait for every layer in the crate.
///
/// A layer is constructed from plain arguments, then bound to the per-example feature shape of
/// its input with [`Module::build`] (this is where parameter tensors are allocated), and then
/// applied to batches of shape `[batch, *features]` through [`Module::forward`].
///
/// # Examples
///
/// ```rust
/// use quorum::nn::{LeakyReLU, Module};
/// use quorum::Engine;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut layer = LeakyReLU::default();
/// layer.build(&[3], &mut StdRng::seed_from_u64(0)).unwrap();
///
/// let mut graph = Engine::new();
/// let x = graph.tensor_from_vec(vec![-1.0, 0.0, 2.0], &[1, 3], false).unwrap();
/// let y = layer.forward(&mut graph, x).unwrap();
/// assert_eq!(graph.get_data(y).unwrap().to_vec(), vec![-0.3, 0.0, 2.0]);
/// ```
pub trait Module: std::fmt::Debug {
    /// Binds the layer to a feature shape (input shape without the batch axis).
    ///
    /// Layers without parameters accept any shape. Building again with the same shape does
    /// nothing; a different shape is a `ShapeMismatch`.
    fn build(&mut self, _features: &[usize], _rng: &mut dyn RngCore) -> Result<()> {
        Ok(())
    }

    fn is_built(&self) -> bool {
        true
    }

    /// Output feature shape for a given input feature shape.
    fn output_shape(&self, features: &[usize]) -> Vec<usize> {
        features.to_vec()
    }

    /// Performs the forward pass of the layer.
    ///
    /// # Arguments
    ///
    /// * `graph` - The computation graph engine
    /// * `input` - Node holding a `[batch, *features]` tensor
    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId>;

    /// Trainable parameters, in a stable order. Fixed weights are not included.
    fn parameters(&self) -> Vec<&Parameter> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        Vec::new()
    }

    /// Every weight tensor of the layer, trainable or not.
    fn weights(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// Replaces every weight tensor, in the order returned by [`Module::weights`].
    fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        if weights.is_empty() {
            Ok(())
        } else {
            Err(QuorumError::config(format!(
                "{} has no weights, got {}",
                self.config().name(),
                weights.len()
            )))
        }
    }

    /// Constructor arguments needed to recreate this layer.
    fn config(&self) -> LayerConfig;

    fn training(&self) -> bool {
        true
    }

    fn set_training(&mut self, training: bool);

    fn eval(&mut self) {
        self.set_training(false);
    }

    fn train(&mut self) {
        self.set_training(true);
    }

    /// Number of trainable scalars.
    fn num_parameters(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }
}

/// Checks a build request against the shape a layer is already bound to.
///
/// Returns `Ok(true)` when the layer still has to allocate its parameters.
pub(crate) fn needs_build(
    bound: Option<&[usize]>,
    features: &[usize],
    layer: &str,
) -> Result<bool> {
    match bound {
        None => Ok(true),
        Some(shape) if shape == features => Ok(false),
        Some(shape) => Err(QuorumError::shape(shape, features, &format!("{} build", layer))),
    }
}

/// Fails unless the input node is a `[batch, *features]` tensor.
pub(crate) fn check_input(
    graph: &Engine,
    input: NodeId,
    features: &[usize],
    layer: &str,
) -> Result<()> {
    let shape = graph
        .get_shape(input)
        .ok_or(QuorumError::NodeNotFound(input))?;
    if shape.len() != features.len() + 1 || &shape[1..] != features {
        let mut expected = vec![shape.first().copied().unwrap_or(1)];
        expected.extend_from_slice(features);
        return Err(QuorumError::shape(
            &expected,
            &shape,
            &format!("{} forward", layer),
        ));
    }
    Ok(())
}

/// Validates a full set of replacement weights and writes them into `params`.
///
/// Nothing is written unless every tensor has the right shape.
pub(crate) fn assign_weights(
    params: Vec<&mut Parameter>,
    weights: Vec<Tensor>,
    layer: &str,
) -> Result<()> {
    if params.len() != weights.len() {
        return Err(QuorumError::config(format!(
            "{} expects {} weight tensors, got {}",
            layer,
            params.len(),
            weights.len()
        )));
    }
    for (param, weight) in params.iter().zip(&weights) {
        if param.shape() != weight.shape() {
            return Err(QuorumError::shape(
                param.shape(),
                weight.shape(),
                &format!("{} set_weights", layer),
            ));
        }
    }
    for (param, weight) in params.into_iter().zip(weights) {
        param.data = weight;
    }
    Ok(())
}
