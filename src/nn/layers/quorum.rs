// src/nn/layers/quorum.rs
// Learned mixture of activation functions.

use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use crate::nn::Module;
use crate::nn::activations::ActivationFn;
use crate::nn::config::LayerConfig;
use crate::nn::module::{assign_weights, check_input, needs_build};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use log::{debug, trace};
use rand::RngCore;

/// Initial mixing weights giving every one of `k` functions the same share.
pub fn uniform_weights(k: usize) -> Vec<f64> {
    vec![1.0 / k as f64; k]
}

/// Weighted sum of activation functions: `Y = w_1 * f_1(X) + ... + w_k * f_k(X)`.
///
/// Every function gets a per-feature weight tensor allocated at build time and filled with its
/// initial scalar. With a threshold `T` each weight is clipped to `[0, T]` for the product only;
/// the stored weights are never modified by the clip.
///
/// ```rust
/// use quorum::nn::{ActivationFn, Module, Quorum};
/// use quorum::Engine;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut quorum = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap();
/// quorum.build(&[3], &mut StdRng::seed_from_u64(0)).unwrap();
///
/// let mut graph = Engine::new();
/// let x = graph.tensor_from_vec(vec![-2.0, 0.0, 3.0], &[1, 3], false).unwrap();
/// let y = quorum.forward(&mut graph, x).unwrap();
/// assert_eq!(graph.get_data(y).unwrap().to_vec(), vec![-1.0, 0.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Quorum {
    activation_fns: Vec<ActivationFn>,
    activation_weights_init: Vec<f64>,
    trainable: bool,
    threshold: Option<f64>,
    activation_weights: Vec<Parameter>,
    features: Option<Vec<usize>>,
    training: bool,
}

impl Quorum {
    /// Creates a Quorum layer.
    ///
    /// # Arguments
    ///
    /// * `activation_fns` - Functions to mix, at least one
    /// * `activation_weights_init` - One initial weight per function, `1/K` each when `None`
    /// * `trainable` - Whether the mixing weights are handed to optimizers
    /// * `threshold` - Upper clipping bound for the weights during forward, must be positive
    pub fn new(
        activation_fns: Vec<ActivationFn>,
        activation_weights_init: Option<Vec<f64>>,
        trainable: bool,
        threshold: Option<f64>,
    ) -> Result<Self> {
        if activation_fns.is_empty() {
            return Err(QuorumError::config(
                "Quorum needs at least one activation function",
            ));
        }

        let activation_weights_init =
            activation_weights_init.unwrap_or_else(|| uniform_weights(activation_fns.len()));
        if activation_weights_init.len() != activation_fns.len() {
            return Err(QuorumError::config(format!(
                "Quorum got {} activation functions but {} initial weights",
                activation_fns.len(),
                activation_weights_init.len()
            )));
        }
        if let Some(w) = activation_weights_init.iter().find(|w| !w.is_finite()) {
            return Err(QuorumError::config(format!(
                "Quorum initial weights must be finite, got {}",
                w
            )));
        }

        if let Some(t) = threshold {
            if !t.is_finite() || t <= 0.0 {
                return Err(QuorumError::config(format!(
                    "Quorum threshold must be a positive number, got {}",
                    t
                )));
            }
        }

        Ok(Self {
            activation_fns,
            activation_weights_init,
            trainable,
            threshold,
            activation_weights: Vec::new(),
            features: None,
            training: true,
        })
    }

    /// Trainable Quorum with uniform weights and no threshold.
    pub fn uniform(activation_fns: Vec<ActivationFn>) -> Result<Self> {
        Self::new(activation_fns, None, true, None)
    }

    pub fn activation_fns(&self) -> &[ActivationFn] {
        &self.activation_fns
    }

    pub fn activation_weights_init(&self) -> &[f64] {
        &self.activation_weights_init
    }

    pub fn is_trainable(&self) -> bool {
        self.trainable
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Stored mixing weights, one per function. Empty until built.
    pub fn activation_weights(&self) -> &[Parameter] {
        &self.activation_weights
    }

    /// Weights as they are applied in forward, after clipping.
    pub fn effective_weights(&self) -> Vec<Tensor> {
        self.activation_weights
            .iter()
            .map(|w| match self.threshold {
                Some(t) => w.data.clamp(0.0, t),
                None => w.data.clone(),
            })
            .collect()
    }
}

impl Module for Quorum {
    fn build(&mut self, features: &[usize], _rng: &mut dyn RngCore) -> Result<()> {
        if !needs_build(self.features.as_deref(), features, "Quorum")? {
            return Ok(());
        }

        self.activation_weights = self
            .activation_fns
            .iter()
            .zip(&self.activation_weights_init)
            .map(|(f, &w0)| {
                let data = Tensor::full(features, w0);
                let name = format!("weight_{}", f.name());
                if self.trainable {
                    Parameter::new_named(data, name)
                } else {
                    Parameter::fixed(data).with_name(name)
                }
            })
            .collect();
        self.features = Some(features.to_vec());

        debug!(
            "Built Quorum over {:?} for features {:?} (trainable: {}, {} parameters)",
            self.activation_fns,
            features,
            self.trainable,
            self.num_parameters()
        );
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.features.is_some()
    }

    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        let features = self
            .features
            .as_ref()
            .ok_or_else(|| QuorumError::NotBuilt("Quorum".to_string()))?;
        check_input(graph, input, features, "Quorum")?;
        trace!(
            "Quorum forward: {} functions, threshold {:?}",
            self.activation_fns.len(),
            self.threshold
        );

        let mut output: Option<NodeId> = None;
        for (f, weight) in self.activation_fns.iter().zip(&self.activation_weights) {
            let mut w = weight.node(graph);
            if let Some(t) = self.threshold {
                w = graph.clamp(w, 0.0, t)?;
            }
            let activated = f.apply(graph, input)?;
            let term = graph.mul(w, activated)?;

            output = Some(match output {
                Some(acc) => graph.add(acc, term)?,
                None => term,
            });
        }

        output.ok_or_else(|| QuorumError::config("Quorum has no activation functions"))
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.activation_weights
            .iter()
            .filter(|w| w.requires_grad)
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.activation_weights
            .iter_mut()
            .filter(|w| w.requires_grad)
            .collect()
    }

    fn weights(&self) -> Vec<&Tensor> {
        self.activation_weights.iter().map(|w| &w.data).collect()
    }

    fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        if !self.is_built() {
            return Err(QuorumError::NotBuilt("Quorum".to_string()));
        }
        assign_weights(self.activation_weights.iter_mut().collect(), weights, "Quorum")
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Quorum {
            activation_fns: self
                .activation_fns
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            activation_weights_init: self.activation_weights_init.clone(),
            trainable: self.trainable,
            threshold: self.threshold,
        }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
