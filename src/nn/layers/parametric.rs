// src/nn/layers/parametric.rs
// Activation layers with learned per-feature parameters.
// Parameters have the feature shape of the input and are allocated at build time.

use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use crate::nn::Module;
use crate::nn::config::LayerConfig;
use crate::nn::initializers::Initializer;
use crate::nn::layers::finite;
use crate::nn::module::{assign_weights, check_input, needs_build};
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use log::debug;
use rand::RngCore;

/// Parametric rectifier: f(x) = relu(x) + alphas * (x - |x|) / 2
///
/// `alphas` is learned per feature and initialized by a named scheme ("zero" by default), so a
/// freshly built PReLU behaves exactly like a ReLU.
#[derive(Debug, Clone)]
pub struct PReLU {
    init: Initializer,
    initial_weights: Option<Vec<Tensor>>,
    alphas: Option<Parameter>,
    features: Option<Vec<usize>>,
    training: bool,
}

impl PReLU {
    pub fn new() -> Self {
        Self {
            init: Initializer::Zero,
            initial_weights: None,
            alphas: None,
            features: None,
            training: true,
        }
    }

    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = init;
        self
    }

    /// Values for `alphas` used instead of the init scheme. Checked against the feature shape
    /// when the layer is built.
    pub fn with_weights(mut self, weights: Vec<Tensor>) -> Self {
        self.initial_weights = Some(weights);
        self
    }

    pub fn init(&self) -> Initializer {
        self.init
    }

    pub fn alphas(&self) -> Option<&Parameter> {
        self.alphas.as_ref()
    }
}

impl Default for PReLU {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for PReLU {
    fn build(&mut self, features: &[usize], rng: &mut dyn RngCore) -> Result<()> {
        if !needs_build(self.features.as_deref(), features, "PReLU")? {
            return Ok(());
        }

        let mut alphas = Parameter::new_named(self.init.init(features, rng)?, "alphas");
        if let Some(weights) = &self.initial_weights {
            assign_weights(vec![&mut alphas], weights.clone(), "PReLU")?;
        }

        debug!(
            "Built PReLU for features {:?} ({} parameters, init {})",
            features,
            alphas.size(),
            self.init.name()
        );
        self.alphas = Some(alphas);
        self.features = Some(features.to_vec());
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.alphas.is_some()
    }

    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        let (Some(alphas), Some(features)) = (&self.alphas, &self.features) else {
            return Err(QuorumError::NotBuilt("PReLU".to_string()));
        };
        check_input(graph, input, features, "PReLU")?;

        let pos = graph.relu(input)?;
        let magnitude = graph.abs(input)?;
        let doubled_neg = graph.sub(input, magnitude)?;
        let neg = graph.mul_scalar(doubled_neg, 0.5)?;

        let alphas = alphas.node(graph);
        let scaled = graph.mul(alphas, neg)?;
        graph.add(pos, scaled)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.alphas.iter().collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.alphas.iter_mut().collect()
    }

    fn weights(&self) -> Vec<&Tensor> {
        self.alphas.iter().map(|p| &p.data).collect()
    }

    fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        if !self.is_built() {
            return Err(QuorumError::NotBuilt("PReLU".to_string()));
        }
        assign_weights(self.parameters_mut(), weights, "PReLU")
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::PReLU {
            init: self.init.name().to_string(),
        }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

/// f(x) = alphas * log(1 + exp(betas * x))
///
/// Both `alphas` and `betas` are learned per feature and start as constants
/// (0.2 and 5.0 unless configured otherwise).
#[derive(Debug, Clone)]
pub struct ParametricSoftplus {
    alpha_init: f64,
    beta_init: f64,
    initial_weights: Option<Vec<Tensor>>,
    alphas: Option<Parameter>,
    betas: Option<Parameter>,
    features: Option<Vec<usize>>,
    training: bool,
}

impl ParametricSoftplus {
    pub fn new(alpha_init: f64, beta_init: f64) -> Result<Self> {
        Ok(Self {
            alpha_init: finite(alpha_init, "ParametricSoftplus alpha_init")?,
            beta_init: finite(beta_init, "ParametricSoftplus beta_init")?,
            ..Default::default()
        })
    }

    /// Values for `[alphas, betas]` used instead of the constant initial values.
    pub fn with_weights(mut self, weights: Vec<Tensor>) -> Self {
        self.initial_weights = Some(weights);
        self
    }

    pub fn alphas(&self) -> Option<&Parameter> {
        self.alphas.as_ref()
    }

    pub fn betas(&self) -> Option<&Parameter> {
        self.betas.as_ref()
    }
}

impl Default for ParametricSoftplus {
    fn default() -> Self {
        Self {
            alpha_init: 0.2,
            beta_init: 5.0,
            initial_weights: None,
            alphas: None,
            betas: None,
            features: None,
            training: true,
        }
    }
}

impl Module for ParametricSoftplus {
    fn build(&mut self, features: &[usize], _rng: &mut dyn RngCore) -> Result<()> {
        if !needs_build(self.features.as_deref(), features, "ParametricSoftplus")? {
            return Ok(());
        }

        let mut alphas = Parameter::new_named(Tensor::full(features, self.alpha_init), "alphas");
        let mut betas = Parameter::new_named(Tensor::full(features, self.beta_init), "betas");
        if let Some(weights) = &self.initial_weights {
            assign_weights(
                vec![&mut alphas, &mut betas],
                weights.clone(),
                "ParametricSoftplus",
            )?;
        }

        debug!(
            "Built ParametricSoftplus for features {:?} ({} parameters)",
            features,
            alphas.size() + betas.size()
        );
        self.alphas = Some(alphas);
        self.betas = Some(betas);
        self.features = Some(features.to_vec());
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.alphas.is_some() && self.betas.is_some()
    }

    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        let (Some(alphas), Some(betas), Some(features)) = (&self.alphas, &self.betas, &self.features)
        else {
            return Err(QuorumError::NotBuilt("ParametricSoftplus".to_string()));
        };
        check_input(graph, input, features, "ParametricSoftplus")?;

        let betas = betas.node(graph);
        let scaled_input = graph.mul(betas, input)?;
        let soft = graph.softplus(scaled_input)?;

        let alphas = alphas.node(graph);
        graph.mul(alphas, soft)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.alphas.iter().chain(self.betas.iter()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.alphas.iter_mut().chain(self.betas.iter_mut()).collect()
    }

    fn weights(&self) -> Vec<&Tensor> {
        self.parameters().into_iter().map(|p| &p.data).collect()
    }

    fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        if !self.is_built() {
            return Err(QuorumError::NotBuilt("ParametricSoftplus".to_string()));
        }
        assign_weights(self.parameters_mut(), weights, "ParametricSoftplus")
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::ParametricSoftplus {
            alpha_init: self.alpha_init,
            beta_init: self.beta_init,
        }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
