// Serializable layer configurations.
// A config holds the constructor arguments of a layer, never its weights.

use crate::error::Result;
use crate::nn::activations::ActivationFn;
use crate::nn::initializers::Initializer;
use crate::nn::layers::{
    ELU, LeakyReLU, PReLU, ParametricSoftplus, Quorum, Sequential, ThresholdedLinear,
    ThresholdedReLU,
};
use crate::nn::module::Module;
use serde::{Deserialize, Serialize};

/// Constructor arguments of a layer, tagged by the layer name.
///
/// ```rust
/// use quorum::nn::LayerConfig;
///
/// let config = LayerConfig::from_json(r#"{"name": "ELU", "alpha": 0.5}"#).unwrap();
/// assert_eq!(config, LayerConfig::ELU { alpha: 0.5 });
/// ```
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum LayerConfig {
    LeakyReLU {
        alpha: f64,
    },
    PReLU {
        init: String,
    },
    ELU {
        alpha: f64,
    },
    ParametricSoftplus {
        alpha_init: f64,
        beta_init: f64,
    },
    ThresholdedLinear {
        theta: f64,
    },
    ThresholdedReLU {
        theta: f64,
    },
    Quorum {
        activation_fns: Vec<String>,
        activation_weights_init: Vec<f64>,
        trainable: bool,
        #[serde(default)]
        threshold: Option<f64>,
    },
    Sequential {
        layers: Vec<LayerConfig>,
    },
}

impl LayerConfig {
    pub fn name(&self) -> &'static str {
        match self {
            LayerConfig::LeakyReLU { .. } => "LeakyReLU",
            LayerConfig::PReLU { .. } => "PReLU",
            LayerConfig::ELU { .. } => "ELU",
            LayerConfig::ParametricSoftplus { .. } => "ParametricSoftplus",
            LayerConfig::ThresholdedLinear { .. } => "ThresholdedLinear",
            LayerConfig::ThresholdedReLU { .. } => "ThresholdedReLU",
            LayerConfig::Quorum { .. } => "Quorum",
            LayerConfig::Sequential { .. } => "Sequential",
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Recreates the layer described by this config. The layer still has to be built.
    pub fn build_layer(&self) -> Result<Box<dyn Module>> {
        let layer: Box<dyn Module> = match self {
            LayerConfig::LeakyReLU { alpha } => Box::new(LeakyReLU::new(*alpha)?),
            LayerConfig::PReLU { init } => {
                Box::new(PReLU::new().with_init(Initializer::from_name(init)?))
            }
            LayerConfig::ELU { alpha } => Box::new(ELU::new(*alpha)?),
            LayerConfig::ParametricSoftplus {
                alpha_init,
                beta_init,
            } => Box::new(ParametricSoftplus::new(*alpha_init, *beta_init)?),
            LayerConfig::ThresholdedLinear { theta } => Box::new(ThresholdedLinear::new(*theta)?),
            LayerConfig::ThresholdedReLU { theta } => Box::new(ThresholdedReLU::new(*theta)?),
            LayerConfig::Quorum {
                activation_fns,
                activation_weights_init,
                trainable,
                threshold,
            } => {
                let fns = activation_fns
                    .iter()
                    .map(|name| ActivationFn::from_name(name))
                    .collect::<Result<Vec<_>>>()?;
                Box::new(Quorum::new(
                    fns,
                    Some(activation_weights_init.clone()),
                    *trainable,
                    *threshold,
                )?)
            }
            LayerConfig::Sequential { layers } => {
                let mut sequential = Sequential::new();
                for config in layers {
                    sequential.push(config.build_layer()?);
                }
                Box::new(sequential)
            }
        };
        Ok(layer)
    }
}
