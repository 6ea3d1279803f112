// src/nn/layers/sequential.rs
// Ordered container of layers.

use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use crate::nn::Module;
use crate::nn::config::LayerConfig;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use log::debug;
use rand::RngCore;

/// Applies its layers one after the other.
///
/// Building a Sequential builds every member against the output shape of the layer before it.
#[derive(Debug)]
pub struct Sequential {
    layers: Vec<Box<dyn Module>>,
    training: bool,
}

impl Sequential {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            training: true,
        }
    }

    pub fn push(&mut self, layer: Box<dyn Module>) {
        self.layers.push(layer);
    }

    /// Builder-style [`Sequential::push`].
    pub fn add<M: Module + 'static>(mut self, layer: M) -> Self {
        self.push(Box::new(layer));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Box<dyn Module>> {
        self.layers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Module> {
        self.layers.get(index).map(|layer| &**layer)
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Sequential {
    fn build(&mut self, features: &[usize], rng: &mut dyn RngCore) -> Result<()> {
        let mut shape = features.to_vec();
        for layer in &mut self.layers {
            layer.build(&shape, rng)?;
            shape = layer.output_shape(&shape);
        }
        debug!(
            "Built Sequential of {} layers for features {:?}",
            self.layers.len(),
            features
        );
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.layers.iter().all(|layer| layer.is_built())
    }

    fn output_shape(&self, features: &[usize]) -> Vec<usize> {
        self.layers
            .iter()
            .fold(features.to_vec(), |shape, layer| layer.output_shape(&shape))
    }

    fn forward(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        let mut current = input;
        for layer in &self.layers {
            current = layer.forward(graph, current)?;
        }
        Ok(current)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.layers
            .iter()
            .flat_map(|layer| layer.parameters())
            .collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    fn weights(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|layer| layer.weights()).collect()
    }

    fn set_weights(&mut self, weights: Vec<Tensor>) -> Result<()> {
        if !self.is_built() {
            return Err(QuorumError::NotBuilt("Sequential".to_string()));
        }
        let counts: Vec<usize> = self
            .layers
            .iter()
            .map(|layer| layer.weights().len())
            .collect();
        let expected: usize = counts.iter().sum();
        if expected != weights.len() {
            return Err(QuorumError::config(format!(
                "Sequential expects {} weight tensors, got {}",
                expected,
                weights.len()
            )));
        }

        let mut remaining = weights.into_iter();
        for (layer, count) in self.layers.iter_mut().zip(counts) {
            layer.set_weights(remaining.by_ref().take(count).collect())?;
        }
        Ok(())
    }

    fn config(&self) -> LayerConfig {
        LayerConfig::Sequential {
            layers: self.layers.iter().map(|layer| layer.config()).collect(),
        }
    }

    fn training(&self) -> bool {
        self.training
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        for layer in &mut self.layers {
            layer.set_training(training);
        }
    }
}
