// activation.rs
// Piecewise activations that need a dedicated operator because their selector depends on a
// configured constant (slope or threshold) rather than on another node.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Leaky rectifier: output = x if x >= 0 else alpha * x
#[derive(Debug, Clone)]
pub struct LeakyReLU {
    pub alpha: f64,
}

impl LeakyReLU {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl Operator for LeakyReLU {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("LeakyReLU", inputs, 1)?;
        let alpha = self.alpha;
        Ok(inputs[0].map(|x| if x >= 0.0 { x } else { alpha * x }))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("LeakyReLU", inputs, 1)?;
        let alpha = self.alpha;
        let slope = inputs[0].map(|x| if x >= 0.0 { 1.0 } else { alpha });
        Ok(vec![grad_output.mul(&slope)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Zeroes every element whose magnitude is below `theta`: output = 0 if |x| < theta else x
#[derive(Debug, Clone)]
pub struct ThresholdedLinear {
    pub theta: f64,
}

impl ThresholdedLinear {
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }
}

impl Operator for ThresholdedLinear {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("ThresholdedLinear", inputs, 1)?;
        let theta = self.theta;
        Ok(inputs[0].map(|x| if x.abs() < theta { 0.0 } else { x }))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("ThresholdedLinear", inputs, 1)?;
        let mask = inputs[0].abs_less_scalar(self.theta).map(|m| 1.0 - m);
        Ok(vec![grad_output.mul(&mask)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Passes only values strictly above `theta`: output = x if x > theta else 0
#[derive(Debug, Clone)]
pub struct ThresholdedReLU {
    pub theta: f64,
}

impl ThresholdedReLU {
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }
}

impl Operator for ThresholdedReLU {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("ThresholdedReLU", inputs, 1)?;
        let theta = self.theta;
        Ok(inputs[0].map(|x| if x > theta { x } else { 0.0 }))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("ThresholdedReLU", inputs, 1)?;
        let mask = inputs[0].greater_scalar(self.theta);
        Ok(vec![grad_output.mul(&mask)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Heaviside step: output = 1 if x > 0 else 0. Piecewise constant, so no gradient flows.
#[derive(Debug, Clone)]
pub struct Step;

impl Operator for Step {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Step", inputs, 1)?;
        Ok(inputs[0].greater_scalar(0.0))
    }

    fn gradient(
        &self,
        _grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Step", inputs, 1)?;
        Ok(vec![Tensor::zeros(inputs[0].shape())])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}
