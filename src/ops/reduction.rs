// reduction.rs
// Full reductions to a scalar. Losses are built from these so `Engine::backward` always
// starts from a single value.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Sum of every element: output = sum(input), shape []
#[derive(Debug, Clone, Default)]
pub struct Sum;

impl Operator for Sum {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Sum", inputs, 1)?;
        Ok(Tensor::scalar(inputs[0].sum_all()))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Sum", inputs, 1)?;
        // Every input element contributes once, so the upstream gradient is spread unchanged.
        let upstream = grad_output.first().unwrap_or(0.0);
        Ok(vec![Tensor::full(inputs[0].shape(), upstream)])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Mean of every element: output = sum(input) / n, shape []
#[derive(Debug, Clone, Default)]
pub struct Mean;

impl Operator for Mean {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Mean", inputs, 1)?;
        let n = inputs[0].size().max(1) as f64;
        Ok(Tensor::scalar(inputs[0].sum_all() / n))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Mean", inputs, 1)?;
        let n = inputs[0].size().max(1) as f64;
        let upstream = grad_output.first().unwrap_or(0.0);
        Ok(vec![Tensor::full(inputs[0].shape(), upstream / n)])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}
