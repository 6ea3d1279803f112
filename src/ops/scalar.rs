// scalar.rs
// Operations between a graph node and a constant stored on the operator itself.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Scalar addition: output = input + scalar
#[derive(Debug, Clone)]
pub struct AddScalar {
    pub scalar: f64,
}

impl AddScalar {
    pub fn new(scalar: f64) -> Self {
        Self { scalar }
    }
}

impl Operator for AddScalar {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("AddScalar", inputs, 1)?;
        Ok(inputs[0].add_scalar(self.scalar))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("AddScalar", inputs, 1)?;
        Ok(vec![grad_output])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Scalar multiplication: output = input * scalar
#[derive(Debug, Clone)]
pub struct MulScalar {
    pub scalar: f64,
}

impl MulScalar {
    pub fn new(scalar: f64) -> Self {
        Self { scalar }
    }
}

impl Operator for MulScalar {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("MulScalar", inputs, 1)?;
        Ok(inputs[0].mul_scalar(self.scalar))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("MulScalar", inputs, 1)?;
        Ok(vec![grad_output.mul_scalar(self.scalar)])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}
