// comparison.rs
// Range-limiting operators.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Clamp operation: output = clamp(input, min_val, max_val)
/// Constrains values to the range [min_val, max_val]. The gradient flows only where the
/// input was already inside the range.
#[derive(Debug, Clone)]
pub struct Clamp {
    pub min_val: f64,
    pub max_val: f64,
}

impl Clamp {
    pub fn new(min_val: f64, max_val: f64) -> Self {
        Self { min_val, max_val }
    }
}

impl Operator for Clamp {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Clamp", inputs, 1)?;
        Ok(inputs[0].clamp(self.min_val, self.max_val))
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Clamp", inputs, 1)?;

        // mask = (input >= min_val) & (input <= max_val)
        let min_mask = inputs[0].greater_equal_scalar(self.min_val);
        let max_mask = inputs[0].less_equal_scalar(self.max_val);
        let combined_mask = min_mask.mul(&max_mask)?;

        Ok(vec![grad_output.mul(&combined_mask)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}
