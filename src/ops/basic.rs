// basic.rs
// Arithmetic between two graph nodes. All of them broadcast, so the backward pass has to
// fold the incoming gradient back down to each operand's own shape.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Helper to reduce gradients when broadcasting was used in forward pass.
/// This ensures gradient shapes match the original input shapes, e.g. a per-feature
/// parameter of shape `[features]` multiplied against a `[batch, features]` input receives
/// the gradient summed over the batch axis.
pub fn reduce_gradient_for_broadcasting(grad: Tensor, target_shape: &[usize]) -> Result<Tensor> {
    let grad_shape = grad.shape().to_vec();

    if grad_shape == target_shape {
        return Ok(grad);
    }

    // Find axes that were broadcasted (size 1 in target, size > 1 in grad)
    let mut axes_to_reduce = Vec::new();
    let mut target_idx = target_shape.len();

    for i in (0..grad_shape.len()).rev() {
        if target_idx == 0 {
            // Extra leading dimensions in grad - sum them out
            axes_to_reduce.push(i);
        } else {
            target_idx -= 1;
            if target_shape[target_idx] == 1 && grad_shape[i] > 1 {
                axes_to_reduce.push(i);
            }
        }
    }

    let reduced = if axes_to_reduce.is_empty() {
        grad
    } else {
        grad.sum_axes(&axes_to_reduce)?
    };

    // Size-1 axes were dropped by the sum; restore them.
    if reduced.shape() != target_shape {
        reduced.reshape(target_shape)
    } else {
        Ok(reduced)
    }
}

/// Element-wise addition: output = input1 + input2
#[derive(Debug, Clone, Default)]
pub struct Add;

impl Operator for Add {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Add", inputs, 2)?;
        inputs[0].add(inputs[1])
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Add", inputs, 2)?;

        // d/dx(x + y) = 1, d/dy(x + y) = 1
        let grad_lhs = reduce_gradient_for_broadcasting(grad_output.clone(), inputs[0].shape())?;
        let grad_rhs = reduce_gradient_for_broadcasting(grad_output, inputs[1].shape())?;

        Ok(vec![grad_lhs, grad_rhs])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        2
    }
}

/// Element-wise subtraction: output = input1 - input2
#[derive(Debug, Clone, Default)]
pub struct Sub;

impl Operator for Sub {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Sub", inputs, 2)?;
        inputs[0].sub(inputs[1])
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Sub", inputs, 2)?;

        let grad_lhs = reduce_gradient_for_broadcasting(grad_output.clone(), inputs[0].shape())?;
        let grad_rhs = reduce_gradient_for_broadcasting(grad_output.neg(), inputs[1].shape())?;

        Ok(vec![grad_lhs, grad_rhs])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        2
    }
}

/// Element-wise multiplication: output = input1 * input2
#[derive(Debug, Clone, Default)]
pub struct Mul;

impl Operator for Mul {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Mul", inputs, 2)?;
        inputs[0].mul(inputs[1])
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Mul", inputs, 2)?;

        // d/dx(x * y) = y, d/dy(x * y) = x
        let grad_lhs = grad_output.mul(inputs[1])?;
        let grad_rhs = grad_output.mul(inputs[0])?;

        Ok(vec![
            reduce_gradient_for_broadcasting(grad_lhs, inputs[0].shape())?,
            reduce_gradient_for_broadcasting(grad_rhs, inputs[1].shape())?,
        ])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        2
    }
}
