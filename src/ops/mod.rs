// Operators of the computational graph.
// Each operator knows how to compute its output from its inputs and how to push a gradient
// back to every input. The engine stores the boxed operator on the node it produced so the
// backward pass can call `gradient` later.
use crate::error::{QuorumError, Result};
use crate::tensor::Tensor;
use std::any::type_name;

pub mod activation;
pub mod basic;
pub mod comparison;
pub mod reduction;
pub mod scalar;
pub mod unary;

pub use activation::{LeakyReLU, Step, ThresholdedLinear, ThresholdedReLU};
pub use basic::{Add, Mul, Sub, reduce_gradient_for_broadcasting};
pub use comparison::Clamp;
pub use reduction::{Mean, Sum};
pub use scalar::{AddScalar, MulScalar};
pub use unary::{Abs, Exp, Log, Neg, ReLU, Sigmoid, Softplus, Tanh};

// All operators in the computational graph implement this trait.
pub trait Operator: std::fmt::Debug {
    // Computes the output of the operator for the given inputs.
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor>;

    // Computes the gradient of the output with respect to each input.
    // `output` is the tensor `compute` produced for these same inputs.
    fn gradient(&self, grad_output: Tensor, inputs: &[&Tensor], output: &Tensor)
    -> Result<Vec<Tensor>>;

    // Number of inputs this operator expects
    fn num_inputs(&self) -> usize;

    fn name(&self) -> String {
        let full_name = type_name::<Self>();
        full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name)
            .to_string()
    }

    fn clone_op(&self) -> Box<dyn Operator>;
}

impl Operator for Box<dyn Operator> {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        self.as_ref().compute(inputs)
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        self.as_ref().gradient(grad_output, inputs, output)
    }

    fn num_inputs(&self) -> usize {
        self.as_ref().num_inputs()
    }

    fn name(&self) -> String {
        self.as_ref().name()
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        self.as_ref().clone_op()
    }
}

/// Checks operator arity before touching the inputs.
pub(crate) fn expect_inputs(op: &str, inputs: &[&Tensor], expected: usize) -> Result<()> {
    if inputs.len() != expected {
        return Err(QuorumError::Graph(format!(
            "{} operation requires exactly {} input(s), got {}",
            op,
            expected,
            inputs.len()
        )));
    }
    Ok(())
}
