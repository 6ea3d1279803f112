// unary.rs
// Element-wise functions of a single node.

use crate::error::Result;
use crate::ops::{Operator, expect_inputs};
use crate::tensor::Tensor;

/// Element-wise exponential: output = exp(input)
#[derive(Debug, Clone)]
pub struct Exp;

impl Operator for Exp {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Exp", inputs, 1)?;
        Ok(inputs[0].exp())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Exp", inputs, 1)?;
        // d/dx(exp(x)) = exp(x), which is exactly the forward output
        Ok(vec![grad_output.mul(output)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Element-wise natural logarithm: output = log(input)
#[derive(Debug, Clone)]
pub struct Log;

impl Operator for Log {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Log", inputs, 1)?;
        Ok(inputs[0].log())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Log", inputs, 1)?;
        // d/dx(log(x)) = 1/x
        Ok(vec![grad_output.div(inputs[0])?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Element-wise absolute value: output = |input|
#[derive(Debug, Clone)]
pub struct Abs;

impl Operator for Abs {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Abs", inputs, 1)?;
        Ok(inputs[0].abs())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Abs", inputs, 1)?;
        // Subgradient at zero is taken as 0.
        let sign = inputs[0].map(|x| {
            if x > 0.0 {
                1.0
            } else if x < 0.0 {
                -1.0
            } else {
                0.0
            }
        });
        Ok(vec![grad_output.mul(&sign)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Element-wise negation: output = -input
#[derive(Debug, Clone)]
pub struct Neg;

impl Operator for Neg {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Neg", inputs, 1)?;
        Ok(inputs[0].neg())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Neg", inputs, 1)?;
        Ok(vec![grad_output.neg()])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Sigmoid activation: output = 1 / (1 + exp(-input))
#[derive(Debug, Clone)]
pub struct Sigmoid;

impl Operator for Sigmoid {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Sigmoid", inputs, 1)?;
        Ok(inputs[0].sigmoid())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Sigmoid", inputs, 1)?;
        // d/dx(sigmoid(x)) = sigmoid(x) * (1 - sigmoid(x))
        let local = output.map(|s| s * (1.0 - s));
        Ok(vec![grad_output.mul(&local)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Hyperbolic tangent activation: output = tanh(input)
#[derive(Debug, Clone)]
pub struct Tanh;

impl Operator for Tanh {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Tanh", inputs, 1)?;
        Ok(inputs[0].tanh())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Tanh", inputs, 1)?;
        // d/dx(tanh(x)) = 1 - tanh(x)^2
        let local = output.map(|t| 1.0 - t * t);
        Ok(vec![grad_output.mul(&local)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// Softplus: output = log(1 + exp(input))
#[derive(Debug, Clone)]
pub struct Softplus;

impl Operator for Softplus {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("Softplus", inputs, 1)?;
        Ok(inputs[0].softplus())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("Softplus", inputs, 1)?;
        // d/dx(softplus(x)) = sigmoid(x)
        Ok(vec![grad_output.mul(&inputs[0].sigmoid())?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}

/// ReLU activation: output = max(0, input)
#[derive(Debug, Clone)]
pub struct ReLU;

impl Operator for ReLU {
    fn compute(&self, inputs: &[&Tensor]) -> Result<Tensor> {
        expect_inputs("ReLU", inputs, 1)?;
        Ok(inputs[0].relu())
    }

    fn gradient(
        &self,
        grad_output: Tensor,
        inputs: &[&Tensor],
        _output: &Tensor,
    ) -> Result<Vec<Tensor>> {
        expect_inputs("ReLU", inputs, 1)?;
        // d/dx(max(0, x)) = 1 if x > 0, else 0
        let mask = inputs[0].greater_scalar(0.0);
        Ok(vec![grad_output.mul(&mask)?])
    }

    fn clone_op(&self) -> Box<dyn Operator> {
        Box::new(self.clone())
    }

    fn num_inputs(&self) -> usize {
        1
    }
}
