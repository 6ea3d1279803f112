use crate::error::{QuorumError, Result};
use crate::graph::Engine;
use crate::nn::optim::Optimizer;
use crate::nn::parameter::Parameter;
use crate::tensor::Tensor;
use log::{debug, warn};
use std::collections::HashMap;

/// Stochastic Gradient Descent with momentum and L2 weight decay
///
/// ```text
/// g = grad + weight_decay * param
/// v = momentum * v + g
/// param = param - lr * v
/// ```
#[derive(Debug, Clone)]
pub struct SGD {
    lr: f64,
    momentum: f64,
    weight_decay: f64,
    momentum_buffers: HashMap<usize, Tensor>,
    steps: usize,
}

impl SGD {
    pub fn new(lr: f64, momentum: f64, weight_decay: f64) -> Result<Self> {
        if !lr.is_finite() || lr <= 0.0 {
            return Err(QuorumError::config(format!(
                "learning rate must be positive, got {}",
                lr
            )));
        }
        if !(0.0..1.0).contains(&momentum) {
            return Err(QuorumError::config(format!(
                "momentum must be in [0, 1), got {}",
                momentum
            )));
        }
        if !weight_decay.is_finite() || weight_decay < 0.0 {
            return Err(QuorumError::config(format!(
                "weight decay must be non-negative, got {}",
                weight_decay
            )));
        }

        Ok(Self {
            lr,
            momentum,
            weight_decay,
            momentum_buffers: HashMap::new(),
            steps: 0,
        })
    }

    pub fn with_defaults(lr: f64) -> Result<Self> {
        Self::new(lr, 0.0, 0.0)
    }

    pub fn with_momentum(lr: f64, momentum: f64) -> Result<Self> {
        Self::new(lr, momentum, 0.0)
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    fn update(&mut self, index: usize, param: &mut Parameter, grad: &Tensor) -> Result<()> {
        if grad.shape() != param.shape() {
            return Err(QuorumError::shape(param.shape(), grad.shape(), "SGD step"));
        }

        let mut direction = if self.weight_decay > 0.0 {
            grad.add(&param.data.mul_scalar(self.weight_decay))?
        } else {
            grad.clone()
        };

        if self.momentum > 0.0 {
            direction = match self.momentum_buffers.remove(&index) {
                Some(buffer) if buffer.shape() == direction.shape() => {
                    buffer.mul_scalar(self.momentum).add(&direction)?
                }
                Some(_) => {
                    debug!(
                        "SGD: momentum buffer {} no longer matches {}, restarting it",
                        index,
                        param.name().unwrap_or("<unnamed>")
                    );
                    direction
                }
                None => direction,
            };
            self.momentum_buffers.insert(index, direction.clone());
        }

        param.data = param.data.sub(&direction.mul_scalar(self.lr))?;
        Ok(())
    }
}

impl Optimizer for SGD {
    /// Momentum buffers belong to positions in `params`, so callers must pass the parameters in
    /// the same order on every step. A buffer whose shape no longer fits its position is dropped.
    /// Call [`Optimizer::reset`] after changing which parameters are trained.
    fn step(&mut self, params: Vec<&mut Parameter>, graph: &Engine) -> Result<()> {
        let mut updated = 0;
        for (index, param) in params.into_iter().enumerate() {
            if !param.requires_grad {
                continue;
            }
            let Some(grad) = param.gradient(graph) else {
                warn!(
                    "SGD: no gradient for parameter {}, skipping",
                    param.name().unwrap_or("<unnamed>")
                );
                continue;
            };
            self.update(index, param, &grad)?;
            updated += 1;
        }

        self.steps += 1;
        debug!(
            "SGD step {}: updated {} parameters (lr {}, momentum {})",
            self.steps, updated, self.lr, self.momentum
        );
        Ok(())
    }

    fn lr(&self) -> f64 {
        self.lr
    }

    fn set_lr(&mut self, lr: f64) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.momentum_buffers.clear();
        self.steps = 0;
    }
}
