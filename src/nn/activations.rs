// Element-wise activation functions that can be mixed by a Quorum layer.
// Each function builds its result inside the computation graph so gradients flow through it.

use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use std::fmt;
use std::sync::Arc;

/// Graph-building closure behind [`ActivationFn::Custom`].
pub type ActivationClosure = Arc<dyn Fn(&mut Engine, NodeId) -> Result<NodeId> + Send + Sync>;

#[derive(Clone)]
pub enum ActivationFn {
    /// Identity
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softplus,
    /// Heaviside step: 1 where x > 0, else 0. Passes no gradient.
    Step,
    Custom { name: String, f: ActivationClosure },
}

impl ActivationFn {
    /// Wraps an arbitrary graph-building function.
    ///
    /// ```rust
    /// use quorum::nn::ActivationFn;
    ///
    /// let square = ActivationFn::custom("square", |graph, x| graph.mul(x, x));
    /// assert_eq!(square.name(), "square");
    /// ```
    pub fn custom<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Engine, NodeId) -> Result<NodeId> + Send + Sync + 'static,
    {
        ActivationFn::Custom {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Resolves a built-in function by name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "linear" | "identity" => Ok(ActivationFn::Linear),
            "relu" => Ok(ActivationFn::Relu),
            "sigmoid" => Ok(ActivationFn::Sigmoid),
            "tanh" => Ok(ActivationFn::Tanh),
            "softplus" => Ok(ActivationFn::Softplus),
            "step" => Ok(ActivationFn::Step),
            _ => Err(QuorumError::config(format!(
                "unknown activation function '{}'",
                name
            ))),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ActivationFn::Linear => "linear",
            ActivationFn::Relu => "relu",
            ActivationFn::Sigmoid => "sigmoid",
            ActivationFn::Tanh => "tanh",
            ActivationFn::Softplus => "softplus",
            ActivationFn::Step => "step",
            ActivationFn::Custom { name, .. } => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ActivationFn::Custom { .. })
    }

    /// Applies the function to `input`, returning the id of the output node.
    pub fn apply(&self, graph: &mut Engine, input: NodeId) -> Result<NodeId> {
        match self {
            ActivationFn::Linear => Ok(input),
            ActivationFn::Relu => graph.relu(input),
            ActivationFn::Sigmoid => graph.sigmoid(input),
            ActivationFn::Tanh => graph.tanh(input),
            ActivationFn::Softplus => graph.softplus(input),
            ActivationFn::Step => graph.step(input),
            ActivationFn::Custom { f, .. } => f(graph, input),
        }
    }
}

impl fmt::Debug for ActivationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationFn::Custom { name, .. } => write!(f, "Custom({})", name),
            builtin => write!(f, "{}", builtin.name()),
        }
    }
}

impl PartialEq for ActivationFn {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ActivationFn::Custom { f: a, .. }, ActivationFn::Custom { f: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            (a, b) => a.is_builtin() && b.is_builtin() && a.name() == b.name(),
        }
    }
}
