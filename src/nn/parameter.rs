use crate::error::{QuorumError, Result};
use crate::graph::{Engine, NodeId};
use crate::tensor::Tensor;
use std::cell::RefCell;

/// A Parameter is a tensor owned by a layer.
///
/// Trainable parameters are handed to optimizers through `Module::parameters`; fixed ones are
/// still part of the layer's weights (they are saved and restored with `weights`/`set_weights`)
/// but never receive gradients.
///
/// Each forward pass feeds the current value into the graph as a fresh leaf through
/// [`Parameter::node`]. The parameter remembers every leaf it created in the current graph, so a
/// layer applied several times in one graph gets the sum of the gradients of all its uses.
///
/// # Examples
///
/// ```rust
/// use quorum::{Engine, Parameter, Tensor};
///
/// let mut graph = Engine::new();
/// let param = Parameter::new(Tensor::zeros(&[3]));
/// let node = param.node(&mut graph);
/// assert_eq!(param.last_node(), Some(node));
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    /// The actual tensor data
    pub data: Tensor,
    /// Whether the optimizer may update this parameter
    pub requires_grad: bool,
    /// Optional name for debugging
    pub name: Option<String>,
    leaves: RefCell<Vec<NodeId>>,
}

impl Parameter {
    /// Creates a trainable parameter.
    pub fn new(data: Tensor) -> Self {
        Self {
            data,
            requires_grad: true,
            name: None,
            leaves: RefCell::new(Vec::new()),
        }
    }

    pub fn new_named(data: Tensor, name: impl Into<String>) -> Self {
        Self::new(data).with_name(name)
    }

    /// Creates a parameter that stays constant for the lifetime of its layer.
    pub fn fixed(data: Tensor) -> Self {
        Self {
            requires_grad: false,
            ..Self::new(data)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn size(&self) -> usize {
        self.data.size()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replaces the value, keeping the shape.
    pub fn set_data(&mut self, data: Tensor) -> Result<()> {
        if data.shape() != self.shape() {
            return Err(QuorumError::shape(
                self.shape(),
                data.shape(),
                &format!("set_data({})", self.name().unwrap_or("parameter")),
            ));
        }
        self.data = data;
        Ok(())
    }

    /// Registers the current value as a leaf of `graph` and returns its id.
    ///
    /// Leaves left over from other graphs are forgotten; node ids are never reused across graphs.
    pub fn node(&self, graph: &mut Engine) -> NodeId {
        let id = graph.create_variable(self.data.clone(), self.requires_grad);
        let mut leaves = self.leaves.borrow_mut();
        leaves.retain(|leaf| graph.contains(*leaf));
        leaves.push(id);
        id
    }

    /// Leaf created by the most recent call to [`Parameter::node`].
    pub fn last_node(&self) -> Option<NodeId> {
        self.leaves.borrow().last().copied()
    }

    /// Gradient of this parameter after a backward pass over `graph`, summed over every leaf
    /// the parameter registered in that graph.
    pub fn gradient(&self, graph: &Engine) -> Option<Tensor> {
        let leaves = self.leaves.borrow();
        let mut grads = leaves.iter().filter_map(|leaf| graph.get_gradient(*leaf));
        let mut total = grads.next()?.clone();
        for grad in grads {
            *total.data_mut() += grad.data();
        }
        Some(total)
    }
}

impl From<Tensor> for Parameter {
    fn from(tensor: Tensor) -> Self {
        Self::new(tensor)
    }
}
