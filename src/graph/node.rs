use crate::ops::Operator;
use crate::tensor::Tensor;
use std::sync::atomic::{AtomicUsize, Ordering};

// Unique ID generator for computational graph nodes.
// Ids are global rather than per engine, so a stale id from a previous engine can never alias
// a node of the current one.
static NODE_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn new() -> Self {
        Self(NODE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// A value in the computational graph.
// Leaves hold tensors fed in from outside (inputs and parameters); every other node stores the
// operator that produced it so the backward pass can ask it for gradients.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub op: Option<Box<dyn Operator>>,
    pub inputs: Vec<NodeId>,
    pub tensor: Tensor,
    pub requires_grad: bool,
}

impl Node {
    pub fn new_leaf(tensor: Tensor, requires_grad: bool) -> Self {
        Self {
            id: NodeId::new(),
            op: None,
            inputs: Vec::new(),
            tensor,
            requires_grad,
        }
    }

    pub fn from_op(
        op: Box<dyn Operator>,
        inputs: Vec<NodeId>,
        tensor: Tensor,
        requires_grad: bool,
    ) -> Self {
        Self {
            id: NodeId::new(),
            op: Some(op),
            inputs,
            tensor,
            requires_grad,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.op.is_none()
    }
}
