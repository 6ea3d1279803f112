use crate::error::{QuorumError, Result};
use crate::graph::node::{Node, NodeId};
use crate::ops::{
    Abs, Add, AddScalar, Clamp, Exp, LeakyReLU, Log, Mean, Mul, MulScalar, Neg, Operator, ReLU,
    Sigmoid, Softplus, Step, Sub, Sum, Tanh, ThresholdedLinear, ThresholdedReLU,
};
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet};

/// Eager computational graph.
///
/// Every operation is evaluated as soon as it is applied and the resulting node keeps the
/// operator around for the backward pass. Layers receive a `&mut Engine` together with the id
/// of their input node and return the id of their output node.
#[derive(Debug)]
pub struct Engine {
    nodes: HashMap<NodeId, Node>,
    gradients: HashMap<NodeId, Tensor>,
    training_mode: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            gradients: HashMap::new(),
            training_mode: true,
        }
    }

    pub fn set_training(&mut self, training: bool) {
        self.training_mode = training;
    }

    pub fn is_training(&self) -> bool {
        self.training_mode
    }

    // Creates a new leaf node in the computational graph
    pub fn create_variable(&mut self, tensor: Tensor, requires_grad: bool) -> NodeId {
        let node = Node::new_leaf(tensor, requires_grad);
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    pub fn tensor_from_vec(
        &mut self,
        data: Vec<f64>,
        shape: &[usize],
        requires_grad: bool,
    ) -> Result<NodeId> {
        let tensor = Tensor::from_vec(data, shape)?;
        Ok(self.create_variable(tensor, requires_grad))
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn get_tensor(&self, node_id: NodeId) -> Option<&Tensor> {
        self.nodes.get(&node_id).map(|node| &node.tensor)
    }

    /// Owned copy of a node's value.
    pub fn get_data(&self, node_id: NodeId) -> Result<Tensor> {
        self.get_tensor(node_id)
            .cloned()
            .ok_or(QuorumError::NodeNotFound(node_id))
    }

    pub fn get_shape(&self, node_id: NodeId) -> Option<Vec<usize>> {
        self.get_tensor(node_id).map(|t| t.shape().to_vec())
    }

    pub fn get_gradient(&self, node_id: NodeId) -> Option<&Tensor> {
        self.gradients.get(&node_id)
    }

    fn validate_inputs(&self, op: &dyn Operator, input_ids: &[NodeId]) -> Result<()> {
        for &input_id in input_ids {
            if !self.nodes.contains_key(&input_id) {
                return Err(QuorumError::NodeNotFound(input_id));
            }
        }

        if input_ids.len() != op.num_inputs() {
            return Err(QuorumError::Graph(format!(
                "Operation {} expects {} inputs, got {}",
                op.name(),
                op.num_inputs(),
                input_ids.len()
            )));
        }

        Ok(())
    }

    /// Evaluates `op` on the given nodes and records the result as a new node.
    pub fn apply_operation(
        &mut self,
        op: Box<dyn Operator>,
        input_ids: Vec<NodeId>,
    ) -> Result<NodeId> {
        self.validate_inputs(op.as_ref(), &input_ids)?;

        let (result, requires_grad) = {
            let inputs: Vec<&Node> = input_ids
                .iter()
                .map(|id| self.nodes.get(id).ok_or(QuorumError::NodeNotFound(*id)))
                .collect::<Result<_>>()?;
            let tensors: Vec<&Tensor> = inputs.iter().map(|node| &node.tensor).collect();
            let requires_grad = inputs.iter().any(|node| node.requires_grad);
            (op.compute(&tensors)?, requires_grad)
        };

        let node = Node::from_op(op, input_ids, result, requires_grad);
        let id = node.id;
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Runs reverse-mode differentiation from `root`.
    ///
    /// The root is seeded with ones of its own shape. Gradients are kept only for leaves that
    /// require them; intermediate gradients are consumed on the way down. Does nothing when
    /// the engine is in evaluation mode.
    pub fn backward(&mut self, root: NodeId) -> Result<()> {
        if !self.training_mode {
            return Ok(());
        }

        let root_tensor = self
            .get_tensor(root)
            .ok_or(QuorumError::NodeNotFound(root))?;
        let seed = Tensor::ones(root_tensor.shape());
        self.gradients.insert(root, seed);

        let mut visited = HashSet::new();
        let mut topo_order = Vec::new();
        self.topological_sort(root, &mut visited, &mut topo_order)?;
        topo_order.reverse();

        for node_id in topo_order {
            self.backward_node(node_id)?;
        }

        Ok(())
    }

    fn backward_node(&mut self, node_id: NodeId) -> Result<()> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(QuorumError::NodeNotFound(node_id))?;

        // Leaf nodes keep whatever gradient reached them.
        let Some(op) = node.op.as_ref() else {
            return Ok(());
        };

        let grad_output = match self.gradients.remove(&node_id) {
            Some(grad) => grad,
            None => return Ok(()),
        };

        if !node.requires_grad {
            return Ok(());
        }

        let input_tensors: Vec<&Tensor> = node
            .inputs
            .iter()
            .map(|id| {
                self.nodes
                    .get(id)
                    .map(|input| &input.tensor)
                    .ok_or(QuorumError::NodeNotFound(*id))
            })
            .collect::<Result<_>>()?;

        let input_grads = op.gradient(grad_output, &input_tensors, &node.tensor)?;
        if input_grads.len() != node.inputs.len() {
            return Err(QuorumError::Graph(format!(
                "Operation {} returned {} gradients for {} inputs",
                op.name(),
                input_grads.len(),
                node.inputs.len()
            )));
        }

        for (input_id, grad) in node.inputs.iter().zip(input_grads) {
            let wants_grad = self
                .nodes
                .get(input_id)
                .is_some_and(|input| input.requires_grad);
            if !wants_grad {
                continue;
            }

            let accumulated = match self.gradients.remove(input_id) {
                Some(existing) => existing.add(&grad)?,
                None => grad,
            };
            self.gradients.insert(*input_id, accumulated);
        }

        Ok(())
    }

    // Depth-first ordering so every node is processed after all the nodes that consume it.
    fn topological_sort(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        topo_order: &mut Vec<NodeId>,
    ) -> Result<()> {
        if !visited.insert(node_id) {
            return Ok(());
        }

        let node = self
            .nodes
            .get(&node_id)
            .ok_or(QuorumError::NodeNotFound(node_id))?;
        for &input_id in &node.inputs {
            self.topological_sort(input_id, visited, topo_order)?;
        }

        topo_order.push(node_id);
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn zero_gradients(&mut self) {
        self.gradients.clear();
    }

    /// Drops every node and gradient. Training loops call this between steps.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.gradients.clear();
    }

    // Convenience builders, one per operator.

    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Add), vec![a, b])
    }

    pub fn sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Sub), vec![a, b])
    }

    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Mul), vec![a, b])
    }

    pub fn add_scalar(&mut self, a: NodeId, scalar: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(AddScalar::new(scalar)), vec![a])
    }

    pub fn mul_scalar(&mut self, a: NodeId, scalar: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(MulScalar::new(scalar)), vec![a])
    }

    pub fn negate(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Neg), vec![a])
    }

    pub fn abs(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Abs), vec![a])
    }

    pub fn exp(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Exp), vec![a])
    }

    pub fn log(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Log), vec![a])
    }

    pub fn relu(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(ReLU), vec![a])
    }

    pub fn leaky_relu(&mut self, a: NodeId, alpha: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(LeakyReLU::new(alpha)), vec![a])
    }

    pub fn sigmoid(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Sigmoid), vec![a])
    }

    pub fn tanh(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Tanh), vec![a])
    }

    pub fn softplus(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Softplus), vec![a])
    }

    pub fn step(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Step), vec![a])
    }

    pub fn clamp(&mut self, a: NodeId, min_val: f64, max_val: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(Clamp::new(min_val, max_val)), vec![a])
    }

    pub fn thresholded_linear(&mut self, a: NodeId, theta: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(ThresholdedLinear::new(theta)), vec![a])
    }

    pub fn thresholded_relu(&mut self, a: NodeId, theta: f64) -> Result<NodeId> {
        self.apply_operation(Box::new(ThresholdedReLU::new(theta)), vec![a])
    }

    pub fn sum(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Sum), vec![a])
    }

    pub fn mean(&mut self, a: NodeId) -> Result<NodeId> {
        self.apply_operation(Box::new(Mean), vec![a])
    }
}
