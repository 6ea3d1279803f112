// Tensor wrapper over ndarray's dynamic arrays.
// Every layer in the crate talks to numbers through this type, so it carries exactly the
// element-wise surface the activations need: arithmetic with broadcasting, abs/exp/log,
// clipping and scalar comparisons that produce 0/1 selectors.

use crate::error::{QuorumError, Result};
use ndarray::{ArrayD, Axis, IxDyn, Zip};


#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f64>,
}

/// Computes the shape two operands broadcast to, following NumPy's trailing-axis rules.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = vec![0; ndim];

    for i in 0..ndim {
        // Walk both shapes from the last axis backwards, padding with 1s.
        let l = if i < lhs.len() { lhs[lhs.len() - 1 - i] } else { 1 };
        let r = if i < rhs.len() { rhs[rhs.len() - 1 - i] } else { 1 };

        shape[ndim - 1 - i] = match (l, r) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(QuorumError::BroadcastMismatch {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                });
            }
        };
    }

    Ok(shape)
}

impl Tensor {
    pub fn new(data: ArrayD<f64>) -> Self {
        Self { data }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::new(ArrayD::zeros(IxDyn(shape)))
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::new(ArrayD::ones(IxDyn(shape)))
    }

    /// Tensor of the given shape with every element set to `value`.
    pub fn full(shape: &[usize], value: f64) -> Self {
        Self::new(ArrayD::from_elem(IxDyn(shape), value))
    }

    /// Zero-dimensional tensor holding a single value.
    pub fn scalar(value: f64) -> Self {
        Self::full(&[], value)
    }

    pub fn from_vec(data: Vec<f64>, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(QuorumError::shape(&[expected], &[data.len()], "from_vec"));
        }

        ArrayD::from_shape_vec(IxDyn(shape), data)
            .map(Self::new)
            .map_err(|_| QuorumError::shape(shape, &[expected], "from_vec"))
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    /// Elements in logical (row-major) order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn first(&self) -> Option<f64> {
        self.data.iter().next().copied()
    }

    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self::new(self.data.mapv(f))
    }

    /// Applies `f` pairwise after broadcasting both operands to a common shape.
    pub fn zip_with<F>(&self, other: &Self, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let shape = broadcast_shape(self.shape(), other.shape())?;
        let lhs = self.broadcast_view(&shape, other)?;
        let rhs = other.broadcast_view(&shape, self)?;

        let out = Zip::from(&lhs).and(&rhs).map_collect(|&a, &b| f(a, b));
        Ok(Self::new(out))
    }

    fn broadcast_view(
        &self,
        shape: &[usize],
        other: &Self,
    ) -> Result<ndarray::ArrayViewD<'_, f64>> {
        self.data
            .broadcast(IxDyn(shape))
            .ok_or_else(|| QuorumError::BroadcastMismatch {
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
            })
    }

    // Binary element-wise operations

    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, |a, b| a / b)
    }

    // Scalar operations

    pub fn add_scalar(&self, scalar: f64) -> Self {
        self.map(|x| x + scalar)
    }

    pub fn mul_scalar(&self, scalar: f64) -> Self {
        self.map(|x| x * scalar)
    }

    // Unary operations

    pub fn neg(&self) -> Self {
        self.map(|x| -x)
    }

    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    pub fn log(&self) -> Self {
        self.map(f64::ln)
    }

    pub fn relu(&self) -> Self {
        self.map(|x| x.max(0.0))
    }

    pub fn sigmoid(&self) -> Self {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    pub fn tanh(&self) -> Self {
        self.map(f64::tanh)
    }

    /// log(1 + exp(x)), rewritten as max(x, 0) + log(1 + exp(-|x|)) so large inputs do not overflow.
    pub fn softplus(&self) -> Self {
        self.map(|x| x.max(0.0) + (-x.abs()).exp().ln_1p())
    }

    pub fn clamp(&self, low: f64, high: f64) -> Self {
        self.map(|x| x.max(low).min(high))
    }

    // Selectors. They return 1.0 where the condition holds and 0.0 elsewhere.

    pub fn greater_scalar(&self, scalar: f64) -> Self {
        self.map(|x| if x > scalar { 1.0 } else { 0.0 })
    }

    pub fn greater_equal_scalar(&self, scalar: f64) -> Self {
        self.map(|x| if x >= scalar { 1.0 } else { 0.0 })
    }

    pub fn less_equal_scalar(&self, scalar: f64) -> Self {
        self.map(|x| if x <= scalar { 1.0 } else { 0.0 })
    }

    pub fn abs_less_scalar(&self, scalar: f64) -> Self {
        self.map(|x| if x.abs() < scalar { 1.0 } else { 0.0 })
    }

    // Reductions and shape manipulation

    pub fn sum_all(&self) -> f64 {
        self.data.sum()
    }

    /// Sums over the given axes, dropping them from the result.
    pub fn sum_axes(&self, axes: &[usize]) -> Result<Self> {
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        if let Some(&axis) = sorted.last() {
            if axis >= self.ndim() {
                return Err(QuorumError::shape(self.shape(), &[axis], "sum_axes"));
            }
        }

        // Reduce from the highest axis down so lower indices stay valid.
        let mut data = self.data.clone();
        for &axis in sorted.iter().rev() {
            data = data.sum_axis(Axis(axis));
        }
        Ok(Self::new(data))
    }

    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != self.size() {
            return Err(QuorumError::shape(shape, self.shape(), "reshape"));
        }
        Self::from_vec(self.to_vec(), shape)
    }

    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        self.data
            .broadcast(IxDyn(shape))
            .map(|view| Self::new(view.to_owned()))
            .ok_or_else(|| QuorumError::BroadcastMismatch {
                lhs: self.shape().to_vec(),
                rhs: shape.to_vec(),
            })
    }

    /// Largest absolute element-wise difference, used by gradient checks and tests.
    pub fn max_abs_diff(&self, other: &Self) -> Result<f64> {
        let diff = self.sub(other)?;
        Ok(diff.data.iter().fold(0.0_f64, |acc, &x| acc.max(x.abs())))
    }
}

impl From<ArrayD<f64>> for Tensor {
    fn from(data: ArrayD<f64>) -> Self {
        Self::new(data)
    }
}
