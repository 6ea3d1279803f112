// Initialization schemes for layer parameters.
// Every scheme draws from a generator passed in by the caller so builds are reproducible
// under a fixed seed.
use crate::error::{QuorumError, Result};
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

/// Named initialization schemes, resolvable from the names used in layer configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initializer {
    #[default]
    Zero,
    One,
    /// U(-0.05, 0.05)
    Uniform,
    /// N(0, 0.05)
    Normal,
    /// U(-a, a) with a = sqrt(3 / fan_in)
    LecunUniform,
    /// U(-a, a) with a = sqrt(6 / (fan_in + fan_out))
    GlorotUniform,
    /// N(0, std) with std = sqrt(2 / (fan_in + fan_out))
    GlorotNormal,
    /// U(-a, a) with a = sqrt(6 / fan_in)
    HeUniform,
    /// N(0, std) with std = sqrt(2 / fan_in)
    HeNormal,
}

impl Initializer {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "zero" | "zeros" => Ok(Initializer::Zero),
            "one" | "ones" => Ok(Initializer::One),
            "uniform" => Ok(Initializer::Uniform),
            "normal" => Ok(Initializer::Normal),
            "lecun_uniform" => Ok(Initializer::LecunUniform),
            "glorot_uniform" | "xavier_uniform" => Ok(Initializer::GlorotUniform),
            "glorot_normal" | "xavier_normal" => Ok(Initializer::GlorotNormal),
            "he_uniform" | "kaiming_uniform" => Ok(Initializer::HeUniform),
            "he_normal" | "kaiming_normal" => Ok(Initializer::HeNormal),
            other => Err(QuorumError::config(format!(
                "unknown initialization scheme '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Initializer::Zero => "zero",
            Initializer::One => "one",
            Initializer::Uniform => "uniform",
            Initializer::Normal => "normal",
            Initializer::LecunUniform => "lecun_uniform",
            Initializer::GlorotUniform => "glorot_uniform",
            Initializer::GlorotNormal => "glorot_normal",
            Initializer::HeUniform => "he_uniform",
            Initializer::HeNormal => "he_normal",
        }
    }

    /// Fills a tensor of `shape` according to this scheme.
    pub fn init<R: Rng + ?Sized>(&self, shape: &[usize], rng: &mut R) -> Result<Tensor> {
        let (fan_in, fan_out) = fans(shape);
        match self {
            Initializer::Zero => Ok(Tensor::zeros(shape)),
            Initializer::One => Ok(Tensor::ones(shape)),
            Initializer::Uniform => uniform(shape, 0.05, rng),
            Initializer::Normal => normal(shape, 0.05, rng),
            Initializer::LecunUniform => uniform(shape, (3.0 / fan_in).sqrt(), rng),
            Initializer::GlorotUniform => uniform(shape, (6.0 / (fan_in + fan_out)).sqrt(), rng),
            Initializer::GlorotNormal => normal(shape, (2.0 / (fan_in + fan_out)).sqrt(), rng),
            Initializer::HeUniform => uniform(shape, (6.0 / fan_in).sqrt(), rng),
            Initializer::HeNormal => normal(shape, (2.0 / fan_in).sqrt(), rng),
        }
    }
}

// Fan-in / fan-out of a parameter shape. Per-feature vectors use their single dimension for both.
fn fans(shape: &[usize]) -> (f64, f64) {
    match shape {
        [] => (1.0, 1.0),
        [n] => (*n as f64, *n as f64),
        [rows, cols] => (*rows as f64, *cols as f64),
        [first, rest @ ..] => (rest.iter().product::<usize>() as f64, *first as f64),
    }
}

/// Samples every element from U(-scale, scale).
pub fn uniform<R: Rng + ?Sized>(shape: &[usize], scale: f64, rng: &mut R) -> Result<Tensor> {
    let dist = Uniform::new_inclusive(-scale, scale)
        .map_err(|e| QuorumError::config(format!("invalid uniform scale {}: {}", scale, e)))?;
    sample(shape, &dist, rng)
}

/// Samples every element from N(0, std).
pub fn normal<R: Rng + ?Sized>(shape: &[usize], std: f64, rng: &mut R) -> Result<Tensor> {
    let dist = Normal::new(0.0, std)
        .map_err(|e| QuorumError::config(format!("invalid normal std {}: {}", std, e)))?;
    sample(shape, &dist, rng)
}

fn sample<D, R>(shape: &[usize], dist: &D, rng: &mut R) -> Result<Tensor>
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    let total: usize = shape.iter().product();
    let data = (0..total).map(|_| dist.sample(rng)).collect();
    Tensor::from_vec(data, shape)
}
