// demos/quorum_mixture.rs
// Fits the mixing weights of a Quorum layer to data generated by a known mixture.
//
// Run with `RUST_LOG=debug cargo run --example quorum_mixture` to see layer and optimizer logs.

use quorum::nn::{ActivationFn, Module, Optimizer, Quorum, SGD, Sequential};
use quorum::{Engine, Result, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FEATURES: usize = 4;
const BATCH: usize = 128;
const EPOCHS: usize = 400;

// Ground truth: y = 0.7 * relu(x) + 0.3 * tanh(x)
fn synthetic_data(rng: &mut StdRng) -> Result<(Tensor, Tensor)> {
    let data: Vec<f64> = (0..BATCH * FEATURES)
        .map(|_| rng.random_range(-3.0..3.0))
        .collect();
    let x = Tensor::from_vec(data, &[BATCH, FEATURES])?;
    let y = x.relu().mul_scalar(0.7).add(&x.tanh().mul_scalar(0.3))?;
    Ok((x, y))
}

fn mse_step(model: &mut dyn Module, sgd: &mut SGD, x: &Tensor, y: &Tensor) -> Result<f64> {
    let mut graph = Engine::new();
    let input = graph.create_variable(x.clone(), false);
    let target = graph.create_variable(y.clone(), false);

    let prediction = model.forward(&mut graph, input)?;
    let diff = graph.sub(prediction, target)?;
    let sq = graph.mul(diff, diff)?;
    let loss = graph.mean(sq)?;

    graph.backward(loss)?;
    sgd.step(model.parameters_mut(), &graph)?;
    Ok(graph.get_data(loss)?.sum_all())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(1337);

    let (x, y) = synthetic_data(&mut rng)?;

    let mut model = Quorum::uniform(vec![
        ActivationFn::Relu,
        ActivationFn::Tanh,
        ActivationFn::Linear,
    ])?;
    model.build(&[FEATURES], &mut rng)?;

    let mut sgd = SGD::with_momentum(0.05, 0.9)?;
    for epoch in 0..EPOCHS {
        let loss = mse_step(&mut model, &mut sgd, &x, &y)?;
        if epoch % 50 == 0 || epoch == EPOCHS - 1 {
            println!("epoch {:>3}: loss {:.6}", epoch, loss);
        }
    }

    println!("Learned mixing weights (per feature):");
    for (f, weight) in model.activation_fns().iter().zip(model.weights()) {
        println!("  {:<8} {:?}", f.name(), weight.to_vec());
    }

    // A frozen relu/step mixture stacked on top, saved as a JSON config.
    let stacked = Sequential::new()
        .add(model)
        .add(Quorum::new(
            vec![ActivationFn::Relu, ActivationFn::Step],
            None,
            false,
            None,
        )?);
    println!("Model config:\n{}", stacked.config().to_json()?);

    Ok(())
}
