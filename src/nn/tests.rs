#[cfg(test)]
mod tests {
    use crate::error::QuorumError;
    use crate::graph::Engine;
    use crate::nn::activations::ActivationFn;
    use crate::nn::config::LayerConfig;
    use crate::nn::initializers::Initializer;
    use crate::nn::layers::*;
    use crate::nn::module::Module;
    use crate::tensor::Tensor;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn run(layer: &dyn Module, data: Vec<f64>, shape: &[usize]) -> Tensor {
        let mut graph = Engine::new();
        let x = graph.tensor_from_vec(data, shape, false).unwrap();
        let y = layer.forward(&mut graph, x).unwrap();
        graph.get_data(y).unwrap()
    }

    fn assert_all_close(actual: &Tensor, expected: &[f64]) {
        let actual = actual.to_vec();
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    fn sum_of_outputs(layer: &dyn Module, x: &Tensor) -> f64 {
        let mut graph = Engine::new();
        let input = graph.create_variable(x.clone(), false);
        let out = layer.forward(&mut graph, input).unwrap();
        let loss = graph.sum(out).unwrap();
        graph.get_data(loss).unwrap().sum_all()
    }

    // Compares backward() gradients of sum(layer(x)) with central differences.
    fn check_parameter_gradients(layer: &mut dyn Module, x: &Tensor) {
        let mut graph = Engine::new();
        let input = graph.create_variable(x.clone(), false);
        let out = layer.forward(&mut graph, input).unwrap();
        let loss = graph.sum(out).unwrap();
        graph.backward(loss).unwrap();

        let analytic: Vec<Vec<f64>> = layer
            .parameters()
            .iter()
            .map(|p| p.gradient(&graph).unwrap().to_vec())
            .collect();
        assert!(!analytic.is_empty());

        let eps = 1e-6;
        for (pi, grads) in analytic.iter().enumerate() {
            let original = layer.parameters()[pi].data.clone();
            let shape = original.shape().to_vec();

            for (j, &grad) in grads.iter().enumerate() {
                let mut plus = original.to_vec();
                plus[j] += eps;
                layer.parameters_mut()[pi].data = Tensor::from_vec(plus, &shape).unwrap();
                let loss_plus = sum_of_outputs(layer, x);

                let mut minus = original.to_vec();
                minus[j] -= eps;
                layer.parameters_mut()[pi].data = Tensor::from_vec(minus, &shape).unwrap();
                let loss_minus = sum_of_outputs(layer, x);

                layer.parameters_mut()[pi].data = original.clone();

                let numeric = (loss_plus - loss_minus) / (2.0 * eps);
                assert_relative_eq!(grad, numeric, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    // ============================================================================
    // FIXED-SCALAR ACTIVATIONS
    // ============================================================================

    #[test]
    fn test_leaky_relu_default_slope() {
        let layer = LeakyReLU::default();
        assert_eq!(layer.alpha(), 0.3);

        let y = run(&layer, vec![-2.0, -0.5, 0.0, 4.0], &[2, 2]);
        assert_all_close(&y, &[-0.6, -0.15, 0.0, 4.0]);
    }

    #[test]
    fn test_elu_at_zero_and_far_negative() {
        let layer = ELU::default();
        let y = run(&layer, vec![0.0, 2.0, -50.0], &[1, 3]);
        let values = y.to_vec();

        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 2.0);
        assert_relative_eq!(values[2], -1.0, epsilon = 1e-12);

        let scaled = ELU::new(0.5).unwrap();
        let y = run(&scaled, vec![-1.0], &[1, 1]);
        assert_relative_eq!(y.to_vec()[0], 0.5 * ((-1.0_f64).exp() - 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_elu_gradient_matches_derivative() {
        let layer = ELU::default();
        let mut graph = Engine::new();
        let x = graph
            .tensor_from_vec(vec![-1.0, 2.0], &[1, 2], true)
            .unwrap();
        let y = layer.forward(&mut graph, x).unwrap();
        let loss = graph.sum(y).unwrap();
        graph.backward(loss).unwrap();

        let grad = graph.get_gradient(x).unwrap().to_vec();
        assert_relative_eq!(grad[0], (-1.0_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(grad[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_thresholded_linear_keeps_boundary() {
        let layer = ThresholdedLinear::default();
        let y = run(
            &layer,
            vec![-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5],
            &[1, 7],
        );
        assert_all_close(&y, &[-1.5, -1.0, 0.0, 0.0, 0.0, 1.0, 1.5]);
    }

    #[test]
    fn test_thresholded_relu_is_strict() {
        let layer = ThresholdedReLU::new(1.0).unwrap();
        let y = run(&layer, vec![-3.0, 0.5, 1.0, 1.5], &[1, 4]);
        assert_all_close(&y, &[0.0, 0.0, 0.0, 1.5]);
    }

    #[test]
    fn test_scalar_layers_reject_non_finite_arguments() {
        assert!(matches!(
            LeakyReLU::new(f64::NAN),
            Err(QuorumError::Configuration(_))
        ));
        assert!(ELU::new(f64::INFINITY).is_err());
        assert!(ThresholdedLinear::new(f64::NAN).is_err());
        assert!(ThresholdedReLU::new(f64::NEG_INFINITY).is_err());
    }

    // ============================================================================
    // PARAMETRIC ACTIVATIONS
    // ============================================================================

    #[test]
    fn test_prelu_with_zero_alphas_is_relu() {
        let mut layer = PReLU::new();
        layer.build(&[4], &mut rng()).unwrap();
        assert_eq!(layer.num_parameters(), 4);

        let y = run(&layer, vec![-3.0, -0.1, 0.0, 2.5, 1.0, -1.0, 7.0, -7.0], &[2, 4]);
        assert_all_close(&y, &[0.0, 0.0, 0.0, 2.5, 1.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_prelu_explicit_weights() {
        let alphas = Tensor::from_vec(vec![0.1, 0.5], &[2]).unwrap();
        let mut layer = PReLU::new().with_weights(vec![alphas.clone()]);
        layer.build(&[2], &mut rng()).unwrap();

        assert_eq!(layer.weights(), vec![&alphas]);
        let y = run(&layer, vec![-2.0, -2.0, 3.0, 3.0], &[2, 2]);
        assert_all_close(&y, &[-0.2, -1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_prelu_explicit_weights_checked_at_build() {
        let mut layer = PReLU::new().with_weights(vec![Tensor::zeros(&[3])]);
        let err = layer.build(&[2], &mut rng()).unwrap_err();
        assert!(matches!(err, QuorumError::ShapeMismatch { .. }));
        assert!(!layer.is_built());

        let mut layer = PReLU::new().with_weights(vec![]);
        assert!(matches!(
            layer.build(&[2], &mut rng()),
            Err(QuorumError::Configuration(_))
        ));
    }

    #[test]
    fn test_prelu_random_init_is_reproducible() {
        let mut a = PReLU::new().with_init(Initializer::HeNormal);
        let mut b = PReLU::new().with_init(Initializer::HeNormal);
        a.build(&[5], &mut rng()).unwrap();
        b.build(&[5], &mut rng()).unwrap();
        assert_eq!(a.weights(), b.weights());
    }

    #[test]
    fn test_prelu_gradients() {
        let alphas = Tensor::from_vec(vec![0.25, -0.5, 1.5], &[3]).unwrap();
        let mut layer = PReLU::new().with_weights(vec![alphas]);
        layer.build(&[3], &mut rng()).unwrap();

        let x = Tensor::from_vec(vec![-1.0, 2.0, -3.0, 0.5, -0.25, 4.0], &[2, 3]).unwrap();
        check_parameter_gradients(&mut layer, &x);
    }

    #[test]
    fn test_prelu_applied_twice_in_one_graph_sums_gradients() {
        let alphas = Tensor::from_vec(vec![0.5], &[1]).unwrap();
        let mut layer = PReLU::new().with_weights(vec![alphas]);
        layer.build(&[1], &mut rng()).unwrap();

        let mut graph = Engine::new();
        let a = graph.tensor_from_vec(vec![-2.0], &[1, 1], false).unwrap();
        let b = graph.tensor_from_vec(vec![-4.0], &[1, 1], false).unwrap();
        let ya = layer.forward(&mut graph, a).unwrap();
        let yb = layer.forward(&mut graph, b).unwrap();
        let both = graph.add(ya, yb).unwrap();
        let loss = graph.sum(both).unwrap();
        graph.backward(loss).unwrap();

        let grad = layer.alphas().unwrap().gradient(&graph).unwrap();
        assert_relative_eq!(grad.to_vec()[0], -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quorum_shared_across_branches_sums_gradients() {
        let mut layer = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap();
        layer.build(&[1], &mut rng()).unwrap();

        // loss = quorum(quorum(x)) with x = 3, weights 0.5 each: inner = 3, outer = 3
        let mut graph = Engine::new();
        let x = graph.tensor_from_vec(vec![3.0], &[1, 1], false).unwrap();
        let inner = layer.forward(&mut graph, x).unwrap();
        let outer = layer.forward(&mut graph, inner).unwrap();
        let loss = graph.sum(outer).unwrap();
        graph.backward(loss).unwrap();

        // d/dw_k = f_k(inner) + (w_relu + w_lin) * f_k(x) = 3 + 1 * 3
        for weight in layer.parameters() {
            let grad = weight.gradient(&graph).unwrap();
            assert_relative_eq!(grad.to_vec()[0], 6.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_parametric_softplus_defaults() {
        let mut layer = ParametricSoftplus::default();
        layer.build(&[2], &mut rng()).unwrap();
        assert_eq!(layer.alphas().unwrap().data.to_vec(), vec![0.2, 0.2]);
        assert_eq!(layer.betas().unwrap().data.to_vec(), vec![5.0, 5.0]);

        let y = run(&layer, vec![0.0, 1.0], &[1, 2]);
        let values = y.to_vec();
        assert_relative_eq!(values[0], 0.2 * 2.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.2 * (1.0 + 5.0_f64.exp()).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_parametric_softplus_gradients() {
        let mut layer = ParametricSoftplus::new(0.3, 2.0).unwrap();
        layer.build(&[2], &mut rng()).unwrap();

        let x = Tensor::from_vec(vec![-0.5, 0.75, 1.25, -2.0], &[2, 2]).unwrap();
        check_parameter_gradients(&mut layer, &x);
    }

    #[test]
    fn test_parametric_softplus_set_weights_order() {
        let mut layer = ParametricSoftplus::default();
        layer.build(&[1], &mut rng()).unwrap();

        let alphas = Tensor::from_vec(vec![1.0], &[1]).unwrap();
        let betas = Tensor::from_vec(vec![1.0], &[1]).unwrap();
        layer.set_weights(vec![alphas, betas]).unwrap();

        let y = run(&layer, vec![0.0], &[1, 1]);
        assert_relative_eq!(y.to_vec()[0], 2.0_f64.ln(), epsilon = 1e-12);
    }

    // ============================================================================
    // BUILD / WEIGHT LIFECYCLE
    // ============================================================================

    #[test]
    fn test_forward_before_build_fails() {
        let layer = PReLU::new();
        let mut graph = Engine::new();
        let x = graph.tensor_from_vec(vec![1.0], &[1, 1], false).unwrap();

        let err = layer.forward(&mut graph, x).unwrap_err();
        assert!(matches!(err, QuorumError::NotBuilt(name) if name == "PReLU"));

        let quorum = Quorum::uniform(vec![ActivationFn::Relu]).unwrap();
        assert!(matches!(
            quorum.forward(&mut graph, x),
            Err(QuorumError::NotBuilt(_))
        ));
    }

    #[test]
    fn test_rebuild_same_shape_is_noop() {
        let mut layer = PReLU::new();
        layer.build(&[2], &mut rng()).unwrap();
        layer
            .set_weights(vec![Tensor::from_vec(vec![0.5, 0.5], &[2]).unwrap()])
            .unwrap();

        layer.build(&[2], &mut rng()).unwrap();
        assert_eq!(layer.weights()[0].to_vec(), vec![0.5, 0.5]);

        let err = layer.build(&[3], &mut rng()).unwrap_err();
        assert!(matches!(err, QuorumError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_set_weights_validation() {
        let mut layer = ParametricSoftplus::default();
        assert!(matches!(
            layer.set_weights(vec![Tensor::zeros(&[2]), Tensor::zeros(&[2])]),
            Err(QuorumError::NotBuilt(_))
        ));

        layer.build(&[2], &mut rng()).unwrap();
        assert!(matches!(
            layer.set_weights(vec![Tensor::zeros(&[2])]),
            Err(QuorumError::Configuration(_))
        ));
        assert!(matches!(
            layer.set_weights(vec![Tensor::zeros(&[2]), Tensor::zeros(&[3])]),
            Err(QuorumError::ShapeMismatch { .. })
        ));
        // A rejected call leaves every weight untouched.
        assert_eq!(layer.alphas().unwrap().data.to_vec(), vec![0.2, 0.2]);

        let mut stateless = ELU::default();
        assert!(stateless.set_weights(vec![]).is_ok());
        assert!(stateless.set_weights(vec![Tensor::zeros(&[1])]).is_err());
    }

    #[test]
    fn test_input_must_match_built_features() {
        let mut layer = PReLU::new();
        layer.build(&[3], &mut rng()).unwrap();

        let mut graph = Engine::new();
        let x = graph.tensor_from_vec(vec![1.0, 2.0], &[1, 2], false).unwrap();
        let err = layer.forward(&mut graph, x).unwrap_err();
        assert!(matches!(err, QuorumError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_training_mode_toggles() {
        let mut layer = Quorum::uniform(vec![ActivationFn::Tanh]).unwrap();
        assert!(layer.training());
        layer.eval();
        assert!(!layer.training());
        layer.train();
        assert!(layer.training());
    }

    // ============================================================================
    // QUORUM
    // ============================================================================

    #[test]
    fn test_quorum_relu_identity_example() {
        let mut layer = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap();
        layer.build(&[3], &mut rng()).unwrap();

        let y = run(&layer, vec![-2.0, 0.0, 3.0], &[1, 3]);
        assert_eq!(y.shape(), &[1, 3]);
        assert_all_close(&y, &[-1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_quorum_of_copies_reduces_to_function() {
        let k = 3;
        let mut layer = Quorum::uniform(vec![ActivationFn::Tanh; k]).unwrap();
        layer.build(&[4], &mut rng()).unwrap();

        let data = vec![-2.0, -0.3, 0.0, 1.7, 0.4, -1.1, 2.2, 5.0];
        let y = run(&layer, data.clone(), &[2, 4]);
        for (actual, x) in y.to_vec().iter().zip(&data) {
            assert_relative_eq!(*actual, x.tanh(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_quorum_construction_errors() {
        assert!(matches!(
            Quorum::uniform(vec![]),
            Err(QuorumError::Configuration(_))
        ));
        assert!(matches!(
            Quorum::new(
                vec![ActivationFn::Relu, ActivationFn::Tanh],
                Some(vec![1.0]),
                true,
                None
            ),
            Err(QuorumError::Configuration(_))
        ));
        assert!(matches!(
            Quorum::new(vec![ActivationFn::Relu], None, true, Some(0.0)),
            Err(QuorumError::Configuration(_))
        ));
        assert!(Quorum::new(vec![ActivationFn::Relu], None, true, Some(f64::NAN)).is_err());
        assert!(Quorum::new(vec![ActivationFn::Relu], Some(vec![f64::INFINITY]), true, None).is_err());
    }

    #[test]
    fn test_default_weights_come_from_factory() {
        assert_eq!(uniform_weights(4), vec![0.25; 4]);
        let layer = Quorum::uniform(vec![ActivationFn::Relu; 4]).unwrap();
        assert_eq!(layer.activation_weights_init(), &[0.25; 4]);
    }

    #[test]
    fn test_quorum_threshold_clips_effective_weights_only() {
        let mut layer = Quorum::new(
            vec![ActivationFn::Linear, ActivationFn::Linear],
            Some(vec![2.0, -1.0]),
            true,
            Some(1.0),
        )
        .unwrap();
        layer.build(&[1], &mut rng()).unwrap();

        let effective = layer.effective_weights();
        assert_eq!(effective[0].to_vec(), vec![1.0]);
        assert_eq!(effective[1].to_vec(), vec![0.0]);

        let y = run(&layer, vec![3.0], &[1, 1]);
        assert_eq!(y.to_vec(), vec![3.0]);

        // Stored weights keep their unclipped values.
        assert_eq!(layer.weights()[0].to_vec(), vec![2.0]);
        assert_eq!(layer.weights()[1].to_vec(), vec![-1.0]);
    }

    #[test]
    fn test_quorum_without_threshold_uses_raw_weights() {
        let mut layer = Quorum::new(
            vec![ActivationFn::Linear, ActivationFn::Linear],
            Some(vec![2.0, -1.0]),
            true,
            None,
        )
        .unwrap();
        layer.build(&[1], &mut rng()).unwrap();

        let y = run(&layer, vec![3.0], &[1, 1]);
        assert_eq!(y.to_vec(), vec![3.0]);
        let y = run(&layer, vec![-2.0], &[1, 1]);
        assert_eq!(y.to_vec(), vec![-2.0]);
    }

    #[test]
    fn test_quorum_weight_gradients() {
        let mut layer = Quorum::new(
            vec![ActivationFn::Relu, ActivationFn::Sigmoid, ActivationFn::Softplus],
            Some(vec![0.2, 0.5, 0.3]),
            true,
            None,
        )
        .unwrap();
        layer.build(&[2], &mut rng()).unwrap();

        let x = Tensor::from_vec(vec![-1.5, 0.5, 2.0, -0.25], &[2, 2]).unwrap();
        check_parameter_gradients(&mut layer, &x);
    }

    #[test]
    fn test_clipped_weights_get_no_gradient_outside_range() {
        let mut layer = Quorum::new(
            vec![ActivationFn::Linear, ActivationFn::Linear],
            Some(vec![2.0, 0.5]),
            true,
            Some(1.0),
        )
        .unwrap();
        layer.build(&[1], &mut rng()).unwrap();

        let mut graph = Engine::new();
        let x = graph.tensor_from_vec(vec![3.0], &[1, 1], false).unwrap();
        let y = layer.forward(&mut graph, x).unwrap();
        let loss = graph.sum(y).unwrap();
        graph.backward(loss).unwrap();

        let grads: Vec<f64> = layer
            .parameters()
            .iter()
            .map(|p| p.gradient(&graph).unwrap().to_vec()[0])
            .collect();
        assert_eq!(grads, vec![0.0, 3.0]);
    }

    #[test]
    fn test_non_trainable_quorum() {
        let mut layer = Quorum::new(
            vec![ActivationFn::Relu, ActivationFn::Step],
            None,
            false,
            None,
        )
        .unwrap();
        layer.build(&[2], &mut rng()).unwrap();

        assert!(layer.parameters().is_empty());
        assert_eq!(layer.num_parameters(), 0);
        assert_eq!(layer.weights().len(), 2);
        assert!(layer.activation_weights().iter().all(|w| !w.requires_grad));

        let y = run(&layer, vec![-1.0, 2.0], &[1, 2]);
        assert_all_close(&y, &[0.0, 1.5]);
    }

    #[test]
    fn test_quorum_with_custom_function() {
        let square = ActivationFn::custom("square", |graph, x| graph.mul(x, x));
        let mut layer =
            Quorum::new(vec![square, ActivationFn::Linear], Some(vec![1.0, 1.0]), true, None)
                .unwrap();
        layer.build(&[2], &mut rng()).unwrap();

        let y = run(&layer, vec![-2.0, 3.0], &[1, 2]);
        assert_all_close(&y, &[2.0, 12.0]);
    }

    #[test]
    fn test_quorum_accepts_higher_rank_features() {
        let mut layer = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap();
        layer.build(&[2, 2], &mut rng()).unwrap();
        assert_eq!(layer.weights()[0].shape(), &[2, 2]);

        let y = run(&layer, vec![-2.0, 2.0, -4.0, 4.0], &[1, 2, 2]);
        assert_all_close(&y, &[-1.0, 2.0, -2.0, 4.0]);
    }

    // ============================================================================
    // SEQUENTIAL
    // ============================================================================

    #[test]
    fn test_sequential_builds_and_chains() {
        let mut model = Sequential::new()
            .add(PReLU::new())
            .add(Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap());
        assert_eq!(model.len(), 2);
        assert!(!model.is_built());

        model.build(&[3], &mut rng()).unwrap();
        assert!(model.is_built());
        assert_eq!(model.parameters().len(), 3);
        assert_eq!(model.num_parameters(), 9);

        // PReLU with zero alphas is relu, and the relu/linear mix of a relu output is identity.
        let y = run(&model, vec![-2.0, 0.0, 3.0], &[1, 3]);
        assert_all_close(&y, &[0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_sequential_set_weights_splits_per_layer() {
        let mut model = Sequential::new()
            .add(ELU::default())
            .add(PReLU::new())
            .add(ParametricSoftplus::default());
        model.build(&[1], &mut rng()).unwrap();
        assert_eq!(model.weights().len(), 3);

        let ones = || Tensor::ones(&[1]);
        model.set_weights(vec![ones(), ones(), ones()]).unwrap();
        assert!(model.weights().iter().all(|w| w.to_vec() == vec![1.0]));

        assert!(model.set_weights(vec![ones()]).is_err());
    }

    #[test]
    fn test_sequential_training_mode_propagates() {
        let mut model = Sequential::new().add(LeakyReLU::default()).add(ELU::default());
        model.eval();
        assert!(model.iter().all(|layer| !layer.training()));
    }

    // ============================================================================
    // CONFIG SERIALIZATION
    // ============================================================================

    #[test]
    fn test_layer_configs_round_trip() {
        let layers: Vec<Box<dyn Module>> = vec![
            Box::new(LeakyReLU::new(0.1).unwrap()),
            Box::new(PReLU::new().with_init(Initializer::GlorotUniform)),
            Box::new(ELU::new(0.7).unwrap()),
            Box::new(ParametricSoftplus::new(0.4, 3.0).unwrap()),
            Box::new(ThresholdedLinear::new(0.5).unwrap()),
            Box::new(ThresholdedReLU::new(2.0).unwrap()),
            Box::new(
                Quorum::new(
                    vec![ActivationFn::Relu, ActivationFn::Step],
                    Some(vec![0.7, 0.3]),
                    false,
                    Some(1.0),
                )
                .unwrap(),
            ),
        ];

        for layer in layers {
            let config = layer.config();
            let json = config.to_json().unwrap();
            let parsed = LayerConfig::from_json(&json).unwrap();
            assert_eq!(parsed, config);

            let revived = parsed.build_layer().unwrap();
            assert_eq!(revived.config(), config);
        }
    }

    #[test]
    fn test_quorum_config_fields() {
        let layer = Quorum::uniform(vec![ActivationFn::Relu, ActivationFn::Linear]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&layer.config().to_json().unwrap()).unwrap();

        assert_eq!(value["name"], "Quorum");
        assert_eq!(value["activation_fns"], serde_json::json!(["relu", "linear"]));
        assert_eq!(value["activation_weights_init"], serde_json::json!([0.5, 0.5]));
        assert_eq!(value["trainable"], true);
        assert!(value["threshold"].is_null());
    }

    #[test]
    fn test_sequential_config_is_a_list() {
        let model = Sequential::new()
            .add(PReLU::new())
            .add(Quorum::uniform(vec![ActivationFn::Tanh]).unwrap());
        let config = model.config();

        let LayerConfig::Sequential { layers } = &config else {
            panic!("expected a Sequential config");
        };
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name(), "PReLU");

        let revived = LayerConfig::from_json(&config.to_json().unwrap())
            .unwrap()
            .build_layer()
            .unwrap();
        assert_eq!(revived.config(), config);
    }

    #[test]
    fn test_custom_function_cannot_be_revived() {
        let cube = ActivationFn::custom("cube", |graph, x| {
            let sq = graph.mul(x, x)?;
            graph.mul(sq, x)
        });
        let layer = Quorum::uniform(vec![cube]).unwrap();
        let config = layer.config();

        let err = config.build_layer().unwrap_err();
        assert!(matches!(err, QuorumError::Configuration(msg) if msg.contains("cube")));
    }

    #[test]
    fn test_bad_json_is_a_serialization_error() {
        assert!(matches!(
            LayerConfig::from_json(r#"{"name": "Maxout"}"#),
            Err(QuorumError::Serialization(_))
        ));
        assert!(matches!(
            LayerConfig::from_json(r#"{"name": "PReLU", "init": "bogus"}"#)
                .unwrap()
                .build_layer(),
            Err(QuorumError::Configuration(_))
        ));
    }
}
