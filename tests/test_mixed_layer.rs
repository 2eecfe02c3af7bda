/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : MixedLayer 端到端测试：在默认搜索空间上按 softmax 后的架构权重求值
 *                 输入 [batch=2, C=8, 16, 16]，分别测试 stride=1（普通单元）与 stride=2（缩减单元）
 */
use only_nas::errors::NasError;
use only_nas::nn::{MixedLayer, MixedLayerConfig, Module, PRIMITIVES, TraitOperation, construct};
use only_nas::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.iter().map(|l| (l - max).exp()).collect::<Vec<_>>();
    let total = exps.iter().sum::<f32>();
    exps.iter().map(|e| e / total).collect()
}

#[test]
fn test_mixed_layer_normal_and_reduction_cells() -> Result<(), NasError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let x = Tensor::normal_with_rng(0.0, 1.0, &[2, 8, 16, 16], &mut rng);
    let weights = softmax(&[0.1, -0.3, 0.2, 0.5, 0.0, 0.4, -0.1, 0.3]);

    let mut normal = MixedLayer::new_seeded(8, 1, &PRIMITIVES, 1)?;
    let y = normal.forward(&x, &weights)?;
    assert_eq!(y.shape(), &[2, 8, 16, 16]);
    assert_eq!(normal.output_shape(x.shape())?, y.shape());
    assert!(y.to_vec().iter().all(|v| v.is_finite()));

    let mut reduction = MixedLayer::new_seeded(8, 2, &PRIMITIVES, 2)?;
    let z = reduction.forward(&x, &weights)?;
    assert_eq!(z.shape(), &[2, 8, 8, 8]);

    // 所有候选均为非仿射：参数只有卷积核
    assert_eq!(normal.num_params(), 4 + 4 + 2 + 2);
    // stride=2 时 skip_connect 变为 FactorizedReduce，多出两个 1x1 卷积核
    assert_eq!(reduction.num_params(), normal.num_params() + 2);
    Ok(())
}

#[test]
fn test_mixed_layer_stacked_cells() -> Result<(), NasError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let x = Tensor::normal_with_rng(0.0, 1.0, &[2, 8, 16, 16], &mut rng);
    let weights = vec![1.0 / 8.0; 8];

    // 普通 -> 缩减 -> 普通，空间尺寸 16 -> 8 -> 8
    let mut cells = [
        MixedLayer::new_seeded(8, 1, &PRIMITIVES, 10)?,
        MixedLayer::new_seeded(8, 2, &PRIMITIVES, 11)?,
        MixedLayer::new_seeded(8, 1, &PRIMITIVES, 12)?,
    ];
    let mut h = x;
    for cell in &mut cells {
        h = cell.forward(&h, &weights)?;
    }
    assert_eq!(h.shape(), &[2, 8, 8, 8]);

    for cell in &mut cells {
        cell.set_training(false);
    }
    let single = Tensor::normal_with_rng(0.0, 1.0, &[1, 8, 16, 16], &mut rng);
    let mut h = single;
    for cell in &mut cells {
        h = cell.forward(&h, &weights)?;
    }
    assert_eq!(h.shape(), &[1, 8, 8, 8]);
    Ok(())
}

#[test]
fn test_mixed_layer_from_json_config() -> Result<(), NasError> {
    init_logger();
    let config = MixedLayerConfig::from_json_str(
        r#"{
            "channels": 8,
            "stride": 2,
            "primitives": ["none", "max_pool_3x3", "skip_connect", "conv_7x1_1x7"],
            "seed": 5
        }"#,
    )?;
    let mut layer = MixedLayer::from_config(&config)?;
    assert_eq!(layer.len(), 4);

    let mut rng = StdRng::seed_from_u64(5);
    let x = Tensor::normal_with_rng(0.0, 1.0, &[2, 8, 8, 8], &mut rng);
    let y = layer.forward(&x, &[0.1, 0.2, 0.3, 0.4])?;
    assert_eq!(y.shape(), &[2, 8, 4, 4]);

    let err = layer.forward(&x, &[0.5, 0.5]).unwrap_err();
    assert_eq!(err, NasError::WeightCountMismatch { expected: 4, got: 2 });
    Ok(())
}

#[test]
fn test_construct_by_name() -> Result<(), NasError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(3);
    let x = Tensor::normal_with_rng(0.0, 1.0, &[2, 8, 8, 8], &mut rng);

    let mut op = construct("sep_conv_5x5", 8, 1, true)?;
    assert_eq!(op.forward(&x)?.shape(), &[2, 8, 8, 8]);

    assert_eq!(
        construct("max_pool_5x5", 8, 1, false).unwrap_err(),
        NasError::UnknownOperation("max_pool_5x5".to_string())
    );
    Ok(())
}
