/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : BatchNorm2d 层单元测试（训练/评估模式、滑动统计量、仿射参数）
 */

use super::feature_map;
use crate::assert_err;
use crate::errors::NasError;
use crate::nn::layer::BatchNorm2d;
use crate::nn::{BatchNormConfig, Module};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// [1, 2, 1, 2]：通道0为 [1, 3]，通道1为 [2, 2]
fn two_channel_input() -> Tensor {
    Tensor::new(&[1.0, 3.0, 2.0, 2.0], &[1, 2, 1, 2])
}

#[test]
fn test_batch_norm2d_training_normalizes_per_channel() {
    let mut bn = BatchNorm2d::new(2, false);
    let out = bn.forward(&two_channel_input()).unwrap();
    assert_eq!(out.shape(), &[1, 2, 1, 2]);

    // 通道0：均值2，有偏方差1
    let inv_std = 1.0 / (1.0f32 + 1e-5).sqrt();
    assert_abs_diff_eq!(out[[0, 0, 0, 0]], -inv_std, epsilon = 1e-6);
    assert_abs_diff_eq!(out[[0, 0, 0, 1]], inv_std, epsilon = 1e-6);
    // 通道1：方差为0，归一化后全为0
    assert_abs_diff_eq!(out[[0, 1, 0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out[[0, 1, 0, 1]], 0.0, epsilon = 1e-6);
}

#[test]
fn test_batch_norm2d_running_statistics() {
    let mut bn = BatchNorm2d::new(2, false);
    assert_eq!(bn.running_mean(), &[0.0, 0.0]);
    assert_eq!(bn.running_var(), &[1.0, 1.0]);

    bn.forward(&two_channel_input()).unwrap();
    assert_eq!(bn.num_batches_tracked(), 1);
    // running_mean = 0.9 * 0 + 0.1 * mean
    assert_abs_diff_eq!(bn.running_mean()[0], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(bn.running_mean()[1], 0.2, epsilon = 1e-6);
    // running_var 使用无偏方差：通道0为 1 * 2/1 = 2
    assert_abs_diff_eq!(bn.running_var()[0], 1.1, epsilon = 1e-6);
    assert_abs_diff_eq!(bn.running_var()[1], 0.9, epsilon = 1e-6);
}

#[test]
fn test_batch_norm2d_custom_momentum() {
    let config = BatchNormConfig {
        eps: 1e-5,
        momentum: 0.5,
    };
    let mut bn = BatchNorm2d::with_config(2, false, config);
    bn.forward(&two_channel_input()).unwrap();
    assert_abs_diff_eq!(bn.running_mean()[0], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bn.running_var()[0], 1.5, epsilon = 1e-6);
}

#[test]
fn test_batch_norm2d_eval_uses_running_statistics() {
    let mut bn = BatchNorm2d::new(2, false);
    bn.forward(&two_channel_input()).unwrap();

    bn.set_training(false);
    assert!(!bn.is_training());
    let out = bn.forward(&two_channel_input()).unwrap();
    assert_abs_diff_eq!(
        out[[0, 0, 0, 0]],
        (1.0 - 0.2) / (1.1f32 + 1e-5).sqrt(),
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        out[[0, 1, 0, 0]],
        (2.0 - 0.2) / (0.9f32 + 1e-5).sqrt(),
        epsilon = 1e-5
    );
    // 评估模式不更新统计量
    assert_eq!(bn.num_batches_tracked(), 1);
}

#[test]
fn test_batch_norm2d_single_value_per_channel() {
    let mut bn = BatchNorm2d::new(2, false);
    let x = Tensor::new(&[1.0, 2.0], &[1, 2, 1, 1]);
    assert_err!(bn.forward(&x), NasError::InvalidInput(_));
    assert_eq!(bn.num_batches_tracked(), 0);

    // 评估模式下单个值没有问题
    bn.set_training(false);
    assert!(bn.forward(&x).is_ok());
}

#[test]
fn test_batch_norm2d_output_statistics() {
    let x = feature_map(&[4, 3, 5, 5], 7) * 3.0 + 1.5;
    let mut bn = BatchNorm2d::new(3, false);
    let out = bn.forward(&x).unwrap();

    let count = (4 * 5 * 5) as f32;
    for c in 0..3 {
        let mut sum = 0.0;
        let mut sq = 0.0;
        for b in 0..4 {
            for h in 0..5 {
                for w in 0..5 {
                    let v = out[[b, c, h, w]];
                    sum += v;
                    sq += v * v;
                }
            }
        }
        assert_abs_diff_eq!(sum / count, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(sq / count, 1.0, epsilon = 1e-3);
    }
}

#[test]
fn test_batch_norm2d_affine_parameters() {
    let bn = BatchNorm2d::new(4, true);
    assert!(bn.is_affine());
    assert_eq!(bn.num_params(), 2);
    assert_eq!(bn.num_param_elements(), 8);
    let params = bn.parameters();
    assert_eq!(params[0], &Tensor::ones(&[4]));
    assert_eq!(params[1], &Tensor::zeros(&[4]));

    let bn = BatchNorm2d::new(4, false);
    assert!(!bn.is_affine());
    assert!(bn.parameters().is_empty());
}

#[test]
fn test_batch_norm2d_affine_scale_and_shift() {
    let mut bn = BatchNorm2d::new(2, true);
    {
        let mut params = bn.parameters_mut();
        *params[0] = Tensor::new(&[2.0, 1.0], &[2]);
        *params[1] = Tensor::new(&[0.5, -1.0], &[2]);
    }
    let out = bn.forward(&two_channel_input()).unwrap();
    let inv_std = 1.0 / (1.0f32 + 1e-5).sqrt();
    assert_abs_diff_eq!(out[[0, 0, 0, 1]], 2.0 * inv_std + 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(out[[0, 1, 0, 0]], -1.0, epsilon = 1e-5);
}

#[test]
fn test_batch_norm2d_channel_mismatch() {
    let mut bn = BatchNorm2d::new(3, false);
    assert_err!(
        bn.forward(&two_channel_input()),
        NasError::ShapeMismatch { expected, got, .. } if expected == &[3] && got == &[2]
    );
}
