/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Conv2d / 池化层单元测试
 */

use super::{feature_map, seeded_rng};
use crate::assert_err;
use crate::errors::NasError;
use crate::nn::Module;
use crate::nn::functional::{self, Conv2dParams};
use crate::nn::layer::{AvgPool2d, Conv2d, MaxPool2d};
use crate::tensor::Tensor;

#[test]
fn test_conv2d_new_kernel_shape() {
    let mut rng = seeded_rng(42);
    let conv = Conv2d::new(4, 8, (3, 3), Conv2dParams::new((1, 1), (1, 1)), &mut rng).unwrap();
    assert_eq!(conv.kernel().shape(), &[8, 4, 3, 3]);
    assert_eq!(conv.in_channels(), 4);
    assert_eq!(conv.out_channels(), 8);
    assert_eq!(conv.num_param_elements(), 8 * 4 * 9);

    // 逐通道卷积每个输出通道只看 1 个输入通道
    let dw = Conv2d::new(
        4,
        4,
        (5, 5),
        Conv2dParams::new((1, 1), (2, 2)).with_groups(4),
        &mut rng,
    )
    .unwrap();
    assert_eq!(dw.kernel().shape(), &[4, 1, 5, 5]);
}

#[test]
fn test_conv2d_seeded_is_reproducible() {
    let params = Conv2dParams::default();
    let a = Conv2d::new(3, 3, (3, 3), params, &mut seeded_rng(1)).unwrap();
    let b = Conv2d::new(3, 3, (3, 3), params, &mut seeded_rng(1)).unwrap();
    let c = Conv2d::new(3, 3, (3, 3), params, &mut seeded_rng(2)).unwrap();
    assert_eq!(a.kernel(), b.kernel());
    assert_ne!(a.kernel(), c.kernel());
}

#[test]
fn test_conv2d_new_invalid_config() {
    let mut rng = seeded_rng(0);
    assert_err!(
        Conv2d::new(0, 4, (3, 3), Conv2dParams::default(), &mut rng),
        NasError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(3, 4, (3, 3), Conv2dParams::default().with_groups(2), &mut rng),
        NasError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(4, 4, (0, 3), Conv2dParams::default(), &mut rng),
        NasError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(4, 4, (3, 3), Conv2dParams::new((0, 1), (1, 1)), &mut rng),
        NasError::InvalidConfig(_)
    );
}

#[test]
fn test_conv2d_forward_matches_functional() {
    let x = feature_map(&[2, 4, 6, 6], 3);
    let params = Conv2dParams::new((2, 2), (1, 1));
    let conv = Conv2d::new(4, 2, (3, 3), params, &mut seeded_rng(9)).unwrap();

    let out = conv.forward(&x).unwrap();
    let expected = functional::conv2d(&x, conv.kernel(), params).unwrap();
    assert_eq!(out, expected);
    assert_eq!(out.shape(), &[2, 2, 3, 3]);
    assert_eq!(conv.output_shape(x.shape()).unwrap(), out.shape());
}

#[test]
fn test_conv2d_from_kernel() {
    let kernel = Tensor::new(&[1.0, 0.0, 0.0, 1.0], &[1, 1, 2, 2]);
    let conv = Conv2d::from_kernel(kernel, Conv2dParams::default()).unwrap();
    assert_eq!(conv.kernel_size(), (2, 2));
    let x = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[1, 1, 2, 2]);
    assert_eq!(conv.forward(&x).unwrap().to_vec(), vec![5.0]);

    assert_err!(
        Conv2d::from_kernel(Tensor::ones(&[2, 2]), Conv2dParams::default()),
        NasError::InvalidInput(_)
    );
}

#[test]
fn test_conv2d_output_shape_wrong_channels() {
    let conv = Conv2d::new(4, 4, (1, 1), Conv2dParams::default(), &mut seeded_rng(0)).unwrap();
    // 报告的预期形状沿用输入的 batch 与空间尺寸
    assert_err!(
        conv.output_shape(&[1, 3, 8, 8]),
        NasError::ShapeMismatch { expected, got, .. } if expected == &[1, 4, 8, 8] && got == &[1, 3, 8, 8]
    );
    assert_err!(conv.output_shape(&[3, 8, 8]), NasError::InvalidInput(_));
}

#[test]
fn test_pool_layers_shape() {
    let x = feature_map(&[2, 3, 8, 8], 5);
    let max = MaxPool2d::new((3, 3), (2, 2), (1, 1));
    let avg = AvgPool2d::new((3, 3), (1, 1), (1, 1), false);

    let y = max.forward(&x).unwrap();
    assert_eq!(y.shape(), &[2, 3, 4, 4]);
    assert_eq!(max.output_shape(x.shape()).unwrap(), y.shape());

    let y = avg.forward(&x).unwrap();
    assert_eq!(y.shape(), &[2, 3, 8, 8]);
    assert_eq!(avg.output_shape(x.shape()).unwrap(), y.shape());

    assert_err!(max.output_shape(&[8, 8]), NasError::InvalidInput(_));
}
