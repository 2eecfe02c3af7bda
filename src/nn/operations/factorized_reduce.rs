/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : FactorizedReduce：把空间尺寸减半，同时把通道映射到 C_out（须为偶数）
 *
 * x -> ReLU -> ┬ conv_1(1x1, stride 2)(x)              -> C_out/2 通道 ┐
 *              └ conv_2(1x1, stride 2)(x[:, :, 1:, 1:]) -> C_out/2 通道 ┴ 通道维拼接 -> BN
 *
 * 第二支偏移一个像素，使两半采样互补的空间相位。
 * 两支的空间尺寸分别是 ceil(H/2) 与 floor(H/2)，只有 H、W 为偶数时才一致；
 * 不一致时返回错误，不做裁剪。
 */

use super::{TraitOperation, expect_channels};
use crate::errors::NasError;
use crate::nn::functional::Conv2dParams;
use crate::nn::layer::{BatchNorm2d, Conv2d};
use crate::nn::Module;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct FactorizedReduce {
    conv_1: Conv2d,
    conv_2: Conv2d,
    bn: BatchNorm2d,
}

impl FactorizedReduce {
    /// `c_out` 为奇数时在分配任何参数之前返回 `NasError::OddChannels`
    pub fn new(c_in: usize, c_out: usize, affine: bool, rng: &mut StdRng) -> Result<Self, NasError> {
        if c_out % 2 != 0 {
            return Err(NasError::OddChannels { channels: c_out });
        }
        let params = Conv2dParams::new((2, 2), (0, 0));
        let conv_1 = Conv2d::new(c_in, c_out / 2, (1, 1), params, rng)?;
        let conv_2 = Conv2d::new(c_in, c_out / 2, (1, 1), params, rng)?;
        Ok(Self {
            conv_1,
            conv_2,
            bn: BatchNorm2d::new(c_out, affine),
        })
    }

    fn branch_shapes(&self, input_shape: &[usize]) -> Result<(Vec<usize>, Vec<usize>), NasError> {
        let (batch, h, w) = expect_channels(input_shape, self.conv_1.in_channels(), self.name())?;
        let shifted = [
            batch,
            input_shape[1],
            h.saturating_sub(1),
            w.saturating_sub(1),
        ];
        Ok((
            self.conv_1.output_shape(input_shape)?,
            self.conv_2.output_shape(&shifted)?,
        ))
    }
}

fn branch_mismatch(shape_1: Vec<usize>, shape_2: Vec<usize>) -> NasError {
    NasError::ShapeMismatch {
        expected: shape_1,
        got: shape_2,
        message: "FactorizedReduce 两支输出的空间尺寸不一致（输入 H、W 须为偶数）".to_string(),
    }
}

impl TraitOperation for FactorizedReduce {
    fn name(&self) -> &'static str {
        "FactorizedReduce"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let (shape_1, shape_2) = self.branch_shapes(x.shape())?;
        if shape_1[2..] != shape_2[2..] {
            return Err(branch_mismatch(shape_1, shape_2));
        }

        let x = x.relu();
        let out_1 = self.conv_1.forward(&x)?;
        let shifted = x.slice_axis(2, 1, 1)?.slice_axis(3, 1, 1)?;
        let out_2 = self.conv_2.forward(&shifted)?;
        debug_assert_eq!(out_1.shape()[2..], out_2.shape()[2..]);

        let out = Tensor::concat(&[&out_1, &out_2], 1)?;
        self.bn.forward(&out)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        let (shape_1, shape_2) = self.branch_shapes(input_shape)?;
        if shape_1[2..] != shape_2[2..] {
            return Err(branch_mismatch(shape_1, shape_2));
        }
        Ok(vec![
            shape_1[0],
            self.bn.num_features(),
            shape_1[2],
            shape_1[3],
        ])
    }
}

impl Module for FactorizedReduce {
    fn parameters(&self) -> Vec<&Tensor> {
        [
            self.conv_1.parameters(),
            self.conv_2.parameters(),
            self.bn.parameters(),
        ]
        .concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.conv_1.parameters_mut();
        params.extend(self.conv_2.parameters_mut());
        params.extend(self.bn.parameters_mut());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.bn.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.bn.is_training()
    }
}
