/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : ReLU -> Conv2d（无偏置）-> BatchNorm2d 的堆叠
 */

use super::{TraitOperation, expect_channels};
use crate::errors::NasError;
use crate::nn::functional::Conv2dParams;
use crate::nn::layer::{BatchNorm2d, Conv2d};
use crate::nn::Module;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct ReLUConvBN {
    conv: Conv2d,
    bn: BatchNorm2d,
}

impl ReLUConvBN {
    /// # 参数
    /// - `c_in`/`c_out`: 输入/输出通道数
    /// - `kernel_size`: 方形卷积核边长
    /// - `stride`、`padding`: 两个空间维度共用
    /// - `affine`: BatchNorm 是否带可学习的缩放/平移
    pub fn new(
        c_in: usize,
        c_out: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        affine: bool,
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        let conv = Conv2d::new(
            c_in,
            c_out,
            (kernel_size, kernel_size),
            Conv2dParams::new((stride, stride), (padding, padding)),
            rng,
        )?;
        Ok(Self {
            conv,
            bn: BatchNorm2d::new(c_out, affine),
        })
    }
}

impl TraitOperation for ReLUConvBN {
    fn name(&self) -> &'static str {
        "ReLUConvBN"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let h = self.conv.forward(&x.relu())?;
        self.bn.forward(&h)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        expect_channels(input_shape, self.conv.in_channels(), self.name())?;
        self.conv.output_shape(input_shape)
    }
}

impl Module for ReLUConvBN {
    fn parameters(&self) -> Vec<&Tensor> {
        [self.conv.parameters(), self.bn.parameters()].concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.conv.parameters_mut();
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
