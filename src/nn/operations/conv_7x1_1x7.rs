/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : ReLU -> 1x7 卷积（宽度方向步长）-> 7x1 卷积（高度方向步长）-> BatchNorm2d
 *
 * 两个非对称卷积各自只在一个空间轴上施加步长，合起来等价于两个轴都下采样 stride 倍。
 */

use super::{TraitOperation, expect_channels};
use crate::errors::NasError;
use crate::nn::functional::Conv2dParams;
use crate::nn::layer::{BatchNorm2d, Conv2d};
use crate::nn::Module;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct Conv7x1And1x7 {
    conv_1x7: Conv2d,
    conv_7x1: Conv2d,
    bn: BatchNorm2d,
}

impl Conv7x1And1x7 {
    pub fn new(
        channels: usize,
        stride: usize,
        affine: bool,
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        let conv_1x7 = Conv2d::new(
            channels,
            channels,
            (1, 7),
            Conv2dParams::new((1, stride), (0, 3)),
            rng,
        )?;
        let conv_7x1 = Conv2d::new(
            channels,
            channels,
            (7, 1),
            Conv2dParams::new((stride, 1), (3, 0)),
            rng,
        )?;
        Ok(Self {
            conv_1x7,
            conv_7x1,
            bn: BatchNorm2d::new(channels, affine),
        })
    }
}

impl TraitOperation for Conv7x1And1x7 {
    fn name(&self) -> &'static str {
        "Conv7x1And1x7"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let h = self.conv_1x7.forward(&x.relu())?;
        let h = self.conv_7x1.forward(&h)?;
        self.bn.forward(&h)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        expect_channels(input_shape, self.conv_1x7.in_channels(), self.name())?;
        let shape = self.conv_1x7.output_shape(input_shape)?;
        self.conv_7x1.output_shape(&shape)
    }
}

impl Module for Conv7x1And1x7 {
    fn parameters(&self) -> Vec<&Tensor> {
        [
            self.conv_1x7.parameters(),
            self.conv_7x1.parameters(),
            self.bn.parameters(),
        ]
        .concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.conv_1x7.parameters_mut();
        params.extend(self.conv_7x1.parameters_mut());
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
