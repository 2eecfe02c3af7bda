/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : DilConv：ReLU -> 逐通道空洞卷积 -> 1x1 逐点卷积 -> BatchNorm2d
 *
 * 逐通道（groups = C_in）+ 逐点的分解比同感受野的稠密卷积参数少得多。
 * 填充需与空洞配合，使 stride=1 时空间尺寸不变：
 * 3x3/dilation 2 用 padding 2，5x5/dilation 2 用 padding 4。
 */

use super::{TraitOperation, expect_channels};
use crate::errors::NasError;
use crate::nn::functional::Conv2dParams;
use crate::nn::layer::{BatchNorm2d, Conv2d};
use crate::nn::Module;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct DilConv {
    depthwise: Conv2d,
    pointwise: Conv2d,
    bn: BatchNorm2d,
}

impl DilConv {
    /// # 参数
    /// - `c_in`/`c_out`: 输入/输出通道数
    /// - `kernel_size`: 逐通道卷积核边长
    /// - `stride`、`padding`、`dilation`: 作用于逐通道卷积
    /// - `affine`: BatchNorm 是否带可学习的缩放/平移
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        c_in: usize,
        c_out: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        dilation: usize,
        affine: bool,
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        let depthwise = Conv2d::new(
            c_in,
            c_in,
            (kernel_size, kernel_size),
            Conv2dParams::new((stride, stride), (padding, padding))
                .with_dilation((dilation, dilation))
                .with_groups(c_in),
            rng,
        )?;
        let pointwise = Conv2d::new(c_in, c_out, (1, 1), Conv2dParams::default(), rng)?;
        Ok(Self {
            depthwise,
            pointwise,
            bn: BatchNorm2d::new(c_out, affine),
        })
    }

    pub const fn depthwise(&self) -> &Conv2d {
        &self.depthwise
    }

    pub const fn pointwise(&self) -> &Conv2d {
        &self.pointwise
    }
}

impl TraitOperation for DilConv {
    fn name(&self) -> &'static str {
        "DilConv"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let h = self.depthwise.forward(&x.relu())?;
        let h = self.pointwise.forward(&h)?;
        self.bn.forward(&h)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        expect_channels(input_shape, self.depthwise.in_channels(), self.name())?;
        let shape = self.depthwise.output_shape(input_shape)?;
        self.pointwise.output_shape(&shape)
    }
}

impl Module for DilConv {
    fn parameters(&self) -> Vec<&Tensor> {
        [
            self.depthwise.parameters(),
            self.pointwise.parameters(),
            self.bn.parameters(),
        ]
        .concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.depthwise.parameters_mut();
        params.extend(self.pointwise.parameters_mut());
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
