/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : SepConv：两级堆叠的深度可分离卷积
 *
 * 第一级：ReLU -> 逐通道卷积（带 stride）-> 1x1 到 C_in -> BN
 * 第二级：ReLU -> 逐通道卷积（stride 固定为 1）-> 1x1 到 C_out -> BN
 * 两级结构是有意为之（容量翻倍），不可合并成一对逐通道+逐点卷积。
 */

use super::{DilConv, TraitOperation};
use crate::errors::NasError;
use crate::nn::Module;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct SepConv {
    stage_1: DilConv,
    stage_2: DilConv,
}

impl SepConv {
    /// `padding` 取 (kernel_size - 1) / 2 时 stride=1 的输出与输入空间尺寸相同
    pub fn new(
        c_in: usize,
        c_out: usize,
        kernel_size: usize,
        stride: usize,
        padding: usize,
        affine: bool,
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        Ok(Self {
            stage_1: DilConv::new(c_in, c_in, kernel_size, stride, padding, 1, affine, rng)?,
            stage_2: DilConv::new(c_in, c_out, kernel_size, 1, padding, 1, affine, rng)?,
        })
    }

    pub const fn stages(&self) -> (&DilConv, &DilConv) {
        (&self.stage_1, &self.stage_2)
    }
}

impl TraitOperation for SepConv {
    fn name(&self) -> &'static str {
        "SepConv"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let h = self.stage_1.forward(x)?;
        self.stage_2.forward(&h)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        let shape = self.stage_1.output_shape(input_shape)?;
        self.stage_2.output_shape(&shape)
    }
}

impl Module for SepConv {
    fn parameters(&self) -> Vec<&Tensor> {
        [self.stage_1.parameters(), self.stage_2.parameters()].concat()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.stage_1.parameters_mut();
        params.extend(self.stage_2.parameters_mut());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.stage_1.set_training(training);
        self.stage_2.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.stage_1.is_training()
    }
}
