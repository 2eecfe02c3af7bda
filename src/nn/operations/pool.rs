/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 3x3 池化候选操作（平均/最大），无可学习参数
 *
 * 平均池化不把填充位置计入分母（对应 PyTorch 的 count_include_pad=False）。
 */

use super::TraitOperation;
use crate::errors::NasError;
use crate::nn::Module;
use crate::nn::layer::{AvgPool2d, MaxPool2d};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMode {
    Avg,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolLayer {
    Avg(AvgPool2d),
    Max(MaxPool2d),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    mode: PoolMode,
    layer: PoolLayer,
}

impl Pool {
    /// # 参数
    /// - `mode`: 平均或最大
    /// - `kernel_size`: 方形窗口边长
    /// - `stride`: 两个空间维度上的步长
    /// - `padding`: 两个空间维度上的填充
    pub fn new(
        mode: PoolMode,
        kernel_size: usize,
        stride: usize,
        padding: usize,
    ) -> Result<Self, NasError> {
        if kernel_size == 0 || stride == 0 {
            return Err(NasError::InvalidConfig(format!(
                "池化窗口与步长必须为正，得到 kernel={kernel_size}，stride={stride}"
            )));
        }
        if padding > kernel_size / 2 {
            return Err(NasError::InvalidConfig(format!(
                "池化填充 {padding} 不得超过窗口 {kernel_size} 的一半"
            )));
        }
        let (k, s, p) = ((kernel_size, kernel_size), (stride, stride), (padding, padding));
        let layer = match mode {
            PoolMode::Avg => PoolLayer::Avg(AvgPool2d::new(k, s, p, false)),
            PoolMode::Max => PoolLayer::Max(MaxPool2d::new(k, s, p)),
        };
        Ok(Self { mode, layer })
    }

    pub const fn mode(&self) -> PoolMode {
        self.mode
    }
}

impl TraitOperation for Pool {
    fn name(&self) -> &'static str {
        match self.mode {
            PoolMode::Avg => "AvgPool",
            PoolMode::Max => "MaxPool",
        }
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        match &self.layer {
            PoolLayer::Avg(pool) => pool.forward(x),
            PoolLayer::Max(pool) => pool.forward(x),
        }
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        match &self.layer {
            PoolLayer::Avg(pool) => pool.output_shape(input_shape),
            PoolLayer::Max(pool) => pool.output_shape(input_shape),
        }
    }
}

impl Module for Pool {
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}
