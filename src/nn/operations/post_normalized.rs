/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 在任意候选操作之后追加一个 BatchNorm2d
 *
 * MixedLayer 对目录中标记了“需要后置归一化”的条目（池化）套上这一层，
 * 使无参数的池化输出与其他带 BN 的候选处在相近的数值尺度上。
 */

use super::{Operation, TraitOperation};
use crate::errors::NasError;
use crate::nn::Module;
use crate::nn::layer::BatchNorm2d;
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct PostNormalized {
    inner: Box<Operation>,
    norm: BatchNorm2d,
}

impl PostNormalized {
    pub fn new(inner: Operation, channels: usize, affine: bool) -> Self {
        Self {
            inner: Box::new(inner),
            norm: BatchNorm2d::new(channels, affine),
        }
    }

    pub fn inner(&self) -> &Operation {
        &self.inner
    }

    pub const fn norm(&self) -> &BatchNorm2d {
        &self.norm
    }
}

impl TraitOperation for PostNormalized {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let out = self.inner.forward(x)?;
        self.norm.forward(&out)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        let shape = self.inner.output_shape(input_shape)?;
        if shape.get(1) != Some(&self.norm.num_features()) {
            return Err(NasError::ShapeMismatch {
                expected: vec![self.norm.num_features()],
                got: shape,
                message: "后置 BatchNorm2d 的通道数与内部操作输出不一致".to_string(),
            });
        }
        Ok(shape)
    }
}

impl Module for PostNormalized {
    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.inner.parameters();
        params.extend(self.norm.parameters());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.inner.parameters_mut();
        params.extend(self.norm.parameters_mut());
        params
    }

    fn set_training(&mut self, training: bool) {
        self.inner.set_training(training);
        self.norm.set_training(training);
    }

    fn is_training(&self) -> bool {
        self.norm.is_training()
    }
}
