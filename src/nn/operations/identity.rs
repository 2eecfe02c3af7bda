/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Identity：原样返回输入（stride 为 1 时的 skip_connect）
 */

use super::TraitOperation;
use crate::errors::NasError;
use crate::nn::Module;
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Identity {
    pub const fn new() -> Self {
        Self
    }
}

impl TraitOperation for Identity {
    fn name(&self) -> &'static str {
        "Identity"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        Ok(x.clone())
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        Ok(input_shape.to_vec())
    }
}

impl Module for Identity {
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}
