/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Zero：结构性的“无连接”
 *
 * 输出全为0，但形状与同一步长下的其他候选操作一致，使加权求和保持良定义：
 * - stride == 1：x * 0，形状不变
 * - stride > 1 ：先在两个空间维度上从下标0开始每隔 stride 取一个元素（x[:, :, ::s, ::s]），再乘0，
 *               空间尺寸为 ceil(H/s) x ceil(W/s)
 */

use super::TraitOperation;
use crate::errors::NasError;
use crate::nn::Module;
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zero {
    stride: usize,
}

impl Zero {
    pub fn new(stride: usize) -> Result<Self, NasError> {
        if stride == 0 {
            return Err(NasError::InvalidConfig("Zero 的步长必须为正".to_string()));
        }
        Ok(Self { stride })
    }

    pub const fn stride(&self) -> usize {
        self.stride
    }
}

impl TraitOperation for Zero {
    fn name(&self) -> &'static str {
        "Zero"
    }

    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        if self.stride == 1 {
            return Ok(x * 0.);
        }
        self.output_shape(x.shape())?;
        let sampled = x
            .slice_axis(2, 0, self.stride)?
            .slice_axis(3, 0, self.stride)?;
        Ok(sampled * 0.)
    }

    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        if self.stride == 1 {
            return Ok(input_shape.to_vec());
        }
        if input_shape.len() != 4 {
            return Err(NasError::InvalidInput(format!(
                "Zero（stride>1）输入必须是 4D [batch, C, H, W]，得到 {input_shape:?}"
            )));
        }
        let s = self.stride;
        Ok(vec![
            input_shape[0],
            input_shape[1],
            input_shape[2].div_ceil(s),
            input_shape[3].div_ceil(s),
        ])
    }
}

impl Module for Zero {
    fn parameters(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }
}
