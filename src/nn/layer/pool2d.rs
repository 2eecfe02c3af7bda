/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : MaxPool2d / AvgPool2d (2D 池化) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 * - 无可学习参数
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 */

use crate::errors::NasError;
use crate::nn::functional;
use crate::tensor::Tensor;

/// 不执行计算，仅推导池化输出形状
fn pool_output_shape(
    op_name: &str,
    input_shape: &[usize],
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
) -> Result<Vec<usize>, NasError> {
    if input_shape.len() != 4 {
        return Err(NasError::InvalidInput(format!(
            "{op_name} 输入必须是 4D [batch, C, H, W]，得到 {input_shape:?}"
        )));
    }
    let out_h = functional::pool2d_output_size(input_shape[2], kernel_size.0, stride.0, padding.0);
    let out_w = functional::pool2d_output_size(input_shape[3], kernel_size.1, stride.1, padding.1);
    match (out_h, out_w) {
        (Some(h), Some(w)) if h > 0 && w > 0 => Ok(vec![input_shape[0], input_shape[1], h, w]),
        _ => Err(NasError::InvalidInput(format!(
            "{op_name} 输出尺寸无效：输入 {input_shape:?}，核 {kernel_size:?}，步长 {stride:?}，填充 {padding:?}"
        ))),
    }
}

/// 2D 最大池化层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
}

impl MaxPool2d {
    pub const fn new(
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
    ) -> Self {
        Self {
            kernel_size,
            stride,
            padding,
        }
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NasError> {
        functional::max_pool2d(x, self.kernel_size, self.stride, self.padding)
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        pool_output_shape("MaxPool2d", input_shape, self.kernel_size, self.stride, self.padding)
    }
}

/// 2D 平均池化层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvgPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
    count_include_pad: bool,
}

impl AvgPool2d {
    pub const fn new(
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        count_include_pad: bool,
    ) -> Self {
        Self {
            kernel_size,
            stride,
            padding,
            count_include_pad,
        }
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NasError> {
        functional::avg_pool2d(
            x,
            self.kernel_size,
            self.stride,
            self.padding,
            self.count_include_pad,
        )
    }

    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        pool_output_shape("AvgPool2d", input_shape, self.kernel_size, self.stride, self.padding)
    }
}
