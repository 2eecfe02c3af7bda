/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 前向计算核（卷积、池化、批归一化）
 *
 * 设计决策：
 * - 只做前向：自动微分与参数更新由外部引擎负责
 * - Batch-First 格式：输入必须是 4D [batch, C, H, W]，单样本使用 [1, C, H, W]
 * - 使用 Rayon 在 batch 维度并行加速
 * - 所有形状/参数问题均以 `NasError` 返回，不 panic
 */

mod batch_norm;
mod conv2d;
mod pool2d;

pub use batch_norm::{batch_norm2d, channel_statistics};
pub use conv2d::{Conv2dParams, conv2d, conv2d_output_size};
pub use pool2d::{avg_pool2d, max_pool2d, pool2d_output_size};

use crate::errors::NasError;
use crate::tensor::Tensor;

/// 校验输入为 4D [batch, C, H, W] 并拆出各维度
pub(crate) fn expect_4d(
    input: &Tensor,
    op_name: &str,
) -> Result<(usize, usize, usize, usize), NasError> {
    let shape = input.shape();
    if shape.len() != 4 {
        return Err(NasError::InvalidInput(format!(
            "{op_name} 输入必须是 4D [batch, C, H, W]，得到 {shape:?}。单样本请使用 [1, C, H, W]"
        )));
    }
    Ok((shape[0], shape[1], shape[2], shape[3]))
}

/// 把各 batch 样本的计算结果按顺序合并成一个 4D 张量
fn merge_batch(batch_results: Vec<Vec<f32>>, output_shape: &[usize]) -> Tensor {
    let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
    Tensor::new(&all_data, output_shape)
}
