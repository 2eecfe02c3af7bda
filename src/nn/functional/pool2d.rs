/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 2D 最大/平均池化前向核（PyTorch 风格，支持零填充）
 *
 * 输出尺寸计算（不使用 ceil_mode）：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 *
 * 填充位置：
 * - 最大池化：填充位置永远不会被选为最大值
 * - 平均池化：`count_include_pad=false` 时分母只计窗口内的有效位置
 */

use super::{expect_4d, merge_batch};
use crate::errors::NasError;
use crate::tensor::Tensor;
use rayon::prelude::*;

/// 单个空间维度上的池化输出尺寸
pub const fn pool2d_output_size(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
) -> Option<usize> {
    if stride == 0 || kernel == 0 || input + 2 * padding < kernel {
        return None;
    }
    Some((input + 2 * padding - kernel) / stride + 1)
}

/// 校验池化参数并计算输出尺寸
fn check_pool_params(
    op_name: &str,
    (in_h, in_w): (usize, usize),
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
) -> Result<(usize, usize), NasError> {
    let (k_h, k_w) = kernel_size;
    let (pad_h, pad_w) = padding;

    // 与 PyTorch 一致：填充不得超过半个窗口
    if pad_h > k_h / 2 || pad_w > k_w / 2 {
        return Err(NasError::InvalidConfig(format!(
            "{op_name} 填充 {padding:?} 不得超过池化窗口 {k_h}x{k_w} 的一半"
        )));
    }

    match (
        pool2d_output_size(in_h, k_h, stride.0, pad_h),
        pool2d_output_size(in_w, k_w, stride.1, pad_w),
    ) {
        (Some(h), Some(w)) if h > 0 && w > 0 => Ok((h, w)),
        _ => Err(NasError::InvalidInput(format!(
            "{op_name} 输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，步长 {stride:?}，填充 {padding:?}"
        ))),
    }
}

/// 2D 最大池化
///
/// # 参数
/// - `input`: [batch, C, H, W]
/// - `kernel_size`: 池化窗口大小 (kH, kW)
/// - `stride`: 步长 (sH, sW)
/// - `padding`: 填充 (pH, pW)
pub fn max_pool2d(
    input: &Tensor,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
) -> Result<Tensor, NasError> {
    let (batch_size, channels, in_h, in_w) = expect_4d(input, "MaxPool2d")?;
    let (out_h, out_w) =
        check_pool_params("MaxPool2d", (in_h, in_w), kernel_size, stride, padding)?;

    let (k_h, k_w) = kernel_size;
    let (s_h, s_w) = stride;
    let (pad_h, pad_w) = padding;
    let single_sample_size = channels * out_h * out_w;

    let batch_results: Vec<Vec<f32>> = (0..batch_size)
        .into_par_iter()
        .map(|b| {
            let mut sample_output = vec![0.0f32; single_sample_size];
            for c in 0..channels {
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        let mut max_val = f32::NEG_INFINITY;
                        for (ih, iw) in window(oh, ow, (k_h, k_w), (s_h, s_w), (pad_h, pad_w), (in_h, in_w)) {
                            let val = input[[b, c, ih, iw]];
                            // NaN 向后传播，不被窗口内其他值掩盖
                            if val.is_nan() {
                                max_val = val;
                                break;
                            }
                            if val > max_val {
                                max_val = val;
                            }
                        }
                        sample_output[c * out_h * out_w + oh * out_w + ow] = max_val;
                    }
                }
            }
            sample_output
        })
        .collect();

    Ok(merge_batch(batch_results, &[batch_size, channels, out_h, out_w]))
}

/// 2D 平均池化
///
/// # 参数
/// - `input`: [batch, C, H, W]
/// - `kernel_size`: 池化窗口大小 (kH, kW)
/// - `stride`: 步长 (sH, sW)
/// - `padding`: 填充 (pH, pW)
/// - `count_include_pad`: 分母是否计入填充位置
pub fn avg_pool2d(
    input: &Tensor,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
    count_include_pad: bool,
) -> Result<Tensor, NasError> {
    let (batch_size, channels, in_h, in_w) = expect_4d(input, "AvgPool2d")?;
    let (out_h, out_w) =
        check_pool_params("AvgPool2d", (in_h, in_w), kernel_size, stride, padding)?;

    let (k_h, k_w) = kernel_size;
    let single_sample_size = channels * out_h * out_w;

    let batch_results: Vec<Vec<f32>> = (0..batch_size)
        .into_par_iter()
        .map(|b| {
            let mut sample_output = vec![0.0f32; single_sample_size];
            for c in 0..channels {
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        let mut sum = 0.0f32;
                        let mut count = 0usize;
                        for (ih, iw) in window(oh, ow, kernel_size, stride, padding, (in_h, in_w)) {
                            sum += input[[b, c, ih, iw]];
                            count += 1;
                        }
                        let divisor = if count_include_pad { k_h * k_w } else { count };
                        sample_output[c * out_h * out_w + oh * out_w + ow] = sum / divisor as f32;
                    }
                }
            }
            sample_output
        })
        .collect();

    Ok(merge_batch(batch_results, &[batch_size, channels, out_h, out_w]))
}

/// 输出位置 (oh, ow) 对应的池化窗口中，落在原输入范围内的所有坐标
fn window(
    oh: usize,
    ow: usize,
    (k_h, k_w): (usize, usize),
    (s_h, s_w): (usize, usize),
    (pad_h, pad_w): (usize, usize),
    (in_h, in_w): (usize, usize),
) -> impl Iterator<Item = (usize, usize)> {
    let h_start = oh * s_h;
    let w_start = ow * s_w;
    (h_start..h_start + k_h)
        .filter(move |&ph| ph >= pad_h && ph - pad_h < in_h)
        .flat_map(move |ph| {
            (w_start..w_start + k_w)
                .filter(move |&pw| pw >= pad_w && pw - pad_w < in_w)
                .map(move |pw| (ph - pad_h, pw - pad_w))
        })
}
