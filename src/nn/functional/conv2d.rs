/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 2D 卷积前向核（PyTorch 风格，无偏置）
 *
 * 支持步长、零填充、空洞（dilation）与分组（groups）：
 * - 卷积核形状：[C_out, C_in / groups, kH, kW]
 * - groups == C_in 时即为逐通道（depthwise）卷积
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - dilation_h*(kernel_h-1) - 1) / stride_h + 1
 * W' = (W + 2*padding_w - dilation_w*(kernel_w-1) - 1) / stride_w + 1
 */

use super::{expect_4d, merge_batch};
use crate::errors::NasError;
use crate::tensor::Tensor;
use rayon::prelude::*;

/// 卷积的超参数（卷积核形状由权重张量本身给出）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2dParams {
    /// 步长 (sH, sW)
    pub stride: (usize, usize),
    /// 填充 (pH, pW)
    pub padding: (usize, usize),
    /// 空洞 (dH, dW)
    pub dilation: (usize, usize),
    /// 分组数
    pub groups: usize,
}

impl Default for Conv2dParams {
    fn default() -> Self {
        Self {
            stride: (1, 1),
            padding: (0, 0),
            dilation: (1, 1),
            groups: 1,
        }
    }
}

impl Conv2dParams {
    pub const fn new(stride: (usize, usize), padding: (usize, usize)) -> Self {
        Self {
            stride,
            padding,
            dilation: (1, 1),
            groups: 1,
        }
    }

    pub const fn with_dilation(mut self, dilation: (usize, usize)) -> Self {
        self.dilation = dilation;
        self
    }

    pub const fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }
}

/// 单个空间维度上的卷积输出尺寸；输入（含填充）小于空洞后的有效核尺寸时返回 None
pub const fn conv2d_output_size(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    dilation: usize,
) -> Option<usize> {
    if stride == 0 || kernel == 0 || dilation == 0 {
        return None;
    }
    let effective_kernel = dilation * (kernel - 1) + 1;
    let padded = input + 2 * padding;
    if padded < effective_kernel {
        return None;
    }
    Some((padded - effective_kernel) / stride + 1)
}

/// 执行 2D 卷积
///
/// # 参数
/// - `input`: [batch, C_in, H, W]
/// - `weight`: [C_out, C_in / groups, kH, kW]
/// - `params`: 步长/填充/空洞/分组
///
/// # 返回
/// [batch, C_out, H', W']
pub fn conv2d(input: &Tensor, weight: &Tensor, params: Conv2dParams) -> Result<Tensor, NasError> {
    let (batch_size, in_c, in_h, in_w) = expect_4d(input, "Conv2d")?;

    // 1. 验证卷积核形状：必须是 4D [C_out, C_in/groups, kH, kW]
    let kernel_shape = weight.shape();
    if kernel_shape.len() != 4 {
        return Err(NasError::InvalidInput(format!(
            "卷积核必须是 4D [C_out, C_in/groups, kH, kW]，得到 {kernel_shape:?}"
        )));
    }
    let (out_c, c_per_group, k_h, k_w) = (
        kernel_shape[0],
        kernel_shape[1],
        kernel_shape[2],
        kernel_shape[3],
    );

    // 2. 验证分组
    let groups = params.groups;
    if groups == 0 || in_c % groups != 0 || out_c % groups != 0 {
        return Err(NasError::InvalidConfig(format!(
            "groups={groups} 必须同时整除输入通道数 {in_c} 与输出通道数 {out_c}"
        )));
    }
    if c_per_group * groups != in_c {
        return Err(NasError::ShapeMismatch {
            expected: vec![in_c / groups],
            got: vec![c_per_group],
            message: format!(
                "输入通道数 {in_c} 与卷积核每组输入通道数 {c_per_group}（groups={groups}）不匹配"
            ),
        });
    }

    // 3. 计算输出尺寸
    let (stride_h, stride_w) = params.stride;
    let (pad_h, pad_w) = params.padding;
    let (dil_h, dil_w) = params.dilation;
    let (out_h, out_w) = match (
        conv2d_output_size(in_h, k_h, stride_h, pad_h, dil_h),
        conv2d_output_size(in_w, k_w, stride_w, pad_w, dil_w),
    ) {
        (Some(h), Some(w)) if h > 0 && w > 0 => (h, w),
        _ => {
            return Err(NasError::InvalidInput(format!(
                "卷积输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，步长 {:?}，填充 {:?}，空洞 {:?}",
                params.stride, params.padding, params.dilation
            )));
        }
    };

    let padded = pad_input(input, params.padding);
    let out_c_per_group = out_c / groups;
    let single_sample_size = out_c * out_h * out_w;

    // Rayon 并行计算每个 batch 样本
    let batch_results: Vec<Vec<f32>> = (0..batch_size)
        .into_par_iter()
        .map(|b| {
            let mut sample_data = vec![0.0f32; single_sample_size];
            for oc in 0..out_c {
                let ic_start = (oc / out_c_per_group) * c_per_group;
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        let mut sum = 0.0f32;
                        let h_start = oh * stride_h;
                        let w_start = ow * stride_w;

                        for icl in 0..c_per_group {
                            for kh in 0..k_h {
                                for kw in 0..k_w {
                                    let input_val = padded
                                        [[b, ic_start + icl, h_start + kh * dil_h, w_start + kw * dil_w]];
                                    sum += input_val * weight[[oc, icl, kh, kw]];
                                }
                            }
                        }
                        sample_data[oc * out_h * out_w + oh * out_w + ow] = sum;
                    }
                }
            }
            sample_data
        })
        .collect();

    Ok(merge_batch(batch_results, &[batch_size, out_c, out_h, out_w]))
}

/// 对输入进行零填充（Rayon 并行版本）
/// 输入必须是 4D [batch, C, H, W]
pub(super) fn pad_input(input: &Tensor, padding: (usize, usize)) -> Tensor {
    let (pad_h, pad_w) = padding;
    if pad_h == 0 && pad_w == 0 {
        return input.clone();
    }

    let input_shape = input.shape();
    let (batch_size, c, h, w) = (input_shape[0], input_shape[1], input_shape[2], input_shape[3]);
    let new_h = h + 2 * pad_h;
    let new_w = w + 2 * pad_w;
    let single_sample_size = c * new_h * new_w;

    let batch_results: Vec<Vec<f32>> = (0..batch_size)
        .into_par_iter()
        .map(|bi| {
            let mut sample_data = vec![0.0f32; single_sample_size];
            for ci in 0..c {
                for hi in 0..h {
                    for wi in 0..w {
                        let idx = ci * new_h * new_w + (hi + pad_h) * new_w + (wi + pad_w);
                        sample_data[idx] = input[[bi, ci, hi, wi]];
                    }
                }
            }
            sample_data
        })
        .collect();

    merge_batch(batch_results, &[batch_size, c, new_h, new_w])
}
