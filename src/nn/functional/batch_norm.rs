/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 2D 批归一化前向核（按通道归一化 [batch, C, H, W]）
 *
 * y = (x - mean[c]) / sqrt(var[c] + eps) * weight[c] + bias[c]
 */

use super::expect_4d;
use crate::errors::NasError;
use crate::tensor::Tensor;

/// 按通道统计均值与（有偏）方差，统计范围为 batch、H、W 三个维度
///
/// # 返回
/// (mean, biased_var, 每通道样本数)
pub fn channel_statistics(input: &Tensor) -> Result<(Vec<f32>, Vec<f32>, usize), NasError> {
    let (batch_size, channels, h, w) = expect_4d(input, "BatchNorm2d")?;
    let count = batch_size * h * w;
    if count == 0 {
        return Err(NasError::InvalidInput(format!(
            "BatchNorm2d 无法对空输入 {:?} 统计均值与方差",
            input.shape()
        )));
    }

    let mut mean = vec![0.0f32; channels];
    let mut var = vec![0.0f32; channels];
    for (c, (m, v)) in mean.iter_mut().zip(var.iter_mut()).enumerate() {
        let mut sum = 0.0f32;
        for b in 0..batch_size {
            for hi in 0..h {
                for wi in 0..w {
                    sum += input[[b, c, hi, wi]];
                }
            }
        }
        *m = sum / count as f32;

        // 两遍法，避免大均值时 E[x²]-E[x]² 的数值抵消
        let mut sq = 0.0f32;
        for b in 0..batch_size {
            for hi in 0..h {
                for wi in 0..w {
                    let d = input[[b, c, hi, wi]] - *m;
                    sq += d * d;
                }
            }
        }
        *v = sq / count as f32;
    }
    Ok((mean, var, count))
}

/// 用给定的均值/方差对输入做按通道归一化，可选仿射变换
///
/// # 参数
/// - `input`: [batch, C, H, W]
/// - `mean`、`var`: 长度为 C
/// - `weight`、`bias`: 长度为 C 的仿射参数（None 表示不做仿射）
/// - `eps`: 防止除零的小常数
pub fn batch_norm2d(
    input: &Tensor,
    mean: &[f32],
    var: &[f32],
    weight: Option<&Tensor>,
    bias: Option<&Tensor>,
    eps: f32,
) -> Result<Tensor, NasError> {
    let (batch_size, channels, h, w) = expect_4d(input, "BatchNorm2d")?;
    if mean.len() != channels || var.len() != channels {
        return Err(NasError::ShapeMismatch {
            expected: vec![channels],
            got: vec![mean.len(), var.len()],
            message: "BatchNorm2d 统计量长度与输入通道数不一致".to_string(),
        });
    }
    for (name, param) in [("weight", weight), ("bias", bias)] {
        if let Some(p) = param {
            if p.shape() != [channels] {
                return Err(NasError::ShapeMismatch {
                    expected: vec![channels],
                    got: p.shape().to_vec(),
                    message: format!("BatchNorm2d 的 {name} 形状与输入通道数不一致"),
                });
            }
        }
    }

    let mut output = input.clone();
    for c in 0..channels {
        let inv_std = 1.0 / (var[c] + eps).sqrt();
        let scale = weight.map_or(1.0, |t| t[[c]]);
        let shift = bias.map_or(0.0, |t| t[[c]]);
        for b in 0..batch_size {
            for hi in 0..h {
                for wi in 0..w {
                    let x = output[[b, c, hi, wi]];
                    output[[b, c, hi, wi]] = (x - mean[c]) * inv_std * scale + shift;
                }
            }
        }
    }
    Ok(output)
}
