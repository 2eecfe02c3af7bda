/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : BatchNorm2d (2D 批归一化) 层，等价于 PyTorch 的 nn.BatchNorm2d
 *
 * - 训练模式：用当前 batch 的均值/有偏方差归一化，并以动量更新滑动统计量
 *   （滑动方差使用无偏估计，与 PyTorch 一致）
 * - 评估模式：用滑动统计量归一化
 * - `affine=false` 时没有可学习参数
 */

use crate::errors::NasError;
use crate::nn::functional;
use crate::nn::{BatchNormConfig, Module};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub struct BatchNorm2d {
    num_features: usize,
    eps: f32,
    momentum: f32,
    /// 缩放参数 [num_features]（仅 affine）
    weight: Option<Tensor>,
    /// 平移参数 [num_features]（仅 affine）
    bias: Option<Tensor>,
    running_mean: Vec<f32>,
    running_var: Vec<f32>,
    num_batches_tracked: usize,
    training: bool,
}

impl BatchNorm2d {
    /// 使用默认 eps/momentum 创建，默认处于训练模式
    pub fn new(num_features: usize, affine: bool) -> Self {
        Self::with_config(num_features, affine, BatchNormConfig::default())
    }

    pub fn with_config(num_features: usize, affine: bool, config: BatchNormConfig) -> Self {
        let (weight, bias) = if affine {
            (
                Some(Tensor::ones(&[num_features])),
                Some(Tensor::zeros(&[num_features])),
            )
        } else {
            (None, None)
        };
        Self {
            num_features,
            eps: config.eps,
            momentum: config.momentum,
            weight,
            bias,
            running_mean: vec![0.0; num_features],
            running_var: vec![1.0; num_features],
            num_batches_tracked: 0,
            training: true,
        }
    }

    /// 前向传播
    ///
    /// # 参数
    /// - `x`: [batch, num_features, H, W]
    pub fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError> {
        let channels = x.shape().get(1).copied().unwrap_or(0);
        if x.dimension() == 4 && channels != self.num_features {
            return Err(NasError::ShapeMismatch {
                expected: vec![self.num_features],
                got: vec![channels],
                message: format!(
                    "BatchNorm2d 期望 {} 个通道，输入为 {channels} 个",
                    self.num_features
                ),
            });
        }

        if !self.training {
            return functional::batch_norm2d(
                x,
                &self.running_mean,
                &self.running_var,
                self.weight.as_ref(),
                self.bias.as_ref(),
                self.eps,
            );
        }

        let (mean, var, count) = functional::channel_statistics(x)?;
        if count <= 1 {
            return Err(NasError::InvalidInput(format!(
                "BatchNorm2d 训练模式下每个通道至少需要 2 个值，输入形状为 {:?}",
                x.shape()
            )));
        }

        let unbiased = count as f32 / (count - 1) as f32;
        for c in 0..self.num_features {
            self.running_mean[c] = (1.0 - self.momentum) * self.running_mean[c] + self.momentum * mean[c];
            self.running_var[c] =
                (1.0 - self.momentum) * self.running_var[c] + self.momentum * var[c] * unbiased;
        }
        self.num_batches_tracked += 1;

        functional::batch_norm2d(
            x,
            &mean,
            &var,
            self.weight.as_ref(),
            self.bias.as_ref(),
            self.eps,
        )
    }

    pub const fn num_features(&self) -> usize {
        self.num_features
    }

    pub const fn is_affine(&self) -> bool {
        self.weight.is_some()
    }

    pub fn running_mean(&self) -> &[f32] {
        &self.running_mean
    }

    pub fn running_var(&self) -> &[f32] {
        &self.running_var
    }

    pub const fn num_batches_tracked(&self) -> usize {
        self.num_batches_tracked
    }
}

impl Module for BatchNorm2d {
    fn parameters(&self) -> Vec<&Tensor> {
        self.weight.iter().chain(self.bias.iter()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.weight.iter_mut().chain(self.bias.iter_mut()).collect()
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
