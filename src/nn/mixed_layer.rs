/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : MixedLayer：若干候选操作输出的加权和
 *
 * 搜索阶段计算图中的每条边不是单个固定操作，而是
 *     y = Σ_i w_i * op_i(x)
 * 权重由外部（通常是对架构参数做 softmax）逐次传入，本层不保存也不归一化权重。
 */

use crate::errors::NasError;
use crate::nn::operations::{Operation, PostNormalized, TraitOperation};
use crate::nn::{MixedLayerConfig, Module, OperationKind};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 混合层
///
/// # 使用示例
/// ```ignore
/// let mut layer = MixedLayer::new_seeded(16, 1, &PRIMITIVES, 42)?;
/// let weights = [0.1, 0.2, 0.1, 0.2, 0.1, 0.1, 0.1, 0.1];
/// let y = layer.forward(&x, &weights)?;
/// ```
#[derive(Debug, Clone)]
pub struct MixedLayer {
    channels: usize,
    stride: usize,
    kinds: Vec<OperationKind>,
    layers: Vec<Operation>,
    training: bool,
}

impl MixedLayer {
    /// 参数用系统熵初始化
    pub fn new(channels: usize, stride: usize, kinds: &[OperationKind]) -> Result<Self, NasError> {
        Self::with_rng(channels, stride, kinds, &mut StdRng::from_entropy())
    }

    /// 参数用固定种子初始化，确保可重复性
    pub fn new_seeded(
        channels: usize,
        stride: usize,
        kinds: &[OperationKind],
        seed: u64,
    ) -> Result<Self, NasError> {
        Self::with_rng(channels, stride, kinds, &mut StdRng::seed_from_u64(seed))
    }

    /// 由操作名列表构建；任何一个名称未知都会直接报错
    pub fn from_names(channels: usize, stride: usize, names: &[&str]) -> Result<Self, NasError> {
        let kinds = names
            .iter()
            .map(|name| name.parse::<OperationKind>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(channels, stride, &kinds)
    }

    pub fn from_config(config: &MixedLayerConfig) -> Result<Self, NasError> {
        config.validate()?;
        match config.seed {
            Some(seed) => Self::new_seeded(config.channels, config.stride, &config.primitives, seed),
            None => Self::new(config.channels, config.stride, &config.primitives),
        }
    }

    /// 为每个操作名构建一个独立的实例（参数互不共享）；
    /// 目录中标记了后置归一化的条目再套一个非仿射 BatchNorm2d
    pub fn with_rng(
        channels: usize,
        stride: usize,
        kinds: &[OperationKind],
        rng: &mut StdRng,
    ) -> Result<Self, NasError> {
        if kinds.is_empty() {
            return Err(NasError::EmptyCandidates);
        }

        let mut layers = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            let op = kind.build_with_rng(channels, stride, false, rng)?;
            let op = if kind.needs_post_normalization() {
                PostNormalized::new(op, channels, false).into()
            } else {
                op
            };
            layers.push(op);
        }

        log::debug!(
            "构建 MixedLayer：channels={channels}，stride={stride}，候选操作={:?}",
            kinds.iter().map(|k| k.name()).collect::<Vec<_>>()
        );

        Ok(Self {
            channels,
            stride,
            kinds: kinds.to_vec(),
            layers,
            training: true,
        })
    }

    /// 前向传播：`Σ weights[i] * op_i(x)`
    ///
    /// # 参数
    /// - `x`: [batch, channels, H, W]
    /// - `weights`: 与候选操作一一对应（顺序即构建时的操作名顺序）
    ///
    /// # 错误
    /// - 权重个数与候选操作个数不一致
    /// - 某个候选的输出形状与第一个候选不同
    ///
    /// 两项都在任何候选求值之前检查，出错时各候选的 BN 统计量保持不变
    pub fn forward(&mut self, x: &Tensor, weights: &[f32]) -> Result<Tensor, NasError> {
        if weights.len() != self.layers.len() {
            return Err(NasError::WeightCountMismatch {
                expected: self.layers.len(),
                got: weights.len(),
            });
        }
        self.output_shape(x.shape())?;

        let mut sum: Option<Tensor> = None;
        for ((layer, &w), kind) in self.layers.iter_mut().zip(weights).zip(&self.kinds) {
            let out = layer.forward(x)?;
            log::trace!("MixedLayer 候选 `{kind}` 输出形状 {:?}，权重 {w}", out.shape());
            let scaled = out * w;
            sum = match sum {
                None => Some(scaled),
                Some(mut acc) => {
                    if !acc.is_same_shape(&scaled) {
                        return Err(NasError::ShapeMismatch {
                            expected: acc.shape().to_vec(),
                            got: scaled.shape().to_vec(),
                            message: format!("候选操作 `{kind}` 的输出形状与其他候选不一致"),
                        });
                    }
                    acc.try_add_assign(&scaled)?;
                    Some(acc)
                }
            };
        }
        // kinds 非空在构建时已保证
        sum.ok_or(NasError::EmptyCandidates)
    }

    /// 不执行计算，推导输出形状并校验所有候选的形状一致
    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError> {
        let mut expected: Option<Vec<usize>> = None;
        for (layer, kind) in self.layers.iter().zip(&self.kinds) {
            let shape = layer.output_shape(input_shape)?;
            match &expected {
                None => expected = Some(shape),
                Some(e) if *e != shape => {
                    return Err(NasError::ShapeMismatch {
                        expected: e.clone(),
                        got: shape,
                        message: format!("候选操作 `{kind}` 的输出形状与其他候选不一致"),
                    });
                }
                Some(_) => {}
            }
        }
        expected.ok_or(NasError::EmptyCandidates)
    }

    pub const fn channels(&self) -> usize {
        self.channels
    }

    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub fn kinds(&self) -> &[OperationKind] {
        &self.kinds
    }

    pub fn operations(&self) -> &[Operation] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Module for MixedLayer {
    fn parameters(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.parameters_mut())
            .collect()
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        for layer in &mut self.layers {
            layer.set_training(training);
        }
    }

    fn is_training(&self) -> bool {
        self.training
    }
}
