/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 候选操作：统一的 `TraitOperation` 接口与 `Operation` 枚举
 *
 * 设计决策：
 * - 每种操作是一个独立的结构体，各自独占自己的参数（不同实例之间从不共享）
 * - 通过 enum_dispatch 静态分发，避免求值热路径上的字符串查找或虚调用
 * - `output_shape()` 给出不执行计算的形状契约，MixedLayer 据此在构建后即可校验
 */

mod conv_7x1_1x7;
mod dil_conv;
mod factorized_reduce;
mod identity;
mod pool;
mod post_normalized;
mod relu_conv_bn;
mod sep_conv;
mod zero;

pub use conv_7x1_1x7::Conv7x1And1x7;
pub use dil_conv::DilConv;
pub use factorized_reduce::FactorizedReduce;
pub use identity::Identity;
pub use pool::{Pool, PoolMode};
pub use post_normalized::PostNormalized;
pub use relu_conv_bn::ReLUConvBN;
pub use sep_conv::SepConv;
pub use zero::Zero;

use crate::errors::NasError;
use crate::nn::Module;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 候选操作的统一接口：输入特征图 [batch, C_in, H, W]，输出 [batch, C_out, H', W']
#[enum_dispatch]
pub trait TraitOperation {
    /// 操作的类型名（用于日志与错误信息）
    fn name(&self) -> &'static str;

    /// 前向计算。`&mut self` 是因为训练模式下 BatchNorm 要更新滑动统计量
    fn forward(&mut self, x: &Tensor) -> Result<Tensor, NasError>;

    /// 不执行计算，仅根据输入形状推导输出形状
    fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>, NasError>;
}

/// 所有候选操作的封闭集合
#[enum_dispatch(TraitOperation, Module)]
#[derive(Debug, Clone)]
pub enum Operation {
    Zero(Zero),
    Identity(Identity),
    Pool(Pool),
    PostNormalized(PostNormalized),
    ReLUConvBN(ReLUConvBN),
    DilConv(DilConv),
    SepConv(SepConv),
    FactorizedReduce(FactorizedReduce),
    Conv7x1And1x7(Conv7x1And1x7),
}

/// 校验输入为 4D 且通道数符合预期，返回 (batch, H, W)
pub(crate) fn expect_channels(
    input_shape: &[usize],
    channels: usize,
    op_name: &str,
) -> Result<(usize, usize, usize), NasError> {
    if input_shape.len() != 4 {
        return Err(NasError::InvalidInput(format!(
            "{op_name} 输入必须是 4D [batch, C, H, W]，得到 {input_shape:?}"
        )));
    }
    if input_shape[1] != channels {
        let mut expected = input_shape.to_vec();
        expected[1] = channels;
        return Err(NasError::ShapeMismatch {
            expected,
            got: input_shape.to_vec(),
            message: format!("{op_name} 需要 {channels} 通道的输入"),
        });
    }
    Ok((input_shape[0], input_shape[2], input_shape[3]))
}
