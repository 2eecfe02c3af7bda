/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 全库错误类型：张量层面的`TensorError`与搜索操作层面的`NasError`
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsitentShape,
    #[error("维度{axis}超出张量阶数{rank}")]
    AxisOutOfRange { axis: usize, rank: usize },
    #[error("切片步长必须大于0")]
    ZeroStep,
}

/// 候选操作、目录与`MixedLayer`的错误类型
///
/// 全部属于调用方契约错误：构建或首次求值时立即返回，不做任何静默修正。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NasError {
    #[error("未知的操作名称：`{0}`")]
    UnknownOperation(String),

    #[error("FactorizedReduce 的输出通道数须为偶数，得到 {channels}")]
    OddChannels { channels: usize },

    #[error("配置无效：{0}")]
    InvalidConfig(String),

    #[error("输入无效：{0}")]
    InvalidInput(String),

    #[error("{message}（预期形状 {expected:?}，实际形状 {got:?}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    #[error("权重个数 {got} 与候选操作个数 {expected} 不一致")]
    WeightCountMismatch { expected: usize, got: usize },

    #[error("MixedLayer 至少需要 1 个候选操作")]
    EmptyCandidates,

    #[error("配置解析失败：{0}")]
    Config(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

impl From<serde_json::Error> for NasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
