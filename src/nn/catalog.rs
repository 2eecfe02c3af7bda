/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 候选操作目录：操作名 <-> `OperationKind` <-> 构造函数
 *
 * 目录在编译期固定，运行时不会增删条目。
 * 字符串只在构建时解析一次；求值时只走已构建好的 `Operation` 实例。
 */

use crate::errors::NasError;
use crate::nn::operations::{
    Conv7x1And1x7, DilConv, FactorizedReduce, Identity, Operation, Pool, PoolMode, SepConv, Zero,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 所有已知候选操作的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "avg_pool_3x3")]
    AvgPool3x3,
    #[serde(rename = "max_pool_3x3")]
    MaxPool3x3,
    #[serde(rename = "skip_connect")]
    SkipConnect,
    #[serde(rename = "sep_conv_3x3")]
    SepConv3x3,
    #[serde(rename = "sep_conv_5x5")]
    SepConv5x5,
    #[serde(rename = "sep_conv_7x7")]
    SepConv7x7,
    #[serde(rename = "dil_conv_3x3")]
    DilConv3x3,
    #[serde(rename = "dil_conv_5x5")]
    DilConv5x5,
    #[serde(rename = "conv_7x1_1x7")]
    Conv7x1And1x7,
}

/// 目录条目的元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub kind: OperationKind,
    /// 外部词表中的操作名
    pub name: &'static str,
    /// 放入 MixedLayer 时是否需要在其后追加一个非仿射的 BatchNorm2d
    pub needs_post_normalization: bool,
}

const fn spec(
    kind: OperationKind,
    name: &'static str,
    needs_post_normalization: bool,
) -> OperationSpec {
    OperationSpec {
        kind,
        name,
        needs_post_normalization,
    }
}

/// 操作目录（顺序即 `OperationKind` 的声明顺序）
pub static OPS: [OperationSpec; 10] = [
    spec(OperationKind::None, "none", false),
    spec(OperationKind::AvgPool3x3, "avg_pool_3x3", true),
    spec(OperationKind::MaxPool3x3, "max_pool_3x3", true),
    spec(OperationKind::SkipConnect, "skip_connect", false),
    spec(OperationKind::SepConv3x3, "sep_conv_3x3", false),
    spec(OperationKind::SepConv5x5, "sep_conv_5x5", false),
    spec(OperationKind::SepConv7x7, "sep_conv_7x7", false),
    spec(OperationKind::DilConv3x3, "dil_conv_3x3", false),
    spec(OperationKind::DilConv5x5, "dil_conv_5x5", false),
    spec(OperationKind::Conv7x1And1x7, "conv_7x1_1x7", false),
];

/// 默认的搜索空间词表
pub const PRIMITIVES: [OperationKind; 8] = [
    OperationKind::None,
    OperationKind::MaxPool3x3,
    OperationKind::AvgPool3x3,
    OperationKind::SkipConnect,
    OperationKind::SepConv3x3,
    OperationKind::SepConv5x5,
    OperationKind::DilConv3x3,
    OperationKind::DilConv5x5,
];

impl OperationKind {
    /// 该操作在目录中的元数据
    pub fn spec(self) -> &'static OperationSpec {
        &OPS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn needs_post_normalization(self) -> bool {
        self.spec().needs_post_normalization
    }

    /// 构建操作实例，参数用系统熵初始化
    pub fn build(self, channels: usize, stride: usize, affine: bool) -> Result<Operation, NasError> {
        self.build_with_rng(channels, stride, affine, &mut StdRng::from_entropy())
    }

    /// 构建操作实例
    ///
    /// # 参数
    /// - `channels`: 输入/输出通道数（所有操作都保持通道数不变）
    /// - `stride`: 1 保持空间尺寸，2 使空间尺寸减半
    /// - `affine`: 操作内部 BatchNorm 是否带可学习的缩放/平移
    /// - `rng`: 参数初始化用的随机数生成器
    pub fn build_with_rng(
        self,
        channels: usize,
        stride: usize,
        affine: bool,
        rng: &mut StdRng,
    ) -> Result<Operation, NasError> {
        if channels == 0 {
            return Err(NasError::InvalidConfig(format!(
                "构建 `{self}` 时通道数必须为正"
            )));
        }
        if stride == 0 {
            return Err(NasError::InvalidConfig(format!("构建 `{self}` 时步长必须为正")));
        }

        let c = channels;
        let op: Operation = match self {
            Self::None => Zero::new(stride)?.into(),
            Self::AvgPool3x3 => Pool::new(PoolMode::Avg, 3, stride, 1)?.into(),
            Self::MaxPool3x3 => Pool::new(PoolMode::Max, 3, stride, 1)?.into(),
            Self::SkipConnect => {
                if stride == 1 {
                    Identity::new().into()
                } else {
                    FactorizedReduce::new(c, c, affine, rng)?.into()
                }
            }
            Self::SepConv3x3 => SepConv::new(c, c, 3, stride, 1, affine, rng)?.into(),
            Self::SepConv5x5 => SepConv::new(c, c, 5, stride, 2, affine, rng)?.into(),
            Self::SepConv7x7 => SepConv::new(c, c, 7, stride, 3, affine, rng)?.into(),
            Self::DilConv3x3 => DilConv::new(c, c, 3, stride, 2, 2, affine, rng)?.into(),
            Self::DilConv5x5 => DilConv::new(c, c, 5, stride, 4, 2, affine, rng)?.into(),
            Self::Conv7x1And1x7 => Conv7x1And1x7::new(c, stride, affine, rng)?.into(),
        };
        log::debug!("构建候选操作 `{self}`：channels={c}，stride={stride}，affine={affine}");
        Ok(op)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for OperationKind {
    type Err = NasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OPS.iter()
            .find(|spec| spec.name == s)
            .map(|spec| spec.kind)
            .ok_or_else(|| NasError::UnknownOperation(s.to_string()))
    }
}

/// 按名称构建操作：未知名称直接报错，不做任何回退
pub fn construct(
    name: &str,
    channels: usize,
    stride: usize,
    affine: bool,
) -> Result<Operation, NasError> {
    name.parse::<OperationKind>()?.build(channels, stride, affine)
}
