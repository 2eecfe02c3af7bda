/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 配置结构（可由 JSON 反序列化）
 */

use crate::errors::NasError;
use crate::nn::{OperationKind, PRIMITIVES};
use serde::{Deserialize, Serialize};

/// 批归一化超参数，默认值与 PyTorch 一致
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchNormConfig {
    pub eps: f32,
    pub momentum: f32,
}

impl Default for BatchNormConfig {
    fn default() -> Self {
        Self {
            eps: 1e-5,
            momentum: 0.1,
        }
    }
}

/// `MixedLayer` 的构建配置
///
/// # JSON 示例
/// ```json
/// { "channels": 16, "stride": 2, "primitives": ["none", "skip_connect", "sep_conv_3x3"], "seed": 7 }
/// ```
/// `stride` 缺省为 1，`primitives` 缺省为完整的 `PRIMITIVES`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedLayerConfig {
    pub channels: usize,
    #[serde(default = "default_stride")]
    pub stride: usize,
    #[serde(default = "default_primitives")]
    pub primitives: Vec<OperationKind>,
    /// 参数初始化的随机种子，缺省时使用系统熵
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_stride() -> usize {
    1
}

fn default_primitives() -> Vec<OperationKind> {
    PRIMITIVES.to_vec()
}

impl MixedLayerConfig {
    pub fn new(channels: usize, stride: usize) -> Self {
        Self {
            channels,
            stride,
            primitives: default_primitives(),
            seed: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, NasError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, NasError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), NasError> {
        if self.channels == 0 {
            return Err(NasError::InvalidConfig("channels 必须为正".to_string()));
        }
        if self.stride == 0 {
            return Err(NasError::InvalidConfig("stride 必须为正".to_string()));
        }
        if self.primitives.is_empty() {
            return Err(NasError::EmptyCandidates);
        }
        Ok(())
    }
}
