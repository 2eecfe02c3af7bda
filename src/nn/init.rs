/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 参数初始化策略
 */

use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 参数初始化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU`），fan_in 取除首维外各维之积
    Kaiming,
}

impl Init {
    /// 生成初始化后的 Tensor（使用系统熵作种子）
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        self.generate_with_rng(shape, &mut StdRng::from_entropy())
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Kaiming => {
                // 卷积核 [C_out, C_in/groups, kH, kW] 的 fan_in = C_in/groups * kH * kW
                let fan_in = if shape.len() >= 2 {
                    shape[1..].iter().product::<usize>()
                } else {
                    shape.first().copied().unwrap_or(1)
                };
                let std = (2.0 / fan_in.max(1) as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}
