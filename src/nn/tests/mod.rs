mod catalog;
mod layer_batch_norm2d;
mod layer_conv2d;

use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 固定种子的标准正态特征图
fn feature_map(shape: &[usize], seed: u64) -> Tensor {
    Tensor::normal_with_rng(0.0, 1.0, shape, &mut StdRng::seed_from_u64(seed))
}

fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
