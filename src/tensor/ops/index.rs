use crate::tensor::Tensor;
use std::ops::{Index, IndexMut};

/// 以定长下标数组访问单个元素，如`x[[b, c, h, w]]`；下标个数须等于张量阶数，越界则panic
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        &mut self.data[&index[..]]
    }
}
