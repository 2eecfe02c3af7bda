/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 张量与纯数的乘法（数乘），以及几个逐元素的一元运算。
 *                 MixedLayer 的加权求和只需要“数乘+相加”，故这里不实现张量间的逐元素相乘。
 */

use crate::tensor::Tensor;
use std::ops::Mul;

impl Mul<f32> for Tensor {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            data: self.data * scalar,
        }
    }
}

impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data * scalar,
        }
    }
}

impl Mul<Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: tensor.data * self,
        }
    }
}

impl<'a> Mul<&'a Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: &tensor.data * self,
        }
    }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个纯数
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    /// `ReLU`：负值置0。返回新张量，不修改自身（对应PyTorch中`inplace=False`）
    pub fn relu(&self) -> Self {
        Self {
            data: self.data.mapv(|x| x.max(0.)),
        }
    }
}
