/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 张量的加法，实现了两个张量“逐元素”相加的运算（及自相加），并返回一个新的张量。
 *                 支持以下情况：
 *                 1. 两个张量形状严格一致：逐元素相加；
 *                 2. 其中一个为标量：将标量广播到另一张量的每个元素上。
 *                 不做NumPy风格的一般广播：加权求和的各项若形状不同必须报错，而不是被悄悄广播。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::{Add, AddAssign};

impl Tensor {
    /// 可失败版本的加法，形状不兼容时返回错误而非panic
    pub fn try_add(&self, other: &Self) -> Result<Self, TensorError> {
        if self.is_same_shape(other) {
            Ok(Self {
                data: &self.data + &other.data,
            })
        } else if let Some(number) = other.to_number() {
            Ok(Self {
                data: &self.data + number,
            })
        } else if let Some(number) = self.to_number() {
            Ok(Self {
                data: number + &other.data,
            })
        } else {
            Err(TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            })
        }
    }

    /// 可失败版本的自相加，要求两者形状严格一致（或`other`为标量）
    pub fn try_add_assign(&mut self, other: &Self) -> Result<(), TensorError> {
        if self.is_same_shape(other) {
            self.data += &other.data;
            Ok(())
        } else if let Some(number) = other.to_number() {
            self.data += number;
            Ok(())
        } else {
            Err(TensorError::OperatorError {
                operator: Operator::AddAssign,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            })
        }
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 + f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add<f32> for Tensor {
    type Output = Self;

    fn add(self, scalar: f32) -> Self {
        Self {
            data: self.data + scalar,
        }
    }
}
impl Add<f32> for &Tensor {
    type Output = Tensor;

    fn add(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data + scalar,
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 + f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 +（不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Add for Tensor {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        add_within_tensors(&self, &other)
    }
}

impl<'a> Add<&'a Self> for Tensor {
    type Output = Self;

    fn add(self, other: &'a Self) -> Self {
        add_within_tensors(&self, other)
    }
}

impl<'b> Add<&'b Tensor> for &Tensor {
    type Output = Tensor;

    fn add(self, other: &'b Tensor) -> Tensor {
        add_within_tensors(self, other)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 +（不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

impl<'a> AddAssign<&'a Self> for Tensor {
    fn add_assign(&mut self, other: &'a Self) {
        if let Err(e) = self.try_add_assign(other) {
            panic!("{e}");
        }
    }
}

/// # Panics
/// 如果形状不兼容
fn add_within_tensors(tensor_1: &Tensor, tensor_2: &Tensor) -> Tensor {
    match tensor_1.try_add(tensor_2) {
        Ok(t) => t,
        Err(e) => panic!("{e}"),
    }
}
