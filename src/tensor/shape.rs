use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Axis, Slice};

impl Tensor {
    pub fn reshape(&self, shape: &[usize]) -> Result<Self, TensorError> {
        let new_total_elements: usize = shape.iter().product();
        if self.size() != new_total_elements {
            return Err(TensorError::InconsitentShape);
        }
        let data = self
            .data
            .clone()
            .into_shape(shape)
            .map_err(|_| TensorError::InconsitentShape)?;
        Ok(Self { data })
    }

    /// 将多个张量沿着`axis`维度拼接起来，返回一个新的张量。
    /// 除`axis`外，其余各维度必须严格一致。
    ///
    /// # 示例
    /// ```ignore
    /// // [2, 3, 4, 4] 与 [2, 5, 4, 4] 沿通道维拼接得到 [2, 8, 4, 4]
    /// let out = Tensor::concat(&[&a, &b], 1)?;
    /// ```
    pub fn concat(tensors: &[&Self], axis: usize) -> Result<Self, TensorError> {
        let first = tensors.first().ok_or(TensorError::EmptyList)?;
        let rank = first.dimension();
        if axis >= rank {
            return Err(TensorError::AxisOutOfRange { axis, rank });
        }

        for t in &tensors[1..] {
            let compatible = t.dimension() == rank
                && t.shape()
                    .iter()
                    .zip(first.shape())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            if !compatible {
                return Err(TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: first.shape().to_vec(),
                    tensor2_shape: t.shape().to_vec(),
                });
            }
        }

        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(axis), &views).map_err(|_| {
            TensorError::OperatorError {
                operator: Operator::Concat,
                tensor1_shape: first.shape().to_vec(),
                tensor2_shape: tensors[tensors.len() - 1].shape().to_vec(),
            }
        })?;
        Ok(Self { data })
    }

    /// 沿`axis`维度从`start`开始每隔`step`个取一个元素，返回克隆的新张量。
    /// 相当于python中的`x[..., start::step, ...]`。
    /// `start`超出该维度长度时得到长度为0的维度。
    pub fn slice_axis(&self, axis: usize, start: usize, step: usize) -> Result<Self, TensorError> {
        let rank = self.dimension();
        if axis >= rank {
            return Err(TensorError::AxisOutOfRange { axis, rank });
        }
        if step == 0 {
            return Err(TensorError::ZeroStep);
        }
        let len = self.shape()[axis];
        let start = start.min(len);
        let data = self
            .data
            .slice_axis(Axis(axis), Slice::new(start as isize, None, step as isize))
            .to_owned();
        Ok(Self { data })
    }
}
