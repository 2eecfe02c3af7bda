/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Module trait 定义
 */

use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（各层签名各异；候选操作统一走 `TraitOperation`）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回参数张量的引用，供外部优化器/序列化使用
/// - 训练/评估模式只影响 `BatchNorm2d` 的统计量来源
#[enum_dispatch]
pub trait Module {
    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<&Tensor>;

    /// 获取所有可训练参数的可变引用（外部优化器更新参数时使用）
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// 获取参数（张量）个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取参数的标量元素总数
    fn num_param_elements(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }

    /// 切换训练/评估模式；无状态的模块无需实现
    fn set_training(&mut self, _training: bool) {}

    /// 是否处于训练模式
    fn is_training(&self) -> bool {
        false
    }
}
