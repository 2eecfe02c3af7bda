/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Layer 模块 - 持有参数/状态的基础层，由候选操作组合使用
 */

mod batch_norm2d;
mod conv2d;
mod pool2d;

pub use batch_norm2d::BatchNorm2d;
pub use conv2d::Conv2d;
pub use pool2d::{AvgPool2d, MaxPool2d};
