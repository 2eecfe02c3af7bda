//! # Only NAS
//!
//! `only_nas`提供可微分神经架构搜索（DARTS 风格）所需的候选操作库：
//! 卷积类（可分离卷积、空洞卷积、7x1/1x7 卷积）、池化、恒等映射、结构性零，
//! 以及把若干候选操作按外部给定权重加权求和的`MixedLayer`。
//!
//! 张量与卷积/池化/批归一化的前向计算核在本库内以纯 rust 实现；
//! 自动微分、训练循环与架构权重的产生不在本库范围内。

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
