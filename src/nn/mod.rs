/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 负责可微分架构搜索中候选操作与混合层（MixedLayer）的构建
 */

mod module;

mod catalog;
mod config;
pub mod functional;
mod init;
pub mod layer;
mod mixed_layer;
pub mod operations;

pub use catalog::{OPS, OperationKind, OperationSpec, PRIMITIVES, construct};
pub use config::{BatchNormConfig, MixedLayerConfig};
pub use init::Init;
pub use mixed_layer::MixedLayer;
pub use module::Module;
pub use operations::{Operation, TraitOperation};

#[cfg(test)]
mod tests;
