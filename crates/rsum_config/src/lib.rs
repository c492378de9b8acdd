// crates/rsum_config/src/lib.rs

//! RegSum 配置层
//!
//! 定义数据驱动运行的 JSON 配置：区域集定义、变量定义与
//! 逐周期的单元贡献，并提供从配置构建核心对象的辅助方法。
//!
//! # 模块概览
//!
//! - [`run_config`]: RunConfig 运行配置（全 f64，JSON 友好）
//! - [`error`]: 配置错误类型
//!
//! # 设计原则
//!
//! 1. **纯数据**: 配置类型只含 serde 友好的普通字段
//! 2. **显式校验**: `validate` 在构建核心对象之前报告坏输入
//! 3. **字段默认值**: 缺省字段由 `#[serde(default)]` 补齐

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod run_config;

// 重导出核心类型
pub use error::ConfigError;
pub use run_config::{Contribution, CycleConfig, RegionSetConfig, RunConfig, VariableConfig};
