// crates/rsum_foundation/src/lib.rs

//! RegSum Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`index`]: 强类型索引系统
//! - [`segmented`]: CSR 风格分段索引表
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **类型安全**: 编译期防止索引误用
//! 3. **零开销抽象**: release 模式下最小化运行时开销
//!
//! # 示例
//!
//! ```
//! use rsum_foundation::{
//!     index::VariableIdx,
//!     segmented::SegmentedIndex,
//!     error::{RsumError, RsumResult},
//! };
//!
//! // 按段长度构建 CSR 起始指针表
//! let seg = SegmentedIndex::from_counts([4usize, 6, 2]);
//! assert_eq!(seg.total_len(), 12);
//! assert_eq!(seg.index(1, 3), 7);
//!
//! // 强类型索引
//! let var = VariableIdx::new(2);
//! assert!(var.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod segmented;

// 重导出常用类型
pub use error::{RsumError, RsumResult};
pub use index::{CellIdx, RegionSetIdx, VariableIdx};
pub use segmented::SegmentedIndex;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{RsumError, RsumResult};
    pub use crate::index::{CellIdx, RegionSetIdx, VariableIdx};
    pub use crate::segmented::SegmentedIndex;
}
