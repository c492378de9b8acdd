// crates/rsum_foundation/src/index.rs

//! 统一索引类型定义
//!
//! 全项目唯一的索引类型定义处，所有其他模块必须从这里引用。
//!
//! # 设计原则
//!
//! 1. **唯一来源**: 所有索引类型只在此处定义
//! 2. **类型安全**: 变量索引、区域集索引与单元索引不可混用
//! 3. **零开销**: 编译期类型检查，运行时无开销
//!
//! # 索引层级
//!
//! 外层 API（名称映射、汇总集合）使用强类型索引；
//! 内层平铺存储（描述符、视图、数值缓冲）使用裸 `usize` 槽位。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 无效索引标记
pub const INVALID_INDEX: usize = usize::MAX;

// ============================================================================
// 宏：生成索引类型
// ============================================================================

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// 无效索引常量
            pub const INVALID: Self = Self(INVALID_INDEX);

            /// 创建新索引
            #[inline]
            pub const fn new(idx: usize) -> Self {
                Self(idx)
            }

            /// 获取索引值
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// 转换为usize
            #[inline]
            pub const fn as_usize(self) -> usize {
                self.0
            }

            /// 检查是否有效
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != INVALID_INDEX
            }

            /// 检查是否无效
            #[inline]
            pub const fn is_invalid(self) -> bool {
                self.0 == INVALID_INDEX
            }

            /// 转换为Option
            #[inline]
            pub fn to_option(self) -> Option<usize> {
                if self.is_valid() {
                    Some(self.0)
                } else {
                    None
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(INVALID)", stringify!($name))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "INVALID")
                }
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(idx: usize) -> Self {
                Self(idx)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }
    };
}

// ============================================================================
// 索引类型定义
// ============================================================================

define_index! {
    /// 区域变量索引 - 名称映射提交后按字典序分配
    VariableIdx
}

define_index! {
    /// 区域集索引 - 0 号恒为 FIELD，命名区域集从 1 开始
    RegionSetIdx
}

define_index! {
    /// 活动单元索引 - 用于索引每单元区域编号数组
    CellIdx
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idx_creation() {
        let idx = VariableIdx::new(10);
        assert_eq!(idx.get(), 10);
        assert!(idx.is_valid());
    }

    #[test]
    fn test_idx_invalid() {
        let idx = RegionSetIdx::INVALID;
        assert!(!idx.is_valid());
        assert!(idx.is_invalid());
        assert_eq!(RegionSetIdx::default(), RegionSetIdx::INVALID);
    }

    #[test]
    fn test_idx_conversions() {
        let idx: CellIdx = 42usize.into();
        assert_eq!(idx.as_usize(), 42);
        let raw: usize = idx.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_to_option() {
        assert_eq!(VariableIdx::new(7).to_option(), Some(7));
        assert_eq!(VariableIdx::INVALID.to_option(), None);
    }

    #[test]
    fn test_type_safety() {
        let var_idx = VariableIdx::new(0);
        let regset_idx = RegionSetIdx::new(0);

        // 编译时类型检查：下面的代码如果取消注释会编译失败
        // let _: VariableIdx = regset_idx;

        // 但可以比较索引值
        assert_eq!(var_idx.get(), regset_idx.get());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", CellIdx::new(42)), "42");
        assert_eq!(format!("{}", CellIdx::INVALID), "INVALID");
    }

    #[test]
    fn test_debug() {
        assert_eq!(format!("{:?}", VariableIdx::new(3)), "VariableIdx(3)");
        assert_eq!(format!("{:?}", VariableIdx::INVALID), "VariableIdx(INVALID)");
    }

    #[test]
    fn test_ordering() {
        assert!(RegionSetIdx::new(1) < RegionSetIdx::new(2));
    }

    #[test]
    fn test_serialization() {
        let idx = VariableIdx::new(42);
        let json = serde_json::to_string(&idx).unwrap();
        let deserialized: VariableIdx = serde_json::from_str(&json).unwrap();
        assert_eq!(idx, deserialized);
    }
}
