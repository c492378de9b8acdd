// crates/rsum_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `RsumError` 枚举和 `RsumResult` 类型别名，用于整个项目中
//! **可恢复**的错误（坏输入数据、缺失资源）。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，配置相关错误在 rsum_config 中定义
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **契约错误不在此列**: 调用顺序违约（如提交后注册）直接 panic，
//!    不走 Result 通道
//!
//! # 示例
//!
//! ```
//! use rsum_foundation::error::{RsumError, RsumResult};
//!
//! fn lookup_region_array(name: &str) -> RsumResult<()> {
//!     Err(RsumError::not_found(format!("region set '{name}'")))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type RsumResult<T> = Result<T, RsumError>;

/// RegSum 错误类型
///
/// 核心可恢复错误类型。配置解析相关的错误在 `rsum_config` 中扩展。
#[derive(Error, Debug)]
pub enum RsumError {
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    /// 资源未找到
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源名称
        resource: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl RsumError {
    /// 从IO错误创建
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 资源未找到
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl RsumError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> RsumResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }

    /// 检查索引是否在范围内
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> RsumResult<()> {
        if index >= len {
            Err(Self::index_out_of_bounds(index_type, index, len))
        } else {
            Ok(())
        }
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for RsumError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 宏
// ========================================================================

/// 条件检查宏，失败时返回给定错误
///
/// # 示例
///
/// ```
/// use rsum_foundation::{ensure, error::{RsumError, RsumResult}};
///
/// fn check(value: i32) -> RsumResult<()> {
///     ensure!(value >= 0, RsumError::invalid_input("value must be non-negative"));
///     Ok(())
/// }
/// assert!(check(-1).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

// ========================================================================
// 测试
// ========================================================================
