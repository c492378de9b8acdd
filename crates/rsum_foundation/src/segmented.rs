// crates/rsum_foundation/src/segmented.rs

//! CSR 风格分段索引表
//!
//! 将若干变长段映射到一段连续的平铺存储：第 `i` 段的第 `j` 个元素
//! 位于 `start(i) + j`。内部只保存一张前缀和起始指针表，
//! 大小为 `段数 + 1`。
//!
//! # 不变式
//!
//! - `start_ptr[0] == 0`
//! - 起始指针单调不减（允许零长度段）
//! - `total_len() == start_ptr.last()`
//!
//! # 示例
//!
//! ```
//! use rsum_foundation::segmented::SegmentedIndex;
//!
//! let seg = SegmentedIndex::from_counts([4usize, 0, 6]);
//! assert_eq!(seg.num_segments(), 3);
//! assert_eq!(seg.total_len(), 10);
//! assert_eq!(seg.start(1), 4);       // 零长度段
//! assert_eq!(seg.start(2), 4);
//! assert_eq!(seg.index(2, 5), 9);
//! ```

use serde::{Deserialize, Serialize};

/// 分段索引表
///
/// 空表（未构建）时所有查询返回 0。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedIndex {
    /// 起始指针，大小为段数 + 1；第 i 段的元素位于
    /// `start_ptr[i] .. start_ptr[i + 1]`
    start_ptr: Vec<usize>,
}

impl SegmentedIndex {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 由段长度序列构建前缀和表
    pub fn from_counts(counts: impl IntoIterator<Item = usize>) -> Self {
        let counts = counts.into_iter();
        let mut start_ptr = Vec::with_capacity(counts.size_hint().0 + 1);
        start_ptr.push(0);

        let mut running = 0usize;
        for count in counts {
            running += count;
            start_ptr.push(running);
        }

        Self { start_ptr }
    }

    /// 段数
    #[inline]
    pub fn num_segments(&self) -> usize {
        if self.start_ptr.is_empty() {
            0
        } else {
            self.start_ptr.len() - 1
        }
    }

    /// 全部段的元素总数
    #[inline]
    pub fn total_len(&self) -> usize {
        self.start_ptr.last().copied().unwrap_or(0)
    }

    /// 是否不含任何段
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_segments() == 0
    }

    /// 第 `segment` 段的起始位置
    ///
    /// # Panics
    ///
    /// `segment > num_segments()` 时越界 panic。
    #[inline]
    pub fn start(&self, segment: usize) -> usize {
        self.start_ptr[segment]
    }

    /// 第 `segment` 段的长度
    ///
    /// # Panics
    ///
    /// `segment >= num_segments()` 时越界 panic。
    #[inline]
    pub fn segment_len(&self, segment: usize) -> usize {
        self.start_ptr[segment + 1] - self.start_ptr[segment]
    }

    /// 第 `segment` 段在平铺存储中的区间
    ///
    /// # Panics
    ///
    /// `segment >= num_segments()` 时越界 panic。
    #[inline]
    pub fn segment_range(&self, segment: usize) -> std::ops::Range<usize> {
        self.start_ptr[segment]..self.start_ptr[segment + 1]
    }

    /// (段, 段内偏移) 到平铺索引的转换
    ///
    /// `offset` 超出段长属于调用方错误，仅在 debug 模式断言。
    #[inline]
    pub fn index(&self, segment: usize, offset: usize) -> usize {
        debug_assert!(segment < self.num_segments());
        debug_assert!(self.start_ptr[segment] + offset < self.start_ptr[segment + 1]);

        self.start_ptr[segment] + offset
    }
}

// ============================================================================
// 测试
// ============================================================================
