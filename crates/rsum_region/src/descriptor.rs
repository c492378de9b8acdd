// crates/rsum_region/src/descriptor.rs

//! 区域集描述符
//!
//! 记录一次运行中注册的全部区域集及各自的最大区域编号，
//! 据此为每个 (区域集, 区域) 对分配平铺存储槽位。
//! 典型的区域集包括内置的 FIPNUM 以及用户自定义的 FIP* 集
//! （如 FIPABC）；PVTNUM 一类的其它分区数组同样可以注册。
//!
//! # 构建协议
//!
//! 描述符的构建是一个多步过程：
//!
//! 1. [`prepare_descriptor_set`](RegionsetVariableDescriptor::prepare_descriptor_set)
//!    清空旧数据并进入注册模式；
//! 2. 通过 [`add_region_set`](RegionsetVariableDescriptor::add_region_set) /
//!    [`add_region_set_scan`](RegionsetVariableDescriptor::add_region_set_scan)
//!    注册一个或多个区域集；
//! 3. [`finalise_descriptor_set`](RegionsetVariableDescriptor::finalise_descriptor_set)
//!    做跨进程 max 归约（默认空操作）并构建 CSR 起始指针表。
//!
//! 定稿后对象即为只读；再次调用 `prepare_descriptor_set` 会丢弃
//! 已有信息，需要重新注册所有区域集。
//!
//! # 槽位布局
//!
//! 最大编号为 M 的区域集占用 M+1 个槽位（编号 0..=M）；
//! 区域集 i 中区域 r 的槽位为 `start_index(i) + r`。
//! 最大编号 -1（或注册时被钳制到 -1）的区域集占用 0 个槽位，
//! 但仍计入区域集数量。

use rsum_foundation::segmented::SegmentedIndex;

use crate::reduce::{self, SharedReduce};

/// 区域集集合的描述符
///
/// 只保存结构信息（每区域集槽位数与起始指针），不保存数值。
#[derive(Debug, Clone)]
pub struct RegionsetVariableDescriptor {
    /// CSR 起始指针表，定稿时构建
    start: SegmentedIndex,

    /// 注册期间的每区域集最大区域编号
    ///
    /// `None` 表示尚未进入注册模式，或已经定稿。
    regset_max_id: Option<Vec<i32>>,

    /// 跨进程归约策略
    reduce: SharedReduce,
}

impl Default for RegionsetVariableDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionsetVariableDescriptor {
    /// 创建空描述符（顺序归约策略）
    pub fn new() -> Self {
        Self::with_reduce(reduce::sequential())
    }

    /// 创建空描述符并注入归约策略
    ///
    /// 并行后端在此注入 max 归约实现；见 [`crate::reduce`]。
    pub fn with_reduce(reduce: SharedReduce) -> Self {
        Self {
            start: SegmentedIndex::new(),
            regset_max_id: None,
            reduce,
        }
    }

    /// 丢弃所有已有信息，准备注册新的区域集集合
    pub fn prepare_descriptor_set(&mut self) {
        self.start = SegmentedIndex::new();
        self.regset_max_id = Some(Vec::new());
    }

    /// 按显式最大区域编号注册一个区域集
    ///
    /// `max_region_id` 会被钳制到不小于 -1；-1 表示空区域集，
    /// 占用 0 个槽位但仍计入区域集数量。
    ///
    /// # Panics
    ///
    /// 未先调用 `prepare_descriptor_set`，或已调用
    /// `finalise_descriptor_set` 时 panic（调用顺序违约）。
    pub fn add_region_set(&mut self, max_region_id: i32) {
        let max_ids = self.regset_max_id.as_mut().expect(
            "cannot register a new region set before calling \
             prepare_descriptor_set() or after calling finalise_descriptor_set()",
        );

        max_ids.push(max_region_id.max(-1));
    }

    /// 注册一个区域集，同时扫描其区域编号序列修正最大编号
    ///
    /// 有效最大编号为 `max(declared_max_region_id, 序列最大值)`；
    /// 序列为空时退化为按 `declared_max_region_id` 注册。
    ///
    /// # Panics
    ///
    /// 与 [`add_region_set`](Self::add_region_set) 相同的调用顺序约束。
    pub fn add_region_set_scan(
        &mut self,
        declared_max_region_id: i32,
        region_ids: impl IntoIterator<Item = i32>,
    ) {
        match region_ids.into_iter().max() {
            // 空序列。按声明值注册。
            None => self.add_region_set(declared_max_region_id),
            Some(scanned_max) => self.add_region_set(declared_max_region_id.max(scanned_max)),
        }
    }

    /// 定稿：归约最大编号并构建 CSR 起始指针表
    ///
    /// 先调用归约策略的
    /// [`reduce_regset_max_ids`](crate::reduce::ReduceStrategy::reduce_regset_max_ids)
    /// （顺序运行为空操作），再由每区域集槽位数（最大编号 + 1）
    /// 构建前缀和。随后释放内部最大编号存储，后续注册需重新
    /// `prepare_descriptor_set`。
    ///
    /// # Panics
    ///
    /// 未先调用 `prepare_descriptor_set` 时 panic（调用顺序违约）。
    pub fn finalise_descriptor_set(&mut self) {
        let mut max_ids = self.regset_max_id.take().expect(
            "cannot finalise descriptor set before calling prepare_descriptor_set()",
        );

        self.reduce.reduce_regset_max_ids(&mut max_ids);

        self.start = SegmentedIndex::from_counts(
            // 最大编号本身也占一个槽位；-1 则为零槽位。
            max_ids.iter().map(|&max_id| (max_id.max(-1) + 1) as usize),
        );
    }

    /// 某区域集的槽位起始索引
    ///
    /// 区域集 `regset` 中区域 `r` 的槽位为 `start_index(regset) + r`。
    /// 仅在定稿后有意义；空描述符返回 0。
    #[inline]
    pub fn start_index(&self, regset: usize) -> usize {
        if self.start.is_empty() {
            0
        } else {
            self.start.start(regset)
        }
    }

    /// 所有区域集所有区域所需的槽位总数
    ///
    /// 仅在定稿后有意义；空描述符返回 0。
    #[inline]
    pub fn num_variable_slots(&self) -> usize {
        self.start.total_len()
    }

    /// 已注册的区域集数量
    ///
    /// 仅在定稿后有意义；空描述符返回 0。
    #[inline]
    pub fn num_region_sets(&self) -> usize {
        self.start.num_segments()
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty() {
        let d = RegionsetVariableDescriptor::new();

        assert_eq!(d.num_region_sets(), 0);
        assert_eq!(d.num_variable_slots(), 0);
        assert_eq!(d.start_index(0), 0);
    }

    #[test]
    fn test_prepared_but_no_registrations() {
        // 注册模式下没有任何区域集，定稿后依然是空描述符
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 0);
        assert_eq!(d.num_variable_slots(), 0);
    }

    #[test]
    fn test_single_regset_single_region() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(0); // "FIELD" 之类
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 1);
        assert_eq!(d.start_index(0), 0);
    }

    #[test]
    fn test_single_regset_multiple_regions() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(5); // 支持区域 0..=5
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 6);
        assert_eq!(d.start_index(0), 0);
    }

    #[test]
    fn test_empty_regset_contributes_zero_slots() {
        // 最大编号 -1：合法的空区域集，零槽位但区域集计数加一
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(-1);
        d.add_region_set(3);
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 2);
        assert_eq!(d.num_variable_slots(), 4);
        assert_eq!(d.start_index(0), 0);
        assert_eq!(d.start_index(1), 0);
    }

    #[test]
    fn test_max_id_clamped_to_minus_one() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(-17);
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 0);
    }

    #[test]
    fn test_scan_declared_wins() {
        let regions = vec![1, 1, 2, 2, 1, 1, 3];

        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set_scan(5, regions.iter().copied());
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 6);
    }

    #[test]
    fn test_scan_scanned_wins() {
        let regions = vec![1, 1, 2, 2, 1, 1, 3];

        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set_scan(2, regions.iter().copied());
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 4);
        assert_eq!(d.start_index(0), 0);
    }

    #[test]
    fn test_scan_empty_sequence_uses_declared() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set_scan(5, std::iter::empty());
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 6);
    }

    #[test]
    fn test_two_regsets() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(5); // 支持区域 0..=5
        d.add_region_set(3); // 支持区域 0..=3
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 2);
        assert_eq!(d.num_variable_slots(), 10);
        assert_eq!(d.start_index(0), 0);
        assert_eq!(d.start_index(1), 6);
    }

    #[test]
    fn test_two_regsets_scan() {
        let reg_1 = vec![1, 1, 2, 2, 1, 1, 3];
        let reg_2 = [1, 1, 2, 2, 1, 1, 3];

        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set_scan(3, reg_1.iter().copied());
        d.add_region_set_scan(5, reg_2.iter().copied());
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 2);
        assert_eq!(d.num_variable_slots(), 10);
        assert_eq!(d.start_index(0), 0);
        assert_eq!(d.start_index(1), 4);
    }

    #[test]
    fn test_multiple_regsets_scan() {
        let reg_1: Vec<i32> = vec![];
        let reg_2 = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let reg_3 = vec![3, 14, 1, 5, 9, 26];
        let reg_4 = vec![0, 0, 0, 0, 0, 0];
        let reg_5 = vec![11, 22, 33, 17, 29];
        let reg_6 = [0, 1, 0, 2, 3, 0, 1];

        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set_scan(5, reg_1.iter().copied()); // max ID =  5
        d.add_region_set_scan(42, reg_2.iter().copied()); // max ID = 42
        d.add_region_set_scan(0, reg_3.iter().copied()); // max ID = 26
        d.add_region_set_scan(0, reg_4.iter().copied()); // max ID =  0
        d.add_region_set_scan(11, reg_5.iter().copied()); // max ID = 33
        d.add_region_set_scan(5, reg_6.iter().copied()); // max ID =  5
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 6);
        assert_eq!(d.num_variable_slots(), 117);
        assert_eq!(d.start_index(0), 0);
        assert_eq!(d.start_index(1), 6);
        assert_eq!(d.start_index(2), 49);
        assert_eq!(d.start_index(3), 76);
        assert_eq!(d.start_index(4), 77);
        assert_eq!(d.start_index(5), 111);
    }

    #[test]
    fn test_reprepare_discards_previous_registration() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(9);
        d.finalise_descriptor_set();
        assert_eq!(d.num_variable_slots(), 10);

        d.prepare_descriptor_set();
        d.add_region_set(1);
        d.finalise_descriptor_set();

        assert_eq!(d.num_region_sets(), 1);
        assert_eq!(d.num_variable_slots(), 2);
    }

    #[test]
    #[should_panic(expected = "prepare_descriptor_set")]
    fn test_add_without_prepare_panics() {
        let mut d = RegionsetVariableDescriptor::new();
        d.add_region_set(3);
    }

    #[test]
    #[should_panic(expected = "prepare_descriptor_set")]
    fn test_add_after_finalise_panics() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(3);
        d.finalise_descriptor_set();

        d.add_region_set(4);
    }

    #[test]
    #[should_panic(expected = "finalise descriptor set")]
    fn test_finalise_without_prepare_panics() {
        let mut d = RegionsetVariableDescriptor::new();
        d.finalise_descriptor_set();
    }

    #[test]
    fn test_reduce_hook_runs_before_prefix_sums() {
        use crate::reduce::ReduceStrategy;

        // 另一进程报告了更大的最大编号
        #[derive(Debug)]
        struct OtherRankSawMore;

        impl ReduceStrategy for OtherRankSawMore {
            fn reduce_regset_max_ids(&self, max_ids: &mut [i32]) {
                for id in max_ids.iter_mut() {
                    *id = (*id).max(7);
                }
            }
        }

        let mut d = RegionsetVariableDescriptor::with_reduce(Arc::new(OtherRankSawMore));

        d.prepare_descriptor_set();
        d.add_region_set(3);
        d.add_region_set(9);
        d.finalise_descriptor_set();

        // 3 被归约成 7，9 不变
        assert_eq!(d.num_variable_slots(), 8 + 10);
        assert_eq!(d.start_index(1), 8);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut d = RegionsetVariableDescriptor::new();

        d.prepare_descriptor_set();
        d.add_region_set(3);
        d.finalise_descriptor_set();

        let mut copy = d.clone();
        copy.prepare_descriptor_set();
        copy.add_region_set(1);
        copy.finalise_descriptor_set();

        assert_eq!(d.num_variable_slots(), 4);
        assert_eq!(copy.num_variable_slots(), 2);
    }
}
