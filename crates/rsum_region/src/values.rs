// crates/rsum_region/src/values.rs

//! 区域变量数值存储
//!
//! 为一组区域集上的一组区域级汇总变量保存数值。内部持有两块平铺
//! 缓冲区，均为 `变量数 × num_variable_slots()` 个 `f64`，按变量
//! 主序排列（每个变量占一段连续切片）：
//!
//! - `increment`: 当前累加周期的增量暂存区；
//! - `values`: 已提交的当前值。
//!
//! # 存储分区
//!
//! [`define_variables`](RegionVariableValues::define_variables) 计算一个
//! 置换，把累计变量排到存储前缀 `[0, end_cum)`，其余排到后缀；
//! `storage_ix[原始变量索引]` 记录每个变量落到的存储位置。
//! 这样 [`commit_values`](RegionVariableValues::commit_values) 的折叠就
//! 简化为两段连续区间操作：前缀 `values += increment`（跨周期累计），
//! 后缀 `values = increment`（覆盖为最新快照）。
//!
//! # 生命周期
//!
//! ```text
//! Uninitialized ─ define_variables ─> Defined
//! Defined 内可重复:
//!   prepare_value_accumulation ─> add_region_value* ─> commit_values
//! ```
//!
//! 跳过 `prepare_value_accumulation` 直接累加属于未定义行为：
//! 增量缓冲区可能残留上一周期的数据。
//!
//! # 已知限制
//!
//! 同一周期内 `add_region_value` 的调用顺序只在浮点结合律意义下
//! 可交换；实现不做任何求和顺序规范化。

use std::sync::Arc;

use crate::descriptor::RegionsetVariableDescriptor;
use crate::reduce::{self, SharedReduce};
use crate::view::{RegionVariableView, RegionVariableViewMut};

/// 全部区域集上全部区域级变量的数值集合
#[derive(Debug, Clone)]
pub struct RegionVariableValues {
    /// 当前周期的增量暂存区
    ///
    /// 在 `prepare_value_accumulation` 中清零，在 `commit_values`
    /// 中折叠进 `values`。
    increment: Vec<f64>,

    /// 区域集描述符，与组合根共享
    ///
    /// `None` 表示尚未调用 `define_variables`。
    descr: Option<Arc<RegionsetVariableDescriptor>>,

    /// 每个变量的存储位置
    ///
    /// 变量被重排成累计量连续存储，以简化 `commit_values` 的实现。
    storage_ix: Vec<usize>,

    /// 累计变量与非累计变量的分界，`storage_ix` 意义下的计数
    end_cum: usize,

    /// 已提交的当前值
    values: Vec<f64>,

    /// 跨进程归约策略
    reduce: SharedReduce,
}

impl Default for RegionVariableValues {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionVariableValues {
    /// 创建未初始化的数值集合（顺序归约策略）
    pub fn new() -> Self {
        Self::with_reduce(reduce::sequential())
    }

    /// 创建未初始化的数值集合并注入归约策略
    ///
    /// 并行后端在此注入 sum 归约实现；见 [`crate::reduce`]。
    pub fn with_reduce(reduce: SharedReduce) -> Self {
        Self {
            increment: Vec::new(),
            descr: None,
            storage_ix: Vec::new(),
            end_cum: 0,
            values: Vec::new(),
            reduce,
        }
    }

    /// 定义变量集合
    ///
    /// 每个变量在 `descr` 已知的所有区域集的每个区域上各有一个值。
    /// `is_cumulative.len()` 即变量个数，下标与后续
    /// `add_region_value` / `values` 的 `var_ix` 一致。
    /// 重新定义会丢弃已提交的数值并按新描述符重新分配。
    pub fn define_variables(
        &mut self,
        descr: Arc<RegionsetVariableDescriptor>,
        is_cumulative: &[bool],
    ) {
        self.descr = Some(descr);

        self.partition_variables(is_cumulative);
        self.allocate_values();
    }

    /// 清零增量缓冲区，准备新一轮累加
    ///
    /// 必须在每个周期第一次 `add_region_value` 之前调用。
    pub fn prepare_value_accumulation(&mut self) {
        self.increment.fill(0.0);
    }

    /// 把当前增量折叠进当前值
    ///
    /// 先调用归约策略的
    /// [`reduce_increment`](crate::reduce::ReduceStrategy::reduce_increment)
    /// （顺序运行为空操作），再做折叠：累计变量 `values += increment`，
    /// 非累计变量 `values = increment`。
    ///
    /// 必须在本周期最后一次 `add_region_value` 之后调用。
    ///
    /// # Panics
    ///
    /// 在 `define_variables` 之前调用时 panic（调用顺序违约）。
    pub fn commit_values(&mut self) {
        let descr = self
            .descr
            .as_deref()
            .expect("cannot commit values before calling define_variables()");

        self.reduce.reduce_increment(&mut self.increment);

        let end_cum = self.end_cum * descr.num_variable_slots();

        // 累计量：values += increment
        for (value, inc) in self.values[..end_cum]
            .iter_mut()
            .zip(&self.increment[..end_cum])
        {
            *value += inc;
        }

        // 非累计量：values = increment
        self.values[end_cum..].copy_from_slice(&self.increment[end_cum..]);
    }

    /// 向某变量的某区域加入一份贡献
    ///
    /// `x` 累加进 `(var_ix, regset_ix, region_ix)` 对应的增量槽位，
    /// 例如一个单元的流体体积或一条连接的流量。
    ///
    /// `var_ix` 超出变量范围时静默忽略（软条件，容忍本次运行未
    /// 定义的可选变量）；注意与 [`values`](Self::values) 返回
    /// `None` 的不对称是沿袭原有行为的刻意保留。
    /// 越界的 `(regset_ix, region_ix)` 组合属于调用方错误，
    /// 仅在 debug 模式断言。
    pub fn add_region_value(
        &mut self,
        var_ix: usize,
        regset_ix: usize,
        region_ix: usize,
        x: f64,
    ) {
        if var_ix >= self.storage_ix.len() {
            return;
        }

        // storage_ix 非空意味着 define_variables 已经执行过
        let descr = self
            .descr
            .as_deref()
            .expect("cannot add region values before calling define_variables()");

        let num_slots = descr.num_variable_slots();
        let view_ix = self.storage_ix[var_ix];

        let slice = &mut self.increment[num_slots * view_ix..num_slots * (view_ix + 1)];

        *RegionVariableViewMut::new(slice, descr).element_mut(regset_ix, region_ix) += x;
    }

    /// 某变量在所有区域集上的已提交数值，只读视图
    ///
    /// `var_ix` 超出变量范围时返回 `None`。
    pub fn values(&self, var_ix: usize) -> Option<RegionVariableView<'_, f64>> {
        if var_ix >= self.storage_ix.len() {
            return None;
        }

        let descr = self
            .descr
            .as_deref()
            .expect("cannot read values before calling define_variables()");

        let num_slots = descr.num_variable_slots();
        let view_ix = self.storage_ix[var_ix];

        Some(RegionVariableView::new(
            &self.values[num_slots * view_ix..num_slots * (view_ix + 1)],
            descr,
        ))
    }

    /// 已定义的变量个数
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.storage_ix.len()
    }

    // ------------------------------------------------------------------
    // 私有辅助
    // ------------------------------------------------------------------

    /// 计算累计量优先的存储置换
    fn partition_variables(&mut self, is_cumulative: &[bool]) {
        let mut order: Vec<usize> = (0..is_cumulative.len()).collect();

        // 稳定分区：累计变量保持相对顺序排到前面
        order.sort_by_key(|&ix| !is_cumulative[ix]);

        self.end_cum = is_cumulative.iter().filter(|&&cumulative| cumulative).count();

        self.storage_ix = vec![0; order.len()];
        for (storage_pos, &var) in order.iter().enumerate() {
            self.storage_ix[var] = storage_pos;
        }
    }

    /// 按描述符大小分配 increment 与 values
    fn allocate_values(&mut self) {
        let descr = self
            .descr
            .as_deref()
            .expect("descriptor must be set before allocating values");

        let num_elem = self.storage_ix.len() * descr.num_variable_slots();

        self.values = vec![0.0; num_elem];
        self.increment.resize(num_elem, 0.0);
    }
}

// ============================================================================
// 测试
// ============================================================================
