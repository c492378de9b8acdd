// crates/rsum_region/src/collection.rs

//! 区域变量汇总集合（组合根）
//!
//! 把描述符、数值存储和每区域集的区域编号数组组合在一起，
//! 对外提供以单元为粒度的累加入口：
//! [`add_cell_value`](RegionVariableCollection::add_cell_value)
//! 把一份单元贡献扇出到合成的 FIELD 合计以及每个命名区域集中
//! 该单元所属的区域，共 `1 + 命名区域集数` 次区域级累加。
//!
//! # FIELD 约定
//!
//! 描述符/数值空间的 0 号区域集恒为合成的 "FIELD" 全域合计，
//! 只有一个区域（编号 0），不对应任何命名分区；命名区域集依次
//! 占用索引 1..=N。
//!
//! # 两阶段协议
//!
//! `prepare_value_accumulation` / `commit_values` 纯粹转发给数值
//! 存储，集合本身不附加任何语义。

use std::sync::Arc;

use rsum_foundation::ensure;
use rsum_foundation::error::{RsumError, RsumResult};
use rsum_foundation::index::{CellIdx, RegionSetIdx, VariableIdx};

use crate::descriptor::RegionsetVariableDescriptor;
use crate::mapping::RegionVariableMapping;
use crate::source::RegionIdSource;
use crate::values::RegionVariableValues;

/// 全部区域集上全部区域级变量的管理结构
#[derive(Debug, Clone, Default)]
pub struct RegionVariableCollection {
    /// 区域集描述符，`initialise` 后与数值存储共享
    descr: Arc<RegionsetVariableDescriptor>,

    /// 全部变量在全部区域集上的数值
    vals: RegionVariableValues,

    /// 每个命名区域集的每单元区域编号数组
    ///
    /// 与传给 `initialise` 的映射中的区域集一一对应（字典序）。
    reg_set: Vec<Arc<[i32]>>,
}

impl RegionVariableCollection {
    /// 以注入的描述符与数值存储创建空集合
    ///
    /// 两个子对象通常是默认构造的；并行后端注入带归约策略的实例。
    pub fn new(descr: RegionsetVariableDescriptor, vals: RegionVariableValues) -> Self {
        Self {
            descr: Arc::new(descr),
            vals,
            reg_set: Vec::new(),
        }
    }

    /// 构建内部结构并为全部变量、全部区域集分配数值存储
    ///
    /// 分两步：先构建描述符（FIELD 恒为 0 号区域集、单区域；
    /// 映射中的每个命名区域集各占一个条目，扫描其区域编号数组并
    /// 结合 `declared_max_reg_id` 确定槽位数），再按映射的变量顺序
    /// 定义数值存储。
    ///
    /// 仅当映射同时含有至少一个区域集与至少一个变量时才注册
    /// FIELD 与命名区域集；描述符无论如何都会定稿。
    ///
    /// # Errors
    ///
    /// 某命名区域集在 `source` 中没有区域编号数组，或各数组长度
    /// 不一致时返回错误。
    pub fn initialise(
        &mut self,
        declared_max_reg_id: i32,
        source: &dyn RegionIdSource,
        mapping: &RegionVariableMapping,
    ) -> RsumResult<()> {
        self.initialise_region_descriptors(declared_max_reg_id, source, mapping)?;

        self.initialise_region_values(mapping);

        Ok(())
    }

    /// 向单个变量加入一份单元贡献，扇出到所有区域集
    ///
    /// 每次调用都把 `x` 计入 FIELD（0 号区域集的 0 号区域），
    /// 并对每个命名区域集查出该单元所属区域、计入对应槽位。
    /// `var` 超出变量范围时整体静默忽略（与
    /// [`RegionVariableValues::add_region_value`] 一致）。
    ///
    /// # Panics
    ///
    /// `cell` 超出区域编号数组长度时越界 panic（调用方错误）。
    pub fn add_cell_value(&mut self, var: VariableIdx, cell: CellIdx, x: f64) {
        let var_ix = var.as_usize();

        // FIELD
        self.vals.add_region_value(var_ix, 0, 0, x);

        for (regset_ix, region_ids) in self.reg_set.iter().enumerate() {
            let region = region_ids[cell.as_usize()];
            debug_assert!(region >= 0, "region ids must be non-negative");

            // +1 为 FIELD 让位
            self.vals
                .add_region_value(var_ix, regset_ix + 1, region as usize, x);
        }
    }

    /// 清零增量缓冲区，准备新一轮累加
    ///
    /// 必须在每个周期第一次 `add_cell_value` 之前调用。
    pub fn prepare_value_accumulation(&mut self) {
        self.vals.prepare_value_accumulation();
    }

    /// 把当前增量折叠进当前值
    ///
    /// 累计变量累加，非累计变量覆盖；
    /// 必须在本周期最后一次 `add_cell_value` 之后调用。
    pub fn commit_values(&mut self) {
        self.vals.commit_values();
    }

    /// 区域集名到数值区域集索引的翻译
    ///
    /// 认识特殊的 "FIELD" 区域集（索引 0）；命名区域集的索引为
    /// 映射索引加一。未知名称返回 `None`。
    ///
    /// `mapping` 必须是传给 `initialise` 的同一个映射对象。
    pub fn region_set_index(
        &self,
        mapping: &RegionVariableMapping,
        region_set: &str,
    ) -> Option<RegionSetIdx> {
        if region_set == "FIELD" {
            return Some(RegionSetIdx::new(0));
        }

        // 注: +1 为 FIELD 的内部表示让位
        mapping
            .region_set_index(region_set)
            .map(|i| RegionSetIdx::new(1 + i.get()))
    }

    /// 变量名到数值变量索引的翻译
    ///
    /// 未知名称返回 `None`。`mapping` 必须是传给 `initialise` 的
    /// 同一个映射对象。
    pub fn variable_index(
        &self,
        mapping: &RegionVariableMapping,
        variable: &str,
    ) -> Option<VariableIdx> {
        mapping.variable_index(variable)
    }

    /// 全部区域级变量在全部区域集上的当前数值
    pub fn region_variable_values(&self) -> &RegionVariableValues {
        &self.vals
    }

    /// 当前区域集描述符
    pub fn descriptor(&self) -> &RegionsetVariableDescriptor {
        &self.descr
    }

    // ------------------------------------------------------------------
    // 私有辅助
    // ------------------------------------------------------------------

    /// 构建区域集描述符与区域编号数组序列
    fn initialise_region_descriptors(
        &mut self,
        declared_max_reg_id: i32,
        source: &dyn RegionIdSource,
        mapping: &RegionVariableMapping,
    ) -> RsumResult<()> {
        let mut descr = (*self.descr).clone();

        descr.prepare_descriptor_set();
        self.reg_set.clear();

        if mapping.num_region_sets() > 0 && mapping.num_variables() > 0 {
            // FIELD
            descr.add_region_set(0);

            for regset in mapping.region_sets() {
                let region_ids = source.region_ids(regset).ok_or_else(|| {
                    RsumError::not_found(format!("region id array for region set '{regset}'"))
                })?;

                ensure!(
                    region_ids.len() == self.reg_set.first().map_or(region_ids.len(), |ids| ids.len()),
                    RsumError::size_mismatch(
                        "region id array",
                        self.reg_set[0].len(),
                        region_ids.len(),
                    )
                );

                descr.add_region_set_scan(declared_max_reg_id, region_ids.iter().copied());

                self.reg_set.push(region_ids);
            }
        }

        descr.finalise_descriptor_set();

        tracing::debug!(
            region_sets = descr.num_region_sets(),
            slots = descr.num_variable_slots(),
            "region descriptor finalised"
        );

        self.descr = Arc::new(descr);

        Ok(())
    }

    /// 构建区域变量数值对象
    fn initialise_region_values(&mut self, mapping: &RegionVariableMapping) {
        let is_cumulative: Vec<bool> = (0..mapping.num_variables())
            .map(|var_ix| mapping.is_cumulative(VariableIdx::new(var_ix)))
            .collect();

        self.vals
            .define_variables(Arc::clone(&self.descr), &is_cumulative);
    }
}

// ============================================================================
// 测试
// ============================================================================
