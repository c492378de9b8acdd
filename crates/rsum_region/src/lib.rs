// crates/rsum_region/src/lib.rs

//! RegSum 区域汇总核心层
//!
//! 把逐单元的物理量贡献（流体体积、流量等）累加成逐区域合计，
//! 供汇总时间序列输出使用。支持任意多个命名区域集
//! （如 FIPNUM、FIPABC），并始终维护一个合成的全域 FIELD 合计。
//!
//! # 模块概览
//!
//! - [`descriptor`]: 区域集描述符，CSR 槽位分配
//! - [`mapping`]: 名称到数值索引的映射，含累计标志
//! - [`view`]: 按 (区域集, 区域) 寻址的切片视图
//! - [`values`]: 数值存储与两阶段累加协议
//! - [`collection`]: 组合根，单元值到区域值的扇出
//! - [`source`]: 每单元区域编号数组的提供者接口
//! - [`reduce`]: 并行归约扩展点
//! - [`snapshot`]: 已提交数值的序列化快照
//!
//! # 累加协议
//!
//! ```text
//! initialise ─> ( prepare_value_accumulation ─> add_cell_value* ─> commit_values )*
//! ```
//!
//! 累计变量跨提交周期求和，非累计变量每周期覆盖。
//!
//! # 示例
//!
//! ```
//! use rsum_region::collection::RegionVariableCollection;
//! use rsum_region::mapping::RegionVariableMapping;
//! use rsum_region::source::StaticRegionSource;
//! use rsum_foundation::index::CellIdx;
//!
//! let mut mapping = RegionVariableMapping::new();
//! mapping.prepare_registration();
//! mapping.add_region_set("FIPNUM");
//! mapping.add_variable("ROPR", false);
//! mapping.commit_structure();
//!
//! let mut source = StaticRegionSource::new();
//! source.insert("FIPNUM", vec![1, 1, 2, 2, 1, 1, 3]);
//!
//! let mut coll = RegionVariableCollection::default();
//! coll.initialise(3, &source, &mapping).unwrap();
//!
//! let ropr = coll.variable_index(&mapping, "ROPR").unwrap();
//! coll.prepare_value_accumulation();
//! coll.add_cell_value(ropr, CellIdx::new(0), 1.5);
//! coll.commit_values();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod descriptor;
pub mod mapping;
pub mod reduce;
pub mod snapshot;
pub mod source;
pub mod values;
pub mod view;

// 重导出核心类型
pub use collection::RegionVariableCollection;
pub use descriptor::RegionsetVariableDescriptor;
pub use mapping::RegionVariableMapping;
pub use reduce::{ReduceStrategy, SequentialReduce};
pub use snapshot::{RegionSummarySnapshot, SnapshotMeta};
pub use source::{RegionIdSource, StaticRegionSource};
pub use values::RegionVariableValues;
pub use view::{RegionVariableView, RegionVariableViewMut};
