// crates/rsum_region/src/snapshot.rs

//! 已提交数值的序列化快照
//!
//! 汇总输出端（时间序列写出、检查点、跨模块传输）需要的是
//! 按名称组织的只读数据副本，而不是内部的平铺存储布局。
//! 本模块把集合中已提交的数值按 (变量名, 区域集名) 重新组织成
//! 轻量级的 serde 结构。
//!
//! 快照只做数据搬运，不负责任何文件格式；序列化格式由调用方
//! 选择（CLI 写 JSON）。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::collection::RegionVariableCollection;
use crate::mapping::RegionVariableMapping;

/// 快照元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// 创建时间戳（Unix 秒）
    pub created_at: i64,
    /// 描述信息
    pub description: Option<String>,
}

/// 单个区域集上的一列区域值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSetValues {
    /// 区域集名；合成合计记为 "FIELD"
    pub name: String,
    /// 区域 0..=最大编号 的值
    pub values: Vec<f64>,
}

/// 单个变量在全部区域集上的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSummary {
    /// 变量名
    pub name: String,
    /// 是否为累计量
    pub cumulative: bool,
    /// 每区域集一列区域值，FIELD 在前
    pub region_sets: Vec<RegionSetValues>,
}

/// 全部区域级变量的快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummarySnapshot {
    /// 元数据
    pub meta: SnapshotMeta,
    /// 每变量一条汇总，按变量名字典序
    pub variables: Vec<VariableSummary>,
}

impl RegionSummarySnapshot {
    /// 从集合中拷出已提交的数值
    ///
    /// `mapping` 必须是初始化该集合时使用的同一个映射对象。
    /// 变量按映射的字典序排列；每个变量下先列 FIELD，再按字典序
    /// 列出各命名区域集。
    pub fn from_collection(
        coll: &RegionVariableCollection,
        mapping: &RegionVariableMapping,
    ) -> Self {
        let descr = coll.descriptor();
        let vals = coll.region_variable_values();

        // FIELD 在前，命名区域集字典序在后；与描述符索引一致
        let regset_names: Vec<&str> = std::iter::once("FIELD")
            .chain(mapping.region_sets().iter().map(String::as_str))
            .collect();

        let mut variables = Vec::with_capacity(mapping.num_variables());

        for name in mapping.variables() {
            let Some(var) = mapping.variable_index(name) else {
                continue;
            };
            let Some(view) = vals.values(var.as_usize()) else {
                continue;
            };

            let mut region_sets = Vec::with_capacity(descr.num_region_sets());

            for (regset_ix, regset_name) in regset_names.iter().enumerate() {
                if regset_ix >= descr.num_region_sets() {
                    break;
                }

                let num_regions =
                    descr.start_index(regset_ix + 1) - descr.start_index(regset_ix);

                region_sets.push(RegionSetValues {
                    name: (*regset_name).to_owned(),
                    values: (0..num_regions)
                        .map(|region| view.element(regset_ix, region))
                        .collect(),
                });
            }

            variables.push(VariableSummary {
                name: name.clone(),
                cumulative: mapping.is_cumulative(var),
                region_sets,
            });
        }

        Self {
            meta: SnapshotMeta {
                created_at: Utc::now().timestamp(),
                description: None,
            },
            variables,
        }
    }

    /// 附加描述信息
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    /// 按名称取某个变量的汇总
    pub fn variable(&self, name: &str) -> Option<&VariableSummary> {
        self.variables.iter().find(|v| v.name == name)
    }
}

// ============================================================================
// 测试
// ============================================================================
