// crates/rsum_config/src/run_config.rs

//! RunConfig - 数据驱动运行的配置
//!
//! 用 JSON 描述一次聚合运行：区域集（名称 + 每单元区域编号）、
//! 变量（名称 + 累计标志）以及逐周期的单元贡献列表。
//! 所有数值使用 f64 存储以便 JSON 序列化。

use serde::{Deserialize, Serialize};
use std::path::Path;

use rsum_region::mapping::RegionVariableMapping;
use rsum_region::source::StaticRegionSource;

use crate::error::ConfigError;

/// 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// 运行声明的最大区域编号（TABDIMS/REGDIMS 风格）
    #[serde(default = "default_declared_max_region_id")]
    pub declared_max_region_id: i32,

    /// 区域集定义
    #[serde(default)]
    pub region_sets: Vec<RegionSetConfig>,

    /// 变量定义
    #[serde(default)]
    pub variables: Vec<VariableConfig>,

    /// 累加周期，按顺序执行
    #[serde(default)]
    pub cycles: Vec<CycleConfig>,
}

fn default_declared_max_region_id() -> i32 {
    0
}

/// 单个区域集的定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSetConfig {
    /// 区域集名（如 "FIPNUM"）
    pub name: String,

    /// 每单元区域编号，长度等于活动单元数
    pub region_ids: Vec<i32>,
}

/// 单个区域变量的定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableConfig {
    /// 变量名（如 "ROPT"）
    pub name: String,

    /// 是否为累计量
    #[serde(default)]
    pub cumulative: bool,
}

/// 单个累加周期
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleConfig {
    /// 本周期的单元贡献
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

/// 一份单元贡献
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    /// 变量名
    pub variable: String,

    /// 活动单元索引
    pub cell: usize,

    /// 贡献值
    pub value: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            declared_max_region_id: default_declared_max_region_id(),
            region_sets: Vec::new(),
            variables: Vec::new(),
            cycles: Vec::new(),
        }
    }
}

impl RunConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;

        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 把配置写成 JSON 文件
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        std::fs::write(path, text)?;

        Ok(())
    }

    /// 活动单元数（取第一个区域集数组的长度）
    pub fn num_cells(&self) -> usize {
        self.region_sets
            .first()
            .map_or(0, |regset| regset.region_ids.len())
    }

    /// 校验配置
    ///
    /// 检查名称非空、区域编号非负、各区域集数组等长、
    /// 贡献引用的变量已声明且单元索引在范围内。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.declared_max_region_id < -1 {
            return Err(ConfigError::invalid_value(
                "declared_max_region_id",
                self.declared_max_region_id.to_string(),
                "必须不小于 -1",
            ));
        }

        let num_cells = self.num_cells();

        for regset in &self.region_sets {
            if regset.name.is_empty() {
                return Err(ConfigError::Missing("region_sets[].name".into()));
            }

            if regset.region_ids.len() != num_cells {
                return Err(ConfigError::invalid_value(
                    format!("region_sets['{}'].region_ids", regset.name),
                    regset.region_ids.len().to_string(),
                    format!("长度必须等于活动单元数 {num_cells}"),
                ));
            }

            if let Some(&bad) = regset.region_ids.iter().find(|&&id| id < 0) {
                return Err(ConfigError::invalid_value(
                    format!("region_sets['{}'].region_ids", regset.name),
                    bad.to_string(),
                    "区域编号必须非负",
                ));
            }
        }

        for var in &self.variables {
            if var.name.is_empty() {
                return Err(ConfigError::Missing("variables[].name".into()));
            }
        }

        for (cycle_ix, cycle) in self.cycles.iter().enumerate() {
            for contribution in &cycle.contributions {
                if !self
                    .variables
                    .iter()
                    .any(|var| var.name == contribution.variable)
                {
                    return Err(ConfigError::invalid_value(
                        format!("cycles[{cycle_ix}].contributions[].variable"),
                        contribution.variable.clone(),
                        "变量未声明",
                    ));
                }

                if contribution.cell >= num_cells {
                    return Err(ConfigError::invalid_value(
                        format!("cycles[{cycle_ix}].contributions[].cell"),
                        contribution.cell.to_string(),
                        format!("单元索引必须小于 {num_cells}"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// 按配置构建名称映射（已提交）
    pub fn build_mapping(&self) -> RegionVariableMapping {
        let mut mapping = RegionVariableMapping::new();

        mapping.prepare_registration();

        for regset in &self.region_sets {
            mapping.add_region_set(&regset.name);
        }

        for var in &self.variables {
            mapping.add_variable(&var.name, var.cumulative);
        }

        mapping.commit_structure();

        mapping
    }

    /// 按配置构建静态区域编号源
    pub fn build_source(&self) -> StaticRegionSource {
        let mut source = StaticRegionSource::new();

        for regset in &self.region_sets {
            source.insert(&regset.name, regset.region_ids.clone());
        }

        source
    }
}

// ============================================================================
// 测试
// ============================================================================
