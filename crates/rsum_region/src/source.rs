// crates/rsum_region/src/source.rs

//! 每单元区域编号数组的提供者接口
//!
//! 汇总集合需要知道每个活动单元在每个区域集里属于哪个区域。
//! 这些静态分区数组（FIPNUM 一类关键字的取值）由运行的静态属性
//! 管理端维护；本模块只抽象出核心消费的那一个能力。
//!
//! 数组以 `Arc<[i32]>` 句柄交付：集合保留共享所有权，
//! 属性源的生命周期不再约束集合。

use std::collections::HashMap;
use std::sync::Arc;

/// 区域编号数组提供者
///
/// 实现方通常是网格静态属性管理端；对未知区域集返回 `None`。
pub trait RegionIdSource {
    /// 取区域集 `regset` 的每单元区域编号数组
    ///
    /// 数组长度等于活动单元数，元素为非负区域编号。
    fn region_ids(&self, regset: &str) -> Option<Arc<[i32]>>;
}

/// 静态内存实现：名称到区域编号数组的映射
///
/// 供配置驱动的运行与测试使用。
#[derive(Debug, Clone, Default)]
pub struct StaticRegionSource {
    /// 区域集名 → 每单元区域编号
    arrays: HashMap<String, Arc<[i32]>>,
}

impl StaticRegionSource {
    /// 创建空源
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个区域集的每单元区域编号数组
    ///
    /// 同名数组被替换。
    pub fn insert(&mut self, regset: &str, region_ids: Vec<i32>) {
        self.arrays.insert(regset.to_owned(), region_ids.into());
    }

    /// 已注册的区域集数量
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }
}

impl RegionIdSource for StaticRegionSource {
    fn region_ids(&self, regset: &str) -> Option<Arc<[i32]>> {
        self.arrays.get(regset).cloned()
    }
}

// ============================================================================
// 测试
// ============================================================================
