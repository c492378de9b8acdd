// crates/rsum_region/src/mapping.rs

//! 名称到数值索引的映射
//!
//! 把人类可读的区域集名（"FIPNUM"、"FIPABC"）与区域变量名
//! （"ROPR"、"RGIT"）映射到稳定的数值索引，并记录每个变量是否为
//! 累计量。两张名称表相互独立，各自遵循
//! prepare → add* → commit 生命周期：
//!
//! - 提交时排序并去重，重复注册折叠为一个索引（首次注册生效）；
//! - 提交后通过二分查找做 O(log n) 名称查询；
//! - 提交后名称按字典序呈现，最终索引即排序后的位置；
//! - 提交前取得的变量索引一律无效。
//!
//! # 示例
//!
//! ```
//! use rsum_region::mapping::RegionVariableMapping;
//!
//! let mut m = RegionVariableMapping::new();
//! m.prepare_registration();
//! m.add_region_set("FIPNUM");
//! m.add_variable("ROPT", true);
//! m.add_variable("RPR", false);
//! m.commit_structure();
//!
//! assert_eq!(m.region_set_index("FIPNUM").map(|i| i.get()), Some(0));
//! assert_eq!(m.is_cumulative_by_name("ROPT"), Some(true));
//! assert_eq!(m.variable_index("nope"), None);
//! ```

use rsum_foundation::index::{RegionSetIdx, VariableIdx};

// ============================================================================
// 内部：排序去重名称表
// ============================================================================

/// 排序去重的名称表
///
/// 提交前是插入序的普通列表；提交后排序去重，支持二分查找。
#[derive(Debug, Clone, Default)]
struct NameTable {
    /// 名称集合，提交后排序且无重复
    names: Vec<String>,
}

impl NameTable {
    /// 清空内部数据
    fn clear(&mut self) {
        self.names.clear();
    }

    /// 追加一个名称
    fn add(&mut self, name: &str) {
        self.names.push(name.to_owned());
    }

    /// 排序并去重
    ///
    /// 返回按排序顺序给出的、去重后保留下来的原始插入位置。
    /// 稳定排序保证同名项中首次插入的位置胜出，调用方据此挑选
    /// 每个保留名称对应的首次注册属性。
    fn commit(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.names.len()).collect();
        order.sort_by(|&i1, &i2| self.names[i1].cmp(&self.names[i2]));
        order.dedup_by(|&mut i1, &mut i2| self.names[i1] == self.names[i2]);

        self.names = order.iter().map(|&ix| self.names[ix].clone()).collect();

        order
    }

    /// 当前名称集合
    fn names(&self) -> &[String] {
        &self.names
    }

    /// 名称的数值索引，二分查找
    ///
    /// 只能在 commit 之后调用；未知名称返回 `None`。
    fn index(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }
}

// ============================================================================
// 映射
// ============================================================================

/// 命名区域集与命名区域变量的索引映射
#[derive(Debug, Clone, Default)]
pub struct RegionVariableMapping {
    /// 命名区域集表
    regsets: NameTable,

    /// 命名区域变量表
    vars: NameTable,

    /// 每变量的累计标志；提交后与 `vars` 的最终索引对齐
    is_cumulative: Vec<bool>,

    /// 是否已调用 `commit_structure`
    is_final: bool,
}

impl RegionVariableMapping {
    /// 创建空映射
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空并进入注册模式
    pub fn prepare_registration(&mut self) {
        self.regsets.clear();
        self.vars.clear();
        self.is_cumulative.clear();

        self.is_final = false;
    }

    /// 定稿名称映射结构
    ///
    /// 排序去重两张名称表；同一名称注册多次时，保留首次注册的
    /// 累计标志。定稿后不得再注册。
    pub fn commit_structure(&mut self) {
        self.regsets.commit();

        let kept = self.vars.commit();
        self.make_unique_cumulative(&kept);

        self.is_final = true;
    }

    /// 注册一个命名区域集
    ///
    /// # Panics
    ///
    /// 在 `commit_structure` 之后调用时 panic（调用顺序违约）。
    pub fn add_region_set(&mut self, name: &str) {
        self.ensure_registration_possible("region set", name);

        self.regsets.add(name);
    }

    /// 注册一个命名区域变量及其累计标志
    ///
    /// # Panics
    ///
    /// 在 `commit_structure` 之后调用时 panic（调用顺序违约）。
    pub fn add_variable(&mut self, name: &str, is_cumulative: bool) {
        self.ensure_registration_possible("variable", name);

        self.vars.add(name);
        self.is_cumulative.push(is_cumulative);
    }

    /// 已知命名区域集数量
    ///
    /// 仅在 `commit_structure` 之后有意义。
    pub fn num_region_sets(&self) -> usize {
        self.regsets.names().len()
    }

    /// 已知命名区域变量数量
    ///
    /// 仅在 `commit_structure` 之后有意义。
    pub fn num_variables(&self) -> usize {
        self.vars.names().len()
    }

    /// 已知命名区域集，按字典序
    pub fn region_sets(&self) -> &[String] {
        self.regsets.names()
    }

    /// 已知命名区域变量，按字典序
    pub fn variables(&self) -> &[String] {
        self.vars.names()
    }

    /// 命名区域集的数值索引
    ///
    /// 未知名称返回 `None`。
    ///
    /// # Panics
    ///
    /// 在 `commit_structure` 之前调用时 panic（调用顺序违约）。
    pub fn region_set_index(&self, name: &str) -> Option<RegionSetIdx> {
        self.ensure_final_structure("region set", name);

        self.regsets.index(name).map(RegionSetIdx::new)
    }

    /// 命名区域变量的数值索引
    ///
    /// 未知名称返回 `None`。
    ///
    /// # Panics
    ///
    /// 在 `commit_structure` 之前调用时 panic（调用顺序违约）。
    pub fn variable_index(&self, name: &str) -> Option<VariableIdx> {
        self.ensure_final_structure("variable", name);

        self.vars.index(name).map(VariableIdx::new)
    }

    /// 按名称查询变量是否为累计量
    ///
    /// 实际返回首次注册该变量时的 `is_cumulative` 参数；
    /// 未知变量返回 `None`。
    pub fn is_cumulative_by_name(&self, name: &str) -> Option<bool> {
        let i = self.variable_index(name)?;

        Some(self.is_cumulative(i))
    }

    /// 按数值索引查询变量是否为累计量
    ///
    /// 为绕过名称查找提供的捷径；索引正确性由调用方负责，
    /// 不做范围检查（越界即 panic）。
    #[inline]
    pub fn is_cumulative(&self, i: VariableIdx) -> bool {
        self.is_cumulative[i.as_usize()]
    }

    /// 按映射的最终变量顺序收集累计标志
    ///
    /// 即 `values::RegionVariableValues::define_variables` 期望的
    /// `is_cumulative` 输入。
    pub fn cumulative_flags(&self) -> Vec<bool> {
        self.is_cumulative.clone()
    }

    // ------------------------------------------------------------------
    // 私有辅助
    // ------------------------------------------------------------------

    /// 确认仍处于注册模式
    fn ensure_registration_possible(&self, kind: &str, name: &str) {
        if !self.is_final {
            // 结构尚未提交。没问题。
            return;
        }

        panic!("cannot register a {kind} named '{name}' after the mapping's structure is finalised");
    }

    /// 确认结构已定稿
    fn ensure_final_structure(&self, kind: &str, name: &str) {
        if self.is_final {
            // 结构已定稿。没问题。
            return;
        }

        panic!(
            "cannot request properties of {kind} named '{name}' before the mapping's structure is finalised"
        );
    }

    /// 压缩重排累计标志，与去重后的变量索引对齐
    ///
    /// `kept` 为 `NameTable::commit` 的返回值：按排序顺序保留下来的
    /// 原始插入位置。
    fn make_unique_cumulative(&mut self, kept: &[usize]) {
        self.is_cumulative = kept.iter().map(|&orig_ix| self.is_cumulative[orig_ix]).collect();
    }
}

// ============================================================================
// 测试
// ============================================================================
