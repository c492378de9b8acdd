// crates/rsum_region/src/view.rs

//! 按 (区域集, 区域) 寻址的数值视图
//!
//! 在一段连续数值切片上提供二维寻址：切片必须恰好为每个区域集的
//! 每个区域各存一个标量，即长度等于描述符的
//! [`num_variable_slots`](crate::descriptor::RegionsetVariableDescriptor::num_variable_slots)。
//! 视图不拥有数据，只负责把 `(regset, region)` 翻译成
//! `start_index(regset) + region`。
//!
//! 元素类型约束为 [`bytemuck::Pod`]，与数值缓冲区的平铺标量布局
//! 一致；整型与浮点均可。
//!
//! 越界的 `(regset, region)` 组合属于调用方错误，仅在 debug 模式
//! 断言；长度不匹配则是构造时立即 panic 的契约违约。

use bytemuck::Pod;

use crate::descriptor::RegionsetVariableDescriptor;

/// 把 (区域集, 区域) 翻译成平铺索引
///
/// 读写两种视图共用的寻址逻辑。
#[inline]
fn element_index(
    descriptor: &RegionsetVariableDescriptor,
    regset: usize,
    region: usize,
) -> usize {
    debug_assert!(regset < descriptor.num_region_sets());
    debug_assert!(descriptor.start_index(regset) + region < descriptor.start_index(regset + 1));

    descriptor.start_index(regset) + region
}

/// 构造时的长度契约检查
#[inline]
fn check_len(len: usize, descriptor: &RegionsetVariableDescriptor) {
    if len != descriptor.num_variable_slots() {
        panic!(
            "element range does not match expected number of values: \
             got {len}, expected {}",
            descriptor.num_variable_slots()
        );
    }
}

// ============================================================================
// 只读视图
// ============================================================================

/// 只读数值视图
#[derive(Debug, Clone, Copy)]
pub struct RegionVariableView<'a, T: Pod> {
    /// 数值切片，每 (区域集, 区域) 一个元素
    data: &'a [T],

    /// 区域集描述符
    descriptor: &'a RegionsetVariableDescriptor,
}

impl<'a, T: Pod> RegionVariableView<'a, T> {
    /// 创建只读视图
    ///
    /// # Panics
    ///
    /// `data` 长度不等于 `descriptor.num_variable_slots()` 时 panic
    /// （契约违约，不可恢复）。
    pub fn new(data: &'a [T], descriptor: &'a RegionsetVariableDescriptor) -> Self {
        check_len(data.len(), descriptor);

        Self { data, descriptor }
    }

    /// 读取区域集 `regset` 中区域 `region` 的元素
    #[inline]
    pub fn element(&self, regset: usize, region: usize) -> T {
        self.data[element_index(self.descriptor, regset, region)]
    }

    /// 底层切片
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

// ============================================================================
// 可写视图
// ============================================================================

/// 可写数值视图
#[derive(Debug)]
pub struct RegionVariableViewMut<'a, T: Pod> {
    /// 数值切片，每 (区域集, 区域) 一个元素
    data: &'a mut [T],

    /// 区域集描述符
    descriptor: &'a RegionsetVariableDescriptor,
}

impl<'a, T: Pod> RegionVariableViewMut<'a, T> {
    /// 创建可写视图
    ///
    /// # Panics
    ///
    /// `data` 长度不等于 `descriptor.num_variable_slots()` 时 panic
    /// （契约违约，不可恢复）。
    pub fn new(data: &'a mut [T], descriptor: &'a RegionsetVariableDescriptor) -> Self {
        check_len(data.len(), descriptor);

        Self { data, descriptor }
    }

    /// 读取区域集 `regset` 中区域 `region` 的元素
    #[inline]
    pub fn element(&self, regset: usize, region: usize) -> T {
        self.data[element_index(self.descriptor, regset, region)]
    }

    /// 可变访问区域集 `regset` 中区域 `region` 的元素
    #[inline]
    pub fn element_mut(&mut self, regset: usize, region: usize) -> &mut T {
        &mut self.data[element_index(self.descriptor, regset, region)]
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn single_regset(max_region_id: i32) -> RegionsetVariableDescriptor {
        let mut d = RegionsetVariableDescriptor::new();
        d.prepare_descriptor_set();
        d.add_region_set(max_region_id);
        d.finalise_descriptor_set();
        d
    }

    fn two_regsets(max_1: i32, max_2: i32) -> RegionsetVariableDescriptor {
        let mut d = RegionsetVariableDescriptor::new();
        d.prepare_descriptor_set();
        d.add_region_set(max_1);
        d.add_region_set(max_2);
        d.finalise_descriptor_set();
        d
    }

    #[test]
    fn test_read_only_f32() {
        let d = single_regset(3);
        let data: Vec<f32> = vec![0.1, 0.2, 0.3, 0.4];

        let view = RegionVariableView::new(&data, &d);

        assert_eq!(view.element(0, 0), 0.1);
        assert_eq!(view.element(0, 1), 0.2);
        assert_eq!(view.element(0, 2), 0.3);
        assert_eq!(view.element(0, 3), 0.4);
    }

    #[test]
    fn test_read_only_f64() {
        let d = single_regset(2);
        let data = vec![1.0f64, 2.0, 3.0];

        let view = RegionVariableView::new(&data, &d);

        assert_eq!(view.element(0, 2), 3.0);
        assert_eq!(view.as_slice(), &data[..]);
    }

    #[test]
    fn test_read_only_i32() {
        let d = single_regset(4);
        let data = vec![10i32, 20, 30, 40, 50];

        let view = RegionVariableView::new(&data, &d);

        assert_eq!(view.element(0, 0), 10);
        assert_eq!(view.element(0, 4), 50);
    }

    #[test]
    fn test_read_write_f64() {
        let d = single_regset(2);
        let mut data = vec![0.0f64; 3];

        let mut view = RegionVariableViewMut::new(&mut data, &d);
        *view.element_mut(0, 1) += 17.25;
        *view.element_mut(0, 1) += 0.25;

        assert_eq!(view.element(0, 0), 0.0);
        assert_eq!(view.element(0, 1), 17.5);
        assert_eq!(view.element(0, 2), 0.0);
    }

    #[test]
    #[should_panic(expected = "expected number of values")]
    fn test_size_mismatch_too_short() {
        let d = single_regset(3);
        let data = vec![0.0f64; 3]; // 需要 4 个

        let _ = RegionVariableView::new(&data, &d);
    }

    #[test]
    #[should_panic(expected = "expected number of values")]
    fn test_size_mismatch_too_long() {
        let d = single_regset(3);
        let mut data = vec![0.0f64; 5]; // 需要 4 个

        let _ = RegionVariableViewMut::new(&mut data, &d);
    }

    #[test]
    fn test_multiple_regsets_read() {
        let d = two_regsets(2, 1);
        let data = vec![1.0f64, 2.0, 3.0, 4.0, 5.0];

        let view = RegionVariableView::new(&data, &d);

        assert_eq!(view.element(0, 0), 1.0);
        assert_eq!(view.element(0, 2), 3.0);
        assert_eq!(view.element(1, 0), 4.0);
        assert_eq!(view.element(1, 1), 5.0);
    }

    #[test]
    fn test_multiple_regsets_write_i32() {
        let d = two_regsets(1, 2);
        let mut data = vec![0i32; 5];

        {
            let mut view = RegionVariableViewMut::new(&mut data, &d);
            *view.element_mut(0, 1) = 7;
            *view.element_mut(1, 2) = 11;
        }

        assert_eq!(data, vec![0, 7, 0, 0, 11]);
    }
}
