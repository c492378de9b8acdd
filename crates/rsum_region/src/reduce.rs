// crates/rsum_region/src/reduce.rs

//! 并行归约扩展点
//!
//! 核心聚合逻辑本身是单进程、单线程的。多进程运行时，每个进程只看到
//! 自己负责的那部分网格单元，需要在两个时机做跨进程归约：
//!
//! 1. 描述符定稿前，对每个区域集的最大区域编号做 max 归约，
//!    保证所有进程分配出同样大小的槽位表；
//! 2. 提交增量前，对增量缓冲区做逐元素 sum 归约，
//!    把各进程的部分贡献合并成全局贡献。
//!
//! 默认实现 [`SequentialReduce`] 两个钩子都是空操作；顺序运行的
//! 正确性不依赖任何归约实现。

use std::fmt;
use std::sync::Arc;

/// 跨进程归约策略
///
/// 由构造时注入，描述符与数值存储各持有一个共享句柄。
/// 并行后端据此实现 MPI 风格的 all-reduce；两个方法都必须是
/// 幂等于单进程的（即单进程下等价于不做任何事）。
pub trait ReduceStrategy: fmt::Debug + Send + Sync {
    /// 对每区域集最大区域编号做全局 max 归约
    ///
    /// 在描述符定稿、构建起始指针表之前调用，原地更新 `max_ids`。
    fn reduce_regset_max_ids(&self, max_ids: &mut [i32]) {
        let _ = max_ids;
    }

    /// 对增量缓冲区做全局 sum 归约
    ///
    /// 在提交、折叠进当前值之前调用，原地更新 `increment`。
    fn reduce_increment(&self, increment: &mut [f64]) {
        let _ = increment;
    }
}

/// 顺序运行的默认策略：两个钩子均为空操作
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialReduce;

impl ReduceStrategy for SequentialReduce {}

/// 共享归约策略句柄
pub type SharedReduce = Arc<dyn ReduceStrategy>;

/// 默认的顺序归约句柄
pub fn sequential() -> SharedReduce {
    Arc::new(SequentialReduce)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_is_noop() {
        let reduce = SequentialReduce;

        let mut max_ids = vec![3, -1, 7];
        reduce.reduce_regset_max_ids(&mut max_ids);
        assert_eq!(max_ids, vec![3, -1, 7]);

        let mut increment = vec![1.0, 2.5];
        reduce.reduce_increment(&mut increment);
        assert_eq!(increment, vec![1.0, 2.5]);
    }

    #[test]
    fn test_custom_strategy_dispatch() {
        // 模拟双进程 all-reduce：另一进程对每个槽位贡献同样的值
        #[derive(Debug)]
        struct MirrorRank;

        impl ReduceStrategy for MirrorRank {
            fn reduce_regset_max_ids(&self, max_ids: &mut [i32]) {
                for id in max_ids.iter_mut() {
                    *id = (*id).max(5);
                }
            }

            fn reduce_increment(&self, increment: &mut [f64]) {
                for x in increment.iter_mut() {
                    *x *= 2.0;
                }
            }
        }

        let reduce: SharedReduce = Arc::new(MirrorRank);

        let mut max_ids = vec![3, 7];
        reduce.reduce_regset_max_ids(&mut max_ids);
        assert_eq!(max_ids, vec![5, 7]);

        let mut increment = vec![1.0, -0.5];
        reduce.reduce_increment(&mut increment);
        assert_eq!(increment, vec![2.0, -1.0]);
    }
}
