// apps/rsum_cli/src/commands/run.rs

//! 执行聚合运行命令
//!
//! 加载 JSON 配置，初始化汇总集合，按配置逐周期累加单元贡献，
//! 最后把已提交的数值快照写成 JSON。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use rsum_config::RunConfig;
use rsum_foundation::index::CellIdx;
use rsum_region::collection::RegionVariableCollection;
use rsum_region::snapshot::RegionSummarySnapshot;

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 快照输出路径
    #[arg(short, long, default_value = "summary.json")]
    pub output: PathBuf,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== RegSum 聚合运行启动 ===");

    let start = Instant::now();

    let config = RunConfig::load(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;
    config.validate().context("配置校验失败")?;

    info!(
        "配置: {} 个区域集, {} 个变量, {} 个单元, {} 个周期",
        config.region_sets.len(),
        config.variables.len(),
        config.num_cells(),
        config.cycles.len()
    );

    let mapping = config.build_mapping();
    let source = config.build_source();

    let mut coll = RegionVariableCollection::default();
    coll.initialise(config.declared_max_region_id, &source, &mapping)
        .context("初始化汇总集合失败")?;

    info!(
        "描述符: {} 个区域集 (含 FIELD), {} 个槽位",
        coll.descriptor().num_region_sets(),
        coll.descriptor().num_variable_slots()
    );

    // 逐周期累加
    for (cycle_ix, cycle) in config.cycles.iter().enumerate() {
        coll.prepare_value_accumulation();

        let mut applied = 0usize;
        for contribution in &cycle.contributions {
            match coll.variable_index(&mapping, &contribution.variable) {
                Some(var) => {
                    coll.add_cell_value(var, CellIdx::new(contribution.cell), contribution.value);
                    applied += 1;
                }
                None => {
                    // 校验通过后不应出现；保守起见记一条警告
                    warn!("忽略未知变量 '{}' 的贡献", contribution.variable);
                }
            }
        }

        coll.commit_values();

        info!("周期 {} 提交: {} 份贡献", cycle_ix, applied);
    }

    // 写出快照
    let snapshot = RegionSummarySnapshot::from_collection(&coll, &mapping)
        .with_description(format!("run of {}", args.config.display()));

    let text = serde_json::to_string_pretty(&snapshot).context("序列化快照失败")?;
    std::fs::write(&args.output, text)
        .with_context(|| format!("写出快照失败: {}", args.output.display()))?;

    info!(
        "=== 运行完成: {} ({:.2?}) ===",
        args.output.display(),
        start.elapsed()
    );

    Ok(())
}
