// apps/rsum_cli/src/commands/info.rs

//! 显示配置与结构信息命令

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use rsum_config::RunConfig;
use rsum_region::collection::RegionVariableCollection;

/// 信息参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;
    config.validate().context("配置校验失败")?;

    let mapping = config.build_mapping();
    let source = config.build_source();

    let mut coll = RegionVariableCollection::default();
    coll.initialise(config.declared_max_region_id, &source, &mapping)
        .context("初始化汇总集合失败")?;

    println!("配置: {}", args.config.display());
    println!("  活动单元数:       {}", config.num_cells());
    println!("  声明最大区域编号: {}", config.declared_max_region_id);
    println!("  累加周期数:       {}", config.cycles.len());

    println!("区域集 ({} 个, 含 FIELD):", coll.descriptor().num_region_sets());
    println!("  FIELD  (1 个区域)");
    for name in mapping.region_sets() {
        let regset = coll
            .region_set_index(&mapping, name)
            .expect("mapped region set must resolve");
        let descr = coll.descriptor();
        let num_regions = descr.start_index(regset.get() + 1) - descr.start_index(regset.get());

        println!("  {name}  ({num_regions} 个区域)");
    }

    println!("变量 ({} 个):", mapping.num_variables());
    for name in mapping.variables() {
        let kind = match mapping.is_cumulative_by_name(name) {
            Some(true) => "累计",
            _ => "瞬时",
        };
        println!("  {name}  [{kind}]");
    }

    println!("槽位总数: {} / 变量", coll.descriptor().num_variable_slots());

    Ok(())
}
