// apps/rsum_cli/src/commands/validate.rs

//! 验证配置命令

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use rsum_config::RunConfig;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = RunConfig::load(&args.config)
        .with_context(|| format!("加载配置失败: {}", args.config.display()))?;

    config.validate().context("配置校验失败")?;

    info!(
        "配置有效: {} ({} 个区域集, {} 个变量)",
        args.config.display(),
        config.region_sets.len(),
        config.variables.len()
    );

    Ok(())
}
