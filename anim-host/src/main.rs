//! anim-host 命令行入口
//!
//! 无窗口运行命令脚本，结束时输出每个 overlay 的绘制摘要。

use std::path::PathBuf;

use anim_host::{AppConfig, Host};
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// overlay 单元格动画宿主
#[derive(Debug, Parser)]
#[command(name = "anim-host", about = "Headless overlay cell-animation host")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,

    /// 要执行的命令脚本（覆盖配置中的 start_script_path）
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// 推进的 tick 数；省略时运行到脚本结束
    #[arg(short, long, value_name = "N")]
    ticks: Option<u64>,

    /// 脚本未结束时的 tick 上限
    #[arg(long, value_name = "N", default_value_t = 100_000)]
    max_ticks: u64,

    /// 结束时保存到槽位
    #[arg(long, value_name = "SLOT")]
    save_slot: Option<u32>,

    /// 开始前从槽位读档
    #[arg(long, value_name = "SLOT")]
    load_slot: Option<u32>,

    /// 增加日志详细程度（可重复）
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("anim_host={}", level).parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = AppConfig::load(&cli.config);
    if let Err(e) = config.validate() {
        warn!(error = %e, "配置校验未通过，继续运行");
    }

    let mut host = Host::new(config);

    if let Some(slot) = cli.load_slot {
        host.load(slot)
            .with_context(|| format!("loading save slot {}", slot))?;
    }

    let script_path = cli
        .script
        .clone()
        .or_else(|| host.config.start_script_full_path());
    if let Some(path) = &script_path {
        let skipped = host
            .load_script_file(path)
            .with_context(|| format!("loading script {}", path.display()))?;
        if skipped > 0 {
            warn!(skipped, "部分命令无法识别");
        }
    } else if cli.ticks.is_none() && cli.load_slot.is_none() {
        bail!("nothing to run: pass --script, --ticks or --load-slot");
    }

    let ticks = match cli.ticks {
        Some(ticks) => {
            host.run(ticks);
            ticks
        }
        None => host.run_until_finished(cli.max_ticks),
    };
    if !host.is_script_finished() {
        let line = host.sequencer().and_then(|s| s.current_line());
        warn!(ticks, line = ?line, "脚本尚未执行完毕");
    }

    info!(
        ticks,
        elapsed_secs = host.elapsed_secs(),
        cache = %host.cache.stats().format(),
        "运行结束"
    );

    for frame in host.frame() {
        let cell = host
            .screen
            .animation(frame.id)
            .map(|state| state.current_cell().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "overlay {:>3}  cell {:>3}  primary: {}  secondary: {}",
            frame.id, cell, frame.primary, frame.secondary
        );
    }

    if let Some(slot) = cli.save_slot {
        host.save(slot)
            .with_context(|| format!("saving to slot {}", slot))?;
        info!(slot, path = %host.save_manager.slot_path(slot).display(), "已保存");
    }

    Ok(())
}
