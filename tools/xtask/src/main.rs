//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `script-check`: 检查命令脚本（无法识别的命令、INIT/SHOW 配对、图片引用）

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anim_runtime::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, Parser as ScriptParser, analyze_script,
    extract_image_references, parse_diagnostics,
};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Debug, Subcommand)]
enum Task {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 检查命令脚本
    ScriptCheck(ScriptCheckArgs),
}

#[derive(Debug, clap::Args)]
struct ScriptCheckArgs {
    /// 脚本文件或目录（默认 assets/scripts）
    path: Option<PathBuf>,

    /// 资源根目录
    #[arg(long, default_value = "assets")]
    assets_root: PathBuf,

    /// 图片目录（相对于资源根目录）
    #[arg(long, default_value = "img/pictures")]
    pictures_dir: String,

    /// 图片扩展名
    #[arg(long, default_value = "png")]
    extension: String,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Task::CheckAll => check_all(),
        Task::ScriptCheck(args) => script_check(&args),
    }
}

fn check_all() -> anyhow::Result<()> {
    let sh = Shell::new()?;

    eprintln!("\n==> cargo fmt --all -- --check");
    cmd!(sh, "cargo fmt --all -- --check").run()?;

    eprintln!("\n==> cargo clippy --workspace --all-targets");
    cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

    eprintln!("\n==> cargo test --workspace");
    cmd!(sh, "cargo test --workspace").run()?;

    Ok(())
}

//=============================================================================
// script-check 命令实现
//=============================================================================

/// 脚本文件扩展名
const SCRIPT_EXTENSIONS: &[&str] = &["txt", "anim"];

/// 脚本检查结果
#[derive(Default)]
struct ScriptCheckResult {
    scripts_checked: usize,
    diagnostics: DiagnosticResult,
}

fn script_check(args: &ScriptCheckArgs) -> anyhow::Result<()> {
    let root = args
        .path
        .clone()
        .unwrap_or_else(|| args.assets_root.join("scripts"));

    let files = if root.is_file() {
        vec![root]
    } else if root.is_dir() {
        collect_script_files(&root)
    } else {
        anyhow::bail!(
            "路径不存在: {}\n请在 workspace 根目录运行，或指定脚本路径",
            root.display()
        );
    };

    if files.is_empty() {
        eprintln!("未找到脚本文件（{}）", SCRIPT_EXTENSIONS.join(", "));
        return Ok(());
    }

    eprintln!("==> 检查 {} 个脚本文件...\n", files.len());

    let mut result = ScriptCheckResult::default();
    for file in &files {
        check_script_file(file, args, &mut result);
    }

    print_check_result(&result);

    if result.diagnostics.has_errors() {
        anyhow::bail!("脚本检查发现错误");
    }
    Ok(())
}

/// 收集目录下的所有脚本文件（递归，按路径排序）
fn collect_script_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

fn check_script_file(file: &Path, args: &ScriptCheckArgs, result: &mut ScriptCheckResult) {
    let script_id = file.display().to_string();
    result.scripts_checked += 1;

    let content = match std::fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            result
                .diagnostics
                .push(Diagnostic::error(&script_id, format!("无法读取文件 - {}", e)));
            return;
        }
    };

    let mut parser = ScriptParser::new();
    let script = parser.parse(&script_id, &content);

    result
        .diagnostics
        .merge(parse_diagnostics(&script_id, parser.warnings()));
    result.diagnostics.merge(analyze_script(&script));

    for reference in extract_image_references(&script) {
        let path = picture_file(args, &reference.name);
        if !path.is_file() {
            result.diagnostics.push(
                Diagnostic::warn(&script_id, format!("图片不存在: {}", path.display()))
                    .with_line(reference.line),
            );
        }
    }
}

fn picture_file(args: &ScriptCheckArgs, name: &str) -> PathBuf {
    let dir = args.assets_root.join(&args.pictures_dir);
    if Path::new(name).extension().is_some() {
        dir.join(name)
    } else {
        dir.join(format!("{}.{}", name, args.extension))
    }
}

fn print_check_result(result: &ScriptCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个脚本", result.scripts_checked);
    eprintln!();

    for diag in &result.diagnostics.diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = result.diagnostics.count(DiagnosticLevel::Error);
    let warn_count = result.diagnostics.count(DiagnosticLevel::Warn);

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {} 个错误, {} 个警告", error_count, warn_count);
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", warn_count);
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
