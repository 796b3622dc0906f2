//! # 诊断模块
//!
//! 命令脚本的静态检查，不依赖 IO 或引擎。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 复用 parser 的结果，不重复解析逻辑

use std::collections::HashMap;

use crate::command::{AnimationCommand, Command, OverlayId};
use crate::error::ParseError;
use crate::layout::{LayoutMode, sequential_names};
use crate::script::Script;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 脚本 ID / 文件路径
    pub script_id: String,
    /// 行号（如果可定位，从 1 开始）
    pub line: Option<usize>,
    /// 诊断消息
    pub message: String,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, script_id: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            script_id: script_id.to_string(),
            line: None,
            message: message.into(),
        }
    }

    /// 创建错误诊断
    pub fn error(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, script_id, message)
    }

    /// 创建警告诊断
    pub fn warn(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, script_id, message)
    }

    /// 创建信息诊断
    pub fn info(script_id: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, script_id, message)
    }

    /// 设置行号
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.script_id)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    /// 创建空结果
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// 获取指定级别的数量
    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.count(DiagnosticLevel::Error) > 0
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// 脚本引用的图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// 图片名（不含目录与扩展名）
    pub name: String,
    /// 引用所在行
    pub line: Option<usize>,
}

/// 把解析警告转换为诊断
pub fn parse_diagnostics(script_id: &str, warnings: &[ParseError]) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    for warning in warnings {
        result.push(Diagnostic::error(script_id, warning.to_string()).with_line(Some(warning.line())));
    }
    result
}

/// 分析脚本，返回诊断结果
///
/// 执行以下检查：
/// - `INIT` 未被任何 `SHOW` 消费，或被下一次 `INIT` 覆盖
/// - 动画命令作用于尚未显示（或已移除）的 overlay
/// - 动画命令作用于未设置动画的 overlay（命令不会生效）
pub fn analyze_script(script: &Script) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();
    // overlay → 是否设置了动画
    let mut shown: HashMap<OverlayId, bool> = HashMap::new();
    let mut pending_init: Option<usize> = None;

    for (index, cmd) in script.commands.iter().enumerate() {
        let line = script.line_of(index);
        match cmd {
            Command::ShowOverlay { target, .. } => {
                shown.insert(*target, pending_init.take().is_some());
            }
            Command::EraseOverlay { target } => {
                shown.remove(target);
            }
            Command::Wait { .. } => {}
            Command::Animation(AnimationCommand::Init { .. }) => {
                if pending_init.is_some() {
                    result.push(
                        Diagnostic::warn(&script.id, "上一条 INIT 尚未被 SHOW 使用就被覆盖")
                            .with_line(line),
                    );
                }
                pending_init = Some(index);
            }
            Command::Animation(anim) => {
                let Some(target) = anim.target() else {
                    continue;
                };
                match shown.get(&target) {
                    None => result.push(
                        Diagnostic::warn(
                            &script.id,
                            format!("overlay {} 尚未显示，命令不会生效", target),
                        )
                        .with_line(line),
                    ),
                    Some(false) => result.push(
                        Diagnostic::info(
                            &script.id,
                            format!("overlay {} 未设置动画（缺少 INIT），命令不会生效", target),
                        )
                        .with_line(line),
                    ),
                    Some(true) => {}
                }
            }
        }
    }

    if let Some(index) = pending_init {
        result.push(
            Diagnostic::warn(&script.id, "INIT 之后没有 SHOW，动画准备不会生效")
                .with_line(script.line_of(index)),
        );
    }

    result
}

/// 提取脚本引用的所有图片
///
/// 连号布局的 overlay 会展开为全部单元格文件。
pub fn extract_image_references(script: &Script) -> Vec<ImageReference> {
    let mut refs = Vec::new();
    let mut pending: Option<(LayoutMode, u32)> = None;

    for (index, cmd) in script.commands.iter().enumerate() {
        match cmd {
            Command::Animation(AnimationCommand::Init { config }) => {
                pending = Some((config.layout, config.cell_count));
            }
            Command::ShowOverlay { name, .. } => {
                let line = script.line_of(index);
                let names = match pending.take() {
                    Some((LayoutMode::Sequential, cell_count)) => sequential_names(name, cell_count),
                    _ => vec![name.clone()],
                };
                refs.extend(names.into_iter().map(|name| ImageReference { name, line }));
            }
            _ => {}
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Parser;

    fn parse(text: &str) -> Script {
        Parser::new().parse("test", text)
    }

    #[test]
    fn test_clean_script_has_no_diagnostics() {
        let script = parse("PA_INIT 4 10 N 20\nSHOW 1 door00\nPA_START 1 1\nPA_STOP 1");
        assert!(analyze_script(&script).is_empty());
    }

    #[test]
    fn test_target_not_shown() {
        let script = parse("PA_START 3 1\nSHOW 3 a\nERASE 3\nPA_STOP 3");
        let result = analyze_script(&script);
        assert_eq!(result.count(DiagnosticLevel::Warn), 2);
        assert_eq!(result.diagnostics[0].line, Some(1));
        assert_eq!(result.diagnostics[1].line, Some(4));
    }

    #[test]
    fn test_target_without_init() {
        let script = parse("SHOW 1 plain\nPA_PROG_CELL 1");
        let result = analyze_script(&script);
        assert_eq!(result.count(DiagnosticLevel::Info), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_unconsumed_init() {
        let script = parse("PA_INIT 2 5\nPA_INIT 3 5\nSHOW 1 a\nPA_INIT 4 4");
        let result = analyze_script(&script);
        assert_eq!(result.count(DiagnosticLevel::Warn), 2);
        assert_eq!(result.diagnostics[0].line, Some(2));
        assert_eq!(result.diagnostics[1].line, Some(4));
    }

    #[test]
    fn test_parse_diagnostics() {
        let mut parser = Parser::new();
        parser.parse("bad", "PA_INIT 2 5\nPA_WOBBLE 1");
        let result = parse_diagnostics("bad", parser.warnings());
        assert!(result.has_errors());
        assert_eq!(
            result.diagnostics[0].to_string(),
            "[ERROR] bad:2: 第 2 行：未知命令 'PA_WOBBLE'"
        );
    }

    #[test]
    fn test_extract_image_references_expands_sequential() {
        let script = parse("PA_INIT 3 10 N\nSHOW 1 door00\nPA_INIT 3 10 V\nSHOW 2 strip\nSHOW 3 plain");
        let names: Vec<_> = extract_image_references(&script)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["door00", "door01", "door02", "strip", "plain"]);
    }
}
