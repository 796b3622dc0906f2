//! # Parser 模块
//!
//! 逐行命令解析器（手写分词，无 regex 依赖）。
//!
//! ## 容错策略
//!
//! - 参数永远不报错，统一交给 [`super::args`] 归一化
//! - 无法识别的命令行记录为警告并跳过，不中断整个脚本

use crate::command::{
    AnimationCommand, Command, MAX_CELL_COUNT, MAX_FADE_DURATION, MAX_FRAME_INTERVAL,
    MAX_OPACITY, MAX_OVERLAY_ID,
};
use crate::error::ParseError;
use crate::layout::LayoutMode;
use crate::state::{AnimationConfig, PlayMode};

use super::Script;
use super::args::{CommandKind, arg_number, arg_u32, arg_u32_array, command_kind, is_wait_flag};

/// 坐标参数范围
const COORD_LIMIT: i64 = 99_999;
/// `WAIT` 命令的最大 tick 数
const MAX_WAIT_TICKS: u32 = 99_999;

/// 命令脚本解析器
#[derive(Debug, Default)]
pub struct Parser {
    warnings: Vec<ParseError>,
}

impl Parser {
    /// 创建新的解析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析整段脚本文本
    ///
    /// 无法识别的行不会中断解析，可通过 [`Parser::warnings`] 取得。
    pub fn parse(&mut self, script_id: &str, text: &str) -> Script {
        self.warnings.clear();

        let mut commands = Vec::new();
        let mut source_map = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            match Self::parse_line(line_number, line) {
                Ok(Some(cmd)) => {
                    commands.push(cmd);
                    source_map.push(line_number);
                }
                Ok(None) => {}
                Err(e) => self.warnings.push(e),
            }
        }

        Script::with_source_map(script_id, commands, source_map)
    }

    /// 获取上一次解析产生的警告
    pub fn warnings(&self) -> &[ParseError] {
        &self.warnings
    }

    /// 解析单行
    ///
    /// 空行与注释（`#`、`//` 开头）返回 `Ok(None)`。
    pub fn parse_line(line_number: usize, line: &str) -> Result<Option<Command>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            return Ok(None);
        }

        let mut tokens = trimmed.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();
        let arg = |i: usize| args.get(i).copied();

        let kind = command_kind(name).ok_or_else(|| ParseError::UnknownCommand {
            line: line_number,
            command: name.to_string(),
        })?;

        let target = || arg_u32(arg(0), 1, MAX_OVERLAY_ID);

        let cmd: Command = match kind {
            CommandKind::Init => {
                let config = AnimationConfig::new(
                    arg_u32(arg(0), 1, MAX_CELL_COUNT),
                    arg_u32(arg(1), 1, MAX_FRAME_INTERVAL),
                    LayoutMode::from_arg(arg(2).unwrap_or("")),
                    arg_u32(arg(3), 0, MAX_FADE_DURATION),
                );
                AnimationCommand::Init { config }.into()
            }
            CommandKind::Start | CommandKind::StartLoop => AnimationCommand::Start {
                target: target(),
                mode: PlayMode::from_arg(arg_u32(arg(1), 1, 3)),
                looping: kind == CommandKind::StartLoop,
                sequence: arg_u32_array(arg(2), 1, MAX_CELL_COUNT),
            }
            .into(),
            CommandKind::Stop | CommandKind::StopForce => AnimationCommand::Stop {
                target: target(),
                force: kind == CommandKind::StopForce,
            }
            .into(),
            CommandKind::SetCell => AnimationCommand::SetCell {
                target: target(),
                cell: arg_u32(arg(1), 1, MAX_CELL_COUNT),
                wait: is_wait_flag(arg(2)),
            }
            .into(),
            CommandKind::ProgCell => AnimationCommand::ProgCell {
                target: target(),
                wait: is_wait_flag(arg(1)),
            }
            .into(),
            CommandKind::Show => {
                let name = arg(1).ok_or_else(|| ParseError::MissingParameter {
                    line: line_number,
                    command: name.to_string(),
                    param: "name".to_string(),
                })?;
                Command::ShowOverlay {
                    target: target(),
                    name: name.to_string(),
                    x: arg_number(arg(2), -COORD_LIMIT, COORD_LIMIT) as i32,
                    y: arg_number(arg(3), -COORD_LIMIT, COORD_LIMIT) as i32,
                    opacity: arg(4).map_or(MAX_OPACITY, |a| {
                        arg_number(Some(a), 0, i64::from(MAX_OPACITY)) as u8
                    }),
                }
            }
            CommandKind::Erase => Command::EraseOverlay { target: target() },
            CommandKind::Wait => Command::Wait {
                ticks: arg_u32(arg(0), 0, MAX_WAIT_TICKS),
            },
        };

        Ok(Some(cmd))
    }
}
