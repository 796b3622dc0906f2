//! # Script 模块
//!
//! 命令脚本：每行一条命令，解析为 [`Command`] 序列。
//!
//! ## 语法
//!
//! ```text
//! # 注释
//! PA_INIT 4 10 N 20
//! SHOW 1 door00 120 80
//! PA_START_LOOP 1 3 [1,2,1,3,1,4]
//! PA_SET_CELL 1 3 WAIT
//! ```
//!
//! ## 模块结构
//!
//! - [`args`]：参数归一化（钳制、默认值、别名）
//! - [`parser`]：逐行解析器

pub mod args;
pub mod parser;

pub use parser::Parser;

use crate::command::Command;

/// 已解析的命令脚本
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// 脚本标识符（文件名等）
    pub id: String,
    /// 按顺序排列的命令
    pub commands: Vec<Command>,
    /// 每条命令对应的源码行号（从 1 开始）
    source_map: Vec<usize>,
}

impl Script {
    /// 创建带行号信息的脚本
    pub fn with_source_map(
        id: impl Into<String>,
        commands: Vec<Command>,
        source_map: Vec<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            commands,
            source_map,
        }
    }

    /// 按索引获取命令
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// 命令所在的源码行号
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.source_map.get(index).copied()
    }

    /// 命令数量
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// 脚本是否为空
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
