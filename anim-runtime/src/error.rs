//! # Error 模块
//!
//! 定义 anim-runtime 中使用的错误类型。
//!
//! 命令参数本身从不报错（一律钳制归一化），
//! 这里只覆盖无法识别的命令行以及存档编解码。

use thiserror::Error;

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 未知命令
    #[error("第 {line} 行：未知命令 '{command}'")]
    UnknownCommand { line: usize, command: String },

    /// 缺少必需参数
    #[error("第 {line} 行：命令 '{command}' 缺少参数 '{param}'")]
    MissingParameter {
        line: usize,
        command: String,
        param: String,
    },
}

impl ParseError {
    /// 出错的行号（从 1 开始）
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownCommand { line, .. } | Self::MissingParameter { line, .. } => *line,
        }
    }
}

/// 存档错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    /// 序列化失败
    #[error("序列化失败: {0}")]
    SerializationFailed(String),

    /// 反序列化失败
    #[error("反序列化失败: {0}")]
    DeserializationFailed(String),

    /// 版本不兼容
    #[error("存档版本不兼容: 存档版本 {save_version} vs 当前版本 {current_version}")]
    IncompatibleVersion {
        save_version: String,
        current_version: String,
    },

    /// 文件操作失败
    #[error("文件操作失败: {0}")]
    IoError(String),

    /// 存档不存在
    #[error("存档不存在: {0}")]
    NotFound(String),
}
