//! # Resource Error 模块
//!
//! 定义图片资源读取与解码相关的错误类型。

use thiserror::Error;

/// 资源错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// 读取失败
    #[error("读取 {kind} 资源失败: {path} - {message}")]
    LoadFailed {
        /// 资源路径
        path: String,
        /// 资源类型（file, memory 等）
        kind: String,
        /// 错误消息
        message: String,
    },

    /// 资源未找到
    #[error("资源未找到: {path}")]
    NotFound {
        /// 资源路径
        path: String,
    },

    /// 图片解码失败
    #[error("无效的图片格式: {path} - {message}")]
    InvalidFormat {
        /// 资源路径
        path: String,
        /// 错误消息
        message: String,
    },
}

impl ResourceError {
    /// 出错的资源路径
    pub fn path(&self) -> &str {
        match self {
            Self::LoadFailed { path, .. }
            | Self::NotFound { path }
            | Self::InvalidFormat { path, .. } => path,
        }
    }
}
