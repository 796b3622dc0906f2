//! # Command 模块
//!
//! 定义脚本向 Host 发出的所有指令。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"做什么"，不描述"怎么做"
//! - **已归一化**：所有数值参数在解析时已钳制到合法范围
//! - **引擎无关**：不包含任何渲染或资源类型

use serde::{Deserialize, Serialize};

use crate::state::{AnimationConfig, PlayMode};

/// overlay 编号（1-based）
pub type OverlayId = u32;

/// overlay 编号上限
pub const MAX_OVERLAY_ID: u32 = 100;
/// 单元格数量上限
pub const MAX_CELL_COUNT: u32 = 200;
/// 帧间隔上限
pub const MAX_FRAME_INTERVAL: u32 = 9999;
/// 淡化时长上限
pub const MAX_FADE_DURATION: u32 = 9999;
/// 不透明度上限
pub const MAX_OPACITY: u8 = 255;

/// 动画命令
///
/// 对应动画命令接口的七个入口（`START` 与 `START_LOOP` 共用 [`AnimationCommand::Start`]）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnimationCommand {
    /// 准备动画：下一次显示 overlay 时生效
    Init { config: AnimationConfig },

    /// 开始播放
    ///
    /// `sequence` 为 1-based 单元格号，仅 `Custom` 模式使用。
    Start {
        target: OverlayId,
        mode: PlayMode,
        looping: bool,
        sequence: Vec<u32>,
    },

    /// 停止播放（`force` 为 true 时立即停止）
    Stop { target: OverlayId, force: bool },

    /// 直接跳到指定单元格（1-based）
    SetCell {
        target: OverlayId,
        cell: u32,
        wait: bool,
    },

    /// 前进一格
    ProgCell { target: OverlayId, wait: bool },
}

impl AnimationCommand {
    /// 命令作用的 overlay（`Init` 没有目标）
    pub fn target(&self) -> Option<OverlayId> {
        match self {
            Self::Init { .. } => None,
            Self::Start { target, .. }
            | Self::Stop { target, .. }
            | Self::SetCell { target, .. }
            | Self::ProgCell { target, .. } => Some(*target),
        }
    }

    /// 命令是否要求调用方等待淡化结束
    pub fn waits(&self) -> bool {
        matches!(
            self,
            Self::SetCell { wait: true, .. } | Self::ProgCell { wait: true, .. }
        )
    }
}

/// 脚本指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 显示 overlay（若有待应用的动画准备则一并生效）
    ShowOverlay {
        target: OverlayId,
        name: String,
        x: i32,
        y: i32,
        opacity: u8,
    },

    /// 移除 overlay
    EraseOverlay { target: OverlayId },

    /// 脚本等待若干 tick
    Wait { ticks: u32 },

    /// 动画命令
    Animation(AnimationCommand),
}

impl Command {
    /// 指令作用的 overlay
    pub fn target(&self) -> Option<OverlayId> {
        match self {
            Self::ShowOverlay { target, .. } | Self::EraseOverlay { target } => Some(*target),
            Self::Wait { .. } => None,
            Self::Animation(cmd) => cmd.target(),
        }
    }
}

impl From<AnimationCommand> for Command {
    fn from(cmd: AnimationCommand) -> Self {
        Self::Animation(cmd)
    }
}
