//! # Anim Runtime
//!
//! overlay 单元格动画引擎的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `anim-runtime` 不依赖任何 IO 或渲染引擎。
//! 它描述"哪一格正在显示"，由宿主层（Host）决定"怎么画"：
//!
//! ```text
//! 命令脚本 ──Parser──► Command ──► Host 执行器 ──► AnimationState
//!                                                    │ advance_one_tick()（每 tick）
//!                                                    ▼
//!                                   Host RenderProxy 读取 current_cell / previous_cell / 淡化进度
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationState`]：单个 overlay 的动画配置与播放状态
//! - [`Command`]：脚本向 Host 发出的指令
//! - [`ConfigureToken`]：两阶段动画准备的令牌
//! - [`Sequencer`]：按 tick 推进脚本
//! - [`SaveData`]：可序列化的存档
//!
//! ## 模块结构
//!
//! - [`layout`]：单元格布局（纵向/横向切片、连号文件）
//! - [`state`]：动画状态机与单元格解析算法
//! - [`command`]：Command 定义
//! - [`configure`]：两阶段动画准备
//! - [`script`]：命令脚本解析
//! - [`runtime`]：脚本驱动
//! - [`save`]：存档数据模型
//! - [`diagnostic`]：脚本静态检查
//! - [`error`]：错误类型定义

pub mod command;
pub mod configure;
pub mod diagnostic;
pub mod error;
pub mod layout;
pub mod runtime;
pub mod save;
pub mod script;
pub mod state;

// 重导出核心类型
pub use command::{AnimationCommand, Command, OverlayId};
pub use configure::{ConfigureToken, apply_on_show, begin_configure};
pub use diagnostic::{
    Diagnostic, DiagnosticLevel, DiagnosticResult, ImageReference, analyze_script,
    extract_image_references, parse_diagnostics,
};
pub use error::{ParseError, SaveError};
pub use layout::{CellRect, LayoutMode};
pub use runtime::{Sequencer, WaitingReason};
pub use save::{OverlaySnapshot, SaveData, SaveMetadata, SaveVersion};
pub use script::{Parser, Script};
pub use state::{AnimationConfig, AnimationPlayback, AnimationState, PlayMode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        // 验证所有公共类型都可以正常使用
        let token = begin_configure(AnimationConfig::new(4, 10, LayoutMode::Sequential, 20));
        let mut state = token.into_state();
        state.start_animation(PlayMode::Forward, false, None);

        let _cmd = Command::Wait { ticks: 1 };
        let _waiting = WaitingReason::None;
        let _save = SaveData::new(1, Vec::new());
    }

    /// INIT(4, 10, 連番, 20) → 显示 → START(1) → 10 tick 后切到第 2 格，
    /// 淡化从 20 开始在随后 20 tick 内归零
    #[test]
    fn test_init_show_start_scenario() {
        let mut parser = Parser::new();
        let script = parser.parse("scenario", "PA_INIT 4 10 N 20\nSHOW 1 door00\nPA_START 1 1");
        assert!(parser.warnings().is_empty());

        let Some(Command::Animation(AnimationCommand::Init { config })) = script.get(0) else {
            panic!("第一条应为 INIT");
        };
        let mut state = begin_configure(*config).into_state();
        state.start_animation(PlayMode::Forward, false, None);

        for _ in 0..9 {
            state.advance_one_tick();
            assert_eq!(state.current_cell(), 0);
        }
        state.advance_one_tick();
        assert_eq!(state.current_cell(), 1);
        assert_eq!(state.previous_cell(), 0);
        assert_eq!(state.fade_remaining(), 20);

        // 帧间隔小于淡化时长，这里强制停止以单独观察淡化
        state.stop_animation(true);
        for expected in (0..20).rev() {
            state.advance_one_tick();
            assert_eq!(state.fade_remaining(), expected);
        }
        state.advance_one_tick();
        assert_eq!(state.fade_remaining(), 0);
    }
}
