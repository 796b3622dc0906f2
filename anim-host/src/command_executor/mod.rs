//! # Command Executor 模块
//!
//! Command 执行器，把脚本指令落实到 [`Screen`] 上。
//!
//! ## 设计说明
//!
//! - 执行器不渲染，只更新状态；渲染由 `Renderer` 负责
//! - `INIT` 产生的令牌由执行器持有，下一条 `SHOW` 显式消费
//! - 手动步进的等待只是返回值，由调用方（`Sequencer`）自行调度
//!
//! ## 模块结构
//!
//! - `overlay`: overlay 显示 / 移除
//! - `animation`: 动画命令接口
//! - `types`: 类型定义

mod animation;
mod overlay;
mod types;

pub use types::*;

use anim_runtime::{AnimationCommand, Command, ConfigureToken};

use crate::screen::Screen;

/// Command 执行器
#[derive(Debug, Default)]
pub struct CommandExecutor {
    /// 待应用的动画准备（至多一个）
    pending_configure: Option<ConfigureToken>,
    /// 最近一次执行的结果
    pub last_result: ExecuteResult,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 执行单个 Command
    pub fn execute(&mut self, command: &Command, screen: &mut Screen) -> ExecuteResult {
        let result = match command {
            Command::ShowOverlay {
                target,
                name,
                x,
                y,
                opacity,
            } => self.execute_show_overlay(*target, name, (*x, *y), *opacity, screen),
            Command::EraseOverlay { target } => self.execute_erase_overlay(*target, screen),
            Command::Wait { ticks } => ExecuteResult::wait(*ticks),
            Command::Animation(cmd) => self.execute_animation(cmd, screen),
        };

        self.last_result = result;
        result
    }

    /// 执行动画命令
    pub fn execute_animation(
        &mut self,
        command: &AnimationCommand,
        screen: &mut Screen,
    ) -> ExecuteResult {
        match command {
            AnimationCommand::Init { config } => self.execute_init(config),
            AnimationCommand::Start {
                target,
                mode,
                looping,
                sequence,
            } => self.execute_start(*target, *mode, *looping, sequence, screen),
            AnimationCommand::Stop { target, force } => self.execute_stop(*target, *force, screen),
            AnimationCommand::SetCell { target, cell, wait } => {
                self.execute_set_cell(*target, *cell, *wait, screen)
            }
            AnimationCommand::ProgCell { target, wait } => {
                self.execute_prog_cell(*target, *wait, screen)
            }
        }
    }

    /// 批量执行 Commands，返回最后一个需要等待的结果
    pub fn execute_batch(&mut self, commands: &[Command], screen: &mut Screen) -> ExecuteResult {
        let mut last_wait = ExecuteResult::Ok;
        for command in commands {
            let result = self.execute(command, screen);
            if result != ExecuteResult::Ok {
                last_wait = result;
            }
        }
        last_wait
    }

    /// 是否有尚未被 `SHOW` 消费的动画准备
    pub fn has_pending_configure(&self) -> bool {
        self.pending_configure.is_some()
    }

    /// 丢弃待应用的动画准备（读档时调用）
    pub fn clear_pending(&mut self) {
        self.pending_configure = None;
    }
}
