//! 动画命令接口
//!
//! 目标 overlay 不存在或未设置动画时一律为空操作，不报错。

use anim_runtime::{AnimationConfig, AnimationState, OverlayId, PlayMode, begin_configure};
use tracing::debug;

use super::{CommandExecutor, ExecuteResult};
use crate::screen::Screen;

impl CommandExecutor {
    /// `INIT`：生成令牌，等待下一次 `SHOW` 消费
    pub(super) fn execute_init(&mut self, config: &AnimationConfig) -> ExecuteResult {
        let token = begin_configure(*config);
        if let Some(replaced) = self.pending_configure.replace(token) {
            debug!(
                cell_count = replaced.config().cell_count,
                "上一条 INIT 尚未使用即被覆盖"
            );
        }
        ExecuteResult::Ok
    }

    pub(super) fn execute_start(
        &mut self,
        target: OverlayId,
        mode: PlayMode,
        looping: bool,
        sequence: &[u32],
        screen: &mut Screen,
    ) -> ExecuteResult {
        if let Some(state) = animation_target(screen, target, "START") {
            let sequence = (mode == PlayMode::Custom).then(|| sequence.to_vec());
            state.start_animation(mode, looping, sequence);
            debug!(overlay = target, ?mode, looping, "开始播放");
        }
        ExecuteResult::Ok
    }

    pub(super) fn execute_stop(
        &mut self,
        target: OverlayId,
        force: bool,
        screen: &mut Screen,
    ) -> ExecuteResult {
        if let Some(state) = animation_target(screen, target, "STOP") {
            state.stop_animation(force);
            debug!(overlay = target, force, "停止播放");
        }
        ExecuteResult::Ok
    }

    /// `SET_CELL`：单元格号为 1-based
    pub(super) fn execute_set_cell(
        &mut self,
        target: OverlayId,
        cell: u32,
        wait: bool,
        screen: &mut Screen,
    ) -> ExecuteResult {
        let Some(state) = animation_target(screen, target, "SET_CELL") else {
            return ExecuteResult::Ok;
        };
        let changed = state.set_cell_directly(cell.saturating_sub(1));
        debug!(overlay = target, cell, changed, "设置单元格");
        fade_wait(state, wait)
    }

    pub(super) fn execute_prog_cell(
        &mut self,
        target: OverlayId,
        wait: bool,
        screen: &mut Screen,
    ) -> ExecuteResult {
        let Some(state) = animation_target(screen, target, "PROG_CELL") else {
            return ExecuteResult::Ok;
        };
        let changed = state.advance_cell_directly();
        debug!(overlay = target, cell = state.current_cell(), changed, "单元格前进");
        fade_wait(state, wait)
    }
}

fn animation_target<'a>(
    screen: &'a mut Screen,
    target: OverlayId,
    command: &str,
) -> Option<&'a mut AnimationState> {
    let state = screen.animation_mut(target);
    if state.is_none() {
        debug!(overlay = target, command, "目标没有动画，忽略命令");
    }
    state
}

/// 带等待标志的手动步进：调用方等待一个淡化时长
fn fade_wait(state: &AnimationState, wait: bool) -> ExecuteResult {
    if wait {
        ExecuteResult::wait(state.config.fade_duration)
    } else {
        ExecuteResult::Ok
    }
}
