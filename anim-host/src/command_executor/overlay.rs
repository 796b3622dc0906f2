//! overlay 显示 / 移除命令

use anim_runtime::OverlayId;
use tracing::debug;

use super::{CommandExecutor, ExecuteResult};
use crate::screen::Screen;

impl CommandExecutor {
    /// 显示 overlay，消费待应用的动画准备
    pub(super) fn execute_show_overlay(
        &mut self,
        target: OverlayId,
        name: &str,
        position: (i32, i32),
        opacity: u8,
        screen: &mut Screen,
    ) -> ExecuteResult {
        let token = self.pending_configure.take();
        let animated = token.is_some();
        let generation = screen.show(target, name, position.0, position.1, opacity, token);

        debug!(
            overlay = target,
            name,
            animated,
            generation,
            "显示 overlay"
        );
        ExecuteResult::Ok
    }

    pub(super) fn execute_erase_overlay(
        &mut self,
        target: OverlayId,
        screen: &mut Screen,
    ) -> ExecuteResult {
        if screen.erase(target) {
            debug!(overlay = target, "移除 overlay");
        } else {
            debug!(overlay = target, "overlay 不存在，忽略 ERASE");
        }
        ExecuteResult::Ok
    }
}
