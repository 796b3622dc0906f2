//! # Configure 模块
//!
//! 两阶段动画准备：`INIT` 命令只生成令牌，真正显示 overlay 时才消费。
//!
//! ```text
//! PA_INIT ──begin_configure──► ConfigureToken ──(SHOW)──apply_on_show──► AnimationState
//! ```
//!
//! 令牌由调用方显式持有，不存在"下一个被显示的 overlay 自动吃掉配置"的隐式全局字段。

use crate::state::{AnimationConfig, AnimationState};

/// 待应用的动画准备
///
/// 不实现 `Clone`：一个令牌只能被消费一次。
#[derive(Debug, PartialEq, Eq)]
#[must_use = "令牌需要在显示 overlay 时通过 apply_on_show 消费"]
pub struct ConfigureToken {
    config: AnimationConfig,
}

impl ConfigureToken {
    /// 令牌携带的（已归一化）配置
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// 消费令牌，直接生成新的动画状态
    pub fn into_state(self) -> AnimationState {
        AnimationState::new(self.config)
    }
}

/// 第一阶段：校验并归一化参数，生成令牌
pub fn begin_configure(config: AnimationConfig) -> ConfigureToken {
    ConfigureToken {
        config: AnimationConfig::new(
            config.cell_count,
            config.frame_interval,
            config.layout,
            config.fade_duration,
        ),
    }
}

/// 第二阶段：显示 overlay 时消费令牌，重置目标的动画状态
pub fn apply_on_show(token: ConfigureToken, state: &mut AnimationState) {
    state.init_animation(token.config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;
    use crate::state::PlayMode;

    #[test]
    fn test_token_normalizes_config() {
        let token = begin_configure(AnimationConfig {
            cell_count: 0,
            frame_interval: 0,
            layout: LayoutMode::Horizontal,
            fade_duration: 3,
        });
        assert_eq!(token.config().cell_count, 1);
        assert_eq!(token.config().frame_interval, 1);
    }

    #[test]
    fn test_apply_on_show_resets_state() {
        let mut state = AnimationState::new(AnimationConfig::new(3, 1, LayoutMode::Vertical, 0));
        state.start_animation(PlayMode::Forward, true, None);
        state.advance_one_tick();

        let token = begin_configure(AnimationConfig::new(4, 10, LayoutMode::Sequential, 20));
        apply_on_show(token, &mut state);

        assert_eq!(state.config.cell_count, 4);
        assert_eq!(state.config.layout, LayoutMode::Sequential);
        assert_eq!(state.current_cell(), 0);
        assert!(!state.is_animating());
    }

    #[test]
    fn test_into_state() {
        let token = begin_configure(AnimationConfig::new(2, 5, LayoutMode::Vertical, 0));
        let state = token.into_state();
        assert_eq!(state.config.frame_interval, 5);
        assert_eq!(state.playback.raw_cell_counter, 0);
    }
}
