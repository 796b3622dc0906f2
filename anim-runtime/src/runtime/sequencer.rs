//! # Sequencer 模块
//!
//! 按 tick 推进命令脚本。
//!
//! ## 执行模型
//!
//! ```text
//! tick(execute) :
//!   等待中？ ── 是 ──► 剩余 tick 减一，本 tick 不执行命令
//!      │
//!      否
//!      ▼
//!   依次执行命令，直到某条命令要求等待 n tick（或脚本结束）
//! ```
//!
//! 等待只是调用方的调度建议：动画引擎本身在任何 tick 边界都可读可写，
//! Sequencer 不持有任何锁，也不阻塞其他 overlay 的更新。

use crate::command::Command;
use crate::script::Script;

/// 等待原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitingReason {
    /// 不等待，继续执行
    #[default]
    None,
    /// 还需等待的 tick 数
    WaitForTicks(u32),
}

impl WaitingReason {
    /// 是否处于等待状态
    pub fn is_waiting(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// 命令脚本驱动器
#[derive(Debug, Clone)]
pub struct Sequencer {
    script: Script,
    position: usize,
    waiting: WaitingReason,
}

impl Sequencer {
    /// 从头开始执行脚本
    pub fn new(script: Script) -> Self {
        Self {
            script,
            position: 0,
            waiting: WaitingReason::None,
        }
    }

    /// 推进一个 tick
    ///
    /// `execute` 执行一条命令并返回需要等待的 tick 数（0 表示继续）。
    /// `Wait` 命令由 Sequencer 自己处理，不会传给 `execute`。
    /// 返回本 tick 执行的命令数。
    pub fn tick<F>(&mut self, mut execute: F) -> usize
    where
        F: FnMut(&Command) -> u32,
    {
        if let WaitingReason::WaitForTicks(remaining) = self.waiting {
            self.waiting = match remaining.saturating_sub(1) {
                0 => WaitingReason::None,
                left => WaitingReason::WaitForTicks(left),
            };
            return 0;
        }

        let mut executed = 0;
        while let Some(cmd) = self.script.get(self.position) {
            self.position += 1;
            executed += 1;

            let wait = match cmd {
                Command::Wait { ticks } => *ticks,
                _ => execute(cmd),
            };
            if wait > 0 {
                self.waiting = WaitingReason::WaitForTicks(wait);
                break;
            }
        }
        executed
    }

    /// 当前等待状态
    pub fn waiting(&self) -> WaitingReason {
        self.waiting
    }

    /// 下一条待执行命令的索引
    pub fn position(&self) -> usize {
        self.position
    }

    /// 下一条待执行命令的源码行号
    pub fn current_line(&self) -> Option<usize> {
        self.script.line_of(self.position)
    }

    /// 脚本是否执行完毕
    pub fn is_finished(&self) -> bool {
        self.position >= self.script.len() && !self.waiting.is_waiting()
    }

    /// 正在执行的脚本
    pub fn script(&self) -> &Script {
        &self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::AnimationCommand;
    use crate::script::Parser;

    fn sequencer(text: &str) -> Sequencer {
        Sequencer::new(Parser::new().parse("seq", text))
    }

    #[test]
    fn test_runs_until_end_without_waits() {
        let mut seq = sequencer("SHOW 1 a\nSHOW 2 b\nERASE 1");
        let mut seen = Vec::new();
        let executed = seq.tick(|cmd| {
            seen.push(cmd.target());
            0
        });
        assert_eq!(executed, 3);
        assert_eq!(seen, vec![Some(1), Some(2), Some(1)]);
        assert!(seq.is_finished());
        assert_eq!(seq.tick(|_| 0), 0);
    }

    #[test]
    fn test_wait_command_pauses() {
        let mut seq = sequencer("SHOW 1 a\nWAIT 2\nERASE 1");
        assert_eq!(seq.tick(|_| 0), 2);
        assert_eq!(seq.waiting(), WaitingReason::WaitForTicks(2));
        assert_eq!(seq.current_line(), Some(3));

        assert_eq!(seq.tick(|_| 0), 0);
        assert_eq!(seq.tick(|_| 0), 0);
        assert!(!seq.waiting().is_waiting());
        assert!(!seq.is_finished());

        assert_eq!(seq.tick(|_| 0), 1);
        assert!(seq.is_finished());
    }

    #[test]
    fn test_execute_can_request_wait() {
        let mut seq = sequencer("PA_SET_CELL 1 2 WAIT\nPA_PROG_CELL 1");
        let executed = seq.tick(|cmd| match cmd {
            Command::Animation(anim) if anim.waits() => 3,
            _ => 0,
        });
        assert_eq!(executed, 1);
        assert_eq!(seq.waiting(), WaitingReason::WaitForTicks(3));

        for _ in 0..3 {
            assert_eq!(seq.tick(|_| 0), 0);
        }
        let mut last = None;
        seq.tick(|cmd| {
            last = Some(cmd.clone());
            0
        });
        assert_eq!(
            last,
            Some(Command::Animation(AnimationCommand::ProgCell {
                target: 1,
                wait: false
            }))
        );
    }

    #[test]
    fn test_zero_wait_does_not_pause() {
        let mut seq = sequencer("WAIT 0\nSHOW 1 a");
        assert_eq!(seq.tick(|_| 0), 2);
        assert!(seq.is_finished());
    }
}
