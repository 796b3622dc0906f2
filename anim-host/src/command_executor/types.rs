//! Command Executor 类型定义

/// Command 执行结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecuteResult {
    /// 执行完成，继续下一条
    #[default]
    Ok,
    /// 执行完成，调用方应等待指定 tick 数后再继续
    WaitForTicks(u32),
}

impl ExecuteResult {
    /// 需要等待的 tick 数（不等待时为 0）
    pub fn wait_ticks(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::WaitForTicks(ticks) => ticks,
        }
    }

    /// 由 tick 数构造，0 视为不等待
    pub fn wait(ticks: u32) -> Self {
        if ticks == 0 {
            Self::Ok
        } else {
            Self::WaitForTicks(ticks)
        }
    }
}
