//! # Runtime 模块
//!
//! 命令脚本的执行驱动。
//!
//! ## 模块结构
//!
//! - [`sequencer`]：按 tick 推进脚本，处理调用方自己的等待

pub mod sequencer;

pub use sequencer::{Sequencer, WaitingReason};
