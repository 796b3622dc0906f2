//! # State 模块
//!
//! 单个 overlay 的动画逻辑模型：配置 + 播放状态 + 单元格解析算法。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**，所有字段可序列化（存档/读档）
//! - 读取操作无副作用：`resolve_cell` / `current_cell` 是纯函数
//! - 状态只在两个时机改变：每个 tick 的 `advance_one_tick`，以及命令调用
//!
//! ## 计数器模型
//!
//! ```text
//! frame_counter ──(满 frame_interval)──► raw_cell_counter ──resolve_cell──► 单元格索引
//!                                          (对周期长度取模)
//! ```
//!
//! 解析出的单元格发生变化时，旧值写入 `previous_cell`，并把
//! `fade_remaining` 重置为 `fade_duration`，供渲染端做交叉淡化。

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutMode, normalize_cell_count};

/// 动画配置
///
/// 初始化时确定，重新初始化前不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 单元格数量（≥ 1）
    pub cell_count: u32,
    /// 每隔多少 tick 前进一格（≥ 1）
    pub frame_interval: u32,
    /// 单元格布局
    pub layout: LayoutMode,
    /// 切换单元格时交叉淡化的 tick 数，0 表示瞬间切换
    pub fade_duration: u32,
}

impl AnimationConfig {
    /// 创建配置，`cell_count` 与 `frame_interval` 小于 1 时归一化为 1
    pub fn new(cell_count: u32, frame_interval: u32, layout: LayoutMode, fade_duration: u32) -> Self {
        Self {
            cell_count: normalize_cell_count(cell_count),
            frame_interval: frame_interval.max(1),
            layout,
            fade_duration,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new(1, 1, LayoutMode::Vertical, 0)
    }
}

/// 播放模式（单元格解析策略）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayMode {
    /// 未设置，按顺序解析
    #[default]
    None,
    /// 顺序：0 → 1 → … → N-1 → 0
    Forward,
    /// 往返：0 → 1 → … → N-1 → N-2 → … → 1 → 0
    PingPong,
    /// 按自定义序列
    Custom,
}

impl PlayMode {
    /// 从命令参数（1/2/3）解析，其余值视为 [`PlayMode::None`]
    pub fn from_arg(value: u32) -> Self {
        match value {
            1 => Self::Forward,
            2 => Self::PingPong,
            3 => Self::Custom,
            _ => Self::None,
        }
    }
}

/// 播放状态
///
/// 由所属 overlay 独占，`start_animation` / `init_animation` 时重置。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationPlayback {
    /// 解析策略，停止后保留，保证停下的画面不跳变
    pub play_mode: PlayMode,
    /// 自定义序列（内部 0-based），仅 `Custom` 模式使用
    pub custom_sequence: Option<Vec<u32>>,
    /// 是否循环；为 false 时播放一个周期后自动停止
    pub looping: bool,
    /// 是否正在计时推进
    pub animating: bool,
    /// 帧计数，始终 `< frame_interval`
    pub frame_counter: u32,
    /// 原始单元格计数，始终对周期长度取模
    pub raw_cell_counter: u32,
    /// 最近一次切换之前解析出的单元格
    pub previous_cell: u32,
    /// 交叉淡化剩余 tick 数
    pub fade_remaining: u32,
}

/// 单个 overlay 的动画状态（配置 + 播放状态）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    pub config: AnimationConfig,
    pub playback: AnimationPlayback,
}

impl AnimationState {
    /// 以给定配置创建动画状态
    pub fn new(config: AnimationConfig) -> Self {
        let mut state = Self::default();
        state.init_animation(config);
        state
    }

    /// 重新设置配置，并把播放状态恢复为默认值
    pub fn init_animation(&mut self, config: AnimationConfig) {
        self.config = AnimationConfig::new(
            config.cell_count,
            config.frame_interval,
            config.layout,
            config.fade_duration,
        );
        self.playback = AnimationPlayback::default();
    }

    /// 开始播放
    ///
    /// `custom_sequence` 的元素为 1-based 单元格号，内部转换为 0-based；
    /// `Custom` 模式下序列缺失或为空时退化为只显示第 1 格。
    /// 原始计数保留当前位置（对新周期取模），帧计数清零。
    /// 换模式或换序列导致解析出的单元格变化时，同样触发淡化。
    pub fn start_animation(
        &mut self,
        play_mode: PlayMode,
        looping: bool,
        custom_sequence: Option<Vec<u32>>,
    ) {
        let before = self.current_cell();
        let sequence = custom_sequence
            .map(|seq| seq.into_iter().map(|c| c.saturating_sub(1)).collect::<Vec<_>>())
            .filter(|seq| !seq.is_empty());

        self.playback.play_mode = play_mode;
        self.playback.custom_sequence = match play_mode {
            PlayMode::Custom => Some(sequence.unwrap_or_else(|| vec![0])),
            _ => sequence,
        };
        self.playback.looping = looping;
        self.playback.animating = true;
        self.playback.frame_counter = 0;
        self.playback.raw_cell_counter %= self.cycle_length();
        self.note_cell_change(before);
    }

    /// 停止播放
    ///
    /// - `force = true`：立即停在当前单元格
    /// - `force = false`：只取消循环，播放到周期结束（回到起点）后停止
    pub fn stop_animation(&mut self, force: bool) {
        self.playback.looping = false;
        if force {
            self.playback.animating = false;
        }
    }

    /// 推进一个 tick
    ///
    /// 淡化计数与计时推进相互独立：淡化进行中也会照常前进，
    /// 前进时重新触发淡化。返回本 tick 解析出的单元格是否变化。
    pub fn advance_one_tick(&mut self) -> bool {
        if self.playback.fade_remaining > 0 {
            self.playback.fade_remaining -= 1;
        }

        if !self.playback.animating {
            return false;
        }

        self.playback.frame_counter = (self.playback.frame_counter + 1) % self.config.frame_interval;
        if self.playback.frame_counter != 0 {
            return false;
        }

        let changed = self.advance_cell_directly();
        if self.playback.raw_cell_counter == 0 && !self.playback.looping {
            self.playback.animating = false;
        }
        changed
    }

    /// 直接设置原始计数（手动步进）
    ///
    /// 与计时推进走同一条路径：取模 → 检测变化 → 触发淡化。
    /// 返回解析出的单元格是否变化。
    pub fn set_cell_directly(&mut self, raw_index: u32) -> bool {
        let before = self.current_cell();
        self.playback.raw_cell_counter = raw_index % self.cycle_length();
        self.note_cell_change(before)
    }

    /// 与 `before` 相比单元格变化时记录旧值并重置淡化
    fn note_cell_change(&mut self, before: u32) -> bool {
        if self.current_cell() == before {
            return false;
        }
        self.playback.previous_cell = before;
        self.playback.fade_remaining = self.config.fade_duration;
        true
    }

    /// 原始计数加一（手动步进）
    pub fn advance_cell_directly(&mut self) -> bool {
        self.set_cell_directly(self.playback.raw_cell_counter + 1)
    }

    /// 当前播放模式下的有效周期长度（≥ 1）
    ///
    /// - `Forward` / `None`：`cell_count`
    /// - `PingPong`：`2 * (cell_count - 1)`，单格时退化为 1（静止）
    /// - `Custom`：序列长度
    pub fn cycle_length(&self) -> u32 {
        let cell_count = self.config.cell_count.max(1);
        match self.playback.play_mode {
            PlayMode::PingPong => (2 * (cell_count - 1)).max(1),
            PlayMode::Custom => self
                .playback
                .custom_sequence
                .as_ref()
                .map_or(1, |seq| seq.len().max(1) as u32),
            PlayMode::Forward | PlayMode::None => cell_count,
        }
    }

    /// 把原始计数解析为单元格索引（0-based，纯函数）
    pub fn resolve_cell(&self, raw_index: u32) -> u32 {
        let cell_count = self.config.cell_count.max(1);
        let last = cell_count - 1;
        let m = raw_index % self.cycle_length();

        match self.playback.play_mode {
            PlayMode::PingPong => last - m.abs_diff(last).min(last),
            PlayMode::Custom => self
                .playback
                .custom_sequence
                .as_ref()
                .and_then(|seq| seq.get(m as usize))
                .map_or(0, |&cell| cell.min(last)),
            PlayMode::Forward | PlayMode::None => m % cell_count,
        }
    }

    /// 当前应显示的单元格
    pub fn current_cell(&self) -> u32 {
        self.resolve_cell(self.playback.raw_cell_counter)
    }

    /// 最近一次切换前的单元格（淡化时绘制在下层）
    pub fn previous_cell(&self) -> u32 {
        self.playback.previous_cell
    }

    /// 是否正在计时推进
    pub fn is_animating(&self) -> bool {
        self.playback.animating
    }

    /// 是否处于交叉淡化中
    pub fn is_fading(&self) -> bool {
        self.playback.fade_remaining > 0
    }

    /// 交叉淡化剩余 tick 数
    pub fn fade_remaining(&self) -> u32 {
        self.playback.fade_remaining
    }

    /// 旧单元格的不透明度：`base * fade_remaining / fade_duration`
    ///
    /// `fade_duration = 0` 时恒为 0。
    pub fn fade_opacity(&self, base: f32) -> f32 {
        if self.config.fade_duration == 0 {
            return 0.0;
        }
        base * self.playback.fade_remaining as f32 / self.config.fade_duration as f32
    }
}
