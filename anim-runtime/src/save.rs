//! # Save 模块
//!
//! 存档/读档系统的数据模型。
//!
//! ## 设计原则
//!
//! - 所有存档数据必须可序列化（JSON）
//! - 必须有版本号，支持向后兼容检测
//! - 播放中的动画（计数器、淡化进度）完整保存，读档后继续播放

use serde::{Deserialize, Serialize};

use crate::command::OverlayId;
use crate::error::SaveError;
use crate::state::AnimationState;

/// 存档格式版本
///
/// 版本号含义：
/// - MAJOR: 不兼容的格式变更
/// - MINOR: 向后兼容的新字段
pub const SAVE_VERSION_MAJOR: u32 = 1;
pub const SAVE_VERSION_MINOR: u32 = 0;

/// 存档版本信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveVersion {
    pub major: u32,
    pub minor: u32,
}

impl SaveVersion {
    /// 当前版本
    pub fn current() -> Self {
        Self {
            major: SAVE_VERSION_MAJOR,
            minor: SAVE_VERSION_MINOR,
        }
    }

    /// 检查是否兼容：major 必须相同
    pub fn is_compatible(&self) -> bool {
        self.major == SAVE_VERSION_MAJOR
    }
}

impl std::fmt::Display for SaveVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Default for SaveVersion {
    fn default() -> Self {
        Self::current()
    }
}

/// 存档元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// 存档槽位号（1-based）
    pub slot: u32,
    /// 保存时间，由 Host 填写
    #[serde(default)]
    pub timestamp: String,
    /// 保存时已经过的 tick 数
    #[serde(default)]
    pub tick: u64,
}

impl SaveMetadata {
    /// 创建新的元数据
    pub fn new(slot: u32) -> Self {
        Self {
            slot,
            timestamp: String::new(),
            tick: 0,
        }
    }

    /// 设置保存时间
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// 设置 tick 数
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }
}

/// 单个 overlay 的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub id: OverlayId,
    /// 源图片名
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub opacity: u8,
    /// 动画状态（配置 + 播放状态），未设置动画的 overlay 为 `None`
    #[serde(default)]
    pub animation: Option<AnimationState>,
}

/// 存档数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// 存档格式版本
    pub version: SaveVersion,
    /// 存档元数据
    pub metadata: SaveMetadata,
    /// 所有 overlay（按编号升序）
    pub overlays: Vec<OverlaySnapshot>,
}

impl SaveData {
    /// 创建新的存档数据
    pub fn new(slot: u32, overlays: Vec<OverlaySnapshot>) -> Self {
        Self {
            version: SaveVersion::current(),
            metadata: SaveMetadata::new(slot),
            overlays,
        }
    }

    /// 设置元数据
    pub fn with_metadata(mut self, metadata: SaveMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::SerializationFailed(e.to_string()))
    }

    /// 从 JSON 字符串反序列化
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let data: SaveData = serde_json::from_str(json)
            .map_err(|e| SaveError::DeserializationFailed(e.to_string()))?;

        // 检查版本兼容性
        if !data.version.is_compatible() {
            return Err(SaveError::IncompatibleVersion {
                save_version: data.version.to_string(),
                current_version: SaveVersion::current().to_string(),
            });
        }

        Ok(data)
    }
}
