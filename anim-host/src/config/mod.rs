//! # Config 模块
//!
//! 运行时配置管理。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 每秒 tick 数的上限
pub const MAX_TICKS_PER_SECOND: u32 = 1000;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 图片目录（相对于 assets_root）
    #[serde(default = "default_pictures_dir")]
    pub pictures_dir: String,

    /// 图片名不带扩展名时追加的扩展名
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// 存档目录
    #[serde(default = "default_saves_dir")]
    pub saves_dir: PathBuf,

    /// 默认执行的命令脚本（相对于 assets_root，可选）
    #[serde(default)]
    pub start_script_path: Option<String>,

    /// 每秒 tick 数（用于把 tick 换算为时间）
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,

    /// 资源缓存配置
    #[serde(default)]
    pub resources: ResourceConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 资源缓存配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// 图片缓存大小（MB）
    #[serde(default = "default_image_cache_size_mb")]
    pub image_cache_size_mb: usize,

    /// 每个 tick 最多加载的图片数（0 = 不限）
    #[serde(default = "default_loads_per_tick")]
    pub loads_per_tick: usize,
}

/// 调试配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 每帧输出 overlay 绘制目标（debug 级日志）
    #[serde(default)]
    pub trace_frames: bool,

    /// 加载脚本时运行静态检查
    ///
    /// debug build 默认开启，release build 默认关闭；只输出诊断，不阻塞执行。
    #[serde(default = "default_script_check")]
    pub script_check: bool,
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_pictures_dir() -> String {
    "img/pictures".to_string()
}

fn default_image_extension() -> String {
    "png".to_string()
}

fn default_saves_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_ticks_per_second() -> u32 {
    60
}

fn default_image_cache_size_mb() -> usize {
    256
}

fn default_loads_per_tick() -> usize {
    8
}

fn default_script_check() -> bool {
    cfg!(debug_assertions)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            pictures_dir: default_pictures_dir(),
            image_extension: default_image_extension(),
            saves_dir: default_saves_dir(),
            start_script_path: None,
            ticks_per_second: default_ticks_per_second(),
            resources: ResourceConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            trace_frames: false,
            script_check: default_script_check(),
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            image_cache_size_mb: default_image_cache_size_mb(),
            loads_per_tick: default_loads_per_tick(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 文件不存在或解析失败时返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => {
                info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件无效，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，失败时返回错误
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.assets_root.is_dir() {
            return Err(ConfigError::ValidationFailed(format!(
                "资源目录不存在: {}",
                self.assets_root.display()
            )));
        }

        if let Some(script) = &self.start_script_path {
            let full_path = self.assets_root.join(script);
            if !full_path.is_file() {
                return Err(ConfigError::ValidationFailed(format!(
                    "入口脚本不存在: {}",
                    full_path.display()
                )));
            }
        }

        if self.ticks_per_second == 0 || self.ticks_per_second > MAX_TICKS_PER_SECOND {
            return Err(ConfigError::ValidationFailed(format!(
                "ticks_per_second 必须在 1 - {} 之间",
                MAX_TICKS_PER_SECOND
            )));
        }

        if self.resources.image_cache_size_mb == 0 {
            return Err(ConfigError::ValidationFailed(
                "image_cache_size_mb 必须大于 0".to_string(),
            ));
        }

        if Path::new(&self.pictures_dir).is_absolute() {
            return Err(ConfigError::ValidationFailed(format!(
                "pictures_dir 必须是相对于 assets_root 的路径: {}",
                self.pictures_dir
            )));
        }

        Ok(())
    }

    /// 入口脚本完整路径
    pub fn start_script_full_path(&self) -> Option<PathBuf> {
        self.start_script_path
            .as_ref()
            .map(|script| self.assets_root.join(script))
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    SerializationFailed(String),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    ParseFailed(String),

    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    IoError(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
