//! # Host 层
//!
//! overlay 单元格动画的宿主层实现（无窗口）。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - overlay 实体与动画状态旁表（[`Screen`]）
//! - 将 Runtime 的 Command 落实到屏幕上（[`CommandExecutor`]）
//! - 图片资源的来源与缓存（[`resources`]）
//! - 把动画状态投影为绘制目标（[`Renderer`] / [`RenderProxy`]）
//! - 配置与存档
//!
//! Host 层不包含动画逻辑，单元格解析与淡化计数全部在 `anim-runtime` 中。

pub mod app;
pub mod command_executor;
pub mod config;
pub mod renderer;
pub mod resources;
pub mod save_manager;
pub mod screen;

pub use app::Host;
pub use command_executor::{CommandExecutor, ExecuteResult};
pub use config::{AppConfig, ConfigError, DebugConfig, ResourceConfig};
pub use renderer::{DrawTarget, OverlayFrame, RenderProxy, Renderer};
pub use resources::{
    CacheStats, FsSource, ImageCache, ImageHandle, ImageInfo, LoadStatus, MemorySource,
    PictureCache, ResourceError, ResourceSource,
};
pub use save_manager::{SaveInfo, SaveManager};
pub use screen::{Overlay, Screen};
