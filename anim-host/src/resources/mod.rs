//! # Resources 模块
//!
//! 图片资源系统：来源（[`ResourceSource`]）→ 缓存（[`ImageCache`]）→ 渲染代理。
//!
//! 渲染侧只通过 [`ImageCache`] 登记请求、轮询状态，从不阻塞等待加载。

mod cache;
mod error;
pub mod path;
mod source;

pub use cache::{CacheStats, DEFAULT_IMAGE_BUDGET_MB, PictureCache};
pub use error::ResourceError;
pub use source::{FsSource, MemorySource, ResourceSource};

/// 图片句柄
///
/// 只是已规范化的逻辑路径，可随意克隆、比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    key: String,
}

impl ImageHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// 缓存键（逻辑路径）
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// 已加载图片的尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// 加载状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// 已登记，尚未加载完成
    Pending,
    /// 可用
    Ready(ImageInfo),
    /// 读取或解码失败
    Failed,
}

/// 按文件名寻址的图片缓存
pub trait ImageCache {
    /// 登记加载请求，返回句柄（重复请求是廉价的）
    fn request(&mut self, name: &str) -> ImageHandle;

    /// 查询句柄的加载状态
    fn status(&self, handle: &ImageHandle) -> LoadStatus;
}

/// 生成纯色 PNG（测试用）
#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 120, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}
