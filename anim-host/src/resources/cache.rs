//! # Picture Cache 模块
//!
//! 带 LRU 驱逐和内存预算的图片缓存，[`ImageCache`] 的默认实现。
//!
//! 请求只登记到待加载队列，真正的读取与解码发生在 [`PictureCache::pump`]，
//! 每次最多处理 `loads_per_tick` 个；调用方只轮询状态，从不等待。

use std::collections::{HashMap, HashSet, VecDeque};

use image::RgbaImage;
use tracing::{debug, warn};

use super::path::picture_path;
use super::{ImageCache, ImageHandle, ImageInfo, LoadStatus, ResourceError, ResourceSource};

/// 默认内存预算：256 MB
pub const DEFAULT_IMAGE_BUDGET_MB: usize = 256;

/// 缓存条目
#[derive(Debug)]
struct CacheEntry {
    /// 解码后的像素
    pixels: RgbaImage,
    /// 估算的内存占用（字节）
    size_bytes: usize,
}

impl CacheEntry {
    fn new(pixels: RgbaImage) -> Self {
        // RGBA8
        let size_bytes = pixels.width() as usize * pixels.height() as usize * 4;
        Self { pixels, size_bytes }
    }

    fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }
}

/// 图片缓存
///
/// 特性：
/// - 按帧轮询的增量加载（`loads_per_tick`，0 表示不限）
/// - LRU 驱逐策略与内存预算
/// - 失败的文件只记录一次，之后的请求直接报告 `Failed`
pub struct PictureCache {
    source: Box<dyn ResourceSource>,
    pictures_dir: String,
    extension: String,
    /// 已就绪条目（逻辑路径 -> 条目）
    entries: HashMap<String, CacheEntry>,
    /// LRU 顺序（最近使用的在后面）
    lru_order: VecDeque<String>,
    /// 待加载队列
    queue: VecDeque<String>,
    failed: HashSet<String>,
    budget_bytes: usize,
    used_bytes: usize,
    loads_per_tick: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl PictureCache {
    /// 创建图片缓存
    ///
    /// # 参数
    /// - `source`: 资源来源
    /// - `pictures_dir`: 图片目录（逻辑路径）
    /// - `extension`: 图片名不带扩展名时追加的扩展名
    pub fn new(
        source: impl ResourceSource + 'static,
        pictures_dir: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            source: Box::new(source),
            pictures_dir: pictures_dir.into(),
            extension: extension.into(),
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
            queue: VecDeque::new(),
            failed: HashSet::new(),
            budget_bytes: DEFAULT_IMAGE_BUDGET_MB * 1024 * 1024,
            used_bytes: 0,
            loads_per_tick: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// 设置内存预算（MB）
    pub fn with_budget_mb(self, budget_mb: usize) -> Self {
        self.with_budget_bytes(budget_mb * 1024 * 1024)
    }

    /// 设置内存预算（字节）
    pub fn with_budget_bytes(mut self, budget_bytes: usize) -> Self {
        self.budget_bytes = budget_bytes;
        self
    }

    /// 设置每次 `pump` 的最大加载数（0 = 不限）
    pub fn with_loads_per_tick(mut self, loads_per_tick: usize) -> Self {
        self.loads_per_tick = loads_per_tick;
        self
    }

    /// 处理待加载队列
    ///
    /// 返回本次处理（成功或失败）的请求数。
    pub fn pump(&mut self) -> usize {
        let limit = match self.loads_per_tick {
            0 => usize::MAX,
            n => n,
        };

        let mut processed = 0;
        while processed < limit {
            let Some(key) = self.queue.pop_front() else {
                break;
            };
            if self.entries.contains_key(&key) {
                continue;
            }

            match self.load(&key) {
                Ok(pixels) => {
                    debug!(
                        path = %key,
                        width = pixels.width(),
                        height = pixels.height(),
                        "图片加载完成"
                    );
                    self.insert(key, pixels);
                }
                Err(e) => {
                    warn!(path = %self.source.full_path(&key), error = %e, "图片加载失败");
                    self.failed.insert(key);
                }
            }
            processed += 1;
        }

        processed
    }

    /// 图片文件是否存在（不加载）
    pub fn picture_exists(&self, name: &str) -> bool {
        self.source
            .exists(&picture_path(&self.pictures_dir, name, &self.extension))
    }

    /// 待加载请求数
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// 清空缓存（包括失败记录，之后的请求会重新加载）
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru_order.clear();
        self.queue.clear();
        self.failed.clear();
        self.used_bytes = 0;
    }

    /// 当前占用（字节）
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// 预算（字节）
    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    /// 已就绪条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            pending: self.queue.len(),
            failed: self.failed.len(),
            used_bytes: self.used_bytes,
            budget_bytes: self.budget_bytes,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: if self.hits + self.misses > 0 {
                self.hits as f64 / (self.hits + self.misses) as f64
            } else {
                0.0
            },
        }
    }

    // === 内部方法 ===

    fn load(&self, key: &str) -> Result<RgbaImage, ResourceError> {
        let bytes = self.source.read(key)?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| ResourceError::InvalidFormat {
            path: self.source.full_path(key),
            message: e.to_string(),
        })?;
        Ok(decoded.to_rgba8())
    }

    fn insert(&mut self, key: String, pixels: RgbaImage) {
        let entry = CacheEntry::new(pixels);
        let new_size = entry.size_bytes;

        while self.used_bytes + new_size > self.budget_bytes {
            if !self.evict_one() {
                warn!(
                    path = %key,
                    used_mb = (self.used_bytes + new_size) as f64 / 1024.0 / 1024.0,
                    budget_mb = self.budget_bytes as f64 / 1024.0 / 1024.0,
                    "图片缓存超出预算，无可驱逐条目，强制插入"
                );
                break;
            }
        }

        self.used_bytes += new_size;
        self.entries.insert(key.clone(), entry);
        self.lru_order.push_back(key);
    }

    /// 将 key 移到 LRU 末尾
    fn touch(&mut self, key: &str) {
        self.remove_from_lru(key);
        self.lru_order.push_back(key.to_string());
    }

    fn remove_from_lru(&mut self, key: &str) {
        self.lru_order.retain(|k| k != key);
    }

    /// 驱逐最久未使用的条目，返回是否成功
    fn evict_one(&mut self) -> bool {
        let Some(key) = self.lru_order.pop_front() else {
            return false;
        };
        if let Some(entry) = self.entries.remove(&key) {
            self.used_bytes = self.used_bytes.saturating_sub(entry.size_bytes);
            self.evictions += 1;
            debug!(path = %key, "图片被驱逐");
        }
        true
    }
}

impl ImageCache for PictureCache {
    fn request(&mut self, name: &str) -> ImageHandle {
        let key = picture_path(&self.pictures_dir, name, &self.extension);

        if self.entries.contains_key(&key) {
            self.hits += 1;
            self.touch(&key);
        } else if !self.failed.contains(&key) && !self.queue.contains(&key) {
            self.misses += 1;
            self.queue.push_back(key.clone());
        }

        ImageHandle::new(key)
    }

    fn status(&self, handle: &ImageHandle) -> LoadStatus {
        if let Some(entry) = self.entries.get(handle.key()) {
            LoadStatus::Ready(entry.info())
        } else if self.failed.contains(handle.key()) {
            LoadStatus::Failed
        } else {
            LoadStatus::Pending
        }
    }
}

impl std::fmt::Debug for PictureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureCache")
            .field("pictures_dir", &self.pictures_dir)
            .field("extension", &self.extension)
            .field("stats", &self.stats())
            .finish()
    }
}

/// 缓存统计信息
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// 已就绪条目数量
    pub entries: usize,
    /// 待加载请求数
    pub pending: usize,
    /// 加载失败的文件数
    pub failed: usize,
    /// 当前占用（字节）
    pub used_bytes: usize,
    /// 预算（字节）
    pub budget_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    /// 格式化为可读字符串
    pub fn format(&self) -> String {
        format!(
            "Cache: {} entries ({} pending, {} failed), {:.1}MB / {:.1}MB, hit rate: {:.1}%, evictions: {}",
            self.entries,
            self.pending,
            self.failed,
            self.used_bytes as f64 / 1024.0 / 1024.0,
            self.budget_bytes as f64 / 1024.0 / 1024.0,
            self.hit_rate * 100.0,
            self.evictions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{MemorySource, encode_png};

    fn cache_with(files: &[(&str, u32, u32)]) -> PictureCache {
        let mut source = MemorySource::new();
        for (name, w, h) in files {
            source.insert(&format!("img/pictures/{}.png", name), encode_png(*w, *h));
        }
        PictureCache::new(source, "img/pictures", "png")
    }

    #[test]
    fn test_request_is_pending_until_pump() {
        let mut cache = cache_with(&[("lamp", 4, 2)]);
        let handle = cache.request("lamp");
        assert_eq!(handle.key(), "img/pictures/lamp.png");
        assert_eq!(cache.status(&handle), LoadStatus::Pending);
        assert_eq!(cache.pending_count(), 1);

        assert_eq!(cache.pump(), 1);
        assert_eq!(
            cache.status(&handle),
            LoadStatus::Ready(ImageInfo {
                width: 4,
                height: 2
            })
        );
        assert_eq!(cache.used_bytes(), 4 * 2 * 4);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_duplicate_requests_are_queued_once() {
        let mut cache = cache_with(&[("lamp", 1, 1)]);
        cache.request("lamp");
        cache.request("lamp");
        assert_eq!(cache.pending_count(), 1);
        cache.pump();
        cache.request("lamp");

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_picture_exists() {
        let cache = cache_with(&[("lamp", 1, 1)]);
        assert!(cache.picture_exists("lamp"));
        assert!(!cache.picture_exists("door"));
        assert_eq!(cache.pending_count(), 0);
    }

    #[test]
    fn test_loads_per_tick_limit() {
        let mut cache = cache_with(&[("a", 1, 1), ("b", 1, 1), ("c", 1, 1)]).with_loads_per_tick(2);
        let handles: Vec<_> = ["a", "b", "c"].iter().map(|n| cache.request(n)).collect();

        assert_eq!(cache.pump(), 2);
        assert!(matches!(cache.status(&handles[1]), LoadStatus::Ready(_)));
        assert_eq!(cache.status(&handles[2]), LoadStatus::Pending);
        assert_eq!(cache.pump(), 1);
        assert_eq!(cache.pump(), 0);
        assert!(matches!(cache.status(&handles[2]), LoadStatus::Ready(_)));
    }

    #[test]
    fn test_missing_and_corrupt_files_fail() {
        let source = MemorySource::new().with_file("img/pictures/bad.png", b"not a png".to_vec());
        let mut cache = PictureCache::new(source, "img/pictures", "png");
        let missing = cache.request("missing");
        let bad = cache.request("bad");
        cache.pump();

        assert_eq!(cache.status(&missing), LoadStatus::Failed);
        assert_eq!(cache.status(&bad), LoadStatus::Failed);
        // 失败后不再重新排队
        cache.request("bad");
        assert_eq!(cache.pending_count(), 0);
        assert_eq!(cache.stats().failed, 2);
    }

    #[test]
    fn test_lru_eviction_under_budget() {
        // 每张 2x2 = 16 字节，预算只够两张
        let mut cache = cache_with(&[("a", 2, 2), ("b", 2, 2), ("c", 2, 2)]).with_budget_bytes(32);
        let a = cache.request("a");
        let b = cache.request("b");
        cache.pump();
        // 访问 a，使 b 成为最久未使用
        cache.request("a");
        let c = cache.request("c");
        cache.pump();

        assert!(matches!(cache.status(&a), LoadStatus::Ready(_)));
        assert_eq!(cache.status(&b), LoadStatus::Pending);
        assert!(matches!(cache.status(&c), LoadStatus::Ready(_)));
        assert_eq!(cache.used_bytes(), 32);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_oversized_image_is_still_inserted() {
        let mut cache = cache_with(&[("big", 4, 4)]).with_budget_bytes(8);
        let big = cache.request("big");
        cache.pump();
        assert!(matches!(cache.status(&big), LoadStatus::Ready(_)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_drops_entries_and_failures() {
        let mut cache = cache_with(&[("lamp", 2, 2)]);
        let lamp = cache.request("lamp");
        let missing = cache.request("late");
        cache.pump();
        assert_eq!(cache.status(&missing), LoadStatus::Failed);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.used_bytes(), 0);
        assert_eq!(cache.status(&lamp), LoadStatus::Pending);
        assert_eq!(cache.status(&missing), LoadStatus::Pending);

        // 失败记录已清除，可以重新排队
        cache.request("late");
        assert_eq!(cache.pending_count(), 1);
    }

    #[test]
    fn test_cache_stats_format() {
        let stats = CacheStats {
            entries: 10,
            pending: 2,
            failed: 1,
            used_bytes: 50 * 1024 * 1024,
            budget_bytes: 256 * 1024 * 1024,
            hits: 80,
            misses: 20,
            evictions: 5,
            hit_rate: 0.8,
        };

        let formatted = stats.format();
        assert!(formatted.contains("10 entries (2 pending, 1 failed)"));
        assert!(formatted.contains("50.0MB / 256.0MB"));
        assert!(formatted.contains("hit rate: 80.0%"));
    }
}
