//! # Resource Source 模块
//!
//! 资源来源抽象层：图片字节从哪里来。
//!
//! - `FsSource`：从文件系统读取（CLI / 开发模式）
//! - `MemorySource`：从内存表读取（测试与嵌入式资源）
//!
//! 所有路径参数都是已规范化的**逻辑路径**（见 [`super::path`]）。

use super::ResourceError;
use super::path::normalize_logical_path;
use std::collections::HashMap;
use std::path::PathBuf;

/// 资源来源 trait
pub trait ResourceSource: Send + Sync {
    /// 读取资源字节
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError>;

    /// 检查资源是否存在
    fn exists(&self, path: &str) -> bool;

    /// 获取资源的完整路径（用于日志）
    fn full_path(&self, path: &str) -> String;
}

/// 文件系统资源来源
#[derive(Debug, Clone)]
pub struct FsSource {
    /// 资源根目录
    base_path: PathBuf,
}

impl FsSource {
    /// 以 `base_path` 为 assets_root 创建
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, logical_path: &str) -> PathBuf {
        self.base_path.join(normalize_logical_path(logical_path))
    }
}

impl ResourceSource for FsSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let full_path = self.resolve(path);

        std::fs::read(&full_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ResourceError::NotFound {
                path: full_path.to_string_lossy().to_string(),
            },
            _ => ResourceError::LoadFailed {
                path: full_path.to_string_lossy().to_string(),
                kind: "file".to_string(),
                message: e.to_string(),
            },
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn full_path(&self, path: &str) -> String {
        self.resolve(path).to_string_lossy().to_string()
    }
}

/// 内存资源来源
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// 创建空的内存来源
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入资源（路径会被规范化）
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize_logical_path(path), bytes.into());
    }

    /// 链式插入
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// 资源数量
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, ResourceError> {
        let key = normalize_logical_path(path);
        self.files
            .get(&key)
            .cloned()
            .ok_or(ResourceError::NotFound { path: key })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_logical_path(path))
    }

    fn full_path(&self, path: &str) -> String {
        format!("memory://{}", normalize_logical_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fs_source_read() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("img/pictures")).unwrap();
        fs::write(dir.path().join("img/pictures/lamp.png"), b"bytes").unwrap();

        let source = FsSource::new(dir.path());
        assert!(source.exists("img/pictures/lamp.png"));
        assert!(source.exists("img\\pictures\\lamp.png"));
        assert!(!source.exists("img/pictures"));
        assert_eq!(source.read("./img/pictures/lamp.png").unwrap(), b"bytes");
    }

    #[test]
    fn test_fs_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = FsSource::new(dir.path());
        let err = source.read("img/pictures/none.png").unwrap_err();
        assert!(matches!(err, ResourceError::NotFound { .. }));
        assert!(err.path().ends_with("none.png"));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with_file("img/pictures/a.png", vec![1, 2, 3]);
        assert_eq!(source.len(), 1);
        assert!(source.exists("./img/pictures/a.png"));
        assert_eq!(source.read("img/pictures/a.png").unwrap(), vec![1, 2, 3]);
        assert_eq!(source.full_path("img/pictures/a.png"), "memory://img/pictures/a.png");
        assert_eq!(
            source.read("img/pictures/b.png"),
            Err(ResourceError::NotFound {
                path: "img/pictures/b.png".to_string()
            })
        );
    }
}
