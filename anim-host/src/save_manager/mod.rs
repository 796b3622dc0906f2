//! # SaveManager 模块
//!
//! 存档文件管理，负责存档的读写和 slot 管理。
//!
//! ## 文件布局
//!
//! ```text
//! saves/
//! ├── slot_001.json
//! ├── slot_002.json
//! └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anim_runtime::{SaveData, SaveError};
use tracing::info;

/// 最大存档槽位数
pub const MAX_SAVE_SLOTS: u32 = 99;

/// 存档管理器
#[derive(Debug, Clone)]
pub struct SaveManager {
    saves_dir: PathBuf,
}

impl SaveManager {
    pub fn new(saves_dir: impl AsRef<Path>) -> Self {
        Self {
            saves_dir: saves_dir.as_ref().to_path_buf(),
        }
    }

    /// 确保存档目录存在
    pub fn ensure_dir(&self) -> Result<(), SaveError> {
        fs::create_dir_all(&self.saves_dir)
            .map_err(|e| SaveError::IoError(format!("无法创建存档目录: {}", e)))
    }

    /// 获取存档文件路径
    pub fn slot_path(&self, slot: u32) -> PathBuf {
        self.saves_dir.join(format!("slot_{:03}.json", slot))
    }

    /// 保存存档（写入 `data.metadata.slot` 对应的文件）
    pub fn save(&self, data: &SaveData) -> Result<(), SaveError> {
        self.ensure_dir()?;

        let path = self.slot_path(data.metadata.slot);
        let json = data.to_json()?;
        fs::write(&path, json)
            .map_err(|e| SaveError::IoError(format!("无法写入存档文件: {}", e)))?;

        info!(path = %path.display(), overlays = data.overlays.len(), "存档保存成功");
        Ok(())
    }

    /// 读取存档
    pub fn load(&self, slot: u32) -> Result<SaveData, SaveError> {
        let path = self.slot_path(slot);
        if !path.is_file() {
            return Err(SaveError::NotFound(path.to_string_lossy().to_string()));
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| SaveError::IoError(format!("无法读取存档文件: {}", e)))?;
        let data = SaveData::from_json(&json)?;

        info!(path = %path.display(), overlays = data.overlays.len(), "存档读取成功");
        Ok(data)
    }

    /// 删除存档（不存在时什么也不做）
    pub fn delete(&self, slot: u32) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| SaveError::IoError(format!("无法删除存档文件: {}", e)))?;
            info!(path = %path.display(), "存档删除成功");
        }
        Ok(())
    }

    pub fn exists(&self, slot: u32) -> bool {
        self.slot_path(slot).is_file()
    }

    /// 列出所有存档（按槽位升序）
    pub fn list_saves(&self) -> Vec<(u32, PathBuf)> {
        let Ok(entries) = fs::read_dir(&self.saves_dir) else {
            return Vec::new();
        };

        let mut saves: Vec<(u32, PathBuf)> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter_map(|path| {
                let slot = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_prefix("slot_"))
                    .and_then(|n| n.strip_suffix(".json"))
                    .and_then(|n| n.parse::<u32>().ok())?;
                Some((slot, path))
            })
            .collect();

        saves.sort_by_key(|(slot, _)| *slot);
        saves
    }

    /// 下一个可用的存档槽位
    pub fn next_available_slot(&self) -> Option<u32> {
        (1..=MAX_SAVE_SLOTS).find(|slot| !self.exists(*slot))
    }

    /// 存档摘要（读取失败时返回 None）
    pub fn get_save_info(&self, slot: u32) -> Option<SaveInfo> {
        let data = self.load(slot).ok()?;
        Some(SaveInfo {
            slot,
            timestamp: data.metadata.timestamp,
            tick: data.metadata.tick,
            overlay_count: data.overlays.len(),
        })
    }
}

/// 存档摘要
#[derive(Debug, Clone, PartialEq)]
pub struct SaveInfo {
    pub slot: u32,
    pub timestamp: String,
    pub tick: u64,
    pub overlay_count: usize,
}
