//! 存档系统

use anim_runtime::{SaveData, SaveError, SaveMetadata};
use tracing::info;

use super::Host;

impl Host {
    /// 构建当前状态的存档数据
    pub fn build_save_data(&self, slot: u32) -> SaveData {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        SaveData::new(slot, self.screen.snapshot()).with_metadata(
            SaveMetadata::new(slot)
                .with_timestamp(timestamp)
                .with_tick(self.tick_count),
        )
    }

    /// 从存档数据恢复 overlay 状态
    ///
    /// 渲染代理与图片缓存全部丢弃，下一次渲染遍时按需重建位图缓存；
    /// 读档前加载失败的图片也会重新尝试。
    pub fn restore(&mut self, data: SaveData) {
        info!(
            slot = data.metadata.slot,
            overlays = data.overlays.len(),
            "恢复存档"
        );
        self.tick_count = data.metadata.tick;
        self.command_executor.clear_pending();
        self.screen.restore(data.overlays);
        self.renderer.clear();
        self.cache.clear();
    }

    /// 保存到槽位
    pub fn save(&self, slot: u32) -> Result<(), SaveError> {
        self.save_manager.save(&self.build_save_data(slot))
    }

    /// 从槽位读取
    pub fn load(&mut self, slot: u32) -> Result<(), SaveError> {
        let data = self.save_manager.load(slot)?;
        self.restore(data);
        Ok(())
    }
}
