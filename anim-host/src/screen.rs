//! # Screen 模块
//!
//! overlay 实体与动画状态的宿主侧容器。
//!
//! 动画状态不挂在 [`Overlay`] 上，而是放在以 [`OverlayId`] 为键的旁表中：
//! 普通 overlay 没有旁表条目，动画命令对它们是空操作。

use std::collections::{BTreeMap, HashMap};

use anim_runtime::{
    AnimationState, ConfigureToken, OverlayId, OverlaySnapshot, apply_on_show,
};

/// 单个 overlay（图片层）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// 图片名（不含目录与扩展名）
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// 基础不透明度（0-255）
    pub opacity: u8,
    /// 来源标识：每次 `show` 递增，文件名不变时渲染代理也能察觉
    pub generation: u64,
}

/// 屏幕状态
#[derive(Debug, Default)]
pub struct Screen {
    overlays: BTreeMap<OverlayId, Overlay>,
    /// 动画旁表
    animations: HashMap<OverlayId, AnimationState>,
    next_generation: u64,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示 overlay
    ///
    /// 同一编号已有 overlay 时整体替换，旧的动画状态一并丢弃；
    /// 携带令牌时为新 overlay 建立动画状态。返回新的来源标识。
    pub fn show(
        &mut self,
        id: OverlayId,
        name: &str,
        x: i32,
        y: i32,
        opacity: u8,
        token: Option<ConfigureToken>,
    ) -> u64 {
        let generation = self.bump_generation();
        self.overlays.insert(
            id,
            Overlay {
                name: name.to_string(),
                x,
                y,
                opacity,
                generation,
            },
        );

        match token {
            Some(token) => {
                let state = self.animations.entry(id).or_default();
                apply_on_show(token, state);
            }
            None => {
                self.animations.remove(&id);
            }
        }

        generation
    }

    /// 移除 overlay 及其动画状态，返回是否存在
    pub fn erase(&mut self, id: OverlayId) -> bool {
        self.animations.remove(&id);
        self.overlays.remove(&id).is_some()
    }

    /// 所有动画状态推进一个 tick，返回单元格发生变化的 overlay 数
    pub fn update(&mut self) -> usize {
        self.animations
            .values_mut()
            .map(|state| state.advance_one_tick())
            .filter(|changed| *changed)
            .count()
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    /// 按编号升序遍历
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.overlays.iter().map(|(id, overlay)| (*id, overlay))
    }

    pub fn animation(&self, id: OverlayId) -> Option<&AnimationState> {
        self.animations.get(&id)
    }

    pub fn animation_mut(&mut self, id: OverlayId) -> Option<&mut AnimationState> {
        self.animations.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// 清空所有 overlay
    pub fn clear(&mut self) {
        self.overlays.clear();
        self.animations.clear();
    }

    /// 生成存档快照（按编号升序）
    pub fn snapshot(&self) -> Vec<OverlaySnapshot> {
        self.overlays
            .iter()
            .map(|(id, overlay)| OverlaySnapshot {
                id: *id,
                name: overlay.name.clone(),
                x: overlay.x,
                y: overlay.y,
                opacity: overlay.opacity,
                animation: self.animations.get(id).cloned(),
            })
            .collect()
    }

    /// 从快照恢复，替换当前全部内容
    ///
    /// 每个 overlay 获得新的来源标识，渲染代理会重新建立位图缓存。
    pub fn restore(&mut self, snapshots: Vec<OverlaySnapshot>) {
        self.clear();
        for snapshot in snapshots {
            let generation = self.bump_generation();
            self.overlays.insert(
                snapshot.id,
                Overlay {
                    name: snapshot.name,
                    x: snapshot.x,
                    y: snapshot.y,
                    opacity: snapshot.opacity,
                    generation,
                },
            );
            if let Some(animation) = snapshot.animation {
                self.animations.insert(snapshot.id, animation);
            }
        }
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}
