//! # Renderer 模块
//!
//! 渲染遍：把 [`Screen`] 的状态投影到每个 overlay 的绘制目标上。
//!
//! ## 结构
//!
//! - [`RenderProxy`]：与 overlay 一一对应的绘制侧投影，持有位图缓存
//! - [`DrawTarget`]：最终输出的绘制单元
//!
//! 渲染器以 [`OverlayId`] 为键维护代理旁表；overlay 被移除时代理随之丢弃。

mod draw_target;
mod render_proxy;

pub use draw_target::DrawTarget;
pub use render_proxy::RenderProxy;

use std::collections::BTreeMap;

use anim_runtime::OverlayId;
use tracing::debug;

use crate::resources::ImageCache;
use crate::screen::Screen;

/// 单个 overlay 的绘制输出
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub id: OverlayId,
    /// 当前单元格
    pub primary: DrawTarget,
    /// 淡出中的旧单元格
    pub secondary: DrawTarget,
}

/// 渲染器
#[derive(Debug, Default)]
pub struct Renderer {
    proxies: BTreeMap<OverlayId, RenderProxy>,
    /// 每帧输出绘制目标的调试日志
    trace_frames: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace_frames(mut self, trace_frames: bool) -> Self {
        self.trace_frames = trace_frames;
        self
    }

    /// 渲染一遍
    pub fn render(&mut self, screen: &Screen, cache: &mut dyn ImageCache) {
        self.proxies.retain(|id, _| screen.overlay(*id).is_some());

        for (id, overlay) in screen.overlays() {
            let proxy = self
                .proxies
                .entry(id)
                .or_insert_with(|| RenderProxy::new(id));
            proxy.sync(overlay, screen.animation(id), cache);

            if self.trace_frames {
                debug!(
                    overlay = id,
                    primary = %proxy.primary(),
                    secondary = %proxy.secondary(),
                    "frame"
                );
            }
        }
    }

    pub fn proxy(&self, id: OverlayId) -> Option<&RenderProxy> {
        self.proxies.get(&id)
    }

    /// 当前帧的全部绘制输出（按编号升序）
    pub fn frame(&self) -> Vec<OverlayFrame> {
        self.proxies
            .values()
            .map(|proxy| OverlayFrame {
                id: proxy.overlay_id(),
                primary: proxy.primary().clone(),
                secondary: proxy.secondary().clone(),
            })
            .collect()
    }

    /// 丢弃全部代理（读档后调用，位图缓存会按需重建）
    pub fn clear(&mut self) {
        self.proxies.clear();
    }
}
