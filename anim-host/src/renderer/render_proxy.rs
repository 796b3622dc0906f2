//! # Render Proxy 模块
//!
//! 动画状态在绘制侧的投影，与 overlay 一一对应。
//!
//! ## 职责
//!
//! - 主目标：当前单元格
//! - 副目标：切换前的单元格，仅在交叉淡化期间可见，
//!   不透明度为 `base * fade_remaining / fade_duration`
//! - 连号布局逐格请求图片，全部就绪后才开始按单元格绘制
//! - overlay 的来源标识（图片名 + generation）变化时丢弃全部位图缓存
//!
//! 代理只读取 [`AnimationState`]，从不修改它。

use anim_runtime::{AnimationState, CellRect, LayoutMode, OverlayId, layout};
use tracing::{debug, warn};

use super::DrawTarget;
use crate::resources::{ImageCache, ImageHandle, ImageInfo, LoadStatus};
use crate::screen::Overlay;

/// 当前绑定的来源及其派生数据
#[derive(Debug)]
struct Binding {
    name: String,
    generation: u64,
    /// 来源图片（连号布局的第一格）
    base: ImageHandle,
    /// 动画所需的全部图片（图片名, 句柄）
    required: Vec<(String, ImageHandle)>,
    /// 全部就绪后记录的尺寸，与 `required` 一一对应
    sizes: Option<Vec<ImageInfo>>,
    /// 加载失败后退化为静态图片
    degraded: bool,
    warned: bool,
}

impl Binding {
    fn matches(&self, overlay: &Overlay) -> bool {
        self.generation == overlay.generation && self.name == overlay.name
    }
}

enum Readiness {
    Ready,
    Pending,
    Failed(String),
}

/// 渲染代理
#[derive(Debug)]
pub struct RenderProxy {
    overlay_id: OverlayId,
    primary: DrawTarget,
    secondary: DrawTarget,
    binding: Option<Binding>,
}

impl RenderProxy {
    pub fn new(overlay_id: OverlayId) -> Self {
        Self {
            overlay_id,
            primary: DrawTarget::hidden(),
            secondary: DrawTarget::hidden(),
            binding: None,
        }
    }

    pub fn overlay_id(&self) -> OverlayId {
        self.overlay_id
    }

    /// 主目标（当前单元格）
    pub fn primary(&self) -> &DrawTarget {
        &self.primary
    }

    /// 副目标（淡出中的旧单元格）
    pub fn secondary(&self) -> &DrawTarget {
        &self.secondary
    }

    /// 所需图片是否已全部就绪
    pub fn is_ready(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.sizes.is_some())
    }

    /// 是否已退化为静态图片
    pub fn is_degraded(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.degraded)
    }

    /// 渲染一遍：根据 overlay 与动画状态更新两个绘制目标
    pub fn sync(
        &mut self,
        overlay: &Overlay,
        animation: Option<&AnimationState>,
        cache: &mut dyn ImageCache,
    ) {
        self.bind(overlay, cache);

        let base_opacity = f32::from(overlay.opacity);
        let position = (overlay.x, overlay.y);

        let state = match animation {
            Some(state) if !self.is_degraded() => state,
            _ => {
                self.draw_static(position, base_opacity, cache);
                return;
            }
        };

        self.ensure_required(state, cache);
        match self.poll_ready(cache) {
            Readiness::Ready => self.draw_cells(state, position, base_opacity),
            Readiness::Pending => {
                self.primary.hide();
                self.secondary.hide();
            }
            Readiness::Failed(path) => {
                if let Some(binding) = self.binding.as_mut() {
                    binding.degraded = true;
                    binding.warned = true;
                }
                warn!(
                    overlay = self.overlay_id,
                    name = %overlay.name,
                    path = %path,
                    "单元格图片加载失败，退化为静态图片"
                );
                self.draw_static(position, base_opacity, cache);
            }
        }
    }

    /// 来源标识变化时重新绑定
    fn bind(&mut self, overlay: &Overlay, cache: &mut dyn ImageCache) {
        if self.binding.as_ref().is_some_and(|b| b.matches(overlay)) {
            return;
        }

        debug!(
            overlay = self.overlay_id,
            name = %overlay.name,
            generation = overlay.generation,
            "渲染代理绑定新来源"
        );
        self.binding = Some(Binding {
            name: overlay.name.clone(),
            generation: overlay.generation,
            base: cache.request(&overlay.name),
            required: Vec::new(),
            sizes: None,
            degraded: false,
            warned: false,
        });
        self.primary.hide();
        self.secondary.hide();
    }

    /// 建立动画所需的图片列表（连号布局每格一张），并登记加载请求
    fn ensure_required(&mut self, state: &AnimationState, cache: &mut dyn ImageCache) {
        let Some(binding) = self.binding.as_mut() else {
            return;
        };

        let config = &state.config;
        let expected = if config.layout.is_banded() {
            1
        } else {
            config.cell_count.max(1) as usize
        };
        if binding.required.len() == expected {
            return;
        }

        let mut required = vec![(binding.name.clone(), binding.base.clone())];
        if config.layout == LayoutMode::Sequential {
            for index in 1..config.cell_count {
                let name = layout::sequential_name(&binding.name, config.cell_count, index);
                let handle = cache.request(&name);
                required.push((name, handle));
            }
        }
        binding.required = required;
        binding.sizes = None;
    }

    /// 轮询就绪状态；全部就绪后记录尺寸，之后不再查询缓存
    fn poll_ready(&mut self, cache: &mut dyn ImageCache) -> Readiness {
        let Some(binding) = self.binding.as_mut() else {
            return Readiness::Pending;
        };
        if binding.sizes.is_some() {
            return Readiness::Ready;
        }

        let mut sizes = Vec::with_capacity(binding.required.len());
        let mut pending = false;
        for (name, handle) in &binding.required {
            match cache.status(handle) {
                LoadStatus::Ready(info) => sizes.push(info),
                LoadStatus::Pending => {
                    // 被驱逐的条目需要重新登记
                    cache.request(name);
                    pending = true;
                }
                LoadStatus::Failed => return Readiness::Failed(handle.key().to_string()),
            }
        }

        if pending {
            return Readiness::Pending;
        }
        binding.sizes = Some(sizes);
        Readiness::Ready
    }

    fn draw_cells(&mut self, state: &AnimationState, position: (i32, i32), base_opacity: f32) {
        let Some((image, frame)) = self.cell_target(state, state.current_cell()) else {
            return;
        };
        self.primary.show(image, frame, position, base_opacity);

        if state.is_fading()
            && let Some((image, frame)) = self.cell_target(state, state.previous_cell())
        {
            self.secondary
                .show(image, frame, position, state.fade_opacity(base_opacity));
        } else {
            self.secondary.hide();
        }
    }

    /// 单元格 → (图片, 子矩形)
    fn cell_target(&self, state: &AnimationState, cell: u32) -> Option<(ImageHandle, CellRect)> {
        let binding = self.binding.as_ref()?;
        let sizes = binding.sizes.as_ref()?;
        let config = &state.config;

        match config.layout {
            LayoutMode::Sequential => {
                let index = (cell as usize).min(binding.required.len().checked_sub(1)?);
                let info = sizes.get(index)?;
                let (_, handle) = binding.required.get(index)?;
                Some((handle.clone(), CellRect::full(info.width, info.height)))
            }
            LayoutMode::Vertical | LayoutMode::Horizontal => {
                let info = sizes.first()?;
                let frame = layout::band_rect(
                    config.layout,
                    config.cell_count,
                    cell,
                    info.width,
                    info.height,
                );
                Some((binding.base.clone(), frame))
            }
        }
    }

    /// 静态绘制：整张来源图片
    fn draw_static(&mut self, position: (i32, i32), base_opacity: f32, cache: &mut dyn ImageCache) {
        self.secondary.hide();
        let Some(binding) = self.binding.as_mut() else {
            self.primary.hide();
            return;
        };

        match cache.status(&binding.base) {
            LoadStatus::Ready(info) => {
                self.primary.show(
                    binding.base.clone(),
                    CellRect::full(info.width, info.height),
                    position,
                    base_opacity,
                );
            }
            LoadStatus::Pending => {
                binding.base = cache.request(&binding.name);
                self.primary.hide();
            }
            LoadStatus::Failed => {
                if !binding.warned {
                    binding.warned = true;
                    warn!(
                        overlay = self.overlay_id,
                        name = %binding.name,
                        "来源图片加载失败，overlay 不可见"
                    );
                }
                self.primary.hide();
            }
        }
    }
}
