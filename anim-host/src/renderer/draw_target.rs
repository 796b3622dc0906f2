//! # Draw Target 模块
//!
//! 渲染代理输出的最小绘制单元：一张图片的一块子矩形。

use anim_runtime::CellRect;

use crate::resources::ImageHandle;

/// 绘制目标
#[derive(Debug, Clone, PartialEq)]
pub struct DrawTarget {
    /// 绑定的图片
    pub image: Option<ImageHandle>,
    /// 图片上的可见子矩形
    pub frame: CellRect,
    /// 屏幕位置
    pub x: i32,
    pub y: i32,
    /// 混合不透明度（0.0 - 255.0）
    pub opacity: f32,
    pub visible: bool,
}

impl Default for DrawTarget {
    fn default() -> Self {
        Self::hidden()
    }
}

impl DrawTarget {
    /// 不可见的空目标
    pub fn hidden() -> Self {
        Self {
            image: None,
            frame: CellRect::default(),
            x: 0,
            y: 0,
            opacity: 0.0,
            visible: false,
        }
    }

    /// 绑定图片与子矩形并设为可见
    pub fn show(&mut self, image: ImageHandle, frame: CellRect, position: (i32, i32), opacity: f32) {
        self.image = Some(image);
        self.frame = frame;
        (self.x, self.y) = position;
        self.opacity = opacity;
        self.visible = true;
    }

    /// 隐藏（保留最后一次的绑定，便于调试）
    pub fn hide(&mut self) {
        self.visible = false;
    }
}

impl std::fmt::Display for DrawTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.visible {
            return write!(f, "hidden");
        }
        write!(
            f,
            "{} [{},{} {}x{}] @({},{}) opacity={:.1}",
            self.image.as_ref().map_or("-", |h| h.key()),
            self.frame.x,
            self.frame.y,
            self.frame.width,
            self.frame.height,
            self.x,
            self.y,
            self.opacity,
        )
    }
}
