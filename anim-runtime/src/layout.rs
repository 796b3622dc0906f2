//! # Layout 模块
//!
//! 单元格布局：决定第 `i` 个单元格位于哪张图片的哪一块区域。
//!
//! ## 布局方式
//!
//! ```text
//! Vertical    Horizontal         Sequential
//! ┌─────┐     ┌──┬──┬──┐         pic00  pic01  pic02
//! │  0  │     │0 │1 │2 │         (原图) (连号文件 ...)
//! ├─────┤     └──┴──┴──┘
//! │  1  │
//! └─────┘
//! ```
//!
//! 所有函数都是纯函数，非法配置一律归一化，不返回错误。

use serde::{Deserialize, Serialize};

/// 单元格布局方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// 单元格沿高度方向纵向排列在一张图里
    #[default]
    Vertical,
    /// 单元格沿宽度方向横向排列在一张图里
    Horizontal,
    /// 每个单元格一个文件，文件名末尾为连号
    Sequential,
}

impl LayoutMode {
    /// 从命令参数解析布局方式
    ///
    /// 接受 `V`/`H`/`N` 以及 `縦`/`横`/`連番`，大小写不敏感。
    /// 空字符串或无法识别时回退为 [`LayoutMode::Vertical`]。
    pub fn from_arg(arg: &str) -> Self {
        match arg.trim().to_uppercase().as_str() {
            "H" | "横" => Self::Horizontal,
            "N" | "連番" => Self::Sequential,
            _ => Self::Vertical,
        }
    }

    /// 是否为单图切片布局
    pub fn is_banded(self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

/// 源图片上的矩形区域（像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    /// 覆盖整张图片的区域
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// 单元格数量归一化：小于 1 时视为 1
pub fn normalize_cell_count(cell_count: u32) -> u32 {
    cell_count.max(1)
}

/// 计算单元格在源图片中的区域
///
/// - `Vertical`：第 `index` 条高为 `height / cell_count` 的横带
/// - `Horizontal`：第 `index` 条宽为 `width / cell_count` 的竖带
/// - `Sequential`：每个单元格是独立图片，始终返回整图
///
/// `index` 超出范围时钳制到最后一个单元格。
pub fn band_rect(mode: LayoutMode, cell_count: u32, index: u32, width: u32, height: u32) -> CellRect {
    let cell_count = normalize_cell_count(cell_count);
    let index = index.min(cell_count - 1);

    match mode {
        LayoutMode::Vertical => {
            let band = height / cell_count;
            CellRect {
                x: 0,
                y: index * band,
                width,
                height: band,
            }
        }
        LayoutMode::Horizontal => {
            let band = width / cell_count;
            CellRect {
                x: index * band,
                y: 0,
                width: band,
                height,
            }
        }
        LayoutMode::Sequential => CellRect::full(width, height),
    }
}

/// 连号文件名后缀的位数（`cell_count - 1` 的十进制位数）
pub fn suffix_width(cell_count: u32) -> usize {
    let last = normalize_cell_count(cell_count) - 1;
    last.to_string().len()
}

/// 连号布局下第 `index` 个单元格的文件名
///
/// 第 0 个就是原图；其余把原图名末尾的 `suffix_width` 个字符替换为
/// 补零后的序号。例如 `cell_count = 4` 时 `pic00` → `pic01`、`pic02`、`pic03`。
pub fn sequential_name(base: &str, cell_count: u32, index: u32) -> String {
    if index == 0 {
        return base.to_string();
    }

    let width = suffix_width(cell_count);
    let keep = base.chars().count().saturating_sub(width);
    let stem: String = base.chars().take(keep).collect();
    format!("{stem}{index:0width$}")
}

/// 连号布局下全部单元格的文件名
pub fn sequential_names(base: &str, cell_count: u32) -> Vec<String> {
    (0..normalize_cell_count(cell_count))
        .map(|i| sequential_name(base, cell_count, i))
        .collect()
}
