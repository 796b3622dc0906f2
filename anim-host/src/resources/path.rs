//! # 路径规范化模块
//!
//! 图片名 → 逻辑路径的统一转换。
//!
//! 程序内部统一使用**相对于 assets_root 的逻辑路径**，以 `/` 分隔，
//! 由具体的 [`super::ResourceSource`] 决定如何解析到实际位置。

/// 规范化逻辑路径
///
/// - 统一使用 `/` 分隔符
/// - 丢弃空组件与 `.`
/// - `..` 回退一级，越过根目录时直接丢弃
///
/// ```
/// use anim_host::resources::path::normalize_logical_path;
///
/// assert_eq!(normalize_logical_path("img/../img/pictures/door00.png"), "img/pictures/door00.png");
/// assert_eq!(normalize_logical_path(".\\img\\pictures\\lamp.png"), "img/pictures/lamp.png");
/// ```
pub fn normalize_logical_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let mut components: Vec<&str> = Vec::new();
    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            _ => components.push(component),
        }
    }

    components.join("/")
}

/// 图片名 → 逻辑路径
///
/// 图片名本身不带扩展名（与脚本中的写法一致）；已带扩展名的不再追加。
///
/// ```
/// use anim_host::resources::path::picture_path;
///
/// assert_eq!(picture_path("img/pictures", "door00", "png"), "img/pictures/door00.png");
/// assert_eq!(picture_path("img/pictures/", "door.webp", "png"), "img/pictures/door.webp");
/// ```
pub fn picture_path(pictures_dir: &str, name: &str, extension: &str) -> String {
    let has_extension = name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty() && !ext.contains('/'));

    let file = if has_extension || extension.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, extension.trim_start_matches('.'))
    };

    normalize_logical_path(&format!("{}/{}", pictures_dir, file))
}

/// 从脚本文件路径提取脚本 ID（文件名去掉扩展名）
///
/// ```
/// use anim_host::resources::path::extract_script_id;
///
/// assert_eq!(extract_script_id("scripts/door_demo.txt"), "door_demo");
/// assert_eq!(extract_script_id("intro"), "intro");
/// ```
pub fn extract_script_id(path: &str) -> String {
    let normalized = normalize_logical_path(path);
    let filename = normalized.rsplit('/').next().unwrap_or(&normalized);

    match filename.rfind('.') {
        Some(dot) if dot > 0 => filename[..dot].to_string(),
        _ => filename.to_string(),
    }
}
