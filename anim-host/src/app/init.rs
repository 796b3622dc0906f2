//! 宿主初始化拆分：图片缓存构建与加载时的脚本检查

use anim_runtime::{DiagnosticLevel, Script, analyze_script, extract_image_references};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::resources::{PictureCache, ResourceSource};

pub fn create_picture_cache(config: &AppConfig, source: impl ResourceSource + 'static) -> PictureCache {
    info!(
        pictures_dir = %config.pictures_dir,
        budget_mb = config.resources.image_cache_size_mb,
        loads_per_tick = config.resources.loads_per_tick,
        "图片缓存初始化"
    );
    PictureCache::new(source, &config.pictures_dir, &config.image_extension)
        .with_budget_mb(config.resources.image_cache_size_mb)
        .with_loads_per_tick(config.resources.loads_per_tick)
}

/// 脚本检查
///
/// 在 `debug.script_check = true` 时运行，检查：
/// - INIT / SHOW 的配对与目标 overlay
/// - 引用的图片文件是否存在
///
/// 只输出诊断，不阻塞执行。
pub fn run_script_check(script: &Script, cache: &PictureCache) {
    let mut errors = 0;
    let mut warnings = 0;

    for d in &analyze_script(script).diagnostics {
        match d.level {
            DiagnosticLevel::Error => {
                errors += 1;
                error!(script_id = %script.id, line = ?d.line, message = %d.message, "诊断错误");
            }
            DiagnosticLevel::Warn => {
                warnings += 1;
                warn!(script_id = %script.id, line = ?d.line, message = %d.message, "诊断警告");
            }
            DiagnosticLevel::Info => {
                info!(script_id = %script.id, line = ?d.line, message = %d.message, "诊断信息");
            }
        }
    }

    for reference in extract_image_references(script) {
        if !cache.picture_exists(&reference.name) {
            warnings += 1;
            warn!(
                script_id = %script.id,
                line = ?reference.line,
                name = %reference.name,
                "图片不存在"
            );
        }
    }

    if errors > 0 || warnings > 0 {
        warn!(script_id = %script.id, errors, warnings, "脚本检查完成");
    } else {
        info!(script_id = %script.id, "脚本检查通过");
    }
}
