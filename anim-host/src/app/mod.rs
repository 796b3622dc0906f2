//! # App 模块
//!
//! 无窗口宿主：把脚本、屏幕、执行器、渲染器与图片缓存组合在一起，按 tick 驱动。
//!
//! ## 每个 tick 的顺序
//!
//! 1. `Sequencer` 执行脚本命令（直到遇到等待）
//! 2. `Screen::update()` 推进所有动画状态
//! 3. 图片缓存处理待加载队列
//! 4. 渲染遍：更新每个 overlay 的绘制目标

mod init;
mod save;
mod update;

pub use init::{create_picture_cache, run_script_check};

use std::path::Path;

use anim_runtime::{Command, Parser, Script, Sequencer};
use tracing::{info, warn};

use crate::command_executor::{CommandExecutor, ExecuteResult};
use crate::config::AppConfig;
use crate::renderer::{OverlayFrame, Renderer};
use crate::resources::path::extract_script_id;
use crate::resources::{FsSource, PictureCache, ResourceError, ResourceSource};
use crate::save_manager::SaveManager;
use crate::screen::Screen;

/// 宿主
#[derive(Debug)]
pub struct Host {
    pub config: AppConfig,
    pub screen: Screen,
    pub command_executor: CommandExecutor,
    pub renderer: Renderer,
    pub cache: PictureCache,
    pub save_manager: SaveManager,
    sequencer: Option<Sequencer>,
    tick_count: u64,
}

impl Host {
    /// 以文件系统资源创建宿主
    pub fn new(config: AppConfig) -> Self {
        let source = FsSource::new(&config.assets_root);
        Self::with_source(config, source)
    }

    /// 以指定资源来源创建宿主
    pub fn with_source(config: AppConfig, source: impl ResourceSource + 'static) -> Self {
        let cache = create_picture_cache(&config, source);
        let renderer = Renderer::new().with_trace_frames(config.debug.trace_frames);
        let save_manager = SaveManager::new(&config.saves_dir);

        Self {
            config,
            screen: Screen::new(),
            command_executor: CommandExecutor::new(),
            renderer,
            cache,
            save_manager,
            sequencer: None,
            tick_count: 0,
        }
    }

    /// 加载已解析的脚本，从头开始执行
    pub fn load_script(&mut self, script: Script) {
        info!(script_id = %script.id, commands = script.len(), "脚本加载完成");
        if self.config.debug.script_check {
            run_script_check(&script, &self.cache);
        }
        self.sequencer = Some(Sequencer::new(script));
    }

    /// 解析并加载脚本文本
    ///
    /// 无法识别的行记录警告后跳过，返回被跳过的行数。
    pub fn load_script_text(&mut self, script_id: &str, text: &str) -> usize {
        let mut parser = Parser::new();
        let script = parser.parse(script_id, text);

        for warning in parser.warnings() {
            let raw = text.lines().nth(warning.line().saturating_sub(1)).unwrap_or("");
            warn!(
                script_id,
                line = warning.line(),
                raw = raw.trim(),
                error = %warning,
                "命令无法识别，已跳过"
            );
        }

        let skipped = parser.warnings().len();
        self.load_script(script);
        skipped
    }

    /// 从文件加载脚本（脚本 ID 取文件名）
    pub fn load_script_file(&mut self, path: impl AsRef<Path>) -> Result<usize, ResourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ResourceError::LoadFailed {
            path: path.to_string_lossy().to_string(),
            kind: "script".to_string(),
            message: e.to_string(),
        })?;
        let script_id = extract_script_id(&path.to_string_lossy());
        Ok(self.load_script_text(&script_id, &text))
    }

    /// 直接执行一条命令（绕过脚本）
    pub fn execute(&mut self, command: &Command) -> ExecuteResult {
        self.command_executor.execute(command, &mut self.screen)
    }

    /// 当前帧的绘制输出
    pub fn frame(&self) -> Vec<OverlayFrame> {
        self.renderer.frame()
    }

    /// 已经过的 tick 数
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// 已经过的时间（秒）
    pub fn elapsed_secs(&self) -> f64 {
        self.tick_count as f64 / f64::from(self.config.ticks_per_second.max(1))
    }

    /// 脚本是否执行完毕（没有脚本视为完毕）
    pub fn is_script_finished(&self) -> bool {
        self.sequencer.as_ref().is_none_or(|s| s.is_finished())
    }

    pub fn sequencer(&self) -> Option<&Sequencer> {
        self.sequencer.as_ref()
    }
}
