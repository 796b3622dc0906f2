//! # 命令执行集成测试
//!
//! 测试 脚本 → Sequencer → CommandExecutor → Screen → Renderer 的执行链路。
//! 图片来自内存来源，不依赖真实文件或渲染设备。

use anim_host::{AppConfig, ExecuteResult, Host, MemorySource, OverlayFrame};
use anim_runtime::{AnimationCommand, CellRect, Command, PlayMode};
use tempfile::TempDir;

fn png(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 160, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

fn picture(name: &str) -> String {
    format!("img/pictures/{name}.png")
}

fn test_config(saves_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.saves_dir = saves_dir.to_path_buf();
    config.debug.script_check = true;
    config
}

/// 四格连号门动画 + 一张纵向三格灯 + 一张静态图
fn test_source() -> MemorySource {
    let mut source = MemorySource::new();
    for name in ["door00", "door01", "door02", "door03"] {
        source.insert(&picture(name), png(8, 6));
    }
    source.insert(&picture("strip"), png(4, 12));
    source.insert(&picture("plain"), png(5, 5));
    // lamp01 缺失
    source.insert(&picture("lamp00"), png(2, 2));
    source.insert(&picture("lamp02"), png(2, 2));
    source
}

fn host_with(script: &str, saves_dir: &std::path::Path) -> Host {
    let mut host = Host::with_source(test_config(saves_dir), test_source());
    let skipped = host.load_script_text("test", script);
    assert_eq!(skipped, 0);
    host
}

fn frame_of(host: &Host, id: u32) -> OverlayFrame {
    host.frame()
        .into_iter()
        .find(|f| f.id == id)
        .expect("overlay 没有绘制输出")
}

fn image_key(target: &anim_host::DrawTarget) -> Option<&str> {
    target.image.as_ref().map(|h| h.key())
}

/// 开门动画：第 10 个 tick 切到第二格并开始 20 tick 的交叉淡化
#[test]
fn test_sequential_door_animation() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 4 10 N 20\nSHOW 1 door00\nPA_START 1 1", dir.path());

    // 第一个 tick 只登记加载请求，两个目标都隐藏
    host.tick();
    let frame = frame_of(&host, 1);
    assert!(!frame.primary.visible);
    assert!(!frame.secondary.visible);

    host.run(9);
    let state = host.screen.animation(1).unwrap();
    assert_eq!(state.current_cell(), 1);
    assert_eq!(state.previous_cell(), 0);
    assert_eq!(state.fade_remaining(), 20);

    let frame = frame_of(&host, 1);
    assert!(frame.primary.visible);
    assert_eq!(image_key(&frame.primary), Some("img/pictures/door01.png"));
    assert_eq!(frame.primary.frame, CellRect::full(8, 6));
    assert_eq!(frame.primary.opacity, 255.0);
    assert!(frame.secondary.visible);
    assert_eq!(image_key(&frame.secondary), Some("img/pictures/door00.png"));
    assert_eq!(frame.secondary.opacity, 255.0);

    // 停在第二格，之后淡化不再被计时推进重新触发
    let stop = Command::from(AnimationCommand::Stop {
        target: 1,
        force: true,
    });
    assert_eq!(host.execute(&stop), ExecuteResult::Ok);

    host.tick();
    let state = host.screen.animation(1).unwrap();
    assert_eq!(state.fade_remaining(), 19);
    let frame = frame_of(&host, 1);
    assert!((frame.secondary.opacity - 255.0 * 19.0 / 20.0).abs() < 1e-3);

    for expected in (0..19).rev() {
        host.tick();
        assert_eq!(host.screen.animation(1).unwrap().fade_remaining(), expected);
    }

    // 淡化结束后副目标隐藏，主目标停在第二格
    let frame = frame_of(&host, 1);
    assert!(!frame.secondary.visible);
    assert!(frame.primary.visible);
    assert_eq!(image_key(&frame.primary), Some("img/pictures/door01.png"));
    assert_eq!(host.screen.animation(1).unwrap().current_cell(), 1);
    assert!(host.renderer.proxy(1).unwrap().is_ready());
}

/// 单次播放：回到起点后停止
#[test]
fn test_forward_play_once_stops_at_start() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 4 1 N\nSHOW 1 door00\nPA_START 1 1", dir.path());

    let mut cells = Vec::new();
    for _ in 0..6 {
        host.tick();
        cells.push(host.screen.animation(1).unwrap().current_cell());
    }
    assert_eq!(cells, vec![1, 2, 3, 0, 0, 0]);
    assert!(!host.screen.animation(1).unwrap().is_animating());
}

/// 纵向布局：带状子矩形
#[test]
fn test_vertical_bands_follow_cells() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 3 2 V\nSHOW 2 strip 10 20\nPA_START_LOOP 2 2", dir.path());

    host.run(2);
    let frame = frame_of(&host, 2);
    assert_eq!(image_key(&frame.primary), Some("img/pictures/strip.png"));
    assert_eq!(frame.primary.frame, CellRect { x: 0, y: 4, width: 4, height: 4 });
    assert_eq!((frame.primary.x, frame.primary.y), (10, 20));

    // 往返：0,1,2,1,0 ...
    host.run(2);
    assert_eq!(frame_of(&host, 2).primary.frame.y, 8);
    host.run(2);
    assert_eq!(frame_of(&host, 2).primary.frame.y, 4);
    assert!(host.screen.animation(2).unwrap().is_animating());
}

/// 带等待的 SET_CELL 暂停脚本直到淡化结束
#[test]
fn test_set_cell_wait_pauses_script() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with(
        "PA_INIT 3 10 V 5\nSHOW 2 strip\nPA_SET_CELL 2 3 WAIT\nSHOW 3 plain",
        dir.path(),
    );

    host.run(6);
    assert_eq!(host.screen.animation(2).unwrap().current_cell(), 2);
    assert!(host.screen.overlay(3).is_none());
    assert!(!host.is_script_finished());

    host.tick();
    assert!(host.screen.overlay(3).is_some());
    assert!(host.is_script_finished());
}

/// 自定义序列：PROG_CELL 按序列前进
#[test]
fn test_custom_sequence_with_manual_steps() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 4 10 N\nSHOW 1 door00", dir.path());
    host.tick();

    let start = Command::from(AnimationCommand::Start {
        target: 1,
        mode: PlayMode::Custom,
        looping: true,
        sequence: vec![1, 3, 4],
    });
    assert_eq!(host.execute(&start), ExecuteResult::Ok);

    let prog = Command::from(AnimationCommand::ProgCell {
        target: 1,
        wait: false,
    });
    let mut cells = Vec::new();
    for _ in 0..4 {
        host.execute(&prog);
        cells.push(host.screen.animation(1).unwrap().current_cell());
    }
    assert_eq!(cells, vec![2, 3, 0, 2]);
}

/// 目标不存在或未设置动画的命令不生效
#[test]
fn test_commands_on_missing_or_static_target_are_ignored() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("SHOW 4 plain", dir.path());
    host.tick();

    let missing = Command::from(AnimationCommand::Start {
        target: 9,
        mode: PlayMode::Forward,
        looping: false,
        sequence: vec![1],
    });
    assert_eq!(host.execute(&missing), ExecuteResult::Ok);
    assert!(host.screen.overlay(9).is_none());

    let set_cell = Command::from(AnimationCommand::SetCell {
        target: 4,
        cell: 2,
        wait: true,
    });
    assert_eq!(host.execute(&set_cell), ExecuteResult::Ok);
    assert!(host.screen.animation(4).is_none());

    host.tick();
    let frame = frame_of(&host, 4);
    assert!(frame.primary.visible);
    assert_eq!(frame.primary.frame, CellRect::full(5, 5));
}

/// 连号图片缺失时退化为静态图片
#[test]
fn test_missing_cell_image_degrades_to_static() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 3 1 N\nSHOW 1 lamp00\nPA_START_LOOP 1 1", dir.path());

    host.run(3);
    let proxy = host.renderer.proxy(1).unwrap();
    assert!(proxy.is_degraded());
    assert!(proxy.primary().visible);
    assert_eq!(image_key(proxy.primary()), Some("img/pictures/lamp00.png"));
    assert!(!proxy.secondary().visible);

    // 动画状态仍照常推进
    assert!(host.screen.animation(1).unwrap().is_animating());
}

/// ERASE 之后渲染代理一并移除
#[test]
fn test_erase_drops_render_proxy() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("SHOW 1 plain\nWAIT 2\nERASE 1", dir.path());

    host.run(2);
    assert!(host.renderer.proxy(1).is_some());
    host.run(2);
    assert!(host.renderer.proxy(1).is_none());
    assert!(host.frame().is_empty());
}

/// 存档往返：overlay 与动画状态一并恢复
#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with(
        "PA_INIT 4 10 N 20\nSHOW 1 door00 30 40 200\nPA_START_LOOP 1 1",
        dir.path(),
    );
    host.run(15);
    host.save(2).unwrap();

    let info = host.save_manager.get_save_info(2).unwrap();
    assert_eq!(info.tick, 15);
    assert_eq!(info.overlay_count, 1);

    let mut restored = Host::with_source(test_config(dir.path()), test_source());
    restored.load(2).unwrap();
    assert_eq!(restored.tick_count(), 15);

    let overlay = restored.screen.overlay(1).unwrap();
    assert_eq!(overlay.name, "door00");
    assert_eq!((overlay.x, overlay.y, overlay.opacity), (30, 40, 200));

    let before = host.screen.animation(1).unwrap();
    let after = restored.screen.animation(1).unwrap();
    assert_eq!(after.current_cell(), before.current_cell());
    assert_eq!(after.fade_remaining(), before.fade_remaining());
    assert!(after.is_animating());

    // 两边继续推进，结果一致
    host.run(30);
    restored.run(30);
    assert_eq!(
        restored.screen.animation(1).unwrap().current_cell(),
        host.screen.animation(1).unwrap().current_cell()
    );
    assert_eq!(frame_of(&restored, 1), frame_of(&host, 1));
}

/// 读档会清空图片缓存，之前失败的图片重新尝试加载
#[test]
fn test_load_resets_picture_cache() {
    let dir = TempDir::new().unwrap();
    let mut host = host_with("PA_INIT 3 1 N\nSHOW 1 lamp00\nPA_START_LOOP 1 1", dir.path());
    host.run(3);
    assert_eq!(host.cache.stats().failed, 1);
    assert_eq!(host.cache.len(), 2);
    host.save(1).unwrap();

    host.load(1).unwrap();
    assert!(host.cache.is_empty());
    assert_eq!(host.cache.stats().failed, 0);
    assert!(host.renderer.proxy(1).is_none());

    // 重新请求后同样退化为静态图片
    host.run(2);
    assert_eq!(host.cache.stats().failed, 1);
    assert!(host.renderer.proxy(1).unwrap().is_degraded());
    assert!(frame_of(&host, 1).primary.visible);
}
