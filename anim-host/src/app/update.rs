//! 每 tick 的更新流程

use tracing::{debug, info};

use super::Host;

impl Host {
    /// 推进一个 tick
    pub fn tick(&mut self) {
        if let Some(sequencer) = self.sequencer.as_mut() {
            let was_finished = sequencer.is_finished();
            let executor = &mut self.command_executor;
            let screen = &mut self.screen;
            let executed = sequencer.tick(|cmd| executor.execute(cmd, screen).wait_ticks());

            if executed > 0 {
                debug!(tick = self.tick_count, executed, "执行脚本命令");
            }
            if !was_finished && sequencer.is_finished() {
                info!(script_id = %sequencer.script().id, tick = self.tick_count, "脚本执行完毕");
            }
        }

        self.screen.update();
        self.cache.pump();
        self.renderer.render(&self.screen, &mut self.cache);

        self.tick_count += 1;
    }

    /// 连续推进若干 tick
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// 推进直到脚本执行完毕，最多 `max_ticks` 个 tick，返回实际推进的 tick 数
    pub fn run_until_finished(&mut self, max_ticks: u64) -> u64 {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_script_finished() {
            self.tick();
            ticks += 1;
        }
        ticks
    }
}
