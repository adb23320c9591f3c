use std::thread;
use std::time::{Duration, Instant};

/// Frame pacing. Effects compute a frame, show it and then wait on the clock.
pub trait Clock {
    fn wait(&mut self, interval: Duration);
}

/// Sleeps so that consecutive waits end `interval` after the previous tick,
/// regardless of how long rendering and output took in between.
pub struct IntervalTimer {
    last_tick: Instant,
    measure_fps: bool,
    last_fps_print: Instant,
    frames: u32,
}

impl IntervalTimer {
    pub fn new(measure_fps: bool) -> IntervalTimer {
        IntervalTimer {
            last_tick: Instant::now(),
            measure_fps,
            last_fps_print: Instant::now(),
            frames: 0,
        }
    }

    fn update_fps(&mut self) {
        self.frames += 1;

        if Instant::now() - self.last_fps_print > Duration::from_secs(1) {
            log::debug!("FPS: {}", self.frames);
            self.frames = 0;
            self.last_fps_print = Instant::now();
        }
    }
}

impl Clock for IntervalTimer {
    fn wait(&mut self, interval: Duration) {
        if self.measure_fps {
            self.update_fps();
        }

        let now = Instant::now();
        let next_tick = if self.last_tick + interval > now {
            self.last_tick + interval
        } else {
            // Long pauses between effects are not worth a warning
            if now - self.last_tick < interval * 4 {
                log::warn!("Skipped a frame");
            }
            now + interval
        };

        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        self.last_tick = next_tick;
    }
}
