use std::time::Duration;

use instant::Instant;
use log::debug;

use crate::config::LoopConfig;

/// Timing of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Zero-based index of this tick.
    pub frame: u64,
    /// Time since the previous tick, clamped to the loop's bounds.
    pub delta: Duration,
    /// Unclamped time since the first tick.
    pub elapsed: Duration,
}

impl FrameTime {
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// What the callback wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopControl {
    #[default]
    Continue,
    Stop,
}

/// Calls a frame callback once per tick until it asks to stop.
///
/// The loop itself does not know about a clock source: [`RenderLoop::tick`]
/// samples `Instant::now()`, [`RenderLoop::tick_at`] takes the timestamp
/// from the caller. `run` (native) and `start` (wasm32) drive ticks on
/// their own.
pub struct RenderLoop<F> {
    callback: F,
    config: LoopConfig,
    first: Option<Instant>,
    last: Option<Instant>,
    frames: u64,
    running: bool,
}

impl<F> RenderLoop<F>
where
    F: FnMut(&FrameTime) -> LoopControl,
{
    pub fn new(callback: F) -> Self {
        Self::with_config(LoopConfig::default(), callback)
    }

    pub fn with_config(config: LoopConfig, callback: F) -> Self {
        Self {
            callback,
            config,
            first: None,
            last: None,
            frames: 0,
            running: true,
        }
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Prevents further ticks from reaching the callback.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self) -> LoopControl {
        self.tick_at(Instant::now())
    }

    /// Runs the callback for a tick happening at `now`. The first tick has a
    /// zero raw delta, which the clamp raises to `min_delta`.
    pub fn tick_at(&mut self, now: Instant) -> LoopControl {
        if !self.running {
            return LoopControl::Stop;
        }
        let first = *self.first.get_or_insert(now);
        let raw = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);

        let time = FrameTime {
            frame: self.frames,
            delta: self.config.clamp_delta(raw),
            elapsed: now.saturating_duration_since(first),
        };
        let control = (self.callback)(&time);
        self.frames += 1;
        if control == LoopControl::Stop {
            debug!("render loop stopped after {} frames", self.frames);
            self.running = false;
        }
        control
    }

    /// Ticks on the current thread, sleeping out the rest of each frame
    /// interval, until the callback returns [`LoopControl::Stop`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(&mut self) {
        while self.running {
            let started = Instant::now();
            if self.tick_at(started) == LoopControl::Stop {
                break;
            }
            let spent = started.elapsed();
            if let Some(rest) = self.config.frame_interval.checked_sub(spent) {
                std::thread::sleep(rest);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use log::error;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use super::{FrameTime, LoopControl, RenderLoop};
    use crate::error::{Error, Result};

    /// Stops a loop started with [`RenderLoop::start`].
    #[derive(Debug, Clone)]
    pub struct LoopHandle {
        running: Rc<Cell<bool>>,
    }

    impl LoopHandle {
        /// Ends scheduling; the callback will not run again.
        pub fn stop(&self) {
            self.running.set(false);
        }

        pub fn is_running(&self) -> bool {
            self.running.get()
        }
    }

    impl<F> RenderLoop<F>
    where
        F: FnMut(&FrameTime) -> LoopControl + 'static,
    {
        /// Drives ticks from `requestAnimationFrame`.
        ///
        /// The frame closure re-registers itself each frame, so it holds the
        /// only reference to its own slot. Once stopped it is never invoked
        /// again but stays allocated.
        pub fn start(self) -> Result<LoopHandle> {
            let window = web_sys::window()
                .ok_or_else(|| Error::ContextUnavailable("window not available".to_string()))?;
            let running = Rc::new(Cell::new(true));
            let handle = LoopHandle {
                running: Rc::clone(&running),
            };

            let state = RefCell::new(self);
            let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
            let next = Rc::clone(&slot);
            let frame_window = window.clone();

            *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                if !running.get() {
                    return;
                }
                if state.borrow_mut().tick() == LoopControl::Stop {
                    running.set(false);
                    return;
                }
                if let Some(closure) = next.borrow().as_ref() {
                    if let Err(err) =
                        frame_window.request_animation_frame(closure.as_ref().unchecked_ref())
                    {
                        error!("requestAnimationFrame failed: {err:?}");
                        running.set(false);
                    }
                }
            }) as Box<dyn FnMut()>));

            let first = slot.borrow();
            if let Some(closure) = first.as_ref() {
                window
                    .request_animation_frame(closure.as_ref().unchecked_ref())
                    .map_err(|err| {
                        Error::ContextUnavailable(format!("requestAnimationFrame failed: {err:?}"))
                    })?;
            }
            Ok(handle)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LoopHandle;

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn counts_frames_and_measures_time() {
        let mut seen = Vec::new();
        let base = Instant::now();
        let mut render_loop = RenderLoop::new(|time: &FrameTime| {
            seen.push(*time);
            LoopControl::Continue
        });
        render_loop.tick_at(at(base, 0));
        render_loop.tick_at(at(base, 16));
        render_loop.tick_at(at(base, 40));
        assert_eq!(render_loop.frame_count(), 3);
        drop(render_loop);

        assert_eq!(seen[0].frame, 0);
        assert_eq!(seen[0].delta, Duration::ZERO);
        assert_eq!(seen[1].delta, Duration::from_millis(16));
        assert_eq!(seen[2].delta, Duration::from_millis(24));
        assert_eq!(seen[2].elapsed, Duration::from_millis(40));
    }

    #[test]
    fn clamps_deltas() {
        let config = LoopConfig {
            min_delta: Duration::from_millis(5),
            max_delta: Duration::from_millis(100),
            ..LoopConfig::default()
        };
        let mut deltas = Vec::new();
        let base = Instant::now();
        let mut render_loop = RenderLoop::with_config(config, |time: &FrameTime| {
            deltas.push(time.delta);
            LoopControl::Continue
        });
        render_loop.tick_at(at(base, 0));
        render_loop.tick_at(at(base, 1));
        render_loop.tick_at(at(base, 2_000));
        drop(render_loop);
        assert_eq!(
            deltas,
            vec![
                Duration::from_millis(5),
                Duration::from_millis(5),
                Duration::from_millis(100)
            ]
        );
    }

    #[test]
    fn inverted_bounds_still_tick() {
        let config = LoopConfig {
            min_delta: Duration::from_millis(50),
            max_delta: Duration::from_millis(10),
            ..LoopConfig::default()
        };
        let mut deltas = Vec::new();
        let base = Instant::now();
        let mut render_loop = RenderLoop::with_config(config, |time: &FrameTime| {
            deltas.push(time.delta);
            LoopControl::Continue
        });
        render_loop.tick_at(at(base, 0));
        render_loop.tick_at(at(base, 30));
        drop(render_loop);
        assert_eq!(deltas, vec![Duration::from_millis(10); 2]);
    }

    #[test]
    fn stop_from_callback_ends_the_loop() {
        let mut render_loop = RenderLoop::new(|time: &FrameTime| {
            if time.frame == 1 {
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        });
        assert_eq!(render_loop.tick(), LoopControl::Continue);
        assert_eq!(render_loop.tick(), LoopControl::Stop);
        assert!(!render_loop.is_running());
        assert_eq!(render_loop.tick(), LoopControl::Stop);
        assert_eq!(render_loop.frame_count(), 2);
    }

    #[test]
    fn external_stop_skips_the_callback() {
        let mut calls = 0;
        let mut render_loop = RenderLoop::new(|_: &FrameTime| {
            calls += 1;
            LoopControl::Continue
        });
        render_loop.tick();
        render_loop.stop();
        render_loop.tick();
        assert_eq!(render_loop.frame_count(), 1);
        drop(render_loop);
        assert_eq!(calls, 1);
    }

    #[test]
    fn run_blocks_until_stop() {
        let config = LoopConfig {
            frame_interval: Duration::from_millis(1),
            ..LoopConfig::default()
        };
        let mut render_loop = RenderLoop::with_config(config, |time: &FrameTime| {
            if time.frame < 4 {
                LoopControl::Continue
            } else {
                LoopControl::Stop
            }
        });
        render_loop.run();
        assert_eq!(render_loop.frame_count(), 5);
        assert!(!render_loop.is_running());
    }
}
