//! Redraw boundary. Drawing itself lives outside this crate.

use tracing::debug;

use crate::game::score::Score;
use crate::game::world::World;

/// Called once per tick after any network send
pub trait Renderer: Send {
    fn draw(&mut self, world: &World, score: &Score);
}

/// Logs a summary every `log_every` frames instead of drawing
#[derive(Debug)]
pub struct HeadlessRenderer {
    frames: u64,
    log_every: u64,
}

impl HeadlessRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            log_every: log_every.max(1),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Renderer for HeadlessRenderer {
    fn draw(&mut self, world: &World, score: &Score) {
        self.frames += 1;
        if self.frames % self.log_every == 0 {
            debug!(
                frame = self.frames,
                bodies = world.len(),
                score = ?score,
                "Frame"
            );
        }
    }
}
