//! Time utilities for the game loop

use std::str::FromStr;
use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

/// Simulation rate the physics step is tuned for
pub const SIMULATION_TPS: u32 = 50;

/// Period of the timer backend when no display-synced primitive exists
pub const TIMER_FALLBACK_MILLIS: u64 = 20;

/// Delta time for one physics step (in seconds)
pub fn tick_delta() -> f32 {
    1.0 / SIMULATION_TPS as f32
}

/// Which scheduling backend the operator asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockBackend {
    /// Follow the display refresh rate
    Vsync,
    /// Fixed timer, ~20ms
    Timer,
}

impl FromStr for ClockBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vsync" | "display" => Ok(Self::Vsync),
            "timer" => Ok(Self::Timer),
            other => Err(other.to_string()),
        }
    }
}

/// Best-effort fixed-cadence frame source.
///
/// The backend is chosen once at startup. Asking for the display-synced
/// backend without a known refresh rate degrades to the timer, so the loop
/// keeps running in a headless process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameClock {
    DisplaySync { refresh_hz: u32 },
    Timer { period: Duration },
}

impl FrameClock {
    pub fn select(backend: ClockBackend, refresh_hz: Option<u32>) -> Self {
        match (backend, refresh_hz) {
            (ClockBackend::Vsync, Some(hz)) if hz > 0 => Self::DisplaySync { refresh_hz: hz },
            _ => Self::timer(),
        }
    }

    pub fn timer() -> Self {
        Self::Timer {
            period: Duration::from_millis(TIMER_FALLBACK_MILLIS),
        }
    }

    /// Time between two frames
    pub fn period(&self) -> Duration {
        match self {
            Self::DisplaySync { refresh_hz } => {
                Duration::from_micros((1_000_000 / u64::from((*refresh_hz).max(1))).max(1))
            }
            Self::Timer { period } => *period,
        }
    }

    /// Build a ticker for this backend (must be called inside a tokio runtime)
    pub fn ticker(&self) -> FrameTicker {
        let mut inner = interval(self.period());
        inner.set_missed_tick_behavior(MissedTickBehavior::Skip);
        inner.reset();
        FrameTicker { inner }
    }
}

/// Pending-frame source driven by [`FrameClock`]
pub struct FrameTicker {
    inner: Interval,
}

impl FrameTicker {
    /// Wait for the next scheduled frame
    pub async fn next_frame(&mut self) {
        self.inner.tick().await;
    }

    /// Push the next frame a full period into the future
    pub fn reschedule(&mut self) {
        self.inner.reset();
    }
}
