//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;

use crate::app::GameSettings;
use crate::game::brain::DEFAULT_BRAIN_DEBOUNCE_CYCLES;
use crate::util::rate_limit::DEBRIS_RATE_LIMIT;
use crate::util::time::{ClockBackend, FrameClock};

/// What the binary should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Local player against the bot
    Local,
    /// Host and joiner in one process over the loopback relay
    Duel,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "bot" => Ok(Self::Local),
            "duel" => Ok(Self::Duel),
            other => Err(other.to_string()),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Which match to start
    pub mode: GameMode,
    /// Requested scheduling backend
    pub clock_backend: ClockBackend,
    /// Refresh rate for the display-synced backend, if known
    pub display_refresh_hz: Option<u32>,
    /// Ticks between bot recompute passes
    pub brain_debounce_cycles: u32,
    /// Joiner debris the host accepts per second
    pub debris_rate_limit: u32,
    /// Fixed RNG seed (random when unset)
    pub rng_seed: Option<u64>,
    /// Stop after this many seconds (runs until Ctrl+C when unset)
    pub run_seconds: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            mode: parse_or(&lookup, "GAME_MODE", GameMode::Local)?,
            clock_backend: parse_or(&lookup, "FRAME_CLOCK", ClockBackend::Vsync)?,
            display_refresh_hz: parse_opt(&lookup, "DISPLAY_REFRESH_HZ")?,
            brain_debounce_cycles: parse_or(
                &lookup,
                "BRAIN_DEBOUNCE_CYCLES",
                DEFAULT_BRAIN_DEBOUNCE_CYCLES,
            )?,
            debris_rate_limit: parse_or(&lookup, "DEBRIS_RATE_LIMIT", DEBRIS_RATE_LIMIT)?,
            rng_seed: parse_opt(&lookup, "RNG_SEED")?,
            run_seconds: parse_opt(&lookup, "RUN_SECONDS")?,
        })
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::select(self.clock_backend, self.display_refresh_hz)
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            brain_debounce_cycles: self.brain_debounce_cycles,
            debris_rate_limit: self.debris_rate_limit,
            rng_seed: self.rng_seed,
        }
    }
}

fn parse_opt<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}
