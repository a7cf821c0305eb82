//! Stomp Arena - game loop and host/joiner synchronization
//!
//! Core of a two-player physics brawler:
//! - a fixed-cadence tick that steps the world and runs the bot brain
//! - a host/joiner relay protocol where the host is the only authority
//! - a lifecycle controller that tears everything down between matches

pub mod app;
pub mod config;
pub mod game;
pub mod net;
pub mod render;
pub mod util;
