//! Lifecycle control and the async driver around it

pub mod controller;
pub mod driver;

pub use controller::{ControlState, GameController, GameSettings};
pub use driver::{spawn, Command, DriverError, GameHandle, GameStatus};
