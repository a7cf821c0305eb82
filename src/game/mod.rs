//! Game simulation modules

pub mod agent;
pub mod body;
pub mod brain;
pub mod context;
pub mod physics;
pub mod scheduler;
pub mod score;
pub mod world;

pub use agent::{Agent, AgentRegistry, AgentRole};
pub use body::{Actions, Body, BodyId, BodyKind, Team, Vec2, WalkingDirection};
pub use context::{ClickBinding, MatchContext, MatchMode};
pub use scheduler::{cycle_of_life, LoopState, TickReport};
pub use score::Score;
pub use world::{StepCallbacks, World, WorldEvent};
