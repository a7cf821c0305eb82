//! Per-match state owned by the lifecycle controller

use serde::Serialize;

use crate::net::session::ActiveSession;

use super::agent::AgentRegistry;
use super::brain::DecisionCadence;
use super::score::Score;
use super::world::World;

/// Which kind of match the process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Torn down, nothing simulated
    #[default]
    Idle,
    /// Local player against the scripted bot, no networking
    LocalBot,
    /// Simulation authority; broadcasts snapshots
    Host,
    /// Mirrors host snapshots and sends only its own actions
    Joiner,
}

impl MatchMode {
    /// Any role with a peer on the other side of the relay
    pub fn is_networked(self) -> bool {
        matches!(self, MatchMode::Host | MatchMode::Joiner)
    }

    /// Joiner-side: actions go out every tick, AI cadence never runs
    pub fn sends_actions(self) -> bool {
        self == MatchMode::Joiner
    }

    pub fn emits_snapshots(self) -> bool {
        self == MatchMode::Host
    }
}

/// What a click on the arena does in the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickBinding {
    #[default]
    Detached,
    /// Drop debris straight into the local world
    SpawnLocal,
    /// Ask the host to spawn it; nothing is inserted locally
    EmitToHost,
}

/// Everything one match mutates
#[derive(Default)]
pub struct MatchContext {
    pub mode: MatchMode,
    pub world: World,
    pub agents: AgentRegistry,
    pub score: Score,
    pub cadence: DecisionCadence,
    /// Ticks run since the match started
    pub tick: u64,
    pub session: Option<ActiveSession>,
    pub click: ClickBinding,
}

impl MatchContext {
    pub fn new(debounce: u32) -> Self {
        Self {
            cadence: DecisionCadence::new(debounce),
            ..Self::default()
        }
    }

    /// Close the transport and empty everything; safe to call repeatedly
    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
        self.agents.clear();
        self.world.clear();
        self.click = ClickBinding::Detached;
        self.cadence.reset();
        self.tick = 0;
        self.mode = MatchMode::Idle;
    }
}
