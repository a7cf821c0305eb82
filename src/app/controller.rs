//! Lifecycle controller: starts, pauses, and tears down matches

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::game::agent::Agent;
use crate::game::body::{Actions, Body, BodyId, Team, Vec2};
use crate::game::brain::DEFAULT_BRAIN_DEBOUNCE_CYCLES;
use crate::game::context::{ClickBinding, MatchContext, MatchMode};
use crate::game::scheduler::{cycle_of_life, LoopState, TickReport};
use crate::game::score::Score;
use crate::game::world::World;
use crate::net::address::SessionId;
use crate::net::session::{self, ActiveSession};
use crate::net::transport::{Connector, TransportError};
use crate::render::Renderer;
use crate::util::rate_limit::DEBRIS_RATE_LIMIT;

/// Knobs fixed for the lifetime of a controller
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub brain_debounce_cycles: u32,
    pub debris_rate_limit: u32,
    pub rng_seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            brain_debounce_cycles: DEFAULT_BRAIN_DEBOUNCE_CYCLES,
            debris_rate_limit: DEBRIS_RATE_LIMIT,
            rng_seed: None,
        }
    }
}

/// Play/pause affordance as the UI should show it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub playing: bool,
    /// False while networked: pausing one peer would desync the other
    pub pause_enabled: bool,
    pub label: &'static str,
}

/// Owns the match context and gates the loop
pub struct GameController {
    ctx: MatchContext,
    loop_state: LoopState,
    connector: Arc<dyn Connector>,
    renderer: Box<dyn Renderer>,
    rng: ChaCha8Rng,
    settings: GameSettings,
}

impl GameController {
    pub fn new(
        settings: GameSettings,
        connector: Arc<dyn Connector>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            ctx: MatchContext::new(settings.brain_debounce_cycles),
            loop_state: LoopState::Stopped,
            connector,
            renderer,
            rng,
            settings,
        }
    }

    /// Local player (blue) against the sinusoidal bot (gold)
    pub fn start_local_bot_match(&mut self) {
        self.terminate();
        self.ctx.mode = MatchMode::LocalBot;
        self.ctx.click = ClickBinding::SpawnLocal;

        let phase = self.rng.gen_range(0.0..std::f32::consts::TAU);
        self.ctx.agents.push(Agent::local(Team::Blue.body_id()));
        self.ctx
            .agents
            .push(Agent::bot(Team::Gold.body_id(), Team::Blue.body_id(), phase));

        // The first tick runs on the empty world; the match is spawned after it
        self.resume();
        self.spawn_match();
        self.ctx.score.reset();
        info!("Started local match against bot");
    }

    /// Become the simulation authority for a fresh session
    pub fn start_as_host(&mut self) -> Result<SessionId, TransportError> {
        self.terminate();

        let id = SessionId::generate(&mut self.rng);
        let session = ActiveSession::open(
            self.connector.as_ref(),
            id,
            self.settings.debris_rate_limit,
        )?;

        self.ctx.mode = MatchMode::Host;
        self.ctx.session = Some(session);
        self.ctx.click = ClickBinding::SpawnLocal;
        self.ctx.agents.push(Agent::local(Team::Blue.body_id()));
        self.ctx.agents.push(Agent::remote(Team::Gold.body_id()));

        self.resume();
        self.spawn_match();
        self.ctx.score.reset();

        info!(
            session_id = %id,
            location = %id.location_path(),
            "Started game at: {}", id
        );
        Ok(id)
    }

    /// Mirror the host of `id`, contributing only gold's actions
    pub fn start_as_joiner(&mut self, id: SessionId) -> Result<(), TransportError> {
        self.terminate();

        let session = ActiveSession::open(
            self.connector.as_ref(),
            id,
            self.settings.debris_rate_limit,
        )?;

        self.ctx.mode = MatchMode::Joiner;
        self.ctx.session = Some(session);
        self.ctx.click = ClickBinding::EmitToHost;
        self.ctx.agents.push(Agent::local(Team::Gold.body_id()));
        self.ctx.agents.push(Agent::remote(Team::Blue.body_id()));
        self.ctx.score.reset();

        self.resume();
        info!(session_id = %id, "Joined multiplayer game at: {}", id);
        Ok(())
    }

    /// Full teardown: transport, agents, world, input, loop. Idempotent.
    pub fn terminate(&mut self) {
        if self.ctx.mode != MatchMode::Idle {
            debug!(mode = ?self.ctx.mode, tick = self.ctx.tick, "Terminating match");
        }
        self.ctx.teardown();
        self.stop();
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    /// Schedule the loop and run one tick right away
    pub fn resume(&mut self) -> Option<TickReport> {
        self.loop_state = LoopState::Scheduled;
        self.tick()
    }

    /// Flip pause; does nothing while networked
    pub fn toggle_pause(&mut self) {
        if self.ctx.mode.is_networked() {
            debug!(mode = ?self.ctx.mode, "Pause toggle disabled while networked");
            return;
        }
        match self.loop_state {
            LoopState::Scheduled => self.pause(),
            LoopState::Stopped => {
                self.resume();
            }
        }
    }

    /// Run one tick if the loop is scheduled
    pub fn tick(&mut self) -> Option<TickReport> {
        match self.loop_state {
            LoopState::Scheduled => Some(cycle_of_life(&mut self.ctx, self.renderer.as_mut())),
            LoopState::Stopped => None,
        }
    }

    /// Latest intent from the local input source
    pub fn set_local_actions(&mut self, actions: Actions) {
        if let Some(local) = self.ctx.agents.local_mut() {
            local.actions = actions;
        }
    }

    /// Click on the arena at (x, y); what happens depends on the role
    pub fn click(&mut self, x: f32, y: f32) -> Option<BodyId> {
        let binding = self.ctx.click;
        if binding == ClickBinding::Detached {
            return None;
        }

        let debris = self.debris_at(x, y);
        let id = debris.id;
        match binding {
            ClickBinding::SpawnLocal => self.ctx.world.push(debris),
            ClickBinding::EmitToHost => session::emit_debris(&self.ctx, &debris),
            ClickBinding::Detached => return None,
        }
        Some(id)
    }

    fn debris_at(&mut self, x: f32, y: f32) -> Body {
        let vel = Vec2::new(
            10.0 * (self.rng.gen::<f32>() - 0.5),
            10.0 * (self.rng.gen::<f32>() - 0.5),
        );
        Body::debris(BodyId::debris(self.rng.gen::<u32>().into()), Vec2::new(x, y), vel)
    }

    /// Both fighters at their spawn state, nothing else in the world
    fn spawn_match(&mut self) {
        self.ctx.world.clear();
        self.ctx.world.push(Body::agent(Team::Blue));
        self.ctx.world.push(Body::agent(Team::Gold));
    }

    fn stop(&mut self) {
        self.loop_state = LoopState::Stopped;
    }

    pub fn controls(&self) -> ControlState {
        let playing = self.loop_state == LoopState::Scheduled;
        ControlState {
            playing,
            pause_enabled: !self.ctx.mode.is_networked(),
            label: if playing { "Pause" } else { "Play" },
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.ctx.mode
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn world(&self) -> &World {
        &self.ctx.world
    }

    pub fn agents(&self) -> &crate::game::agent::AgentRegistry {
        &self.ctx.agents
    }

    pub fn score(&self) -> &Score {
        &self.ctx.score
    }

    pub fn tick_count(&self) -> u64 {
        self.ctx.tick
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.ctx.session.as_ref().map(ActiveSession::id)
    }

    /// Shareable path for the running host session
    pub fn location_path(&self) -> Option<String> {
        match self.ctx.mode {
            MatchMode::Host => self.session_id().map(SessionId::location_path),
            _ => None,
        }
    }
}
