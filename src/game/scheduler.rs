//! One tick of the game loop

use serde::Serialize;
use tracing::{debug, trace};

use crate::net::session;
use crate::render::Renderer;
use crate::util::time::tick_delta;

use super::body::Team;
use super::brain::bot_brain_cycle;
use super::context::MatchContext;
use super::score::Score;
use super::world::{StepCallbacks, WorldEvent};

/// Whether a next tick is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    Stopped,
    Scheduled,
}

/// Step callbacks for a live match: points go to the score
struct ScoreKeeper<'a> {
    score: &'a mut Score,
}

impl StepCallbacks for ScoreKeeper<'_> {
    fn increment_score_for_team(&mut self, team: Team) {
        self.score.increment(team);
        debug!(team = %team, points = self.score.get(team), "Point scored");
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub inbound_applied: usize,
    pub brain_recomputed: bool,
    pub events: Vec<WorldEvent>,
}

/// Run one tick.
///
/// Order: apply queued relay events, AI cadence (offline only) or action send, count the
/// tick, step the world, clear jumps, send the host snapshot, redraw.
/// Scheduling the next tick is the caller's job.
pub fn cycle_of_life(ctx: &mut MatchContext, renderer: &mut dyn Renderer) -> TickReport {
    let inbound_applied = session::drain_inbound(ctx);

    let mut brain_recomputed = false;
    if !ctx.mode.is_networked() && ctx.cadence.advance() {
        bot_brain_cycle(&mut ctx.agents, &ctx.world);
        brain_recomputed = true;
    }

    if ctx.mode.sends_actions() {
        session::emit_actions(ctx);
    }

    ctx.tick += 1;

    ctx.agents.apply_actions(&mut ctx.world);
    let events = ctx.world.step(
        tick_delta(),
        &mut ScoreKeeper {
            score: &mut ctx.score,
        },
    );

    ctx.agents.clear_jumping(&mut ctx.world);

    if ctx.mode.emits_snapshots() {
        session::emit_snapshot(ctx);
    }

    renderer.draw(&ctx.world, &ctx.score);

    trace!(tick = ctx.tick, bodies = ctx.world.len(), events = events.len(), "Tick");

    TickReport {
        tick: ctx.tick,
        inbound_applied,
        brain_recomputed,
        events,
    }
}
