//! Decision cadence and the scripted sinusoidal opponent

use super::agent::{AgentRegistry, AgentRole};
use super::body::{Actions, Body, Vec2, WalkingDirection};
use super::physics::AGENT_RADIUS;
use super::world::World;

/// Ticks between two AI recompute passes
pub const DEFAULT_BRAIN_DEBOUNCE_CYCLES: u32 = 12;

/// Phase advance per recompute pass (radians)
const PHASE_STEP: f32 = 0.9;
/// Beyond this horizontal gap the bot walks straight at its enemy
const CHASE_DISTANCE: f32 = 150.0;
/// Within this gap a grounded bot tries to jump onto its enemy
const POUNCE_DISTANCE: f32 = 120.0;

/// Throttles how often non-networked AI is recomputed.
///
/// Fires once every `debounce` ticks; the counter restarts at zero after
/// each firing, so after `k` ticks it has fired `k / debounce` times.
#[derive(Debug, Clone)]
pub struct DecisionCadence {
    current_cycle: u32,
    debounce: u32,
}

impl DecisionCadence {
    pub fn new(debounce: u32) -> Self {
        Self {
            current_cycle: 0,
            debounce: debounce.max(1),
        }
    }

    /// Count one tick; returns true when a recompute pass is due
    pub fn advance(&mut self) -> bool {
        self.current_cycle += 1;
        if self.current_cycle >= self.debounce {
            self.current_cycle = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current_cycle = 0;
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn debounce(&self) -> u32 {
        self.debounce
    }
}

impl Default for DecisionCadence {
    fn default() -> Self {
        Self::new(DEFAULT_BRAIN_DEBOUNCE_CYCLES)
    }
}

/// What a bot sees of itself and its enemy at decision time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub self_pos: Vec2,
    pub self_vel: Vec2,
    pub other_pos: Vec2,
    pub other_vel: Vec2,
    pub self_freefall: bool,
    pub relative_pos: Vec2,
    pub walking_direction: WalkingDirection,
}

impl Observation {
    pub fn capture(subject: &Body, other: &Body) -> Self {
        Self {
            self_pos: subject.pos,
            self_vel: subject.vel,
            other_pos: other.pos,
            other_vel: other.vel,
            self_freefall: subject.kinetic_state.freefall,
            relative_pos: Vec2::new(other.pos.x - subject.pos.x, other.pos.y - subject.pos.y),
            walking_direction: subject.actions.walking_direction,
        }
    }
}

/// Scripted opponent: chases from afar, sways sinusoidally up close
pub struct SinusoidalBrain;

impl SinusoidalBrain {
    /// Returns the new actions and the advanced phase
    pub fn decide(observation: &Observation, phase: f32) -> (Actions, f32) {
        let phase = (phase + PHASE_STEP).rem_euclid(std::f32::consts::TAU);
        let sweep = phase.sin();
        let dx = observation.relative_pos.x;

        let walking_direction = if dx.abs() > CHASE_DISTANCE {
            if dx > 0.0 {
                WalkingDirection::Right
            } else {
                WalkingDirection::Left
            }
        } else if sweep >= 0.0 {
            WalkingDirection::Right
        } else {
            WalkingDirection::Left
        };

        let enemy_above = observation.relative_pos.y < -AGENT_RADIUS;
        let jumping = !observation.self_freefall
            && (dx.abs() < POUNCE_DISTANCE || enemy_above || sweep > 0.9);

        (
            Actions {
                walking_direction,
                jumping,
            },
            phase,
        )
    }
}

/// Recompute actions for every scripted agent; returns how many were updated
pub fn bot_brain_cycle(agents: &mut AgentRegistry, world: &World) -> usize {
    let mut updated = 0;
    for agent in agents.iter_mut() {
        let AgentRole::SinusoidalBot { enemy, phase } = agent.role else {
            continue;
        };
        let (Some(subject), Some(other)) = (world.get(agent.body), world.get(enemy)) else {
            continue;
        };

        let observation = Observation::capture(subject, other);
        let (actions, phase) = SinusoidalBrain::decide(&observation, phase);
        agent.actions = actions;
        agent.role = AgentRole::SinusoidalBot { enemy, phase };
        updated += 1;
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::agent::Agent;
    use crate::game::body::Team;
    use crate::game::physics::ARENA_HEIGHT;

    #[test]
    fn cadence_fires_every_debounce_window() {
        for k in 0..100u32 {
            let mut cadence = DecisionCadence::default();
            let fired = (0..k).filter(|_| cadence.advance()).count() as u32;
            assert_eq!(fired, k / DEFAULT_BRAIN_DEBOUNCE_CYCLES, "after {k} ticks");
        }
    }

    #[test]
    fn cadence_counter_resets_on_fire() {
        let mut cadence = DecisionCadence::new(3);
        assert!(!cadence.advance());
        assert!(!cadence.advance());
        assert!(cadence.advance());
        assert_eq!(cadence.current_cycle(), 0);
    }

    #[test]
    fn zero_window_fires_every_tick() {
        let mut cadence = DecisionCadence::new(0);
        assert!(cadence.advance());
        assert!(cadence.advance());
    }

    fn grounded(team: Team, x: f32) -> Body {
        let mut body = Body::agent(team);
        body.pos = Vec2::new(x, ARENA_HEIGHT - AGENT_RADIUS);
        body.vel = Vec2::default();
        body.kinetic_state.freefall = false;
        body
    }

    #[test]
    fn distant_bot_walks_toward_enemy() {
        let bot = grounded(Team::Gold, 1000.0);
        let enemy = grounded(Team::Blue, 200.0);
        let (actions, _) = SinusoidalBrain::decide(&Observation::capture(&bot, &enemy), 0.0);
        assert_eq!(actions.walking_direction, WalkingDirection::Left);
        assert!(!actions.jumping);
    }

    #[test]
    fn close_grounded_bot_pounces() {
        let bot = grounded(Team::Gold, 500.0);
        let enemy = grounded(Team::Blue, 450.0);
        let (actions, _) = SinusoidalBrain::decide(&Observation::capture(&bot, &enemy), 0.0);
        assert!(actions.jumping);
    }

    #[test]
    fn airborne_bot_never_jumps() {
        let mut bot = grounded(Team::Gold, 500.0);
        bot.kinetic_state.freefall = true;
        let enemy = grounded(Team::Blue, 450.0);
        let (actions, _) = SinusoidalBrain::decide(&Observation::capture(&bot, &enemy), 0.0);
        assert!(!actions.jumping);
    }

    #[test]
    fn brain_cycle_updates_only_bots() {
        let mut world = World::new();
        world.push(grounded(Team::Blue, 200.0));
        world.push(grounded(Team::Gold, 1000.0));

        let mut agents = AgentRegistry::new();
        agents.push(Agent::local(Team::Blue.body_id()));
        agents.push(Agent::bot(Team::Gold.body_id(), Team::Blue.body_id(), 0.0));

        assert_eq!(bot_brain_cycle(&mut agents, &world), 1);

        let bot = agents.iter().find(|a| !a.is_remote() && a.body == Team::Gold.body_id()).unwrap();
        assert_eq!(bot.actions.walking_direction, WalkingDirection::Left);
        assert!(matches!(bot.role, AgentRole::SinusoidalBot { phase, .. } if phase > 0.0));
        assert_eq!(agents.local().unwrap().actions, Actions::default());
    }
}
