use std::sync::Arc;

use parking_lot::Mutex;

use stomp_arena::app::{GameController, GameSettings};
use stomp_arena::game::physics::{AGENT_RADIUS, ARENA_HEIGHT};
use stomp_arena::game::{
    cycle_of_life, Actions, Agent, Body, LoopState, MatchContext, MatchMode, Score, Team, Vec2,
    WalkingDirection, World,
};
use stomp_arena::net::protocol::{Channel, HostPayload};
use stomp_arena::net::{Connector, LoopbackRelay, SessionId};
use stomp_arena::render::{HeadlessRenderer, Renderer};

/// Keeps the last score it was asked to draw
#[derive(Clone, Default)]
struct ScoreBoard {
    shown: Arc<Mutex<Option<Score>>>,
}

impl Renderer for ScoreBoard {
    fn draw(&mut self, _world: &World, score: &Score) {
        *self.shown.lock() = Some(score.clone());
    }
}

fn controller(relay: &LoopbackRelay, seed: u64) -> GameController {
    GameController::new(
        GameSettings {
            rng_seed: Some(seed),
            ..GameSettings::default()
        },
        Arc::new(relay.clone()),
        Box::new(HeadlessRenderer::default()),
    )
}

#[test]
fn start_as_host_spawns_both_fighters_at_rest_score() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 3);

    let id = host.start_as_host().unwrap();

    assert_eq!(host.mode(), MatchMode::Host);
    assert_eq!(host.session_id(), Some(id));
    assert_eq!(host.score().get(Team::Blue), 0);
    assert_eq!(host.score().get(Team::Gold), 0);

    let world = host.world();
    assert_eq!(world.len(), 2);

    let blue = world.get(Team::Blue.body_id()).unwrap();
    assert_eq!(blue.pos, Vec2::new(100.0, 75.0));
    assert_eq!(blue.vel, Vec2::new(200.0, 200.0));
    assert!(blue.kinetic_state.freefall);

    let gold = world.get(Team::Gold.body_id()).unwrap();
    assert_eq!(gold.pos, Vec2::new(1165.0, 75.0));
    assert_eq!(gold.vel, Vec2::new(-200.0, 200.0));
    assert!(gold.kinetic_state.freefall);
}

#[test]
fn terminate_twice_leaves_everything_empty() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 4);
    let id = host.start_as_host().unwrap();
    for _ in 0..5 {
        host.tick();
    }

    host.terminate();
    host.terminate();

    assert!(host.world().is_empty());
    assert!(host.agents().is_empty());
    assert_eq!(host.loop_state(), LoopState::Stopped);
    assert_eq!(host.mode(), MatchMode::Idle);
    assert_eq!(host.session_id(), None);
    assert_eq!(relay.peer_count(id), 0);
    assert!(host.tick().is_none());
}

#[test]
fn three_stomps_between_ticks_show_three_points() {
    let board = ScoreBoard::default();
    let mut renderer = board.clone();
    let floor = ARENA_HEIGHT - AGENT_RADIUS;

    let mut ctx = MatchContext::new(12);
    ctx.mode = MatchMode::Host;
    ctx.agents.push(Agent::local(Team::Blue.body_id()));
    ctx.agents.push(Agent::remote(Team::Gold.body_id()));

    for _ in 0..3 {
        let mut gold = Body::agent(Team::Gold);
        gold.pos = Vec2::new(640.0, floor);
        gold.vel = Vec2::default();
        gold.kinetic_state.freefall = false;
        let mut blue = Body::agent(Team::Blue);
        blue.pos = Vec2::new(640.0, floor - 40.0);
        blue.vel = Vec2::new(0.0, 300.0);
        ctx.world.replace(vec![blue, gold]);

        cycle_of_life(&mut ctx, &mut renderer);
    }

    let shown = board.shown.lock().clone().unwrap();
    assert_eq!(shown.get(Team::Blue), 3);
    assert_eq!(shown.get(Team::Gold), 0);
}

#[test]
fn joiner_mirrors_host_world() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 5);
    let mut joiner = controller(&relay, 6);

    let id = host.start_as_host().unwrap();
    joiner.start_as_joiner(id).unwrap();
    assert!(joiner.world().is_empty());

    host.tick();
    joiner.tick();

    assert_eq!(joiner.world().len(), 2);
    assert!(joiner.world().get(Team::Blue.body_id()).is_some());
    assert!(joiner.world().get(Team::Gold.body_id()).is_some());
    assert!(!joiner.controls().pause_enabled);
}

#[test]
fn joiner_empty_snapshot_empties_world() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 7);
    let mut joiner = controller(&relay, 8);

    let id = host.start_as_host().unwrap();
    joiner.start_as_joiner(id).unwrap();
    host.tick();
    joiner.tick();
    assert_eq!(joiner.world().len(), 2);

    // A bare relay peer speaks for the host from here on
    host.terminate();
    let fake_host = relay.connect(id).unwrap();
    fake_host
        .transport
        .emit(
            Channel::HostPayload,
            serde_json::to_string(&HostPayload::default()).unwrap(),
        )
        .unwrap();

    joiner.tick();
    assert!(joiner.world().is_empty());
}

#[test]
fn joiner_actions_drive_host_remote_agent() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 9);
    let mut joiner = controller(&relay, 10);

    let id = host.start_as_host().unwrap();
    joiner.start_as_joiner(id).unwrap();

    joiner.set_local_actions(Actions {
        walking_direction: WalkingDirection::Left,
        jumping: true,
    });
    joiner.tick();
    // Joiner's own jump is consumed by the tick
    assert!(!joiner.agents().iter().any(|a| a.actions.jumping));

    host.tick();
    let remote = host.agents().iter().find(|a| a.is_remote()).unwrap();
    assert_eq!(remote.body, Team::Gold.body_id());
    assert_eq!(remote.actions.walking_direction, WalkingDirection::Left);
    assert!(!remote.actions.jumping);

    let gold = host.world().get(Team::Gold.body_id()).unwrap();
    assert_eq!(gold.vel.x, -stomp_arena::game::physics::WALK_SPEED);
}

#[test]
fn joiner_click_reaches_host_only() {
    let relay = LoopbackRelay::new();
    let mut host = controller(&relay, 11);
    let mut joiner = controller(&relay, 12);

    let id = host.start_as_host().unwrap();
    joiner.start_as_joiner(id).unwrap();

    let debris_id = joiner.click(500.0, 100.0).unwrap();
    assert!(joiner.world().get(debris_id).is_none());

    host.tick();
    let debris = host.world().get(debris_id).unwrap();
    assert!(!debris.is_agent());

    joiner.tick();
    assert!(joiner.world().get(debris_id).is_some());
}

#[test]
fn switching_roles_drops_the_old_session() {
    let relay = LoopbackRelay::new();
    let mut game = controller(&relay, 13);
    let mut other = controller(&relay, 14);

    let first = game.start_as_host().unwrap();
    other.start_as_joiner(first).unwrap();
    assert_eq!(relay.peer_count(first), 2);

    let second = SessionId::new(if first.get() == 9999 { 1000 } else { first.get() + 1 }).unwrap();
    game.start_as_joiner(second).unwrap();
    assert_eq!(relay.peer_count(first), 1);

    // Actions the old joiner sends no longer reach anyone
    other.tick();
    game.tick();
    assert_eq!(game.mode(), MatchMode::Joiner);
    assert!(game.world().is_empty());
}

#[test]
fn local_match_pauses_and_resumes() {
    let relay = LoopbackRelay::new();
    let mut game = controller(&relay, 15);
    game.start_local_bot_match();
    assert_eq!(game.world().len(), 2);
    assert_eq!(game.agents().len(), 2);

    game.toggle_pause();
    let paused_at = game.tick_count();
    assert!(game.tick().is_none());
    assert_eq!(game.tick_count(), paused_at);

    game.toggle_pause();
    assert_eq!(game.tick_count(), paused_at + 1);
}
