//! The set of simulated bodies and the single-step advance

use super::body::{Body, BodyId, Team};
use super::physics::PhysicsSystem;

/// Receivers for what happened during a step.
///
/// The behaviour hooks default to the body's own reaction, so an
/// implementor usually only has to keep score.
pub trait StepCallbacks {
    fn increment_score_for_team(&mut self, team: Team);

    fn on_death(&mut self, body: &mut Body) {
        body.on_death();
    }

    fn on_kill(&mut self, body: &mut Body) {
        body.on_kill();
    }

    fn on_collision(&mut self, body: &mut Body) {
        body.on_collision();
    }
}

/// Something that happened during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// An agent landed on another agent
    Stomp {
        killer: BodyId,
        victim: BodyId,
        team: Team,
    },
    /// Two bodies touched without a stomp
    Collision { a: BodyId, b: BodyId },
    /// A body died on its own (debris at rest)
    Death { body: BodyId },
}

#[derive(Debug, Clone, Copy)]
enum Contact {
    Stomp { killer: usize, victim: usize },
    Collision { a: usize, b: usize },
    Death { index: usize },
}

/// All bodies currently simulated
#[derive(Debug, Default)]
pub struct World {
    bodies: Vec<Body>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body. Duplicate ids are the caller's problem.
    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Swap the whole body set for another one
    pub fn replace(&mut self, bodies: Vec<Body>) {
        self.bodies = bodies;
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// Advance every body by `dt` and report each event exactly once
    pub fn step<C: StepCallbacks + ?Sized>(&mut self, dt: f32, callbacks: &mut C) -> Vec<WorldEvent> {
        for body in &mut self.bodies {
            PhysicsSystem::integrate(body, dt);
        }

        let contacts = self.detect_contacts();
        let mut events = Vec::with_capacity(contacts.len());

        for contact in contacts {
            match contact {
                Contact::Stomp { killer, victim } => {
                    // Stomps only happen between agents
                    let Some(team) = self.bodies[killer].team() else {
                        continue;
                    };
                    events.push(WorldEvent::Stomp {
                        killer: self.bodies[killer].id,
                        victim: self.bodies[victim].id,
                        team,
                    });
                    callbacks.increment_score_for_team(team);
                    callbacks.on_kill(&mut self.bodies[killer]);
                    callbacks.on_death(&mut self.bodies[victim]);
                }
                Contact::Collision { a, b } => {
                    events.push(WorldEvent::Collision {
                        a: self.bodies[a].id,
                        b: self.bodies[b].id,
                    });
                    callbacks.on_collision(&mut self.bodies[a]);
                    callbacks.on_collision(&mut self.bodies[b]);
                }
                Contact::Death { index } => {
                    events.push(WorldEvent::Death {
                        body: self.bodies[index].id,
                    });
                    callbacks.on_death(&mut self.bodies[index]);
                }
            }
        }

        self.bodies.retain(|b| !b.is_expired());
        events
    }

    /// Find contacts and separate overlapping bodies
    fn detect_contacts(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let n = self.bodies.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if !PhysicsSystem::check_overlap(a, b) {
                    continue;
                }

                let contact = if a.is_agent() && b.is_agent() && PhysicsSystem::is_stomp(a, b) {
                    Contact::Stomp { killer: i, victim: j }
                } else if a.is_agent() && b.is_agent() && PhysicsSystem::is_stomp(b, a) {
                    Contact::Stomp { killer: j, victim: i }
                } else {
                    let (pa, pb) = PhysicsSystem::separate(a, b);
                    self.bodies[i].pos = pa;
                    self.bodies[j].pos = pb;
                    Contact::Collision { a: i, b: j }
                };
                contacts.push(contact);
            }
        }

        for (index, body) in self.bodies.iter().enumerate() {
            if !body.is_agent() && PhysicsSystem::is_at_rest(body) {
                contacts.push(Contact::Death { index });
            }
        }

        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::body::Vec2;
    use crate::game::physics::{AGENT_RADIUS, ARENA_HEIGHT, DEBRIS_RADIUS};
    use crate::util::time::tick_delta;

    #[derive(Default)]
    struct Recorder {
        scored: Vec<Team>,
        deaths: usize,
        kills: usize,
        collisions: usize,
    }

    impl StepCallbacks for Recorder {
        fn increment_score_for_team(&mut self, team: Team) {
            self.scored.push(team);
        }

        fn on_death(&mut self, body: &mut Body) {
            self.deaths += 1;
            body.on_death();
        }

        fn on_kill(&mut self, body: &mut Body) {
            self.kills += 1;
            body.on_kill();
        }

        fn on_collision(&mut self, body: &mut Body) {
            self.collisions += 1;
            body.on_collision();
        }
    }

    fn floor_y() -> f32 {
        ARENA_HEIGHT - AGENT_RADIUS
    }

    /// Blue falls onto a grounded gold agent
    fn stomp_setup(world: &mut World) {
        world.clear();
        let mut gold = Body::agent(Team::Gold);
        gold.pos = Vec2::new(640.0, floor_y());
        gold.vel = Vec2::default();
        gold.kinetic_state.freefall = false;

        let mut blue = Body::agent(Team::Blue);
        blue.pos = Vec2::new(640.0, floor_y() - 40.0);
        blue.vel = Vec2::new(0.0, 300.0);

        world.push(blue);
        world.push(gold);
    }

    #[test]
    fn clear_and_replace() {
        let mut world = World::new();
        world.push(Body::agent(Team::Blue));
        world.push(Body::agent(Team::Gold));
        assert_eq!(world.len(), 2);

        world.replace(vec![Body::agent(Team::Gold)]);
        assert_eq!(world.len(), 1);
        assert!(world.get(Team::Gold.body_id()).is_some());

        world.clear();
        assert!(world.is_empty());
    }

    #[test]
    fn stomp_scores_once_and_respawns_victim() {
        let mut world = World::new();
        let mut recorder = Recorder::default();
        stomp_setup(&mut world);

        let events = world.step(tick_delta(), &mut recorder);

        assert_eq!(recorder.scored, vec![Team::Blue]);
        assert_eq!(recorder.kills, 1);
        assert_eq!(recorder.deaths, 1);
        assert_eq!(recorder.collisions, 0);
        assert_eq!(
            events,
            vec![WorldEvent::Stomp {
                killer: Team::Blue.body_id(),
                victim: Team::Gold.body_id(),
                team: Team::Blue,
            }]
        );

        let gold = world.get(Team::Gold.body_id()).unwrap();
        assert_eq!(gold.pos, Team::Gold.spawn_point());
        let blue = world.get(Team::Blue.body_id()).unwrap();
        assert!(blue.vel.y < 0.0);
    }

    #[test]
    fn three_stomps_score_three_times() {
        let mut world = World::new();
        let mut recorder = Recorder::default();

        for _ in 0..3 {
            stomp_setup(&mut world);
            world.step(tick_delta(), &mut recorder);
        }

        assert_eq!(recorder.scored, vec![Team::Blue; 3]);
    }

    #[test]
    fn side_contact_is_a_collision_for_both_bodies() {
        let mut world = World::new();
        let mut recorder = Recorder::default();

        let mut blue = Body::agent(Team::Blue);
        blue.pos = Vec2::new(600.0, floor_y());
        blue.vel = Vec2::default();
        blue.kinetic_state.freefall = false;
        let mut gold = Body::agent(Team::Gold);
        gold.pos = Vec2::new(630.0, floor_y());
        gold.vel = Vec2::default();
        gold.kinetic_state.freefall = false;
        world.push(blue);
        world.push(gold);

        let events = world.step(tick_delta(), &mut recorder);

        assert_eq!(recorder.collisions, 2);
        assert!(recorder.scored.is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WorldEvent::Collision { .. }));
    }

    #[test]
    fn resting_debris_dies_and_leaves_the_world() {
        let mut world = World::new();
        let mut recorder = Recorder::default();
        let mut debris = Body::debris(
            BodyId::debris(11),
            Vec2::new(300.0, ARENA_HEIGHT - DEBRIS_RADIUS),
            Vec2::default(),
        );
        debris.kinetic_state.freefall = false;
        world.push(debris);

        let events = world.step(tick_delta(), &mut recorder);

        assert_eq!(recorder.deaths, 1);
        assert_eq!(events, vec![WorldEvent::Death { body: BodyId::debris(11) }]);
        assert!(world.is_empty());
    }
}
