//! Arena physics: gravity, walking, jumping, and overlap resolution

use super::body::{Body, BodyKind, Vec2, WalkingDirection};

/// Arena width in pixels
pub const ARENA_WIDTH: f32 = 1280.0;
/// Arena height in pixels
pub const ARENA_HEIGHT: f32 = 720.0;
/// Downward acceleration (px/s²)
pub const GRAVITY: f32 = 900.0;
/// Horizontal speed while walking
pub const WALK_SPEED: f32 = 260.0;
/// Upward launch speed of a jump
pub const JUMP_SPEED: f32 = 520.0;
/// Upward speed given to the winner of a stomp
pub const KILL_BOUNCE_SPEED: f32 = 400.0;
/// Fraction of horizontal speed kept per grounded step without input
pub const GROUND_FRICTION: f32 = 0.8;
/// Bounce energy kept by debris hitting the floor
pub const DEBRIS_RESTITUTION: f32 = 0.5;
/// Below this speed grounded debris counts as resting
pub const REST_SPEED: f32 = 5.0;
/// Debris hitting the floor slower than this stops bouncing
pub const DEBRIS_SETTLE_SPEED: f32 = 60.0;

pub const AGENT_RADIUS: f32 = 24.0;
pub const DEBRIS_RADIUS: f32 = 6.0;

/// Physics system for moving bodies and resolving contacts
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Advance one body by `dt` seconds, including arena bounds
    pub fn integrate(body: &mut Body, dt: f32) {
        match body.kind {
            BodyKind::Agent { .. } => Self::integrate_agent(body, dt),
            BodyKind::Debris => Self::integrate_debris(body, dt),
        }
        Self::constrain_to_arena(body);
    }

    fn integrate_agent(body: &mut Body, dt: f32) {
        let walking = body.actions.walking_direction;

        if body.kinetic_state.freefall {
            body.vel.y += GRAVITY * dt;
        } else if body.actions.jumping {
            body.vel.y = -JUMP_SPEED;
            body.kinetic_state.freefall = true;
        }

        if walking != WalkingDirection::Still {
            body.vel.x = walking.sign() * WALK_SPEED;
        } else if !body.kinetic_state.freefall {
            body.vel.x *= GROUND_FRICTION;
        }

        body.pos.x += body.vel.x * dt;
        body.pos.y += body.vel.y * dt;
    }

    fn integrate_debris(body: &mut Body, dt: f32) {
        if body.kinetic_state.freefall {
            body.vel.y += GRAVITY * dt;
        } else {
            body.vel.x *= GROUND_FRICTION;
        }

        body.pos.x += body.vel.x * dt;
        body.pos.y += body.vel.y * dt;
    }

    fn constrain_to_arena(body: &mut Body) {
        let r = body.radius();
        let floor = ARENA_HEIGHT - r;

        if body.pos.y >= floor {
            body.pos.y = floor;
            match body.kind {
                BodyKind::Agent { .. } => {
                    body.vel.y = 0.0;
                    body.kinetic_state.freefall = false;
                }
                BodyKind::Debris => {
                    if body.vel.y < DEBRIS_SETTLE_SPEED {
                        body.vel.y = 0.0;
                        body.kinetic_state.freefall = false;
                    } else {
                        body.vel.y = -body.vel.y * DEBRIS_RESTITUTION;
                    }
                    body.vel.x *= GROUND_FRICTION;
                }
            }
        }

        if body.pos.y < r {
            body.pos.y = r;
            body.vel.y = body.vel.y.max(0.0);
        }

        if body.pos.x < r {
            body.pos.x = r;
            body.vel.x = -body.vel.x * 0.5;
        } else if body.pos.x > ARENA_WIDTH - r {
            body.pos.x = ARENA_WIDTH - r;
            body.vel.x = -body.vel.x * 0.5;
        }
    }

    /// Check if two bodies overlap
    pub fn check_overlap(a: &Body, b: &Body) -> bool {
        let dx = b.pos.x - a.pos.x;
        let dy = b.pos.y - a.pos.y;
        let combined = a.radius() + b.radius();
        dx * dx + dy * dy <= combined * combined
    }

    /// Whether `top` lands on `bottom` from above this step
    pub fn is_stomp(top: &Body, bottom: &Body) -> bool {
        top.pos.y + top.radius() * 0.5 < bottom.pos.y && top.vel.y > bottom.vel.y
    }

    /// Grounded debris that has stopped sliding
    pub fn is_at_rest(body: &Body) -> bool {
        !body.kinetic_state.freefall && body.vel.x.abs() < REST_SPEED && body.vel.y == 0.0
    }

    /// Push two overlapping bodies apart along their centre line
    /// Returns (new_pos_a, new_pos_b)
    pub fn separate(a: &Body, b: &Body) -> (Vec2, Vec2) {
        let dx = b.pos.x - a.pos.x;
        let dy = b.pos.y - a.pos.y;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < 0.001 {
            // Same position, push apart arbitrarily
            return (
                Vec2::new(a.pos.x - a.radius(), a.pos.y),
                Vec2::new(b.pos.x + b.radius(), b.pos.y),
            );
        }

        let overlap = a.radius() + b.radius() - dist;
        if overlap <= 0.0 {
            return (a.pos, b.pos);
        }

        let nx = dx / dist;
        let ny = dy / dist;
        let push = overlap / 2.0 + 0.1;

        (
            Vec2::new(a.pos.x - nx * push, a.pos.y - ny * push),
            Vec2::new(b.pos.x + nx * push, b.pos.y + ny * push),
        )
    }
}
