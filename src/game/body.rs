//! Simulated bodies, their per-tick actions, and the plain-data wire form

use serde::{Deserialize, Serialize};

use super::physics::{AGENT_RADIUS, DEBRIS_RADIUS, KILL_BOUNCE_SPEED};

/// 2D vector in arena pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

/// Team colour of an agent body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Blue,
    Gold,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Gold];

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Gold => "gold",
        }
    }

    /// Where a body of this team enters the arena
    pub fn spawn_point(self) -> Vec2 {
        match self {
            Team::Blue => Vec2::new(100.0, 75.0),
            Team::Gold => Vec2::new(1165.0, 75.0),
        }
    }

    /// Launch velocity at spawn (both teams fly toward the centre)
    pub fn spawn_velocity(self) -> Vec2 {
        match self {
            Team::Blue => Vec2::new(200.0, 200.0),
            Team::Gold => Vec2::new(-200.0, 200.0),
        }
    }

    /// Stable identifier of this team's agent body, shared by both peers
    pub fn body_id(self) -> BodyId {
        match self {
            Team::Blue => BodyId(1),
            Team::Gold => BodyId(2),
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a body across the network boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Debris ids live above the reserved agent range
    pub fn debris(raw: u64) -> Self {
        Self(raw | (1 << 32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KineticState {
    pub freefall: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkingDirection {
    Left,
    #[default]
    Still,
    Right,
}

impl WalkingDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Still => 0.0,
            Self::Right => 1.0,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// What a controller wants its body to do this tick.
///
/// `jumping` is only put on the wire when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actions {
    #[serde(default)]
    pub walking_direction: WalkingDirection,
    #[serde(default, skip_serializing_if = "is_false")]
    pub jumping: bool,
}

/// Behavioural type of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Team fighter controlled by an agent
    Agent { team: Team },
    /// Ownerless thrown object
    Debris,
}

impl BodyKind {
    pub fn object_type(self) -> &'static str {
        match self {
            BodyKind::Agent { .. } => OBJECT_TYPE_AGENT,
            BodyKind::Debris => OBJECT_TYPE_DEBRIS,
        }
    }
}

pub const OBJECT_TYPE_AGENT: &str = "AgentObject";
pub const OBJECT_TYPE_DEBRIS: &str = "Debris";

/// A physics participant
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kinetic_state: KineticState,
    pub actions: Actions,
    pub kind: BodyKind,
    /// Set by `on_death` on debris; the world drops it after the step
    pub(crate) expired: bool,
}

impl Body {
    /// Agent body in its team's spawn state
    pub fn agent(team: Team) -> Self {
        let mut body = Self {
            id: team.body_id(),
            pos: Vec2::default(),
            vel: Vec2::default(),
            kinetic_state: KineticState::default(),
            actions: Actions::default(),
            kind: BodyKind::Agent { team },
            expired: false,
        };
        body.respawn();
        body
    }

    pub fn debris(id: BodyId, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            kinetic_state: KineticState { freefall: true },
            actions: Actions::default(),
            kind: BodyKind::Debris,
            expired: false,
        }
    }

    pub fn team(&self) -> Option<Team> {
        match self.kind {
            BodyKind::Agent { team } => Some(team),
            BodyKind::Debris => None,
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self.kind, BodyKind::Agent { .. })
    }

    pub fn radius(&self) -> f32 {
        match self.kind {
            BodyKind::Agent { .. } => AGENT_RADIUS,
            BodyKind::Debris => DEBRIS_RADIUS,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Put an agent back at its spawn point (no-op for debris)
    pub fn respawn(&mut self) {
        if let BodyKind::Agent { team } = self.kind {
            self.pos = team.spawn_point();
            self.vel = team.spawn_velocity();
            self.kinetic_state.freefall = true;
        }
    }

    pub fn on_death(&mut self) {
        match self.kind {
            BodyKind::Agent { .. } => self.respawn(),
            BodyKind::Debris => self.expired = true,
        }
    }

    pub fn on_kill(&mut self) {
        if self.is_agent() {
            self.vel.y = -KILL_BOUNCE_SPEED;
            self.kinetic_state.freefall = true;
        }
    }

    pub fn on_collision(&mut self) {
        match self.kind {
            BodyKind::Agent { .. } => self.vel.x *= -0.5,
            BodyKind::Debris => {
                self.vel.x *= 0.5;
                self.vel.y *= 0.5;
            }
        }
    }
}

/// Body as it travels over the wire: plain data plus an `objectType` tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBody {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    #[serde(default)]
    pub kinetic_state: KineticState,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
}

/// Why a received body could not regain its behavioural type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body {0} has no objectType")]
    MissingObjectType(u64),

    #[error("body {id} has unknown objectType {object_type:?}")]
    UnknownObjectType { id: u64, object_type: String },

    #[error("agent body {0} has no team")]
    MissingTeam(u64),
}

impl From<&Body> for WireBody {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            vel: body.vel,
            kinetic_state: body.kinetic_state,
            actions: body.actions,
            team: body.team(),
            object_type: Some(body.kind.object_type().to_string()),
        }
    }
}

impl TryFrom<WireBody> for Body {
    type Error = DecodeError;

    fn try_from(wire: WireBody) -> Result<Self, Self::Error> {
        let object_type = wire
            .object_type
            .ok_or(DecodeError::MissingObjectType(wire.id.0))?;

        let kind = match object_type.as_str() {
            OBJECT_TYPE_AGENT => BodyKind::Agent {
                team: wire.team.ok_or(DecodeError::MissingTeam(wire.id.0))?,
            },
            OBJECT_TYPE_DEBRIS => BodyKind::Debris,
            _ => {
                return Err(DecodeError::UnknownObjectType {
                    id: wire.id.0,
                    object_type,
                })
            }
        };

        Ok(Self {
            id: wire.id,
            pos: wire.pos,
            vel: wire.vel,
            kinetic_state: wire.kinetic_state,
            actions: wire.actions,
            kind,
            expired: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_spawns_in_freefall_at_team_point() {
        let gold = Body::agent(Team::Gold);
        assert_eq!(gold.pos, Vec2::new(1165.0, 75.0));
        assert_eq!(gold.vel, Vec2::new(-200.0, 200.0));
        assert!(gold.kinetic_state.freefall);
        assert_eq!(gold.id, BodyId(2));
    }

    #[test]
    fn jumping_is_omitted_when_false() {
        let idle = Actions {
            walking_direction: WalkingDirection::Left,
            jumping: false,
        };
        let json = serde_json::to_value(idle).unwrap();
        assert_eq!(json, serde_json::json!({ "walkingDirection": "left" }));

        let jump = Actions {
            walking_direction: WalkingDirection::Still,
            jumping: true,
        };
        let json = serde_json::to_value(jump).unwrap();
        assert_eq!(json["jumping"], serde_json::json!(true));
    }

    #[test]
    fn wire_body_carries_object_type_tag() {
        let debris = Body::debris(BodyId::debris(7), Vec2::new(3.0, 4.0), Vec2::new(1.0, -1.0));
        let json = serde_json::to_value(WireBody::from(&debris)).unwrap();
        assert_eq!(json["objectType"], "Debris");
        assert_eq!(json["kineticState"]["freefall"], true);
        assert!(json.get("team").is_none());
    }

    #[test]
    fn rehydrated_body_keeps_state_and_type() {
        let mut blue = Body::agent(Team::Blue);
        blue.pos = Vec2::new(320.5, 600.0);
        blue.vel = Vec2::new(-12.0, 3.5);
        blue.kinetic_state.freefall = false;

        let text = serde_json::to_string(&WireBody::from(&blue)).unwrap();
        let wire: WireBody = serde_json::from_str(&text).unwrap();
        let back = Body::try_from(wire).unwrap();

        assert_eq!(back, blue);
    }

    #[test]
    fn missing_object_type_is_rejected() {
        let wire: WireBody = serde_json::from_value(serde_json::json!({
            "id": 9,
            "pos": { "x": 1.0, "y": 2.0 },
            "vel": { "x": 0.0, "y": 0.0 }
        }))
        .unwrap();
        assert_eq!(Body::try_from(wire), Err(DecodeError::MissingObjectType(9)));
    }

    #[test]
    fn unknown_object_type_is_rejected() {
        let wire: WireBody = serde_json::from_value(serde_json::json!({
            "id": 4,
            "pos": { "x": 1.0, "y": 2.0 },
            "vel": { "x": 0.0, "y": 0.0 },
            "objectType": "Meteor"
        }))
        .unwrap();
        assert!(matches!(
            Body::try_from(wire),
            Err(DecodeError::UnknownObjectType { id: 4, .. })
        ));
    }

    #[test]
    fn debris_death_expires_but_agent_death_respawns() {
        let mut debris = Body::debris(BodyId::debris(1), Vec2::new(5.0, 5.0), Vec2::default());
        debris.on_death();
        assert!(debris.is_expired());

        let mut gold = Body::agent(Team::Gold);
        gold.pos = Vec2::new(600.0, 650.0);
        gold.kinetic_state.freefall = false;
        gold.on_death();
        assert_eq!(gold.pos, Team::Gold.spawn_point());
        assert!(gold.kinetic_state.freefall);
        assert!(!gold.is_expired());
    }
}
