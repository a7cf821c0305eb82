//! Controllers and the ordered agent registry

use super::body::{Actions, BodyId};
use super::world::World;

/// Who decides an agent's actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentRole {
    /// Driven by this process' input source
    LocalPlayer,
    /// Scripted opponent sweeping toward `enemy`
    SinusoidalBot { enemy: BodyId, phase: f32 },
    /// Actions arrive over the network from the other peer
    RemotePeer,
}

/// A controller bound to one body
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub role: AgentRole,
    /// Controlled body, looked up in the world by id
    pub body: BodyId,
    /// Latest actions record, copied onto the body before each step
    pub actions: Actions,
}

impl Agent {
    pub fn local(body: BodyId) -> Self {
        Self::with_role(AgentRole::LocalPlayer, body)
    }

    pub fn bot(body: BodyId, enemy: BodyId, phase: f32) -> Self {
        Self::with_role(AgentRole::SinusoidalBot { enemy, phase }, body)
    }

    pub fn remote(body: BodyId) -> Self {
        Self::with_role(AgentRole::RemotePeer, body)
    }

    fn with_role(role: AgentRole, body: BodyId) -> Self {
        Self {
            role,
            body,
            actions: Actions::default(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.role, AgentRole::RemotePeer)
    }
}

/// Ordered list of agents; order only matters for iteration
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    pub fn clear(&mut self) {
        self.agents.clear();
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn local(&self) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| a.role == AgentRole::LocalPlayer)
    }

    pub fn local_mut(&mut self) -> Option<&mut Agent> {
        self.agents
            .iter_mut()
            .find(|a| a.role == AgentRole::LocalPlayer)
    }

    pub fn remote_mut(&mut self) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.is_remote())
    }

    /// Hand each agent's actions to the body it controls
    pub fn apply_actions(&self, world: &mut World) {
        for agent in &self.agents {
            if let Some(body) = world.get_mut(agent.body) {
                body.actions = agent.actions;
            }
        }
    }

    /// Remote agents take the actions carried by their snapshotted bodies
    pub fn adopt_remote_actions(&mut self, world: &World) {
        for agent in self.agents.iter_mut().filter(|a| a.is_remote()) {
            if let Some(body) = world.get(agent.body) {
                agent.actions = body.actions;
            }
        }
    }

    /// Post-step reset: no jump survives into the next tick
    pub fn clear_jumping(&mut self, world: &mut World) {
        for agent in &mut self.agents {
            agent.actions.jumping = false;
            if let Some(body) = world.get_mut(agent.body) {
                body.actions.jumping = false;
            }
        }
    }
}
