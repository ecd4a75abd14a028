/// Commands for creating and removing agents.
///
/// Spawning goes through messages so that configured agents, demos and tests
/// all take the same path, processed in the `Input` set of the fixed tick.

use bevy::prelude::*;
use crate::game::steering::BoundaryPolicy;

// ============================================================================
// Agent Commands
// ============================================================================

/// How a spawned agent moves.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentBehavior {
    /// Free wandering inside the bounds. `policy` overrides the global
    /// boundary policy for this agent.
    Wander {
        heading: Vec2,
        drift: bool,
        policy: Option<BoundaryPolicy>,
    },
    /// Walk a fixed route of planar points.
    Waypoints { points: Vec<Vec2>, looped: bool },
}

/// Command to spawn a new agent
#[derive(Event, Message, Debug, Clone)]
pub struct SpawnAgentCommand {
    /// Planar (x, z) start position.
    pub position: Vec2,
    /// Units per second; `None` uses the configured agent speed.
    pub speed: Option<f32>,
    pub behavior: AgentBehavior,
    /// glTF path relative to the asset folder. Agents with a model stay inert
    /// until it has loaded.
    pub model: Option<String>,
    pub tag: Option<String>,
    /// Tag of another agent to track with a proximity latch.
    pub sync_with: Option<String>,
}

impl SpawnAgentCommand {
    pub fn wander(position: Vec2, heading: Vec2) -> Self {
        Self {
            position,
            speed: None,
            behavior: AgentBehavior::Wander { heading, drift: true, policy: None },
            model: None,
            tag: None,
            sync_with: None,
        }
    }

    pub fn waypoints(points: Vec<Vec2>, looped: bool) -> Self {
        Self {
            position: points.first().copied().unwrap_or(Vec2::ZERO),
            speed: None,
            behavior: AgentBehavior::Waypoints { points, looped },
            model: None,
            tag: None,
            sync_with: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_sync(mut self, partner: impl Into<String>) -> Self {
        self.sync_with = Some(partner.into());
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_model(mut self, path: impl Into<String>) -> Self {
        self.model = Some(path.into());
        self
    }
}

/// Command to remove an agent and every proximity pair it belongs to
#[derive(Event, Message, Debug, Clone)]
pub struct DespawnAgentCommand {
    pub entity: Entity,
}
