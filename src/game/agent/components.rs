use bevy::prelude::*;

/// Marks an entity as a simulated agent
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Agent;

/// Horizontal speed actually observed over the last tick, whatever moved the
/// agent (wander, waypoints or something external).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub previous: Option<Vec2>,
    pub speed: f32,
}

/// Marks the child entity that renders an agent's body
#[derive(Component)]
pub struct AgentBody;

/// Marks the child ring shown once the agent is synced with its partner
#[derive(Component)]
pub struct SyncRing;
