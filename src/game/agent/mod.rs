mod components;
mod spawn;
mod visuals;

use bevy::prelude::*;
use crate::game::simulation::{init_sim_config_from_initial, SimSet};

// Re-export public types
pub use components::{Agent, AgentBody, MotionSample, SyncRing};
pub use spawn::{process_spawn_commands, queue_configured_agents, sample_motion, AgentDirectory};
pub use visuals::{AgentMaterials, AgentMesh};

use visuals::{setup_agent_resources, spawn_agent_visuals, update_sync_rings};

/// Plugin that spawns agents and keeps their bookkeeping up to date.
/// Runs headless; rendering lives in [`AgentVisualsPlugin`].
pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentDirectory>()
           .add_systems(PostStartup, queue_configured_agents.after(init_sim_config_from_initial))
           .add_systems(FixedUpdate, (
               process_spawn_commands.in_set(SimSet::Input),
               sample_motion.in_set(SimSet::Integration),
           ));
    }
}

/// Placeholder bodies and sync rings for agents
pub struct AgentVisualsPlugin;

impl Plugin for AgentVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_agent_resources)
           .add_systems(Update, (spawn_agent_visuals, update_sync_rings));
    }
}
