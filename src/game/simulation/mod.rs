/// Simulation layer - deterministic fixed-tick logic.
///
/// This module is organized into:
/// - **resources**: Typed config, tick counter, seeded RNG, debug toggles
/// - **events**: Spawn/despawn commands
/// - **terrain**: Height queries the controllers snap to
/// - **systems_config**: Building `SimConfig` from `InitialConfig`
/// - **systems**: Tick bookkeeping and status logging
/// - **debug**: Gizmo overlays (windowed builds only)

use bevy::prelude::*;

// Module declarations
pub mod resources;
pub mod events;
pub mod terrain;
pub mod systems;
pub mod systems_config;
pub mod debug;

// Re-export commonly used items
pub use resources::*;
pub use events::*;
pub use debug::SimulationDebugPlugin;
pub use systems_config::init_sim_config_from_initial;

// System sets for organizing execution order
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,        // Spawn/despawn commands, model readiness
    Steering,     // Wander, waypoints, first-person movement
    Integration,  // Motion sampling, proximity latches
    Presentation, // Walk cycle and clip weights
}

/// Main simulation plugin
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Replaced by the configured tick rate at PostStartup
        app.insert_resource(Time::<Fixed>::from_hz(60.0));

        app.init_resource::<SimConfig>();
        app.init_resource::<SimTick>();
        app.init_resource::<SteerRng>();
        app.init_resource::<DebugConfig>();

        // Register events
        app.add_message::<SpawnAgentCommand>();
        app.add_message::<DespawnAgentCommand>();

        // Configure System Sets
        app.configure_sets(FixedUpdate, (
            SimSet::Input,
            SimSet::Steering,
            SimSet::Integration,
            SimSet::Presentation,
        ).chain());

        // InitialConfig is inserted during Startup by GameConfigPlugin
        app.add_systems(PostStartup, systems_config::init_sim_config_from_initial);

        app.add_systems(FixedUpdate, (
            systems::increment_sim_tick.before(SimSet::Input),
            systems::sim_status.after(SimSet::Presentation),
        ));
    }
}
