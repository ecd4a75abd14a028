/// Proximity/sync latch between pairs of agents.
///
/// Each registered pair owns a [`ProximityLatch`] fed with the agents' 3D
/// distance every fixed tick. When a latch fires, both agents get their
/// [`SyncIndicator`] switched on and an [`AgentsSynced`] message is written.

use bevy::prelude::*;
use crate::game::agent::Agent;
use crate::game::simulation::{SimConfig, SimSet};

mod latch;
mod registry;

pub use latch::{LatchParams, ProximityLatch, SyncState};
pub use registry::ProximityRegistry;

/// Written once per pair, on the tick its latch syncs.
#[derive(Event, Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentsSynced {
    pub first: Entity,
    pub second: Entity,
}

/// Presentation flag committed on agents that belong to a synced pair.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncIndicator {
    pub on: bool,
}

pub struct ProximityPlugin;

impl Plugin for ProximityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProximityRegistry>()
           .add_message::<AgentsSynced>()
           .add_systems(FixedUpdate, track_proximity.in_set(SimSet::Integration));
    }
}

/// Advance every registered latch by one tick.
///
/// Pairs where either agent no longer exists are skipped and keep their
/// timer frozen.
pub fn track_proximity(
    mut registry: ResMut<ProximityRegistry>,
    sim_config: Res<SimConfig>,
    agents: Query<&Transform, With<Agent>>,
    mut indicators: Query<&mut SyncIndicator>,
    mut synced: MessageWriter<AgentsSynced>,
) {
    let dt = sim_config.fixed_dt();

    for (first, second) in registry.sorted_pairs() {
        let (Ok(a), Ok(b)) = (agents.get(first), agents.get(second)) else {
            continue;
        };
        let distance = a.translation.distance(b.translation);

        let Some(latch) = registry.latch_mut(first, second) else {
            continue;
        };
        if !latch.update(distance, dt, &sim_config.latch) {
            continue;
        }

        info!("{:?} and {:?} synced after {:.1}s together", first, second, sim_config.latch.sync_duration);
        synced.write(AgentsSynced { first, second });
        for entity in [first, second] {
            if let Ok(mut indicator) = indicators.get_mut(entity) {
                indicator.on = true;
            }
        }
    }
}
