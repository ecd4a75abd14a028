/// Core simulation systems: tick bookkeeping and periodic status logging.

use bevy::prelude::*;
use crate::game::agent::Agent;
use crate::game::loading::ModelReady;
use crate::game::proximity::ProximityRegistry;
use meander_macros::profile;

use super::resources::*;

// ============================================================================
// Tick Management
// ============================================================================

/// Increment the global simulation tick counter.
///
/// Runs first in FixedUpdate so every later system sees the current tick for
/// tick-gated logging.
pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

// ============================================================================
// Status
// ============================================================================

/// Log simulation status periodically
#[profile(4)]
pub fn sim_status(
    #[allow(unused_variables)] agents: Query<Has<ModelReady>, With<Agent>>,
    #[allow(unused_variables)] registry: Option<Res<ProximityRegistry>>,
    #[allow(unused_variables)] rng: Res<SteerRng>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    use crate::profile_log;

    profile_log!(
        tick,
        "[SIM STATUS] Tick: {} | Agents: {} ({} ready) | Pairs: {} ({} synced) | Seed: {}",
        tick.0,
        agents.iter().count(),
        agents.iter().filter(|ready| *ready).count(),
        registry.as_ref().map_or(0, |r| r.len()),
        registry.as_ref().map_or(0, |r| r.sorted_pairs().iter().filter(|p| r.is_synced(p.0, p.1)).count()),
        rng.seed
    );
}
