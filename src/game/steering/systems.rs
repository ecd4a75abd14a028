use bevy::prelude::*;
use meander_macros::profile;
use crate::profile_log;
use crate::game::agent::Agent;
use crate::game::loading::ModelReady;
use crate::game::math::{flatten, lift};
use crate::game::simulation::terrain::{ground_height, HeightQuery, NoTerrain, Terrain};
use crate::game::simulation::{SimConfig, SimTick, SteerRng};

use super::components::WanderAgent;
use super::orientation::orient_toward;
use super::wander::{step_wander, BoundaryPolicy, WanderParams, WanderState};
use super::waypoints::{WaypointFollower, WaypointRoute};

/// Advance every ready wandering agent by one fixed tick.
///
/// The global boundary policy comes from [`SimConfig`]; an agent carrying its
/// own [`BoundaryPolicy`] component uses that instead.
#[profile(2)]
pub fn wander_agents(
    mut query: Query<(Entity, &mut Transform, &mut WanderAgent, Option<&BoundaryPolicy>), (With<Agent>, With<ModelReady>)>,
    sim_config: Res<SimConfig>,
    terrain: Option<Res<Terrain>>,
    mut rng: ResMut<SteerRng>,
    #[allow(unused_variables)] tick: Res<SimTick>,
) {
    let dt = sim_config.fixed_dt();
    let terrain: &dyn HeightQuery = match terrain.as_deref() {
        Some(terrain) => terrain,
        None => &NoTerrain,
    };

    #[cfg(feature = "perf_stats")]
    let mut hits = 0usize;
    for (entity, mut transform, mut agent, policy) in query.iter_mut() {
        let params = WanderParams {
            bounds: sim_config.bounds,
            policy: policy.copied().unwrap_or(sim_config.policy),
            turn_rate: sim_config.turn_rate,
            fallback_height: sim_config.fallback_height,
        };
        let state = WanderState {
            position: transform.translation,
            heading: agent.heading,
            speed: agent.speed,
            drift: agent.drift,
            clock: agent.clock,
            facing: transform.rotation,
        };

        let step = step_wander(state, dt, &params, terrain, &mut rng.rng);

        if !step.violation.is_none() {
            #[cfg(feature = "perf_stats")]
            {
                hits += 1;
            }
            debug!("{:?} hit {:?}, new heading {:?}", entity, step.violation, step.state.heading);
        }

        agent.heading = step.state.heading;
        agent.clock = step.state.clock;
        transform.translation = step.state.position;
        transform.rotation = step.state.facing;
    }

    profile_log!(tick, "[WANDER] {} agents, {} boundary hits this tick", query.iter().count(), hits);
}

/// Walk agents along their waypoint routes, kept inside the wander area and
/// on the ground.
pub fn follow_waypoints(
    mut query: Query<(Entity, &mut Transform, &mut WaypointRoute, &WaypointFollower), (With<Agent>, With<ModelReady>)>,
    sim_config: Res<SimConfig>,
    terrain: Option<Res<Terrain>>,
) {
    let dt = sim_config.fixed_dt();
    let terrain: &dyn HeightQuery = match terrain.as_deref() {
        Some(terrain) => terrain,
        None => &NoTerrain,
    };

    for (entity, mut transform, mut route, follower) in query.iter_mut() {
        if route.finished {
            continue;
        }

        let step = route.advance(flatten(transform.translation), follower.speed, dt);
        let planar = sim_config.bounds.clamp(step.position);
        transform.translation = lift(planar, ground_height(terrain, planar, sim_config.fallback_height));

        if let Some(heading) = step.heading {
            transform.rotation = orient_toward(transform.rotation, heading, sim_config.turn_rate, dt);
        }

        if route.finished {
            info!("{:?} finished its route at ({:.2}, {:.2})", entity, planar.x, planar.y);
        }
    }
}
