/// Planar steering: the wander controller, waypoint following and the
/// boundary/orientation helpers they share.
///
/// The per-tick algorithms are plain functions over explicit state
/// ([`step_wander`], [`WaypointRoute::advance`], [`orient_toward`]); the
/// systems in `systems` only copy ECS data in and out.

use bevy::prelude::*;
use crate::game::simulation::SimSet;

mod boundary;
mod components;
mod orientation;
mod systems;
mod wander;
mod waypoints;

pub use boundary::{Boundary, EdgeViolation};
pub use components::WanderAgent;
pub use orientation::orient_toward;
pub use systems::{follow_waypoints, wander_agents};
pub use wander::{
    reflect_and_jitter, step_wander, turn_left_and_follow, BoundaryPolicy, Drift, WanderParams, WanderState,
    WanderStep,
};
pub use waypoints::{WaypointFollower, WaypointRoute, WaypointStep};

pub struct SteeringPlugin;

impl Plugin for SteeringPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (wander_agents, follow_waypoints).in_set(SimSet::Steering),
        );
    }
}
