/// Debug visualization systems for the simulation.
///
/// Gizmo overlays for the wander area (outer rectangle plus the inner
/// margin rectangle) and for each agent's heading versus its facing.

use bevy::prelude::*;
use crate::game::agent::Agent;
use crate::game::config::{RuntimeConfig, RuntimeConfigHandle};
use crate::game::math::lift;
use crate::game::steering::{WanderAgent, WaypointRoute};
use super::resources::{DebugConfig, SimConfig};

/// Gizmo overlays; only added by the windowed game.
pub struct SimulationDebugPlugin;

impl Plugin for SimulationDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (toggle_debug, draw_bounds, draw_headings, draw_routes));
    }
}

// ============================================================================
// Debug Toggle
// ============================================================================

/// Toggle debug visualization modes with keyboard
pub fn toggle_debug(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_config: ResMut<DebugConfig>,
    config_handle: Option<Res<RuntimeConfigHandle>>,
    runtime_configs: Option<Res<Assets<RuntimeConfig>>>,
) {
    let config = RuntimeConfig::current(config_handle.as_deref(), runtime_configs.as_deref());

    if keyboard.just_pressed(config.key_debug_bounds) {
        debug_config.show_bounds = !debug_config.show_bounds;
        info!("Bounds debug: {}", debug_config.show_bounds);
    }
    if keyboard.just_pressed(config.key_debug_headings) {
        debug_config.show_headings = !debug_config.show_headings;
        info!("Heading debug: {}", debug_config.show_headings);
    }
}

// ============================================================================
// Gizmos
// ============================================================================

fn rectangle(gizmos: &mut Gizmos, min: Vec2, max: Vec2, y: f32, color: Color) {
    let corners = [
        lift(min, y),
        lift(Vec2::new(max.x, min.y), y),
        lift(max, y),
        lift(Vec2::new(min.x, max.y), y),
        lift(min, y),
    ];
    gizmos.linestrip(corners, color);
}

/// Outer bounds in red, the margin-inset rectangle agents stay inside in yellow
pub fn draw_bounds(debug_config: Res<DebugConfig>, sim_config: Res<SimConfig>, mut gizmos: Gizmos) {
    if !debug_config.show_bounds {
        return;
    }

    let y = sim_config.fallback_height + 0.05;
    let bounds = &sim_config.bounds;
    rectangle(&mut gizmos, bounds.min(), bounds.max(), y, Color::srgb(1.0, 0.2, 0.2));
    rectangle(&mut gizmos, bounds.inner_min(), bounds.inner_max(), y, Color::srgb(1.0, 1.0, 0.0));
}

/// Travel heading (green) against the direction the agent is facing (blue)
pub fn draw_headings(
    query: Query<(&Transform, &WanderAgent), With<Agent>>,
    debug_config: Res<DebugConfig>,
    mut gizmos: Gizmos,
) {
    if !debug_config.show_headings {
        return;
    }

    for (transform, agent) in query.iter() {
        let origin = transform.translation + Vec3::Y * 0.6;
        gizmos.arrow(origin, origin + lift(agent.heading, 0.0) * 1.5, Color::srgb(0.0, 1.0, 0.0));
        gizmos.arrow(origin, origin + transform.back() * 1.0, Color::srgb(0.2, 0.4, 1.0));
    }
}

/// Remaining waypoints of every unfinished route
pub fn draw_routes(
    query: Query<(&Transform, &WaypointRoute), With<Agent>>,
    debug_config: Res<DebugConfig>,
    mut gizmos: Gizmos,
) {
    if !debug_config.show_headings {
        return;
    }

    for (transform, route) in query.iter() {
        let Some(target) = route.current_target() else { continue };
        let mut current = transform.translation + Vec3::Y * 0.6;
        let mut next = lift(target, current.y);
        gizmos.line(current, next, Color::srgb(0.0, 1.0, 1.0));
        gizmos.sphere(next, 0.2, Color::srgb(0.0, 1.0, 1.0));
        for point in route.points.iter().skip(route.index + 1) {
            current = next;
            next = lift(*point, current.y);
            gizmos.line(current, next, Color::srgb(0.0, 0.6, 0.6));
        }
    }
}
