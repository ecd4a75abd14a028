/// Configuration initialization systems
///
/// Turns the flat, file-friendly [`InitialConfig`] into the typed
/// [`SimConfig`] every simulation system reads, sanitizing values that would
/// break the controller invariants.

use bevy::prelude::*;
use crate::game::animation::{BlendParams, GaitParams};
use crate::game::camera::FirstPersonParams;
use crate::game::config::{BoundaryPolicyKind, InitialConfig};
use crate::game::proximity::LatchParams;
use crate::game::steering::{Boundary, BoundaryPolicy, Drift};

use super::resources::*;
use super::terrain::{Surface, Terrain};

fn non_negative(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!("{} = {} is invalid, using {}", name, value, default);
        default
    }
}

fn finite(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!("{} = {} is not finite, using {}", name, value, default);
        default
    }
}

fn positive(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("{} = {} must be positive, using {}", name, value, default);
        default
    }
}

impl SimConfig {
    pub fn from_initial(config: &InitialConfig) -> Self {
        let defaults = SimConfig::default();

        let tick_rate = if config.tick_rate.is_finite() && config.tick_rate > 0.0 {
            config.tick_rate
        } else {
            warn!("tick_rate = {} is invalid, using {}", config.tick_rate, defaults.tick_rate);
            defaults.tick_rate
        };

        let a = Vec2::new(config.bounds_min.0, config.bounds_min.1);
        let b = Vec2::new(config.bounds_max.0, config.bounds_max.1);
        let bounds = if a.is_finite() && b.is_finite() {
            if a.x > b.x || a.y > b.y {
                warn!("bounds_min {:?} and bounds_max {:?} are swapped, reordering", a, b);
            }
            let bounds = Boundary::new(a, b, config.bounds_margin);
            if bounds.margin() != config.bounds_margin {
                warn!("bounds_margin = {} does not fit the bounds, using {}", config.bounds_margin, bounds.margin());
            }
            bounds
        } else {
            warn!("bounds are not finite, using defaults");
            defaults.bounds
        };

        let drift_amplitude = non_negative("drift_amplitude", config.drift_amplitude, 0.0);
        let drift_frequency = non_negative("drift_frequency", config.drift_frequency, 0.0);
        let drift = (drift_amplitude > 0.0 && drift_frequency > 0.0)
            .then_some(Drift { amplitude: drift_amplitude, frequency_hz: drift_frequency });

        let mut sim = SimConfig {
            tick_rate,
            bounds,
            policy: defaults.policy,
            reflect_jitter_degrees: non_negative("reflect_jitter_degrees", config.reflect_jitter_degrees.abs(), 0.0),
            turn_epsilon: non_negative("turn_epsilon", config.turn_epsilon, defaults.turn_epsilon),
            turn_follow_step: non_negative("turn_follow_step", config.turn_follow_step, defaults.turn_follow_step),
            agent_speed: non_negative("agent_speed", config.agent_speed, defaults.agent_speed),
            turn_rate: non_negative("turn_rate", config.turn_rate, defaults.turn_rate),
            drift,
            waypoint_arrive_distance: non_negative(
                "waypoint_arrive_distance",
                config.waypoint_arrive_distance,
                defaults.waypoint_arrive_distance,
            ),
            fallback_height: if config.fallback_height.is_finite() { config.fallback_height } else { 0.0 },
            latch: LatchParams {
                proximity_distance: non_negative("proximity_distance", config.proximity_distance, 5.0),
                sync_duration: non_negative("sync_duration", config.sync_duration, 3.0),
                fill_rate: non_negative("sync_fill_rate", config.sync_fill_rate, 1.0),
                decay_rate: non_negative("sync_decay_rate", config.sync_decay_rate, 2.0),
            },
            gait: GaitParams {
                phase_rate: non_negative("walk_phase_rate", config.walk_phase_rate, 3.0),
                swing: finite("walk_swing", config.walk_swing, 0.5),
                arm_ratio: finite("walk_arm_ratio", config.walk_arm_ratio, 0.5),
                tail_swing: finite("tail_swing", config.tail_swing, 0.5),
                tail_frequency: non_negative("tail_frequency", config.tail_frequency, 2.0),
                ..GaitParams::default()
            },
            blend: BlendParams {
                walk_speed: positive("blend_walk_speed", config.blend_walk_speed, 1.5),
                blend_rate: non_negative("blend_rate", config.blend_rate, 5.0),
            },
            idle_clip: config.idle_clip.clone(),
            walk_clip: config.walk_clip.clone(),
            rig_search_ticks: config.rig_search_ticks,
            first_person: FirstPersonParams {
                speed: non_negative("first_person_speed", config.first_person_speed, 4.0),
                eye_height: if config.eye_height.is_finite() { config.eye_height } else { 1.6 },
                ..FirstPersonParams::default()
            },
        };
        sim.policy = sim.policy_for(config.boundary_policy);
        sim
    }

    /// Concrete policy for a config-file policy name, using this config's
    /// jitter and turn parameters.
    pub fn policy_for(&self, kind: BoundaryPolicyKind) -> BoundaryPolicy {
        match kind {
            BoundaryPolicyKind::Reflect => BoundaryPolicy::ReflectJitter { jitter_degrees: self.reflect_jitter_degrees },
            BoundaryPolicyKind::TurnLeft => BoundaryPolicy::TurnLeft {
                epsilon: self.turn_epsilon,
                follow_step: self.turn_follow_step,
            },
        }
    }
}

/// Build the terrain described by the config's planes.
pub fn terrain_from_initial(config: &InitialConfig) -> Vec<Surface> {
    config
        .terrain_planes
        .iter()
        .filter(|plane| plane.height.is_finite())
        .map(|plane| {
            let a = Vec2::new(plane.min.0, plane.min.1);
            let b = Vec2::new(plane.max.0, plane.max.1);
            Surface::Plane { min: a.min(b), max: a.max(b), height: plane.height }
        })
        .collect()
}

/// Initialize SimConfig from InitialConfig at startup
pub fn init_sim_config_from_initial(
    mut fixed_time: ResMut<Time<Fixed>>,
    mut sim_config: ResMut<SimConfig>,
    mut rng: ResMut<SteerRng>,
    terrain: Option<ResMut<Terrain>>,
    initial_config: Option<Res<InitialConfig>>,
    mut commands: Commands,
) {
    info!("Initializing SimConfig from InitialConfig");

    let config = match initial_config {
        Some(cfg) => cfg.clone(),
        None => {
            warn!("InitialConfig not found, using defaults");
            InitialConfig::default()
        }
    };
    let config = &config;

    *sim_config = SimConfig::from_initial(config);
    fixed_time.set_timestep_seconds(1.0 / sim_config.tick_rate);
    *rng = SteerRng::new(config.rng_seed);

    let surfaces = terrain_from_initial(config);
    if !surfaces.is_empty() {
        info!("Terrain: {} planes from config", surfaces.len());
        match terrain {
            Some(mut terrain) => {
                for surface in surfaces {
                    terrain.add_surface(surface);
                }
            }
            None => {
                commands.insert_resource(Terrain::new(surfaces));
            }
        }
    }

    info!(
        "SimConfig initialized: {} Hz, bounds {:?}..{:?} (margin {}), policy {:?}, seed {}",
        sim_config.tick_rate,
        sim_config.bounds.min(),
        sim_config.bounds.max(),
        sim_config.bounds.margin(),
        sim_config.policy,
        config.rng_seed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_initial_copies_and_builds_policy() {
        let config = InitialConfig {
            tick_rate: 30.0,
            boundary_policy: BoundaryPolicyKind::TurnLeft,
            turn_epsilon: 0.02,
            turn_follow_step: 0.1,
            ..default()
        };
        let sim = SimConfig::from_initial(&config);
        assert_eq!(sim.tick_rate, 30.0);
        assert_eq!(sim.policy, BoundaryPolicy::TurnLeft { epsilon: 0.02, follow_step: 0.1 });
        assert_eq!(
            sim.policy_for(BoundaryPolicyKind::Reflect),
            BoundaryPolicy::ReflectJitter { jitter_degrees: 20.0 }
        );
    }

    #[test]
    fn test_invalid_values_are_sanitized() {
        let config = InitialConfig {
            tick_rate: 0.0,
            bounds_min: (5.0, 5.0),
            bounds_max: (-5.0, -5.0),
            bounds_margin: 100.0,
            agent_speed: -1.0,
            sync_duration: f32::NAN,
            ..default()
        };
        let sim = SimConfig::from_initial(&config);
        assert_eq!(sim.tick_rate, 60.0);
        assert_eq!(sim.bounds.min(), Vec2::splat(-5.0));
        assert_eq!(sim.bounds.margin(), 5.0);
        assert_eq!(sim.agent_speed, 1.5);
        assert_eq!(sim.latch.sync_duration, 3.0);
    }

    #[test]
    fn test_non_finite_gait_values_fall_back() {
        let config = InitialConfig {
            walk_swing: f32::NAN,
            walk_arm_ratio: f32::INFINITY,
            tail_swing: f32::NAN,
            tail_frequency: -1.0,
            ..default()
        };
        let gait = SimConfig::from_initial(&config).gait;
        assert_eq!(gait.swing, 0.5);
        assert_eq!(gait.arm_ratio, 0.5);
        assert_eq!(gait.tail_swing, 0.5);
        assert_eq!(gait.tail_frequency, 2.0);

        let pose = crate::game::animation::GaitPose::sample(1.0, &gait);
        assert!(pose.left_leg.is_finite() && pose.tail_yaw.is_finite());
    }

    #[test]
    fn test_zero_drift_disables_it() {
        let config = InitialConfig { drift_amplitude: 0.0, ..default() };
        assert_eq!(SimConfig::from_initial(&config).drift, None);
        assert!(SimConfig::from_initial(&InitialConfig::default()).drift.is_some());
    }
}
