/// Resource definitions for the simulation.
///
/// This module contains the typed runtime configuration, the tick counter,
/// the seeded random source and the debug toggles.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::game::animation::{BlendParams, GaitParams};
use crate::game::camera::FirstPersonParams;
use crate::game::proximity::LatchParams;
use crate::game::steering::{Boundary, BoundaryPolicy, Drift};

// ============================================================================
// Tick Counter
// ============================================================================

/// Number of fixed simulation ticks run so far.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

// ============================================================================
// Randomness
// ============================================================================

/// Seeded random source for boundary jitter. One shared stream keeps runs with
/// the same seed and spawn order reproducible.
#[derive(Resource, Debug, Clone)]
pub struct SteerRng {
    pub rng: StdRng,
    pub seed: u64,
}

impl SteerRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for SteerRng {
    fn default() -> Self {
        Self::new(42)
    }
}

// ============================================================================
// Simulation Configuration
// ============================================================================

/// Typed simulation parameters.
///
/// Built once from [`InitialConfig`](crate::game::config::InitialConfig) at
/// startup (see `systems_config`). The config file stays flat and
/// human-editable while every system reads ready-to-use values from here:
/// a validated [`Boundary`], a [`BoundaryPolicy`], latch/gait/blend parameter
/// blocks and so on.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    pub tick_rate: f64,
    pub bounds: Boundary,
    /// Global boundary policy; agents may override it with a component.
    pub policy: BoundaryPolicy,
    pub reflect_jitter_degrees: f32,
    pub turn_epsilon: f32,
    pub turn_follow_step: f32,
    pub agent_speed: f32,
    pub turn_rate: f32,
    pub drift: Option<Drift>,
    pub waypoint_arrive_distance: f32,
    pub fallback_height: f32,
    pub latch: LatchParams,
    pub gait: GaitParams,
    pub blend: BlendParams,
    pub idle_clip: String,
    pub walk_clip: String,
    pub rig_search_ticks: u32,
    pub first_person: FirstPersonParams,
}

impl SimConfig {
    /// Length of one fixed tick in seconds.
    pub fn fixed_dt(&self) -> f32 {
        if self.tick_rate > 0.0 {
            (1.0 / self.tick_rate) as f32
        } else {
            0.0
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            bounds: Boundary::new(Vec2::splat(-20.0), Vec2::splat(20.0), 1.0),
            policy: BoundaryPolicy::ReflectJitter { jitter_degrees: 20.0 },
            reflect_jitter_degrees: 20.0,
            turn_epsilon: 0.01,
            turn_follow_step: 0.05,
            agent_speed: 1.5,
            turn_rate: 6.0,
            drift: Some(Drift { amplitude: 0.6, frequency_hz: 0.15 }),
            waypoint_arrive_distance: 0.3,
            fallback_height: 0.0,
            latch: LatchParams::default(),
            gait: GaitParams::default(),
            blend: BlendParams::default(),
            idle_clip: "Idle".to_string(),
            walk_clip: "Walk".to_string(),
            rig_search_ticks: 120,
            first_person: FirstPersonParams::default(),
        }
    }
}

// ============================================================================
// Debug Configuration
// ============================================================================

/// Debug visualization settings
#[derive(Resource, Default)]
pub struct DebugConfig {
    pub show_bounds: bool,
    pub show_headings: bool,
}
