use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::game::math::{flatten, heading_angle, heading_from_angle, lift, try_direction, turn_left};
use crate::game::simulation::terrain::{ground_height, HeightQuery};
use super::boundary::{Boundary, EdgeViolation};
use super::orientation::orient_toward;

/// Periodic heading perturbation that turns straight lines into gentle curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    /// Peak turn rate in radians per second.
    pub amplitude: f32,
    /// Oscillation frequency in Hz.
    pub frequency_hz: f32,
}

impl Drift {
    /// Heading change over `dt` seconds starting at drift clock `t`.
    pub fn turn(&self, t: f32, dt: f32) -> f32 {
        let delta = (TAU * self.frequency_hz * t).sin() * self.amplitude * dt;
        if delta.is_finite() { delta } else { 0.0 }
    }
}

/// What an agent does when its next step would leave the wander area.
///
/// Also usable as a component to override the global policy per agent.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum BoundaryPolicy {
    /// Clamp to the edge, mirror the heading off it and add random angular jitter.
    ReflectJitter { jitter_degrees: f32 },
    /// Push slightly inside, turn onto the edge tangent (left-hand side) and take
    /// a short extra step along it.
    TurnLeft { epsilon: f32, follow_step: f32 },
}

/// Everything the wander controller needs to know about one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderState {
    pub position: Vec3,
    /// Unit direction in the XZ plane (`.y` is world Z). Zero means "stand still".
    pub heading: Vec2,
    pub speed: f32,
    pub drift: Option<Drift>,
    /// Seconds of drift time accumulated so far.
    pub clock: f32,
    pub facing: Quat,
}

/// Per-tick settings shared by all wandering agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderParams {
    pub bounds: Boundary,
    pub policy: BoundaryPolicy,
    pub turn_rate: f32,
    pub fallback_height: f32,
}

/// Result of one controller step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderStep {
    pub state: WanderState,
    /// Edge the candidate position crossed this tick, if any.
    pub violation: EdgeViolation,
}

/// Advance one agent by `dt` seconds.
///
/// Moves along the (optionally drifted) heading, resolves boundary hits with
/// `params.policy`, snaps height to the terrain and turns the facing toward
/// the new heading. `dt` below zero or non-finite is treated as zero, which
/// leaves the state untouched.
pub fn step_wander<R: Rng>(
    state: WanderState,
    dt: f32,
    params: &WanderParams,
    terrain: &dyn HeightQuery,
    rng: &mut R,
) -> WanderStep {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    if dt == 0.0 {
        return WanderStep { state, violation: EdgeViolation::None };
    }

    let mut next = state;
    next.clock = state.clock + dt;

    let mut planar = flatten(state.position);
    if !planar.is_finite() {
        planar = params.bounds.center();
    }

    // No usable heading: stay put, keep facing, only follow the ground
    let Some(mut heading) = try_direction(state.heading) else {
        let planar = params.bounds.clamp(planar);
        next.position = lift(planar, ground_height(terrain, planar, params.fallback_height));
        return WanderStep { state: next, violation: EdgeViolation::None };
    };

    if let Some(drift) = state.drift {
        heading = heading_from_angle(heading_angle(heading) + drift.turn(state.clock, dt));
    }

    let speed = if state.speed.is_finite() { state.speed.max(0.0) } else { 0.0 };
    let candidate = planar + heading * speed * dt;
    let violation = params.bounds.classify(candidate);

    let (planar, heading) = match (violation, params.policy) {
        (EdgeViolation::None, _) => (candidate, heading),
        (edge, BoundaryPolicy::ReflectJitter { jitter_degrees }) => {
            reflect_and_jitter(candidate, heading, edge, &params.bounds, jitter_degrees, rng)
        }
        (edge, BoundaryPolicy::TurnLeft { epsilon, follow_step }) => {
            turn_left_and_follow(candidate, heading, edge, &params.bounds, epsilon, follow_step)
        }
    };

    next.heading = heading;
    next.position = lift(planar, ground_height(terrain, planar, params.fallback_height));
    next.facing = orient_toward(state.facing, heading, params.turn_rate, dt);

    WanderStep { state: next, violation }
}

/// Clamp onto the edge, mirror the heading inward, then jitter it.
///
/// Jitter that would point the heading back out through the same edge is
/// discarded in favour of the plain reflection.
pub fn reflect_and_jitter<R: Rng>(
    candidate: Vec2,
    heading: Vec2,
    edge: EdgeViolation,
    bounds: &Boundary,
    jitter_degrees: f32,
    rng: &mut R,
) -> (Vec2, Vec2) {
    let committed = bounds.clamp(candidate);
    let normal = edge.inward_normal();

    let mut reflected = heading;
    if edge.is_x_edge() {
        reflected.x = normal.x * heading.x.abs();
    } else if edge.is_z_edge() {
        reflected.y = normal.y * heading.y.abs();
    }

    let jitter = jitter_degrees.abs().to_radians();
    if !(jitter > 0.0) {
        return (committed, reflected);
    }

    let jittered = heading_from_angle(heading_angle(reflected) + rng.random_range(-jitter..=jitter));
    if jittered.dot(normal) >= 0.0 {
        (committed, jittered)
    } else {
        (committed, reflected)
    }
}

/// Push just inside the edge and turn onto its tangent, toward the left.
///
/// The left-turn candidate `(x, z) -> (z, -x)` picks the sign; the heading is
/// then forced onto the edge's axis (±Z for an X edge, ±X for a Z edge) and
/// the agent takes `follow_step` extra distance along it.
pub fn turn_left_and_follow(
    candidate: Vec2,
    heading: Vec2,
    edge: EdgeViolation,
    bounds: &Boundary,
    epsilon: f32,
    follow_step: f32,
) -> (Vec2, Vec2) {
    let pushed = bounds.clamp_inset(candidate, epsilon);
    let turned = turn_left(heading);
    let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };

    let tangent = if edge.is_x_edge() {
        Vec2::new(0.0, sign(turned.y))
    } else {
        Vec2::new(sign(turned.x), 0.0)
    };

    let step = if follow_step.is_finite() { follow_step.max(0.0) } else { 0.0 };
    let committed = bounds.clamp_inset(pushed + tangent * step, epsilon);
    (committed, tangent)
}

#[cfg(test)]
#[path = "wander_tests.rs"]
mod tests;
