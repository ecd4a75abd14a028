use bevy::prelude::*;
use crate::game::math::{facing_for_heading, smoothing_factor, try_direction};

/// Turn `current` toward the facing for `heading` by spherical interpolation.
///
/// The interpolation factor is `1 - e^(-turn_rate * dt)`, so the turn never
/// completes in a single frame. A zero or non-finite heading leaves the facing
/// untouched, and a corrupted `current` is replaced by identity first.
pub fn orient_toward(current: Quat, heading: Vec2, turn_rate: f32, dt: f32) -> Quat {
    let current = if current.is_finite() && current.length_squared() > 0.0 {
        current.normalize()
    } else {
        Quat::IDENTITY
    };

    let Some(direction) = try_direction(heading) else {
        return current;
    };

    let t = smoothing_factor(turn_rate, dt);
    if t == 0.0 {
        return current;
    }

    current.slerp(facing_for_heading(direction), t).normalize()
}
