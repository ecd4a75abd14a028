use bevy::prelude::*;
use crate::game::math::try_direction;

use super::wander::Drift;

/// Steering state for an agent driven by the wander controller.
///
/// Position and facing live on the entity's `Transform`; this holds the rest.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WanderAgent {
    /// Unit planar direction (`.y` is world Z).
    pub heading: Vec2,
    pub speed: f32,
    pub drift: Option<Drift>,
    pub clock: f32,
}

impl WanderAgent {
    pub fn new(heading: Vec2, speed: f32, drift: Option<Drift>) -> Self {
        Self {
            heading: try_direction(heading).unwrap_or(Vec2::ZERO),
            speed: if speed.is_finite() { speed.max(0.0) } else { 0.0 },
            drift,
            clock: 0.0,
        }
    }
}
