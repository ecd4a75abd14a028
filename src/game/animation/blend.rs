use bevy::prelude::*;
use crate::game::math::smoothing_factor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    /// Observed speed at which the walk clip reaches full weight.
    pub walk_speed: f32,
    /// Exponential approach rate of the current weight toward the target.
    pub blend_rate: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,
            blend_rate: 5.0,
        }
    }
}

/// Idle/walk clip influence. Only the walk weight is stored; idle is its
/// complement, so the two always sum to 1.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipWeights {
    walk: f32,
}

impl ClipWeights {
    pub fn walk(&self) -> f32 {
        self.walk
    }

    pub fn idle(&self) -> f32 {
        1.0 - self.walk
    }

    /// Walk weight an agent moving at `speed` should settle on.
    pub fn target_walk(speed: f32, params: &BlendParams) -> f32 {
        if !(params.walk_speed > 0.0) {
            return if speed > 0.0 { 1.0 } else { 0.0 };
        }
        let ratio = speed / params.walk_speed;
        if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
    }

    pub fn blend_toward(&mut self, speed: f32, dt: f32, params: &BlendParams) {
        let target = Self::target_walk(speed, params);
        let t = smoothing_factor(params.blend_rate, dt);
        self.walk = (self.walk + (target - self.walk) * t).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_follows_speed_ratio() {
        let params = BlendParams::default();
        assert_eq!(ClipWeights::target_walk(0.0, &params), 0.0);
        assert_eq!(ClipWeights::target_walk(0.75, &params), 0.5);
        assert_eq!(ClipWeights::target_walk(10.0, &params), 1.0);
        assert_eq!(ClipWeights::target_walk(-1.0, &params), 0.0);
        assert_eq!(ClipWeights::target_walk(f32::NAN, &params), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one_and_converge() {
        let params = BlendParams::default();
        let mut weights = ClipWeights::default();
        assert_eq!(weights.idle(), 1.0);

        let mut last = weights.walk();
        for _ in 0..300 {
            weights.blend_toward(1.5, 1.0 / 60.0, &params);
            assert!((weights.walk() + weights.idle() - 1.0).abs() < 1e-6);
            assert!(weights.walk() >= last, "approaches monotonically");
            last = weights.walk();
        }
        assert!(weights.walk() > 0.99);

        for _ in 0..300 {
            weights.blend_toward(0.0, 1.0 / 60.0, &params);
        }
        assert!(weights.idle() > 0.99);
    }

    #[test]
    fn test_zero_dt_keeps_weights() {
        let params = BlendParams::default();
        let mut weights = ClipWeights::default();
        weights.blend_toward(3.0, 0.0, &params);
        assert_eq!(weights.walk(), 0.0);
    }
}
