//! Planar helpers shared by the steering, animation and camera code.
//!
//! The simulation works in the horizontal XZ plane. A planar `Vec2` stores
//! world X in `.x` and world Z in `.y`; [`flatten`] and [`lift`] convert
//! between the two representations.

use bevy::prelude::*;

/// Squared length below which a direction is treated as "no motion".
pub const MIN_DIRECTION_LENGTH_SQ: f32 = 1.0e-12;

/// Drop the vertical component: world (x, y, z) -> planar (x, z).
pub fn flatten(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Planar (x, z) plus a height -> world position.
pub fn lift(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}

/// Normalize a planar direction, refusing zero-length or non-finite input.
pub fn try_direction(v: Vec2) -> Option<Vec2> {
    if !v.is_finite() {
        return None;
    }
    let len_sq = v.length_squared();
    if len_sq <= MIN_DIRECTION_LENGTH_SQ {
        return None;
    }
    Some(v / len_sq.sqrt())
}

/// Angle of a planar heading measured from +X toward +Z.
pub fn heading_angle(heading: Vec2) -> f32 {
    heading.y.atan2(heading.x)
}

/// Unit planar heading for an angle measured from +X toward +Z.
pub fn heading_from_angle(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Quarter turn "left": (x, z) -> (z, -x).
pub fn turn_left(heading: Vec2) -> Vec2 {
    Vec2::new(heading.y, -heading.x)
}

/// Rotation about +Y that points a model's +Z axis along `heading`.
pub fn facing_for_heading(heading: Vec2) -> Quat {
    Quat::from_rotation_y(heading.x.atan2(heading.y))
}

/// Frame-rate independent interpolation factor for exponential smoothing.
///
/// Returns 0 for non-positive rate or dt and never reaches 1 for finite input.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    if !(rate > 0.0) || !(dt > 0.0) {
        return 0.0;
    }
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_try_direction_rejects_degenerate_vectors() {
        assert_eq!(try_direction(Vec2::ZERO), None);
        assert_eq!(try_direction(Vec2::new(f32::NAN, 1.0)), None);
        assert_eq!(try_direction(Vec2::new(f32::INFINITY, 0.0)), None);

        let dir = try_direction(Vec2::new(3.0, 4.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_turn_left_is_a_quarter_turn() {
        assert_eq!(turn_left(Vec2::new(1.0, 0.0)), Vec2::new(0.0, -1.0));
        assert_eq!(turn_left(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 0.0));
        // Four left turns bring us home
        let h = Vec2::new(0.6, 0.8);
        let back = turn_left(turn_left(turn_left(turn_left(h))));
        assert!((back - h).length() < 1e-6);
    }

    #[test]
    fn test_heading_angle_round_trips_through_from_angle() {
        for angle in [-2.5_f32, -FRAC_PI_2, 0.0, 0.3, FRAC_PI_2, 3.0] {
            let h = heading_from_angle(angle);
            let back = heading_from_angle(heading_angle(h));
            assert!((back - h).length() < 1e-5, "angle {angle}");
        }
    }

    #[test]
    fn test_facing_points_model_forward_along_heading() {
        let heading = Vec2::new(1.0, 0.0);
        let forward = facing_for_heading(heading) * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-5);

        let heading = Vec2::new(0.0, -1.0);
        let forward = facing_for_heading(heading) * Vec3::Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_smoothing_factor_bounds() {
        assert_eq!(smoothing_factor(5.0, 0.0), 0.0);
        assert_eq!(smoothing_factor(0.0, 1.0), 0.0);
        assert_eq!(smoothing_factor(f32::NAN, 1.0), 0.0);
        let f = smoothing_factor(6.0, 1.0 / 60.0);
        assert!(f > 0.0 && f < 1.0);
    }

    #[test]
    fn test_flatten_and_lift() {
        let world = Vec3::new(1.0, 7.0, -2.0);
        assert_eq!(flatten(world), Vec2::new(1.0, -2.0));
        assert_eq!(lift(flatten(world), 7.0), world);
    }
}
