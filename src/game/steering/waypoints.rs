use bevy::prelude::*;
use smallvec::SmallVec;

use super::boundary::Boundary;

/// Ordered list of horizontal points an agent walks through.
///
/// Points are planar (`.y` is world Z). Looped routes wrap back to the first
/// point; unlooped routes mark themselves finished at the last one and stop.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct WaypointRoute {
    pub points: SmallVec<[Vec2; 8]>,
    pub index: usize,
    pub looped: bool,
    pub arrive_distance: f32,
    pub finished: bool,
}

/// Movement speed for agents on a route (units per second).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct WaypointFollower {
    pub speed: f32,
}

/// Outcome of advancing along a route for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaypointStep {
    pub position: Vec2,
    /// Direction actually travelled, `None` if the agent did not move.
    pub heading: Option<Vec2>,
}

impl WaypointRoute {
    pub fn new(points: impl IntoIterator<Item = Vec2>, looped: bool, arrive_distance: f32) -> Self {
        let points: SmallVec<[Vec2; 8]> = points.into_iter().filter(|p| p.is_finite()).collect();
        Self {
            finished: points.is_empty(),
            points,
            index: 0,
            looped,
            arrive_distance: if arrive_distance.is_finite() { arrive_distance.max(0.0) } else { 0.0 },
        }
    }

    /// Pull every point into the inner rectangle of `bounds`, where agents
    /// are allowed to stand. Returns how many points moved.
    pub fn clamp_into(&mut self, bounds: &Boundary) -> usize {
        let mut moved = 0;
        for point in self.points.iter_mut() {
            let clamped = bounds.clamp(*point);
            if clamped != *point {
                *point = clamped;
                moved += 1;
            }
        }
        moved
    }

    pub fn current_target(&self) -> Option<Vec2> {
        if self.finished {
            return None;
        }
        self.points.get(self.index).copied()
    }

    fn arrive(&mut self) {
        if self.index + 1 < self.points.len() {
            self.index += 1;
        } else if self.looped {
            self.index = 0;
        } else {
            self.finished = true;
        }
    }

    /// Move `position` toward the current waypoint by `speed * dt`.
    ///
    /// Distance left over after reaching a waypoint carries on toward the next
    /// one, so fast agents do not stall on dense routes. At most one full lap
    /// is walked per call.
    pub fn advance(&mut self, position: Vec2, speed: f32, dt: f32) -> WaypointStep {
        let idle = WaypointStep { position, heading: None };
        if !(speed > 0.0) || !(dt > 0.0) || !position.is_finite() {
            return idle;
        }

        let mut budget = speed * dt;
        let mut current = position;
        let mut heading = None;

        for _ in 0..=self.points.len() {
            let Some(target) = self.current_target() else { break };
            let to_target = target - current;
            let distance = to_target.length();

            if distance <= self.arrive_distance {
                self.arrive();
                continue;
            }
            if budget <= 0.0 {
                break;
            }

            let direction = to_target / distance;
            heading = Some(direction);
            if budget >= distance {
                // Overshoot lands on the point and spends the rest on the next leg
                current = target;
                budget -= distance;
                self.arrive();
            } else {
                current += direction * budget;
                budget = 0.0;
            }
        }

        WaypointStep { position: current, heading }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(looped: bool) -> WaypointRoute {
        WaypointRoute::new(
            [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0)],
            looped,
            0.1,
        )
    }

    #[test]
    fn test_moves_toward_current_waypoint() {
        let mut route = square(true);
        route.index = 1;
        let step = route.advance(Vec2::ZERO, 2.0, 0.5);
        assert_eq!(step.position, Vec2::new(1.0, 0.0));
        assert_eq!(step.heading, Some(Vec2::X));
        assert_eq!(route.index, 1);
    }

    #[test]
    fn test_arrival_advances_index() {
        let mut route = square(true);
        // Already standing on waypoint 0: it is consumed and we head for 1
        let step = route.advance(Vec2::new(0.05, 0.0), 1.0, 0.5);
        assert_eq!(route.index, 1);
        assert_eq!(step.heading, Some(Vec2::X));
        assert!((step.position - Vec2::new(0.55, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_overshoot_carries_over_to_next_leg() {
        let mut route = square(true);
        route.index = 1;
        let step = route.advance(Vec2::new(3.0, 0.0), 2.0, 1.0);
        assert_eq!(route.index, 2);
        assert!((step.position - Vec2::new(4.0, 1.0)).length() < 1e-6);
        assert_eq!(step.heading, Some(Vec2::Y));
    }

    #[test]
    fn test_looped_route_wraps() {
        let mut route = square(true);
        route.index = 3;
        route.advance(Vec2::new(0.0, 3.95), 1.0, 0.1);
        assert_eq!(route.index, 0);
        assert!(!route.finished);
    }

    #[test]
    fn test_unlooped_route_finishes_and_stops() {
        let mut route = square(false);
        route.index = 3;
        let step = route.advance(Vec2::new(0.0, 3.5), 1.0, 1.0);
        assert!(route.finished);
        assert_eq!(step.position, Vec2::new(0.0, 4.0));

        let after = route.advance(step.position, 1.0, 1.0);
        assert_eq!(after.position, step.position);
        assert_eq!(after.heading, None);
    }

    #[test]
    fn test_empty_route_and_bad_speed_do_not_move() {
        let mut empty = WaypointRoute::new(Vec::<Vec2>::new(), true, 0.1);
        assert!(empty.finished);
        assert_eq!(empty.advance(Vec2::ONE, 3.0, 0.1).position, Vec2::ONE);

        let mut route = square(true);
        route.index = 1;
        assert_eq!(route.advance(Vec2::ZERO, 0.0, 0.1).heading, None);
        assert_eq!(route.advance(Vec2::ZERO, -2.0, 0.1).position, Vec2::ZERO);
        assert_eq!(route.advance(Vec2::ZERO, f32::NAN, 0.1).position, Vec2::ZERO);
        assert_eq!(route.advance(Vec2::ZERO, 2.0, 0.0).position, Vec2::ZERO);
    }

    #[test]
    fn test_single_point_loop_does_not_spin_forever() {
        let mut route = WaypointRoute::new([Vec2::ZERO], true, 0.5);
        let step = route.advance(Vec2::ZERO, 10.0, 1.0);
        assert_eq!(step.position, Vec2::ZERO);
        assert_eq!(route.index, 0);
    }

    #[test]
    fn test_points_outside_bounds_are_pulled_in_and_reached() {
        let bounds = Boundary::new(Vec2::splat(-5.0), Vec2::splat(5.0), 1.0);
        let mut route = WaypointRoute::new([Vec2::new(4.8, 0.0), Vec2::ZERO], false, 0.3);
        assert_eq!(route.clamp_into(&bounds), 1);
        assert_eq!(route.points[0], Vec2::new(4.0, 0.0));
        assert_eq!(route.clamp_into(&bounds), 0);

        // Same composition as the follow system: advance, then clamp
        let mut position = Vec2::ZERO;
        for _ in 0..600 {
            position = bounds.clamp(route.advance(position, 2.0, 1.0 / 60.0).position);
        }
        assert!(route.finished);
        assert!(position.length() <= 0.3 + 1e-4);
    }

    #[test]
    fn test_non_finite_points_are_dropped() {
        let route = WaypointRoute::new([Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::ONE], false, 0.1);
        assert_eq!(route.points.len(), 2);
    }
}
