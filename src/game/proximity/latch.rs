/// Tuning for the proximity latch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatchParams {
    /// Agents at most this far apart count as "near".
    pub proximity_distance: f32,
    /// Seconds of accumulated proximity needed to latch.
    pub sync_duration: f32,
    /// Timer gain per second while near.
    pub fill_rate: f32,
    /// Timer loss per second while apart. Faster than the fill so brief
    /// encounters do not add up.
    pub decay_rate: f32,
}

impl Default for LatchParams {
    fn default() -> Self {
        Self {
            proximity_distance: 5.0,
            sync_duration: 3.0,
            fill_rate: 1.0,
            decay_rate: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    Unsynced,
    Synced,
}

/// One-way latch driven by how long two agents have stayed close.
///
/// The timer lives in `[0, sync_duration]`. Once it reaches the duration the
/// latch is synced for good; later separation never clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityLatch {
    pub timer: f32,
    pub synced: bool,
}

impl ProximityLatch {
    pub fn state(&self) -> SyncState {
        if self.synced { SyncState::Synced } else { SyncState::Unsynced }
    }

    /// Feed one tick. Returns `true` only on the tick the latch becomes synced.
    ///
    /// A NaN distance counts as "not near".
    pub fn update(&mut self, distance: f32, dt: f32, params: &LatchParams) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let duration = params.sync_duration.max(0.0);
        let near = distance <= params.proximity_distance;

        let rate = if near { params.fill_rate } else { -params.decay_rate };
        let timer = self.timer + rate * dt;
        self.timer = if timer.is_finite() { timer.clamp(0.0, duration) } else { 0.0 };

        if self.synced || !near || self.timer < duration {
            return false;
        }
        self.synced = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LatchParams {
        LatchParams::default()
    }

    #[test]
    fn test_three_seconds_together_latches_once() {
        let mut latch = ProximityLatch::default();
        let mut fired = 0;
        for tick in 0..6 {
            if latch.update(1.0, 0.5, &params()) {
                fired += 1;
                assert_eq!(tick, 5, "should latch exactly at 3 s");
            }
        }
        assert_eq!(fired, 1);
        assert!(latch.synced);
        assert_eq!(latch.timer, 3.0);

        // Staying together does not fire again
        for _ in 0..10 {
            assert!(!latch.update(1.0, 0.5, &params()));
        }
    }

    #[test]
    fn test_separation_never_clears_synced() {
        let mut latch = ProximityLatch { timer: 3.0, synced: true };
        for _ in 0..20 {
            latch.update(100.0, 0.5, &params());
        }
        assert_eq!(latch.timer, 0.0);
        assert_eq!(latch.state(), SyncState::Synced);
    }

    #[test]
    fn test_timer_decays_faster_than_it_fills() {
        let mut latch = ProximityLatch::default();
        latch.update(1.0, 1.0, &params());
        latch.update(1.0, 1.0, &params());
        assert_eq!(latch.timer, 2.0);

        latch.update(10.0, 0.5, &params());
        assert_eq!(latch.timer, 1.0);
        latch.update(10.0, 1.0, &params());
        assert_eq!(latch.timer, 0.0, "clamped at zero");
        assert_eq!(latch.state(), SyncState::Unsynced);
    }

    #[test]
    fn test_boundary_distance_counts_as_near() {
        let mut latch = ProximityLatch::default();
        latch.update(5.0, 0.25, &params());
        assert_eq!(latch.timer, 0.25);
    }

    #[test]
    fn test_nan_distance_is_not_near() {
        let mut latch = ProximityLatch { timer: 1.0, synced: false };
        latch.update(f32::NAN, 0.25, &params());
        assert_eq!(latch.timer, 0.5);
    }

    #[test]
    fn test_interrupted_proximity_needs_longer() {
        let mut latch = ProximityLatch::default();
        // 2 s together, 0.5 s apart (loses 1 s), then 2 s together
        for _ in 0..4 {
            assert!(!latch.update(1.0, 0.5, &params()));
        }
        latch.update(10.0, 0.5, &params());
        assert_eq!(latch.timer, 1.0);

        let fired: Vec<bool> = (0..4).map(|_| latch.update(1.0, 0.5, &params())).collect();
        assert_eq!(fired, vec![false, false, false, true]);
    }

    #[test]
    fn test_bad_dt_does_nothing() {
        let mut latch = ProximityLatch { timer: 1.0, synced: false };
        latch.update(1.0, -1.0, &params());
        latch.update(1.0, f32::NAN, &params());
        assert_eq!(latch.timer, 1.0);
    }
}
