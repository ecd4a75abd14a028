use bevy::prelude::*;

/// Axis-aligned wander area in the XZ plane with an inner safety margin.
///
/// Agents are kept inside the *inner* rectangle `[min + margin, max - margin]`.
/// The constructor orders the corners and caps the margin at half the smaller
/// extent, so the inner rectangle is never inverted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    min: Vec2,
    max: Vec2,
    margin: f32,
}

/// Which edge of the inner rectangle a point lies beyond.
///
/// When several edges are violated (a corner), the first one in the order
/// MinX, MaxX, MinZ, MaxZ is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeViolation {
    None,
    MinX,
    MaxX,
    MinZ,
    MaxZ,
}

impl EdgeViolation {
    pub fn is_none(self) -> bool {
        self == EdgeViolation::None
    }

    pub fn is_x_edge(self) -> bool {
        matches!(self, EdgeViolation::MinX | EdgeViolation::MaxX)
    }

    pub fn is_z_edge(self) -> bool {
        matches!(self, EdgeViolation::MinZ | EdgeViolation::MaxZ)
    }

    /// Unit normal pointing back into the wander area.
    pub fn inward_normal(self) -> Vec2 {
        match self {
            EdgeViolation::None => Vec2::ZERO,
            EdgeViolation::MinX => Vec2::X,
            EdgeViolation::MaxX => Vec2::NEG_X,
            EdgeViolation::MinZ => Vec2::Y,
            EdgeViolation::MaxZ => Vec2::NEG_Y,
        }
    }
}

impl Boundary {
    pub fn new(a: Vec2, b: Vec2, margin: f32) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        let half_extent = ((max - min) * 0.5).min_element();
        let margin = if margin.is_finite() { margin.clamp(0.0, half_extent) } else { 0.0 };
        Self { min, max, margin }
    }

    pub fn min(&self) -> Vec2 {
        self.min
    }

    pub fn max(&self) -> Vec2 {
        self.max
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn inner_min(&self) -> Vec2 {
        self.min + Vec2::splat(self.margin)
    }

    pub fn inner_max(&self) -> Vec2 {
        self.max - Vec2::splat(self.margin)
    }

    /// Inner rectangle shrunk by a further `extra` on every side, collapsing
    /// onto the center on axes that are too narrow.
    pub fn inset(&self, extra: f32) -> (Vec2, Vec2) {
        let extra = if extra.is_finite() { extra.max(0.0) } else { 0.0 };
        let lo = self.inner_min() + Vec2::splat(extra);
        let hi = self.inner_max() - Vec2::splat(extra);
        let center = self.center();
        let lo = Vec2::new(lo.x.min(center.x), lo.y.min(center.y));
        let hi = Vec2::new(hi.x.max(center.x), hi.y.max(center.y));
        (lo, hi)
    }

    /// Classify `p` against the inner rectangle edges in fixed priority order.
    pub fn classify(&self, p: Vec2) -> EdgeViolation {
        let lo = self.inner_min();
        let hi = self.inner_max();
        if p.x < lo.x {
            EdgeViolation::MinX
        } else if p.x > hi.x {
            EdgeViolation::MaxX
        } else if p.y < lo.y {
            EdgeViolation::MinZ
        } else if p.y > hi.y {
            EdgeViolation::MaxZ
        } else {
            EdgeViolation::None
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let lo = self.inner_min();
        let hi = self.inner_max();
        p.x >= lo.x && p.x <= hi.x && p.y >= lo.y && p.y <= hi.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        self.clamp_inset(p, 0.0)
    }

    pub fn clamp_inset(&self, p: Vec2, extra: f32) -> Vec2 {
        let (lo, hi) = self.inset(extra);
        if !p.is_finite() {
            return self.center();
        }
        p.clamp(lo, hi)
    }
}
