/// Walkable surfaces and height queries.
///
/// Agents re-derive their height every tick by asking a [`HeightQuery`] for
/// the highest surface under their horizontal position. When nothing is hit
/// the caller falls back to a configured default height.

use bevy::prelude::*;

/// Downward height probe at a horizontal (x, z) position.
pub trait HeightQuery {
    /// Height of the highest surface under (x, z), or `None` if nothing is hit.
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;
}

/// No walkable surface at all; every query misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerrain;

impl HeightQuery for NoTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> Option<f32> {
        None
    }
}

/// Infinite flat ground at a fixed height.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround(pub f32);

impl HeightQuery for FlatGround {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        (x.is_finite() && z.is_finite()).then_some(self.0)
    }
}

/// Regular grid of height samples with bilinear interpolation.
///
/// Samples are stored row-major: `heights[row * columns + column]`, columns
/// run along +X and rows along +Z starting at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    origin: Vec2,
    cell_size: f32,
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Returns `None` unless there are at least 2x2 samples, the sample count
    /// matches, and the cell size is positive.
    pub fn new(origin: Vec2, cell_size: f32, columns: usize, rows: usize, heights: Vec<f32>) -> Option<Self> {
        if columns < 2 || rows < 2 || heights.len() != columns * rows {
            return None;
        }
        if !(cell_size > 0.0) || !origin.is_finite() {
            return None;
        }
        Some(Self { origin, cell_size, columns, rows, heights })
    }

    pub fn max_corner(&self) -> Vec2 {
        self.origin + Vec2::new(
            (self.columns - 1) as f32 * self.cell_size,
            (self.rows - 1) as f32 * self.cell_size,
        )
    }

    fn sample(&self, column: usize, row: usize) -> f32 {
        self.heights[row * self.columns + column]
    }
}

impl HeightQuery for HeightField {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let max = self.max_corner();
        // Written so NaN coordinates miss
        if !(x >= self.origin.x && x <= max.x && z >= self.origin.y && z <= max.y) {
            return None;
        }

        let fx = (x - self.origin.x) / self.cell_size;
        let fz = (z - self.origin.y) / self.cell_size;
        let col = (fx.floor() as usize).min(self.columns - 2);
        let row = (fz.floor() as usize).min(self.rows - 2);
        let tx = (fx - col as f32).clamp(0.0, 1.0);
        let tz = (fz - row as f32).clamp(0.0, 1.0);

        let h00 = self.sample(col, row);
        let h10 = self.sample(col + 1, row);
        let h01 = self.sample(col, row + 1);
        let h11 = self.sample(col + 1, row + 1);

        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        Some(near + (far - near) * tz)
    }
}

/// One walkable surface inside a [`Terrain`].
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Flat rectangle spanning `min..=max` in XZ.
    Plane { min: Vec2, max: Vec2, height: f32 },
    Field(HeightField),
}

impl HeightQuery for Surface {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        match self {
            Surface::Plane { min, max, height } => {
                let inside = x >= min.x && x <= max.x && z >= min.y && z <= max.y;
                inside.then_some(*height)
            }
            Surface::Field(field) => field.height_at(x, z),
        }
    }
}

/// Walkable world geometry: the highest surface under a point wins.
#[derive(Resource, Debug, Clone, Default)]
pub struct Terrain {
    surfaces: Vec<Surface>,
}

impl Terrain {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl HeightQuery for Terrain {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self.surfaces
            .iter()
            .filter_map(|surface| surface.height_at(x, z))
            .filter(|h| h.is_finite())
            .reduce(f32::max)
    }
}

/// Height under `p`, or `fallback` when no finite surface is hit.
pub fn ground_height(terrain: &dyn HeightQuery, p: Vec2, fallback: f32) -> f32 {
    terrain
        .height_at(p.x, p.y)
        .filter(|h| h.is_finite())
        .unwrap_or(fallback)
}

#[cfg(test)]
#[path = "terrain_tests.rs"]
mod tests;
