//! Square heightfield produced by terrain synthesis.

use std::time::Instant;

use crate::errors::{Result, TerrainError};
use crate::models::{NormPoint, TerrainParameters};

/// `resolution × resolution` elevations in `[0, max_height]`, row-major
/// (`y` rows of `x` columns). Built whole and never edited cell by cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    resolution: usize,
    max_height: f64,
    heights: Vec<f64>,
}

impl HeightGrid {
    /// Synthesises the grid for a terrain kind.
    pub fn generate(params: &TerrainParameters) -> Self {
        let started = Instant::now();
        let grid = Self::sample(params.resolution, params.max_height, |nx, ny| {
            params.kind.elevation(nx, ny)
        });
        tracing::info!(
            "Generated {} grid {}x{} (max {}m) in {:.1}ms",
            params.kind,
            params.resolution,
            params.resolution,
            params.max_height,
            started.elapsed().as_secs_f64() * 1000.0
        );
        grid
    }

    /// Builds a grid from any shape over terrain-local coordinates.
    ///
    /// Cell `(x, y)` samples `shape(x / res - 0.5, y / res - 0.5)`. The factor
    /// is clamped to `[0, 1]` before scaling by `max_height`, so every stored
    /// height lies in `[0, max_height]`. Fails on the same bounds as
    /// [`TerrainParameters::new`].
    pub fn from_fn(
        resolution: usize,
        max_height: f64,
        shape: impl Fn(f64, f64) -> f64,
    ) -> Result<Self> {
        if resolution < 2 {
            return Err(TerrainError::InvalidResolution(resolution));
        }
        if !max_height.is_finite() || max_height <= 0.0 {
            return Err(TerrainError::InvalidMaxHeight(max_height));
        }
        Ok(Self::sample(resolution, max_height, shape))
    }

    fn sample(resolution: usize, max_height: f64, shape: impl Fn(f64, f64) -> f64) -> Self {
        let res = resolution as f64;
        let mut heights = Vec::with_capacity(resolution * resolution);

        for y in 0..resolution {
            let ny = y as f64 / res - 0.5;
            for x in 0..resolution {
                let nx = x as f64 / res - 0.5;
                heights.push(shape(nx, ny).clamp(0.0, 1.0) * max_height);
            }
        }

        Self {
            resolution,
            max_height,
            heights,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    /// Height at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.heights[y * self.resolution + x]
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Lowest and highest stored elevation.
    pub fn min_max(&self) -> (f64, f64) {
        self.heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Height at an index pair that may fall outside the grid; both indices
    /// are clamped to `[0, resolution - 1]`.
    pub fn get_clamped(&self, x: i64, y: i64) -> f64 {
        let last = self.resolution as i64 - 1;
        self.get(x.clamp(0, last) as usize, y.clamp(0, last) as usize)
    }

    /// Bilinear interpolation at a normalised map position.
    ///
    /// The position is scaled by `resolution` (not `resolution - 1`), so
    /// `1.0` lands one cell past the last row/column and reads the clamped
    /// border value.
    pub fn sample_bilinear(&self, point: NormPoint) -> f64 {
        let res = self.resolution as f64;
        let gx = point.x * res;
        let gy = point.y * res;
        let x0 = gx.floor();
        let y0 = gy.floor();
        let fx = gx - x0;
        let fy = gy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let v00 = self.get_clamped(x0, y0);
        let v10 = self.get_clamped(x0 + 1, y0);
        let v01 = self.get_clamped(x0, y0 + 1);
        let v11 = self.get_clamped(x0 + 1, y0 + 1);

        v00 * (1.0 - fx) * (1.0 - fy) + v10 * fx * (1.0 - fy) + v01 * (1.0 - fx) * fy + v11 * fx * fy
    }

    /// Central-difference gradient magnitude at an interior vertex, `0` on
    /// the border.
    pub fn gradient_at(&self, x: usize, y: usize) -> f64 {
        let last = self.resolution - 1;
        if x == 0 || y == 0 || x >= last || y >= last {
            return 0.0;
        }
        let dzdx = (self.get(x + 1, y) - self.get(x - 1, y)) / 2.0;
        let dzdy = (self.get(x, y + 1) - self.get(x, y - 1)) / 2.0;
        dzdx.hypot(dzdy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainKind;

    fn ramp(resolution: usize) -> HeightGrid {
        // Heights grow left to right: x / res maps to [0, 1).
        HeightGrid::from_fn(resolution, 100.0, |nx, _| nx + 0.5).unwrap()
    }

    #[test]
    fn test_flat_grid_is_uniform() {
        let grid = HeightGrid::from_fn(4, 100.0, |_, _| 0.5).unwrap();
        assert_eq!(grid.heights().len(), 16);
        assert!(grid.heights().iter().all(|&h| h == 50.0));
    }

    #[test]
    fn test_from_fn_rejects_degenerate_bounds() {
        assert!(matches!(
            HeightGrid::from_fn(0, 100.0, |_, _| 0.5),
            Err(TerrainError::InvalidResolution(0))
        ));
        assert!(matches!(
            HeightGrid::from_fn(1, 100.0, |_, _| 0.5),
            Err(TerrainError::InvalidResolution(1))
        ));
        assert!(matches!(
            HeightGrid::from_fn(4, 0.0, |_, _| 0.5),
            Err(TerrainError::InvalidMaxHeight(_))
        ));
        assert!(HeightGrid::from_fn(2, 1.0, |_, _| 0.5).is_ok());
    }

    #[test]
    fn test_negative_shapes_clamp_to_zero() {
        let grid = HeightGrid::from_fn(3, 10.0, |_, _| -0.4).unwrap();
        assert!(grid.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_tall_shapes_clamp_to_max_height() {
        let grid = HeightGrid::from_fn(3, 10.0, |_, _| 1.3).unwrap();
        assert!(grid.heights().iter().all(|&h| h == 10.0));
    }

    #[test]
    fn test_generate_is_idempotent() {
        let params = TerrainParameters::new(TerrainKind::Caldera, 24, 150.0).unwrap();
        assert_eq!(HeightGrid::generate(&params), HeightGrid::generate(&params));
    }

    #[test]
    fn test_every_kind_stays_in_range() {
        for kind in TerrainKind::ALL {
            let params = TerrainParameters::new(kind, 40, 200.0).unwrap();
            let grid = HeightGrid::generate(&params);
            assert_eq!(grid.heights().len(), 40 * 40);
            for &h in grid.heights() {
                assert!(h >= 0.0, "{kind} produced {h}");
                assert!(h <= 200.0, "{kind} produced {h}");
            }
        }
    }

    #[test]
    fn test_bilinear_reproduces_corners() {
        let params = TerrainParameters::new(TerrainKind::Hills, 16, 120.0).unwrap();
        let grid = HeightGrid::generate(&params);
        for (x, y) in [(0, 0), (3, 7), (15, 15), (8, 0)] {
            let p = NormPoint::new(x as f64 / 16.0, y as f64 / 16.0);
            assert!((grid.sample_bilinear(p) - grid.get(x, y)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bilinear_clamps_past_the_edge() {
        let grid = ramp(8);
        let last = grid.get(7, 4);
        assert!((grid.sample_bilinear(NormPoint::new(1.0, 0.5)) - last).abs() < 1e-12);
        assert!((grid.sample_bilinear(NormPoint::new(0.0, 0.0)) - grid.get(0, 0)).abs() < 1e-12);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let grid = ramp(10);
        let mid = grid.sample_bilinear(NormPoint::new(0.25, 0.5));
        let expected = (grid.get(2, 5) + grid.get(3, 5)) / 2.0;
        assert!((mid - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gradient_border_is_zero() {
        let grid = ramp(6);
        assert_eq!(grid.gradient_at(0, 3), 0.0);
        assert_eq!(grid.gradient_at(5, 3), 0.0);
        // Ramp climbs 100 / 6 per column.
        assert!((grid.gradient_at(2, 2) - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_max() {
        let grid = ramp(5);
        let (lo, hi) = grid.min_max();
        assert_eq!(lo, 0.0);
        assert!((hi - 80.0).abs() < 1e-9);
    }
}
