//! The cached contour map: cell fills, traced levels, labels and legend.
//!
//! Building the raster is the expensive part of a map redraw (every level is
//! traced over the whole grid), so the session keeps it until the grid, the
//! contour interval or the viewport changes. Dragging the profile line only
//! redraws the overlay on top of it.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb8, elevation_color};
use crate::contour::{ContourLevel, ContourLevels, extract_level};
use crate::grid::HeightGrid;
use crate::models::{ContourSegment, PixelPoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgb8,
    pub alpha: f64,
    pub width: f64,
}

/// Amber, wide.
pub const MASTER_STROKE: StrokeStyle = StrokeStyle {
    color: Rgb8::new(0xfb, 0xbf, 0x24),
    alpha: 1.0,
    width: 2.5,
};

/// Translucent white, thin.
pub const NORMAL_STROKE: StrokeStyle = StrokeStyle {
    color: Rgb8::new(0xff, 0xff, 0xff),
    alpha: 0.55,
    width: 1.2,
};

/// All segments of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLayer {
    pub level: ContourLevel,
    pub segments: Vec<ContourSegment>,
}

impl ContourLayer {
    pub fn stroke(&self) -> StrokeStyle {
        if self.level.master {
            MASTER_STROKE
        } else {
            NORMAL_STROKE
        }
    }
}

/// Elevation text placed on a master contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLabel {
    pub elevation: f64,
    pub position: PixelPoint,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub elevation: f64,
    pub color: Rgb8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRaster {
    pub width: f64,
    pub height: f64,
    pub resolution: usize,
    /// One fill per grid sample, row-major.
    pub cell_colors: Vec<Rgb8>,
    pub layers: Vec<ContourLayer>,
    pub labels: Vec<ContourLabel>,
    pub legend: Vec<LegendEntry>,
}

impl TerrainRaster {
    pub fn build(
        grid: &HeightGrid,
        levels: &ContourLevels,
        width: f64,
        height: f64,
        legend_limit: usize,
    ) -> Self {
        let started = Instant::now();
        let max_height = grid.max_height();

        let cell_colors = grid
            .heights()
            .iter()
            .map(|h| elevation_color(h / max_height))
            .collect();

        let layers: Vec<ContourLayer> = levels
            .iter()
            .map(|level| ContourLayer {
                level,
                segments: extract_level(grid, level.elevation, width, height),
            })
            .collect();

        let labels = levels
            .masters()
            .filter_map(|level| {
                label_anchor(grid, level.elevation, levels.interval(), width, height).map(|position| {
                    ContourLabel {
                        elevation: level.elevation,
                        position,
                        text: format!("{}m", level.elevation),
                    }
                })
            })
            .collect();

        let legend = levels
            .masters()
            .take(legend_limit)
            .map(|level| LegendEntry {
                elevation: level.elevation,
                color: elevation_color(level.elevation / max_height),
            })
            .collect();

        let raster = Self {
            width,
            height,
            resolution: grid.resolution(),
            cell_colors,
            layers,
            labels,
            legend,
        };

        tracing::debug!(
            "Built contour raster: {} levels, {} segments, {} labels in {:.1}ms",
            raster.layers.len(),
            raster.segment_count(),
            raster.labels.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        raster
    }

    /// Pixel rectangle of grid sample `(x, y)`: top-left corner and size.
    pub fn cell_rect(&self, x: usize, y: usize) -> (PixelPoint, f64, f64) {
        let res = self.resolution as f64;
        let (w, h) = (self.width / res, self.height / res);
        (PixelPoint::new(x as f64 * w, y as f64 * h), w, h)
    }

    pub fn cell_color(&self, x: usize, y: usize) -> Rgb8 {
        self.cell_colors[y * self.resolution + x]
    }

    pub fn segment_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.segments.len()).sum()
    }
}

/// First point of a coarse lattice over the map centre that lies within half
/// an interval of `level`.
///
/// The lattice runs from `res / 4` up to (not including) `3 * res / 4` in
/// steps of `res / 6` on both axes, rows first.
fn label_anchor(
    grid: &HeightGrid,
    level: f64,
    interval: f64,
    width: f64,
    height: f64,
) -> Option<PixelPoint> {
    let res = grid.resolution() as f64;
    let step = res / 6.0;
    let lattice = || {
        (0u32..)
            .map(move |k| res / 4.0 + f64::from(k) * step)
            .take_while(move |v| *v < res * 3.0 / 4.0)
    };

    for y in lattice() {
        for x in lattice() {
            let elevation = grid.get(x.floor() as usize, y.floor() as usize);
            if (elevation - level).abs() < interval / 2.0 {
                return Some(PixelPoint::new(x * width / res, y * height / res));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> HeightGrid {
        // Heights 0, 5, 10, … 95 across columns.
        HeightGrid::from_fn(20, 100.0, |nx, _| nx + 0.5).unwrap()
    }

    #[test]
    fn test_one_layer_per_level() {
        let grid = ramp();
        let raster = TerrainRaster::build(&grid, &ContourLevels::new(10.0, 100.0), 200.0, 200.0, 6);
        assert_eq!(raster.layers.len(), 10);
        assert_eq!(raster.cell_colors.len(), 400);
        // 100 m is above every sample: nothing to trace.
        assert!(raster.layers[9].segments.is_empty());
        // The others cross each of the 19 cell rows once.
        assert!(raster.layers[..9].iter().all(|l| l.segments.len() == 19));
    }

    #[test]
    fn test_master_layers_use_master_stroke() {
        let grid = ramp();
        let raster = TerrainRaster::build(&grid, &ContourLevels::new(10.0, 100.0), 200.0, 200.0, 6);
        assert_eq!(raster.layers[4].level.elevation, 50.0);
        assert_eq!(raster.layers[4].stroke(), MASTER_STROKE);
        assert_eq!(raster.layers[0].stroke(), NORMAL_STROKE);
    }

    #[test]
    fn test_label_found_on_lattice() {
        let grid = ramp();
        let raster = TerrainRaster::build(&grid, &ContourLevels::new(8.0, 100.0), 200.0, 200.0, 6);
        // Lattice columns 5, 8 and 11 hold 25, 40 and 55 m. Only the 40 m
        // master is within 4 m of one of them; 80 m gets no label.
        assert_eq!(raster.labels.len(), 1);
        let label = &raster.labels[0];
        assert_eq!(label.text, "40m");
        assert!((label.position.x - (5.0 + 20.0 / 6.0) * 10.0).abs() < 1e-9);
        assert!((label.position.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_legend_is_capped() {
        let grid = HeightGrid::from_fn(8, 1000.0, |_, _| 0.5).unwrap();
        let raster = TerrainRaster::build(&grid, &ContourLevels::new(10.0, 1000.0), 80.0, 80.0, 6);
        assert_eq!(raster.legend.len(), 6);
        assert_eq!(raster.legend[0].elevation, 50.0);
        assert_eq!(raster.legend[5].elevation, 300.0);
        assert_eq!(raster.legend[0].color, elevation_color(0.05));
    }

    #[test]
    fn test_cell_rect() {
        let grid = ramp();
        let raster = TerrainRaster::build(&grid, &ContourLevels::new(10.0, 100.0), 400.0, 200.0, 6);
        let (origin, w, h) = raster.cell_rect(3, 2);
        assert_eq!(origin, PixelPoint::new(60.0, 20.0));
        assert_eq!((w, h), (20.0, 10.0));
        assert_eq!(raster.cell_color(0, 0), elevation_color(0.0));
    }
}
