//! Contour (isoline) extraction using marching squares.
//!
//! Each 2×2 block of grid samples is classified by which corners sit at or
//! above the level, and a fixed 16-entry table turns the class into zero,
//! one or two segments whose endpoints are linearly interpolated along the
//! cell edges. Segments are emitted per cell; they are not stitched into
//! polylines.
//!
//! The two saddle classes (5 and 10) always pair their four crossings the
//! same way instead of sampling the cell centre to pick a pairing. At a true
//! saddle this can draw crossed lines; the pairing is kept stable on purpose
//! so maps stay identical between versions.

use serde::{Deserialize, Serialize};

use crate::grid::HeightGrid;
use crate::models::{ContourSegment, PixelPoint};

/// Every fifth level is a master (index) contour.
pub const MASTER_EVERY: u32 = 5;

/// Edges whose value difference is below this are treated as flat.
const FLAT_EDGE_EPSILON: f64 = 1e-4;

/// One elevation to trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourLevel {
    /// 1-based multiple of the interval.
    pub index: u32,
    pub elevation: f64,
    pub master: bool,
}

/// The levels `interval, 2 * interval, …` up to and including `max_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourLevels {
    interval: f64,
    max_height: f64,
}

impl ContourLevels {
    pub fn new(interval: f64, max_height: f64) -> Self {
        Self {
            interval,
            max_height,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn iter(&self) -> impl Iterator<Item = ContourLevel> + '_ {
        (1u32..)
            .map(|index| ContourLevel {
                index,
                elevation: f64::from(index) * self.interval,
                master: index % MASTER_EVERY == 0,
            })
            .take_while(|level| level.elevation <= self.max_height)
    }

    pub fn masters(&self) -> impl Iterator<Item = ContourLevel> + '_ {
        self.iter().filter(|level| level.master)
    }
}

/// Where `level` crosses the edge from `va` to `vb`, as a fraction in `[0, 1]`.
/// Flat edges report the midpoint.
pub fn edge_t(va: f64, vb: f64, level: f64) -> f64 {
    let diff = vb - va;
    if diff.abs() < FLAT_EDGE_EPSILON {
        return 0.5;
    }
    ((level - va) / diff).clamp(0.0, 1.0)
}

/// Four-bit class of a cell. Corners are `[top-left, top-right,
/// bottom-right, bottom-left]` with bit weights 8, 4, 2, 1.
pub fn cell_config(corners: [f64; 4], level: f64) -> u8 {
    corners
        .iter()
        .zip([8u8, 4, 2, 1])
        .filter(|(value, _)| **value >= level)
        .map(|(_, bit)| bit)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom, Left, Right, Top};

/// Edge pairs to join for each class.
const SEGMENT_TABLE: [&[(Edge, Edge)]; 16] = [
    &[],
    &[(Left, Bottom)],
    &[(Bottom, Right)],
    &[(Left, Right)],
    &[(Top, Right)],
    &[(Left, Top), (Bottom, Right)],
    &[(Top, Bottom)],
    &[(Left, Top)],
    &[(Left, Top)],
    &[(Top, Bottom)],
    &[(Left, Bottom), (Top, Right)],
    &[(Top, Right)],
    &[(Left, Right)],
    &[(Bottom, Right)],
    &[(Left, Bottom)],
    &[],
];

/// Number of segments the table emits for a class.
pub fn segment_count(config: u8) -> usize {
    SEGMENT_TABLE[usize::from(config & 0x0f)].len()
}

/// Pixel placement of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub origin: PixelPoint,
    pub width: f64,
    pub height: f64,
}

/// Segments for a single cell, appended to `out`.
pub fn cell_segments(
    corners: [f64; 4],
    level: f64,
    frame: CellFrame,
    out: &mut Vec<ContourSegment>,
) {
    let config = cell_config(corners, level);
    let pairs = SEGMENT_TABLE[usize::from(config)];
    if pairs.is_empty() {
        return;
    }

    let [v0, v1, v2, v3] = corners;
    let CellFrame {
        origin,
        width: w,
        height: h,
    } = frame;
    let point = |edge: Edge| match edge {
        Top => PixelPoint::new(origin.x + w * edge_t(v0, v1, level), origin.y),
        Right => PixelPoint::new(origin.x + w, origin.y + h * edge_t(v1, v2, level)),
        Bottom => PixelPoint::new(origin.x + w * edge_t(v3, v2, level), origin.y + h),
        Left => PixelPoint::new(origin.x, origin.y + h * edge_t(v0, v3, level)),
    };

    out.extend(pairs.iter().map(|&(a, b)| ContourSegment {
        start: point(a),
        end: point(b),
    }));
}

/// Traces one level over the whole grid into a `width × height` pixel area.
///
/// Cells are `width / resolution` by `height / resolution` pixels, so the
/// traced area stops one cell short of the right and bottom edges.
pub fn extract_level(grid: &HeightGrid, level: f64, width: f64, height: f64) -> Vec<ContourSegment> {
    let res = grid.resolution();
    let cell_w = width / res as f64;
    let cell_h = height / res as f64;
    let mut segments = Vec::new();

    for y in 0..res - 1 {
        for x in 0..res - 1 {
            let corners = [
                grid.get(x, y),
                grid.get(x + 1, y),
                grid.get(x + 1, y + 1),
                grid.get(x, y + 1),
            ];
            let frame = CellFrame {
                origin: PixelPoint::new(x as f64 * width / res as f64, y as f64 * height / res as f64),
                width: cell_w,
                height: cell_h,
            };
            cell_segments(corners, level, frame, &mut segments);
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_frame() -> CellFrame {
        CellFrame {
            origin: PixelPoint::new(0.0, 0.0),
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn test_edge_t_midpoint() {
        assert_eq!(edge_t(0.0, 10.0, 5.0), 0.5);
    }

    #[test]
    fn test_edge_t_flat_edge_falls_back_to_midpoint() {
        assert_eq!(edge_t(7.0, 7.00001, 3.0), 0.5);
    }

    #[test]
    fn test_edge_t_clamps() {
        assert_eq!(edge_t(0.0, 10.0, 20.0), 1.0);
        assert_eq!(edge_t(0.0, 10.0, -5.0), 0.0);
        assert_eq!(edge_t(10.0, 0.0, 2.5), 0.75);
    }

    #[test]
    fn test_config_extremes_emit_nothing() {
        let mut out = Vec::new();
        assert_eq!(cell_config([1.0; 4], 5.0), 0);
        cell_segments([1.0; 4], 5.0, unit_frame(), &mut out);
        assert!(out.is_empty());

        assert_eq!(cell_config([9.0; 4], 5.0), 15);
        cell_segments([9.0; 4], 5.0, unit_frame(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_config_bit_weights() {
        assert_eq!(cell_config([9.0, 0.0, 0.0, 0.0], 5.0), 8);
        assert_eq!(cell_config([0.0, 9.0, 0.0, 0.0], 5.0), 4);
        assert_eq!(cell_config([0.0, 0.0, 9.0, 0.0], 5.0), 2);
        assert_eq!(cell_config([0.0, 0.0, 0.0, 9.0], 5.0), 1);
        // Equal to the level counts as above.
        assert_eq!(cell_config([5.0, 0.0, 0.0, 0.0], 5.0), 8);
    }

    #[test]
    fn test_table_segment_counts() {
        for config in 0u8..16 {
            let expected = match config {
                0 | 15 => 0,
                5 | 10 => 2,
                _ => 1,
            };
            assert_eq!(segment_count(config), expected, "config {config}");
        }
    }

    #[test]
    fn test_saddles_emit_two_segments() {
        let mut out = Vec::new();
        // Config 5: top-right and bottom-left high.
        cell_segments([0.0, 10.0, 0.0, 10.0], 5.0, unit_frame(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].start, PixelPoint::new(0.0, 0.5));
        assert_eq!(out[0].end, PixelPoint::new(0.5, 0.0));

        out.clear();
        // Config 10: top-left and bottom-right high.
        cell_segments([10.0, 0.0, 10.0, 0.0], 5.0, unit_frame(), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].start, PixelPoint::new(0.5, 0.0));
        assert_eq!(out[1].end, PixelPoint::new(1.0, 0.5));
    }

    #[test]
    fn test_single_corner_segment_is_interpolated() {
        let mut out = Vec::new();
        // Only top-left at or above 4: crossing at t = 0.6 on top and left.
        cell_segments([10.0, 0.0, 0.0, 0.0], 4.0, unit_frame(), &mut out);
        assert_eq!(out.len(), 1);
        let seg = out[0];
        assert!((seg.start.y - 0.6).abs() < 1e-12 && seg.start.x == 0.0);
        assert!((seg.end.x - 0.6).abs() < 1e-12 && seg.end.y == 0.0);
    }

    #[test]
    fn test_uniform_grid_has_no_crossings() {
        let grid = HeightGrid::from_fn(4, 100.0, |_, _| 0.5).unwrap();
        assert!(extract_level(&grid, 25.0, 400.0, 400.0).is_empty());
    }

    #[test]
    fn test_ramp_level_crosses_every_row() {
        // Heights 0, 20, 40, 60, 80 across columns.
        let grid = HeightGrid::from_fn(5, 100.0, |nx, _| nx + 0.5).unwrap();
        let segments = extract_level(&grid, 30.0, 500.0, 500.0);
        assert_eq!(segments.len(), 4);
        for seg in &segments {
            // Crossing sits halfway between columns 1 and 2 (x = 150 px).
            assert!((seg.start.x - 150.0).abs() < 1e-9);
            assert!((seg.end.x - 150.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_levels_and_masters() {
        let levels = ContourLevels::new(20.0, 200.0);
        let all: Vec<_> = levels.iter().collect();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0].elevation, 20.0);
        assert_eq!(all[9].elevation, 200.0);

        let masters: Vec<f64> = levels.masters().map(|l| l.elevation).collect();
        assert_eq!(masters, vec![100.0, 200.0]);
    }

    #[test]
    fn test_interval_above_max_yields_nothing() {
        assert_eq!(ContourLevels::new(50.0, 40.0).iter().count(), 0);
    }
}
