//! Surface mesh for the 3D view.
//!
//! The grid becomes a 2 × 2 plane centred on the origin with one vertex per
//! sample, `y` up. Heights are scaled to half a unit at `max_height` before
//! vertical exaggeration.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb8, Rgbf, band_color, mesh_elevation_color, slope_color};
use crate::contour::{ContourLevel, ContourLevels};
use crate::grid::HeightGrid;
use crate::models::{RenderStyle, ViewParameters};

/// Height of the plane at `max_height` with no exaggeration.
const HEIGHT_SCALE: f64 = 0.5;
/// Gradient-to-slope factor for the slope colouring.
const SLOPE_GAIN: f64 = 5.0;
/// Lift of contour overlay points above the surface.
const OVERLAY_LIFT: f64 = 0.003;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MeshMaterial {
    Wireframe { color: Rgb8, opacity: f32 },
    Shaded { flat_shading: bool },
}

impl MeshMaterial {
    pub fn for_style(style: RenderStyle) -> Self {
        match style {
            RenderStyle::Wireframe => MeshMaterial::Wireframe {
                color: Rgb8::new(0x00, 0xd4, 0xaa),
                opacity: 0.8,
            },
            RenderStyle::Contours3d => MeshMaterial::Shaded { flat_shading: true },
            RenderStyle::Elevation | RenderStyle::Slope => MeshMaterial::Shaded { flat_shading: false },
        }
    }
}

/// Points where one level crosses the surface, drawn on top of the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourPoints {
    pub level: ContourLevel,
    pub points: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainMesh {
    pub style: RenderStyle,
    pub material: MeshMaterial,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<Rgbf>,
    pub indices: Vec<u32>,
    /// Empty unless the style is `contours3d`.
    pub overlay: Vec<ContourPoints>,
}

impl TerrainMesh {
    pub fn build(grid: &HeightGrid, view: &ViewParameters) -> Self {
        let started = Instant::now();
        let res = grid.resolution();
        let max_height = grid.max_height();
        let exaggeration = view.vertical_exaggeration;
        let span = (res - 1) as f64;

        let mut positions = Vec::with_capacity(res * res);
        let mut colors = Vec::with_capacity(res * res);
        for i in 0..res {
            for j in 0..res {
                let elevation = grid.get(j, i);
                positions.push([
                    (-1.0 + 2.0 * j as f64 / span) as f32,
                    (elevation / max_height * HEIGHT_SCALE * exaggeration) as f32,
                    (-1.0 + 2.0 * i as f64 / span) as f32,
                ]);
                colors.push(vertex_color(grid, view, j, i));
            }
        }

        let indices = plane_indices(res);
        let normals = vertex_normals(&positions, &indices);

        let overlay = match view.render_style {
            RenderStyle::Contours3d => contour_overlay(
                grid,
                &ContourLevels::new(view.contour_interval, max_height),
                exaggeration,
            ),
            _ => Vec::new(),
        };

        tracing::debug!(
            "Built {} terrain mesh: {} vertices, {} triangles, {} overlay levels in {:.1}ms",
            view.render_style,
            positions.len(),
            indices.len() / 3,
            overlay.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        Self {
            style: view.render_style,
            material: MeshMaterial::for_style(view.render_style),
            positions,
            normals,
            colors,
            indices,
            overlay,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn vertex_color(grid: &HeightGrid, view: &ViewParameters, x: usize, y: usize) -> Rgbf {
    let max_height = grid.max_height();
    let elevation = grid.get(x, y);
    match view.render_style {
        RenderStyle::Slope => slope_color(grid.gradient_at(x, y) / max_height * SLOPE_GAIN),
        RenderStyle::Contours3d => band_color(elevation, view.contour_interval, max_height),
        RenderStyle::Elevation | RenderStyle::Wireframe => mesh_elevation_color(elevation / max_height),
    }
}

/// Two triangles per cell, counter-clockwise seen from above.
fn plane_indices(res: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
    let vertex = |x: usize, y: usize| (x + res * y) as u32;
    for iy in 0..res - 1 {
        for ix in 0..res - 1 {
            let a = vertex(ix, iy);
            let b = vertex(ix, iy + 1);
            let c = vertex(ix + 1, iy + 1);
            let d = vertex(ix + 1, iy);
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

fn cross(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

/// Area-weighted average of the adjacent face normals.
fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut sums = vec![[0.0_f32; 3]; positions.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let n = cross(positions[a], positions[b], positions[c]);
        for v in [a, b, c] {
            sums[v][0] += n[0];
            sums[v][1] += n[1];
            sums[v][2] += n[2];
        }
    }

    sums.into_iter()
        .map(|[x, y, z]| {
            let len = (x * x + y * y + z * z).sqrt();
            if len < 1e-8 {
                [0.0, 1.0, 0.0]
            } else {
                [x / len, y / len, z / len]
            }
        })
        .collect()
}

/// Crossings of every level along the horizontal grid edges.
fn contour_overlay(grid: &HeightGrid, levels: &ContourLevels, exaggeration: f64) -> Vec<ContourPoints> {
    let res = grid.resolution();
    let res_f = res as f64;
    let max_height = grid.max_height();

    levels
        .iter()
        .map(|level| {
            let l = level.elevation;
            let height = (l / max_height * HEIGHT_SCALE * exaggeration + OVERLAY_LIFT) as f32;
            let mut points = Vec::new();
            for y in 0..res - 1 {
                for x in 0..res - 1 {
                    let v0 = grid.get(x, y);
                    let v1 = grid.get(x + 1, y);
                    if (v0 <= l && v1 > l) || (v0 > l && v1 <= l) {
                        let t = (l - v0) / (v1 - v0);
                        points.push([
                            ((x as f64 + t) / res_f * 2.0 - 1.0) as f32,
                            height,
                            (y as f64 / res_f * 2.0 - 1.0) as f32,
                        ]);
                    }
                }
            }
            ContourPoints { level, points }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(style: RenderStyle) -> ViewParameters {
        ViewParameters {
            render_style: style,
            contour_interval: 10.0,
            max_height: 100.0,
            ..ViewParameters::default()
        }
    }

    fn ramp(res: usize) -> HeightGrid {
        HeightGrid::from_fn(res, 100.0, |nx, _| nx + 0.5).unwrap()
    }

    #[test]
    fn test_counts() {
        let mesh = TerrainMesh::build(&ramp(6), &view(RenderStyle::Elevation));
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.normals.len(), 36);
        assert_eq!(mesh.colors.len(), 36);
        assert_eq!(mesh.triangle_count(), 5 * 5 * 2);
        assert!(mesh.indices.iter().all(|&i| i < 36));
    }

    #[test]
    fn test_plane_spans_unit_square() {
        let grid = HeightGrid::from_fn(4, 100.0, |_, _| 1.0).unwrap();
        let mesh = TerrainMesh::build(&grid, &view(RenderStyle::Elevation));
        assert_eq!(mesh.positions[0], [-1.0, 0.5, -1.0]);
        assert_eq!(mesh.positions[15], [1.0, 0.5, 1.0]);
        // Second vertex steps along x.
        assert_eq!(mesh.positions[1][2], -1.0);
    }

    #[test]
    fn test_exaggeration_scales_heights() {
        let grid = HeightGrid::from_fn(4, 100.0, |_, _| 0.5).unwrap();
        let mesh = TerrainMesh::build(
            &grid,
            &ViewParameters {
                vertical_exaggeration: 2.0,
                ..view(RenderStyle::Elevation)
            },
        );
        assert!(mesh.positions.iter().all(|p| p[1] == 0.5));
    }

    #[test]
    fn test_flat_surface_normals_point_up() {
        let grid = HeightGrid::from_fn(5, 100.0, |_, _| 0.3).unwrap();
        let mesh = TerrainMesh::build(&grid, &view(RenderStyle::Elevation));
        for n in &mesh.normals {
            assert!((n[1] - 1.0).abs() < 1e-6, "{n:?}");
        }
    }

    #[test]
    fn test_ramp_normals_lean_downhill() {
        let mesh = TerrainMesh::build(&ramp(8), &view(RenderStyle::Elevation));
        // Height grows with x, so normals tilt towards -x.
        assert!(mesh.normals.iter().all(|n| n[0] < 0.0 && n[1] > 0.0));
    }

    #[test]
    fn test_slope_colours_border_as_flat() {
        let mesh = TerrainMesh::build(&ramp(6), &view(RenderStyle::Slope));
        assert_eq!(mesh.colors[0], slope_color(0.0));
        assert_ne!(mesh.colors[6 + 2], slope_color(0.0));
    }

    #[test]
    fn test_materials() {
        assert_eq!(
            MeshMaterial::for_style(RenderStyle::Wireframe),
            MeshMaterial::Wireframe {
                color: Rgb8::new(0, 212, 170),
                opacity: 0.8
            }
        );
        assert_eq!(
            MeshMaterial::for_style(RenderStyle::Contours3d),
            MeshMaterial::Shaded { flat_shading: true }
        );
    }

    #[test]
    fn test_overlay_only_for_contour_style() {
        let grid = ramp(10);
        assert!(TerrainMesh::build(&grid, &view(RenderStyle::Elevation)).overlay.is_empty());

        let mesh = TerrainMesh::build(&grid, &view(RenderStyle::Contours3d));
        assert_eq!(mesh.overlay.len(), 10);
        // Heights climb 10 m per column, so 30 m crosses each scanned row once.
        let level = mesh.overlay.iter().find(|c| c.level.elevation == 30.0).unwrap();
        assert_eq!(level.points.len(), 9);
        let p = level.points[0];
        assert!((p[1] - (0.15 + 0.003) as f32).abs() < 1e-6);
    }

    #[test]
    fn test_overlay_skips_last_row() {
        let grid = ramp(10);
        let overlay = contour_overlay(&grid, &ContourLevels::new(10.0, 100.0), 1.0);
        for contour in &overlay {
            let last_z = contour.points.iter().map(|p| p[2]).fold(f32::MIN, f32::max);
            // Row 8 maps to 8 / 10 * 2 - 1; row 9 (z = 0.8) is never scanned.
            assert!(last_z < 0.7, "level {} reached z={}", contour.level.elevation, last_z);
        }
        let level = overlay.iter().find(|c| c.level.elevation == 30.0).unwrap();
        assert!((level.points.last().unwrap()[2] - 0.6).abs() < 1e-6);
    }
}
