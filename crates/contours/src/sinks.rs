//! Collaborators the session reads from and draws into.
//!
//! The session owns no canvas, scene or panel. It reads the current
//! parameters from a [`ParameterSource`] and pushes finished artefacts into
//! the sinks; how they end up on screen (or on disk) is up to the shell.

use crate::mesh::TerrainMesh;
use crate::models::{ProfileLine, ProfileStats, RenderStyle, ViewParameters};
use crate::profile::ProfilePlot;
use crate::raster::TerrainRaster;
use crate::terrain::TerrainKind;

/// Read-only view of the parameter panel.
pub trait ParameterSource {
    fn terrain(&self) -> TerrainKind;
    fn resolution(&self) -> usize;
    fn max_height(&self) -> f64;
    fn contour_interval(&self) -> f64;
    fn vertical_exaggeration(&self) -> f64;
    fn render_style(&self) -> RenderStyle;

    /// All values at once.
    fn snapshot(&self) -> ViewParameters {
        ViewParameters {
            terrain: self.terrain(),
            resolution: self.resolution(),
            max_height: self.max_height(),
            contour_interval: self.contour_interval(),
            vertical_exaggeration: self.vertical_exaggeration(),
            render_style: self.render_style(),
        }
    }
}

impl ParameterSource for ViewParameters {
    fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    fn resolution(&self) -> usize {
        self.resolution
    }

    fn max_height(&self) -> f64 {
        self.max_height
    }

    fn contour_interval(&self) -> f64 {
        self.contour_interval
    }

    fn vertical_exaggeration(&self) -> f64 {
        self.vertical_exaggeration
    }

    fn render_style(&self) -> RenderStyle {
        self.render_style
    }

    fn snapshot(&self) -> ViewParameters {
        *self
    }
}

/// The 2D map and the profile chart.
pub trait RasterSink {
    /// Replaces the map with the cached raster. Called on every map redraw.
    fn draw_map(&mut self, raster: &TerrainRaster);

    /// Draws the profile line over the current map.
    fn draw_profile_line(&mut self, line: &ProfileLine);

    fn draw_profile(&mut self, plot: &ProfilePlot);

    /// Empties the profile chart when there is no line to sample.
    fn clear_profile(&mut self);
}

/// The 3D view. Camera, lights and orbit controls belong to the sink.
pub trait MeshSink {
    /// Replaces the displayed surface.
    fn upload_mesh(&mut self, mesh: &TerrainMesh);

    /// Draws one frame with whatever surface is current.
    fn present_frame(&mut self);
}

pub trait StatsSink {
    fn publish_stats(&mut self, stats: &ProfileStats);
}

/// The three output collaborators of one session.
pub struct Sinks<'a> {
    pub raster: &'a mut dyn RasterSink,
    pub mesh: &'a mut dyn MeshSink,
    pub stats: &'a mut dyn StatsSink,
}

impl<'a> Sinks<'a> {
    pub fn new(
        raster: &'a mut dyn RasterSink,
        mesh: &'a mut dyn MeshSink,
        stats: &'a mut dyn StatsSink,
    ) -> Self {
        Self { raster, mesh, stats }
    }
}
