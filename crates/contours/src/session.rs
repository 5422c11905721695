//! One interactive terrain view: the grid, its cached artefacts, the profile
//! line and the drag state.
//!
//! Everything runs on the caller's thread. The session is the only writer
//! of the grid and the caches; every change that makes a cache stale clears
//! it before the next read, and the next draw rebuilds it.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::contour::ContourLevels;
use crate::errors::Result;
use crate::grid::HeightGrid;
use crate::mesh::TerrainMesh;
use crate::models::{NormPoint, ProfileLine, RenderStyle, ViewParameters};
use crate::profile::{ProfileSampler, SampleQuality};
use crate::raster::TerrainRaster;
use crate::scheduler::{Admission, RedrawScheduler};
use crate::sinks::{ParameterSource, Sinks};

/// Size of the 2D map in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

pub struct TerrainSession {
    config: SessionConfig,
    view: ViewParameters,
    grid: HeightGrid,
    raster: Option<TerrainRaster>,
    mesh: Option<TerrainMesh>,
    profile_line: Option<ProfileLine>,
    viewport: Viewport,
    drag: DragState,
    scheduler: RedrawScheduler,
    sampler: ProfileSampler,
}

impl TerrainSession {
    pub fn new(view: ViewParameters, config: SessionConfig, viewport: Viewport) -> Result<Self> {
        let terrain = view.validate()?;
        Ok(Self {
            grid: HeightGrid::generate(&terrain),
            raster: None,
            mesh: None,
            profile_line: Some(config.default_profile_line),
            viewport,
            drag: DragState::Idle,
            scheduler: RedrawScheduler::new(config.throttle()),
            sampler: ProfileSampler::from_config(&config),
            view,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewParameters {
        &self.view
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// The cached map, if it is still valid.
    pub fn raster(&self) -> Option<&TerrainRaster> {
        self.raster.as_ref()
    }

    /// The current surface, if it is still valid.
    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    pub fn profile_line(&self) -> Option<&ProfileLine> {
        self.profile_line.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }

    pub fn has_pending_redraw(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Applies new parameters, regenerating or invalidating only what they
    /// affect. Nothing is drawn; call [`render_full`](Self::render_full).
    pub fn apply(&mut self, view: ViewParameters) -> Result<()> {
        let terrain = view.validate()?;
        let previous = std::mem::replace(&mut self.view, view);

        if previous.terrain_parameters() != terrain {
            self.grid = HeightGrid::generate(&terrain);
            self.invalidate_raster("terrain regenerated");
            self.invalidate_mesh("terrain regenerated");
            return Ok(());
        }

        if previous.contour_interval != view.contour_interval {
            self.invalidate_raster("contour interval changed");
            if view.render_style == RenderStyle::Contours3d {
                self.invalidate_mesh("contour interval changed");
            }
        }
        if previous.vertical_exaggeration != view.vertical_exaggeration
            || previous.render_style != view.render_style
        {
            self.invalidate_mesh("surface style changed");
        }
        Ok(())
    }

    /// Pulls the current parameters from the panel.
    pub fn sync(&mut self, source: &impl ParameterSource) -> Result<()> {
        self.apply(source.snapshot())
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.invalidate_raster("viewport resized");
    }

    /// Starts a new profile line at `point`.
    pub fn begin_drag(&mut self, point: NormPoint) {
        let point = point.clamped();
        self.drag = DragState::Dragging;
        self.profile_line = Some(ProfileLine::new(point, point));
    }

    /// Moves the end of the line being drawn.
    ///
    /// Returns `None` when no drag is in progress. A throttled move leaves
    /// the line untouched; an accepted one moves the end point and leaves a
    /// draft redraw pending for the next animation frame.
    pub fn drag_to(&mut self, now: Instant, point: NormPoint) -> Option<Admission> {
        if !self.is_dragging() {
            return None;
        }
        let admission = self.scheduler.request(now);
        if admission.is_accepted() {
            if let Some(line) = self.profile_line.as_mut() {
                line.end = point.clamped();
            }
        }
        Some(admission)
    }

    /// Finishes the drag with one full-quality redraw. Any draft still
    /// pending is dropped. Returns `false` if no drag was in progress.
    pub fn end_drag(&mut self, sinks: &mut Sinks<'_>) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.drag = DragState::Idle;
        self.scheduler.cancel_pending();
        self.redraw_map(SampleQuality::Full, sinks);
        true
    }

    /// Runs the pending draft redraw, if any, then presents the 3D view.
    pub fn on_animation_frame(&mut self, sinks: &mut Sinks<'_>) {
        if self.scheduler.take_pending() {
            self.redraw_map(SampleQuality::Draft, sinks);
        }
        sinks.mesh.present_frame();
    }

    /// Redraws the map and the profile at full quality and uploads the
    /// surface if it was rebuilt.
    pub fn render_full(&mut self, sinks: &mut Sinks<'_>) {
        self.redraw_map(SampleQuality::Full, sinks);

        if self.mesh.is_none() {
            let mesh = TerrainMesh::build(&self.grid, &self.view);
            sinks.mesh.upload_mesh(&mesh);
            self.mesh = Some(mesh);
        }
    }

    fn redraw_map(&mut self, quality: SampleQuality, sinks: &mut Sinks<'_>) {
        let grid = &self.grid;
        let view = &self.view;
        let viewport = self.viewport;
        let legend_limit = self.config.legend_limit;
        let raster = self.raster.get_or_insert_with(|| {
            TerrainRaster::build(
                grid,
                &ContourLevels::new(view.contour_interval, grid.max_height()),
                viewport.width,
                viewport.height,
                legend_limit,
            )
        });
        sinks.raster.draw_map(raster);

        let Some(line) = self.profile_line.filter(|line| !line.is_degenerate()) else {
            sinks.raster.clear_profile();
            return;
        };

        sinks.raster.draw_profile_line(&line);
        let plot = self
            .sampler
            .plot(&self.grid, &line, quality, self.view.contour_interval);
        sinks.raster.draw_profile(&plot);

        if quality == SampleQuality::Full {
            tracing::debug!(
                "Rendered full profile: {} samples over {:.0}m, max slope {:.1}%",
                plot.samples.len(),
                plot.stats.total_distance,
                plot.stats.max_slope_percent
            );
            sinks.stats.publish_stats(&plot.stats);
        }
    }

    fn invalidate_raster(&mut self, reason: &str) {
        if self.raster.take().is_some() {
            tracing::debug!("Invalidated contour raster ({reason})");
        }
    }

    fn invalidate_mesh(&mut self, reason: &str) {
        if self.mesh.take().is_some() {
            tracing::debug!("Invalidated terrain mesh ({reason})");
        }
    }
}
