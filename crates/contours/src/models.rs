use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TerrainError};
use crate::terrain::TerrainKind;

/// Inputs of one terrain generation. Changing any field means a new grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainParameters {
    pub kind: TerrainKind,
    pub resolution: usize,
    pub max_height: f64,
}

impl TerrainParameters {
    pub fn new(kind: TerrainKind, resolution: usize, max_height: f64) -> Result<Self> {
        if resolution < 2 {
            return Err(TerrainError::InvalidResolution(resolution));
        }
        if !max_height.is_finite() || max_height <= 0.0 {
            return Err(TerrainError::InvalidMaxHeight(max_height));
        }
        Ok(Self {
            kind,
            resolution,
            max_height,
        })
    }
}

/// How the 3D view colours and shades the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Elevation,
    Wireframe,
    Slope,
    Contours3d,
}

impl RenderStyle {
    pub const ALL: [RenderStyle; 4] = [
        RenderStyle::Elevation,
        RenderStyle::Wireframe,
        RenderStyle::Slope,
        RenderStyle::Contours3d,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RenderStyle::Elevation => "elevation",
            RenderStyle::Wireframe => "wireframe",
            RenderStyle::Slope => "slope",
            RenderStyle::Contours3d => "contours3d",
        }
    }
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderStyle {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RenderStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TerrainError::UnknownRenderStyle(s.to_string()))
    }
}

/// Everything the parameter panel controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParameters {
    pub terrain: TerrainKind,
    pub resolution: usize,
    pub max_height: f64,
    pub contour_interval: f64,
    pub vertical_exaggeration: f64,
    pub render_style: RenderStyle,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            terrain: TerrainKind::Mountain,
            resolution: 150,
            max_height: 200.0,
            contour_interval: 20.0,
            vertical_exaggeration: 1.0,
            render_style: RenderStyle::Elevation,
        }
    }
}

impl ViewParameters {
    /// Checks every field and returns the terrain part.
    pub fn validate(&self) -> Result<TerrainParameters> {
        let terrain = TerrainParameters::new(self.terrain, self.resolution, self.max_height)?;
        if !self.contour_interval.is_finite() || self.contour_interval <= 0.0 {
            return Err(TerrainError::InvalidContourInterval(self.contour_interval));
        }
        if !self.vertical_exaggeration.is_finite() || self.vertical_exaggeration <= 0.0 {
            return Err(TerrainError::InvalidExaggeration(self.vertical_exaggeration));
        }
        Ok(terrain)
    }

    pub fn terrain_parameters(&self) -> TerrainParameters {
        TerrainParameters {
            kind: self.terrain,
            resolution: self.resolution,
            max_height: self.max_height,
        }
    }
}

/// A point normalised over the map extent, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both axes into the map.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }

    pub fn lerp(self, other: NormPoint, t: f64) -> NormPoint {
        NormPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// The user-dragged cross-section A → B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileLine {
    pub start: NormPoint,
    pub end: NormPoint,
}

impl ProfileLine {
    pub const fn new(start: NormPoint, end: NormPoint) -> Self {
        Self { start, end }
    }

    /// Zero-length lines are not drawn or sampled.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn point_at(&self, t: f64) -> NormPoint {
        self.start.lerp(self.end, t)
    }
}

/// A point in pixel space of the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One iso-line piece inside a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourSegment {
    pub start: PixelPoint,
    pub end: PixelPoint,
}

/// One point of the elevation cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSample {
    /// Position along the line, `0` at A and `1` at B.
    pub fraction: f64,
    pub elevation: f64,
}

/// Figures shown beside the profile chart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileStats {
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub total_distance: f64,
    pub max_slope_percent: f64,
}
