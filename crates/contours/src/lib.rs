//! Terrain synthesis and contour mapping for the contour lab.
//!
//! This crate generates procedural heightfields from sixteen landform
//! recipes, traces them into contour segments with marching squares, samples
//! elevation profiles along a user-drawn line and builds a coloured surface
//! mesh. A [`TerrainSession`](session::TerrainSession) ties these together
//! and drives the drawing collaborators in [`sinks`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use contours::prelude::*;
//!
//! let view = ViewParameters {
//!     terrain: TerrainKind::Caldera,
//!     ..ViewParameters::default()
//! };
//! let mut session = TerrainSession::new(view, SessionConfig::default(), Viewport::new(800.0, 600.0))?;
//! session.render_full(&mut Sinks::new(&mut map, &mut scene, &mut stats));
//!
//! session.begin_drag(NormPoint::new(0.1, 0.2));
//! session.drag_to(Instant::now(), NormPoint::new(0.8, 0.7));
//! session.on_animation_frame(&mut Sinks::new(&mut map, &mut scene, &mut stats));
//! session.end_drag(&mut Sinks::new(&mut map, &mut scene, &mut stats));
//! ```

pub mod color;
pub mod config;
pub mod contour;
pub mod errors;
pub mod grid;
pub mod mesh;
pub mod models;
pub mod noise;
pub mod profile;
pub mod raster;
pub mod scheduler;
pub mod session;
pub mod sinks;
pub mod terrain;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::color::{Rgb8, Rgbf, elevation_color};
    pub use crate::config::SessionConfig;
    pub use crate::contour::{ContourLevel, ContourLevels, extract_level};
    pub use crate::errors::{Result, TerrainError};
    pub use crate::grid::HeightGrid;
    pub use crate::mesh::{ContourPoints, MeshMaterial, TerrainMesh};
    pub use crate::models::{
        ContourSegment, NormPoint, PixelPoint, ProfileLine, ProfileSample, ProfileStats,
        RenderStyle, TerrainParameters, ViewParameters,
    };
    pub use crate::profile::{ProfilePlot, ProfileSampler, SampleQuality};
    pub use crate::raster::{ContourLabel, ContourLayer, LegendEntry, StrokeStyle, TerrainRaster};
    pub use crate::scheduler::{Admission, RedrawScheduler};
    pub use crate::session::{DragState, TerrainSession, Viewport};
    pub use crate::sinks::{MeshSink, ParameterSource, RasterSink, Sinks, StatsSink};
    pub use crate::terrain::TerrainKind;
}
