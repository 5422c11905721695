//! Application shell for the contour lab.
//!
//! Concrete collaborators for a [`contours::session::TerrainSession`]: an SVG
//! writer for the map and profile chart, an OBJ writer for the surface, a
//! statistics reporter and an environment-backed parameter panel.

pub mod errors;
pub mod obj;
pub mod params;
pub mod report;
pub mod svg;

pub use errors::{Result, StudioError};
pub use obj::ObjMeshWriter;
pub use params::{EnvParameters, RenderSettings};
pub use report::{StatsReport, StatsReporter};
pub use svg::SvgMapWriter;
