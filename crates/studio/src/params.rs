//! Environment-driven parameters for the render binary.
//!
//! | Variable                | Default       |
//! |-------------------------|---------------|
//! | `TERRAIN`               | `mountain`    |
//! | `RESOLUTION`            | `150`         |
//! | `MAX_HEIGHT`            | `200`         |
//! | `CONTOUR_INTERVAL`      | `20`          |
//! | `VERTICAL_EXAGGERATION` | `1.0`         |
//! | `RENDER_STYLE`          | `elevation`   |
//! | `VIEWPORT`              | `800x600`     |
//! | `OUTPUT_DIR`            | `./out`       |
//! | `CONFIG_JSON`           | unset         |
//!
//! Unparsable numbers fall back to their default with a warning; unknown
//! terrain or style names are errors.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use contours::config::SessionConfig;
use contours::models::{RenderStyle, ViewParameters};
use contours::session::Viewport;
use contours::sinks::ParameterSource;
use contours::terrain::TerrainKind;

use crate::errors::{Result, StudioError};

/// Parameter panel backed by environment variables, read once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvParameters {
    view: ViewParameters,
}

impl EnvParameters {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ViewParameters::default();
        let terrain = match lookup("TERRAIN") {
            Some(name) => name.parse::<TerrainKind>()?,
            None => defaults.terrain,
        };
        let render_style = match lookup("RENDER_STYLE") {
            Some(name) => name.parse::<RenderStyle>()?,
            None => defaults.render_style,
        };

        let view = ViewParameters {
            terrain,
            resolution: number_or(&lookup, "RESOLUTION", defaults.resolution),
            max_height: number_or(&lookup, "MAX_HEIGHT", defaults.max_height),
            contour_interval: number_or(&lookup, "CONTOUR_INTERVAL", defaults.contour_interval),
            vertical_exaggeration: number_or(
                &lookup,
                "VERTICAL_EXAGGERATION",
                defaults.vertical_exaggeration,
            ),
            render_style,
        };
        view.validate()?;
        Ok(Self { view })
    }
}

impl ParameterSource for EnvParameters {
    fn terrain(&self) -> TerrainKind {
        self.view.terrain
    }

    fn resolution(&self) -> usize {
        self.view.resolution
    }

    fn max_height(&self) -> f64 {
        self.view.max_height
    }

    fn contour_interval(&self) -> f64 {
        self.view.contour_interval
    }

    fn vertical_exaggeration(&self) -> f64 {
        self.view.vertical_exaggeration
    }

    fn render_style(&self) -> RenderStyle {
        self.view.render_style
    }
}

/// Output and session settings of one render run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub viewport: Viewport,
    pub output_dir: PathBuf,
    pub session: SessionConfig,
}

impl RenderSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let viewport = match lookup("VIEWPORT") {
            Some(raw) => parse_viewport(&raw)?,
            None => Viewport::default(),
        };
        let output_dir = PathBuf::from(lookup("OUTPUT_DIR").unwrap_or_else(|| "./out".to_string()));
        let session = match lookup("CONFIG_JSON") {
            Some(path) => {
                tracing::info!("Loading session config from {}", path);
                SessionConfig::from_json_str(&fs::read_to_string(&path)?)?
            }
            None => SessionConfig::default(),
        };
        Ok(Self {
            viewport,
            output_dir,
            session,
        })
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
pub fn parse_viewport(raw: &str) -> Result<Viewport> {
    let invalid = || StudioError::InvalidViewport(raw.to_string());
    let (w, h) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(invalid());
    }
    Ok(Viewport::new(width, height))
}

fn number_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
