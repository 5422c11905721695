//! Terrain shape library.
//!
//! Sixteen closed-form landform recipes, each mapping terrain-local
//! coordinates `(nx, ny)` in `[-0.5, 0.5]` to an elevation factor. Recipes
//! are not clamped here; the grid generator clamps once after dispatch.

mod advanced;
mod basic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TerrainError;

pub use advanced::ISLANDS;
pub use basic::HILLS;

/// Signature shared by every landform recipe.
pub type ShapeFn = fn(f64, f64) -> f64;

/// A hand-placed radial feature (hill, island).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub radius: f64,
}

impl Feature {
    pub const fn new(x: f64, y: f64, height: f64, radius: f64) -> Self {
        Self {
            x,
            y,
            height,
            radius,
        }
    }

    pub fn distance(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }
}

/// Sum of Gaussian bumps `h * exp(-(d / r)^2)` over a feature table.
pub(crate) fn scatter_gaussian(features: &[Feature], x: f64, y: f64) -> f64 {
    features
        .iter()
        .map(|f| f.height * (-(f.distance(x, y) / f.radius).powi(2)).exp())
        .sum()
}

/// The sixteen terrain kinds offered by the lab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    #[default]
    Mountain,
    Valley,
    Ridge,
    Crater,
    Hills,
    Plateau,
    Canyon,
    Volcanic,
    Archipelago,
    Glacier,
    Karst,
    Dunes,
    Fjord,
    Caldera,
    Badlands,
    Terraces,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 16] = [
        TerrainKind::Mountain,
        TerrainKind::Valley,
        TerrainKind::Ridge,
        TerrainKind::Crater,
        TerrainKind::Hills,
        TerrainKind::Plateau,
        TerrainKind::Canyon,
        TerrainKind::Volcanic,
        TerrainKind::Archipelago,
        TerrainKind::Glacier,
        TerrainKind::Karst,
        TerrainKind::Dunes,
        TerrainKind::Fjord,
        TerrainKind::Caldera,
        TerrainKind::Badlands,
        TerrainKind::Terraces,
    ];

    /// Recipe table, indexed in `ALL` order.
    const SHAPES: [ShapeFn; 16] = [
        basic::mountain,
        basic::valley,
        basic::ridge,
        basic::crater,
        basic::hills,
        basic::plateau,
        basic::canyon,
        basic::volcanic,
        advanced::archipelago,
        advanced::glacier,
        advanced::karst,
        advanced::dunes,
        advanced::fjord,
        advanced::caldera,
        advanced::badlands,
        advanced::terraces,
    ];

    pub fn shape(self) -> ShapeFn {
        Self::SHAPES[self as usize]
    }

    /// Unclamped elevation factor at terrain-local `(nx, ny)`.
    pub fn elevation(self, nx: f64, ny: f64) -> f64 {
        (self.shape())(nx, ny)
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::Mountain => "mountain",
            TerrainKind::Valley => "valley",
            TerrainKind::Ridge => "ridge",
            TerrainKind::Crater => "crater",
            TerrainKind::Hills => "hills",
            TerrainKind::Plateau => "plateau",
            TerrainKind::Canyon => "canyon",
            TerrainKind::Volcanic => "volcanic",
            TerrainKind::Archipelago => "archipelago",
            TerrainKind::Glacier => "glacier",
            TerrainKind::Karst => "karst",
            TerrainKind::Dunes => "dunes",
            TerrainKind::Fjord => "fjord",
            TerrainKind::Caldera => "caldera",
            TerrainKind::Badlands => "badlands",
            TerrainKind::Terraces => "terraces",
        }
    }

    /// Human-readable name, e.g. `Impact crater`.
    pub fn label(self) -> &'static str {
        match self {
            TerrainKind::Mountain => "Isolated mountain",
            TerrainKind::Valley => "Valley",
            TerrainKind::Ridge => "Mountain ridge",
            TerrainKind::Crater => "Impact crater",
            TerrainKind::Hills => "Rolling hills",
            TerrainKind::Plateau => "Plateau",
            TerrainKind::Canyon => "Canyon",
            TerrainKind::Volcanic => "Volcano",
            TerrainKind::Archipelago => "Archipelago",
            TerrainKind::Glacier => "Glacial valley",
            TerrainKind::Karst => "Karst",
            TerrainKind::Dunes => "Dune field",
            TerrainKind::Fjord => "Fjord",
            TerrainKind::Caldera => "Caldera",
            TerrainKind::Badlands => "Badlands",
            TerrainKind::Terraces => "Terraced slope",
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TerrainKind {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TerrainKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TerrainError::UnknownTerrain(s.to_string()))
    }
}
