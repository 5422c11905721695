//! Elevation and slope colour ramps shared by the map and the 3D view.
//!
//! The map uses 8-bit sRGB stops; the mesh uses the same hues as unit
//! floats, rounded to two decimals, plus a banded palette for the contour
//! style and a slope ramp.

use serde::{Deserialize, Serialize};

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Linear sRGB-ish colour with unit channels, as uploaded to the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgbf {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgbf {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Nine evenly spaced stops from deep water to snow.
pub const ELEVATION_STOPS: [Rgb8; 9] = [
    Rgb8::new(15, 45, 65),
    Rgb8::new(20, 80, 70),
    Rgb8::new(45, 120, 80),
    Rgb8::new(100, 160, 90),
    Rgb8::new(180, 170, 100),
    Rgb8::new(160, 120, 80),
    Rgb8::new(130, 100, 90),
    Rgb8::new(200, 200, 210),
    Rgb8::new(250, 250, 255),
];

const MESH_STOPS: [Rgbf; 9] = [
    Rgbf::new(0.06, 0.18, 0.25),
    Rgbf::new(0.08, 0.31, 0.27),
    Rgbf::new(0.18, 0.47, 0.31),
    Rgbf::new(0.39, 0.63, 0.35),
    Rgbf::new(0.71, 0.67, 0.39),
    Rgbf::new(0.63, 0.47, 0.31),
    Rgbf::new(0.51, 0.39, 0.35),
    Rgbf::new(0.78, 0.78, 0.82),
    Rgbf::new(0.98, 0.98, 1.0),
];

/// Banded palette: the mesh stops without the snow cap.
const BAND_STOPS: [Rgbf; 8] = [
    MESH_STOPS[0],
    MESH_STOPS[1],
    MESH_STOPS[2],
    MESH_STOPS[3],
    MESH_STOPS[4],
    MESH_STOPS[5],
    MESH_STOPS[6],
    MESH_STOPS[7],
];

/// Locates `t` on an evenly spaced ramp of `len` stops: the lower stop index
/// and the fraction towards the next one. `None` at or past the last stop.
fn ramp_position(t: f64, len: usize) -> Option<(usize, f64)> {
    let scaled = t * (len - 1) as f64;
    if scaled <= 0.0 {
        return Some((0, 0.0));
    }
    let index = scaled.floor();
    if index >= (len - 1) as f64 {
        return None;
    }
    Some((index as usize, scaled - index))
}

/// Map fill colour for a normalised elevation `t = h / max_height`.
pub fn elevation_color(t: f64) -> Rgb8 {
    let Some((i, f)) = ramp_position(t, ELEVATION_STOPS.len()) else {
        return ELEVATION_STOPS[ELEVATION_STOPS.len() - 1];
    };
    let (c1, c2) = (ELEVATION_STOPS[i], ELEVATION_STOPS[i + 1]);
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;
    Rgb8::new(channel(c1.r, c2.r), channel(c1.g, c2.g), channel(c1.b, c2.b))
}

/// Vertex colour on the continuous elevation ramp.
pub fn mesh_elevation_color(t: f64) -> Rgbf {
    let Some((i, f)) = ramp_position(t, MESH_STOPS.len()) else {
        return MESH_STOPS[MESH_STOPS.len() - 1];
    };
    let (c1, c2) = (MESH_STOPS[i], MESH_STOPS[i + 1]);
    let f = f as f32;
    Rgbf::new(
        c1.r + (c2.r - c1.r) * f,
        c1.g + (c2.g - c1.g) * f,
        c1.b + (c2.b - c1.b) * f,
    )
}

/// Vertex colour for a slope factor: green on the flats, magenta on cliffs.
pub fn slope_color(slope: f64) -> Rgbf {
    let s = slope as f32;
    Rgbf::new(
        (s * 2.0).min(1.0),
        (0.8 - s * 0.8).max(0.2),
        (0.4 + s * 0.6).min(1.0),
    )
}

/// Flat colour of the contour band an elevation falls in.
pub fn band_color(elevation: f64, interval: f64, max_height: f64) -> Rgbf {
    let band = (elevation / interval).floor();
    let band_t = band / (max_height / interval);
    let index = ((band_t * BAND_STOPS.len() as f64).floor().max(0.0) as usize)
        .min(BAND_STOPS.len() - 1);
    BAND_STOPS[index]
}
