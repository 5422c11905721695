//! Landform recipes built from a single dominant shape.
//!
//! Every function takes terrain-local coordinates in `[-0.5, 0.5]` and
//! returns an unclamped elevation factor (roughly `[0, 1]`).

use super::{Feature, scatter_gaussian};
use crate::noise::fractal_sum;

/// Hand-placed hill centres.
pub const HILLS: [Feature; 7] = [
    Feature::new(0.22, 0.18, 0.85, 0.16),
    Feature::new(-0.18, -0.12, 0.65, 0.13),
    Feature::new(0.08, -0.28, 0.75, 0.19),
    Feature::new(-0.16, 0.22, 0.55, 0.11),
    Feature::new(0.32, -0.12, 0.45, 0.09),
    Feature::new(-0.3, -0.25, 0.5, 0.12),
    Feature::new(0.15, 0.35, 0.4, 0.1),
];

pub fn mountain(x: f64, y: f64) -> f64 {
    let dist = x.hypot(y);
    let base = (1.0 - dist * 2.2).max(0.0) * (-dist * 1.5).exp();
    let detail = fractal_sum(x, y, 3, 42.0) * 0.15;
    base + detail * (1.0 - dist * 2.0)
}

pub fn valley(x: f64, y: f64) -> f64 {
    let ridge = x.abs() * 2.0;
    let valley_shape = y.abs().powf(0.6);
    let detail = fractal_sum(x, y, 3, 123.0) * 0.1;
    0.25 + ridge * 0.5 + valley_shape * 0.4 + detail
}

pub fn ridge(x: f64, y: f64) -> f64 {
    let main_ridge = (-(y * 2.5).powi(2)).exp() * (1.0 - x.abs() * 1.3);
    let secondary = (-((y - 0.25) * 4.0).powi(2)).exp() * 0.6 * (1.0 - (x + 0.15).abs() * 2.0);
    let tertiary = (-((y + 0.2) * 3.5).powi(2)).exp() * 0.4 * (1.0 - (x - 0.1).abs() * 2.0);
    let detail = fractal_sum(x, y, 3, 77.0) * 0.08;
    (main_ridge + secondary + tertiary + detail).max(0.0) * 0.75 + 0.1
}

pub fn crater(x: f64, y: f64) -> f64 {
    let dist = x.hypot(y);
    let rim = (-((dist - 0.28) * 7.0).powi(2)).exp();
    let floor = (0.25 - dist * 0.6).max(0.0);
    let ejecta = (-dist * 3.0).exp() * 0.15;
    let detail = fractal_sum(x, y, 2, 55.0) * 0.05;
    rim * 0.85 + floor * 0.3 + ejecta + detail + 0.08
}

pub fn hills(x: f64, y: f64) -> f64 {
    let elevation = scatter_gaussian(&HILLS, x, y);
    let detail = fractal_sum(x, y, 3, 88.0) * 0.1;
    elevation * 0.65 + detail + 0.08
}

pub fn plateau(x: f64, y: f64) -> f64 {
    let dist = x.abs().max(y.abs());
    let plateau = if dist < 0.28 {
        0.85
    } else {
        0.85 * (-((dist - 0.28) * 4.5).powi(2)).exp()
    };
    let edge = (1.0 - dist * 1.8).max(0.0) * 0.08;
    let erosion = fractal_sum(x, y, 4, 33.0) * 0.12;
    plateau * 0.75 + edge + erosion + 0.08
}

pub fn canyon(x: f64, y: f64) -> f64 {
    let width = 0.09 + (y * 8.0).sin() * 0.035 + (y * 15.0).sin() * 0.015;
    let depth = if x.abs() < width {
        (x.abs() / width).powf(0.4)
    } else {
        1.0
    };
    let walls = (-((x.abs() - width) * 8.0).powi(2)).exp() * 0.35;
    let detail = fractal_sum(x, y, 3, 44.0) * 0.08;
    depth * 0.65 + walls + detail + 0.18
}

pub fn volcanic(x: f64, y: f64) -> f64 {
    let dist = x.hypot(y);
    let cone = (1.0 - dist * 1.8).max(0.0) * 0.95;
    let crater = if dist < 0.12 {
        -0.35 * (1.0 - dist / 0.12)
    } else {
        0.0
    };
    let lava_flows = (y.atan2(x) * 6.0).sin() * 0.06 * (1.0 - dist);
    let detail = fractal_sum(x, y, 2, 66.0) * 0.06;
    (cone + crater + lava_flows + detail + 0.08).max(0.0)
}
