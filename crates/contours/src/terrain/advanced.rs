//! Composite landforms: scattered features, periodic fields and stepped
//! slopes.

use super::Feature;
use crate::noise::{fractal_sum, hash_noise};

/// Island centres; the archipelago takes the tallest island at each point.
pub const ISLANDS: [Feature; 8] = [
    Feature::new(0.0, 0.0, 0.9, 0.2),
    Feature::new(0.3, 0.15, 0.6, 0.12),
    Feature::new(-0.25, 0.2, 0.5, 0.1),
    Feature::new(0.15, -0.3, 0.7, 0.14),
    Feature::new(-0.35, -0.15, 0.4, 0.08),
    Feature::new(0.35, -0.2, 0.35, 0.07),
    Feature::new(-0.1, 0.35, 0.45, 0.09),
    Feature::new(0.25, 0.35, 0.3, 0.06),
];

const SEA_LEVEL: f64 = 0.2;
const SINKHOLES: u32 = 12;
const TOWERS: u32 = 8;
const TERRACE_COUNT: f64 = 8.0;

pub fn archipelago(x: f64, y: f64) -> f64 {
    let elevation = ISLANDS.iter().fold(0.0_f64, |acc, island| {
        let dist = island.distance(x, y);
        acc.max(island.height * (-(dist / island.radius).powf(1.8)).exp())
    });

    let underwater = fractal_sum(x, y, 3, 111.0) * 0.15;
    elevation.max(SEA_LEVEL + underwater * 0.3)
}

pub fn glacier(x: f64, y: f64) -> f64 {
    let main_glacier = (-(x * 2.5).powi(2)).exp() * (0.8 - y * 0.8);
    let cirque = (-((y + 0.35) * 3.0).powi(2) - (x * 2.0).powi(2)).exp() * 0.3;
    let moraine = (-((y - 0.2) * 5.0).powi(2)).exp() * x.abs() * 0.4;
    let crevasses = (x * 30.0 + y * 10.0).sin() * 0.02 * main_glacier;
    let detail = fractal_sum(x, y, 3, 222.0) * 0.08;
    (main_glacier + cirque + moraine + crevasses + detail + 0.1).max(0.0)
}

/// Limestone plateau pitted with sinkholes and studded with tower karst.
/// Both feature sets are scattered with the hash at fixed seeds.
pub fn karst(x: f64, y: f64) -> f64 {
    let mut elevation = 0.6;

    for i in 0..SINKHOLES {
        let i = f64::from(i);
        let sx = (hash_noise(i * 7.0, 0.0, 333.0) - 0.5) * 0.9;
        let sy = (hash_noise(0.0, i * 7.0, 333.0) - 0.5) * 0.9;
        let sr = 0.05 + hash_noise(i, i, 333.0) * 0.08;
        let dist = (x - sx).hypot(y - sy);
        if dist < sr {
            elevation -= (sr - dist) / sr * 0.4;
        }
    }

    for i in 0..TOWERS {
        let i = f64::from(i);
        let tx = (hash_noise(i * 5.0, 100.0, 444.0) - 0.5) * 0.8;
        let ty = (hash_noise(100.0, i * 5.0, 444.0) - 0.5) * 0.8;
        let dist = (x - tx).hypot(y - ty);
        elevation += 0.35 * (-(dist / 0.08).powi(2)).exp();
    }

    let detail = fractal_sum(x, y, 4, 555.0) * 0.12;
    (elevation + detail).max(0.1)
}

pub fn dunes(x: f64, y: f64) -> f64 {
    let crest = (x * 15.0 + y * 3.0).sin();
    let main_dunes = crest * 0.15 + (x * 8.0 - y * 2.0).sin() * 0.1;
    let mega_dune = (-(y * 2.0).powi(2)).exp() * 0.3;
    let windward = if crest > 0.0 { 0.05 } else { 0.0 };
    let ripples = (x * 40.0 + y * 8.0).sin() * 0.02;
    let variation = fractal_sum(x, y, 2, 666.0) * 0.1;
    0.3 + main_dunes + mega_dune + windward + ripples + variation
}

pub fn fjord(x: f64, y: f64) -> f64 {
    let path = (y * 4.0).sin() * 0.15;
    let offset = (x - path).abs();
    let depth = if offset < 0.1 {
        (offset / 0.1).powf(0.3) * 0.3
    } else {
        0.8
    };
    let cliffs = (-((offset - 0.1) * 8.0).powi(2)).exp() * 0.5;
    let mountains = (1.0 - offset * 1.5) * 0.4 * (1.0 + (y * 6.0).sin() * 0.3);
    let detail = fractal_sum(x, y, 3, 777.0) * 0.1;
    depth.max(cliffs + mountains) + detail
}

pub fn caldera(x: f64, y: f64) -> f64 {
    let dist = x.hypot(y);
    let outer_profile = (-((dist - 0.35) * 5.0).powi(2)).exp();
    let outer_rim = outer_profile * 0.9;
    let inner_rim = (-((dist - 0.2) * 8.0).powi(2)).exp() * 0.4;
    let floor = if dist < 0.18 { 0.25 } else { 0.0 };
    let resurgent_dome = (-(dist / 0.08).powi(2)).exp() * 0.35;
    let erosion = fractal_sum(x, y, 3, 888.0) * 0.08;
    let asymmetry = outer_profile * (y.atan2(x) * 3.0).sin() * 0.15;
    outer_rim + inner_rim + floor + resurgent_dome + erosion + asymmetry + 0.1
}

pub fn badlands(x: f64, y: f64) -> f64 {
    let base_slope = 0.5 - y * 0.3;
    let gullies = (x * 20.0 + fractal_sum(x, y, 2, 999.0) * 5.0).sin() * 0.1;
    let ridges = (x * 12.0 + y * 3.0).sin().abs() * 0.15;
    let hoodoos = fractal_sum(x * 3.0, y * 3.0, 4, 1000.0) * 0.2;
    let erosion_channels = (y * 25.0 + x * 5.0).sin() * 0.05 * (0.5 + y);
    (base_slope + gullies + ridges + hoodoos + erosion_channels).max(0.1)
}

pub fn terraces(x: f64, y: f64) -> f64 {
    let base_slope = 0.8 - y * 0.6 - x * 0.2;
    let step = 1.0 / TERRACE_COUNT;
    let terraced = (base_slope / step).floor() * step;
    let risers = if base_slope % step < 0.02 { 0.03 } else { 0.0 };
    let irrigation = (x * 30.0 + y * 5.0).sin() * 0.01;
    let variation = fractal_sum(x, y, 2, 1111.0) * 0.05;
    (terraced + risers + irrigation + variation).max(0.1)
}
