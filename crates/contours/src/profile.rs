//! Elevation cross-section along the profile line.
//!
//! Samples are evenly spaced from A to B and read with bilinear
//! interpolation. While the line is being dragged a coarser draft is taken;
//! the settled line gets the full sample count, the axis ticks and the
//! statistics panel.

use geo::{Distance as _, Euclidean, Point};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::grid::HeightGrid;
use crate::models::{ProfileLine, ProfileSample, ProfileStats};

/// Relative head- and footroom added around the sampled elevation range.
const RANGE_MARGIN: f64 = 0.15;
/// Margin used instead when the sampled range is flat.
const FLAT_RANGE_MARGIN: f64 = 15.0;
/// Roughly six gridlines per axis, snapped to these steps.
const TICK_DIVISIONS: f64 = 6.0;
const ELEVATION_TICK_SNAP: f64 = 10.0;
const DISTANCE_TICK_SNAP: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleQuality {
    /// Interactive drag frame.
    Draft,
    /// Settled line.
    Full,
}

/// Everything the profile chart needs for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePlot {
    pub quality: SampleQuality,
    pub samples: Vec<ProfileSample>,
    pub stats: ProfileStats,
    /// Bottom of the vertical axis.
    pub plot_min: f64,
    /// Top of the vertical axis.
    pub plot_max: f64,
    /// Horizontal gridline elevations (full quality only).
    pub elevation_ticks: Vec<f64>,
    /// Vertical gridline distances (full quality only).
    pub distance_ticks: Vec<f64>,
    /// Dashed contour-level indicators (full quality only).
    pub contour_marks: Vec<f64>,
}

impl ProfilePlot {
    /// Vertical position of an elevation inside the plot, `0` at the bottom
    /// and `1` at the top.
    pub fn normalized(&self, elevation: f64) -> f64 {
        (elevation - self.plot_min) / (self.plot_max - self.plot_min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSampler {
    draft_samples: usize,
    full_samples: usize,
    world_scale: f64,
}

impl Default for ProfileSampler {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl ProfileSampler {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            draft_samples: config.draft_samples.max(1),
            full_samples: config.full_samples.max(1),
            world_scale: config.world_scale,
        }
    }

    pub fn sample_count(&self, quality: SampleQuality) -> usize {
        match quality {
            SampleQuality::Draft => self.draft_samples,
            SampleQuality::Full => self.full_samples,
        }
    }

    /// `samples + 1` evenly spaced points from A to B, both ends included.
    pub fn sample(&self, grid: &HeightGrid, line: &ProfileLine, samples: usize) -> Vec<ProfileSample> {
        (0..=samples)
            .map(|i| {
                let fraction = i as f64 / samples as f64;
                ProfileSample {
                    fraction,
                    elevation: grid.sample_bilinear(line.point_at(fraction)),
                }
            })
            .collect()
    }

    /// Horizontal length of the line in world units.
    pub fn distance(&self, line: &ProfileLine) -> f64 {
        let a = Point::new(line.start.x * self.world_scale, line.start.y * self.world_scale);
        let b = Point::new(line.end.x * self.world_scale, line.end.y * self.world_scale);
        Euclidean.distance(a, b)
    }

    /// Min/max elevation, distance and steepest step of a sample run.
    ///
    /// The running max starts at `0` and the running min at `max_height`, so
    /// neither can leave `[0, max_height]` for clamped grids.
    pub fn stats(&self, samples: &[ProfileSample], max_height: f64, total_distance: f64) -> ProfileStats {
        let (min_elevation, max_elevation) = samples
            .iter()
            .fold((max_height, 0.0_f64), |(lo, hi), s| {
                (lo.min(s.elevation), hi.max(s.elevation))
            });

        let steps = samples.len().saturating_sub(1);
        let step_distance = if steps > 0 {
            total_distance / steps as f64
        } else {
            0.0
        };
        let max_slope_percent = if step_distance > 0.0 {
            samples
                .windows(2)
                .map(|w| ((w[1].elevation - w[0].elevation) / step_distance * 100.0).abs())
                .fold(0.0, f64::max)
        } else {
            0.0
        };

        ProfileStats {
            min_elevation,
            max_elevation,
            total_distance,
            max_slope_percent,
        }
    }

    /// Samples the line and lays out the chart for one pass.
    pub fn plot(
        &self,
        grid: &HeightGrid,
        line: &ProfileLine,
        quality: SampleQuality,
        contour_interval: f64,
    ) -> ProfilePlot {
        let samples = self.sample(grid, line, self.sample_count(quality));
        let total_distance = self.distance(line);
        let stats = self.stats(&samples, grid.max_height(), total_distance);
        let (plot_min, plot_max) = plot_range(stats.min_elevation, stats.max_elevation);

        let (elevation_ticks, distance_ticks, contour_marks) = match quality {
            SampleQuality::Draft => (Vec::new(), Vec::new(), Vec::new()),
            SampleQuality::Full => (
                elevation_ticks(plot_min, plot_max),
                distance_ticks(total_distance),
                contour_marks(contour_interval, stats.max_elevation, plot_min, plot_max),
            ),
        };

        ProfilePlot {
            quality,
            samples,
            stats,
            plot_min,
            plot_max,
            elevation_ticks,
            distance_ticks,
            contour_marks,
        }
    }
}

/// Vertical axis range with a 15% margin, or a fixed margin when flat.
pub fn plot_range(min_elevation: f64, max_elevation: f64) -> (f64, f64) {
    let margin = (max_elevation - min_elevation) * RANGE_MARGIN;
    let margin = if margin == 0.0 || margin.is_nan() {
        FLAT_RANGE_MARGIN
    } else {
        margin
    };
    ((min_elevation - margin).max(0.0), max_elevation + margin)
}

fn elevation_ticks(plot_min: f64, plot_max: f64) -> Vec<f64> {
    let step = ((plot_max - plot_min) / TICK_DIVISIONS / ELEVATION_TICK_SNAP).ceil()
        * ELEVATION_TICK_SNAP;
    if !(step > 0.0) {
        return Vec::new();
    }
    let first = (plot_min / step).ceil() * step;
    (0u32..)
        .map(|k| first + f64::from(k) * step)
        .take_while(|elevation| *elevation <= plot_max)
        .collect()
}

fn distance_ticks(total_distance: f64) -> Vec<f64> {
    if !(total_distance > 0.0) {
        return Vec::new();
    }
    let step = (total_distance / TICK_DIVISIONS / DISTANCE_TICK_SNAP).ceil() * DISTANCE_TICK_SNAP;
    (0u32..)
        .map(|k| f64::from(k) * step)
        .take_while(|distance| *distance <= total_distance)
        .collect()
}

fn contour_marks(interval: f64, max_elevation: f64, plot_min: f64, plot_max: f64) -> Vec<f64> {
    if !(interval > 0.0) {
        return Vec::new();
    }
    (1u32..)
        .map(|k| f64::from(k) * interval)
        .take_while(|elevation| *elevation <= max_elevation)
        .filter(|elevation| (plot_min..=plot_max).contains(elevation))
        .collect()
}
