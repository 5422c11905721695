//! Profile statistics reporting.

use std::fs;
use std::path::Path;

use contours::models::ProfileStats;
use contours::sinks::StatsSink;
use serde::Serialize;

use crate::errors::Result;

/// What ends up in `stats.json`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub min_elevation_m: f64,
    pub max_elevation_m: f64,
    pub total_distance_m: f64,
    pub max_slope_percent: f64,
    /// How many full-quality profiles were published in this run.
    pub updates: usize,
}

/// Logs every published figure set and keeps the latest one.
#[derive(Debug, Default)]
pub struct StatsReporter {
    latest: Option<ProfileStats>,
    updates: usize,
}

impl StatsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&ProfileStats> {
        self.latest.as_ref()
    }

    pub fn report(&self) -> Option<StatsReport> {
        self.latest.map(|stats| StatsReport {
            min_elevation_m: stats.min_elevation,
            max_elevation_m: stats.max_elevation,
            total_distance_m: stats.total_distance,
            max_slope_percent: stats.max_slope_percent,
            updates: self.updates,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.report())?)
    }

    /// Writes `stats.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("stats.json"), self.to_json()?)?;
        tracing::info!("Wrote profile stats ({} updates) to {}", self.updates, dir.display());
        Ok(())
    }
}

impl StatsSink for StatsReporter {
    fn publish_stats(&mut self, stats: &ProfileStats) {
        tracing::info!(
            "Profile stats: {:.1}m to {:.1}m over {:.0}m, max slope {:.1}%",
            stats.min_elevation,
            stats.max_elevation,
            stats.total_distance,
            stats.max_slope_percent
        );
        self.latest = Some(*stats);
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_null() {
        let reporter = StatsReporter::new();
        assert!(reporter.report().is_none());
        assert_eq!(reporter.to_json().unwrap(), "null");
    }

    #[test]
    fn test_keeps_latest() {
        let mut reporter = StatsReporter::new();
        reporter.publish_stats(&ProfileStats {
            min_elevation: 10.0,
            max_elevation: 90.0,
            total_distance: 500.0,
            max_slope_percent: 12.5,
        });
        reporter.publish_stats(&ProfileStats {
            min_elevation: 20.0,
            max_elevation: 80.0,
            total_distance: 700.0,
            max_slope_percent: 3.0,
        });

        let report = reporter.report().unwrap();
        assert_eq!(report.updates, 2);
        assert_eq!(report.total_distance_m, 700.0);

        let json: serde_json::Value = serde_json::from_str(&reporter.to_json().unwrap()).unwrap();
        assert_eq!(json["max_slope_percent"], 3.0);
        assert_eq!(json["updates"], 2);
    }
}
