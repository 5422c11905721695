//! SVG rendering of the contour map and the elevation profile.
//!
//! Both documents are built as plain strings. The map keeps the last raster
//! it was handed and the profile line drawn on top of it; the profile chart
//! keeps the last plot, or an empty frame after a clear.

use std::fs;
use std::path::Path;

use contours::color::Rgb8;
use contours::models::{PixelPoint, ProfileLine};
use contours::profile::ProfilePlot;
use contours::raster::{ContourLabel, StrokeStyle, TerrainRaster};
use contours::sinks::RasterSink;

use crate::errors::Result;

const PROFILE_WIDTH: f64 = 800.0;
const PROFILE_HEIGHT: f64 = 300.0;

/// Advance of one glyph in the bold 12px label font.
const LABEL_GLYPH_WIDTH: f64 = 7.0;

/// Plot area insets of the profile chart.
struct Padding {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

const PROFILE_PADDING: Padding = Padding {
    left: 70.0,
    right: 30.0,
    top: 40.0,
    bottom: 60.0,
};

#[derive(Debug, Default)]
pub struct SvgMapWriter {
    width: f64,
    height: f64,
    map_body: String,
    overlay: String,
    profile: Option<String>,
    map_draws: usize,
    profile_draws: usize,
}

impl SvgMapWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of map redraws seen so far.
    pub fn map_draws(&self) -> usize {
        self.map_draws
    }

    /// Number of profile plots seen so far.
    pub fn profile_draws(&self) -> usize {
        self.profile_draws
    }

    pub fn map_svg(&self) -> String {
        let mut svg = svg_open(self.width, self.height);
        svg.push_str(&self.map_body);
        svg.push_str(&self.overlay);
        svg.push_str("</svg>\n");
        svg
    }

    pub fn profile_svg(&self) -> String {
        let mut svg = svg_open(PROFILE_WIDTH, PROFILE_HEIGHT);
        svg.push_str(&profile_background());
        if let Some(body) = &self.profile {
            svg.push_str(body);
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Writes `map.svg` and `profile.svg` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::write(dir.join("map.svg"), self.map_svg())?;
        fs::write(dir.join("profile.svg"), self.profile_svg())?;
        tracing::info!("Wrote map and profile SVG to {}", dir.display());
        Ok(())
    }
}

impl RasterSink for SvgMapWriter {
    fn draw_map(&mut self, raster: &TerrainRaster) {
        self.width = raster.width;
        self.height = raster.height;
        self.map_body = render_raster(raster);
        self.overlay.clear();
        self.map_draws += 1;
    }

    fn draw_profile_line(&mut self, line: &ProfileLine) {
        self.overlay = render_profile_line(line, self.width, self.height);
    }

    fn draw_profile(&mut self, plot: &ProfilePlot) {
        self.profile = Some(render_profile(plot));
        self.profile_draws += 1;
    }

    fn clear_profile(&mut self) {
        self.profile = None;
    }
}

fn svg_open(width: f64, height: f64) -> String {
    let mut svg = String::new();
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));
    svg.push('\n');
    svg
}

fn stroke_attrs(style: &StrokeStyle) -> String {
    format!(
        r#"stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
        style.color.hex(),
        style.alpha,
        style.width
    )
}

fn render_raster(raster: &TerrainRaster) -> String {
    let mut body = String::new();

    body.push_str("  <g id=\"cells\" shape-rendering=\"crispEdges\">\n");
    for y in 0..raster.resolution {
        for x in 0..raster.resolution {
            let (origin, w, h) = raster.cell_rect(x, y);
            // Overlap neighbours by a pixel so no seams show.
            body.push_str(&format!(
                r#"    <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                origin.x,
                origin.y,
                w + 1.0,
                h + 1.0,
                raster.cell_color(x, y).hex()
            ));
            body.push('\n');
        }
    }
    body.push_str("  </g>\n");

    // Each master label goes right after its own level, so higher levels
    // paint over lower labels.
    body.push_str("  <g id=\"contours\" fill=\"none\" stroke-linecap=\"round\">\n");
    for layer in &raster.layers {
        if !layer.segments.is_empty() {
            let mut path = String::new();
            for segment in &layer.segments {
                path.push_str(&format!(
                    "M{:.2} {:.2}L{:.2} {:.2}",
                    segment.start.x, segment.start.y, segment.end.x, segment.end.y
                ));
            }
            body.push_str(&format!(
                r#"    <path data-elevation="{}" {} d="{}"/>"#,
                layer.level.elevation,
                stroke_attrs(&layer.stroke()),
                path
            ));
            body.push('\n');
        }
        for label in raster
            .labels
            .iter()
            .filter(|label| label.elevation == layer.level.elevation)
        {
            body.push_str(&render_label(label));
        }
    }
    body.push_str("  </g>\n");

    body.push_str(&render_legend(raster));
    body
}

fn render_label(label: &ContourLabel) -> String {
    let text_width = label.text.chars().count() as f64 * LABEL_GLYPH_WIDTH;
    let PixelPoint { x, y } = label.position;

    let mut group = String::new();
    group.push_str(&format!(
        r##"    <g class="contour-label"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="16" fill="#0a1628" fill-opacity="0.85"/>"##,
        x - text_width / 2.0 - 4.0,
        y - 11.0,
        text_width + 8.0
    ));
    group.push_str(&format!(
        r##"<text x="{x:.2}" y="{:.2}" fill="#fbbf24" stroke="none" font-family="Inter, sans-serif" font-size="12" font-weight="bold" text-anchor="middle">{}</text></g>"##,
        y + 1.0,
        escape_xml(&label.text)
    ));
    group.push('\n');
    group
}

fn render_legend(raster: &TerrainRaster) -> String {
    let mut legend = String::new();
    legend.push_str("  <g id=\"legend\" font-family=\"Inter, sans-serif\" font-size=\"11\">\n");
    for (i, entry) in raster.legend.iter().enumerate() {
        let y = 12.0 + i as f64 * 18.0;
        legend.push_str(&format!(
            r##"    <rect x="12" y="{y}" width="12" height="12" fill="{}"/><text x="30" y="{}" fill="#f1f5f9">{}m</text>"##,
            entry.color.hex(),
            y + 10.0,
            entry.elevation
        ));
        legend.push('\n');
    }
    legend.push_str("  </g>\n");
    legend
}

fn render_profile_line(line: &ProfileLine, width: f64, height: f64) -> String {
    let a = PixelPoint::new(line.start.x * width, line.start.y * height);
    let b = PixelPoint::new(line.end.x * width, line.end.y * height);
    let marker = Rgb8::new(0xff, 0x6b, 0x6b).hex();

    let mut overlay = String::new();
    overlay.push_str("  <g id=\"profile-line\">\n");
    overlay.push_str(&format!(
        r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{marker}" stroke-width="4" stroke-dasharray="12 6"/>"#,
        a.x, a.y, b.x, b.y
    ));
    overlay.push('\n');
    for (point, name) in [(a, "A"), (b, "B")] {
        overlay.push_str(&format!(
            r##"    <circle cx="{:.2}" cy="{:.2}" r="8" fill="{marker}"/><text x="{:.2}" y="{:.2}" fill="#ffffff" font-family="Inter, sans-serif" font-size="14" font-weight="bold" text-anchor="middle">{name}</text>"##,
            point.x,
            point.y,
            point.x,
            point.y - 18.0
        ));
        overlay.push('\n');
    }
    overlay.push_str("  </g>\n");
    overlay
}

fn profile_background() -> String {
    format!(
        r##"  <rect width="{PROFILE_WIDTH}" height="{PROFILE_HEIGHT}" fill="#0a1628"/>
"##
    )
}

fn render_profile(plot: &ProfilePlot) -> String {
    let p = &PROFILE_PADDING;
    let plot_width = PROFILE_WIDTH - p.left - p.right;
    let plot_height = PROFILE_HEIGHT - p.top - p.bottom;
    let bottom = PROFILE_HEIGHT - p.bottom;
    let right = PROFILE_WIDTH - p.right;
    let to_x = |fraction: f64| p.left + fraction * plot_width;
    let to_y = |elevation: f64| p.top + plot_height - plot.normalized(elevation) * plot_height;

    let mut body = String::new();

    body.push_str("  <g id=\"grid\" stroke=\"#6366f1\" stroke-opacity=\"0.15\" font-family=\"Inter, sans-serif\" font-size=\"12\">\n");
    for &elevation in &plot.elevation_ticks {
        let y = to_y(elevation);
        body.push_str(&format!(
            r##"    <line x1="{}" y1="{y:.2}" x2="{right}" y2="{y:.2}"/><text x="{}" y="{:.2}" fill="#94a3b8" stroke="none" text-anchor="end">{elevation:.0}m</text>"##,
            p.left,
            p.left - 10.0,
            y + 4.0
        ));
        body.push('\n');
    }
    let total = plot.stats.total_distance;
    for &distance in &plot.distance_ticks {
        let x = to_x(distance / total);
        body.push_str(&format!(
            r##"    <line x1="{x:.2}" y1="{}" x2="{x:.2}" y2="{bottom}"/><text x="{x:.2}" y="{}" fill="#94a3b8" stroke="none" text-anchor="middle">{distance:.0}m</text>"##,
            p.top,
            bottom + 22.0
        ));
        body.push('\n');
    }
    body.push_str("  </g>\n");

    let points: Vec<String> = plot
        .samples
        .iter()
        .map(|s| format!("{:.2},{:.2}", to_x(s.fraction), to_y(s.elevation)))
        .collect();
    let points = points.join(" ");
    body.push_str(&format!(
        r##"  <polygon points="{},{bottom} {points} {right},{bottom}" fill="#64a05a" fill-opacity="0.6"/>"##,
        p.left
    ));
    body.push('\n');
    body.push_str(&format!(
        r##"  <polyline points="{points}" fill="none" stroke="#00d4aa" stroke-width="3" stroke-linejoin="round" stroke-linecap="round"/>"##
    ));
    body.push('\n');

    for &elevation in &plot.contour_marks {
        let y = to_y(elevation);
        body.push_str(&format!(
            r##"  <line x1="{}" y1="{y:.2}" x2="{right}" y2="{y:.2}" stroke="#fbbf24" stroke-opacity="0.4" stroke-dasharray="8 8"/>"##,
            p.left
        ));
        body.push('\n');
    }

    body.push_str(&format!(
        r##"  <g fill="#ff6b6b" font-family="Inter, sans-serif" font-size="16" font-weight="bold" text-anchor="middle"><text x="{}" y="{}">A</text><text x="{right}" y="{}">B</text></g>"##,
        p.left,
        bottom + 45.0,
        bottom + 45.0
    ));
    body.push('\n');
    body
}

/// Escapes XML special characters in a string.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
