//! Renders one terrain to disk, including a scripted profile drag.
//!
//! Run with:
//! ```
//! TERRAIN=caldera RENDER_STYLE=contours3d cargo run -p studio --bin render
//! ```
//!
//! Writes `map.svg`, `profile.svg`, `terrain.obj` and `stats.json` into
//! `OUTPUT_DIR`.

use std::fs;
use std::time::{Duration, Instant};

use contours::models::NormPoint;
use contours::scheduler::Admission;
use contours::session::TerrainSession;
use contours::sinks::{ParameterSource, Sinks};
use studio::{EnvParameters, ObjMeshWriter, RenderSettings, StatsReporter, SvgMapWriter};
use tracing_subscriber::EnvFilter;

/// Pointer events per second in the scripted drag.
const DRAG_EVENT_HZ: u64 = 120;
const DRAG_STEPS: u32 = 48;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let params = EnvParameters::from_env()?;
    let settings = RenderSettings::from_env()?;
    fs::create_dir_all(&settings.output_dir)?;

    let view = params.snapshot();
    tracing::info!(
        "Rendering {} at {}x{} ({} style)",
        view.terrain.label(),
        view.resolution,
        view.resolution,
        view.render_style
    );

    let mut session = TerrainSession::new(view, settings.session, settings.viewport)?;
    let viewport = session.viewport();
    tracing::info!(
        "Viewport {}x{}, redraw gate {}ms, {}/{} profile samples",
        viewport.width,
        viewport.height,
        session.config().throttle_ms,
        session.config().draft_samples,
        session.config().full_samples
    );
    let mut map = SvgMapWriter::new();
    let mut scene = ObjMeshWriter::new();
    let mut stats = StatsReporter::new();

    session.render_full(&mut Sinks::new(&mut map, &mut scene, &mut stats));

    // Diagonal drag with pointer events faster than the redraw gate, one
    // animation frame every other event.
    let start = NormPoint::new(0.1, 0.2);
    let end = NormPoint::new(0.9, 0.75);
    let step = Duration::from_micros(1_000_000 / DRAG_EVENT_HZ);
    let t0 = Instant::now();
    let (mut scheduled, mut coalesced, mut throttled) = (0, 0, 0);

    session.begin_drag(start);
    for i in 1..=DRAG_STEPS {
        let at = t0 + step * i;
        match session.drag_to(at, start.lerp(end, f64::from(i) / f64::from(DRAG_STEPS))) {
            Some(Admission::Scheduled) => scheduled += 1,
            Some(Admission::Coalesced) => coalesced += 1,
            Some(Admission::Throttled) => throttled += 1,
            None => {}
        }
        if i % 2 == 0 {
            session.on_animation_frame(&mut Sinks::new(&mut map, &mut scene, &mut stats));
        }
    }
    session.end_drag(&mut Sinks::new(&mut map, &mut scene, &mut stats));
    session.on_animation_frame(&mut Sinks::new(&mut map, &mut scene, &mut stats));

    tracing::info!(
        "Drag replay: {} scheduled, {} coalesced, {} throttled",
        scheduled,
        coalesced,
        throttled
    );
    tracing::info!(
        "  Map draws: {}, profile draws: {}, frames: {}",
        map.map_draws(),
        map.profile_draws(),
        scene.frames()
    );

    map.write_to(&settings.output_dir)?;
    scene.write_to(&settings.output_dir)?;
    stats.write_to(&settings.output_dir)?;

    tracing::info!("Render completed!");
    tracing::info!("  Output: {}", settings.output_dir.display());
    if let Some(latest) = stats.latest() {
        tracing::info!("  Distance: {:.0}m", latest.total_distance);
        tracing::info!("  Max slope: {:.1}%", latest.max_slope_percent);
    }

    Ok(())
}
