//! Drives a session into the concrete writers and checks what lands on disk.

use std::fs;
use std::time::{Duration, Instant};

use contours::config::SessionConfig;
use contours::models::{NormPoint, RenderStyle, ViewParameters};
use contours::session::{TerrainSession, Viewport};
use contours::sinks::Sinks;
use contours::terrain::TerrainKind;
use studio::{ObjMeshWriter, StatsReporter, SvgMapWriter};

struct Writers {
    map: SvgMapWriter,
    scene: ObjMeshWriter,
    stats: StatsReporter,
}

impl Writers {
    fn new() -> Self {
        Self {
            map: SvgMapWriter::new(),
            scene: ObjMeshWriter::new(),
            stats: StatsReporter::new(),
        }
    }

    fn sinks(&mut self) -> Sinks<'_> {
        Sinks::new(&mut self.map, &mut self.scene, &mut self.stats)
    }
}

fn session(style: RenderStyle) -> TerrainSession {
    let view = ViewParameters {
        terrain: TerrainKind::Caldera,
        resolution: 40,
        render_style: style,
        ..ViewParameters::default()
    };
    TerrainSession::new(view, SessionConfig::default(), Viewport::new(400.0, 300.0)).unwrap()
}

#[test]
fn test_full_render_fills_every_writer() {
    let mut session = session(RenderStyle::Contours3d);
    let mut writers = Writers::new();

    session.render_full(&mut writers.sinks());

    let map = writers.map.map_svg();
    assert!(map.contains(r#"viewBox="0 0 400 300""#));
    assert!(map.contains("profile-line"));
    assert!(writers.map.profile_svg().contains("<polyline"));

    let obj = writers.scene.document().unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("vn ")).count(), 1600);
    assert!(obj.contains("o contour_"));

    let latest = writers.stats.latest().unwrap();
    assert!((latest.total_distance - 700.0).abs() < 1e-9);
}

#[test]
fn test_drag_replay_ends_on_full_profile() {
    let mut session = session(RenderStyle::Elevation);
    let mut writers = Writers::new();
    session.render_full(&mut writers.sinks());

    let t0 = Instant::now();
    session.begin_drag(NormPoint::new(0.2, 0.8));
    for i in 1..=10u32 {
        session.drag_to(t0 + Duration::from_millis(8) * i, NormPoint::new(0.2 + 0.06 * f64::from(i), 0.3));
        session.on_animation_frame(&mut writers.sinks());
    }
    session.end_drag(&mut writers.sinks());

    // 8 ms events against a 32 ms gate: accepted at 8, 40 and 72 ms.
    assert_eq!(writers.map.profile_draws(), 1 + 3 + 1);
    assert_eq!(writers.stats.report().unwrap().updates, 2);
    assert_eq!(writers.scene.frames(), 10);
    assert_eq!(writers.scene.uploads(), 1);

    let map = writers.map.map_svg();
    // Last accepted end point is x = 0.2 + 0.06 * 9 = 0.74.
    assert!(map.contains(r#"x2="296.00" y2="90.00""#));
}

#[test]
fn test_writers_persist_outputs() {
    let dir = std::env::temp_dir().join(format!("contour-lab-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let mut session = session(RenderStyle::Slope);
    let mut writers = Writers::new();
    session.render_full(&mut writers.sinks());

    writers.map.write_to(&dir).unwrap();
    writers.scene.write_to(&dir).unwrap();
    writers.stats.write_to(&dir).unwrap();

    for name in ["map.svg", "profile.svg", "terrain.obj", "stats.json"] {
        let content = fs::read_to_string(dir.join(name)).unwrap();
        assert!(!content.is_empty(), "{name} is empty");
    }
    let stats: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("stats.json")).unwrap()).unwrap();
    assert_eq!(stats["updates"], 1);

    fs::remove_dir_all(&dir).unwrap();
}
