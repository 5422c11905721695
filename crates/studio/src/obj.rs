//! Wavefront OBJ export of the terrain surface.
//!
//! Vertices carry their colour using the common `v x y z r g b` extension.
//! Faces reference both the position and the normal (`f a//a b//b c//c`),
//! 1-based. Contour overlay points, when present, follow as one object per
//! level made of `p` point elements.

use std::fs;
use std::path::Path;

use contours::mesh::{MeshMaterial, TerrainMesh};
use contours::sinks::MeshSink;

use crate::errors::Result;

#[derive(Debug, Default)]
pub struct ObjMeshWriter {
    document: Option<String>,
    uploads: usize,
    frames: usize,
}

impl ObjMeshWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Frames presented since creation.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The last uploaded surface, if any.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Writes `terrain.obj` into `dir`. Does nothing before the first upload.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let Some(document) = &self.document else {
            tracing::warn!("No terrain mesh uploaded, skipping OBJ export");
            return Ok(());
        };
        fs::write(dir.join("terrain.obj"), document)?;
        tracing::info!("Wrote terrain OBJ ({} frames presented) to {}", self.frames, dir.display());
        Ok(())
    }
}

impl MeshSink for ObjMeshWriter {
    fn upload_mesh(&mut self, mesh: &TerrainMesh) {
        self.document = Some(render_obj(mesh));
        self.uploads += 1;
    }

    fn present_frame(&mut self) {
        self.frames += 1;
    }
}

fn render_obj(mesh: &TerrainMesh) -> String {
    let mut obj = String::new();
    obj.push_str("# contour lab terrain\n");
    obj.push_str(&format!("# style {}\n", mesh.style));
    match mesh.material {
        MeshMaterial::Wireframe { color, opacity } => {
            obj.push_str(&format!("# material wireframe {} opacity {opacity}\n", color.hex()));
        }
        MeshMaterial::Shaded { flat_shading } => {
            obj.push_str(&format!("# material shaded flat_shading {flat_shading}\n"));
        }
    }
    obj.push_str("o terrain\n");

    for (p, c) in mesh.positions.iter().zip(&mesh.colors) {
        obj.push_str(&format!(
            "v {:.5} {:.5} {:.5} {:.3} {:.3} {:.3}\n",
            p[0], p[1], p[2], c.r, c.g, c.b
        ));
    }
    for n in &mesh.normals {
        obj.push_str(&format!("vn {:.5} {:.5} {:.5}\n", n[0], n[1], n[2]));
    }
    // Flat shading in OBJ is smoothing group off.
    let smoothing = match mesh.material {
        MeshMaterial::Shaded { flat_shading: true } => "off",
        _ => "1",
    };
    obj.push_str(&format!("s {smoothing}\n"));
    for face in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [face[0] + 1, face[1] + 1, face[2] + 1];
        obj.push_str(&format!("f {a}//{a} {b}//{b} {c}//{c}\n"));
    }

    let mut next_vertex = mesh.positions.len() + 1;
    for contour in &mesh.overlay {
        if contour.points.is_empty() {
            continue;
        }
        obj.push_str(&format!(
            "o contour_{}{}\n",
            contour.level.elevation,
            if contour.level.master { "_master" } else { "" }
        ));
        for p in &contour.points {
            obj.push_str(&format!("v {:.5} {:.5} {:.5}\n", p[0], p[1], p[2]));
        }
        let indices: Vec<String> = (next_vertex..next_vertex + contour.points.len())
            .map(|i| i.to_string())
            .collect();
        obj.push_str(&format!("p {}\n", indices.join(" ")));
        next_vertex += contour.points.len();
    }

    obj
}
