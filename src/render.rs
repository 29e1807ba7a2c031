//! Draw lists for a renderer and color-coded face picking.
//!
//! [`render_faces`] flattens the live faces into [`RenderFace`] records a
//! renderer can upload without touching the half-edge structure. Each record
//! carries a picking color: the face key packed into RGBA, so a pick buffer
//! read back from the GPU maps straight to a face with [`color_to_key`].

use nalgebra::{Point3, Vector3};

use crate::mesh::{unit_or_zero, FaceKey, HalfEdgeMesh, MeshIndex};

/// Which normals a [`RenderFace`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// One normal per face, repeated at every corner.
    #[default]
    Flat,
    /// The vertex normal at every corner.
    Smooth,
}

/// Drawing state passed to [`render_faces`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Normal source.
    pub shading: Shading,
    /// Faces drawn highlighted (a current selection).
    pub highlighted: Vec<FaceKey>,
}

impl RenderOptions {
    /// Options with the given shading and no highlight.
    pub fn new(shading: Shading) -> Self {
        Self {
            shading,
            highlighted: Vec::new(),
        }
    }

    /// Highlight the given faces.
    pub fn with_highlighted(mut self, keys: impl IntoIterator<Item = FaceKey>) -> Self {
        self.highlighted = keys.into_iter().collect();
        self
    }
}

/// One polygon ready to draw.
#[derive(Debug, Clone)]
pub struct RenderFace {
    /// Key of the face this was produced from.
    pub key: FaceKey,
    /// Picking color, see [`key_to_color`].
    pub color: [u8; 4],
    /// Corner positions in loop order.
    pub positions: Vec<Point3<f64>>,
    /// Unit normals, one per corner.
    pub normals: Vec<Vector3<f64>>,
    /// Whether the face is in [`RenderOptions::highlighted`].
    pub highlighted: bool,
}

/// Pack a face key into an RGBA color (little-endian: red is the low byte).
pub fn key_to_color(key: FaceKey) -> [u8; 4] {
    key.get().to_le_bytes()
}

/// Recover the face key from a picking color.
///
/// Returns `None` for the all-zero color, which the renderer uses for the
/// background.
pub fn color_to_key(color: [u8; 4]) -> Option<FaceKey> {
    FaceKey::new(u32::from_le_bytes(color))
}

/// Build draw records for every live face, in key (creation) order.
pub fn render_faces<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &RenderOptions,
) -> Vec<RenderFace> {
    mesh.registry()
        .iter()
        .map(|(key, f)| {
            let verts: Vec<_> = mesh.face_vertices(f).collect();
            let positions = verts.iter().map(|&v| *mesh.position(v)).collect();
            let normals = match options.shading {
                Shading::Flat => vec![unit_or_zero(*mesh.face_normal(f)); verts.len()],
                Shading::Smooth => verts.iter().map(|&v| *mesh.vertex_normal(v)).collect(),
            };
            RenderFace {
                key,
                color: key_to_color(key),
                positions,
                normals,
                highlighted: options.highlighted.contains(&key),
            }
        })
        .collect()
}
