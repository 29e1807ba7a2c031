//! # polyedit
//!
//! The editing core of an interactive polygon mesh tool.
//!
//! polyedit keeps a polygon mesh with boundary in a half-edge structure and
//! edits it in place: faces are fan-triangulated, edges are split and
//! flipped, the whole mesh is refined by Loop subdivision, and faces are
//! deleted with the surrounding boundary repaired. Every face carries a
//! stable [`FaceKey`](mesh::FaceKey) so picking and selection can name faces
//! across edits.
//!
//! ## Features
//!
//! - **Half-edge data structure**: arena storage with type-safe indices and
//!   explicit boundary half-edges
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Stable face keys**: monotonic, never reused, colour-encodable for picking
//! - **Validation**: a full structural check after any edit
//! - **OBJ I/O**: load and save Wavefront OBJ files
//!
//! ## Quick Start
//!
//! ```no_run
//! use polyedit::prelude::*;
//! use polyedit::algo::subdivide::{loop_subdivide, SubdivideOptions};
//!
//! let mut mesh: HalfEdgeMesh = polyedit::io::load("model.obj").unwrap();
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Faces: {}", mesh.num_faces());
//!
//! loop_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();
//! assert!(mesh.is_valid());
//!
//! polyedit::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! ## Editing by Face Key
//!
//! ```
//! use polyedit::prelude::*;
//! use polyedit::algo::delete::delete_face;
//! use polyedit::algo::triangulate::face_to_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 4, 5], vec![1, 2, 3, 4]];
//! let mut mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//!
//! let left = FaceKey::new(1).unwrap();
//! let right = FaceKey::new(2).unwrap();
//!
//! // The left quad becomes two triangles with fresh keys.
//! let pieces = face_to_triangles(&mut mesh, left).unwrap();
//! assert_eq!(pieces.len(), 2);
//! assert_eq!(mesh.num_faces(), 3);
//!
//! // The right quad is still reachable by its key.
//! assert!(delete_face(&mut mesh, right).unwrap());
//! assert_eq!(mesh.num_faces(), 2);
//! assert!(mesh.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod render;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use polyedit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result, TopologyError};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, Exterior, Face, FaceId, FaceKey, HalfEdge,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
