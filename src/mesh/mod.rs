//! Core mesh data structures.
//!
//! This module provides the half-edge mesh representation and related types
//! for representing and editing polygon meshes with boundary.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`], which stores a polygon mesh as a
//! half-edge (doubly-connected edge list) structure over index arenas. Faces
//! may have any number of sides; open edges are closed by boundary half-edges
//! chained into loops.
//!
//! # Identifiers
//!
//! Mesh elements are addressed by type-safe arena indices:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! Code outside the mesh (picking, selection, command lines) names faces by
//! [`FaceKey`] instead: a 32-bit value that is never reused.
//!
//! # Construction
//!
//! Meshes are typically constructed from file I/O or from face-vertex lists:
//!
//! ```
//! use polyedit::mesh::{HalfEdgeMesh, build_from_polygons};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2, 3]];
//!
//! let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod halfedge;
mod index;
mod registry;
mod validate;

pub use builder::{
    build_from_indexed, build_from_polygons, build_from_triangles, to_indexed, Corner, IndexedMesh,
};
pub use halfedge::{
    Exterior, Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter,
};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use registry::{FaceKey, FaceRegistry};
pub use validate::{ValidationReport, Violation};

pub(crate) use halfedge::unit_or_zero;
