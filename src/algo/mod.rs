//! Topology editing algorithms.
//!
//! Every operation here takes the mesh by `&mut` and leaves it satisfying all
//! the invariants checked by [`HalfEdgeMesh::validate`](crate::mesh::HalfEdgeMesh::validate):
//!
//! - **Triangulation**: fan triangulation of one face or the whole mesh
//! - **Edge operations**: split at midpoint, flip between two triangles
//! - **Subdivision**: in-place Loop subdivision
//! - **Deletion**: face removal with boundary repair
//!
//! Faces are addressed by [`FaceKey`](crate::mesh::FaceKey) where the caller
//! is expected to come from outside the mesh (picking, command lines).

pub mod delete;
pub mod edge;
pub mod subdivide;
pub mod triangulate;
