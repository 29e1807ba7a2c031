//! Face deletion with boundary repair.
//!
//! Removing a face opens a hole (or widens an existing one). The face's own
//! half-edges become boundary half-edges, and the boundary loops around it
//! are re-stitched so the mesh stays a valid mesh-with-boundary:
//!
//! - an edge that already had the boundary on its other side disappears
//! - a vertex whose only face was the deleted one disappears
//! - every surviving boundary vertex is re-anchored at its outgoing boundary
//!   half-edge
//!
//! A face is refused (nothing changes) when removing it would pinch a
//! vertex: the vertex already sits on the boundary, yet both of the face's
//! edges at that corner have faces on their far side. Deleting it would give
//! the vertex two separate boundary gaps.

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, FaceKey, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// How one corner of the deleted face is repaired.
#[derive(Debug, Clone, Copy)]
enum Corner<I: MeshIndex> {
    /// Both face edges at the corner are boundary: the vertex goes away.
    Isolated(VertexId<I>),
    /// Neither is: the corner opens into a new boundary gap.
    Interior {
        vertex: VertexId<I>,
        outgoing: HalfEdgeId<I>,
    },
    /// Only the outgoing edge is boundary: the incoming half-edge continues
    /// along the existing boundary.
    JoinAfter {
        incoming: HalfEdgeId<I>,
        boundary_next: HalfEdgeId<I>,
    },
    /// Only the incoming edge is boundary: the boundary half-edge arriving at
    /// the vertex continues into the outgoing half-edge.
    JoinBefore {
        vertex: VertexId<I>,
        boundary_prev: HalfEdgeId<I>,
        outgoing: HalfEdgeId<I>,
    },
}

/// Delete the face named by `key`.
///
/// Returns `Ok(true)` when the face was removed and `Ok(false)` when removal
/// would leave a non-manifold vertex; in that case the mesh is unchanged.
///
/// # Errors
///
/// [`MeshError::UnknownFace`] if no live face has `key`;
/// [`MeshError::Topology`] if the surrounding boundary loops are corrupted.
///
/// # Example
/// ```
/// use polyedit::algo::delete::delete_face;
/// use polyedit::mesh::{build_from_triangles, FaceKey, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, -1.0, 0.0),
/// ];
/// let mut mesh: HalfEdgeMesh =
///     build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap();
///
/// assert!(delete_face(&mut mesh, FaceKey::new(2).unwrap()).unwrap());
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_vertices(), 3);
/// assert!(mesh.is_valid());
/// ```
pub fn delete_face<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, key: FaceKey) -> Result<bool> {
    let f = mesh.face_by_key(key).ok_or(MeshError::UnknownFace(key))?;
    let loop_edges: Vec<HalfEdgeId<I>> = mesh.face_halfedges(f).collect();
    let n = loop_edges.len();

    // Plan every corner before touching anything, so a refusal or a
    // topology error leaves the mesh as it was.
    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let incoming = loop_edges[i];
        let outgoing = loop_edges[(i + 1) % n];
        let vertex = mesh.vert(incoming);
        let in_boundary = mesh.is_boundary_halfedge(mesh.opp(incoming));
        let out_boundary = mesh.is_boundary_halfedge(mesh.opp(outgoing));

        let corner = match (in_boundary, out_boundary) {
            (true, true) => Corner::Isolated(vertex),
            (false, false) => {
                if mesh.is_boundary_vertex(vertex) {
                    log::debug!(
                        "refusing to delete face {}: vertex {:?} would be pinched",
                        key,
                        vertex
                    );
                    return Ok(false);
                }
                Corner::Interior { vertex, outgoing }
            }
            (false, true) => Corner::JoinAfter {
                incoming,
                boundary_next: mesh.next(mesh.opp(outgoing)),
            },
            (true, false) => Corner::JoinBefore {
                vertex,
                boundary_prev: mesh.loop_prev(mesh.opp(incoming))?,
                outgoing,
            },
        };
        corners.push(corner);
    }

    // Edges whose far side is already boundary vanish together with it.
    let doomed: Vec<HalfEdgeId<I>> = loop_edges
        .iter()
        .copied()
        .filter(|&he| mesh.is_boundary_halfedge(mesh.opp(he)))
        .collect();

    let mut removed_vertices = 0usize;
    let mut touched = Vec::with_capacity(n);
    for corner in corners {
        match corner {
            Corner::Isolated(v) => {
                mesh.remove_vertex(v);
                removed_vertices += 1;
            }
            Corner::Interior { vertex, outgoing } => {
                mesh.vertex_mut(vertex).edge = outgoing;
                touched.push(vertex);
            }
            Corner::JoinAfter {
                incoming,
                boundary_next,
            } => {
                mesh.halfedge_mut(incoming).next = boundary_next;
                touched.push(mesh.vert(incoming));
            }
            Corner::JoinBefore {
                vertex,
                boundary_prev,
                outgoing,
            } => {
                mesh.halfedge_mut(boundary_prev).next = outgoing;
                mesh.vertex_mut(vertex).edge = outgoing;
                touched.push(vertex);
            }
        }
    }

    for &he in &loop_edges {
        mesh.halfedge_mut(he).face = FaceId::invalid();
    }
    for &he in &doomed {
        let opp = mesh.opp(he);
        mesh.remove_halfedge(opp);
        mesh.remove_halfedge(he);
    }
    mesh.remove_face(f);

    for v in touched {
        let normal = mesh.calculate_vertex_normal(v);
        mesh.vertex_mut(v).normal = normal;
    }

    log::debug!(
        "deleted face {}: removed {} edges and {} vertices",
        key,
        doomed.len(),
        removed_vertices
    );

    Ok(true)
}
