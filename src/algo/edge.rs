//! Local edge operations: split and flip.

use crate::error::{Result, TopologyError};
use crate::mesh::{HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Split the edge of `he` at its midpoint.
///
/// A new vertex is inserted halfway between the two endpoints and both
/// adjacent loops gain one side. `he` and its opposite keep their identity and
/// now end at the new vertex; the far halves are new half-edges. Faces keep
/// their keys and their cached normals (their geometry is unchanged).
///
/// The new vertex is anchored at an interior half-edge unless the edge is on
/// the boundary, in which case it is anchored at its outgoing boundary
/// half-edge.
///
/// # Errors
///
/// [`TopologyError::BrokenSplit`] if the rewired edges do not form the
/// expected 4-cycle `next(e).opp.next.opp == e`.
///
/// # Example
/// ```
/// use polyedit::algo::edge::split_edge;
/// use polyedit::mesh::{build_from_triangles, HalfEdgeMesh, VertexId};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
/// ];
/// let mut mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// let he = mesh.find_halfedge(VertexId::new(0), VertexId::new(1)).unwrap();
///
/// let mid = split_edge(&mut mesh, he).unwrap();
/// assert_eq!(*mesh.position(mid), Point3::new(1.0, 0.0, 0.0));
/// assert!(mesh.is_valid());
/// ```
pub fn split_edge<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    he: HalfEdgeId<I>,
) -> Result<VertexId<I>> {
    let opp = mesh.opp(he);
    let from = mesh.origin(he);
    let to = mesh.vert(he);

    let mid = mesh.add_vertex(mesh.edge_midpoint(he));

    // Far halves: mid -> to after `he`, mid -> from after `opp`.
    let mut far = HalfEdge::new(to);
    far.face = mesh.face_of(he);
    far.next = mesh.next(he);
    let far = mesh.add_halfedge(far);

    let mut far_opp = HalfEdge::new(from);
    far_opp.face = mesh.face_of(opp);
    far_opp.next = mesh.next(opp);
    let far_opp = mesh.add_halfedge(far_opp);

    mesh.halfedge_mut(he).next = far;
    mesh.halfedge_mut(opp).next = far_opp;
    mesh.halfedge_mut(he).vert = mid;
    mesh.halfedge_mut(opp).vert = mid;
    mesh.link_opp(he, far_opp);
    mesh.link_opp(opp, far);

    mesh.vertex_mut(mid).edge = if mesh.is_boundary_halfedge(opp) {
        far_opp
    } else {
        far
    };

    if mesh.opp(mesh.next(mesh.opp(mesh.next(he)))) != he {
        return Err(TopologyError::BrokenSplit {
            halfedge: he.index(),
        }
        .into());
    }

    let n = mesh.calculate_vertex_normal(mid);
    mesh.vertex_mut(mid).normal = n;

    log::debug!(
        "split edge {:?}-{:?} at new vertex {:?}",
        from,
        to,
        mid
    );

    Ok(mid)
}

/// Flip the edge shared by two triangles.
///
/// With `he` running `a -> b` inside triangle `(a, b, c)` and its opposite
/// inside `(b, a, d)`, the edge is rewired to connect `d` and `c`. No element
/// is created or removed; both faces keep their keys and `he` keeps its id
/// (it now runs `d -> c`).
///
/// # Errors
///
/// - [`TopologyError::FlipBoundary`] if either side of the edge is boundary
/// - [`TopologyError::NotATriangle`] if either face has more than 3 sides
/// - [`TopologyError::EdgeExists`] if `c` and `d` are already connected
pub fn flip_edge<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> Result<()> {
    let opp = mesh.opp(he);
    if mesh.is_boundary_halfedge(he) || mesh.is_boundary_halfedge(opp) {
        return Err(TopologyError::FlipBoundary {
            halfedge: he.index(),
        }
        .into());
    }

    let f1 = mesh.face_of(he);
    let f2 = mesh.face_of(opp);
    for f in [f1, f2] {
        let sides = mesh.face_edge_count(f);
        if sides != 3 {
            return Err(TopologyError::NotATriangle {
                face: f.index(),
                sides,
            }
            .into());
        }
    }

    let e1 = mesh.next(he); // b -> c
    let e2 = mesh.next(e1); // c -> a
    let o1 = mesh.next(opp); // a -> d
    let o2 = mesh.next(o1); // d -> b

    let a = mesh.vert(opp);
    let b = mesh.vert(he);
    let c = mesh.vert(e1);
    let d = mesh.vert(o1);

    if mesh.find_halfedge(c, d).is_some() {
        return Err(TopologyError::EdgeExists {
            from: c.index(),
            to: d.index(),
        }
        .into());
    }

    // he: d -> c in (he, e2, o1); opp: c -> d in (opp, o2, e1).
    mesh.halfedge_mut(he).vert = c;
    mesh.halfedge_mut(opp).vert = d;

    mesh.halfedge_mut(he).next = e2;
    mesh.halfedge_mut(e2).next = o1;
    mesh.halfedge_mut(o1).next = he;

    mesh.halfedge_mut(opp).next = o2;
    mesh.halfedge_mut(o2).next = e1;
    mesh.halfedge_mut(e1).next = opp;

    mesh.halfedge_mut(o1).face = f1;
    mesh.halfedge_mut(e1).face = f2;
    mesh.face_mut(f1).edge = he;
    mesh.face_mut(f2).edge = opp;

    if mesh.vertex(a).edge == he {
        mesh.vertex_mut(a).edge = o1;
    }
    if mesh.vertex(b).edge == opp {
        mesh.vertex_mut(b).edge = e1;
    }

    mesh.refresh_face_normal(f1);
    mesh.refresh_face_normal(f2);
    for v in [a, b, c, d] {
        let n = mesh.calculate_vertex_normal(v);
        mesh.vertex_mut(v).normal = n;
    }

    log::debug!("flipped edge {:?}-{:?} to {:?}-{:?}", a, b, d, c);

    Ok(())
}
