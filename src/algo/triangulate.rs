//! Fan triangulation of polygon faces.
//!
//! An n-gon is split into n - 2 triangles that all share the target vertex
//! of the face's anchor half-edge (the apex). The original face keeps its key
//! and ends up as the last triangle of the fan; every other triangle is a new
//! face with a fresh key.

use crate::error::{MeshError, Result, TopologyError};
use crate::mesh::{FaceId, FaceKey, HalfEdge, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// Cut the triangle `(vert(h), vert(next(h)), vert(next(next(h))))` off the
/// face containing `h`.
///
/// The cut adds one reciprocal half-edge pair: `ear_side` closes the new
/// triangle and `rest_side` takes the triangle's place in the remaining face,
/// right after `h`. Returns the new face and `rest_side`, so repeated cuts can
/// walk around the face. The caller guarantees the face has at least four
/// sides.
pub(crate) fn cut_ear<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    h: HalfEdgeId<I>,
) -> (FaceId<I>, HalfEdgeId<I>) {
    let face = mesh.face_of(h);
    let a = mesh.next(h);
    let b = mesh.next(a);
    let rest = mesh.next(b);
    let apex = mesh.vert(h);
    let far = mesh.vert(b);

    let (ear, _) = mesh.add_face(a);

    let mut closing = HalfEdge::new(apex);
    closing.face = ear;
    closing.next = a;
    let ear_side = mesh.add_halfedge(closing);

    let mut shortcut = HalfEdge::new(far);
    shortcut.face = face;
    shortcut.next = rest;
    let rest_side = mesh.add_halfedge(shortcut);

    mesh.link_opp(ear_side, rest_side);
    mesh.halfedge_mut(b).next = ear_side;
    mesh.halfedge_mut(h).next = rest_side;
    mesh.halfedge_mut(a).face = ear;
    mesh.halfedge_mut(b).face = ear;
    mesh.face_mut(face).edge = h;

    mesh.refresh_face_normal(face);
    mesh.refresh_face_normal(ear);

    (ear, rest_side)
}

/// Fan-triangulate one face in place.
///
/// Returns the faces the polygon was split into, starting with the original
/// face. Triangles are left untouched.
pub(crate) fn triangulate_face<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    f: FaceId<I>,
) -> std::result::Result<Vec<FaceId<I>>, TopologyError> {
    let sides = mesh.face_edge_count(f);
    if sides < 3 {
        return Err(TopologyError::DegenerateFace {
            face: f.index(),
            sides,
        });
    }

    let mut created = vec![f];
    if sides == 3 {
        return Ok(created);
    }

    let corners: Vec<VertexId<I>> = mesh.face_vertices(f).collect();
    let anchor = mesh.face(f).edge;
    for _ in 3..sides {
        let (ear, _) = cut_ear(mesh, anchor);
        created.push(ear);
    }

    for v in corners {
        let n = mesh.calculate_vertex_normal(v);
        mesh.vertex_mut(v).normal = n;
    }

    Ok(created)
}

/// Fan-triangulate the face named by `key`.
///
/// Returns the keys of the resulting triangles, starting with `key` itself.
///
/// # Errors
///
/// [`MeshError::UnknownFace`] if no live face has `key`;
/// [`MeshError::Topology`] if the face loop has fewer than three sides.
///
/// # Example
/// ```
/// use polyedit::algo::triangulate::face_to_triangles;
/// use polyedit::mesh::{build_from_polygons, FaceKey, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mut mesh: HalfEdgeMesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();
///
/// let keys = face_to_triangles(&mut mesh, FaceKey::new(1).unwrap()).unwrap();
/// assert_eq!(keys.len(), 2);
/// assert_eq!(mesh.num_faces(), 2);
/// ```
pub fn face_to_triangles<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    key: FaceKey,
) -> Result<Vec<FaceKey>> {
    let f = mesh.face_by_key(key).ok_or(MeshError::UnknownFace(key))?;
    let faces = triangulate_face(mesh, f)?;

    log::debug!("triangulated face {} into {} triangles", key, faces.len());

    Ok(faces.into_iter().filter_map(|f| mesh.face_key(f)).collect())
}

/// Fan-triangulate every face of the mesh.
///
/// The face list is snapshotted first, so triangles created along the way
/// are not revisited. Returns the number of faces added; an all-triangle
/// mesh is left unchanged and returns 0.
pub fn convert_to_triangles<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) -> Result<usize> {
    let snapshot: Vec<FaceId<I>> = mesh.face_ids().collect();
    let before = mesh.num_faces();

    for f in snapshot {
        triangulate_face(mesh, f)?;
    }

    let added = mesh.num_faces() - before;
    if added > 0 {
        log::debug!("converted mesh to triangles, {} faces added", added);
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, build_from_triangles};
    use nalgebra::{Point3, Vector3};

    fn hexagon() -> HalfEdgeMesh {
        let vertices: Vec<Point3<f64>> = (0..6)
            .map(|i| {
                let t = i as f64 * std::f64::consts::PI / 3.0;
                Point3::new(t.cos(), t.sin(), 0.0)
            })
            .collect();
        build_from_polygons(&vertices, &[[0, 1, 2, 3, 4, 5]]).unwrap()
    }

    fn tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        build_from_triangles(&vertices, &[[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]]).unwrap()
    }

    /// Unit cube made of six quads, outward facing.
    fn cube() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_hexagon_fan() {
        let mut mesh = hexagon();
        let key = FaceKey::new(1).unwrap();
        let apex = mesh.vert(mesh.face(mesh.face_by_key(key).unwrap()).edge);

        let keys = face_to_triangles(&mut mesh, key).unwrap();

        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], key);
        assert_eq!(mesh.num_faces(), 4);
        // 3 diagonals added
        assert_eq!(mesh.num_halfedges(), 12 + 6);
        assert!(mesh.is_triangle_mesh());
        assert!(mesh.is_valid());

        // Every triangle touches the apex.
        for f in mesh.face_ids() {
            assert!(mesh.face_vertices(f).any(|v| v == apex));
            let n = mesh.face_normal(f);
            assert!(n.z > 0.0);
        }
    }

    #[test]
    fn test_new_keys_are_fresh() {
        let mut mesh = hexagon();
        let keys = face_to_triangles(&mut mesh, FaceKey::new(1).unwrap()).unwrap();
        let raw: Vec<u32> = keys.iter().map(|k| k.get()).collect();
        assert_eq!(raw, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_triangle_is_untouched() {
        let mut mesh = tetrahedron();
        let keys = face_to_triangles(&mut mesh, FaceKey::new(2).unwrap()).unwrap();
        assert_eq!(keys, vec![FaceKey::new(2).unwrap()]);
        assert_eq!(mesh.num_faces(), 4);
    }

    #[test]
    fn test_convert_is_noop_on_triangles() {
        let mut mesh = tetrahedron();
        let next_key = mesh.registry().peek_next();

        let added = convert_to_triangles(&mut mesh).unwrap();

        assert_eq!(added, 0);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_faces(), 4);
        // No registrations happened.
        assert_eq!(mesh.registry().peek_next(), next_key);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_convert_cube() {
        let mut mesh = cube();
        let added = convert_to_triangles(&mut mesh).unwrap();

        assert_eq!(added, 6);
        assert_eq!(mesh.num_faces(), 12);
        assert_eq!(mesh.num_edges(), 18);
        assert!(mesh.is_triangle_mesh());
        assert!(mesh.is_valid());

        // Closed mesh: V - E + F = 2
        let euler =
            mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64;
        assert_eq!(euler, 2);

        // Normals still point away from the cube centre.
        for f in mesh.face_ids() {
            let outward = mesh.face_centroid(f) - Point3::new(0.5, 0.5, 0.5);
            assert!(mesh.face_normal(f).dot(&outward) > 0.0);
        }
        for v in mesh.vertex_ids() {
            let outward = mesh.position(v) - Point3::new(0.5, 0.5, 0.5);
            assert!(mesh.vertex_normal(v).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_unknown_key() {
        let mut mesh = tetrahedron();
        let missing = FaceKey::new(99).unwrap();
        let result = face_to_triangles(&mut mesh, missing);
        assert!(matches!(result, Err(MeshError::UnknownFace(k)) if k == missing));
    }

    #[test]
    fn test_quad_normals() {
        let mut mesh = build_from_polygons::<u32, _>(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2, 3]],
        )
        .unwrap();
        convert_to_triangles(&mut mesh).unwrap();

        for f in mesh.face_ids() {
            let n = mesh.face_normal(f).normalize();
            assert!((n - Vector3::z()).norm() < 1e-10);
        }
    }
}
