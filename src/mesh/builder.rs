//! Mesh construction from indexed face lists.
//!
//! The input is an [`IndexedMesh`], the in-memory form a file loader
//! produces: a position array plus one corner list per face. Construction
//! pairs up half-edges across shared edges, closes every open edge with a
//! boundary half-edge, chains those into boundary loops and computes normals.

use std::collections::{HashMap, HashSet};

use nalgebra::{Point2, Point3, Vector3};

use super::halfedge::{HalfEdge, HalfEdgeMesh};
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// One corner of an indexed face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    /// Index into [`IndexedMesh::positions`].
    pub position: usize,
    /// Index into [`IndexedMesh::uvs`], if given.
    pub uv: Option<usize>,
    /// Index into [`IndexedMesh::normals`], if given.
    pub normal: Option<usize>,
}

impl Corner {
    /// A corner carrying only a position index.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            uv: None,
            normal: None,
        }
    }
}

/// A parsed polygon soup.
///
/// UVs and normals ride along for loaders that have them; construction only
/// reads positions and the position index of each corner.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Texture coordinates.
    pub uvs: Vec<Point2<f64>>,
    /// Per-corner normals as stored in the source file.
    pub normals: Vec<Vector3<f64>>,
    /// Faces as corner lists, counter-clockwise seen from outside.
    pub faces: Vec<Vec<Corner>>,
}

impl IndexedMesh {
    /// Build from positions and plain position-index polygons.
    pub fn from_polygons<F>(positions: Vec<Point3<f64>>, faces: F) -> Self
    where
        F: IntoIterator,
        F::Item: AsRef<[usize]>,
    {
        let faces = faces
            .into_iter()
            .map(|f| f.as_ref().iter().map(|&p| Corner::new(p)).collect())
            .collect();
        Self {
            positions,
            faces,
            ..Default::default()
        }
    }

    /// Position indices of face `i`.
    pub fn face_positions(&self, i: usize) -> Vec<usize> {
        self.faces[i].iter().map(|c| c.position).collect()
    }
}

/// Reject faces the half-edge structure cannot represent.
fn check_faces(input: &IndexedMesh) -> Result<()> {
    if input.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in input.faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(MeshError::TooFewVertices {
                face: fi,
                count: face.len(),
            });
        }
        let mut seen = HashSet::with_capacity(face.len());
        for corner in face {
            if corner.position >= input.positions.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: corner.position,
                });
            }
            if !seen.insert(corner.position) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    Ok(())
}

#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Build a half-edge mesh from an indexed polygon soup.
///
/// Faces keep their input order and receive keys 1, 2, 3, ... in that order.
///
/// # Errors
///
/// - [`MeshError::EmptyMesh`] if there are no faces
/// - [`MeshError::TooFewVertices`], [`MeshError::InvalidVertexIndex`],
///   [`MeshError::DegenerateFace`] for malformed faces
/// - [`MeshError::NonManifoldEdge`] if an edge is used by more than two
///   faces or twice in the same direction
/// - [`MeshError::NonManifoldVertex`] if a vertex has two boundary gaps
///
/// # Example
/// ```
/// use polyedit::mesh::{build_from_indexed, HalfEdgeMesh, IndexedMesh};
/// use nalgebra::Point3;
///
/// let input = IndexedMesh::from_polygons(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     [[0, 1, 2, 3]],
/// );
///
/// let mesh: HalfEdgeMesh = build_from_indexed(&input).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_halfedges(), 8);
/// ```
pub fn build_from_indexed<I: MeshIndex>(input: &IndexedMesh) -> Result<HalfEdgeMesh<I>> {
    check_faces(input)?;

    let corner_count: usize = input.faces.iter().map(Vec::len).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(
        input.positions.len(),
        corner_count + corner_count / 2,
        input.faces.len(),
    );

    let vertex_ids: Vec<VertexId<I>> = input
        .positions
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    // Half-edges still waiting for their opposite, keyed by undirected edge.
    let mut unmatched: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::new();
    let mut matched: HashSet<(usize, usize)> = HashSet::new();

    for face in &input.faces {
        let n = face.len();
        let first = HalfEdgeId::<I>::new(mesh.halfedges.len());
        let (face_id, _key) = mesh.add_face(first);

        // Half-edge k runs from corner k-1 to corner k.
        let ids: Vec<HalfEdgeId<I>> = face
            .iter()
            .map(|c| {
                let mut he = HalfEdge::new(vertex_ids[c.position]);
                he.face = face_id;
                mesh.add_halfedge(he)
            })
            .collect();

        for k in 0..n {
            let from = face[(k + n - 1) % n].position;
            let to = face[k].position;
            let he = ids[k];

            mesh.halfedge_mut(he).next = ids[(k + 1) % n];
            mesh.vertex_mut(vertex_ids[from]).edge = he;

            let key = edge_key(from, to);
            if matched.contains(&key) {
                return Err(MeshError::NonManifoldEdge { v0: from, v1: to });
            }
            match unmatched.remove(&key) {
                Some(other) => {
                    if mesh.vert(other) != vertex_ids[from] {
                        return Err(MeshError::NonManifoldEdge { v0: from, v1: to });
                    }
                    mesh.link_opp(he, other);
                    matched.insert(key);
                }
                None => {
                    unmatched.insert(key, he);
                }
            }
        }

        mesh.refresh_face_normal(face_id);
    }

    let mut open: Vec<HalfEdgeId<I>> = unmatched.into_values().collect();
    open.sort();
    close_boundary(&mut mesh, &open)?;

    let vids: Vec<VertexId<I>> = mesh.vertex_ids().collect();
    for v in vids {
        let n = mesh.calculate_vertex_normal(v);
        mesh.vertex_mut(v).normal = n;
    }

    log::debug!(
        "built mesh: {} vertices, {} half-edges ({} on the boundary), {} faces",
        mesh.num_vertices(),
        mesh.num_halfedges(),
        open.len(),
        mesh.num_faces()
    );

    Ok(mesh)
}

/// Give every unmatched interior half-edge a boundary opposite and chain the
/// new half-edges into loops.
fn close_boundary<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, open: &[HalfEdgeId<I>]) -> Result<()> {
    let mut boundary = Vec::with_capacity(open.len());

    for &inner in open {
        // inner: u -> v inside its face; the boundary twin runs v -> u.
        let u = mesh.vert(mesh.loop_prev(inner)?);
        let v = mesh.vert(inner);
        let outer = mesh.add_halfedge(HalfEdge::new(u));
        mesh.link_opp(inner, outer);

        if mesh.is_boundary_halfedge(mesh.vertex(v).edge) {
            return Err(MeshError::NonManifoldVertex { vertex: v.index() });
        }
        mesh.vertex_mut(v).edge = outer;
        boundary.push(outer);
    }

    // outer: v -> u continues with the boundary half-edge leaving u.
    for outer in boundary {
        let u = mesh.vert(outer);
        let after = mesh.vertex(u).edge;
        mesh.halfedge_mut(outer).next = after;
    }

    Ok(())
}

/// Build a half-edge mesh from positions and polygon index lists.
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<HalfEdgeMesh<I>> {
    build_from_indexed(&IndexedMesh::from_polygons(vertices.to_vec(), faces))
}

/// Build a half-edge mesh from positions and triangles.
///
/// # Example
/// ```
/// use polyedit::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Convert a half-edge mesh back to an indexed polygon soup.
///
/// Live vertices are renumbered densely in creation order; faces are listed
/// in creation order with their loop starting at the anchor's target.
pub fn to_indexed<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> IndexedMesh {
    let mut remap: HashMap<VertexId<I>, usize> = HashMap::with_capacity(mesh.num_vertices());
    let mut positions = Vec::with_capacity(mesh.num_vertices());
    for v in mesh.vertex_ids() {
        remap.insert(v, positions.len());
        positions.push(*mesh.position(v));
    }

    let faces = mesh
        .face_ids()
        .map(|f| {
            mesh.face_vertices(f)
                .map(|v| Corner::new(remap[&v]))
                .collect()
        })
        .collect();

    IndexedMesh {
        positions,
        faces,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FaceId, FaceKey};

    fn single_quad() -> IndexedMesh {
        IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            [[0, 1, 2, 3]],
        )
    }

    fn tetrahedron() -> IndexedMesh {
        IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, 0.5, 1.0),
            ],
            [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]],
        )
    }

    #[test]
    fn test_single_quad() {
        let mesh: HalfEdgeMesh = build_from_indexed(&single_quad()).unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_vertices(), 4);
        // 4 interior half-edges + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 8);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
            assert!(mesh.is_boundary_halfedge(mesh.vertex(v).edge));
        }

        // Normal is the cross product of the first two sides.
        let f = FaceId::new(0);
        let e1 = Point3::new(1.0, 0.0, 0.0) - Point3::new(0.0, 0.0, 0.0);
        let e2 = Point3::new(1.0, 1.0, 0.0) - Point3::new(1.0, 0.0, 0.0);
        assert!((mesh.face_normal(f) - e1.cross(&e2)).norm() < 1e-10);
        assert_eq!(mesh.face_key(f), FaceKey::new(1));
    }

    #[test]
    fn test_boundary_loop_is_closed() {
        let mesh: HalfEdgeMesh = build_from_indexed(&single_quad()).unwrap();
        let start = mesh
            .halfedge_ids()
            .find(|&he| mesh.is_boundary_halfedge(he))
            .unwrap();
        let ring: Vec<_> = mesh.loop_halfedges(start).collect();
        assert_eq!(ring.len(), 4);
        assert!(ring.iter().all(|&he| mesh.is_boundary_halfedge(he)));
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let mesh: HalfEdgeMesh = build_from_indexed(&tetrahedron()).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_valid());
        for v in mesh.vertex_ids() {
            assert!(!mesh.is_boundary_vertex(v));
            assert_eq!(mesh.valence(v), 3);
            assert!((mesh.vertex_normal(v).norm() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_keys_follow_input_order() {
        let mesh: HalfEdgeMesh = build_from_indexed(&tetrahedron()).unwrap();
        let keys: Vec<u32> = mesh
            .face_ids()
            .map(|f| mesh.face_key(f).unwrap().get())
            .collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mixed_polygons() {
        // A quad and a triangle sharing edge 1-2.
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(2.0, 0.5, 0.0),
            ],
            vec![vec![0, 1, 2, 3], vec![1, 4, 2]],
        );
        let mesh: HalfEdgeMesh = build_from_indexed(&input).unwrap();

        assert_eq!(mesh.num_faces(), 2);
        // 7 interior + 5 boundary
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_valid());
        assert!(!mesh.is_triangle_mesh());
    }

    #[test]
    fn test_roundtrip() {
        let input = tetrahedron();
        let mesh: HalfEdgeMesh = build_from_indexed(&input).unwrap();
        let out = to_indexed(&mesh);

        assert_eq!(out.positions.len(), input.positions.len());
        for (a, b) in out.positions.iter().zip(&input.positions) {
            assert!((a - b).norm() < 1e-10);
        }
        for i in 0..input.faces.len() {
            assert_eq!(out.face_positions(i), input.face_positions(i));
        }
    }

    #[test]
    fn test_empty_input() {
        let input = IndexedMesh::default();
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let input = IndexedMesh::from_polygons(vec![Point3::origin()], [[0, 1, 2]]);
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_too_few_vertices() {
        let input = IndexedMesh::from_polygons(
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
            [[0, 1]],
        );
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(
            result,
            Err(MeshError::TooFewVertices { face: 0, count: 2 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
            ],
            [[0, 0, 2]],
        );
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_three_faces_on_one_edge() {
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, -1.0, 0.0),
                Point3::new(0.5, 0.0, 1.0),
            ],
            [[0, 1, 2], [1, 0, 3], [0, 1, 4]],
        );
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_inconsistent_orientation() {
        // Both triangles walk edge 0 -> 1 in the same direction.
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(0.5, -1.0, 0.0),
            ],
            [[0, 1, 2], [0, 1, 3]],
        );
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })));
    }

    #[test]
    fn test_bowtie_vertex() {
        // Two triangles touching only at vertex 0.
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(-1.0, 0.0, 0.0),
                Point3::new(-1.0, -1.0, 0.0),
            ],
            [[0, 1, 2], [0, 3, 4]],
        );
        let result: Result<HalfEdgeMesh> = build_from_indexed(&input);
        assert!(matches!(result, Err(MeshError::NonManifoldVertex { vertex: 0 })));
    }

    #[test]
    fn test_unused_position_stays_isolated() {
        let input = IndexedMesh::from_polygons(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
                Point3::new(9.0, 9.0, 9.0),
            ],
            [[0, 1, 2]],
        );
        let mesh: HalfEdgeMesh = build_from_indexed(&input).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        let lonely = VertexId::new(3);
        assert!(!mesh.vertex(lonely).edge.is_valid());
        assert_eq!(*mesh.vertex_normal(lonely), Vector3::zeros());
        assert!(mesh.is_valid());
    }
}
