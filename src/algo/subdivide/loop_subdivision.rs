//! Loop subdivision for triangle meshes.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::algo::edge::split_edge;
use crate::algo::triangulate::{convert_to_triangles, cut_ear};
use crate::error::{Result, TopologyError};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

use super::SubdivideOptions;

/// Performs Loop subdivision in place.
///
/// Faces that are not triangles are fan-triangulated first. Each iteration
/// quadruples the number of triangles.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide (modified in place)
/// * `options` - Subdivision parameters
///
/// # Vertex Rules
///
/// - **Interior edge vertex**: `3/8 * (a + b) + 1/8 * (c + d)` with `c`, `d`
///   the apexes of the two triangles sharing the edge
/// - **Boundary edge vertex**: `1/2 * (a + b)`
/// - **Original vertex**, with `k` refined neighbours summing to `s`:
///   - `k == 2`: `1/4 * s + 1/2 * v`
///   - otherwise: `(1 - 8/5 * k * β) * v + 8/5 * β * s`, where
///     `β = 3 / (8k)` for `k > 3` and `3/16` for `k == 3`
///
/// The refined neighbours of an original vertex are the new edge vertices
/// around it, which is why the weights carry the extra `8/5`.
///
/// # Errors
///
/// [`TopologyError::InvalidValence`] if an original vertex has fewer than two
/// neighbours after refinement, and any error from triangulation or edge
/// splitting. These all indicate a corrupted mesh.
pub fn loop_subdivide<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<()> {
    for iter in 0..options.iterations {
        loop_subdivide_once(mesh, options.parallel)?;
        log::debug!(
            "loop subdivision pass {}/{}: {} vertices, {} faces",
            iter + 1,
            options.iterations,
            mesh.num_vertices(),
            mesh.num_faces()
        );
    }
    Ok(())
}

/// Perform one iteration of Loop subdivision.
fn loop_subdivide_once<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, parallel: bool) -> Result<()> {
    if mesh.num_faces() == 0 {
        return Ok(());
    }

    convert_to_triangles(mesh)?;

    let view: &HalfEdgeMesh<I> = mesh;
    let originals: Vec<VertexId<I>> = view
        .vertex_ids()
        .filter(|&v| view.vertex(v).edge.is_valid())
        .collect();
    let faces: Vec<FaceId<I>> = view.face_ids().collect();
    let first_new = view.vertices.len();

    // Edge points come from the unrefined mesh, so compute them all first.
    let edge_points: Vec<(HalfEdgeId<I>, Point3<f64>)> = view
        .edge_ids()
        .map(|he| (he, edge_point(view, he)))
        .collect();

    for (he, position) in edge_points {
        let mid = split_edge(mesh, he)?;
        mesh.set_position(mid, position);
    }

    for f in faces {
        cut_corners(mesh, f, first_new)?;
    }

    let view: &HalfEdgeMesh<I> = mesh;
    let smoothed = if parallel {
        originals
            .par_iter()
            .map(|&v| smoothed_position(view, v).map(|p| (v, p)))
            .collect::<std::result::Result<Vec<_>, TopologyError>>()?
    } else {
        originals
            .iter()
            .map(|&v| smoothed_position(view, v).map(|p| (v, p)))
            .collect::<std::result::Result<Vec<_>, TopologyError>>()?
    };
    for (v, p) in smoothed {
        mesh.set_position(v, p);
    }

    mesh.update_normals(parallel);
    Ok(())
}

/// Loop edge point of the edge of `he`.
fn edge_point<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> Point3<f64> {
    let opp = mesh.opp(he);
    if mesh.is_boundary_halfedge(he) || mesh.is_boundary_halfedge(opp) {
        return mesh.edge_midpoint(he);
    }

    let a = mesh.position(mesh.origin(he)).coords;
    let b = mesh.position(mesh.vert(he)).coords;
    let c = mesh.position(mesh.vert(mesh.next(he))).coords;
    let d = mesh.position(mesh.vert(mesh.next(opp))).coords;

    Point3::from((a + b) * (3.0 / 8.0) + (c + d) * (1.0 / 8.0))
}

/// Split a hexagon `(corner, edge point, corner, ...)` into four triangles.
///
/// Vertex slots at or above `first_new` are edge points.
fn cut_corners<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    f: FaceId<I>,
    first_new: usize,
) -> std::result::Result<(), TopologyError> {
    let sides = mesh.face_edge_count(f);
    let is_edge_point = |v: VertexId<I>| v.index() >= first_new;

    // A half-edge entering an edge point whose successor enters a corner.
    let start = mesh.face_halfedges(f).find(|&he| {
        is_edge_point(mesh.vert(he)) && !is_edge_point(mesh.vert(mesh.next(he)))
    });

    let Some(mut he) = start.filter(|_| sides == 6) else {
        return Err(TopologyError::DegenerateFace {
            face: f.index(),
            sides,
        });
    };

    for _ in 0..3 {
        let (_, rest) = cut_ear(mesh, he);
        he = rest;
    }
    Ok(())
}

/// New position of an original vertex from its refined one-ring.
fn smoothed_position<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    v: VertexId<I>,
) -> std::result::Result<Point3<f64>, TopologyError> {
    let old = mesh.position(v).coords;
    let mut sum = Vector3::zeros();
    let mut k = 0usize;
    for n in mesh.vertex_neighbors(v) {
        sum += mesh.position(n).coords;
        k += 1;
    }

    if k < 2 {
        return Err(TopologyError::InvalidValence {
            vertex: v.index(),
            valence: k,
        });
    }
    if k == 2 {
        return Ok(Point3::from(sum * 0.25 + old * 0.5));
    }

    let beta = loop_beta(k) * 8.0 / 5.0;
    Ok(Point3::from(old * (1.0 - beta * k as f64) + sum * beta))
}

/// Loop's `β` weight for valence `k`.
fn loop_beta(k: usize) -> f64 {
    if k > 3 {
        3.0 / (8.0 * k as f64)
    } else {
        3.0 / 16.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, build_from_triangles, FaceKey};

    fn create_tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn create_single_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn create_two_triangles() -> HalfEdgeMesh {
        // Two triangles sharing edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(1.0, -2.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn counts(mesh: &HalfEdgeMesh) -> (usize, usize, usize) {
        (mesh.num_vertices(), mesh.num_edges(), mesh.num_faces())
    }

    #[test]
    fn test_loop_subdivide_single_triangle() {
        let mut mesh = create_single_triangle();

        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 1 triangle -> 4 triangles
        assert_eq!(mesh.num_faces(), 4);
        // 3 original + 3 edge vertices = 6
        assert_eq!(mesh.num_vertices(), 6);
        assert!(mesh.is_triangle_mesh());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_single_triangle_positions() {
        let mut mesh = create_single_triangle();
        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // Corner 0 has edge points (0.5, 0, 0) and (0.25, 0.5, 0):
        // 1/4 * (0.75, 0.5, 0) + 1/2 * (0, 0, 0)
        let v0 = mesh.position(VertexId::new(0));
        assert!((v0 - Point3::new(0.1875, 0.125, 0.0)).norm() < 1e-10);

        // Boundary edge points stay at midpoints.
        for v in mesh.vertex_ids().skip(3) {
            let p = mesh.position(v);
            let on_edge = p.y.abs() < 1e-10
                || (p.y - 2.0 * p.x).abs() < 1e-10
                || (p.y - 2.0 * (1.0 - p.x)).abs() < 1e-10;
            assert!(on_edge, "{:?} left the triangle boundary", p);
        }
    }

    #[test]
    fn test_tetrahedron_counts() {
        let mut mesh = create_tetrahedron();
        let (v, e, f) = counts(&mesh);

        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(mesh.num_vertices(), v + e);
        assert_eq!(mesh.num_faces(), 4 * f);
        assert_eq!(mesh.num_edges(), 2 * e + 3 * f);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_loop_subdivide_two_iterations() {
        let mut mesh = create_tetrahedron();
        let original_faces = mesh.num_faces();

        loop_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();

        // Each iteration quadruples: 4 * 4 = 16x
        assert_eq!(mesh.num_faces(), original_faces * 16);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_loop_subdivide_preserves_euler() {
        let mut mesh = create_tetrahedron();
        let euler = |m: &HalfEdgeMesh| {
            m.num_vertices() as i64 - m.num_edges() as i64 + m.num_faces() as i64
        };
        let original = euler(&mesh);

        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        assert_eq!(original, euler(&mesh), "Euler characteristic should be preserved");
    }

    #[test]
    fn test_loop_subdivide_zero_iterations() {
        let mut mesh = create_tetrahedron();
        let before = counts(&mesh);

        loop_subdivide(&mut mesh, &SubdivideOptions::new(0)).unwrap();

        assert_eq!(counts(&mesh), before);
    }

    #[test]
    fn test_loop_subdivide_two_triangles() {
        let mut mesh = create_two_triangles();

        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 2 triangles -> 8 triangles
        assert_eq!(mesh.num_faces(), 8);
        // 4 original + 5 edge vertices = 9
        assert_eq!(mesh.num_vertices(), 9);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_interior_edge_vertex_position() {
        let mut mesh = create_two_triangles();
        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // The edge point of the shared edge 0-1 neighbours both endpoints.
        let (v0, v1) = (VertexId::new(0), VertexId::new(1));
        let shared = mesh
            .vertex_ids()
            .skip(4)
            .find(|&v| {
                let ring: Vec<_> = mesh.vertex_neighbors(v).collect();
                ring.contains(&v0) && ring.contains(&v1)
            })
            .unwrap();

        // 3/8 * ((0,0,0) + (2,0,0)) + 1/8 * ((1,2,0) + (1,-2,0)) = (1, 0, 0)
        assert!((mesh.position(shared) - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-10);
        assert_eq!(mesh.valence(shared), 6);
    }

    #[test]
    fn test_loop_beta_coefficient() {
        assert!((loop_beta(3) - 3.0 / 16.0).abs() < 1e-10);
        assert!((loop_beta(6) - 1.0 / 16.0).abs() < 1e-10);
    }

    #[test]
    fn test_quads_are_triangulated_first() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_polygons(&vertices, &[[0, 1, 2, 3]]).unwrap();

        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        // 2 triangles after fan triangulation, 5 edges.
        assert_eq!(mesh.num_faces(), 8);
        assert_eq!(mesh.num_vertices(), 9);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_original_keys_survive() {
        let mut mesh = create_tetrahedron();
        loop_subdivide(&mut mesh, &SubdivideOptions::new(1)).unwrap();

        for raw in 1..=16 {
            assert!(mesh.face_by_key(FaceKey::new(raw).unwrap()).is_some());
        }
        assert!(mesh.face_by_key(FaceKey::new(17).unwrap()).is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut a = create_tetrahedron();
        let mut b = create_tetrahedron();

        loop_subdivide(&mut a, &SubdivideOptions::new(2)).unwrap();
        loop_subdivide(&mut b, &SubdivideOptions::new(2).sequential()).unwrap();

        for v in a.vertex_ids() {
            assert!((a.position(v) - b.position(v)).norm() < 1e-12);
            assert!((a.vertex_normal(v) - b.vertex_normal(v)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_loop_subdivide_shrinks_closed_mesh() {
        // Loop subdivision is approximating: the refined tetrahedron sits
        // inside the original bounding box.
        let mut mesh = create_tetrahedron();
        let (min, max) = mesh.bounding_box().unwrap();

        loop_subdivide(&mut mesh, &SubdivideOptions::new(2)).unwrap();

        let (new_min, new_max) = mesh.bounding_box().unwrap();
        for i in 0..3 {
            assert!(new_min[i] >= min[i] - 1e-10);
            assert!(new_max[i] <= max[i] + 1e-10);
        }
        for v in mesh.vertex_ids() {
            assert!((mesh.vertex_normal(v).norm() - 1.0).abs() < 1e-10);
        }
    }
}
