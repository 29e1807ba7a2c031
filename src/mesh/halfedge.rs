//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list)
//! representation for polygon meshes with optional boundary. Elements live in
//! arenas and refer to each other by typed index, so editing operations can
//! rewire adjacency freely without ownership or lifetime concerns.
//!
//! # Conventions
//!
//! - A half-edge stores the vertex it points **to** (`vert`). Its origin is
//!   `opp.vert`.
//! - Each half-edge belongs to at most one face. Half-edges without a face
//!   are boundary half-edges; they are chained by `next` into boundary loops
//!   running opposite to the faces beside them.
//! - A vertex stores one **outgoing** half-edge (its anchor). The one-ring is
//!   walked with `e = opp(e).next`. A boundary vertex is always anchored at
//!   its outgoing boundary half-edge.
//! - A face stores one half-edge of its loop; the rest is reached through
//!   `next`.
//!
//! Removed elements leave a tombstone in their arena slot. Slots are never
//! reused, so ids of live elements stay valid across every edit.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::registry::{FaceKey, FaceRegistry};
use crate::error::TopologyError;

/// A vertex of the mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Cached unit normal, refreshed by [`HalfEdgeMesh::update_normals`].
    pub normal: Vector3<f64>,

    /// One outgoing half-edge.
    /// For boundary vertices, this is guaranteed to be a boundary half-edge.
    pub edge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create an unconnected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            edge: HalfEdgeId::invalid(),
        }
    }
}

/// A directed half-edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge points to.
    pub vert: VertexId<I>,

    /// The half-edge of the same undirected edge running the other way.
    pub opp: HalfEdgeId<I>,

    /// The next half-edge around the face or boundary loop.
    pub next: HalfEdgeId<I>,

    /// The owning face, invalid for boundary half-edges.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a half-edge pointing at `vert` with no links yet.
    pub fn new(vert: VertexId<I>) -> Self {
        Self {
            vert,
            opp: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A polygonal face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the loop of this face.
    pub edge: HalfEdgeId<I>,

    /// Cached normal as produced by [`HalfEdgeMesh::calculate_face_normal`].
    pub normal: Vector3<f64>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face anchored at `edge`.
    pub fn new(edge: HalfEdgeId<I>) -> Self {
        Self {
            edge,
            normal: Vector3::zeros(),
        }
    }
}

/// Which side of an edge counts as "outside" for [`HalfEdgeMesh::is_external`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Exterior {
    /// The half-edge itself has no face.
    Own,
    /// Its opposite has no face.
    Opposite,
    /// Either side has no face.
    #[default]
    Either,
}

/// A polygon mesh with half-edge connectivity.
///
/// The mesh is the sole owner of its elements. Callers get ids, borrowed
/// views, and [`FaceKey`]s; every topology edit goes through the operations
/// in [`crate::algo`].
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Option<Vertex<I>>>,
    pub(crate) halfedges: Vec<Option<HalfEdge<I>>>,
    pub(crate) faces: Vec<Option<Face<I>>>,
    pub(crate) registry: FaceRegistry<I>,
    live_vertices: usize,
    live_halfedges: usize,
    live_faces: usize,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn live<'a, T>(slots: &'a [Option<T>], index: usize, what: &str) -> &'a T {
    match slots.get(index) {
        Some(Some(item)) => item,
        Some(None) => panic!("{} {} has been removed", what, index),
        None => panic!("{} {} out of range", what, index),
    }
}

#[inline]
fn live_mut<'a, T>(slots: &'a mut [Option<T>], index: usize, what: &str) -> &'a mut T {
    match slots.get_mut(index) {
        Some(Some(item)) => item,
        Some(None) => panic!("{} {} has been removed", what, index),
        None => panic!("{} {} out of range", what, index),
    }
}

/// Normalize, falling back to zero for degenerate input.
#[inline]
pub(crate) fn unit_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    /// Create a mesh with pre-allocated arenas.
    pub fn with_capacity(num_vertices: usize, num_halfedges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
            registry: FaceRegistry::new(),
            live_vertices: 0,
            live_halfedges: 0,
            live_faces: 0,
        }
    }

    // ==================== Accessors ====================

    /// Number of live vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.live_vertices
    }

    /// Number of live half-edges (boundary half-edges included).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.live_halfedges
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.live_halfedges / 2
    }

    /// Number of live faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Get a vertex by ID.
    ///
    /// # Panics
    /// Panics if the vertex was removed.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        live(&self.vertices, id.index(), "vertex")
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        live_mut(&mut self.vertices, id.index(), "vertex")
    }

    /// Get a half-edge by ID.
    ///
    /// # Panics
    /// Panics if the half-edge was removed.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        live(&self.halfedges, id.index(), "half-edge")
    }

    #[inline]
    pub(crate) fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        live_mut(&mut self.halfedges, id.index(), "half-edge")
    }

    /// Get a face by ID.
    ///
    /// # Panics
    /// Panics if the face was removed.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        live(&self.faces, id.index(), "face")
    }

    #[inline]
    pub(crate) fn face_mut(&mut self, id: FaceId<I>) -> &mut Face<I> {
        live_mut(&mut self.faces, id.index(), "face")
    }

    /// Whether `id` names a live vertex.
    #[inline]
    pub fn contains_vertex(&self, id: VertexId<I>) -> bool {
        id.is_valid() && matches!(self.vertices.get(id.index()), Some(Some(_)))
    }

    /// Whether `id` names a live half-edge.
    #[inline]
    pub fn contains_halfedge(&self, id: HalfEdgeId<I>) -> bool {
        id.is_valid() && matches!(self.halfedges.get(id.index()), Some(Some(_)))
    }

    /// Whether `id` names a live face.
    #[inline]
    pub fn contains_face(&self, id: FaceId<I>) -> bool {
        id.is_valid() && matches!(self.faces.get(id.index()), Some(Some(_)))
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    /// Cached normal of a vertex.
    #[inline]
    pub fn vertex_normal(&self, v: VertexId<I>) -> &Vector3<f64> {
        &self.vertex(v).normal
    }

    /// Cached normal of a face.
    #[inline]
    pub fn face_normal(&self, f: FaceId<I>) -> &Vector3<f64> {
        &self.face(f).normal
    }

    // ==================== Face keys ====================

    /// The key external code uses to name `f`.
    #[inline]
    pub fn face_key(&self, f: FaceId<I>) -> Option<FaceKey> {
        self.registry.key(f)
    }

    /// The live face holding `key`.
    #[inline]
    pub fn face_by_key(&self, key: FaceKey) -> Option<FaceId<I>> {
        self.registry.face(key)
    }

    /// The face key registry.
    #[inline]
    pub fn registry(&self) -> &FaceRegistry<I> {
        &self.registry
    }

    // ==================== Topology Queries ====================

    /// Get the opposite half-edge.
    #[inline]
    pub fn opp(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).opp
    }

    /// Get the next half-edge around the face or boundary loop.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the vertex a half-edge points to.
    #[inline]
    pub fn vert(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).vert
    }

    /// Get the vertex a half-edge starts from.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.vert(self.opp(he))
    }

    /// Get the face of a half-edge (invalid on the boundary).
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Check if a half-edge has no face.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Boundary test with a choice of which side counts.
    pub fn is_external(&self, he: HalfEdgeId<I>, side: Exterior) -> bool {
        match side {
            Exterior::Own => self.is_boundary_halfedge(he),
            Exterior::Opposite => self.is_boundary_halfedge(self.opp(he)),
            Exterior::Either => {
                self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.opp(he))
            }
        }
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        if !self.vertex(v).edge.is_valid() {
            return true; // Isolated vertex
        }
        self.vertex_halfedges(v)
            .any(|he| self.is_boundary_halfedge(he))
    }

    /// The half-edge whose `next` is `he`.
    ///
    /// Found by turning around the origin of `he`; fails if a full revolution
    /// does not reach it, which means the connectivity is corrupted.
    pub fn prev(&self, he: HalfEdgeId<I>) -> Result<HalfEdgeId<I>, TopologyError> {
        let origin = self.origin(he);
        self.vertex_halfedges(origin)
            .map(|out| self.opp(out))
            .find(|&incoming| self.next(incoming) == he)
            .ok_or(TopologyError::MissingPrev {
                halfedge: he.index(),
            })
    }

    /// Number of sides of a face.
    pub fn face_edge_count(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// Number of outgoing half-edges of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex_halfedges(v).count()
    }

    /// Check whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_edge_count(f) == 3)
    }

    /// The half-edge from `from` to `to`, if the two vertices are adjacent.
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex_halfedges(from).find(|&he| self.vert(he) == to)
    }

    // ==================== Iteration ====================

    /// Iterate over live vertex IDs in creation order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_some())
            .map(|(i, _)| VertexId::new(i))
    }

    /// Iterate over live half-edge IDs in creation order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, he)| he.is_some())
            .map(|(i, _)| HalfEdgeId::new(i))
    }

    /// Iterate over live face IDs in creation order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_some())
            .map(|(i, _)| FaceId::new(i))
    }

    /// One half-edge per undirected edge.
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedge_ids().filter(move |&he| he < self.opp(he))
    }

    /// Iterate over outgoing half-edges of a vertex.
    pub fn vertex_halfedges(&self, v: VertexId<I>) -> VertexHalfEdgeIter<'_, I> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_halfedges(v).map(|he| self.vert(he))
    }

    /// Iterate over faces incident to a vertex, skipping boundary gaps.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.vertex_halfedges(v)
            .filter_map(|he| self.face_of(he).valid())
    }

    /// Iterate over the half-edge loop of a face, starting at its anchor.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, self.face(f).edge)
    }

    /// Iterate over any `next` loop starting at `start` (face or boundary).
    pub fn loop_halfedges(&self, start: HalfEdgeId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, start)
    }

    /// Iterate over the vertices of a face, in loop order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.vert(he))
    }

    // ==================== Geometry ====================

    /// Normal of a face from its first three loop vertices.
    ///
    /// With `p0, p1, p2` the targets of the anchor and the two half-edges
    /// after it, this is `(p2 - p1) × (p0 - p1)`, i.e. the cross product of the
    /// first two sides. The result is not normalized; non-planar faces get an
    /// approximation and collinear corners give a zero vector.
    pub fn calculate_face_normal(&self, f: FaceId<I>) -> Vector3<f64> {
        let e0 = self.face(f).edge;
        let e1 = self.next(e0);
        let e2 = self.next(e1);
        let p0 = self.position(self.vert(e0));
        let p1 = self.position(self.vert(e1));
        let p2 = self.position(self.vert(e2));
        (p2 - p1).cross(&(p0 - p1))
    }

    /// Unit normal of a vertex: the equal-weight average of the directions of
    /// its incident face normals (no area or angle weighting).
    pub fn calculate_vertex_normal(&self, v: VertexId<I>) -> Vector3<f64> {
        let sum: Vector3<f64> = self
            .vertex_faces(v)
            .map(|f| unit_or_zero(self.face(f).normal))
            .sum();
        unit_or_zero(sum)
    }

    /// Recompute every cached face normal, then every vertex normal.
    pub fn update_normals(&mut self, parallel: bool) {
        let face_ids: Vec<FaceId<I>> = self.face_ids().collect();
        let face_normals: Vec<Vector3<f64>> = if parallel {
            face_ids
                .par_iter()
                .map(|&f| self.calculate_face_normal(f))
                .collect()
        } else {
            face_ids
                .iter()
                .map(|&f| self.calculate_face_normal(f))
                .collect()
        };
        for (f, n) in face_ids.into_iter().zip(face_normals) {
            self.face_mut(f).normal = n;
        }

        let vertex_ids: Vec<VertexId<I>> = self.vertex_ids().collect();
        let vertex_normals: Vec<Vector3<f64>> = if parallel {
            vertex_ids
                .par_iter()
                .map(|&v| self.calculate_vertex_normal(v))
                .collect()
        } else {
            vertex_ids
                .iter()
                .map(|&v| self.calculate_vertex_normal(v))
                .collect()
        };
        for (v, n) in vertex_ids.into_iter().zip(vertex_normals) {
            self.vertex_mut(v).normal = n;
        }
    }

    /// Refresh the cached normal of one face.
    pub(crate) fn refresh_face_normal(&mut self, f: FaceId<I>) {
        let n = self.calculate_face_normal(f);
        self.face_mut(f).normal = n;
    }

    /// Midpoint of the two endpoints of a half-edge.
    pub fn edge_midpoint(&self, he: HalfEdgeId<I>) -> Point3<f64> {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.vert(he));
        Point3::from((p0.coords + p1.coords) * 0.5)
    }

    /// Average of the vertices of a face.
    pub fn face_centroid(&self, f: FaceId<I>) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        let mut n = 0usize;
        for v in self.face_vertices(f) {
            sum += self.position(v).coords;
            n += 1;
        }
        Point3::from(sum / n.max(1) as f64)
    }

    /// Compute the bounding box of the live vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut positions = self.vertices.iter().flatten().map(|v| v.position);
        let first = positions.next()?;
        let (mut min, mut max) = (first, first);

        for p in positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new, unconnected vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Some(Vertex::new(position)));
        self.live_vertices += 1;
        id
    }

    pub(crate) fn add_halfedge(&mut self, he: HalfEdge<I>) -> HalfEdgeId<I> {
        let id = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(Some(he));
        self.live_halfedges += 1;
        id
    }

    /// Allocate a face slot and give it a fresh key.
    pub(crate) fn add_face(&mut self, edge: HalfEdgeId<I>) -> (FaceId<I>, FaceKey) {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Some(Face::new(edge)));
        self.live_faces += 1;
        let key = self.registry.register(id);
        (id, key)
    }

    /// Make `a` and `b` each other's opposite.
    #[inline]
    pub(crate) fn link_opp(&mut self, a: HalfEdgeId<I>, b: HalfEdgeId<I>) {
        self.halfedge_mut(a).opp = b;
        self.halfedge_mut(b).opp = a;
    }

    pub(crate) fn remove_vertex(&mut self, v: VertexId<I>) {
        if self.vertices[v.index()].take().is_some() {
            self.live_vertices -= 1;
        }
    }

    pub(crate) fn remove_halfedge(&mut self, he: HalfEdgeId<I>) {
        if self.halfedges[he.index()].take().is_some() {
            self.live_halfedges -= 1;
        }
    }

    /// Drop a face slot and retire its key.
    pub(crate) fn remove_face(&mut self, f: FaceId<I>) -> Option<FaceKey> {
        if self.faces[f.index()].take().is_some() {
            self.live_faces -= 1;
        }
        self.registry.unregister(f)
    }

    /// Walk `next` from `start` until reaching the half-edge before it.
    ///
    /// Unlike [`prev`](Self::prev) this only follows the loop `start` is on,
    /// so it works on loops whose `opp` links are mid-edit.
    pub(crate) fn loop_prev(&self, start: HalfEdgeId<I>) -> Result<HalfEdgeId<I>, TopologyError> {
        self.loop_halfedges(start)
            .find(|&he| self.next(he) == start)
            .ok_or(TopologyError::MissingPrev {
                halfedge: start.index(),
            })
    }
}

/// Iterator over outgoing half-edges around a vertex.
///
/// Stops after one revolution, or after visiting as many half-edges as the
/// mesh holds if the ring never closes.
pub struct VertexHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> VertexHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh.vertex(v).edge;
        Self {
            mesh,
            start,
            current: start,
            remaining: if start.is_valid() { mesh.halfedges.len() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;

        // he: v -> w, opp(he): w -> v, next(opp(he)) leaves v again.
        self.current = self.mesh.next(self.mesh.opp(self.current));

        if self.current == self.start {
            self.remaining = 0;
        }

        Some(result)
    }
}

/// Iterator over a `next` loop (a face or a boundary loop).
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, start: HalfEdgeId<I>) -> Self {
        Self {
            mesh,
            start,
            current: start,
            remaining: if start.is_valid() { mesh.halfedges.len() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.remaining = 0;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-wired single triangle with its boundary loop.
    fn wired_triangle() -> HalfEdgeMesh {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));

        // Interior: a: v0->v1, b: v1->v2, c: v2->v0
        let a = mesh.add_halfedge(HalfEdge::new(v1));
        let b = mesh.add_halfedge(HalfEdge::new(v2));
        let c = mesh.add_halfedge(HalfEdge::new(v0));
        // Boundary: a': v1->v0, b': v2->v1, c': v0->v2
        let ao = mesh.add_halfedge(HalfEdge::new(v0));
        let bo = mesh.add_halfedge(HalfEdge::new(v1));
        let co = mesh.add_halfedge(HalfEdge::new(v2));
        mesh.link_opp(a, ao);
        mesh.link_opp(b, bo);
        mesh.link_opp(c, co);

        let (f, _) = mesh.add_face(a);
        for (he, next) in [(a, b), (b, c), (c, a)] {
            mesh.halfedge_mut(he).next = next;
            mesh.halfedge_mut(he).face = f;
        }
        for (he, next) in [(ao, co), (co, bo), (bo, ao)] {
            mesh.halfedge_mut(he).next = next;
        }
        mesh.vertex_mut(v0).edge = co;
        mesh.vertex_mut(v1).edge = ao;
        mesh.vertex_mut(v2).edge = bo;
        mesh.update_normals(false);
        mesh
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));

        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(v0.index(), 0);
        assert_eq!(v1.index(), 1);
        assert!(mesh.is_boundary_vertex(v0));
    }

    #[test]
    fn test_triangle_queries() {
        let mesh = wired_triangle();
        let f = FaceId::new(0);
        let v0 = VertexId::new(0);

        assert_eq!(mesh.face_edge_count(f), 3);
        assert_eq!(mesh.valence(v0), 2);
        assert_eq!(mesh.vertex_faces(v0).count(), 1);
        assert!(mesh.is_boundary_vertex(v0));
        assert_eq!(mesh.face_key(f).map(FaceKey::get), Some(1));

        let a = HalfEdgeId::new(0);
        assert_eq!(mesh.origin(a), v0);
        assert!(mesh.is_external(a, Exterior::Opposite));
        assert!(mesh.is_external(a, Exterior::Either));
        assert!(!mesh.is_external(a, Exterior::Own));
    }

    #[test]
    fn test_prev_inside_face_and_boundary() {
        let mesh = wired_triangle();
        let a = HalfEdgeId::new(0);
        let c = HalfEdgeId::new(2);
        assert_eq!(mesh.prev(a), Ok(c));

        let ao = HalfEdgeId::new(3);
        let bo = HalfEdgeId::new(4);
        assert_eq!(mesh.prev(ao), Ok(bo));
        assert_eq!(mesh.loop_prev(ao), Ok(bo));
    }

    #[test]
    fn test_prev_on_broken_ring() {
        let mut mesh = wired_triangle();
        let a = HalfEdgeId::new(0);
        let c = HalfEdgeId::new(2);
        // Nothing leads into `a` any more.
        mesh.halfedge_mut(c).next = c;

        assert_eq!(
            mesh.prev(a),
            Err(TopologyError::MissingPrev { halfedge: 0 })
        );
    }

    #[test]
    fn test_normals() {
        let mesh = wired_triangle();
        let n = mesh.face_normal(FaceId::new(0));
        // Counter-clockwise in the xy-plane faces +z.
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-10);

        let vn = mesh.vertex_normal(VertexId::new(1));
        assert!((vn - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn test_find_halfedge_and_midpoint() {
        let mesh = wired_triangle();
        let he = mesh
            .find_halfedge(VertexId::new(0), VertexId::new(1))
            .unwrap();
        assert_eq!(he, HalfEdgeId::new(0));
        assert!((mesh.edge_midpoint(he) - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-10);
        assert!(mesh
            .find_halfedge(VertexId::new(0), VertexId::new(0))
            .is_none());
    }

    #[test]
    fn test_removal_keeps_other_ids() {
        let mut mesh = wired_triangle();
        let key = mesh.remove_face(FaceId::new(0));
        assert_eq!(key.map(FaceKey::get), Some(1));
        assert_eq!(mesh.num_faces(), 0);
        assert!(!mesh.contains_face(FaceId::new(0)));

        mesh.remove_vertex(VertexId::new(0));
        assert_eq!(mesh.num_vertices(), 2);
        let ids: Vec<_> = mesh.vertex_ids().collect();
        assert_eq!(ids, vec![VertexId::new(1), VertexId::new(2)]);
    }
}
