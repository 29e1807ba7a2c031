//! Error types for polyedit.
//!
//! Failures are split into two channels:
//!
//! - [`MeshError`] covers conditions a caller is expected to handle: bad
//!   input, unknown face keys, I/O problems.
//! - [`TopologyError`] reports broken half-edge invariants discovered while
//!   mutating the mesh. These indicate a bug or a corrupted mesh and abort the
//!   operation that found them; they reach callers wrapped in
//!   [`MeshError::Topology`].

use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::FaceKey;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face repeats a vertex along one of its sides.
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face lists fewer than three vertices.
    #[error("face {face} has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// The face index.
        face: usize,
        /// Number of vertices listed.
        count: usize,
    },

    /// An undirected edge is used by more than two faces, or twice in the
    /// same direction.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A vertex touches the boundary in more than one place.
    #[error("vertex {vertex} is non-manifold (more than one boundary gap)")]
    NonManifoldVertex {
        /// The vertex index.
        vertex: usize,
    },

    /// No live face carries the requested key.
    #[error("no face with key {0}")]
    UnknownFace(FaceKey),

    /// A structural invariant was found broken during a mutation.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed line in a mesh file.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

/// Broken half-edge invariants detected while editing.
///
/// Element ids are carried as raw arena indices so the type does not depend
/// on the mesh's index width.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// `next(e).opp.next.opp != e` after splitting `e`.
    #[error("edge split left a broken 4-cycle around half-edge {halfedge}")]
    BrokenSplit {
        /// The half-edge that was split.
        halfedge: usize,
    },

    /// No half-edge points at `halfedge` through `next` within one revolution.
    #[error("no predecessor found for half-edge {halfedge}")]
    MissingPrev {
        /// The half-edge whose predecessor was requested.
        halfedge: usize,
    },

    /// A face has fewer than three sides.
    #[error("face {face} has {sides} sides")]
    DegenerateFace {
        /// The face index.
        face: usize,
        /// Number of sides found.
        sides: usize,
    },

    /// An operation that needs a triangle found a larger face.
    #[error("face {face} is not a triangle ({sides} sides)")]
    NotATriangle {
        /// The face index.
        face: usize,
        /// Number of sides found.
        sides: usize,
    },

    /// Flip was requested on an edge with a boundary side.
    #[error("half-edge {halfedge} lies on the boundary and cannot be flipped")]
    FlipBoundary {
        /// The half-edge passed to the flip.
        halfedge: usize,
    },

    /// Flipping would create an edge that is already present.
    #[error("vertices {from} and {to} are already connected")]
    EdgeExists {
        /// First vertex.
        from: usize,
        /// Second vertex.
        to: usize,
    },

    /// A vertex ended up with fewer neighbours than any manifold allows.
    #[error("vertex {vertex} has valence {valence}")]
    InvalidValence {
        /// The vertex index.
        vertex: usize,
        /// Number of neighbours found.
        valence: usize,
    },
}
