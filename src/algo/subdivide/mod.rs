//! Mesh subdivision.
//!
//! # Loop Subdivision
//!
//! Loop subdivision (Loop, 1987) is an approximating 1-to-4 refinement scheme
//! for triangle meshes. Each iteration runs in place on the half-edge mesh:
//!
//! 1. Fan-triangulates any polygon that is not a triangle yet
//! 2. Splits every edge once, placing the new vertex at its Loop edge point
//! 3. Cuts the three corner triangles off every resulting hexagon, leaving
//!    the middle triangle in the original face
//! 4. Moves the original vertices with the Loop vertex rule
//! 5. Recomputes all normals
//!
//! Cutting corners is equivalent to the textbook bisect-then-flip
//! formulation: bisecting each split triangle and flipping the edges that
//! join an edge point to an old corner ends in the same 1-to-4 connectivity,
//! which steps 2-3 build directly.
//!
//! Original faces keep their keys (they become the middle triangles); the
//! corner triangles get fresh keys.
//!
//! # Example
//!
//! ```no_run
//! use polyedit::prelude::*;
//! use polyedit::algo::subdivide::{loop_subdivide, SubdivideOptions};
//!
//! let mut mesh: HalfEdgeMesh = polyedit::io::load("input.obj").unwrap();
//!
//! let options = SubdivideOptions::new(2); // 2 iterations
//! loop_subdivide(&mut mesh, &options).unwrap();
//!
//! polyedit::io::save(&mesh, "output.obj").unwrap();
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;

pub use loop_subdivision::loop_subdivide;

/// Options for subdivision.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to use parallel execution for the smoothing and normal
    /// passes (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
