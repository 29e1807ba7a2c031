//! Structural consistency checks.
//!
//! [`HalfEdgeMesh::validate`] walks every live element and reports each
//! broken invariant it finds instead of stopping at the first one, so a
//! corrupted mesh can be diagnosed in one pass.

use std::fmt;

use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;

/// One broken invariant, described in terms of raw arena slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A link points at a removed or out-of-range slot.
    DanglingLink {
        /// Which link (`"opp"`, `"next"`, `"vert"`, `"face"`, ...).
        link: &'static str,
        /// Kind of element holding the link.
        owner: &'static str,
        /// Slot of the owning element.
        index: usize,
    },
    /// `opp(opp(e)) != e` or `opp(e) == e`.
    OppositeMismatch {
        /// The half-edge.
        halfedge: usize,
    },
    /// `face(e) != face(next(e))`.
    FaceMismatch {
        /// The half-edge.
        halfedge: usize,
    },
    /// `origin(next(e)) != vert(e)`.
    Disconnected {
        /// The half-edge.
        halfedge: usize,
    },
    /// A boundary half-edge is followed by an interior one, or is not the
    /// anchor of its origin.
    BoundaryChain {
        /// The boundary half-edge.
        halfedge: usize,
    },
    /// A vertex anchor does not start at the vertex.
    VertexAnchor {
        /// The vertex.
        vertex: usize,
    },
    /// A face loop does not close, leaves the face, or has fewer than three
    /// sides.
    FaceLoop {
        /// The face.
        face: usize,
    },
    /// The face registry disagrees with the live faces.
    Registry {
        /// What is wrong.
        reason: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DanglingLink { link, owner, index } => {
                write!(f, "{} {} has a dangling {} link", owner, index, link)
            }
            Violation::OppositeMismatch { halfedge } => {
                write!(f, "half-edge {} is not its opposite's opposite", halfedge)
            }
            Violation::FaceMismatch { halfedge } => {
                write!(f, "half-edge {} and its successor disagree on face", halfedge)
            }
            Violation::Disconnected { halfedge } => {
                write!(f, "successor of half-edge {} does not start at its target", halfedge)
            }
            Violation::BoundaryChain { halfedge } => {
                write!(f, "boundary half-edge {} is mislinked", halfedge)
            }
            Violation::VertexAnchor { vertex } => {
                write!(f, "vertex {} is anchored at a half-edge leaving another vertex", vertex)
            }
            Violation::FaceLoop { face } => write!(f, "face {} has a malformed loop", face),
            Violation::Registry { reason } => write!(f, "face registry: {}", reason),
        }
    }
}

/// Outcome of [`HalfEdgeMesh::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Every violation found, in discovery order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True if no violation was found.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, v: Violation) {
        log::warn!("mesh invariant broken: {}", v);
        self.violations.push(v);
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Check every structural invariant and report the ones that fail.
    ///
    /// Each violation is also logged at `warn` level.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        self.check_halfedges(&mut report);
        self.check_vertices(&mut report);
        self.check_faces(&mut report);
        self.check_registry(&mut report);
        report
    }

    /// Shorthand for `self.validate().is_ok()`.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn check_halfedges(&self, report: &mut ValidationReport) {
        for he in self.halfedge_ids() {
            let h = self.halfedge(he);
            let mut dangling = false;
            for (link, ok) in [
                ("opp", self.contains_halfedge(h.opp)),
                ("next", self.contains_halfedge(h.next)),
                ("vert", self.contains_vertex(h.vert)),
                ("face", !h.face.is_valid() || self.contains_face(h.face)),
            ] {
                if !ok {
                    report.push(Violation::DanglingLink {
                        link,
                        owner: "half-edge",
                        index: he.index(),
                    });
                    dangling = true;
                }
            }
            if dangling {
                continue;
            }

            if h.opp == he || self.opp(h.opp) != he {
                report.push(Violation::OppositeMismatch {
                    halfedge: he.index(),
                });
                continue;
            }
            if self.face_of(h.next) != h.face {
                report.push(Violation::FaceMismatch {
                    halfedge: he.index(),
                });
            }
            let next_opp = self.opp(h.next);
            if !self.contains_halfedge(next_opp) || self.vert(next_opp) != h.vert {
                report.push(Violation::Disconnected {
                    halfedge: he.index(),
                });
            }
            if h.is_boundary() {
                let origin = self.vert(h.opp);
                if !self.is_boundary_halfedge(h.next)
                    || !self.contains_vertex(origin)
                    || self.vertex(origin).edge != he
                {
                    report.push(Violation::BoundaryChain {
                        halfedge: he.index(),
                    });
                }
            }
        }
    }

    fn check_vertices(&self, report: &mut ValidationReport) {
        for v in self.vertex_ids() {
            let edge = self.vertex(v).edge;
            // Isolated vertices carry no anchor.
            if !edge.is_valid() {
                continue;
            }
            if !self.contains_halfedge(edge) {
                report.push(Violation::DanglingLink {
                    link: "edge",
                    owner: "vertex",
                    index: v.index(),
                });
                continue;
            }
            let opp = self.opp(edge);
            if !self.contains_halfedge(opp) || self.vert(opp) != v {
                report.push(Violation::VertexAnchor { vertex: v.index() });
            }
        }
    }

    fn check_faces(&self, report: &mut ValidationReport) {
        for f in self.face_ids() {
            let start = self.face(f).edge;
            if !self.contains_halfedge(start) {
                report.push(Violation::DanglingLink {
                    link: "edge",
                    owner: "face",
                    index: f.index(),
                });
                continue;
            }

            // Bounded walk: a loop that does not return to its start within
            // the arena size is broken.
            let mut he = start;
            let mut sides = 0usize;
            let mut ok = true;
            loop {
                if !self.contains_halfedge(he) || self.face_of(he) != f {
                    ok = false;
                    break;
                }
                sides += 1;
                he = self.next(he);
                if he == start {
                    break;
                }
                if sides > self.halfedges.len() {
                    ok = false;
                    break;
                }
            }
            if !ok || sides < 3 {
                report.push(Violation::FaceLoop { face: f.index() });
            }
        }
    }

    fn check_registry(&self, report: &mut ValidationReport) {
        let registry = self.registry();
        if !registry.is_consistent() {
            report.push(Violation::Registry {
                reason: "key and face maps disagree",
            });
        }
        if registry.len() != self.num_faces() {
            report.push(Violation::Registry {
                reason: "number of keys differs from number of faces",
            });
        }
        if self.face_ids().any(|f| self.face_key(f).is_none()) {
            report.push(Violation::Registry {
                reason: "live face without a key",
            });
        }
        if registry.iter().any(|(_, f)| !self.contains_face(f)) {
            report.push(Violation::Registry {
                reason: "key names a removed face",
            });
        }
    }
}
