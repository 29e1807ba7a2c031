//! Arena index types for mesh elements.
//!
//! Vertices, half-edges and faces live in arenas owned by
//! [`HalfEdgeMesh`](super::HalfEdgeMesh). Adjacency is expressed with these
//! typed indices instead of references, and the reserved `INVALID` value of
//! the underlying integer plays the role of "none" (for example the face of a
//! boundary half-edge).

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as arena indices.
///
/// Implemented for `u16`, `u32` and `u64`. The largest value of each type is
/// reserved as the `INVALID` sentinel.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The largest usable index.
    const MAX: Self;

    /// Sentinel meaning "no element".
    const INVALID: Self;

    /// Convert from usize.
    ///
    /// # Panics
    /// Debug builds panic if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a real index rather than the sentinel.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// Index of a vertex slot.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Index of a half-edge slot.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Index of a face slot.
///
/// This is an internal address. External code names faces through
/// [`FaceKey`](super::FaceKey).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an index from a raw slot number.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The "none" index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Slot number.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Raw value of the underlying integer.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }

            /// Check if this refers to a slot rather than "none".
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }

            /// `Some(self)` for a real index, `None` for the sentinel.
            #[inline]
            pub fn valid(self) -> Option<Self> {
                if self.is_valid() {
                    Some(self)
                } else {
                    None
                }
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(none)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v: VertexId = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());
        assert_eq!(v.valid(), Some(v));

        let none: VertexId = VertexId::invalid();
        assert!(!none.is_valid());
        assert_eq!(none.valid(), None);
    }

    #[test]
    fn test_default_is_none() {
        let f: FaceId = FaceId::default();
        assert!(!f.is_valid());
    }

    #[test]
    fn test_small_indices() {
        let he: HalfEdgeId<u16> = HalfEdgeId::new(1000);
        assert_eq!(he.index(), 1000);
        assert_eq!(<u16 as MeshIndex>::INVALID, u16::MAX);
    }

    #[test]
    fn test_debug_format() {
        let v: VertexId = VertexId::new(7);
        assert_eq!(format!("{:?}", v), "V(7)");

        let none: FaceId = FaceId::invalid();
        assert_eq!(format!("{:?}", none), "F(none)");
    }
}
