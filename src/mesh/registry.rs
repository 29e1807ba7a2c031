//! Face key registry.
//!
//! Every live face carries a [`FaceKey`], a 32-bit identifier external code
//! (picking, selection, command dispatch) can hold without keeping a live
//! reference into the mesh. Keys are handed out from a monotonic counter that
//! starts at 1; `0` is never issued and a key is never reused once its face
//! is gone.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::index::{FaceId, MeshIndex};

/// Opaque, stable identifier of a face.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FaceKey(u32);

impl FaceKey {
    /// Wrap a raw key. Returns `None` for the reserved value `0`.
    pub fn new(raw: u32) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw 32-bit value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bijection between live faces and their keys.
///
/// The mesh owns the only registry that matters and is the only writer;
/// outside code reads it through [`HalfEdgeMesh::registry`](super::HalfEdgeMesh::registry).
///
/// ```compile_fail
/// use polyedit::mesh::{FaceId, FaceRegistry};
///
/// let mut registry = FaceRegistry::<u32>::new();
/// registry.register(FaceId::new(0));
/// ```
#[derive(Debug, Clone)]
pub struct FaceRegistry<I: MeshIndex = u32> {
    by_key: BTreeMap<FaceKey, FaceId<I>>,
    by_face: HashMap<FaceId<I>, FaceKey>,
    next: u32,
}

impl<I: MeshIndex> Default for FaceRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> FaceRegistry<I> {
    /// Create an empty registry whose first key will be 1.
    pub fn new() -> Self {
        Self {
            by_key: BTreeMap::new(),
            by_face: HashMap::new(),
            next: 1,
        }
    }

    /// Assign a fresh key to `face`.
    ///
    /// # Panics
    /// Panics if `face` is already registered or the 32-bit key space is
    /// exhausted. Only the mesh registers faces, once each.
    pub(crate) fn register(&mut self, face: FaceId<I>) -> FaceKey {
        assert!(
            !self.by_face.contains_key(&face),
            "{:?} is already registered",
            face
        );
        assert!(self.next < u32::MAX, "face key space exhausted");
        let key = FaceKey(self.next);
        self.next += 1;
        self.by_key.insert(key, face);
        self.by_face.insert(face, key);
        key
    }

    /// Forget `face`, returning the key it held.
    pub(crate) fn unregister(&mut self, face: FaceId<I>) -> Option<FaceKey> {
        let key = self.by_face.remove(&face)?;
        self.by_key.remove(&key);
        Some(key)
    }

    /// Face currently holding `key`.
    #[inline]
    pub fn face(&self, key: FaceKey) -> Option<FaceId<I>> {
        self.by_key.get(&key).copied()
    }

    /// Key held by `face`.
    #[inline]
    pub fn key(&self, face: FaceId<I>) -> Option<FaceKey> {
        self.by_face.get(&face).copied()
    }

    /// Number of registered faces.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no face is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// The key the next registration will receive.
    #[inline]
    pub fn peek_next(&self) -> u32 {
        self.next
    }

    /// All `(key, face)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (FaceKey, FaceId<I>)> + '_ {
        self.by_key.iter().map(|(&k, &f)| (k, f))
    }

    /// Check that both directions agree.
    pub(crate) fn is_consistent(&self) -> bool {
        self.by_key.len() == self.by_face.len()
            && self
                .by_key
                .iter()
                .all(|(k, f)| self.by_face.get(f) == Some(k))
    }
}
