//! Index types for mesh elements.
//!
//! Vertices, half-edges, faces and edges are addressed by type-safe index
//! wrappers, generic over the underlying integer type (u16 for small meshes,
//! u32 for typical meshes, u64 for massive meshes).
//!
//! # Edge pairing
//!
//! Half-edges are always allocated in pairs, so the two half-edges of edge
//! `e` sit in slots `2e` and `2e + 1`. The even one is the edge's
//! *representative*: every edge-keyed lookup goes through it, which makes
//! `edge -> half-edge` and `half-edge -> edge` pure index arithmetic.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer type backing the element ids of a mesh.
///
/// Implemented for `u16`, `u32` and `u64`. The largest value is reserved as
/// the invalid sentinel, so a mesh can hold at most `MAX + 1` elements of
/// each kind.
pub trait MeshIndex: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// The largest usable index.
    const MAX: Self;

    /// The invalid/null sentinel.
    const INVALID: Self;

    /// Convert from `usize`, or `None` if `v` exceeds [`MeshIndex::MAX`].
    fn try_from_usize(v: usize) -> Option<Self>;

    /// Convert to `usize`.
    fn to_usize(self) -> usize;

    /// Convert from `usize`.
    ///
    /// # Panics
    /// Panics if `v` exceeds [`MeshIndex::MAX`], in every build profile.
    #[inline]
    fn from_usize(v: usize) -> Self {
        match Self::try_from_usize(v) {
            Some(i) => i,
            None => panic!("index {} too large for {}", v, std::any::type_name::<Self>()),
        }
    }

    /// Whether `count` elements can all be addressed.
    #[inline]
    fn can_address(count: usize) -> bool {
        count == 0 || Self::try_from_usize(count - 1).is_some()
    }

    /// Check if this is a valid (non-sentinel) index.
    #[inline]
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($($t:ty),*) => {$(
        impl MeshIndex for $t {
            const MAX: Self = <$t>::MAX - 1;
            const INVALID: Self = <$t>::MAX;

            #[inline]
            fn try_from_usize(v: usize) -> Option<Self> {
                <$t>::try_from(v).ok().filter(|&i| i <= Self::MAX)
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    )*};
}

impl_mesh_index!(u16, u32, u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

/// A type-safe edge index (for full edges, not half-edges).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create an id from its dense index.
            ///
            /// # Panics
            /// Panics if `index` does not fit the index type.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");
impl_index_type!(EdgeId, "E");

impl<I: MeshIndex> HalfEdgeId<I> {
    /// The other half-edge of the same edge.
    #[inline]
    pub fn opposite(self) -> Self {
        debug_assert!(self.is_valid(), "opposite of an invalid half-edge");
        Self::new(self.index() ^ 1)
    }

    /// The undirected edge this half-edge belongs to.
    #[inline]
    pub fn edge(self) -> EdgeId<I> {
        debug_assert!(self.is_valid(), "edge of an invalid half-edge");
        EdgeId::new(self.index() >> 1)
    }

    /// Whether this is the representative half-edge of its edge.
    #[inline]
    pub fn is_representative(self) -> bool {
        self.index() & 1 == 0
    }
}

impl<I: MeshIndex> EdgeId<I> {
    /// The representative half-edge of this edge.
    ///
    /// Same as [`representative`].
    #[inline]
    pub fn halfedge(self) -> HalfEdgeId<I> {
        representative(self)
    }
}

/// Map an edge onto the half-edge that stands for it in storage.
///
/// Of the pair `{h, twin(h)}` this is the one with the even (smaller) index.
/// Reads and writes keyed by an edge must both go through this function.
#[inline]
pub fn representative<I: MeshIndex>(edge: EdgeId<I>) -> HalfEdgeId<I> {
    debug_assert!(edge.is_valid(), "representative of an invalid edge");
    HalfEdgeId::new(edge.index() << 1)
}
