//! Dense integer numbering of mesh elements.

use std::fmt;
use std::marker::PhantomData;

use super::{MapCategory, ReadablePropertyMap};
use crate::mesh::Descriptor;

/// Read-only map from an element id to its dense index.
///
/// The index is the element's position in its kind's storage: unique among
/// live elements of one kind and covering `0..count`, but not stable across
/// topology edits. Edge indices come from the representative half-edge, so
/// both half-edges of an edge report the same edge index.
pub struct IndexMap<K> {
    _marker: PhantomData<fn(K) -> usize>,
}

impl<K> IndexMap<K> {
    /// Create the map. It carries no state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K> Clone for IndexMap<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for IndexMap<K> {}

impl<K> Default for IndexMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for IndexMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IndexMap")
    }
}

impl<K: Descriptor> ReadablePropertyMap<K> for IndexMap<K> {
    type Value = usize;

    const CATEGORY: MapCategory = MapCategory::Readable;

    #[inline]
    fn get(&self, key: K) -> usize {
        key.slot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{EdgeId, HalfEdgeId, VertexId};

    #[test]
    fn test_vertex_index() {
        let map = IndexMap::<VertexId>::new();
        assert_eq!(map.get(VertexId::new(11)), 11);
        assert_eq!(map.category(), MapCategory::Readable);
    }

    #[test]
    fn test_edge_index_from_either_halfedge() {
        let map = IndexMap::<EdgeId>::new();
        let h: HalfEdgeId = HalfEdgeId::new(9);
        assert_eq!(map.get(h.edge()), 4);
        assert_eq!(map.get(h.opposite().edge()), 4);
    }
}
