use core::any::TypeId;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::hash::NoOpHashState;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map from [`TypeId`] to `V` that does not re-hash its keys.
///
/// ```
/// use core::any::TypeId;
/// use jb_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// map.insert(TypeId::of::<u8>(), "byte");
///
/// assert_eq!(map.get(&TypeId::of::<u8>()), Some(&"byte"));
/// assert_eq!(map.get(&TypeId::of::<u16>()), None);
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty map. Usable in `static` initializers.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Inserts `v`, returning the value it replaced.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    /// Returns the value for `type_id`, inserting `f()` first if absent.
    ///
    /// `f` runs at most once.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn get_or_insert_keeps_first() {
        let mut map = TypeIdMap::new();
        let mut calls = 0;
        *map.get_or_insert(TypeId::of::<u8>(), || {
            calls += 1;
            10
        }) += 1;
        map.get_or_insert(TypeId::of::<u8>(), || unreachable!());

        assert_eq!(calls, 1);
        assert_eq!(map.get(&TypeId::of::<u8>()), Some(&11));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_replaces() {
        let mut map = TypeIdMap::new();
        assert_eq!(map.insert(TypeId::of::<u16>(), 'a'), None);
        assert_eq!(map.insert(TypeId::of::<u16>(), 'b'), Some('a'));
        assert_eq!(map.get(&TypeId::of::<u16>()), Some(&'b'));
    }
}
