//! Specialized collection types

pub use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Pack a slot map key into a plain integer suitable for an opaque handle
pub fn key_to_raw(key: DefaultKey) -> u64 {
    key.data().as_ffi()
}

/// Recover a slot map key from a value produced by [`key_to_raw`]
pub fn key_from_raw(raw: u64) -> DefaultKey {
    DefaultKey::from(KeyData::from_ffi(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_key_roundtrip() {
        let mut map: HandleMap<&str> = HandleMap::new();
        let key = map.insert("atlas");
        let raw = key_to_raw(key);

        assert_eq!(key_from_raw(raw), key);
        assert_eq!(map[key_from_raw(raw)], "atlas");
    }

    #[test]
    fn test_removed_key_is_stale() {
        let mut map: HandleMap<u32> = HandleMap::new();
        let key = map.insert(7);
        let raw = key_to_raw(key);
        map.remove(key);

        assert!(map.get(key_from_raw(raw)).is_none());
    }
}
