//! Record Module
//!
//! Defines the arena slots that back the recency list: sentinel slots,
//! occupied slots holding a cached record, and vacant slots awaiting reuse.

// == Slot Id ==
/// Stable handle to a slot in the recency list arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Sentinel before the least recently used end.
    pub const HEAD: SlotId = SlotId(0);
    /// Sentinel after the most recently used end.
    pub const TAIL: SlotId = SlotId(1);
    /// Number of reserved sentinel slots.
    pub const SENTINELS: usize = 2;

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the slot in the arena.
    pub fn index(self) -> usize {
        self.0
    }

    pub fn is_sentinel(self) -> bool {
        self.0 < Self::SENTINELS
    }
}

// == Link ==
/// Neighbor links of a slot, toward the cold end (`prev`) and the hot end (`next`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub prev: SlotId,
    pub next: SlotId,
}

impl Link {
    pub fn new(prev: SlotId, next: SlotId) -> Self {
        Self { prev, next }
    }
}

// == Record ==
/// One cached key/value pair and its position in recency order.
#[derive(Debug)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
    pub link: Link,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V, link: Link) -> Self {
        Self { key, value, link }
    }

    /// Consumes the record, dropping its links.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

// == Slot ==
/// A single arena cell.
#[derive(Debug)]
pub enum Slot<K, V> {
    /// Boundary marker, never a real entry
    Sentinel(Link),
    /// Live record linked into the list
    Occupied(Record<K, V>),
    /// Freed cell waiting on the free list
    Vacant,
}

impl<K, V> Slot<K, V> {
    pub fn link(&self) -> Option<Link> {
        match self {
            Slot::Sentinel(link) => Some(*link),
            Slot::Occupied(record) => Some(record.link),
            Slot::Vacant => None,
        }
    }

    pub fn link_mut(&mut self) -> Option<&mut Link> {
        match self {
            Slot::Sentinel(link) => Some(link),
            Slot::Occupied(record) => Some(&mut record.link),
            Slot::Vacant => None,
        }
    }

    pub fn record(&self) -> Option<&Record<K, V>> {
        match self {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut Record<K, V>> {
        match self {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_ids_are_reserved() {
        assert!(SlotId::HEAD.is_sentinel());
        assert!(SlotId::TAIL.is_sentinel());
        assert_ne!(SlotId::HEAD, SlotId::TAIL);
        assert!(!SlotId::new(SlotId::SENTINELS).is_sentinel());
    }

    #[test]
    fn test_sentinel_slot_has_link_but_no_record() {
        let mut slot: Slot<u32, &str> = Slot::Sentinel(Link::new(SlotId::TAIL, SlotId::TAIL));

        assert_eq!(slot.link(), Some(Link::new(SlotId::TAIL, SlotId::TAIL)));
        assert!(slot.record().is_none());

        slot.link_mut().unwrap().next = SlotId::new(5);
        assert_eq!(slot.link().unwrap().next, SlotId::new(5));
    }

    #[test]
    fn test_occupied_slot_exposes_record() {
        let link = Link::new(SlotId::HEAD, SlotId::TAIL);
        let mut slot = Slot::Occupied(Record::new(7, "seven", link));

        assert_eq!(slot.link(), Some(link));
        assert_eq!(slot.record().map(|r| r.key), Some(7));

        slot.record_mut().unwrap().value = "SEVEN";
        assert_eq!(slot.record().map(|r| r.value), Some("SEVEN"));
    }

    #[test]
    fn test_vacant_slot_has_nothing() {
        let mut slot: Slot<u32, u32> = Slot::Vacant;
        assert!(slot.link().is_none());
        assert!(slot.link_mut().is_none());
        assert!(slot.record().is_none());
    }

    #[test]
    fn test_record_into_parts() {
        let record = Record::new("k", 1, Link::new(SlotId::HEAD, SlotId::TAIL));
        assert_eq!(record.into_parts(), ("k", 1));
    }
}
