//! Recency List Module
//!
//! Doubly linked ordering of cached records, stored in a slot arena and
//! linked by slot ids.
//!
//! Slot 0 (`HEAD`) sits before the least recently used record and slot 1
//! (`TAIL`) after the most recently used one:
//!
//! ```text
//!   HEAD <-> [coldest] <-> ... <-> [hottest] <-> TAIL
//! ```
//!
//! The two sentinels close the loop (`HEAD.prev == TAIL`, `TAIL.next == HEAD`)
//! so linking and unlinking never needs a boundary check.

use crate::cache::record::{Link, Record, Slot, SlotId};
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front, whatever the requested capacity.
const MAX_PREALLOCATED_SLOTS: usize = 4096;

// == Recency List ==
/// Arena-backed doubly linked list ordered from least to most recently used.
#[derive(Debug)]
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<SlotId>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates an empty list with both sentinels linked to each other.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        let reserved = SlotId::SENTINELS + capacity.min(MAX_PREALLOCATED_SLOTS);
        let mut slots = Vec::with_capacity(reserved);
        slots.push(Slot::Sentinel(Link::new(SlotId::TAIL, SlotId::TAIL)));
        slots.push(Slot::Sentinel(Link::new(SlotId::HEAD, SlotId::HEAD)));

        Self {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Back ==
    /// Inserts a new record at the most recently used end.
    pub fn push_back(&mut self, key: K, value: V) -> SlotId {
        let last = self.link(SlotId::TAIL).prev;
        let record = Record::new(key, value, Link::new(last, SlotId::TAIL));

        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Slot::Occupied(record);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(record));
                SlotId::new(self.slots.len() - 1)
            }
        };

        self.link_mut(last).next = id;
        self.link_mut(SlotId::TAIL).prev = id;
        self.len += 1;
        id
    }

    // == Move To Back ==
    /// Promotes a record to the most recently used end.
    pub fn move_to_back(&mut self, id: SlotId) {
        if id.is_sentinel() || self.link(SlotId::TAIL).prev == id {
            return;
        }

        self.detach(id);

        let last = self.link(SlotId::TAIL).prev;
        *self.link_mut(id) = Link::new(last, SlotId::TAIL);
        self.link_mut(last).next = id;
        self.link_mut(SlotId::TAIL).prev = id;
    }

    // == Remove ==
    /// Unlinks a record and frees its slot.
    ///
    /// Returns None if `id` does not hold a record.
    pub fn remove(&mut self, id: SlotId) -> Option<Record<K, V>> {
        self.slots.get(id.index())?.record()?;

        self.detach(id);
        let slot = std::mem::replace(&mut self.slots[id.index()], Slot::Vacant);
        self.free.push(id);
        self.len -= 1;

        match slot {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }

    // == Pop Front ==
    /// Removes and returns the least recently used record.
    pub fn pop_front(&mut self) -> Option<Record<K, V>> {
        let first = self.link(SlotId::HEAD).next;
        if first == SlotId::TAIL {
            return None;
        }
        self.remove(first)
    }

    /// Least recently used record.
    pub fn front(&self) -> Option<&Record<K, V>> {
        self.get(self.link(SlotId::HEAD).next)
    }

    /// Most recently used record.
    pub fn back(&self) -> Option<&Record<K, V>> {
        self.get(self.link(SlotId::TAIL).prev)
    }

    pub fn get(&self, id: SlotId) -> Option<&Record<K, V>> {
        self.slots.get(id.index()).and_then(Slot::record)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Record<K, V>> {
        self.slots.get_mut(id.index()).and_then(Slot::record_mut)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every record and relinks the sentinels.
    pub fn clear(&mut self) {
        self.slots.truncate(SlotId::SENTINELS);
        self.slots[SlotId::HEAD.index()] = Slot::Sentinel(Link::new(SlotId::TAIL, SlotId::TAIL));
        self.slots[SlotId::TAIL.index()] = Slot::Sentinel(Link::new(SlotId::HEAD, SlotId::HEAD));
        self.free.clear();
        self.len = 0;
    }

    /// Iterates records from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            front: self.link(SlotId::HEAD).next,
            back: self.link(SlotId::TAIL).prev,
            remaining: self.len,
        }
    }

    // == Validate ==
    /// Walks the list from `HEAD` to `TAIL` checking every link.
    ///
    /// Returns the slot ids in recency order.
    pub fn validate(&self) -> Result<Vec<SlotId>> {
        let mut ids = Vec::with_capacity(self.len);
        let mut prev = SlotId::HEAD;
        let mut current = self.checked_link(SlotId::HEAD)?.next;

        while current != SlotId::TAIL {
            if ids.len() == self.len {
                return Err(CacheError::Corrupted(format!(
                    "list walk exceeded {} records without reaching the tail",
                    self.len
                )));
            }
            if current.is_sentinel() {
                return Err(CacheError::Corrupted(format!(
                    "sentinel slot {} linked inside the list",
                    current.index()
                )));
            }

            let record = self.get(current).ok_or_else(|| {
                CacheError::Corrupted(format!("slot {} is linked but vacant", current.index()))
            })?;
            if record.link.prev != prev {
                return Err(CacheError::Corrupted(format!(
                    "slot {} points back to {} instead of {}",
                    current.index(),
                    record.link.prev.index(),
                    prev.index()
                )));
            }

            ids.push(current);
            prev = current;
            current = record.link.next;
        }

        if self.checked_link(SlotId::TAIL)?.prev != prev {
            return Err(CacheError::Corrupted(
                "tail sentinel does not point back to the last record".to_string(),
            ));
        }
        if ids.len() != self.len {
            return Err(CacheError::Corrupted(format!(
                "list holds {} records but counts {}",
                ids.len(),
                self.len
            )));
        }

        let occupied = self.slots.iter().filter(|s| s.record().is_some()).count();
        if occupied != self.len {
            return Err(CacheError::Corrupted(format!(
                "{} occupied slots but {} linked records",
                occupied, self.len
            )));
        }

        Ok(ids)
    }

    fn detach(&mut self, id: SlotId) {
        let Link { prev, next } = self.link(id);
        self.link_mut(prev).next = next;
        self.link_mut(next).prev = prev;
    }

    fn checked_link(&self, id: SlotId) -> Result<Link> {
        self.slots
            .get(id.index())
            .and_then(Slot::link)
            .ok_or_else(|| CacheError::Corrupted(format!("slot {} has no links", id.index())))
    }

    // Ids reaching these helpers always come from the list itself or the
    // cache index, so a vacant slot here is a broken internal invariant.
    fn link(&self, id: SlotId) -> Link {
        match self.slots[id.index()].link() {
            Some(link) => link,
            None => unreachable!("vacant slot {} reached through the recency list", id.index()),
        }
    }

    fn link_mut(&mut self, id: SlotId) -> &mut Link {
        match self.slots[id.index()].link_mut() {
            Some(link) => link,
            None => unreachable!("vacant slot {} reached through the recency list", id.index()),
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Double-ended iterator over records, coldest first.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    front: SlotId,
    back: SlotId,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Record<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.list.get(self.front)?;
        self.front = record.link.next;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.list.get(self.back)?;
        self.back = record.link.prev;
        self.remaining -= 1;
        Some(record)
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<&'static str, u32>) -> Vec<&'static str> {
        list.iter().map(|r| r.key).collect()
    }

    #[test]
    fn test_list_new_is_empty_and_valid() {
        let list: RecencyList<&str, u32> = RecencyList::new();
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        assert_eq!(list.validate().unwrap(), Vec::new());
    }

    #[test]
    fn test_list_push_back_orders_oldest_first() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        list.push_back("b", 2);
        list.push_back("c", 3);

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list), vec!["a", "b", "c"]);
        assert_eq!(list.front().map(|r| r.key), Some("a"));
        assert_eq!(list.back().map(|r| r.key), Some("c"));
        assert_eq!(list.validate().unwrap().len(), 3);
    }

    #[test]
    fn test_list_single_entry_links_both_sentinels() {
        let mut list = RecencyList::new();
        let id = list.push_back("only", 1);

        assert_eq!(list.get(id).unwrap().link, Link::new(SlotId::HEAD, SlotId::TAIL));
        assert_eq!(list.validate().unwrap(), vec![id]);
    }

    #[test]
    fn test_list_move_to_back() {
        let mut list = RecencyList::new();
        let a = list.push_back("a", 1);
        list.push_back("b", 2);
        list.push_back("c", 3);

        list.move_to_back(a);

        assert_eq!(keys(&list), vec!["b", "c", "a"]);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_move_to_back_of_hottest_is_noop() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        let b = list.push_back("b", 2);

        list.move_to_back(b);
        list.move_to_back(b);

        assert_eq!(keys(&list), vec!["a", "b"]);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_move_to_back_ignores_sentinels() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);

        list.move_to_back(SlotId::HEAD);
        list.move_to_back(SlotId::TAIL);

        assert_eq!(keys(&list), vec!["a"]);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_remove_middle() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        let b = list.push_back("b", 2);
        list.push_back("c", 3);

        let removed = list.remove(b).unwrap();

        assert_eq!(removed.into_parts(), ("b", 2));
        assert_eq!(keys(&list), vec!["a", "c"]);
        assert!(list.remove(b).is_none());
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_remove_sentinel_returns_none() {
        let mut list: RecencyList<&str, u32> = RecencyList::new();
        assert!(list.remove(SlotId::HEAD).is_none());
        assert!(list.remove(SlotId::TAIL).is_none());
        assert!(list.remove(SlotId::new(99)).is_none());
    }

    #[test]
    fn test_list_pop_front() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        list.push_back("b", 2);

        assert_eq!(list.pop_front().map(Record::into_parts), Some(("a", 1)));
        assert_eq!(list.pop_front().map(Record::into_parts), Some(("b", 2)));
        assert!(list.pop_front().is_none());
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_reuses_freed_slots() {
        let mut list = RecencyList::new();
        let a = list.push_back("a", 1);
        list.push_back("b", 2);

        list.remove(a);
        let c = list.push_back("c", 3);

        assert_eq!(a, c);
        assert_eq!(keys(&list), vec!["b", "c"]);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_list_clear() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        list.push_back("b", 2);

        list.clear();

        assert!(list.is_empty());
        assert!(list.iter().next().is_none());
        assert!(list.validate().is_ok());

        list.push_back("c", 3);
        assert_eq!(keys(&list), vec!["c"]);
    }

    #[test]
    fn test_list_iter_double_ended() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        list.push_back("b", 2);
        list.push_back("c", 3);

        let reversed: Vec<_> = list.iter().rev().map(|r| r.key).collect();
        assert_eq!(reversed, vec!["c", "b", "a"]);

        let mut iter = list.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next().map(|r| r.key), Some("a"));
        assert_eq!(iter.next_back().map(|r| r.key), Some("c"));
        assert_eq!(iter.next().map(|r| r.key), Some("b"));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_list_validate_detects_broken_back_link() {
        let mut list = RecencyList::new();
        list.push_back("a", 1);
        let b = list.push_back("b", 2);

        list.get_mut(b).unwrap().link.prev = SlotId::HEAD;

        assert!(matches!(list.validate(), Err(CacheError::Corrupted(_))));
    }

    #[test]
    fn test_list_huge_capacity_does_not_preallocate_everything() {
        let list: RecencyList<u64, u64> = RecencyList::with_capacity(usize::MAX);
        assert!(list.is_empty());
    }
}
