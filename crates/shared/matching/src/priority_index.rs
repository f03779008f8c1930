use crossbook_core::{Price, Side, Timestamp};
use priority_queue::DoublePriorityQueue;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Composite ordering key: side-adjusted price rank, then timestamp
///
/// Smaller is better. Bids negate the price so the highest bid sorts first;
/// asks use the price as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityKey {
    rank: i64,
    timestamp: Timestamp,
}

impl PriorityKey {
    pub fn new(price: Price, timestamp: Timestamp, side: Side) -> Self {
        let rank = match side {
            Side::Buy => price.raw().saturating_neg(),
            Side::Sell => price.raw(),
        };
        Self { rank, timestamp }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    key: PriorityKey,
}

/// Id-keyed table with a priority view over the same ids
///
/// `entries` is the single owner of every value. The queue holds only ids
/// with the key snapshot taken at `put`, so the two structures cannot
/// disagree about a value's contents. Changing the key means `put` again.
///
/// Operations on ids that are not present are no-ops returning `None`.
#[derive(Debug, Clone)]
pub struct PriorityIndex<K, V>
where
    K: Hash + Eq + Clone,
{
    entries: HashMap<K, Entry<V>>,
    queue: DoublePriorityQueue<K, PriorityKey>,
}

impl<K, V> PriorityIndex<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            queue: DoublePriorityQueue::new(),
        }
    }

    /// Insert or replace the value for `id`
    ///
    /// Any previous entry's queue position is dropped before the new key is
    /// queued. Returns the replaced value.
    pub fn put(&mut self, id: K, price: Price, timestamp: Timestamp, value: V, side: Side) -> Option<V> {
        let previous = self.delete(&id);
        let key = PriorityKey::new(price, timestamp, side);
        self.queue.push(id.clone(), key);
        self.entries.insert(id, Entry { value, key });
        previous
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id).map(|e| &e.value)
    }

    /// Mutable access to a value
    ///
    /// Must not be used to change anything the priority key was built from.
    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(id).map(|e| &mut e.value)
    }

    /// Remove `id` from both structures
    pub fn delete<Q>(&mut self, id: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(id)?;
        self.queue.remove(id);
        Some(entry.value)
    }

    /// Remove and return the highest-priority value
    pub fn delete_min(&mut self) -> Option<V> {
        let (id, _) = self.queue.pop_min()?;
        self.entries.remove(&id).map(|e| e.value)
    }

    /// Highest-priority value without removing it
    pub fn peek_min(&self) -> Option<&V> {
        let (id, _) = self.queue.peek_min()?;
        self.get(id)
    }

    pub fn key_of<Q>(&self, id: &Q) -> Option<PriorityKey>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id).map(|e| e.key)
    }

    /// All values, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|e| &e.value)
    }

    /// All values, best first. O(n log n)
    pub fn sorted_values(&self) -> Vec<&V> {
        let mut entries: Vec<&Entry<V>> = self.entries.values().collect();
        entries.sort_by_key(|e| e.key);
        entries.into_iter().map(|e| &e.value).collect()
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> Default for PriorityIndex<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
