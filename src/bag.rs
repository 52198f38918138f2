//! An unordered keyed collection used by subjects and
//! [`CompositeSubscription`](crate::subscription::CompositeSubscription).
//!
//! Members are stored under a generated unique key so that a single member
//! can be removed without scanning by value. The bag itself is not
//! synchronized; every user wraps it in a per-instance mutex and takes a
//! snapshot (or drains it) under the lock before delivering events outside
//! the lock.

use smallvec::SmallVec;

/// Key returned by [`Bag::insert`], used to remove that one member later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BagKey(u64);

pub struct Bag<T> {
  next_key: u64,
  entries: SmallVec<[(u64, T); 2]>,
}

impl<T> Default for Bag<T> {
  fn default() -> Self {
    Bag {
      next_key: 0,
      entries: SmallVec::new(),
    }
  }
}

impl<T> Bag<T> {
  pub fn insert(&mut self, value: T) -> BagKey {
    let key = self.next_key;
    self.next_key += 1;
    self.entries.push((key, value));
    BagKey(key)
  }

  pub fn remove(&mut self, key: BagKey) -> Option<T> {
    let index = self.entries.iter().position(|(k, _)| *k == key.0)?;
    // Unordered, so swap_remove keeps removal O(1) once found.
    Some(self.entries.swap_remove(index).1)
  }

  /// Detaches every member at once. Used by terminal broadcasts and by
  /// composite teardown so members calling back into the bag during
  /// delivery observe an already-empty collection.
  pub fn drain(&mut self) -> SmallVec<[T; 2]> {
    self.entries.drain(..).map(|(_, v)| v).collect()
  }

  pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
    self.entries.retain(|(_, v)| keep(v));
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.entries.iter().map(|(_, v)| v)
  }

  #[inline]
  pub fn len(&self) -> usize { self.entries.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
