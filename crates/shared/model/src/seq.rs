//! Storage for sequence fields.
//!
//! A [`Sequence`] is either unset or a list shared by every clone of the model
//! that holds it: `Clone` copies the handle, not the list, so a push made
//! through one copy is visible through all of them. Equality and hashing look
//! only at the contents, with an unset sequence reading as empty.
//!
//! Guards returned by [`Sequence::read`] and [`Sequence::write`] hold the
//! list's lock. Do not keep a read guard alive while writing through another
//! handle to the same list.

use crate::StableHash;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Mutable view of a materialized sequence.
pub type SequenceMut<'a, T> = RwLockWriteGuard<'a, Vec<T>>;

pub struct Sequence<T> {
    inner: Option<Arc<RwLock<Vec<T>>>>,
}

/// Read view of a sequence; derefs to an empty slice while unset.
pub struct SequenceRef<'a, T> {
    guard: Option<RwLockReadGuard<'a, Vec<T>>>,
}

impl<T> Sequence<T> {
    pub const fn unset() -> Self {
        Self { inner: None }
    }

    pub fn new(items: Vec<T>) -> Self {
        Self { inner: Some(Arc::new(RwLock::new(items))) }
    }

    pub const fn is_set(&self) -> bool {
        self.inner.is_some()
    }

    pub const fn is_unset(&self) -> bool {
        self.inner.is_none()
    }

    pub fn read(&self) -> SequenceRef<'_, T> {
        SequenceRef { guard: self.inner.as_deref().map(|lock| lock.read()) }
    }

    /// Locks the list for writing, materializing an empty one when unset.
    pub fn write(&mut self) -> SequenceMut<'_, T> {
        self.inner.get_or_insert_with(Arc::default).write()
    }

    /// Replaces the handle; `None` resets to unset. Clones keep the old list.
    pub fn set(&mut self, items: Option<Vec<T>>) {
        self.inner = items.map(|items| Arc::new(RwLock::new(items)));
    }

    /// Whether both handles point at the same list.
    pub fn shares_storage(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> Deref for SequenceRef<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.guard.as_deref().map(Vec::as_slice).unwrap_or_default()
    }
}

impl<T: fmt::Debug> fmt::Debug for SequenceRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() { fmt::Debug::fmt(&self.read(), f) } else { f.write_str("Unset") }
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shares_storage(other) || *self.read() == *other.read()
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T: Hash> Hash for Sequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self.read()).hash(state);
    }
}

impl<T: StableHash> StableHash for Sequence<T> {
    fn stable_hash(&self) -> i32 {
        (*self.read()).stable_hash()
    }
}

impl<T: Serialize> Serialize for Sequence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.read().iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sequence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::deserialize(deserializer).map(Self::new)
    }
}
