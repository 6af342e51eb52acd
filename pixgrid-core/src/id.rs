//! # IDs
//! Layers need an identity that survives history snapshots, resizes, and reordering, even though
//! their contents change. That identity is provided by `UniqueID<T>`, namespaced by the type `T`.
//!
//! IDs are unique for the lifetime of the process, so an ID handed out before an undo can never
//! be confused with a layer created after it.

use std::sync::atomic::{AtomicU64, Ordering};

// Next free value per namespace. Only touched on the first allocation of each namespace.
static COUNTERS: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, &'static AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// Fetch (or lazily create) the counter for a namespace.
fn counter_for(ty: std::any::TypeId) -> &'static AtomicU64 {
    if let Some(counter) = COUNTERS.read().get(&ty).copied() {
        return counter;
    }
    let mut write = COUNTERS.write();
    // Another thread may have raced us between the read and the write.
    *write
        .entry(ty)
        .or_insert_with(|| Box::leak(Box::new(AtomicU64::new(1))))
}

/// Identifier unique within this process, namespaced by `T`.
/// IDs of different namespaces may share a numeric value but never compare equal, as they are
/// different types.
pub struct UniqueID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _namespace: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> UniqueID<T> {
    /// Allocate a fresh ID.
    ///
    /// # Panics
    /// If the namespace has exhausted all `u64::MAX - 1` values.
    #[must_use]
    pub fn next() -> Self {
        let raw = counter_for(std::any::TypeId::of::<T>()).fetch_add(1, Ordering::Relaxed);
        // Wrapped around to zero. Uniqueness can no longer be upheld.
        let id = std::num::NonZeroU64::new(raw).unwrap_or_else(|| {
            log::error!("{} ID space exhausted!", std::any::type_name::<T>());
            panic!("{} ID space exhausted", std::any::type_name::<T>())
        });
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
    /// Raw numeric value. Not stable between runs, do not persist.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for UniqueID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> Clone for UniqueID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for UniqueID<T> {}
impl<T: std::any::Any> PartialEq for UniqueID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for UniqueID<T> {}
impl<T: std::any::Any> std::hash::Hash for UniqueID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> std::fmt::Display for UniqueID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element.
        let short = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or_default();
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for UniqueID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
