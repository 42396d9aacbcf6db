//! Append-only, copy-on-divergence buffer backing query expressions.
//!
//! An [`AppendBuffer`] is a `(store, len)` pair. Every view only ever reads the
//! first `len` elements of its store, and elements below the store's committed
//! length are never written again. Appending through the view that ends at the
//! committed length extends the shared store in place; appending through an
//! older, shorter view forks a new store so that both histories stay intact.
//!
//! The lock only guards the swap of the committed items. Readers take a
//! snapshot of them and release the lock immediately, so a snapshot may stay
//! alive across appends on the same store.

use std::{fmt, ops::Deref, sync::Arc};

use parking_lot::RwLock;

use crate::{
    error::BufferError,
    logging::{query_log, LogContext},
};

/// Smallest capacity allocated for a store.
pub(crate) const MIN_CAPACITY: usize = 16;

const BUFFER_LOG_CTX: LogContext = LogContext::new("component=append_buffer");

type Items<T> = Arc<Vec<T>>;

type Store<T> = Arc<RwLock<Items<T>>>;

/// Immutable view over a growable, shared append-only store.
pub struct AppendBuffer<T> {
    store: Option<Store<T>>,
    len: usize,
}

impl<T> AppendBuffer<T> {
    /// Returns a view without a backing store.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            store: None,
            len: 0,
        }
    }

    /// Number of elements visible through this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true when the view holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Snapshots exactly the elements of this view.
    ///
    /// The snapshot holds no lock; appends through any view may proceed while
    /// it is alive.
    pub fn read(&self) -> BufferRead<T> {
        BufferRead {
            items: self.store.as_ref().map(|store| Arc::clone(&*store.read())),
            len: self.len,
        }
    }

    /// Returns true when both views read from the same backing store.
    #[must_use]
    pub fn shares_store_with(&self, other: &Self) -> bool {
        match (&self.store, &other.store) {
            (Some(lhs), Some(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.store
            .as_ref()
            .map_or(0, |store| store.read().capacity())
    }
}

impl<T: Clone> AppendBuffer<T> {
    /// Copies the element at `index`, if it is part of this view.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        self.store
            .as_ref()
            .and_then(|store| store.read().get(index).cloned())
    }

    /// Copies the visible elements into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.read().to_vec()
    }

    /// Returns a view with `values` appended, reporting allocation failures.
    pub fn try_add_range(&self, values: &[T]) -> Result<Self, BufferError> {
        if values.is_empty() {
            return Ok(self.clone());
        }
        let Some(store) = &self.store else {
            let mut items = allocate(values.len().max(MIN_CAPACITY))?;
            items.extend_from_slice(values);
            return Ok(Self::from_store(
                Arc::new(RwLock::new(Arc::new(items))),
                values.len(),
            ));
        };

        let mut items = store.write();
        if items.len() == self.len {
            append(&mut *items, values)?;
            return Ok(Self::from_store(Arc::clone(store), items.len()));
        }

        // Another view already appended past this snapshot.
        let committed = Arc::clone(&*items);
        drop(items);
        let capacity = committed
            .len()
            .max(MIN_CAPACITY)
            .checked_add(values.len())
            .ok_or(BufferError::Allocation {
                requested: usize::MAX,
            })?;
        let mut forked = allocate(capacity)?;
        forked.extend_from_slice(&committed[..self.len]);
        forked.extend_from_slice(values);
        query_log!(
            log::Level::Trace,
            ctx: BUFFER_LOG_CTX,
            "append_buffer_fork",
            "view_len={} store_len={} appended={}",
            self.len,
            committed.len(),
            values.len(),
        );
        let len = forked.len();
        Ok(Self::from_store(Arc::new(RwLock::new(Arc::new(forked))), len))
    }

    /// Returns a view with `value` appended, reporting allocation failures.
    pub fn try_add(&self, value: T) -> Result<Self, BufferError> {
        self.try_add_range(std::slice::from_ref(&value))
    }

    /// Returns a view with `values` appended.
    ///
    /// # Panics
    ///
    /// Panics when the allocator cannot provide the required capacity.
    #[must_use]
    pub fn add_range(&self, values: &[T]) -> Self {
        match self.try_add_range(values) {
            Ok(buffer) => buffer,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns a view with `value` appended.
    ///
    /// # Panics
    ///
    /// Panics when the allocator cannot provide the required capacity.
    #[must_use]
    pub fn add(&self, value: T) -> Self {
        self.add_range(std::slice::from_ref(&value))
    }

    fn from_store(store: Store<T>, len: usize) -> Self {
        Self {
            store: Some(store),
            len,
        }
    }
}

fn allocate<T>(capacity: usize) -> Result<Vec<T>, BufferError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::Allocation {
            requested: capacity,
        })?;
    Ok(items)
}

/// Appends `values` to the committed items of a store.
///
/// Extends in place when no snapshot shares the items. Otherwise the committed
/// items are copied into a new allocation that replaces them in the store;
/// snapshots keep the old one.
fn append<T: Clone>(items: &mut Items<T>, values: &[T]) -> Result<(), BufferError> {
    let capacity = grown_capacity(&**items, values.len())?;
    match Arc::get_mut(items) {
        Some(unique) => {
            unique
                .try_reserve_exact(capacity - unique.len())
                .map_err(|_| BufferError::Allocation {
                    requested: capacity,
                })?;
            unique.extend_from_slice(values);
        }
        None => {
            let mut copied = allocate(capacity)?;
            copied.extend_from_slice(&items[..]);
            copied.extend_from_slice(values);
            *items = Arc::new(copied);
        }
    }
    Ok(())
}

/// Capacity needed for `additional` more elements, doubling when full.
fn grown_capacity<T>(items: &Vec<T>, additional: usize) -> Result<usize, BufferError> {
    let required = items
        .len()
        .checked_add(additional)
        .ok_or(BufferError::Allocation {
            requested: usize::MAX,
        })?;
    if required <= items.capacity() {
        return Ok(items.capacity());
    }
    Ok(required
        .max(items.capacity().saturating_mul(2))
        .max(MIN_CAPACITY))
}

impl<T> Clone for AppendBuffer<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for AppendBuffer<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for AppendBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.read().iter()).finish()
    }
}

impl<T> FromIterator<T> for AppendBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut items: Vec<T> = iter.into_iter().collect();
        if items.is_empty() {
            return Self::empty();
        }
        items.reserve(MIN_CAPACITY.saturating_sub(items.len()));
        let len = items.len();
        Self {
            store: Some(Arc::new(RwLock::new(Arc::new(items)))),
            len,
        }
    }
}

/// Snapshot of the elements visible through one [`AppendBuffer`] view.
pub struct BufferRead<T> {
    items: Option<Items<T>>,
    len: usize,
}

impl<T> Deref for BufferRead<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match &self.items {
            None => &[],
            Some(items) => &items[..self.len],
        }
    }
}
