//! core::store::equality
//!
//! Identity-based equality between stores.
//!
//! Stores are equal iff their identifiers are equal; content never takes
//! part in the comparison. This holds across store implementations, so a
//! [`DefaultMetadataStore`](super::DefaultMetadataStore) and a
//! [`StoreProxy`](super::StoreProxy) compare through the same predicate.

use std::fmt;

use super::MetadataStore;
use crate::core::types::{Handle, StoreId};

/// Whether two stores share an identifier.
///
/// # Example
///
/// ```
/// use facetwork::core::store::{same_store, DefaultMetadataStore};
///
/// let a: DefaultMetadataStore<u32> = DefaultMetadataStore::new();
/// let backup = a.clone();
/// let b: DefaultMetadataStore<u32> = DefaultMetadataStore::new();
///
/// assert!(same_store(&a, &backup));
/// assert!(!same_store(&a, &b));
/// ```
pub fn same_store<H, L, R>(left: &L, right: &R) -> bool
where
    H: Handle,
    L: MetadataStore<H> + ?Sized,
    R: MetadataStore<H> + ?Sized,
{
    left.id() == right.id()
}

impl<H: Handle> PartialEq for dyn MetadataStore<H> + '_ {
    fn eq(&self, other: &Self) -> bool {
        same_store(self, other)
    }
}

impl<H: Handle> Eq for dyn MetadataStore<H> + '_ {}

impl<H: Handle> fmt::Debug for dyn MetadataStore<H> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// A store's identity, detached from the store.
///
/// Usable as a set or map key when tracking which stores have been seen
/// without holding on to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreIdentity(StoreId);

impl StoreIdentity {
    /// Capture the identity of a store.
    pub fn of<H: Handle, S: MetadataStore<H> + ?Sized>(store: &S) -> Self {
        Self(store.id())
    }

    /// Whether `store` has this identity.
    pub fn matches<H: Handle, S: MetadataStore<H> + ?Sized>(&self, store: &S) -> bool {
        self.0 == store.id()
    }

    /// The captured identifier.
    pub fn id(&self) -> StoreId {
        self.0
    }
}

impl fmt::Display for StoreIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
