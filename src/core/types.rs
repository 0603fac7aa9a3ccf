//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`StoreId`] - Opaque identity of a metadata store
//! - [`Handle`] - Bound satisfied by every value usable as a storage key
//!
//! # Identity
//!
//! A store's identity is an explicit value, not the address of the store
//! object. A snapshot taken for rollback carries the same [`StoreId`] as the
//! store it was copied from, so the two compare equal even though they are
//! distinct objects with independent content.
//!
//! # Examples
//!
//! ```
//! use facetwork::core::types::StoreId;
//!
//! let a = StoreId::new();
//! let b = StoreId::new();
//! assert_ne!(a, b);
//!
//! let copied = a;
//! assert_eq!(a, copied);
//! ```

use std::fmt;
use std::hash::Hash;

use uuid::Uuid;

/// Identifier of a metadata store.
///
/// Generated once when a store is created and inherited by content copies.
/// Store equality and hashing are defined on this value alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(Uuid);

impl StoreId {
    /// Generate a fresh, random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    ///
    /// # Example
    ///
    /// ```
    /// use facetwork::core::types::StoreId;
    /// use uuid::Uuid;
    ///
    /// let id = StoreId::from_uuid(Uuid::nil());
    /// assert_eq!(id.as_uuid(), &Uuid::nil());
    /// ```
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Get a shortened form for log output.
    ///
    /// # Example
    ///
    /// ```
    /// use facetwork::core::types::StoreId;
    ///
    /// let id = StoreId::new();
    /// assert_eq!(id.short().len(), 8);
    /// ```
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StoreId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A value usable as a storage key.
///
/// Handles are compared by equality and hashed; the store clones them into
/// its own map but never inspects them. Any `Eq + Hash + Clone + Debug`
/// type qualifies through the blanket implementation.
///
/// # Example
///
/// ```
/// use facetwork::core::types::Handle;
///
/// fn accepts_handle<H: Handle>(_: H) {}
///
/// accepts_handle("doc1");
/// accepts_handle(42u64);
/// accepts_handle(String::from("entity"));
/// ```
pub trait Handle: Eq + Hash + Clone + fmt::Debug + 'static {}

impl<T> Handle for T where T: Eq + Hash + Clone + fmt::Debug + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    mod store_id {
        use super::*;

        #[test]
        fn fresh_ids_are_distinct() {
            let ids: Vec<StoreId> = (0..16).map(|_| StoreId::new()).collect();
            for (i, a) in ids.iter().enumerate() {
                for b in &ids[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }

        #[test]
        fn display_is_hyphenated_uuid() {
            let id = StoreId::from_uuid(Uuid::nil());
            assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
        }

        #[test]
        fn short_is_prefix_of_simple_form() {
            let id = StoreId::new();
            assert!(id.as_uuid().simple().to_string().starts_with(&id.short()));
        }
    }
}
