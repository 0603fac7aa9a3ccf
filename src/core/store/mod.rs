//! core::store
//!
//! Metadata stores: facet values attached to handles, keyed by capability.
//!
//! # Modules
//!
//! - [`default`] - In-memory store ([`DefaultMetadataStore`])
//! - [`proxy`] - Store forwarding to a delegate resolved per call
//! - [`equality`] - Identity-based store equality
//!
//! # Architecture
//!
//! [`MetadataStore`] is the contract every store satisfies. It is object
//! safe: agents and proxies work on `&mut dyn MetadataStore<H>` so the
//! concrete store can be swapped freely. Typed convenience methods live in
//! [`MetadataStoreExt`], implemented for every store.
//!
//! # Invariants
//!
//! - Only capability kinds key a store; anything else is
//!   [`StoreError::InvalidFacetKind`]
//! - Each (handle, kind) pair maps to exactly one value, latest put wins
//! - A handle with no facets is not present in the store
//! - Two stores are equal iff their [`StoreId`]s are equal
//!
//! # Example
//!
//! ```
//! use facetwork::core::facet::Facet;
//! use facetwork::core::store::{DefaultMetadataStore, MetadataStore, MetadataStoreExt};
//! use facetwork::{capability, facet_value};
//!
//! pub trait Titled: Facet {
//!     fn text(&self) -> &str;
//! }
//! capability!(Titled);
//!
//! #[derive(Debug)]
//! pub struct TitleValue(String);
//! impl Titled for TitleValue {
//!     fn text(&self) -> &str {
//!         &self.0
//!     }
//! }
//! facet_value!(TitleValue: Titled);
//!
//! let mut store = DefaultMetadataStore::<&str>::new();
//! store.put("doc1", TitleValue("Report".into())).unwrap();
//!
//! assert!(store.has::<dyn Titled>(&"doc1").unwrap());
//! let title = store.get_as::<dyn Titled, TitleValue>(&"doc1").unwrap();
//! assert_eq!(title.text(), "Report");
//!
//! store.remove::<dyn Titled>(&"doc1").unwrap();
//! assert!(!store.handles().contains(&"doc1"));
//! ```

pub mod default;
pub mod equality;
pub mod proxy;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::facet::{downcast_facet, Facet, FacetKind, FacetRef, FacetType};
use super::types::{Handle, StoreId};

pub use default::DefaultMetadataStore;
pub use equality::{same_store, StoreIdentity};
pub use proxy::{Locator, SharedStore, StoreProxy};

/// Facets attached to one handle.
pub type FacetMap = HashMap<FacetKind, FacetRef>;

/// Errors from metadata store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A facet kind that is not a capability was used as a key.
    #[error("invalid facet kind '{kind}': facets can only be keyed by capability types")]
    InvalidFacetKind {
        /// Name of the offending kind.
        kind: &'static str,
    },

    /// Auto-registration found no capability on the value.
    #[error("value of type '{value_type}' implements no facet capability")]
    NoFacetKind {
        /// Concrete type of the value.
        value_type: &'static str,
    },

    /// No value is registered for the handle under the kind.
    #[error("facet '{kind}' not found for handle {handle}")]
    FacetNotFound {
        /// Requested kind.
        kind: &'static str,
        /// Debug rendering of the handle.
        handle: String,
    },

    /// The handle has no facets at all.
    #[error("unknown handle: {handle}")]
    UnknownHandle {
        /// Debug rendering of the handle.
        handle: String,
    },

    /// The stored value is not of the requested concrete type.
    #[error("facet '{kind}' does not hold a value of type '{expected}'")]
    FacetTypeMismatch {
        /// Requested kind.
        kind: &'static str,
        /// Requested concrete type.
        expected: &'static str,
    },
}

impl StoreError {
    pub(crate) fn not_found<H: Handle>(handle: &H, kind: FacetKind) -> Self {
        StoreError::FacetNotFound {
            kind: kind.name(),
            handle: format!("{:?}", handle),
        }
    }

    pub(crate) fn unknown_handle<H: Handle>(handle: &H) -> Self {
        StoreError::UnknownHandle {
            handle: format!("{:?}", handle),
        }
    }
}

/// Reject kinds that may not key a store.
pub fn ensure_capability(kind: FacetKind) -> Result<FacetKind, StoreError> {
    if kind.is_capability() {
        Ok(kind)
    } else {
        Err(StoreError::InvalidFacetKind { kind: kind.name() })
    }
}

/// What [`MetadataStore::facets_of`] does for a handle with no facets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownHandlePolicy {
    /// Fail with [`StoreError::UnknownHandle`].
    #[default]
    Error,
    /// Return an empty map.
    Empty,
}

/// Behavioural options of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Handling of unknown handles in `facets_of`.
    pub unknown_handle: UnknownHandlePolicy,
}

/// A repository binding facet values to handles.
///
/// Read accessors return owned data (`HashSet`, [`FacetMap`]); values are
/// shared [`FacetRef`]s so the copies are shallow. Stores are single-writer:
/// no method synchronises with other users of the same store.
pub trait MetadataStore<H: Handle> {
    /// Identifier used for equality.
    fn id(&self) -> StoreId;

    /// Identifier of the store that holds the content.
    ///
    /// Equal to [`id`](Self::id) for a store that owns its facets; a
    /// forwarding store reports the store it currently resolves to.
    fn content_id(&self) -> StoreId {
        self.id()
    }

    /// Behavioural options in effect for this store.
    fn options(&self) -> StoreOptions;

    /// Register a value under every capability it implements.
    ///
    /// Returns the kinds the value was registered under.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoFacetKind`] if the value declares no capability.
    fn put_facet(&mut self, handle: H, value: FacetRef) -> Result<Vec<FacetKind>, StoreError>;

    /// Register a value under exactly `kind`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidFacetKind`] if `kind` is not a capability.
    fn put_facet_as(&mut self, handle: H, value: FacetRef, kind: FacetKind)
        -> Result<(), StoreError>;

    /// Check whether a value is registered for the handle under `kind`.
    fn has_facet(&self, handle: &H, kind: FacetKind) -> Result<bool, StoreError>;

    /// Get the value registered for the handle under `kind`.
    ///
    /// # Errors
    ///
    /// [`StoreError::FacetNotFound`] if nothing is registered.
    fn get_facet(&self, handle: &H, kind: FacetKind) -> Result<FacetRef, StoreError>;

    /// Remove every facet of the handle. Unknown handles are ignored.
    fn remove_facets(&mut self, handle: &H);

    /// Remove one facet, dropping the handle once its last facet is gone.
    fn remove_facet(&mut self, handle: &H, kind: FacetKind) -> Result<(), StoreError>;

    /// All handles with at least one facet.
    fn handles(&self) -> HashSet<H>;

    /// Facets of one handle.
    ///
    /// Unknown handles follow the store's [`UnknownHandlePolicy`].
    fn facets_of(&self, handle: &H) -> Result<FacetMap, StoreError>;

    /// Remove everything.
    fn clear(&mut self);

    /// Copy every facet of `source` into this store, overwriting collisions.
    fn merge_from(&mut self, source: &dyn MetadataStore<H>) -> Result<(), StoreError>;
}

/// Typed access on top of [`MetadataStore`].
///
/// Kinds are named by type parameter instead of a [`FacetKind`] value.
pub trait MetadataStoreExt<H: Handle>: MetadataStore<H> {
    /// Wrap and auto-register a value.
    fn put<T: Facet>(&mut self, handle: H, value: T) -> Result<Vec<FacetKind>, StoreError> {
        self.put_facet(handle, Arc::new(value))
    }

    /// Wrap and register a value under capability `C`.
    fn put_as<C, T>(&mut self, handle: H, value: T) -> Result<(), StoreError>
    where
        C: ?Sized + FacetType,
        T: Facet,
    {
        self.put_facet_as(handle, Arc::new(value), FacetKind::of::<C>())
    }

    /// Check for a value under capability `C`.
    fn has<C: ?Sized + FacetType>(&self, handle: &H) -> Result<bool, StoreError> {
        self.has_facet(handle, FacetKind::of::<C>())
    }

    /// Get the value under capability `C`.
    fn get<C: ?Sized + FacetType>(&self, handle: &H) -> Result<FacetRef, StoreError> {
        self.get_facet(handle, FacetKind::of::<C>())
    }

    /// Get the value under capability `C` as concrete type `T`.
    fn get_as<C, T>(&self, handle: &H) -> Result<Arc<T>, StoreError>
    where
        C: ?Sized + FacetType,
        T: Facet,
    {
        let kind = FacetKind::of::<C>();
        let value = self.get_facet(handle, kind)?;
        downcast_facet::<T>(&value).ok_or(StoreError::FacetTypeMismatch {
            kind: kind.name(),
            expected: std::any::type_name::<T>(),
        })
    }

    /// Remove the value under capability `C`.
    fn remove<C: ?Sized + FacetType>(&mut self, handle: &H) -> Result<(), StoreError> {
        self.remove_facet(handle, FacetKind::of::<C>())
    }
}

impl<H: Handle, S: MetadataStore<H> + ?Sized> MetadataStoreExt<H> for S {}
