//! core::store::default
//!
//! In-memory metadata store.
//!
//! # Copies
//!
//! [`DefaultMetadataStore::copy_of`] and `Clone` produce a store with the
//! same content *and the same identifier* as the source. This is how
//! transactional agents take their backups: the backup is a distinct object
//! but compares equal to the store it protects.
//!
//! # Example
//!
//! ```
//! use facetwork::core::store::{DefaultMetadataStore, MetadataStore};
//!
//! let original: DefaultMetadataStore<u64> = DefaultMetadataStore::new();
//! let mut copy = DefaultMetadataStore::<u64>::copy_of(&original);
//!
//! assert_eq!(copy, original);
//! copy.clear();
//! assert_eq!(copy.id(), original.id());
//! ```

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use tracing::{debug, trace};

use super::{
    ensure_capability, FacetMap, MetadataStore, StoreError, StoreOptions, UnknownHandlePolicy,
};
use crate::core::facet::{capabilities_of, FacetKind, FacetRef};
use crate::core::types::{Handle, StoreId};

/// Metadata store backed by a `HashMap` per handle.
#[derive(Debug, Clone)]
pub struct DefaultMetadataStore<H: Handle> {
    id: StoreId,
    options: StoreOptions,
    entries: HashMap<H, FacetMap>,
}

impl<H: Handle> DefaultMetadataStore<H> {
    /// Create an empty store with a fresh identifier.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Create an empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            id: StoreId::new(),
            options,
            entries: HashMap::new(),
        }
    }

    /// Copy the content of `source`, inheriting its identifier and options.
    ///
    /// Facet maps are copied; the values themselves are shared.
    pub fn copy_of<S: MetadataStore<H> + ?Sized>(source: &S) -> Self {
        let mut entries = HashMap::new();
        for handle in source.handles() {
            // Handles listed by the source always have facets.
            if let Ok(facets) = source.facets_of(&handle) {
                entries.insert(handle, facets);
            }
        }

        trace!(store = %source.id().short(), handles = entries.len(), "copied store content");

        Self {
            id: source.id(),
            options: source.options(),
            entries,
        }
    }

    /// Number of handles with facets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no facets at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Handle> Default for DefaultMetadataStore<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle> MetadataStore<H> for DefaultMetadataStore<H> {
    fn id(&self) -> StoreId {
        self.id
    }

    fn options(&self) -> StoreOptions {
        self.options
    }

    fn put_facet(&mut self, handle: H, value: FacetRef) -> Result<Vec<FacetKind>, StoreError> {
        let kinds = capabilities_of(value.as_ref());
        if kinds.is_empty() {
            return Err(StoreError::NoFacetKind {
                value_type: value.value_type_name(),
            });
        }

        debug!(
            store = %self.id.short(),
            handle = ?handle,
            kinds = ?kinds.iter().map(FacetKind::name).collect::<Vec<_>>(),
            "registering facet"
        );

        let facets = self.entries.entry(handle).or_default();
        for kind in &kinds {
            facets.insert(*kind, FacetRef::clone(&value));
        }

        Ok(kinds)
    }

    fn put_facet_as(
        &mut self,
        handle: H,
        value: FacetRef,
        kind: FacetKind,
    ) -> Result<(), StoreError> {
        let kind = ensure_capability(kind)?;

        debug!(store = %self.id.short(), handle = ?handle, kind = kind.name(), "registering facet");

        self.entries.entry(handle).or_default().insert(kind, value);
        Ok(())
    }

    fn has_facet(&self, handle: &H, kind: FacetKind) -> Result<bool, StoreError> {
        let kind = ensure_capability(kind)?;
        Ok(self
            .entries
            .get(handle)
            .is_some_and(|facets| facets.contains_key(&kind)))
    }

    fn get_facet(&self, handle: &H, kind: FacetKind) -> Result<FacetRef, StoreError> {
        let kind = ensure_capability(kind)?;
        self.entries
            .get(handle)
            .and_then(|facets| facets.get(&kind))
            .cloned()
            .ok_or_else(|| StoreError::not_found(handle, kind))
    }

    fn remove_facets(&mut self, handle: &H) {
        if self.entries.remove(handle).is_some() {
            debug!(store = %self.id.short(), handle = ?handle, "removed handle");
        }
    }

    fn remove_facet(&mut self, handle: &H, kind: FacetKind) -> Result<(), StoreError> {
        let kind = ensure_capability(kind)?;

        let Some(facets) = self.entries.get_mut(handle) else {
            return Ok(());
        };

        if facets.remove(&kind).is_some() {
            debug!(store = %self.id.short(), handle = ?handle, kind = kind.name(), "removed facet");
        }

        if facets.is_empty() {
            self.entries.remove(handle);
            debug!(store = %self.id.short(), handle = ?handle, "removed handle");
        }

        Ok(())
    }

    fn handles(&self) -> HashSet<H> {
        self.entries.keys().cloned().collect()
    }

    fn facets_of(&self, handle: &H) -> Result<FacetMap, StoreError> {
        match (self.entries.get(handle), self.options.unknown_handle) {
            (Some(facets), _) => Ok(facets.clone()),
            (None, UnknownHandlePolicy::Empty) => Ok(FacetMap::new()),
            (None, UnknownHandlePolicy::Error) => Err(StoreError::unknown_handle(handle)),
        }
    }

    fn clear(&mut self) {
        debug!(store = %self.id.short(), handles = self.entries.len(), "clearing store");
        self.entries.clear();
    }

    fn merge_from(&mut self, source: &dyn MetadataStore<H>) -> Result<(), StoreError> {
        debug!(store = %self.id.short(), source = %source.id().short(), "merging store");

        for handle in source.handles() {
            for (kind, value) in source.facets_of(&handle)? {
                self.put_facet_as(handle.clone(), value, kind)?;
            }
        }

        Ok(())
    }
}

impl<H: Handle> PartialEq for DefaultMetadataStore<H> {
    fn eq(&self, other: &Self) -> bool {
        super::same_store(self, other)
    }
}

impl<H: Handle> Eq for DefaultMetadataStore<H> {}

impl<H: Handle> Hash for DefaultMetadataStore<H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}
