//! core::store::proxy
//!
//! A store that forwards to whichever store is current.
//!
//! # Architecture
//!
//! [`StoreProxy`] holds a [`Locator`] instead of a store. Every operation
//! asks the locator for the delegate again, so swapping the store the
//! locator points at (for example, the store of the currently open
//! document) redirects the proxy without rebuilding it.
//!
//! The proxy has an identity of its own, generated at construction. It is
//! never equal to its delegate and does not change when the delegate does.
//! [`MetadataStore::content_id`] reports the delegate's identity instead,
//! following nested proxies down to the store holding the facets.
//!
//! # Borrowing
//!
//! Delegates are shared as [`SharedStore`] (`Rc<RefCell<_>>`). Each proxy
//! call borrows the delegate only for the duration of that call; calling
//! the proxy while the delegate is mutably borrowed elsewhere panics, as
//! any `RefCell` double borrow does.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use facetwork::core::store::proxy::{share_store, SharedStore, StoreProxy};
//! use facetwork::core::store::{DefaultMetadataStore, MetadataStore};
//!
//! let first = share_store(DefaultMetadataStore::<&str>::new());
//! let second = share_store(DefaultMetadataStore::<&str>::new());
//!
//! let current: Rc<RefCell<SharedStore<&str>>> = Rc::new(RefCell::new(first.clone()));
//! let proxy = StoreProxy::new({
//!     let current = Rc::clone(&current);
//!     move || current.borrow().clone()
//! });
//!
//! assert_eq!(proxy.delegate_id(), first.borrow().id());
//! *current.borrow_mut() = second.clone();
//! assert_eq!(proxy.delegate_id(), second.borrow().id());
//! assert_ne!(proxy.id(), second.borrow().id());
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use tracing::trace;

use super::{DefaultMetadataStore, FacetMap, MetadataStore, StoreError, StoreOptions};
use crate::core::facet::{FacetKind, FacetRef};
use crate::core::types::{Handle, StoreId};

/// A store shared between its owner and any proxies resolving to it.
pub type SharedStore<H> = Rc<RefCell<dyn MetadataStore<H>>>;

/// Wrap a store for sharing.
pub fn share_store<H, S>(store: S) -> SharedStore<H>
where
    H: Handle,
    S: MetadataStore<H> + 'static,
{
    Rc::new(RefCell::new(store))
}

/// Resolves a reference that may change over time.
///
/// `locate` is called every time the value is needed; implementations
/// should not cache.
pub trait Locator<T> {
    /// Return the current value.
    fn locate(&self) -> T;
}

impl<T, F> Locator<T> for F
where
    F: Fn() -> T,
{
    fn locate(&self) -> T {
        self()
    }
}

/// Store forwarding every operation to a delegate obtained per call.
///
/// Everything except [`MetadataStore::id`], equality and hashing is
/// delegated.
pub struct StoreProxy<H: Handle> {
    id: StoreId,
    locator: Box<dyn Locator<SharedStore<H>>>,
}

impl<H: Handle> StoreProxy<H> {
    /// Create a proxy with a fresh identifier.
    pub fn new<L>(locator: L) -> Self
    where
        L: Locator<SharedStore<H>> + 'static,
    {
        Self {
            id: StoreId::new(),
            locator: Box::new(locator),
        }
    }

    /// Create a proxy that always resolves to `store`.
    pub fn fixed(store: SharedStore<H>) -> Self {
        Self::new(move || Rc::clone(&store))
    }

    /// Resolve the current delegate.
    pub fn resolve(&self) -> SharedStore<H> {
        trace!(proxy = %self.id.short(), "resolving delegate");
        self.locator.locate()
    }

    /// Identifier of the current delegate.
    pub fn delegate_id(&self) -> StoreId {
        self.with_store(|store| store.id())
    }

    fn with_store<R>(&self, f: impl FnOnce(&dyn MetadataStore<H>) -> R) -> R {
        let store = self.resolve();
        let guard = store.borrow();
        f(&*guard)
    }

    fn with_store_mut<R>(&mut self, f: impl FnOnce(&mut dyn MetadataStore<H>) -> R) -> R {
        let store = self.resolve();
        let mut guard = store.borrow_mut();
        f(&mut *guard)
    }
}

impl<H: Handle> MetadataStore<H> for StoreProxy<H> {
    fn id(&self) -> StoreId {
        self.id
    }

    fn content_id(&self) -> StoreId {
        self.with_store(|store| store.content_id())
    }

    fn options(&self) -> StoreOptions {
        self.with_store(|store| store.options())
    }

    fn put_facet(&mut self, handle: H, value: FacetRef) -> Result<Vec<FacetKind>, StoreError> {
        self.with_store_mut(|store| store.put_facet(handle, value))
    }

    fn put_facet_as(
        &mut self,
        handle: H,
        value: FacetRef,
        kind: FacetKind,
    ) -> Result<(), StoreError> {
        self.with_store_mut(|store| store.put_facet_as(handle, value, kind))
    }

    fn has_facet(&self, handle: &H, kind: FacetKind) -> Result<bool, StoreError> {
        self.with_store(|store| store.has_facet(handle, kind))
    }

    fn get_facet(&self, handle: &H, kind: FacetKind) -> Result<FacetRef, StoreError> {
        self.with_store(|store| store.get_facet(handle, kind))
    }

    fn remove_facets(&mut self, handle: &H) {
        self.with_store_mut(|store| store.remove_facets(handle))
    }

    fn remove_facet(&mut self, handle: &H, kind: FacetKind) -> Result<(), StoreError> {
        self.with_store_mut(|store| store.remove_facet(handle, kind))
    }

    fn handles(&self) -> HashSet<H> {
        self.with_store(|store| store.handles())
    }

    fn facets_of(&self, handle: &H) -> Result<FacetMap, StoreError> {
        self.with_store(|store| store.facets_of(handle))
    }

    fn clear(&mut self) {
        self.with_store_mut(|store| store.clear())
    }

    fn merge_from(&mut self, source: &dyn MetadataStore<H>) -> Result<(), StoreError> {
        // The source may resolve to our own delegate; read it before
        // borrowing the delegate mutably.
        let staged = DefaultMetadataStore::copy_of(source);
        self.with_store_mut(|store| store.merge_from(&staged))
    }
}

impl<H: Handle> fmt::Debug for StoreProxy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreProxy")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<H: Handle> PartialEq for StoreProxy<H> {
    fn eq(&self, other: &Self) -> bool {
        super::same_store(self, other)
    }
}

impl<H: Handle> Eq for StoreProxy<H> {}

impl<H: Handle> Hash for StoreProxy<H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::core::store::{same_store, MetadataStoreExt};
    use crate::test_support::{Author, Label, Tagged, TitleValue, Titled};

    fn fresh() -> SharedStore<&'static str> {
        share_store(DefaultMetadataStore::<&'static str>::new())
    }

    #[test]
    fn forwards_writes_and_reads() {
        let backing = fresh();
        let mut proxy = StoreProxy::fixed(Rc::clone(&backing));

        proxy.put("doc1", TitleValue::new("Report")).unwrap();

        assert!(backing.borrow().has_facet(&"doc1", FacetKind::of::<dyn Titled>()).unwrap());
        assert!(proxy.has::<dyn Titled>(&"doc1").unwrap());
        assert_eq!(proxy.handles(), HashSet::from(["doc1"]));
        assert_eq!(proxy.facets_of(&"doc1").unwrap().len(), 2);

        proxy.remove::<dyn Titled>(&"doc1").unwrap();
        proxy.remove_facets(&"doc1");
        assert!(backing.borrow().handles().is_empty());
    }

    #[test]
    fn forwards_errors() {
        let mut proxy = StoreProxy::fixed(fresh());

        let err = proxy.get::<dyn Tagged>(&"doc1").unwrap_err();
        assert!(matches!(err, StoreError::FacetNotFound { .. }));

        let err = proxy
            .put_facet_as("doc1", std::sync::Arc::new(Label("x")), FacetKind::of::<Label>())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidFacetKind { .. }));
    }

    #[test]
    fn resolves_on_every_call() {
        let first = fresh();
        let second = fresh();
        let calls = Rc::new(Cell::new(0usize));
        let use_second = Rc::new(Cell::new(false));

        let mut proxy = StoreProxy::new({
            let (first, second) = (Rc::clone(&first), Rc::clone(&second));
            let (calls, use_second) = (Rc::clone(&calls), Rc::clone(&use_second));
            move || {
                calls.set(calls.get() + 1);
                if use_second.get() {
                    Rc::clone(&second)
                } else {
                    Rc::clone(&first)
                }
            }
        });

        proxy.put("doc1", Label("first")).unwrap();
        use_second.set(true);
        proxy.put("doc2", Label("second")).unwrap();

        assert_eq!(first.borrow().handles(), HashSet::from(["doc1"]));
        assert_eq!(second.borrow().handles(), HashSet::from(["doc2"]));
        assert_eq!(proxy.handles(), HashSet::from(["doc2"]));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn keeps_own_identity() {
        let backing = fresh();
        let proxy = StoreProxy::fixed(Rc::clone(&backing));

        assert_ne!(proxy.id(), backing.borrow().id());
        assert_eq!(proxy.delegate_id(), backing.borrow().id());
        assert!(!same_store(&proxy, &*backing.borrow()));

        let other = StoreProxy::fixed(Rc::clone(&backing));
        assert_ne!(proxy, other);
    }

    #[test]
    fn content_id_follows_delegate() {
        let first = fresh();
        let second = fresh();
        let use_second = Rc::new(Cell::new(false));
        let proxy = StoreProxy::new({
            let (first, second) = (Rc::clone(&first), Rc::clone(&second));
            let use_second = Rc::clone(&use_second);
            move || {
                if use_second.get() {
                    Rc::clone(&second)
                } else {
                    Rc::clone(&first)
                }
            }
        });
        let outer = StoreProxy::fixed(share_store(proxy));

        assert_eq!(outer.content_id(), first.borrow().id());
        use_second.set(true);
        assert_eq!(outer.content_id(), second.borrow().id());
        assert_ne!(outer.id(), outer.content_id());
    }

    #[test]
    fn options_come_from_delegate() {
        let options = StoreOptions {
            unknown_handle: crate::core::store::UnknownHandlePolicy::Empty,
        };
        let proxy = StoreProxy::fixed(share_store(
            DefaultMetadataStore::<&'static str>::with_options(options),
        ));

        assert_eq!(proxy.options(), options);
        assert!(proxy.facets_of(&"ghost").unwrap().is_empty());
    }

    #[test]
    fn merge_from_own_delegate() {
        let backing = fresh();
        let mut proxy = StoreProxy::fixed(Rc::clone(&backing));
        let mirror = StoreProxy::fixed(Rc::clone(&backing));
        proxy.put("doc1", Author::new("Ada")).unwrap();

        proxy.merge_from(&mirror).unwrap();

        assert_eq!(backing.borrow().handles(), HashSet::from(["doc1"]));
    }

    #[test]
    fn clear_forwards() {
        let backing = fresh();
        let mut proxy = StoreProxy::fixed(Rc::clone(&backing));
        proxy.put("doc1", Author::new("Ada")).unwrap();

        proxy.clear();

        assert!(backing.borrow().handles().is_empty());
    }

    #[test]
    fn debug_hides_locator() {
        let proxy = StoreProxy::fixed(fresh());
        let rendered = format!("{:?}", proxy);
        assert!(rendered.starts_with("StoreProxy"));
        assert!(rendered.contains("id"));
        assert!(rendered.ends_with(".. }"));
    }
}
