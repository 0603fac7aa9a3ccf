//! Snapshot and restore of metadata stores.
//!
//! This module provides the rollback mechanism used by:
//! - [`TransactionalAgent`](super::agent::TransactionalAgent) in transactional mode
//! - [`CompositeAgent`](super::composite::CompositeAgent), always
//!
//! # Snapshots
//!
//! A [`Snapshot`] is a content copy of a store that inherits the store's
//! identifier. Restoring clears the target and merges the snapshot back in.
//! A snapshot only restores the store it was taken from: the identifiers
//! must match. A snapshot also records the
//! [`content_id`](MetadataStore::content_id) of the store; for a proxy that
//! is the delegate's identifier, so a proxy whose delegate changed since the
//! capture is refused instead of having the wrong store overwritten.
//!
//! # Scope
//!
//! Only store content is rolled back. Anything else an action touches is
//! the action's own responsibility.

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::agent::AgentError;
use crate::core::store::{DefaultMetadataStore, MetadataStore, StoreError};
use crate::core::types::{Handle, StoreId};

/// Errors from rollback operations.
#[derive(Debug, Error)]
pub enum RollbackError {
    /// The snapshot was taken from a different store.
    #[error("snapshot of store {snapshot} cannot restore store {target}")]
    ForeignStore {
        /// Identifier carried by the snapshot.
        snapshot: StoreId,
        /// Identifier of the store being restored.
        target: StoreId,
    },

    /// The store now forwards to a different store than at capture time.
    #[error("store {store} now holds content of {current}, snapshot was of {captured}")]
    DelegateChanged {
        /// Store being restored.
        store: StoreId,
        /// Content identifier recorded by the snapshot.
        captured: StoreId,
        /// Content identifier of the store at restore time.
        current: StoreId,
    },

    /// Writing the snapshot content back failed.
    #[error("failed to restore store {store}: {source}")]
    Restore {
        /// Store being restored.
        store: StoreId,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Content copy of a store, taken before a mutation.
#[derive(Debug, Clone)]
pub struct Snapshot<H: Handle> {
    content: DefaultMetadataStore<H>,
    content_id: StoreId,
}

impl<H: Handle> Snapshot<H> {
    /// Copy the current content of `store`.
    pub fn capture<S: MetadataStore<H> + ?Sized>(store: &S) -> Self {
        let content = DefaultMetadataStore::copy_of(store);
        let content_id = store.content_id();
        trace!(
            store = %content.id().short(),
            content = %content_id.short(),
            handles = content.len(),
            "captured snapshot"
        );
        Self {
            content,
            content_id,
        }
    }

    /// Identifier of the store the snapshot was taken from.
    pub fn id(&self) -> StoreId {
        self.content.id()
    }

    /// Identifier of the store that held the content at capture time.
    pub fn content_id(&self) -> StoreId {
        self.content_id
    }

    /// The captured content.
    pub fn content(&self) -> &DefaultMetadataStore<H> {
        &self.content
    }

    /// Replace the content of `target` with the snapshot.
    ///
    /// # Errors
    ///
    /// - [`RollbackError::ForeignStore`] if `target` is not the snapshotted store
    /// - [`RollbackError::DelegateChanged`] if `target` forwards elsewhere now
    /// - [`RollbackError::Restore`] if the content cannot be written back
    pub fn restore<S>(&self, target: &mut S) -> Result<(), RollbackError>
    where
        S: MetadataStore<H> + ?Sized,
    {
        if target.id() != self.id() {
            return Err(RollbackError::ForeignStore {
                snapshot: self.id(),
                target: target.id(),
            });
        }
        let current = target.content_id();
        if current != self.content_id {
            return Err(RollbackError::DelegateChanged {
                store: self.id(),
                captured: self.content_id,
                current,
            });
        }

        target.clear();
        target
            .merge_from(&self.content)
            .map_err(|source| RollbackError::Restore {
                store: self.id(),
                source,
            })?;

        debug!(store = %self.id().short(), handles = self.content.len(), "restored snapshot");
        Ok(())
    }
}

/// Run `body` against `store`, restoring the store unless it succeeds.
///
/// - `Ok(true)`: the mutation is kept
/// - `Ok(false)`: the store is restored and `Ok(false)` returned
/// - `Err(e)`: the store is restored and `e` returned
///
/// If restoring fails, the rollback error is returned instead.
pub fn run_transactional<H, S, F>(store: &mut S, body: F) -> Result<bool, AgentError>
where
    H: Handle,
    S: MetadataStore<H> + ?Sized,
    F: FnOnce(&mut S) -> Result<bool, AgentError>,
{
    let snapshot = Snapshot::capture(&*store);

    match body(&mut *store) {
        Ok(true) => Ok(true),
        Ok(false) => {
            snapshot.restore(store)?;
            debug!(store = %snapshot.id().short(), "transaction rolled back");
            Ok(false)
        }
        Err(err) => {
            warn!(store = %snapshot.id().short(), error = %err, "transaction failed, rolling back");
            snapshot.restore(store)?;
            Err(err)
        }
    }
}
