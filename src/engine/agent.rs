//! engine::agent
//!
//! Agents: units of work that mutate a metadata store.
//!
//! # Architecture
//!
//! [`MetadataAgent`] is what callers invoke: `act(store, context)` returns
//! whether the work succeeded. [`AgentAction`] is the inner mutation logic a
//! concrete agent supplies; closures implement it directly.
//! [`TransactionalAgent`] joins the two and decides, by its
//! [`TransactionMode`], whether the store is snapshotted around the action.
//!
//! The context is a value meaningful to the concrete agent, typically the
//! handle being processed. It is unrelated to the store's own handles.
//!
//! # Single writer
//!
//! An agent expects exclusive access to the store for the duration of
//! `act`. Nothing here locks; running two agents against the same store at
//! once is not supported, whether or not they are transactional.
//!
//! # Example
//!
//! ```
//! use facetwork::core::facet::Facet;
//! use facetwork::core::store::{DefaultMetadataStore, MetadataStore, MetadataStoreExt};
//! use facetwork::engine::agent::{AgentError, MetadataAgent, TransactionalAgent};
//! use facetwork::{capability, facet_value};
//!
//! pub trait Reviewed: Facet {}
//! capability!(Reviewed);
//!
//! #[derive(Debug)]
//! pub struct Review;
//! impl Reviewed for Review {}
//! facet_value!(Review: Reviewed);
//!
//! let review = TransactionalAgent::transactional(
//!     |store: &mut dyn MetadataStore<&'static str>, doc: &&'static str| {
//!         store.put(*doc, Review)?;
//!         Ok::<_, AgentError>(doc.starts_with("approved"))
//!     },
//! );
//!
//! let mut store = DefaultMetadataStore::<&'static str>::new();
//! assert!(review.act(&mut store, &"approved-1").unwrap());
//! assert!(!review.act(&mut store, &"draft-2").unwrap());
//!
//! // The failed review left no trace.
//! assert_eq!(store.len(), 1);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::rollback::{run_transactional, RollbackError};
use crate::core::config::Config;
use crate::core::store::{MetadataStore, StoreError};
use crate::core::types::Handle;

/// Errors raised while an agent acts.
///
/// A `false` outcome is not an error; these are failures of the machinery
/// or of the action itself.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A store operation inside the action failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The action gave up with its own reason.
    #[error("agent aborted: {0}")]
    Aborted(String),

    /// The store could not be restored after a failed action.
    #[error("rollback failed: {0}")]
    Rollback(#[from] RollbackError),
}

/// A unit of work on a metadata store.
pub trait MetadataAgent<H: Handle, C: ?Sized> {
    /// Perform the work, returning whether it succeeded.
    ///
    /// # Errors
    ///
    /// Whatever the action raises, plus [`AgentError::Rollback`] when a
    /// transactional agent cannot restore the store.
    fn act(&self, store: &mut dyn MetadataStore<H>, context: &C) -> Result<bool, AgentError>;
}

/// Inner mutation logic of an agent.
pub trait AgentAction<H: Handle, C: ?Sized> {
    /// Mutate the store, returning whether the mutation should be kept.
    fn apply(&self, store: &mut dyn MetadataStore<H>, context: &C) -> Result<bool, AgentError>;
}

impl<H, C, F> AgentAction<H, C> for F
where
    H: Handle,
    C: ?Sized,
    F: Fn(&mut dyn MetadataStore<H>, &C) -> Result<bool, AgentError>,
{
    fn apply(&self, store: &mut dyn MetadataStore<H>, context: &C) -> Result<bool, AgentError> {
        self(store, context)
    }
}

/// Whether an agent snapshots the store around its action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionMode {
    /// Run the action on the store as is.
    Direct,
    /// Restore the store if the action fails or errors.
    #[default]
    Transactional,
}

impl TransactionMode {
    /// Whether this mode rolls back.
    pub fn is_transactional(&self) -> bool {
        matches!(self, TransactionMode::Transactional)
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionMode::Direct => write!(f, "direct"),
            TransactionMode::Transactional => write!(f, "transactional"),
        }
    }
}

/// An action paired with a transaction mode.
pub struct TransactionalAgent<A> {
    action: A,
    mode: TransactionMode,
}

impl<A> TransactionalAgent<A> {
    /// Wrap an action with an explicit mode.
    pub fn with_mode(action: A, mode: TransactionMode) -> Self {
        Self { action, mode }
    }

    /// Wrap an action that runs without a snapshot.
    pub fn direct(action: A) -> Self {
        Self::with_mode(action, TransactionMode::Direct)
    }

    /// Wrap an action that is rolled back unless it succeeds.
    pub fn transactional(action: A) -> Self {
        Self::with_mode(action, TransactionMode::Transactional)
    }

    /// Wrap an action using the configured default mode.
    pub fn configured(action: A, config: &Config) -> Self {
        Self::with_mode(action, config.agent_mode())
    }

    /// Build from a closure, inferring its signature.
    pub fn from_fn<H, C>(action: A, mode: TransactionMode) -> Self
    where
        H: Handle,
        C: ?Sized,
        A: Fn(&mut dyn MetadataStore<H>, &C) -> Result<bool, AgentError>,
    {
        Self::with_mode(action, mode)
    }

    /// The configured mode.
    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    /// The wrapped action.
    pub fn action(&self) -> &A {
        &self.action
    }
}

impl<A> fmt::Debug for TransactionalAgent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionalAgent")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<H, C, A> MetadataAgent<H, C> for TransactionalAgent<A>
where
    H: Handle,
    C: ?Sized,
    A: AgentAction<H, C>,
{
    fn act(&self, store: &mut dyn MetadataStore<H>, context: &C) -> Result<bool, AgentError> {
        trace!(store = %store.id().short(), mode = %self.mode, "agent acting");

        match self.mode {
            TransactionMode::Direct => self.action.apply(store, context),
            TransactionMode::Transactional => {
                run_transactional(store, |store| self.action.apply(store, context))
            }
        }
    }
}
