//! engine::composite
//!
//! Ordered composition of agents that succeeds or fails as a whole.
//!
//! # Architecture
//!
//! [`CompositeAgent`] runs its children in insertion order against one
//! store, inside a single snapshot. The first child returning `false` or an
//! error stops the sequence; the store is then restored to its state before
//! the composite began, undoing the effects of the children that already
//! succeeded. Children after the failing one never run.
//!
//! Children keep their own modes. A transactional child inside a composite
//! takes a nested snapshot, which is harmless: the outer snapshot still
//! covers everything.
//!
//! An empty composite succeeds without touching the store.

use std::fmt;

use tracing::debug;

use super::agent::{AgentError, MetadataAgent};
use super::rollback::run_transactional;
use crate::core::store::MetadataStore;
use crate::core::types::Handle;

/// Boxed child agent.
pub type BoxedAgent<H, C> = Box<dyn MetadataAgent<H, C>>;

/// Agents run in sequence, all or nothing.
pub struct CompositeAgent<H: Handle, C: ?Sized> {
    agents: Vec<BoxedAgent<H, C>>,
}

impl<H: Handle, C: ?Sized> CompositeAgent<H, C> {
    /// Create an empty composite.
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Append a child; it runs after every child already present.
    pub fn push<A>(&mut self, agent: A)
    where
        A: MetadataAgent<H, C> + 'static,
    {
        self.agents.push(Box::new(agent));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with<A>(mut self, agent: A) -> Self
    where
        A: MetadataAgent<H, C> + 'static,
    {
        self.push(agent);
        self
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl<H: Handle, C: ?Sized> Default for CompositeAgent<H, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle, C: ?Sized> FromIterator<BoxedAgent<H, C>> for CompositeAgent<H, C> {
    fn from_iter<I: IntoIterator<Item = BoxedAgent<H, C>>>(iter: I) -> Self {
        Self {
            agents: iter.into_iter().collect(),
        }
    }
}

impl<H: Handle, C: ?Sized> fmt::Debug for CompositeAgent<H, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeAgent")
            .field("agents", &self.agents.len())
            .finish()
    }
}

impl<H: Handle, C: ?Sized> MetadataAgent<H, C> for CompositeAgent<H, C> {
    fn act(&self, store: &mut dyn MetadataStore<H>, context: &C) -> Result<bool, AgentError> {
        let total = self.agents.len();

        run_transactional(store, |store| {
            for (index, agent) in self.agents.iter().enumerate() {
                match agent.act(store, context) {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!(
                            failed = index,
                            skipped = total - index - 1,
                            "composite agent stopped"
                        );
                        return Ok(false);
                    }
                    Err(err) => {
                        debug!(
                            failed = index,
                            skipped = total - index - 1,
                            error = %err,
                            "composite agent errored"
                        );
                        return Err(err);
                    }
                }
            }
            Ok(true)
        })
    }
}
