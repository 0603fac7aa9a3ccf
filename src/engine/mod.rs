//! engine
//!
//! Agents that mutate metadata stores, with optional rollback.
//!
//! # Architecture
//!
//! - [`agent`] - The agent contract and the single-action [`TransactionalAgent`]
//! - [`composite`] - Ordered, all-or-nothing composition of agents
//! - [`rollback`] - Snapshot and restore used by both
//!
//! # Invariants
//!
//! - A transactional agent that returns `false` or an error leaves the
//!   store with the content it had before `act` was called
//! - A composite agent stops at the first child that does not succeed
//! - Store identity is never changed by a rollback

pub mod agent;
pub mod composite;
pub mod rollback;

pub use agent::{AgentAction, AgentError, MetadataAgent, TransactionMode, TransactionalAgent};
pub use composite::{BoxedAgent, CompositeAgent};
pub use rollback::{run_transactional, RollbackError, Snapshot};
