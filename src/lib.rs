//! facetwork - typed metadata attached to arbitrary handles
//!
//! A metadata store associates handles (documents, nodes, any hashable key)
//! with facets: values stored under the capability they provide. Agents
//! mutate stores and may be rolled back when they fail.
//!
//! # Architecture
//!
//! - [`core`] - Facets, capability kinds, stores, configuration
//! - [`engine`] - Agents, composite agents, snapshot and rollback
//! - [`logging`] - `tracing` subscriber set-up
//!
//! # Correctness Invariants
//!
//! 1. A facet is only ever keyed by a capability kind
//! 2. Registering a value registers it under every capability it provides,
//!    ancestors included
//! 3. A handle exists in a store iff it has at least one facet
//! 4. Stores compare equal iff they share an identifier
//! 5. A failed transactional agent leaves no trace in the store
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
//! let title = store.get_as::<dyn Titled, TitleValue>(&"doc1").unwrap();
//! assert_eq!(title.text(), "Report");
//!
//! store.remove::<dyn Titled>(&"doc1").unwrap();
//! assert!(store.handles().is_empty());
//! ```

pub mod core;
pub mod engine;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_support;
