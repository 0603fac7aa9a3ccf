//! core
//!
//! Core domain types and storage for facetwork.
//!
//! # Modules
//!
//! - [`types`] - Strong types: StoreId, Handle
//! - [`facet`] - Facet values, capability kinds and their hierarchy
//! - [`store`] - Metadata stores, store identity and proxies
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Only capability kinds can key a facet; this is checked on every call
//! - Store identity is an explicit value, not an address
//! - Reads hand out shared values, never borrows into the store

pub mod config;
pub mod facet;
pub mod store;
pub mod types;
