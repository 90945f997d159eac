// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-side schema collection for Vantage.
//!
//! This crate serves per-principal API schema catalogs: it resolves a
//! principal's access decision set through an external engine, filters the
//! base catalog down to what that decision set permits (via
//! `vantage-schema-core`), decorates each schema with templates (formatter,
//! store, customization hooks), and caches the result keyed by decision
//! identity with a per-principal staleness guarantee.
//!
//! # Architecture
//!
//! - `collection` - the [`SchemaCollection`] orchestrator and served catalog
//! - `cache` - decision-identity keyed cache with a one-record-per-principal
//!   index and TTL expiry
//! - `template` - layered schema decoration (exact > group/kind > wildcard)
//! - `lookup` - trait boundary to the external access-decision engine
//! - `config` - cache TTL configuration
//!
//! # Example
//!
//! ```ignore
//! use vantage_server_schema::{CacheConfig, SchemaCollection, UserInfo};
//!
//! let collection = SchemaCollection::new(base_catalog, engine, CacheConfig::from_env());
//! let catalog = collection.schemas_for(&UserInfo::new("jane"))?;
//! for served in catalog.iter() {
//!     println!("{}: {:?}", served.schema.id, served.schema.collection_methods);
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod lookup;
pub mod template;

pub use cache::AccessCache;
pub use catalog::{ServedCatalog, ServedSchema};
pub use collection::SchemaCollection;
pub use config::{CacheConfig, CACHE_TTL_ENV, DEFAULT_CACHE_TTL_HOURS};
pub use error::{CollectionError, Result};
pub use lookup::{AccessSetLookup, UserInfo};
pub use template::{Customize, Formatter, Store, StoreFactory, Template, TemplateRegistry};

// Re-export core types for convenience
pub use vantage_schema_core::*;
