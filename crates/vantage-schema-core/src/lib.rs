// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Vantage schema discovery system.
//!
//! This crate provides the shared vocabulary for access-filtered API schema
//! catalogs: resource schemas, permission grants, and the pure filtering
//! algorithm that derives the operations a principal may perform. It is used
//! by the server-side schema collection (`vantage-server-schema`), which adds
//! caching and template decoration on top.
//!
//! # Design Principles
//!
//! 1. **Immutable evaluation**: the base catalog is never mutated; filtering
//!    clones schemas before attaching per-principal state
//! 2. **No I/O**: everything here is a pure function over pre-loaded data
//! 3. **Deterministic**: all per-verb and per-resource maps are ordered, so a
//!    fixed catalog and access set always produce an identical result
//!
//! # Example
//!
//! ```
//! use vantage_schema_core::{Access, AccessSet, ApiSchema, ApiSchemas, GroupResource, Verb};
//! use std::sync::Arc;
//!
//! let mut base = ApiSchemas::default();
//! base.add_schema(ApiSchema::new("pod", "", "Pod", "pods").namespaced(true).with_verbs([Verb::Get, Verb::List]))?;
//!
//! let mut access = AccessSet::default();
//! access.add(Verb::List, GroupResource::new("", "pods"), Access::in_namespace("team-a"));
//!
//! let filtered = vantage_schema_core::filter_schemas(&base, &Arc::new(access))?;
//! assert!(filtered.get("pod").is_some());
//! # Ok::<(), vantage_schema_core::SchemaError>(())
//! ```

pub mod access;
pub mod error;
pub mod filter;
pub mod schema;

pub use access::{
	Access, AccessList, AccessListByVerb, AccessSet, AccessSetId, GroupResource, Namespace, Verb,
};
pub use error::{Result, SchemaError};
pub use filter::filter_schemas;
pub use schema::{ApiSchema, ApiSchemas, Operation};
