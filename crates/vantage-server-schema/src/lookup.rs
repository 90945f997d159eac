// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boundary to the external access-decision engine.
//!
//! The engine owns the computation of effective permissions; the schema layer
//! only consumes the resulting [`AccessSet`] and notifies the engine when it
//! drops per-identity cache state.

use std::sync::Arc;

use vantage_schema_core::{AccessSet, AccessSetId};

use crate::error::Result;

/// An authenticated principal requesting a schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserInfo {
	/// Stable identifier for the principal (user name).
	pub name: String,
}

impl UserInfo {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

/// Resolves principals to access decision sets.
///
/// `access_for` must be deterministic: identical effective permissions must
/// yield sets with identical [`AccessSet::id`], or cached catalogs cannot be
/// shared. Failures propagate untouched to the caller; the collection caches
/// nothing on failure.
///
/// `purge_user_data` is the best-effort eviction callback: invoked
/// synchronously when the collection drops a stale record, but its outcome
/// never blocks serving a fresh catalog. Implementations should log their own
/// failures rather than panic.
pub trait AccessSetLookup: Send + Sync {
	fn access_for(&self, user: &UserInfo) -> Result<Arc<AccessSet>>;

	fn purge_user_data(&self, id: &AccessSetId);
}
