// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the schema collection.

use thiserror::Error;
use vantage_schema_core::SchemaError;

/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Errors that can occur while resolving a principal's schema catalog.
///
/// A failed computation is never cached; the caller sees the error and the
/// next request recomputes from scratch.
#[derive(Debug, Error)]
pub enum CollectionError {
	/// Catalog construction failed (duplicate identity, malformed schema).
	#[error(transparent)]
	Schema(#[from] SchemaError),

	/// The external access-decision engine could not resolve the principal.
	#[error("access lookup failed for {user}: {message}")]
	AccessLookup { user: String, message: String },
}

impl CollectionError {
	pub fn access_lookup(user: impl Into<String>, message: impl Into<String>) -> Self {
		CollectionError::AccessLookup {
			user: user.into(),
			message: message.into(),
		}
	}
}
