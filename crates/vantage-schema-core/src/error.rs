// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the schema core.

use thiserror::Error;

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while building or filtering schema catalogs.
#[derive(Debug, Error)]
pub enum SchemaError {
	/// Two schemas with the same identity were registered into one catalog.
	/// This is a programming or configuration error, never a runtime
	/// access-control outcome.
	#[error("duplicate schema id: {id}")]
	DuplicateSchema { id: String },

	/// Unrecognized access-control verb string
	#[error("invalid verb: {0}")]
	InvalidVerb(String),
}
