// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The served catalog: filtered schemas plus their template decoration.
//!
//! A [`ServedCatalog`] is immutable once built and shared behind an `Arc` by
//! the cache; every entry pairs the filtered [`ApiSchema`] with the formatter
//! and store the template layer resolved for it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vantage_schema_core::{AccessSet, ApiSchema, GroupResource, Verb};

use crate::template::{Formatter, Store};

/// One schema as served to a principal: the filtered schema plus behavior.
#[derive(Clone)]
pub struct ServedSchema {
	pub schema: ApiSchema,
	pub formatter: Option<Formatter>,
	pub store: Option<Arc<dyn Store>>,
}

impl ServedSchema {
	pub fn new(schema: ApiSchema) -> Self {
		Self {
			schema,
			formatter: None,
			store: None,
		}
	}
}

impl fmt::Debug for ServedSchema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServedSchema")
			.field("schema", &self.schema.id)
			.field("formatter", &self.formatter.is_some())
			.field("store", &self.store.as_ref().map(|s| s.name().to_string()))
			.finish()
	}
}

/// The catalog one access decision is allowed to see.
pub struct ServedCatalog {
	entries: Vec<ServedSchema>,
	index: HashMap<String, usize>,
	access_set: Arc<AccessSet>,
}

impl ServedCatalog {
	pub fn new(access_set: Arc<AccessSet>) -> Self {
		Self {
			entries: Vec::new(),
			index: HashMap::new(),
			access_set,
		}
	}

	/// Appends an entry. Identity uniqueness is guaranteed upstream by the
	/// filtered `ApiSchemas` this catalog is built from.
	pub fn push(&mut self, served: ServedSchema) {
		self.index.insert(served.schema.id.clone(), self.entries.len());
		self.entries.push(served);
	}

	pub fn get(&self, id: &str) -> Option<&ServedSchema> {
		self.index.get(id).map(|&i| &self.entries[i])
	}

	pub fn iter(&self) -> impl Iterator<Item = &ServedSchema> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The decision set this catalog was computed for.
	pub fn access_set(&self) -> &Arc<AccessSet> {
		&self.access_set
	}

	/// Answers "may this principal perform `verb` on this object" without
	/// re-deriving anything, via the attached decision set.
	pub fn permits(
		&self,
		verb: Verb,
		gr: &GroupResource,
		namespace: Option<&str>,
		name: &str,
	) -> bool {
		self
			.access_set
			.access_list_for(verb, gr)
			.iter()
			.any(|a| a.grants(namespace, name))
	}
}

impl fmt::Debug for ServedCatalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServedCatalog")
			.field("entries", &self.entries.len())
			.field("access_set", &self.access_set.id())
			.finish()
	}
}
