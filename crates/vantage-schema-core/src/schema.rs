// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resource schemas and the ordered schema catalog.
//!
//! An [`ApiSchema`] describes one resource kind: its identity, group/kind,
//! plural resource name, namespacing, the verbs the resource supports, and an
//! explicit block-list of HTTP operations that must never be offered even when
//! a grant would otherwise allow them. Filtering attaches the derived
//! [`Operation`] lists and the per-verb grant map to a clone of the schema.
//!
//! [`ApiSchemas`] is the catalog: insertion-ordered, with schema identity
//! enforced unique at registration time.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;

use crate::access::{AccessListByVerb, AccessSet, GroupResource, Verb};
use crate::error::{Result, SchemaError};

/// An HTTP-style operation derived for a schema.
///
/// Operations screened out by a schema's block-list stay present but tagged
/// [`Operation::Blocked`], so consumers can tell "not applicable" apart from
/// "explicitly denied".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
	Allowed(Method),
	Blocked(Method),
}

impl Operation {
	pub fn method(&self) -> &Method {
		match self {
			Operation::Allowed(m) | Operation::Blocked(m) => m,
		}
	}

	pub fn is_blocked(&self) -> bool {
		matches!(self, Operation::Blocked(_))
	}
}

/// One resource schema in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSchema {
	/// Unique identity within a catalog.
	pub id: String,
	pub group: String,
	pub kind: String,
	/// Plural resource name; empty for virtual (non-resource) schemas, which
	/// pass through filtering untouched.
	pub resource: String,
	/// Whether objects of this resource live inside namespaces.
	pub namespaced: bool,
	/// Verbs the resource supports; filtering only consults grants for these.
	pub verbs: Vec<Verb>,
	/// Explicit block-list of operations that are tagged rather than offered.
	pub disallowed: Vec<Method>,
	/// Operations permitted on a single object, derived by filtering.
	pub resource_methods: Vec<Operation>,
	/// Operations permitted on the collection, derived by filtering.
	pub collection_methods: Vec<Operation>,
	/// The per-verb grants that produced the derived operations.
	pub access: Option<AccessListByVerb>,
}

impl ApiSchema {
	pub fn new(
		id: impl Into<String>,
		group: impl Into<String>,
		kind: impl Into<String>,
		resource: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			group: group.into(),
			kind: kind.into(),
			resource: resource.into(),
			namespaced: false,
			verbs: Vec::new(),
			disallowed: Vec::new(),
			resource_methods: Vec::new(),
			collection_methods: Vec::new(),
			access: None,
		}
	}

	/// A virtual schema: no backing resource, never permission-gated.
	pub fn virtual_type(id: impl Into<String>, kind: impl Into<String>) -> Self {
		Self::new(id, "", kind, "")
	}

	/// Builder: set whether the resource is namespace-scoped.
	pub fn namespaced(mut self, namespaced: bool) -> Self {
		self.namespaced = namespaced;
		self
	}

	/// Builder: set the supported verbs.
	pub fn with_verbs(mut self, verbs: impl IntoIterator<Item = Verb>) -> Self {
		self.verbs = verbs.into_iter().collect();
		self
	}

	/// Builder: add an operation to the explicit block-list.
	pub fn disallow(mut self, method: Method) -> Self {
		self.disallowed.push(method);
		self
	}

	pub fn group_resource(&self) -> GroupResource {
		GroupResource::new(self.group.clone(), self.resource.clone())
	}

	/// Template scope key of the form `"group/kind"`.
	pub fn group_kind_key(&self) -> String {
		format!("{}/{}", self.group, self.kind)
	}

	pub fn is_virtual(&self) -> bool {
		self.resource.is_empty()
	}
}

/// An insertion-ordered catalog of schemas with unique identities.
///
/// A filtered catalog additionally carries the [`AccessSet`] that produced it,
/// so consumers can answer "may this principal do X on Y" without re-deriving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiSchemas {
	order: Vec<ApiSchema>,
	index: HashMap<String, usize>,
	access_set: Option<Arc<AccessSet>>,
}

impl ApiSchemas {
	/// Registers a schema, failing on identity collision.
	pub fn add_schema(&mut self, schema: ApiSchema) -> Result<()> {
		if self.index.contains_key(&schema.id) {
			return Err(SchemaError::DuplicateSchema { id: schema.id });
		}
		self.index.insert(schema.id.clone(), self.order.len());
		self.order.push(schema);
		Ok(())
	}

	/// Registers several schemas; the catalog is left with every schema added
	/// before the first collision.
	pub fn add_schemas(&mut self, schemas: impl IntoIterator<Item = ApiSchema>) -> Result<()> {
		for schema in schemas {
			self.add_schema(schema)?;
		}
		Ok(())
	}

	pub fn get(&self, id: &str) -> Option<&ApiSchema> {
		self.index.get(id).map(|&i| &self.order[i])
	}

	pub fn iter(&self) -> impl Iterator<Item = &ApiSchema> {
		self.order.iter()
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Attaches the decision set that produced this (filtered) catalog.
	pub fn attach_access_set(&mut self, access: Arc<AccessSet>) {
		self.access_set = Some(access);
	}

	pub fn access_set(&self) -> Option<&Arc<AccessSet>> {
		self.access_set.as_ref()
	}
}

impl IntoIterator for ApiSchemas {
	type Item = ApiSchema;
	type IntoIter = std::vec::IntoIter<ApiSchema>;

	fn into_iter(self) -> Self::IntoIter {
		self.order.into_iter()
	}
}
