// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-control grants and the per-principal decision set.
//!
//! An [`AccessSet`] is the precomputed result of evaluating a principal's
//! effective permissions: for each (verb, group/resource) pair it holds the
//! list of [`Access`] grants scoping that verb to namespaces and object names.
//! Two principals with identical effective permissions produce byte-identical
//! sets and therefore the same [`AccessSetId`], which is what makes filtered
//! catalogs shareable across principals.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SchemaError;

/// Access-control verbs, distinct from the HTTP operations they authorize.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
	Get,
	List,
	Watch,
	Create,
	Update,
	Delete,
	Patch,
}

impl Verb {
	pub fn as_str(&self) -> &'static str {
		match self {
			Verb::Get => "get",
			Verb::List => "list",
			Verb::Watch => "watch",
			Verb::Create => "create",
			Verb::Update => "update",
			Verb::Delete => "delete",
			Verb::Patch => "patch",
		}
	}
}

impl fmt::Display for Verb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Verb {
	type Err = SchemaError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"get" => Ok(Verb::Get),
			"list" => Ok(Verb::List),
			"watch" => Ok(Verb::Watch),
			"create" => Ok(Verb::Create),
			"update" => Ok(Verb::Update),
			"delete" => Ok(Verb::Delete),
			"patch" => Ok(Verb::Patch),
			other => Err(SchemaError::InvalidVerb(other.to_string())),
		}
	}
}

/// A namespace scope: either the cluster-wide marker or a named namespace.
///
/// The wire form of the cluster-wide marker is `"*"`.
#[derive(
	Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", from = "String")]
pub enum Namespace {
	All,
	Named(String),
}

impl Namespace {
	pub fn named(name: impl Into<String>) -> Self {
		Namespace::Named(name.into())
	}

	pub fn is_all(&self) -> bool {
		matches!(self, Namespace::All)
	}

	pub fn as_str(&self) -> &str {
		match self {
			Namespace::All => "*",
			Namespace::Named(name) => name,
		}
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for Namespace {
	fn from(s: String) -> Self {
		if s == "*" {
			Namespace::All
		} else {
			Namespace::Named(s)
		}
	}
}

impl From<Namespace> for String {
	fn from(ns: Namespace) -> Self {
		ns.as_str().to_string()
	}
}

/// A (group, resource) pair identifying one resource kind in the catalog.
#[derive(
	Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GroupResource {
	pub group: String,
	pub resource: String,
}

impl GroupResource {
	pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
		Self {
			group: group.into(),
			resource: resource.into(),
		}
	}
}

impl fmt::Display for GroupResource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.group.is_empty() {
			f.write_str(&self.resource)
		} else {
			write!(f, "{}.{}", self.resource, self.group)
		}
	}
}

/// One permission grant: a namespace scope plus an optional object-name scope.
///
/// `resource_name: None` grants the verb on every object of the resource.
#[derive(
	Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Access {
	pub namespace: Namespace,
	pub resource_name: Option<String>,
}

impl Access {
	/// A grant covering all namespaces and all object names.
	pub fn cluster_wide() -> Self {
		Self {
			namespace: Namespace::All,
			resource_name: None,
		}
	}

	/// A grant covering all object names within one namespace.
	pub fn in_namespace(namespace: impl Into<String>) -> Self {
		Self {
			namespace: Namespace::named(namespace),
			resource_name: None,
		}
	}

	/// A cluster-wide grant restricted to a single object name.
	pub fn named(resource_name: impl Into<String>) -> Self {
		Self {
			namespace: Namespace::All,
			resource_name: Some(resource_name.into()),
		}
	}

	/// Builder: restrict the grant to one object name.
	pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
		self.resource_name = Some(name.into());
		self
	}

	/// Returns true if this grant covers the given namespace and object name.
	pub fn grants(&self, namespace: Option<&str>, name: &str) -> bool {
		let ns_ok = match (&self.namespace, namespace) {
			(Namespace::All, _) => true,
			(Namespace::Named(granted), Some(requested)) => granted == requested,
			(Namespace::Named(_), None) => false,
		};
		let name_ok = match &self.resource_name {
			None => true,
			Some(granted) => granted == name,
		};
		ns_ok && name_ok
	}
}

/// An ordered list of grants for one verb on one resource.
pub type AccessList = Vec<Access>;

/// Grants grouped by verb, as attached to a filtered schema.
///
/// Backed by a `BTreeMap` so iteration order (and therefore the serialized
/// form) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListByVerb(BTreeMap<Verb, AccessList>);

impl AccessListByVerb {
	pub fn insert(&mut self, verb: Verb, list: AccessList) {
		self.0.insert(verb, list);
	}

	pub fn get(&self, verb: Verb) -> Option<&AccessList> {
		self.0.get(&verb)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if any of the given verbs has at least one grant.
	pub fn any_verb(&self, verbs: &[Verb]) -> bool {
		verbs
			.iter()
			.any(|v| self.0.get(v).is_some_and(|list| !list.is_empty()))
	}

	/// Returns true if any grant for the verb covers the namespace and name.
	pub fn grants(&self, verb: Verb, namespace: Option<&str>, name: &str) -> bool {
		self
			.0
			.get(&verb)
			.is_some_and(|list| list.iter().any(|a| a.grants(namespace, name)))
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Verb, &AccessList)> {
		self.0.iter()
	}
}

/// Stable identity of an [`AccessSet`], derived from its effective grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessSetId(String);

impl AccessSetId {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AccessSetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// The precomputed access decision set for one principal.
///
/// Built by the external access-decision engine; the schema layer only reads
/// it. Grant lists are kept sorted and deduplicated so that the identity in
/// [`AccessSet::id`] depends only on effective permissions, not on the order
/// the engine discovered them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessSet {
	grants: BTreeMap<GroupResource, AccessListByVerb>,
}

/// Wildcard resource name inside a grant key.
const RESOURCE_ALL: &str = "*";

impl AccessSet {
	/// Adds one grant for a verb on a group/resource.
	pub fn add(&mut self, verb: Verb, gr: GroupResource, access: Access) {
		let by_verb = self.grants.entry(gr).or_default();
		let list = by_verb.0.entry(verb).or_default();
		list.push(access);
		list.sort();
		list.dedup();
	}

	/// Returns every grant for the verb on the resource, including grants
	/// registered against the wildcard resource of the same group.
	pub fn access_list_for(&self, verb: Verb, gr: &GroupResource) -> AccessList {
		let mut result = AccessList::new();
		if let Some(by_verb) = self.grants.get(gr) {
			if let Some(list) = by_verb.get(verb) {
				result.extend(list.iter().cloned());
			}
		}
		if gr.resource != RESOURCE_ALL {
			let wildcard = GroupResource::new(gr.group.clone(), RESOURCE_ALL);
			if let Some(by_verb) = self.grants.get(&wildcard) {
				if let Some(list) = by_verb.get(verb) {
					result.extend(list.iter().cloned());
				}
			}
		}
		result.sort();
		result.dedup();
		result
	}

	/// Sorted, distinct namespaces visible to the principal: every named
	/// namespace appearing in any grant.
	pub fn namespaces(&self) -> Vec<String> {
		let mut set = BTreeSet::new();
		for by_verb in self.grants.values() {
			for (_, list) in by_verb.iter() {
				for access in list {
					if let Namespace::Named(name) = &access.namespace {
						set.insert(name.clone());
					}
				}
			}
		}
		set.into_iter().collect()
	}

	/// Deterministic identity over the ordered grant map.
	///
	/// Identical effective permissions always hash to the same id, which is
	/// the invariant the schema cache relies on for sharing.
	pub fn id(&self) -> AccessSetId {
		let mut hasher = Sha256::new();
		for (gr, by_verb) in &self.grants {
			hasher.update(gr.group.as_bytes());
			hasher.update([0]);
			hasher.update(gr.resource.as_bytes());
			hasher.update([0]);
			for (verb, list) in by_verb.iter() {
				hasher.update(verb.as_str().as_bytes());
				hasher.update([0]);
				for access in list {
					hasher.update(access.namespace.as_str().as_bytes());
					hasher.update([0]);
					hasher.update(access.resource_name.as_deref().unwrap_or(RESOURCE_ALL).as_bytes());
					hasher.update([0]);
				}
			}
		}
		AccessSetId(hex::encode(hasher.finalize()))
	}

	pub fn is_empty(&self) -> bool {
		self.grants.is_empty()
	}
}
