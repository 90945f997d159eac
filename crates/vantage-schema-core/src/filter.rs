// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The access filter: derives the catalog one principal is allowed to see.
//!
//! [`filter_schemas`] is a pure function over an immutable base catalog and a
//! principal's [`AccessSet`]. For every resource schema it collects the grants
//! per supported verb, trims grants that are invalid for the resource's scope,
//! derives the HTTP operations those grants authorize, and drops resources the
//! principal cannot touch at all. Schemas are cloned before any per-principal
//! state is attached; the base catalog is shared across all principals and is
//! never mutated here.
//!
//! # Policy decisions
//!
//! - A namespace-scoped grant on a cluster-scoped resource is invalid data and
//!   is discarded entirely rather than widened or narrowed.
//! - A principal with zero grants on the core `namespaces` resource still gets
//!   `get`/`watch` grants synthesized from the namespaces visible to them, and
//!   an authenticated principal with zero visible namespaces may still list
//!   namespaces (receiving an empty list, not a permission error).
//! - Operations on a schema's block-list stay in the derived lists tagged as
//!   blocked, so "explicitly denied" remains distinguishable from "absent".

use std::sync::Arc;

use http::Method;

use crate::access::{Access, AccessList, AccessListByVerb, AccessSet, Namespace, Verb};
use crate::error::Result;
use crate::schema::{ApiSchemas, Operation};

/// Produces the filtered catalog for one access decision set.
///
/// Fails only on catalog construction errors (duplicate schema identity); no
/// partial catalog is ever returned.
pub fn filter_schemas(base: &ApiSchemas, access: &Arc<AccessSet>) -> Result<ApiSchemas> {
	let mut result = ApiSchemas::default();

	for schema in base.iter() {
		if schema.is_virtual() {
			result.add_schema(schema.clone())?;
			continue;
		}

		let gr = schema.group_resource();
		let mut verb_access = AccessListByVerb::default();
		for verb in &schema.verbs {
			let mut list = access.access_list_for(*verb, &gr);
			if !schema.namespaced {
				// trim out bad data where a namespaced grant targets a
				// cluster-scoped resource
				list.retain(|a| a.namespace.is_all());
			}
			if !list.is_empty() {
				verb_access.insert(*verb, list);
			}
		}

		let mut always_list = false;
		if verb_access.is_empty() && gr.group.is_empty() && gr.resource == "namespaces" {
			let list: AccessList = access
				.namespaces()
				.into_iter()
				.map(|ns| Access {
					namespace: Namespace::All,
					resource_name: Some(ns),
				})
				.collect();
			if list.is_empty() {
				// an authenticated principal always sees a (possibly empty)
				// namespace list
				always_list = true;
			} else {
				verb_access.insert(Verb::Get, list.clone());
				verb_access.insert(Verb::Watch, list);
			}
		}

		let screen = |method: Method| {
			if schema.disallowed.contains(&method) {
				Operation::Blocked(method)
			} else {
				Operation::Allowed(method)
			}
		};

		let mut resource_methods = Vec::new();
		let mut collection_methods = Vec::new();
		if verb_access.any_verb(&[Verb::List, Verb::Get]) {
			resource_methods.push(screen(Method::GET));
			collection_methods.push(screen(Method::GET));
		}
		if verb_access.any_verb(&[Verb::Delete]) {
			resource_methods.push(screen(Method::DELETE));
		}
		if verb_access.any_verb(&[Verb::Update]) {
			resource_methods.push(screen(Method::PUT));
			resource_methods.push(screen(Method::PATCH));
		}
		if verb_access.any_verb(&[Verb::Create]) {
			collection_methods.push(screen(Method::POST));
		}
		if always_list {
			collection_methods.push(Operation::Allowed(Method::GET));
		}

		if resource_methods.is_empty() && collection_methods.is_empty() {
			continue;
		}

		let mut filtered = schema.clone();
		filtered.access = Some(verb_access);
		filtered.resource_methods = resource_methods;
		filtered.collection_methods = collection_methods;
		result.add_schema(filtered)?;
	}

	result.attach_access_set(Arc::clone(access));
	Ok(result)
}
