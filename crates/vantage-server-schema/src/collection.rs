// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The schema collection: per-principal catalog resolution.
//!
//! [`SchemaCollection`] composes the pieces: it asks the external engine for
//! the principal's access decision set, purges any record cached for a
//! decision identity the principal no longer holds, serves a cache hit, or
//! computes the filtered and template-decorated catalog and caches it.
//!
//! The staleness purge runs before the cache lookup on every call, so a
//! principal can never observe a catalog computed for permissions they no
//! longer hold. Catalog computation happens under the read side of the
//! base/template lock and never under the cache mutex, so concurrent
//! resolutions for different principals do not serialize against each other.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use vantage_schema_core::{filter_schemas, AccessSet, ApiSchema, ApiSchemas};

use crate::cache::AccessCache;
use crate::catalog::{ServedCatalog, ServedSchema};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::lookup::{AccessSetLookup, UserInfo};
use crate::template::{Template, TemplateRegistry};

/// Serves access-filtered schema catalogs to authenticated principals.
pub struct SchemaCollection {
	base: RwLock<ApiSchemas>,
	templates: RwLock<TemplateRegistry>,
	cache: AccessCache,
	lookup: Arc<dyn AccessSetLookup>,
}

impl SchemaCollection {
	pub fn new(base: ApiSchemas, lookup: Arc<dyn AccessSetLookup>, config: CacheConfig) -> Self {
		Self {
			base: RwLock::new(base),
			templates: RwLock::new(TemplateRegistry::default()),
			cache: AccessCache::new(config.ttl),
			lookup,
		}
	}

	/// Resolves the catalog for a principal: cached when fresh, computed and
	/// cached otherwise. Errors from the decision engine or from catalog
	/// construction propagate; nothing is cached on failure.
	pub fn schemas_for(&self, user: &UserInfo) -> Result<Arc<ServedCatalog>> {
		let access = self.lookup.access_for(user)?;
		let id = access.id();

		if let Some(stale) = self.cache.remove_stale_for(&user.name, &id) {
			debug!(user = %user.name, stale_id = %stale, "purging stale schema record");
			// best-effort: engine-side cleanup must not block serving
			self.lookup.purge_user_data(&stale);
		}

		if let Some(catalog) = self.cache.get(&id) {
			debug!(user = %user.name, id = %id, "schema catalog cache hit");
			return Ok(catalog);
		}

		debug!(user = %user.name, id = %id, "computing schema catalog");
		let catalog = Arc::new(self.catalog_for_subject(&access)?);
		self.cache.put(id, &user.name, Arc::clone(&catalog));
		Ok(catalog)
	}

	/// Registers a schema into the base catalog. Intended for setup or rare
	/// catalog growth; takes the write lock.
	pub fn add_schema(&self, schema: ApiSchema) -> Result<()> {
		self.base.write().add_schema(schema)?;
		Ok(())
	}

	/// Registers a template under a scope key (schema id, `"group/kind"`, or
	/// `""` for wildcard). Intended for setup.
	pub fn add_template(&self, scope: impl Into<String>, template: Template) {
		self.templates.write().register(scope, template);
	}

	/// Drops whatever is cached for a principal and notifies the decision
	/// engine, best-effort.
	pub fn invalidate_user(&self, user: &UserInfo) {
		if let Some(id) = self.cache.invalidate(&user.name) {
			debug!(user = %user.name, id = %id, "invalidated schema record");
			self.lookup.purge_user_data(&id);
		}
	}

	/// Reaper entry point: drops expired records. Eviction is lazy; nothing
	/// else blocks on this running.
	pub fn purge_expired_records(&self) -> usize {
		self.cache.purge_expired()
	}

	fn catalog_for_subject(&self, access: &Arc<AccessSet>) -> Result<ServedCatalog> {
		let filtered = {
			let base = self.base.read();
			filter_schemas(&base, access)?
		};

		let templates = self.templates.read();
		let mut catalog = ServedCatalog::new(Arc::clone(access));
		for schema in filtered {
			catalog.push(templates.apply(ServedSchema::new(schema)));
		}
		Ok(catalog)
	}
}
