// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Decision-identity keyed catalog cache.
//!
//! Three indexes held in lockstep under one mutex:
//!
//! - `records`: decision id → cached catalog with its absolute expiry
//! - `users`: principal → the single decision id currently cached for them
//! - `expiries`: decision id → expiry metadata for the background reaper
//!
//! A record exists in `records` iff it has a matching `expiries` entry. The
//! `users` index enforces at most one record per principal: when a
//! principal's decision identity changes, the record cached under the old
//! identity is purged before the new one is written, which bounds cache
//! growth under permission churn without a full scan.
//!
//! Expiry is absolute from creation (no refresh on read) and lazy: expired
//! records are dropped on the next access or by [`AccessCache::purge_expired`].
//! The mutex is only ever held for in-memory map operations; callers compute
//! catalogs outside of it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use vantage_schema_core::AccessSetId;

use crate::catalog::ServedCatalog;

#[derive(Debug)]
struct CacheRecord {
	catalog: Arc<ServedCatalog>,
	expires_at: Instant,
}

#[derive(Debug)]
struct ExpiryRecord {
	expires_at: Instant,
	user: String,
}

#[derive(Debug, Default)]
struct Indexes {
	records: HashMap<AccessSetId, CacheRecord>,
	users: HashMap<String, AccessSetId>,
	expiries: HashMap<AccessSetId, ExpiryRecord>,
}

impl Indexes {
	fn purge(&mut self, id: &AccessSetId) -> bool {
		let existed = self.records.remove(id).is_some();
		self.expiries.remove(id);
		self.users.retain(|_, cached| cached != id);
		existed
	}
}

/// The access-filtered catalog cache.
#[derive(Debug)]
pub struct AccessCache {
	ttl: Duration,
	inner: Mutex<Indexes>,
}

impl AccessCache {
	pub fn new(ttl: Duration) -> Self {
		Self {
			ttl,
			inner: Mutex::new(Indexes::default()),
		}
	}

	/// Returns the cached catalog for a decision identity, lazily dropping it
	/// when expired. Reads never extend a record's lifetime.
	pub fn get(&self, id: &AccessSetId) -> Option<Arc<ServedCatalog>> {
		let mut inner = self.inner.lock();
		let expired = match inner.records.get(id) {
			Some(record) if record.expires_at > Instant::now() => {
				return Some(Arc::clone(&record.catalog));
			}
			Some(_) => true,
			None => false,
		};
		if expired {
			inner.purge(id);
		}
		None
	}

	/// Stores a catalog for a decision identity on behalf of a principal,
	/// updating all three indexes together.
	pub fn put(&self, id: AccessSetId, user: &str, catalog: Arc<ServedCatalog>) {
		let expires_at = Instant::now() + self.ttl;
		let mut inner = self.inner.lock();
		inner.records.insert(
			id.clone(),
			CacheRecord {
				catalog,
				expires_at,
			},
		);
		inner.expiries.insert(
			id.clone(),
			ExpiryRecord {
				expires_at,
				user: user.to_string(),
			},
		);
		inner.users.insert(user.to_string(), id);
	}

	/// The staleness check: if the principal has a cached record under a
	/// decision identity other than `current`, purges it and returns the
	/// stale identity so the caller can notify the decision engine.
	pub fn remove_stale_for(&self, user: &str, current: &AccessSetId) -> Option<AccessSetId> {
		let mut inner = self.inner.lock();
		match inner.users.get(user) {
			Some(cached) if cached != current => {
				let stale = cached.clone();
				inner.purge(&stale);
				Some(stale)
			}
			_ => None,
		}
	}

	/// Drops whatever is cached for a principal, returning the purged
	/// decision identity.
	pub fn invalidate(&self, user: &str) -> Option<AccessSetId> {
		let mut inner = self.inner.lock();
		let id = inner.users.get(user).cloned()?;
		inner.purge(&id);
		Some(id)
	}

	/// Removes a record by decision identity before its expiry.
	pub fn purge(&self, id: &AccessSetId) -> bool {
		self.inner.lock().purge(id)
	}

	/// Reaper sweep: drops every expired record, returning how many were
	/// removed. Cheap enough to run from a periodic background task.
	pub fn purge_expired(&self) -> usize {
		let now = Instant::now();
		let mut inner = self.inner.lock();
		let expired: Vec<AccessSetId> = inner
			.expiries
			.iter()
			.filter(|(_, record)| record.expires_at <= now)
			.map(|(id, _)| id.clone())
			.collect();
		for id in &expired {
			inner.purge(id);
		}
		expired.len()
	}

	/// The decision identity currently cached for a principal, if any.
	pub fn cached_id_for(&self, user: &str) -> Option<AccessSetId> {
		self.inner.lock().users.get(user).cloned()
	}

	/// Number of live records.
	pub fn len(&self) -> usize {
		self.inner.lock().records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.lock().records.is_empty()
	}

	/// The principal an expiry record is attributed to; reaper diagnostics.
	pub fn expiry_user(&self, id: &AccessSetId) -> Option<String> {
		self
			.inner
			.lock()
			.expiries
			.get(id)
			.map(|record| record.user.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use vantage_schema_core::{Access, AccessSet, GroupResource, Verb};

	fn access_set(namespace: &str) -> Arc<AccessSet> {
		let mut set = AccessSet::default();
		set.add(
			Verb::Get,
			GroupResource::new("", "pods"),
			Access::in_namespace(namespace),
		);
		Arc::new(set)
	}

	fn catalog(set: &Arc<AccessSet>) -> Arc<ServedCatalog> {
		Arc::new(ServedCatalog::new(Arc::clone(set)))
	}

	fn cache() -> AccessCache {
		AccessCache::new(Duration::from_secs(3600))
	}

	#[test]
	fn get_returns_the_stored_catalog() {
		let cache = cache();
		let set = access_set("team-a");
		let stored = catalog(&set);
		cache.put(set.id(), "jane", Arc::clone(&stored));

		let hit = cache.get(&set.id()).unwrap();
		assert!(Arc::ptr_eq(&hit, &stored));
		assert_eq!(cache.cached_id_for("jane"), Some(set.id()));
		assert_eq!(cache.expiry_user(&set.id()), Some("jane".to_string()));
	}

	#[test]
	fn zero_ttl_records_expire_immediately() {
		let cache = AccessCache::new(Duration::ZERO);
		let set = access_set("team-a");
		cache.put(set.id(), "jane", catalog(&set));

		assert!(cache.get(&set.id()).is_none());
		// the lazy expiry dropped every index entry
		assert!(cache.is_empty());
		assert!(cache.cached_id_for("jane").is_none());
		assert!(cache.expiry_user(&set.id()).is_none());
	}

	#[test]
	fn remove_stale_for_purges_only_on_identity_change() {
		let cache = cache();
		let old = access_set("team-a");
		let new = access_set("team-b");
		cache.put(old.id(), "jane", catalog(&old));

		// same identity: nothing to do
		assert_eq!(cache.remove_stale_for("jane", &old.id()), None);
		assert_eq!(cache.len(), 1);

		// changed identity: the old record goes away entirely
		assert_eq!(cache.remove_stale_for("jane", &new.id()), Some(old.id()));
		assert!(cache.get(&old.id()).is_none());
		assert!(cache.cached_id_for("jane").is_none());
		assert!(cache.is_empty());
	}

	#[test]
	fn purge_drops_user_entries_pointing_at_the_record() {
		let cache = cache();
		let shared = access_set("team-a");
		cache.put(shared.id(), "jane", catalog(&shared));
		cache.put(shared.id(), "joe", catalog(&shared));

		assert!(cache.purge(&shared.id()));
		assert!(cache.cached_id_for("jane").is_none());
		assert!(cache.cached_id_for("joe").is_none());
		assert!(!cache.purge(&shared.id()));
	}

	#[test]
	fn invalidate_by_user() {
		let cache = cache();
		let set = access_set("team-a");
		cache.put(set.id(), "jane", catalog(&set));

		assert_eq!(cache.invalidate("jane"), Some(set.id()));
		assert!(cache.is_empty());
		assert_eq!(cache.invalidate("jane"), None);
	}

	#[test]
	fn purge_expired_sweeps_only_expired_records() {
		let expiring = AccessCache::new(Duration::ZERO);
		let a = access_set("team-a");
		let b = access_set("team-b");
		expiring.put(a.id(), "jane", catalog(&a));
		expiring.put(b.id(), "joe", catalog(&b));
		assert_eq!(expiring.purge_expired(), 2);
		assert!(expiring.is_empty());

		let fresh = cache();
		let c = access_set("team-c");
		fresh.put(c.id(), "jo", catalog(&c));
		assert_eq!(fresh.purge_expired(), 0);
		assert_eq!(fresh.len(), 1);
	}
}
