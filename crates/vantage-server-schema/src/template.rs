// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered schema decoration.
//!
//! Templates supply the behavior a bare filtered schema lacks: a response
//! formatter, a storage back-end, and an optional customization hook. They
//! are registered once at startup against a scope key and merged onto each
//! served schema most-specific first:
//!
//! 1. exact schema identity
//! 2. `"group/kind"`
//! 3. `""` (wildcard, applies to all)
//!
//! Within that walk a formatter encountered later chains in front of the one
//! already set, a store is assigned exactly once (first supplier wins), and
//! every matching customization hook runs regardless of what is already set.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::catalog::ServedSchema;

/// A response formatter: a composable transform over a rendered value.
#[derive(Clone)]
pub struct Formatter {
	f: Arc<dyn Fn(&mut serde_json::Value) + Send + Sync>,
}

impl Formatter {
	pub fn new(f: impl Fn(&mut serde_json::Value) + Send + Sync + 'static) -> Self {
		Self { f: Arc::new(f) }
	}

	pub fn format(&self, value: &mut serde_json::Value) {
		(self.f)(value)
	}

	/// Composes two formatters; `first` runs before `second`.
	pub fn chain(first: Formatter, second: Formatter) -> Formatter {
		Formatter::new(move |value| {
			first.format(value);
			second.format(value);
		})
	}
}

impl fmt::Debug for Formatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Formatter")
	}
}

/// An opaque storage back-end capability referenced by templates.
pub trait Store: Send + Sync {
	fn name(&self) -> &str;
}

/// Builds a store derived from the process-wide default store (the wildcard
/// template's store, if any).
pub type StoreFactory = Arc<dyn Fn(Option<Arc<dyn Store>>) -> Arc<dyn Store> + Send + Sync>;

/// A pure customization hook: takes the served-schema draft and returns the
/// updated draft. Hooks never see shared mutable state.
pub type Customize = Arc<dyn Fn(ServedSchema) -> ServedSchema + Send + Sync>;

/// One override layer for schemas matching a scope.
#[derive(Clone, Default)]
pub struct Template {
	pub formatter: Option<Formatter>,
	pub store: Option<Arc<dyn Store>>,
	pub store_factory: Option<StoreFactory>,
	pub customize: Option<Customize>,
}

impl Template {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: set the formatter.
	pub fn with_formatter(mut self, formatter: Formatter) -> Self {
		self.formatter = Some(formatter);
		self
	}

	/// Builder: set a direct store handle.
	pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
		self.store = Some(store);
		self
	}

	/// Builder: set a store factory; takes precedence over a direct handle.
	pub fn with_store_factory(
		mut self,
		factory: impl Fn(Option<Arc<dyn Store>>) -> Arc<dyn Store> + Send + Sync + 'static,
	) -> Self {
		self.store_factory = Some(Arc::new(factory));
		self
	}

	/// Builder: set the customization hook.
	pub fn with_customize(
		mut self,
		customize: impl Fn(ServedSchema) -> ServedSchema + Send + Sync + 'static,
	) -> Self {
		self.customize = Some(Arc::new(customize));
		self
	}
}

impl fmt::Debug for Template {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Template")
			.field("formatter", &self.formatter.is_some())
			.field("store", &self.store.as_ref().map(|s| s.name().to_string()))
			.field("store_factory", &self.store_factory.is_some())
			.field("customize", &self.customize.is_some())
			.finish()
	}
}

/// All registered templates, keyed by scope.
///
/// Registered during setup and read-only afterwards; the collection guards it
/// with a reader/writer lock and holds the read side during computation.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
	templates: HashMap<String, Vec<Template>>,
}

impl TemplateRegistry {
	/// Registers a template under a scope key: a schema id, `"group/kind"`,
	/// or `""` for the wildcard scope.
	pub fn register(&mut self, scope: impl Into<String>, template: Template) {
		self.templates.entry(scope.into()).or_default().push(template);
	}

	/// The process-wide default store: the first wildcard template's store.
	pub fn default_store(&self) -> Option<Arc<dyn Store>> {
		self
			.templates
			.get("")
			.and_then(|templates| templates.first())
			.and_then(|t| t.store.clone())
	}

	/// Decorates one served schema with every matching template, most
	/// specific scope first.
	pub fn apply(&self, mut served: ServedSchema) -> ServedSchema {
		let scopes = [
			served.schema.id.clone(),
			served.schema.group_kind_key(),
			String::new(),
		];

		for scope in &scopes {
			let Some(templates) = self.templates.get(scope.as_str()) else {
				continue;
			};
			for template in templates {
				served.formatter = match (served.formatter.take(), template.formatter.clone()) {
					(None, next) => next,
					(existing @ Some(_), None) => existing,
					(Some(existing), Some(next)) => Some(Formatter::chain(next, existing)),
				};
				if served.store.is_none() {
					served.store = match &template.store_factory {
						Some(factory) => Some(factory(self.default_store())),
						None => template.store.clone(),
					};
				}
				if let Some(customize) = &template.customize {
					served = customize(served);
				}
			}
		}

		served
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use vantage_schema_core::ApiSchema;

	struct NamedStore(&'static str);

	impl Store for NamedStore {
		fn name(&self) -> &str {
			self.0
		}
	}

	fn deployment() -> ServedSchema {
		ServedSchema::new(ApiSchema::new(
			"deployment",
			"apps",
			"Deployment",
			"deployments",
		))
	}

	fn tag_formatter(tag: &'static str) -> Formatter {
		Formatter::new(move |value| {
			if let serde_json::Value::Array(items) = value {
				items.push(serde_json::json!(tag));
			}
		})
	}

	fn run(formatter: &Formatter) -> Vec<String> {
		let mut value = serde_json::json!([]);
		formatter.format(&mut value);
		value
			.as_array()
			.unwrap()
			.iter()
			.map(|v| v.as_str().unwrap().to_string())
			.collect()
	}

	#[test]
	fn wildcard_template_applies_to_everything() {
		let mut registry = TemplateRegistry::default();
		registry.register(
			"",
			Template::new()
				.with_formatter(tag_formatter("wild"))
				.with_store(Arc::new(NamedStore("default"))),
		);

		let served = registry.apply(deployment());
		assert_eq!(run(served.formatter.as_ref().unwrap()), ["wild"]);
		assert_eq!(served.store.unwrap().name(), "default");
	}

	#[test]
	fn exact_scope_wins_the_store() {
		let mut registry = TemplateRegistry::default();
		registry.register("", Template::new().with_store(Arc::new(NamedStore("default"))));
		registry.register(
			"deployment",
			Template::new().with_store(Arc::new(NamedStore("exact"))),
		);

		let served = registry.apply(deployment());
		assert_eq!(served.store.unwrap().name(), "exact");
	}

	#[test]
	fn group_kind_scope_matches_between_exact_and_wildcard() {
		let mut registry = TemplateRegistry::default();
		registry.register(
			"apps/Deployment",
			Template::new().with_store(Arc::new(NamedStore("group-kind"))),
		);
		registry.register("", Template::new().with_store(Arc::new(NamedStore("default"))));

		let served = registry.apply(deployment());
		assert_eq!(served.store.unwrap().name(), "group-kind");
	}

	#[test]
	fn later_formatters_chain_in_front_of_earlier_ones() {
		let mut registry = TemplateRegistry::default();
		registry.register("deployment", Template::new().with_formatter(tag_formatter("exact")));
		registry.register("", Template::new().with_formatter(tag_formatter("wild")));

		let served = registry.apply(deployment());
		assert_eq!(run(served.formatter.as_ref().unwrap()), ["wild", "exact"]);
	}

	#[test]
	fn store_factory_receives_the_default_store() {
		let mut registry = TemplateRegistry::default();
		registry.register("", Template::new().with_store(Arc::new(NamedStore("default"))));
		registry.register(
			"deployment",
			Template::new().with_store_factory(|default| {
				assert_eq!(default.unwrap().name(), "default");
				Arc::new(NamedStore("derived"))
			}),
		);

		let served = registry.apply(deployment());
		assert_eq!(served.store.unwrap().name(), "derived");
	}

	#[test]
	fn customize_runs_for_every_matching_template() {
		let count = Arc::new(AtomicUsize::new(0));
		let mut registry = TemplateRegistry::default();
		for scope in ["deployment", "apps/Deployment", ""] {
			let count = Arc::clone(&count);
			registry.register(
				scope,
				Template::new().with_customize(move |served| {
					count.fetch_add(1, Ordering::SeqCst);
					served
				}),
			);
		}

		registry.apply(deployment());
		assert_eq!(count.load(Ordering::SeqCst), 3);
	}

	#[test]
	fn customize_can_rewrite_the_draft() {
		let mut registry = TemplateRegistry::default();
		registry.register(
			"deployment",
			Template::new().with_customize(|mut served| {
				served.schema.kind = "RenamedDeployment".to_string();
				served
			}),
		);

		let served = registry.apply(deployment());
		assert_eq!(served.schema.kind, "RenamedDeployment");
	}
}
