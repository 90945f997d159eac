// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cache TTL configuration.
//!
//! A single non-negative integer (hours) controls how long a cached catalog
//! lives. The value is read once at process start and injected into the
//! collection; there is no runtime-mutable global. A malformed override is a
//! configuration error that is logged and ignored, never fatal.

use std::time::Duration;

use tracing::warn;

/// Environment variable overriding the cache TTL, in hours.
pub const CACHE_TTL_ENV: &str = "VANTAGE_SCHEMA_CACHE_TTL_HOURS";

/// Default cache record lifetime: 90 days.
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 2160;

/// Immutable cache configuration, fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
	/// Absolute lifetime of a cache record, from creation (not sliding).
	pub ttl: Duration,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self::from_hours(DEFAULT_CACHE_TTL_HOURS)
	}
}

impl CacheConfig {
	pub fn new(ttl: Duration) -> Self {
		Self { ttl }
	}

	pub fn from_hours(hours: u64) -> Self {
		// saturate so an absurdly large override cannot crash the process
		Self {
			ttl: Duration::from_secs(hours.saturating_mul(3600)),
		}
	}

	/// Reads the TTL override from the environment, falling back to the
	/// default on absence or a malformed value.
	pub fn from_env() -> Self {
		let value = std::env::var(CACHE_TTL_ENV).ok().filter(|s| !s.is_empty());
		Self::from_override(value.as_deref())
	}

	fn from_override(value: Option<&str>) -> Self {
		match value {
			None => Self::default(),
			Some(raw) => match raw.parse::<u64>() {
				Ok(hours) => Self::from_hours(hours),
				Err(_) => {
					warn!(
						key = CACHE_TTL_ENV,
						value = raw,
						default_hours = DEFAULT_CACHE_TTL_HOURS,
						"invalid cache TTL override, using default"
					);
					Self::default()
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_is_ninety_days() {
		assert_eq!(
			CacheConfig::default().ttl,
			Duration::from_secs(2160 * 3600)
		);
	}

	#[test]
	fn absent_override_uses_default() {
		assert_eq!(CacheConfig::from_override(None), CacheConfig::default());
	}

	#[test]
	fn numeric_override_is_applied() {
		let config = CacheConfig::from_override(Some("12"));
		assert_eq!(config.ttl, Duration::from_secs(12 * 3600));
	}

	#[test]
	fn zero_override_is_valid() {
		let config = CacheConfig::from_override(Some("0"));
		assert_eq!(config.ttl, Duration::ZERO);
	}

	#[test]
	fn huge_override_saturates_instead_of_panicking() {
		let config = CacheConfig::from_override(Some("18446744073709551615"));
		assert_eq!(config.ttl, Duration::from_secs(u64::MAX));
	}

	#[test]
	fn malformed_override_falls_back_to_default() {
		for bad in ["ninety", "-1", "12h", ""] {
			assert_eq!(
				CacheConfig::from_override(Some(bad)),
				CacheConfig::default(),
				"override {bad:?} should fall back"
			);
		}
	}
}
