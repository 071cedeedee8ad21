/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Pluggable CBOR codec providers.
//!
//! Alternative CBOR implementations register here; codec construction goes
//! through [`select`], which honors the `QUIVER_CBOR_PROVIDER` environment
//! setting, then the highest registered priority, then the built-in default.
//! Registration is insert-only and the registry is shared process-wide.

use crate::{CborCodec, CborSettings};
use std::sync::{Arc, LazyLock, RwLock};

/// A named source of [`CborCodec`]s.
pub trait CborCodecProvider: Send + Sync {
    /// The provider's name, matched against the `QUIVER_CBOR_PROVIDER` setting.
    fn name(&self) -> &'static str;

    /// The provider's priority; the highest registered priority wins.
    fn priority(&self) -> i32 {
        0
    }

    /// Creates a codec with the given settings.
    fn codec(&self, settings: &CborSettings) -> CborCodec;
}

/// The environment variable forcing selection of a named provider.
pub const PROVIDER_ENV: &str = "QUIVER_CBOR_PROVIDER";

#[derive(Debug, Default)]
struct DefaultCborProvider;

impl CborCodecProvider for DefaultCborProvider {
    fn name(&self) -> &'static str {
        "default"
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn codec(&self, settings: &CborSettings) -> CborCodec {
        CborCodec::with_settings(settings.clone())
    }
}

static REGISTRY: LazyLock<RwLock<Vec<Arc<dyn CborCodecProvider>>>> =
    LazyLock::new(|| RwLock::new(vec![Arc::new(DefaultCborProvider)]));

/// Registers a provider. Registration is idempotent by name.
pub fn register(provider: Arc<dyn CborCodecProvider>) {
    let mut registry = REGISTRY.write().unwrap();
    if registry.iter().any(|p| p.name() == provider.name()) {
        return;
    }
    registry.push(provider);
}

/// Selects the active provider.
///
/// A `QUIVER_CBOR_PROVIDER` environment setting picks exactly that provider;
/// otherwise the highest-priority registered provider wins, falling back to
/// the built-in default.
pub fn select() -> Arc<dyn CborCodecProvider> {
    let registry = REGISTRY.read().unwrap();
    if let Ok(name) = std::env::var(PROVIDER_ENV) {
        if let Some(provider) = registry.iter().find(|p| p.name() == name) {
            return provider.clone();
        }
        tracing::warn!(
            provider = %name,
            "no cbor provider registered under the requested name, using priority selection"
        );
    }
    registry
        .iter()
        .max_by_key(|p| p.priority())
        .expect("the default provider is always registered")
        .clone()
}

/// Creates a codec from the selected provider.
pub fn codec(settings: &CborSettings) -> CborCodec {
    select().codec(settings)
}

#[cfg(test)]
mod test {
    use super::*;

    struct HighPriority;

    impl CborCodecProvider for HighPriority {
        fn name(&self) -> &'static str {
            "high-priority"
        }

        fn priority(&self) -> i32 {
            100
        }

        fn codec(&self, settings: &CborSettings) -> CborCodec {
            CborCodec::with_settings(settings.clone())
        }
    }

    #[test]
    fn default_provider_is_always_available() {
        let selected = select();
        assert!(!selected.name().is_empty());
    }

    #[test]
    fn highest_priority_wins() {
        register(Arc::new(HighPriority));
        register(Arc::new(HighPriority)); // idempotent
        let selected = select();
        assert_eq!(selected.name(), "high-priority");
    }
}
