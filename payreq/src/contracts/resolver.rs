//! Effective contract resolution across a descriptor's ancestor chain.

use super::RequestDescriptor;
use indexmap::{IndexMap, IndexSet};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// The merged `{defaults, required, locked}` triple of a request type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contract {
    /// Defaults, in first-declaration order; later ancestors override values.
    pub defaults: IndexMap<String, serde_json::Value>,
    /// Union of every ancestor's required keys.
    pub required: IndexSet<String>,
    /// Union of every ancestor's locked keys.
    pub locked: IndexSet<String>,
}

impl Contract {
    /// Returns true if `key` must be present before `get_params` succeeds.
    #[must_use]
    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(key)
    }

    /// Returns true if `key` is locked after its first assignment.
    #[must_use]
    pub fn is_locked(&self, key: &str) -> bool {
        self.locked.contains(key)
    }

    /// Returns the resolved default for `key`.
    #[must_use]
    pub fn default_for(&self, key: &str) -> Option<&serde_json::Value> {
        self.defaults.get(key)
    }
}

/// Merges descriptors root→leaf into a [`Contract`] without caching.
#[must_use]
pub fn resolve_uncached(descriptor: &'static RequestDescriptor) -> Contract {
    let mut contract = Contract::default();

    for ancestor in descriptor.ancestry() {
        for (key, value) in ancestor.defaults {
            contract.defaults.insert((*key).to_string(), value.to_value());
        }
        contract
            .required
            .extend(ancestor.required.iter().map(|k| (*k).to_string()));
        contract
            .locked
            .extend(ancestor.locked.iter().map(|k| (*k).to_string()));
    }

    contract
}

/// Memoizing contract resolver keyed by descriptor name.
#[derive(Debug, Default)]
pub struct ContractResolver {
    cache: RwLock<HashMap<&'static str, Arc<Contract>>>,
}

impl ContractResolver {
    /// Creates a new empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the contract of `descriptor`, computing it at most once.
    pub fn resolve(&self, descriptor: &'static RequestDescriptor) -> Arc<Contract> {
        if let Some(contract) = self.cache.read().get(descriptor.name) {
            return Arc::clone(contract);
        }

        let contract = Arc::new(resolve_uncached(descriptor));
        debug!(
            request_type = descriptor.name,
            defaults = contract.defaults.len(),
            required = contract.required.len(),
            locked = contract.locked.len(),
            "Resolved request contract"
        );
        Arc::clone(
            self.cache
                .write()
                .entry(descriptor.name)
                .or_insert(contract),
        )
    }

    /// Remove all cached contracts (primarily for tests).
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Returns the number of cached contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Returns true if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

/// Process-wide resolver used by request construction.
pub static RESOLVER: LazyLock<ContractResolver> = LazyLock::new(ContractResolver::new);

/// Resolves `descriptor` through the shared [`RESOLVER`].
pub fn resolve(descriptor: &'static RequestDescriptor) -> Arc<Contract> {
    RESOLVER.resolve(descriptor)
}
