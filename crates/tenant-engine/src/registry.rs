//! Static tenant registry
//!
//! In-memory table mapping tenant codes to baseline configurations and
//! optional sub-tenant override tables. Read-only at runtime except
//! through [`TenantRegistry::register`].

use crate::config::{StaticRegistryEntry, TenantConfig};
use dashmap::DashMap;

/// Registry of statically known tenants
pub struct TenantRegistry {
    entries: DashMap<String, StaticRegistryEntry>,
}

impl TenantRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registry pre-populated from a seed table
    pub fn seeded(seed: impl IntoIterator<Item = (String, StaticRegistryEntry)>) -> Self {
        let registry = Self::new();
        for (code, entry) in seed {
            registry.entries.insert(code, entry);
        }
        registry
    }

    /// Whether a tenant code is registered
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Baseline config for a tenant
    pub fn baseline(&self, code: &str) -> Option<TenantConfig> {
        self.entries.get(code).map(|e| e.baseline.clone())
    }

    /// Sub-tenant override, `None` when either the tenant or the
    /// sub-tenant id is unregistered
    pub fn sub_tenant_override(&self, code: &str, sub_tenant: &str) -> Option<TenantConfig> {
        self.entries
            .get(code)
            .and_then(|e| e.sub_tenants.get(sub_tenant).cloned())
    }

    /// Register or replace a tenant's entry
    pub fn register(&self, code: impl Into<String>, entry: StaticRegistryEntry) {
        self.entries.insert(code.into(), entry);
    }

    /// Registered tenant codes
    pub fn codes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }
}

impl Default for TenantRegistry {
    fn default() -> Self {
        Self::new()
    }
}
