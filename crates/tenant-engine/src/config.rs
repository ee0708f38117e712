//! Data model: resolved configs, cache entries, registry entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Well-known configuration keys.
///
/// A resolved config is an open map; these are the keys the engine
/// itself reads or writes. Partners may carry arbitrary extension
/// fields alongside them.
pub mod keys {
    /// CSS mode class applied to the document body
    pub const MODE: &str = "mode";
    /// The tenant code itself, echoed into the config
    pub const REDEMPTION_PARTNER_CODE: &str = "redemptionPartnerCode";
    /// ISO country of the tenant
    pub const COUNTRY: &str = "country";
    /// Tenant display title
    pub const TITLE: &str = "title";
    /// Currency symbol shown in the UI
    pub const CURRENCY_SYMBOL: &str = "currencySymbol";
    /// Baseline logo URL (registry-provided fallback asset)
    pub const LOGO_URL: &str = "logoUrl";
    /// Remote brand/hero image URL (raw, pre-derivation)
    pub const BRAND_IMAGE_URL: &str = "brandImageUrl";
    /// Derived, cache-busted welcome image URL
    pub const WELCOME_IMAGE_URL: &str = "welcomeImageUrl";
    /// Derived, cache-busted store logo URL
    pub const STORE_LOGO_URL: &str = "storeLogoUrl";
    /// Derived partner display name
    pub const PARTNER_DISPLAY_NAME: &str = "partnerDisplayName";
    /// Cache-busted terms-of-service URL
    pub const TERMS_URL: &str = "termsAndConditionsUrl";
    /// Cache-busted privacy-policy URL
    pub const PRIVACY_URL: &str = "privacyPolicyUrl";
    /// Active sub-tenant tag, present only when a sub-tenant resolved
    pub const SUB_TENANT_ID: &str = "subTenantId";
}

/// A resolved tenant configuration.
///
/// Open-ended string-keyed map with heterogeneous JSON values. Merges
/// are shallow per top-level key; nested objects are replaced whole.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantConfig(Map<String, Value>);

impl TenantConfig {
    /// Empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; `None` unless the value is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for a key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Set a key, replacing any existing value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style `set`, for registry seeding
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Shallow overlay: every top-level key of `other` wins over `self`
    pub fn merge_from(&mut self, other: &TenantConfig) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// CSS mode class
    pub fn mode(&self) -> Option<&str> {
        self.get_str(keys::MODE)
    }

    /// Tenant code carried in the config
    pub fn redemption_partner_code(&self) -> Option<&str> {
        self.get_str(keys::REDEMPTION_PARTNER_CODE)
    }

    /// Active sub-tenant tag, if any
    pub fn sub_tenant_id(&self) -> Option<&str> {
        self.get_str(keys::SUB_TENANT_ID)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the config has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over top-level entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// A cached resolution result, stamped at write time.
///
/// Valid iff `now - timestamp < ttl`; the store deletes expired entries
/// lazily on the next lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The tenant-level merged config (baseline + remote)
    pub data: TenantConfig,
    /// Write time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// The single active tenant identity for this session.
///
/// Both fields advance together on a successful initialization; the
/// engine never updates one without the other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTenantState {
    /// Active tenant code
    pub current_tenant: String,
    /// Active sub-tenant id, `None` when no sub-tenant resolved
    pub current_sub_tenant: Option<String>,
}

/// Statically registered fallback data for one tenant
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticRegistryEntry {
    /// Baseline config, used whole when the remote fetch fails
    pub baseline: TenantConfig,
    /// Partial overrides keyed by sub-tenant id
    pub sub_tenants: HashMap<String, TenantConfig>,
}

impl StaticRegistryEntry {
    /// Entry with a baseline and no sub-tenants
    pub fn new(baseline: TenantConfig) -> Self {
        Self {
            baseline,
            sub_tenants: HashMap::new(),
        }
    }

    /// Builder-style sub-tenant registration
    pub fn with_sub_tenant(mut self, id: impl Into<String>, overrides: TenantConfig) -> Self {
        self.sub_tenants.insert(id.into(), overrides);
        self
    }
}
