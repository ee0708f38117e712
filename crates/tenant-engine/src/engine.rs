//! Engine orchestration
//!
//! [`TenantEngine`] is the public entry point. Each
//! [`initialize_tenant`](TenantEngine::initialize_tenant) call walks a
//! fixed pipeline: validate, resolve sub-tenant, cache lookup, remote
//! fetch + merge on a miss, persist session identity, broadcast, apply
//! presentation. The only failure a caller ever sees is
//! [`TenantError::UnknownTenant`]; every remote, storage, and
//! presentation failure is absorbed with a fallback and a log line.

use crate::cache::{ConfigCache, DEFAULT_TTL_MS};
use crate::config::{ActiveTenantState, StaticRegistryEntry, TenantConfig};
use crate::fetch::ConfigFetcher;
use crate::presentation::PresentationEffector;
use crate::registry::TenantRegistry;
use crate::resolver;
use crate::state::{StateBroadcaster, Subscription};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tenant_common::{DomSurface, SessionStore, TenantError, TenantResult, Transport};
use tracing::{debug, info, warn};

/// Session key holding the persisted active tenant code
pub const SESSION_TENANT_KEY: &str = "current_tenant";

/// Session key holding the persisted active sub-tenant id
pub const SESSION_SUB_TENANT_KEY: &str = "current_sub_tenant";

/// One tenant-switch request.
///
/// The structured replacement for the source's overloaded call
/// signatures; adapters can wrap this in whatever convenience calls
/// their framework prefers.
#[derive(Clone, Debug)]
pub struct InitializeTenant {
    /// Tenant code to activate; must be registered
    pub tenant_code: String,
    /// Optional sub-tenant id; silently dropped when unregistered
    pub sub_tenant: Option<String>,
    /// Per-call cache TTL override, milliseconds
    pub ttl_ms: Option<i64>,
}

impl InitializeTenant {
    /// Request for a tenant with no sub-tenant and the default TTL
    pub fn tenant(code: impl Into<String>) -> Self {
        Self {
            tenant_code: code.into(),
            sub_tenant: None,
            ttl_ms: None,
        }
    }

    /// Request a sub-tenant as well
    pub fn with_sub_tenant(mut self, sub_tenant: impl Into<String>) -> Self {
        self.sub_tenant = Some(sub_tenant.into());
        self
    }

    /// Override the cache TTL for this call only
    pub fn with_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = Some(ttl_ms);
        self
    }
}

/// Builder for [`TenantEngine`]
pub struct TenantEngineBuilder {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    dom: Arc<dyn DomSurface>,
    base_url: String,
    default_tenant: String,
    default_ttl_ms: i64,
    seed: Vec<(String, StaticRegistryEntry)>,
}

impl TenantEngineBuilder {
    /// Builder over the three host capabilities
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        dom: Arc<dyn DomSurface>,
    ) -> Self {
        Self {
            transport,
            session,
            dom,
            base_url: String::new(),
            default_tenant: String::new(),
            default_ttl_ms: DEFAULT_TTL_MS,
            seed: Vec::new(),
        }
    }

    /// Base URL of the config API (default: same-origin relative)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Tenant activated at construction when no identity was persisted
    pub fn default_tenant(mut self, code: impl Into<String>) -> Self {
        self.default_tenant = code.into();
        self
    }

    /// Default cache TTL in milliseconds (24h unless set)
    pub fn default_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    /// Seed the static registry with a tenant entry
    pub fn register(mut self, code: impl Into<String>, entry: StaticRegistryEntry) -> Self {
        self.seed.push((code.into(), entry));
        self
    }

    /// Build the engine.
    ///
    /// Restores a persisted session identity when it names a registered
    /// tenant; otherwise starts from the default tenant. Fails with
    /// `UnknownTenant` when the default tenant is not registered.
    pub fn build(self) -> TenantResult<TenantEngine> {
        let registry = TenantRegistry::seeded(self.seed);
        if !registry.contains(&self.default_tenant) {
            return Err(TenantError::UnknownTenant(self.default_tenant));
        }

        let (tenant, sub_tenant) =
            restore_identity(&*self.session, &registry, &self.default_tenant);
        let baseline = registry
            .baseline(&tenant)
            .ok_or_else(|| TenantError::UnknownTenant(tenant.clone()))?;

        info!(tenant = %tenant, "tenant engine starting");
        Ok(TenantEngine {
            registry,
            cache: ConfigCache::new(self.session.clone()),
            fetcher: ConfigFetcher::new(self.transport, self.base_url),
            effector: PresentationEffector::new(self.dom),
            broadcaster: StateBroadcaster::new(ActiveTenantState {
                current_tenant: tenant,
                current_sub_tenant: sub_tenant,
            }),
            session: self.session,
            current_config: RwLock::new(baseline),
            default_ttl_ms: self.default_ttl_ms,
            generation: AtomicU64::new(0),
        })
    }
}

fn restore_identity(
    session: &dyn SessionStore,
    registry: &TenantRegistry,
    default_tenant: &str,
) -> (String, Option<String>) {
    let persisted = match session.get_item(SESSION_TENANT_KEY) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "session storage unavailable, starting from default tenant");
            None
        }
    };
    match persisted {
        Some(code) if registry.contains(&code) => {
            let sub = session
                .get_item(SESSION_SUB_TENANT_KEY)
                .ok()
                .flatten()
                .filter(|sub| registry.sub_tenant_override(&code, sub).is_some());
            debug!(tenant = %code, "restored persisted session identity");
            (code, sub)
        }
        Some(code) => {
            warn!(tenant = %code, "persisted tenant no longer registered, using default");
            (default_tenant.to_string(), None)
        }
        None => (default_tenant.to_string(), None),
    }
}

/// Tenant configuration resolution & caching engine.
///
/// Explicitly constructed, owns all of its state; callers hold and
/// pass the instance, there is no module-level default.
pub struct TenantEngine {
    registry: TenantRegistry,
    cache: ConfigCache,
    fetcher: ConfigFetcher,
    effector: PresentationEffector,
    broadcaster: StateBroadcaster,
    session: Arc<dyn SessionStore>,
    current_config: RwLock<TenantConfig>,
    default_ttl_ms: i64,
    // Monotonic call generation. Overlapping initialize_tenant calls
    // are not serialized; a call that is no longer the newest skips
    // every state mutation so the engine reflects the last call
    // initiated, not the last to finish.
    generation: AtomicU64,
}

impl TenantEngine {
    /// Switch the active tenant, returning the resolved config.
    ///
    /// The only error is `UnknownTenant`, raised before any mutation.
    /// Remote, cache, storage, and presentation failures all degrade:
    /// remote > baseline for data, and a broken stylesheet or storage
    /// layer never fails the call.
    pub async fn initialize_tenant(
        &self,
        request: InitializeTenant,
    ) -> TenantResult<TenantConfig> {
        let code = request.tenant_code;

        // 1. validate; a rejected call must not supersede an in-flight
        // one, so the generation is taken only after this check
        if !self.registry.contains(&code) {
            return Err(TenantError::UnknownTenant(code));
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // 2. resolve sub-tenant, silently dropping unknown ids
        let sub_override = request.sub_tenant.as_deref().and_then(|sub| {
            let found = self.registry.sub_tenant_override(&code, sub);
            if found.is_none() {
                debug!(tenant = %code, sub_tenant = sub, "unknown sub-tenant id, ignoring");
            }
            found.map(|overrides| (sub.to_string(), overrides))
        });

        // 3./4. cache lookup, remote fetch + merge on a miss
        let ttl_ms = request.ttl_ms.unwrap_or(self.default_ttl_ms);
        let tenant_level = match self.cache.get(&code, ttl_ms) {
            Some(cached) => cached,
            None => self.fetch_and_merge(&code).await?,
        };

        // sub-tenant override goes on top of the tenant-level data in
        // both paths; cached cache-bust stamps are reused untouched
        let mut resolved = tenant_level;
        resolved.set(crate::config::keys::REDEMPTION_PARTNER_CODE, code.as_str());
        if let Some((sub_id, overrides)) = &sub_override {
            resolver::overlay_sub_tenant(&mut resolved, sub_id, overrides);
        }
        let sub_tenant = sub_override.map(|(sub_id, _)| sub_id);

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(tenant = %code, "superseded by a newer tenant switch, skipping side effects");
            return Ok(resolved);
        }

        // 5. persist session identity
        self.persist_identity(&code, sub_tenant.as_deref());
        *self.current_config.write() = resolved.clone();

        // 6. broadcast
        self.broadcaster.advance(code.clone(), sub_tenant);

        // 7. presentation, awaited but never fatal
        self.effector.apply(&resolved).await;

        info!(tenant = %code, "tenant initialized");
        Ok(resolved)
    }

    /// Cache-miss path: remote config merge, best-effort legal docs.
    ///
    /// Only a remote-sourced result is cached; a baseline-only fallback
    /// is returned uncached so the next call retries the network.
    async fn fetch_and_merge(&self, code: &str) -> TenantResult<TenantConfig> {
        let baseline = self
            .registry
            .baseline(code)
            .ok_or_else(|| TenantError::UnknownTenant(code.to_string()))?;

        match self.fetcher.fetch_config(code).await {
            Ok(remote) => {
                let mut merged = resolver::resolve(&baseline, Some(&remote), None);
                match self.fetcher.fetch_legal_documents(code).await {
                    Ok(docs) => resolver::merge_legal_documents(&mut merged, &docs),
                    Err(e) => {
                        warn!(tenant = code, error = %e, "legal-document fetch failed, leaving fields unset");
                    }
                }
                self.cache.put(code, &merged);
                Ok(merged)
            }
            Err(e) => {
                warn!(tenant = code, error = %e, "remote config fetch failed, using baseline");
                Ok(baseline)
            }
        }
    }

    fn persist_identity(&self, code: &str, sub_tenant: Option<&str>) {
        if let Err(e) = self.session.set_item(SESSION_TENANT_KEY, code) {
            warn!(error = %e, "failed to persist tenant identity");
        }
        let result = match sub_tenant {
            Some(sub) => self.session.set_item(SESSION_SUB_TENANT_KEY, sub),
            None => self.session.remove_item(SESSION_SUB_TENANT_KEY),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist sub-tenant identity");
        }
    }

    /// Active tenant code
    pub fn current_tenant(&self) -> String {
        self.broadcaster.current().current_tenant
    }

    /// Active sub-tenant id, if any
    pub fn current_sub_tenant(&self) -> Option<String> {
        self.broadcaster.current().current_sub_tenant
    }

    /// Active identity snapshot
    pub fn current_state(&self) -> ActiveTenantState {
        self.broadcaster.current()
    }

    /// One value from the active resolved config
    pub fn config_value(&self, key: &str) -> Option<Value> {
        self.current_config.read().get(key).cloned()
    }

    /// The whole active resolved config
    pub fn all_config(&self) -> TenantConfig {
        self.current_config.read().clone()
    }

    /// Drop one tenant's cache entry, or all entries
    pub fn clear_cache(&self, code: Option<&str>) {
        self.cache.invalidate(code);
    }

    /// Register or replace a tenant's static registry entry at runtime
    pub fn update_asset_mapping(&self, code: impl Into<String>, entry: StaticRegistryEntry) {
        self.registry.register(code, entry);
    }

    /// Subscribe to tenant/sub-tenant change notifications
    pub fn subscribe(
        &self,
        listener: impl Fn(&ActiveTenantState) + Send + Sync + 'static,
    ) -> Subscription {
        self.broadcaster.subscribe(listener)
    }
}
