//! Tenant Configuration Resolution & Caching Engine
//!
//! Resolves, caches, and applies per-tenant configuration for a
//! multi-tenant front end. Given a tenant code (and optional sub-tenant
//! id) the engine produces one merged configuration describing branding,
//! locale, and legal-document URLs, and applies the visual consequences
//! (body mode class, tenant stylesheet) as a best-effort side effect.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       TENANT ENGINE                          │
//! │                                                              │
//! │  initialize_tenant(code, sub?, ttl?)                         │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  ┌──────────┐   miss   ┌─────────┐   merge   ┌──────────┐   │
//! │  │  Cache   │─────────▶│ Fetcher │──────────▶│ Resolver │   │
//! │  │  (TTL)   │◀─────────│ (HTTP)  │           │ (merge)  │   │
//! │  └────┬─────┘  persist └─────────┘           └────┬─────┘   │
//! │       │ hit                                       │         │
//! │       ▼                                           ▼         │
//! │  ┌─────────────┐  notify  ┌─────────────────────────────┐   │
//! │  │ Broadcaster │◀─────────│ sub-tenant overlay + apply  │   │
//! │  └─────────────┘          └──────────────┬──────────────┘   │
//! │                                          ▼                  │
//! │                               ┌─────────────────────┐       │
//! │                               │ Presentation (DOM)  │       │
//! │                               └─────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry of baseline configurations, the fetch fallback rules,
//! and the merge precedence (baseline < remote < sub-tenant override)
//! live in [`resolver`]; everything stateful is owned by one explicitly
//! constructed [`TenantEngine`] - there are no ambient globals.

#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod presentation;
pub mod registry;
pub mod resolver;
pub mod state;

pub use cache::{ConfigCache, DEFAULT_TTL_MS};
pub use config::{keys, ActiveTenantState, CacheEntry, StaticRegistryEntry, TenantConfig};
pub use engine::{InitializeTenant, TenantEngine, TenantEngineBuilder};
pub use fetch::{ConfigFetcher, LegalDocuments};
pub use presentation::PresentationEffector;
pub use registry::TenantRegistry;
pub use state::{StateBroadcaster, Subscription};

pub use tenant_common::{TenantError, TenantResult};
