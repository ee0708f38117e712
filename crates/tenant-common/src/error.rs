//! Error types for the tenant engine

use thiserror::Error;

/// Tenant engine error type
///
/// Of these, only `UnknownTenant` ever reaches a caller of
/// `initialize_tenant`; the rest are absorbed internally and logged, and
/// exist so internal layers can report failures with a typed cause.
#[derive(Error, Debug)]
pub enum TenantError {
    /// Tenant code absent from the static registry
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),

    /// Remote config or legal-document fetch failed
    #[error("remote fetch failed: {0}")]
    RemoteFetch(String),

    /// Stored cache entry is unparsable or malformed
    #[error("cache corruption: {0}")]
    CacheCorruption(String),

    /// Stylesheet or DOM mutation failed
    #[error("presentation failed: {0}")]
    Presentation(String),

    /// Session storage failure
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for the tenant engine
pub type TenantResult<T> = Result<T, TenantError>;
