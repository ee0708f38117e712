//! Remote config and legal-document fetching
//!
//! Both fetches are best-effort from the orchestrator's point of view:
//! errors are returned to it and absorbed there, never propagated to
//! the engine's caller. The engine owns caching, so every request
//! carries cache-defeating headers.

use crate::config::TenantConfig;
use serde_json::Value;
use std::sync::Arc;
use tenant_common::{Transport, TransportError};
use tracing::debug;

/// Terms-of-service and privacy-policy URLs for one tenant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegalDocuments {
    /// Terms-of-service document URL
    pub terms_url: String,
    /// Privacy-policy document URL
    pub privacy_url: String,
}

/// Fetches tenant configuration from the config API
pub struct ConfigFetcher {
    transport: Arc<dyn Transport>,
    base_url: String,
}

fn no_cache_headers() -> Vec<(String, String)> {
    vec![
        (
            "Cache-Control".to_string(),
            "no-cache, no-store, must-revalidate".to_string(),
        ),
        ("Pragma".to_string(), "no-cache".to_string()),
    ]
}

impl ConfigFetcher {
    /// Fetcher against `base_url` using the injected transport
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            transport,
            base_url,
        }
    }

    /// URL of a tenant's config document
    pub fn config_url(&self, code: &str) -> String {
        format!("{}/tenants/{}/config", self.base_url, code)
    }

    /// URL of a tenant's legal-document listing
    pub fn legal_documents_url(&self, code: &str) -> String {
        format!("{}/tenants/{}/legal-documents", self.base_url, code)
    }

    /// GET a tenant's remote configuration
    pub async fn fetch_config(&self, code: &str) -> Result<TenantConfig, TransportError> {
        let url = self.config_url(code);
        debug!(tenant = code, url = %url, "fetching remote config");
        let body = self.transport.get_json(&url, &no_cache_headers()).await?;
        TenantConfig::from_value(body)
            .ok_or_else(|| TransportError::Decode("config body is not a JSON object".to_string()))
    }

    /// GET a tenant's legal documents.
    ///
    /// The API returns a candidate list; the terms document is the
    /// first candidate whose id contains the tenant code (or the first
    /// candidate when none match), and the privacy document is always
    /// the first candidate.
    pub async fn fetch_legal_documents(&self, code: &str) -> Result<LegalDocuments, TransportError> {
        let url = self.legal_documents_url(code);
        debug!(tenant = code, url = %url, "fetching legal documents");
        let body = self.transport.get_json(&url, &no_cache_headers()).await?;

        let candidates: Vec<(String, String)> = body
            .as_array()
            .ok_or_else(|| {
                TransportError::Decode("legal-documents body is not a JSON array".to_string())
            })?
            .iter()
            .filter_map(candidate)
            .collect();

        let first = candidates
            .first()
            .ok_or_else(|| TransportError::Decode("no legal-document candidates".to_string()))?;

        let terms = candidates
            .iter()
            .find(|(id, _)| id.contains(code))
            .unwrap_or(first);

        Ok(LegalDocuments {
            terms_url: terms.1.clone(),
            privacy_url: first.1.clone(),
        })
    }
}

fn candidate(value: &Value) -> Option<(String, String)> {
    let id = value.get("id")?.as_str()?;
    let url = value.get("url")?.as_str()?;
    Some((id.to_string(), url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenant_common::StaticTransport;

    fn fetcher() -> (ConfigFetcher, Arc<StaticTransport>) {
        let transport = Arc::new(StaticTransport::new());
        (
            ConfigFetcher::new(transport.clone(), "https://api.test/"),
            transport,
        )
    }

    #[tokio::test]
    async fn test_fetch_config_decodes_object() {
        let (fetcher, transport) = fetcher();
        transport.route(
            "https://api.test/tenants/TenantX/config",
            json!({"title": "Remote", "mode": "TenantX-mode"}),
        );

        let config = fetcher.fetch_config("TenantX").await.unwrap();
        assert_eq!(config.get_str("title"), Some("Remote"));
    }

    #[tokio::test]
    async fn test_fetch_config_rejects_non_object() {
        let (fetcher, transport) = fetcher();
        transport.route("https://api.test/tenants/TenantX/config", json!([1, 2]));

        let err = fetcher.fetch_config("TenantX").await;
        assert!(matches!(err, Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_config_network_failure() {
        let (fetcher, _transport) = fetcher();
        let err = fetcher.fetch_config("TenantX").await;
        assert!(matches!(err, Err(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn test_legal_documents_terms_matches_tenant_code() {
        let (fetcher, transport) = fetcher();
        transport.route(
            "https://api.test/tenants/TenantX/legal-documents",
            json!([
                {"id": "generic-privacy", "url": "https://docs.test/privacy.pdf"},
                {"id": "terms-TenantX-v3", "url": "https://docs.test/terms-x.pdf"}
            ]),
        );

        let docs = fetcher.fetch_legal_documents("TenantX").await.unwrap();
        assert_eq!(docs.terms_url, "https://docs.test/terms-x.pdf");
        // privacy is always the first candidate
        assert_eq!(docs.privacy_url, "https://docs.test/privacy.pdf");
    }

    #[tokio::test]
    async fn test_legal_documents_falls_back_to_first() {
        let (fetcher, transport) = fetcher();
        transport.route(
            "https://api.test/tenants/TenantX/legal-documents",
            json!([
                {"id": "doc-a", "url": "https://docs.test/a.pdf"},
                {"id": "doc-b", "url": "https://docs.test/b.pdf"}
            ]),
        );

        let docs = fetcher.fetch_legal_documents("TenantX").await.unwrap();
        assert_eq!(docs.terms_url, "https://docs.test/a.pdf");
        assert_eq!(docs.privacy_url, "https://docs.test/a.pdf");
    }

    #[tokio::test]
    async fn test_legal_documents_empty_list_fails() {
        let (fetcher, transport) = fetcher();
        transport.route("https://api.test/tenants/TenantX/legal-documents", json!([]));

        let err = fetcher.fetch_legal_documents("TenantX").await;
        assert!(matches!(err, Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn test_malformed_candidates_are_skipped() {
        let (fetcher, transport) = fetcher();
        transport.route(
            "https://api.test/tenants/TenantX/legal-documents",
            json!([
                {"id": "no-url-here"},
                {"id": "doc-a", "url": "https://docs.test/a.pdf"}
            ]),
        );

        let docs = fetcher.fetch_legal_documents("TenantX").await.unwrap();
        assert_eq!(docs.privacy_url, "https://docs.test/a.pdf");
    }
}
