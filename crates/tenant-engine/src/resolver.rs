//! Config resolution and merge precedence
//!
//! Precedence, lowest to highest: registry baseline, remote config,
//! sub-tenant override. Merges are shallow per top-level key. Three
//! derived fields are always recomputed from raw remote fields when a
//! remote config is present, with one fresh cache-busting stamp per
//! resolution pass; the two derived image URLs carry the stamp, the
//! display name does not (it is not a URL).

use crate::config::{keys, TenantConfig};
use crate::fetch::LegalDocuments;
use tenant_common::{cache_bust, epoch_ms};

/// Merge a baseline with an optional remote config and an optional
/// sub-tenant override.
///
/// Unresolvable sub-tenant ids must be dropped by the caller before
/// this point; a `sub_tenant` argument here always tags the result.
pub fn resolve(
    baseline: &TenantConfig,
    remote: Option<&TenantConfig>,
    sub_tenant: Option<(&str, &TenantConfig)>,
) -> TenantConfig {
    let mut resolved = baseline.clone();

    if let Some(remote) = remote {
        resolved.merge_from(remote);
        derive_remote_fields(&mut resolved, baseline, remote, epoch_ms());
    }

    if let Some((sub_id, overrides)) = sub_tenant {
        overlay_sub_tenant(&mut resolved, sub_id, overrides);
    }

    resolved
}

/// Apply a sub-tenant override on top of a resolved config and tag it.
///
/// Used both by [`resolve`] and by the orchestrator's cache-hit path,
/// where the cached tenant-level data is reused without re-stamping.
pub fn overlay_sub_tenant(config: &mut TenantConfig, sub_id: &str, overrides: &TenantConfig) {
    config.merge_from(overrides);
    config.set(keys::SUB_TENANT_ID, sub_id);
}

/// Merge fetched legal-document URLs with a fresh cache-bust stamp
pub fn merge_legal_documents(config: &mut TenantConfig, docs: &LegalDocuments) {
    let stamp = epoch_ms();
    config.set(keys::TERMS_URL, cache_bust(&docs.terms_url, stamp));
    config.set(keys::PRIVACY_URL, cache_bust(&docs.privacy_url, stamp));
}

fn derive_remote_fields(
    resolved: &mut TenantConfig,
    baseline: &TenantConfig,
    remote: &TenantConfig,
    stamp: i64,
) {
    let fallback_logo = baseline.get_str(keys::LOGO_URL);

    if let Some(url) = remote.get_str(keys::BRAND_IMAGE_URL).or(fallback_logo) {
        resolved.set(keys::WELCOME_IMAGE_URL, cache_bust(url, stamp));
    }
    if let Some(url) = remote.get_str(keys::LOGO_URL).or(fallback_logo) {
        resolved.set(keys::STORE_LOGO_URL, cache_bust(url, stamp));
    }
    if let Some(title) = remote.get_str(keys::TITLE).or(baseline.get_str(keys::TITLE)) {
        resolved.set(keys::PARTNER_DISPLAY_NAME, title.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> TenantConfig {
        TenantConfig::new()
            .with(keys::TITLE, "A")
            .with(keys::COUNTRY, "CH")
            .with(keys::LOGO_URL, "https://cdn.test/base-logo.png")
    }

    #[test]
    fn test_baseline_only_passes_through() {
        let resolved = resolve(&baseline(), None, None);
        assert_eq!(resolved.get_str(keys::TITLE), Some("A"));
        // no remote, no derived fields
        assert!(resolved.get(keys::WELCOME_IMAGE_URL).is_none());
        assert!(resolved.get(keys::PARTNER_DISPLAY_NAME).is_none());
    }

    #[test]
    fn test_remote_wins_over_baseline() {
        let remote = TenantConfig::new().with(keys::TITLE, "B");
        let resolved = resolve(&baseline(), Some(&remote), None);
        assert_eq!(resolved.get_str(keys::TITLE), Some("B"));
        assert_eq!(resolved.get_str(keys::COUNTRY), Some("CH"));
    }

    #[test]
    fn test_sub_tenant_wins_over_remote() {
        let remote = TenantConfig::new().with(keys::TITLE, "B");
        let sub = TenantConfig::new().with(keys::TITLE, "C");
        let resolved = resolve(&baseline(), Some(&remote), Some(("alipay", &sub)));

        assert_eq!(resolved.get_str(keys::TITLE), Some("C"));
        assert_eq!(resolved.sub_tenant_id(), Some("alipay"));
    }

    #[test]
    fn test_no_sub_tenant_means_no_tag() {
        let resolved = resolve(&baseline(), None, None);
        assert!(resolved.sub_tenant_id().is_none());
    }

    #[test]
    fn test_derived_fields_from_remote() {
        let remote = TenantConfig::new()
            .with(keys::BRAND_IMAGE_URL, "https://cdn.test/hero.png")
            .with(keys::LOGO_URL, "https://cdn.test/remote-logo.png")
            .with(keys::TITLE, "Remote Title");
        let resolved = resolve(&baseline(), Some(&remote), None);

        let welcome = resolved.get_str(keys::WELCOME_IMAGE_URL).unwrap();
        let logo = resolved.get_str(keys::STORE_LOGO_URL).unwrap();
        assert!(welcome.starts_with("https://cdn.test/hero.png?"));
        assert!(logo.starts_with("https://cdn.test/remote-logo.png?"));
        assert_eq!(
            resolved.get_str(keys::PARTNER_DISPLAY_NAME),
            Some("Remote Title")
        );
    }

    #[test]
    fn test_derived_fields_fall_back_to_baseline() {
        // remote present but missing the raw fields
        let remote = TenantConfig::new().with("extra", "x");
        let resolved = resolve(&baseline(), Some(&remote), None);

        let welcome = resolved.get_str(keys::WELCOME_IMAGE_URL).unwrap();
        let logo = resolved.get_str(keys::STORE_LOGO_URL).unwrap();
        assert!(welcome.starts_with("https://cdn.test/base-logo.png?"));
        assert!(logo.starts_with("https://cdn.test/base-logo.png?"));
        assert_eq!(resolved.get_str(keys::PARTNER_DISPLAY_NAME), Some("A"));
    }

    #[test]
    fn test_derived_urls_share_one_stamp() {
        let remote = TenantConfig::new()
            .with(keys::BRAND_IMAGE_URL, "https://cdn.test/hero.png")
            .with(keys::LOGO_URL, "https://cdn.test/logo.png");
        let resolved = resolve(&baseline(), Some(&remote), None);

        let stamp_of = |key: &str| {
            resolved
                .get_str(key)
                .unwrap()
                .rsplit('?')
                .next()
                .unwrap()
                .to_string()
        };
        assert_eq!(
            stamp_of(keys::WELCOME_IMAGE_URL),
            stamp_of(keys::STORE_LOGO_URL)
        );
    }

    #[test]
    fn test_merge_legal_documents_stamps_urls() {
        let mut config = baseline();
        let docs = LegalDocuments {
            terms_url: "https://docs.test/terms.pdf".to_string(),
            privacy_url: "https://docs.test/privacy.pdf".to_string(),
        };
        merge_legal_documents(&mut config, &docs);

        assert!(config
            .get_str(keys::TERMS_URL)
            .unwrap()
            .starts_with("https://docs.test/terms.pdf?"));
        assert!(config
            .get_str(keys::PRIVACY_URL)
            .unwrap()
            .starts_with("https://docs.test/privacy.pdf?"));
    }
}
