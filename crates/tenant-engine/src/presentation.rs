//! Presentation side effects: body mode class and tenant stylesheet
//!
//! Applying a config removes every previously applied mode class, adds
//! the new one, and swaps the identified stylesheet link. A stylesheet
//! that fails to load is logged and otherwise ignored; presentation
//! never blocks initialization.

use crate::config::TenantConfig;
use std::sync::Arc;
use tenant_common::DomSurface;
use tracing::{debug, warn};

/// Element id of the managed stylesheet link
pub const STYLESHEET_ELEMENT_ID: &str = "tenant-stylesheet";

/// Mode classes are recognizable by this marker, e.g.
/// `Privilege_Dufry-mode` or `Privilege_Dufry-mode-alipay`.
const MODE_CLASS_MARKER: &str = "-mode";

/// Applies a resolved config's visual consequences to the DOM surface
pub struct PresentationEffector {
    dom: Arc<dyn DomSurface>,
}

impl PresentationEffector {
    /// Effector over the given DOM surface
    pub fn new(dom: Arc<dyn DomSurface>) -> Self {
        Self { dom }
    }

    /// Apply mode class and stylesheet for a resolved config.
    ///
    /// Resolves once the stylesheet has loaded or failed to load.
    /// Re-applying the same config removes and re-creates the link
    /// element, so callers can force a reload.
    pub async fn apply(&self, config: &TenantConfig) {
        let sub_tenant = config.sub_tenant_id();

        for class in self.dom.body_classes() {
            if class.contains(MODE_CLASS_MARKER) {
                self.dom.remove_body_class(&class);
            }
        }
        if let Some(mode) = config.mode() {
            let class = match sub_tenant {
                Some(sub) => format!("{mode}-{sub}"),
                None => mode.to_string(),
            };
            debug!(class = %class, "applying mode class");
            self.dom.add_body_class(&class);
        }

        let Some(code) = config.redemption_partner_code() else {
            warn!("resolved config carries no tenant code, skipping stylesheet swap");
            return;
        };
        let href = stylesheet_path(code, sub_tenant);

        self.dom.remove_element(STYLESHEET_ELEMENT_ID);
        if let Err(e) = self.dom.mount_stylesheet(STYLESHEET_ELEMENT_ID, &href).await {
            warn!(href = %href, error = %e, "tenant stylesheet failed to load");
        }
    }
}

/// Stylesheet path for a tenant (and optional sub-tenant)
pub fn stylesheet_path(code: &str, sub_tenant: Option<&str>) -> String {
    match sub_tenant {
        Some(sub) => format!("assets/tenants/{code}/{sub}/styles/tenant.css"),
        None => format!("assets/tenants/{code}/styles/tenant.css"),
    }
}
