//! DOM-like surface capability
//!
//! The engine's only visual side effects are a class toggle on the
//! document body and a stylesheet link swap in the document head. Both
//! are expressed against this trait so the core runs without a browser.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// DOM mutation errors
#[derive(Debug, Clone, Error)]
pub enum DomError {
    /// The identified node does not exist
    #[error("missing node: {0}")]
    MissingNode(String),

    /// The browser reported a load error for a mounted stylesheet
    #[error("stylesheet failed to load: {0}")]
    StylesheetLoad(String),
}

/// Document body + head surface consumed by the presentation effector
#[async_trait]
pub trait DomSurface: Send + Sync {
    /// Current class list on the document body
    fn body_classes(&self) -> Vec<String>;

    /// Add a class to the document body (no-op when already present)
    fn add_body_class(&self, class: &str);

    /// Remove a class from the document body (no-op when absent)
    fn remove_body_class(&self, class: &str);

    /// Remove an element by id; removing an absent element is not an error
    fn remove_element(&self, id: &str);

    /// Insert a `<link rel="stylesheet">` with the given element id and
    /// href, resolving once the browser reports load or error. An `Err`
    /// means the link element exists but its stylesheet failed to load.
    async fn mount_stylesheet(&self, id: &str, href: &str) -> Result<(), DomError>;
}

/// Recording DOM for tests and headless hosts
#[derive(Default)]
pub struct HeadlessDom {
    classes: RwLock<Vec<String>>,
    elements: RwLock<HashMap<String, String>>,
    mounts: RwLock<Vec<String>>,
    fail_loads: RwLock<bool>,
}

impl HeadlessDom {
    /// Create an empty DOM
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent stylesheet mounts report a load error
    pub fn set_fail_loads(&self, fail: bool) {
        *self.fail_loads.write() = fail;
    }

    /// Href of the element with the given id, if mounted
    pub fn element_href(&self, id: &str) -> Option<String> {
        self.elements.read().get(id).cloned()
    }

    /// Every stylesheet href ever mounted, in order
    pub fn mounts(&self) -> Vec<String> {
        self.mounts.read().clone()
    }
}

#[async_trait]
impl DomSurface for HeadlessDom {
    fn body_classes(&self) -> Vec<String> {
        self.classes.read().clone()
    }

    fn add_body_class(&self, class: &str) {
        let mut classes = self.classes.write();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_body_class(&self, class: &str) {
        self.classes.write().retain(|c| c != class);
    }

    fn remove_element(&self, id: &str) {
        self.elements.write().remove(id);
    }

    async fn mount_stylesheet(&self, id: &str, href: &str) -> Result<(), DomError> {
        self.elements
            .write()
            .insert(id.to_string(), href.to_string());
        self.mounts.write().push(href.to_string());
        if *self.fail_loads.read() {
            return Err(DomError::StylesheetLoad(href.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_class_add_remove() {
        let dom = HeadlessDom::new();
        dom.add_body_class("a-mode");
        dom.add_body_class("a-mode");
        assert_eq!(dom.body_classes(), vec!["a-mode"]);

        dom.remove_body_class("a-mode");
        assert!(dom.body_classes().is_empty());
    }

    #[tokio::test]
    async fn test_mount_replaces_and_records() {
        let dom = HeadlessDom::new();
        dom.mount_stylesheet("css", "a.css").await.unwrap();
        dom.mount_stylesheet("css", "b.css").await.unwrap();

        assert_eq!(dom.element_href("css").as_deref(), Some("b.css"));
        assert_eq!(dom.mounts(), vec!["a.css", "b.css"]);
    }

    #[tokio::test]
    async fn test_failed_load_still_mounts() {
        let dom = HeadlessDom::new();
        dom.set_fail_loads(true);
        let err = dom.mount_stylesheet("css", "a.css").await;
        assert!(matches!(err, Err(DomError::StylesheetLoad(_))));
        assert_eq!(dom.element_href("css").as_deref(), Some("a.css"));
    }
}
