//! Pointer input model
//!
//! Host toolkits deliver pointer events against a tree of tagged elements.
//! The core only needs the ancestor chain of the element under the pointer,
//! so a hit is reported as an [`ElementPath`] from the innermost element up
//! to the window root.

use serde::{Deserialize, Serialize};

/// Pointer identifier as delivered by the host (mouse = 0, touches > 0)
pub type PointerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One element in a hit path: a name and its style classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub classes: &'static [&'static str],
}

impl Element {
    pub const fn new(name: &'static str, classes: &'static [&'static str]) -> Self {
        Self { name, classes }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }
}

/// Elements under the pointer, innermost first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementPath(Vec<Element>);

impl ElementPath {
    pub fn new(elements: Vec<Element>) -> Self {
        Self(elements)
    }

    /// Innermost element, the event target
    pub fn target(&self) -> Option<&Element> {
        self.0.first()
    }

    /// Walk from the target towards the root looking for `class`
    pub fn any_ancestor_has_class(&self, class: &str) -> bool {
        self.0.iter().any(|e| e.has_class(class))
    }

    /// Walk from the target towards the root looking for an element by name
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: Element = Element::new("close-btn", &["window-button"]);
    const CONTROLS: Element = Element::new("window-controls", &["window-controls"]);
    const TITLE: Element = Element::new("title-bar", &["title-bar"]);

    #[test]
    fn test_class_lookup_walks_ancestors() {
        let path = ElementPath::new(vec![BUTTON, CONTROLS, TITLE]);
        assert_eq!(path.target(), Some(&BUTTON));
        assert!(path.any_ancestor_has_class("window-controls"));
        assert!(path.contains("title-bar"));
        assert!(!path.any_ancestor_has_class("resize-handle"));
    }

    #[test]
    fn test_empty_path() {
        let path = ElementPath::default();
        assert!(path.is_empty());
        assert!(path.target().is_none());
        assert!(!path.contains("title-bar"));
    }
}
