//! Application catalog
//!
//! Applications are static content providers. The window manager only needs
//! their identity, a title and a default window size; content is opaque.

use tracing::warn;

use crate::shared::Size;

pub const DEFAULT_WINDOW_SIZE: Size = Size {
    width: 600.0,
    height: 400.0,
};

pub trait Application {
    /// Registry key, unique per catalog
    fn app_name(&self) -> &str;

    /// Window title
    fn display_name(&self) -> &str;

    /// Dock label; defaults to the window title
    fn dock_label(&self) -> &str {
        self.display_name()
    }

    fn icon(&self) -> &str;

    fn default_size(&self) -> Size {
        DEFAULT_WINDOW_SIZE
    }
}

/// Application with fixed metadata
#[derive(Debug, Clone)]
pub struct StaticApp {
    pub name: &'static str,
    pub title: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub size: Size,
}

impl Application for StaticApp {
    fn app_name(&self) -> &str {
        self.name
    }

    fn display_name(&self) -> &str {
        self.title
    }

    fn dock_label(&self) -> &str {
        self.label
    }

    fn icon(&self) -> &str {
        self.icon
    }

    fn default_size(&self) -> Size {
        self.size
    }
}

const fn app(
    name: &'static str,
    title: &'static str,
    label: &'static str,
    icon: &'static str,
    width: f32,
    height: f32,
) -> StaticApp {
    StaticApp {
        name,
        title,
        label,
        icon,
        size: Size { width, height },
    }
}

const BUILTIN: [StaticApp; 7] = [
    app("Mail", "Coalition Briefings", "Mail & Briefings", "📧", 700.0, 500.0),
    app("Chat", "Coalition Chat", "Chat & DMs", "💬", 500.0, 600.0),
    app("Polling", "Polling Dashboard", "Polling Dashboard", "📊", 800.0, 600.0),
    app("Calendar", "Coalition Calendar", "Calendar & Events", "📅", 600.0, 400.0),
    app("Cabinet", "Cabinet Management", "Cabinet Management", "🏛️", 600.0, 400.0),
    app("Policy", "Policy Builder", "Policy Builder", "📋", 600.0, 400.0),
    app("Media", "Media Monitor", "Media Monitor", "📺", 600.0, 400.0),
];

/// Applications the shell can open, in dock order
#[derive(Default)]
pub struct AppCatalog {
    apps: Vec<Box<dyn Application>>,
}

impl AppCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for app in BUILTIN {
            catalog.register(Box::new(app));
        }
        catalog
    }

    /// Returns `false` if an application of that name is already present
    pub fn register(&mut self, app: Box<dyn Application>) -> bool {
        if self.get(app.app_name()).is_some() {
            warn!("Application {} is already in the catalog", app.app_name());
            return false;
        }
        self.apps.push(app);
        true
    }

    pub fn get(&self, name: &str) -> Option<&dyn Application> {
        self.apps
            .iter()
            .find(|a| a.app_name() == name)
            .map(|a| a.as_ref())
    }

    /// Case-insensitive lookup for typed names
    pub fn resolve(&self, name: &str) -> Option<&dyn Application> {
        self.get(name).or_else(|| {
            self.apps
                .iter()
                .find(|a| a.app_name().eq_ignore_ascii_case(name))
                .map(|a| a.as_ref())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Application> {
        self.apps.iter().map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl std::fmt::Debug for AppCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter().map(|a| a.app_name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Notes;

    impl Application for Notes {
        fn app_name(&self) -> &str {
            "Notes"
        }

        fn display_name(&self) -> &str {
            "Cabinet Notes"
        }

        fn icon(&self) -> &str {
            "📝"
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = AppCatalog::builtin();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.get("Mail").unwrap().default_size(), Size::new(700.0, 500.0));
        assert_eq!(catalog.get("Chat").unwrap().default_size(), Size::new(500.0, 600.0));
        assert_eq!(catalog.get("Polling").unwrap().default_size(), Size::new(800.0, 600.0));
        assert_eq!(catalog.get("Media").unwrap().default_size(), DEFAULT_WINDOW_SIZE);
        assert_eq!(catalog.get("Mail").unwrap().display_name(), "Coalition Briefings");
        assert!(catalog.get("mail").is_none());
        assert_eq!(catalog.resolve("mail").map(|a| a.app_name()), Some("Mail"));
    }

    #[test]
    fn test_trait_defaults_and_duplicates() {
        let mut catalog = AppCatalog::new();
        assert!(catalog.register(Box::new(Notes)));
        assert!(!catalog.register(Box::new(Notes)));

        let notes = catalog.get("Notes").unwrap();
        assert_eq!(notes.default_size(), DEFAULT_WINDOW_SIZE);
        assert_eq!(notes.dock_label(), "Cabinet Notes");
    }
}
