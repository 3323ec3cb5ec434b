//! Explicit extension registration.
//!
//! Content types, upload MIME mappings and admin stylesheets are collected in
//! a [`Registry`] once at startup and handed to the application state; nothing
//! registers itself implicitly.

use std::collections::BTreeMap;

use crate::fonts::schema::FontFormat;

/// Fields a content type supports besides its metadata
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Supports {
    Title,
}

/// Display labels of a content type
#[derive(Clone, Debug, serde::Serialize)]
pub struct Labels {
    pub name: &'static str,
    pub singular_name: &'static str,
    pub add_new: &'static str,
    pub add_new_item: &'static str,
    pub edit_item: &'static str,
    pub view_item: &'static str,
    pub not_found: &'static str,
}

/// A registered content type
#[derive(Clone, Debug, serde::Serialize)]
pub struct ContentType {
    pub slug: &'static str,
    pub labels: Labels,
    pub menu_icon: &'static str,
    pub show_in_menu: bool,
    pub has_archive: bool,
    pub supports: Vec<Supports>,
}

/// Extension → MIME type mappings accepted by the upload pipeline
#[derive(Clone, Debug)]
pub struct MimeAllowlist {
    mimes: BTreeMap<String, String>,
}

impl Default for MimeAllowlist {
    /// Host defaults: common image and document types
    fn default() -> Self {
        let mut list = Self {
            mimes: BTreeMap::new(),
        };
        for (exts, mime) in [
            ("jpg|jpeg|jpe", "image/jpeg"),
            ("png", "image/png"),
            ("gif", "image/gif"),
            ("webp", "image/webp"),
            ("pdf", "application/pdf"),
            ("txt", "text/plain"),
        ] {
            for ext in exts.split('|') {
                list.register(ext, mime);
            }
        }
        list
    }
}

impl MimeAllowlist {
    pub fn register(&mut self, extension: &str, mime_type: &str) {
        self.mimes
            .insert(extension.to_ascii_lowercase(), mime_type.to_string());
    }

    /// MIME type for a filename, by its final extension.
    /// A name without a `.` has no extension and matches nothing.
    pub fn mime_for(&self, filename: &str) -> Option<&str> {
        let (_, extension) = filename.rsplit_once('.')?;
        self.mimes
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.mimes.keys().map(String::as_str)
    }
}

/// A stylesheet linked from every admin page
#[derive(Clone, Debug, serde::Serialize)]
pub struct Stylesheet {
    pub handle: &'static str,
    pub src: &'static str,
    pub version: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    styles: Vec<Stylesheet>,
}

impl StyleRegistry {
    /// Register a stylesheet; a handle registered twice keeps its first entry
    pub fn register(&mut self, style: Stylesheet) {
        if self.styles.iter().all(|s| s.handle != style.handle) {
            self.styles.push(style);
        }
    }

    pub fn all(&self) -> &[Stylesheet] {
        &self.styles
    }
}

/// Everything the admin host knows about its extensions
#[derive(Clone, Debug, Default)]
pub struct Registry {
    pub content_types: Vec<ContentType>,
    pub mimes: MimeAllowlist,
    pub styles: StyleRegistry,
}

impl Registry {
    pub fn content_type(&self, slug: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|t| t.slug == slug)
    }
}

/// Slug of the font content type
pub const FONT_TYPE: &str = "font";

/// Path the admin stylesheet is served from
pub const ADMIN_STYLESHEET_PATH: &str = "/admin/assets/font-manager.css";

/// Register the font manager with the host registry
pub fn register_font_manager(registry: &mut Registry) {
    registry.content_types.push(font_content_type());

    for format in FontFormat::ALL {
        registry.mimes.register(format.tag(), format.mime_type());
    }

    registry.styles.register(Stylesheet {
        handle: "font-manager-css",
        src: ADMIN_STYLESHEET_PATH,
        version: "1.0.0",
    });

    tracing::debug!(
        "Registered content type '{}' and {} font MIME types",
        FONT_TYPE,
        FontFormat::ALL.len()
    );
}

fn font_content_type() -> ContentType {
    ContentType {
        slug: FONT_TYPE,
        labels: Labels {
            name: "Fonts",
            singular_name: "Font",
            add_new: "Add New Font",
            add_new_item: "Add New Font",
            edit_item: "Edit Font",
            view_item: "View Font",
            not_found: "Sorry, no fonts have been added.",
        },
        menu_icon: "B",
        show_in_menu: true,
        has_archive: false,
        supports: vec![Supports::Title],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_mimes_are_registered() {
        let mut registry = Registry::default();
        assert_eq!(registry.mimes.mime_for("a.woff2"), None);

        register_font_manager(&mut registry);
        let mimes = &registry.mimes;
        assert_eq!(mimes.mime_for("a.woff"), Some("font/woff"));
        assert_eq!(mimes.mime_for("A.WOFF2"), Some("font/woff2"));
        assert_eq!(mimes.mime_for("a.ttf"), Some("font/ttf"));
        assert_eq!(mimes.mime_for("a.svg"), Some("image/svg+xml"));
        assert_eq!(mimes.mime_for("a.eot"), Some("application/vnd.ms-fontobject"));
        // Host defaults survive
        assert_eq!(mimes.mime_for("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(mimes.mime_for("font.otf"), None);
        // The whole name is never taken as the extension
        assert_eq!(mimes.mime_for("svg"), None);
        assert_eq!(mimes.mime_for("woff"), None);
        assert_eq!(mimes.mime_for("font."), None);
    }

    #[test]
    fn test_font_content_type() {
        let mut registry = Registry::default();
        register_font_manager(&mut registry);

        let font = registry.content_type(FONT_TYPE).unwrap();
        assert_eq!(font.labels.name, "Fonts");
        assert_eq!(font.labels.not_found, "Sorry, no fonts have been added.");
        assert!(font.show_in_menu);
        assert!(!font.has_archive);
        assert_eq!(font.supports, vec![Supports::Title]);
    }

    #[test]
    fn test_stylesheet_registered_once() {
        let mut registry = Registry::default();
        register_font_manager(&mut registry);
        registry.styles.register(Stylesheet {
            handle: "font-manager-css",
            src: "/elsewhere.css",
            version: "2",
        });

        assert_eq!(registry.styles.all().len(), 1);
        assert_eq!(registry.styles.all()[0].src, ADMIN_STYLESHEET_PATH);
    }
}
