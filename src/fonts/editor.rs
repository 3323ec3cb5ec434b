//! Font entity editor: the metadata form and its save handler.

use crate::api::nonce::{NonceIssuer, FONT_META_ACTION, FONT_META_FIELD};
use crate::db::entities::font;
use crate::error::Result;

use super::sanitize::sanitize_text_field;
use super::schema::{FontMeta, FontMetaUpdate, FontStyle, FontWeight, MetaField};
use super::slots::{AssetForm, AssetSlot};
use super::store::FontStore;

/// Title of the metadata box on the edit page
pub const META_BOX_TITLE: &str = "Manage Your Font Files";

/// One `<option>` of a selector
#[derive(Debug, serde::Serialize)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One rendered asset slot
#[derive(Debug, serde::Serialize)]
pub struct SlotView {
    pub format: &'static str,
    pub label: String,
    pub input_name: &'static str,
    pub url: String,
    pub upload_visible: bool,
    pub delete_visible: bool,
}

impl SlotView {
    fn from_slot(slot: &AssetSlot) -> Self {
        let format = slot.format();
        Self {
            format: format.tag(),
            label: format.tag().to_ascii_uppercase(),
            input_name: MetaField::Url(format).form_name(),
            url: slot.url().to_string(),
            upload_visible: slot.upload_visible(),
            delete_visible: slot.delete_visible(),
        }
    }
}

/// Everything the edit template needs for the metadata box
#[derive(Debug, serde::Serialize)]
pub struct EditorView {
    pub box_title: &'static str,
    pub nonce_field: &'static str,
    pub nonce: String,
    pub weight_field: &'static str,
    pub style_field: &'static str,
    pub weights: Vec<OptionView>,
    pub styles: Vec<OptionView>,
    pub slots: Vec<SlotView>,
    /// Empty group the browser copies when a variation is added
    pub group_template: Vec<SlotView>,
}

/// Build the metadata form for a font from its persisted state
pub fn render_editor(meta: &FontMeta, nonces: &NonceIssuer) -> EditorView {
    let weight = meta.weight();
    let style = meta.style();
    let mut form = AssetForm::from_meta(meta);
    // The page carries the group an "add variation" produces as its template
    let template = form.add_group();

    EditorView {
        box_title: META_BOX_TITLE,
        nonce_field: FONT_META_FIELD,
        nonce: nonces.create(FONT_META_ACTION),
        weight_field: MetaField::Weight.form_name(),
        style_field: MetaField::Style.form_name(),
        weights: FontWeight::ALL
            .into_iter()
            .map(|w| OptionView {
                value: w.as_str(),
                label: w.label(),
                selected: w == weight,
            })
            .collect(),
        styles: FontStyle::ALL
            .into_iter()
            .map(|s| OptionView {
                value: s.as_str(),
                label: s.label(),
                selected: s == style,
            })
            .collect(),
        slots: form.base().slots().iter().map(SlotView::from_slot).collect(),
        group_template: form.variations()[template]
            .slots()
            .iter()
            .map(SlotView::from_slot)
            .collect(),
    }
}

/// Metadata fields of a submitted edit form
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FontSubmission {
    pub nonce: Option<String>,
    pub update: FontMetaUpdate,
}

impl FontSubmission {
    /// Collect metadata fields from raw form pairs.
    ///
    /// Added variation groups reuse the base field names; the first value of
    /// each name (the base slot, which precedes them in the form) is kept.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut submission = Self::default();
        for (name, value) in pairs {
            if name == FONT_META_FIELD {
                if submission.nonce.is_none() {
                    submission.nonce = Some(value.clone());
                }
                continue;
            }
            let Some(field) = MetaField::from_form_name(name) else {
                continue;
            };
            if submission.update.contains(field) {
                tracing::debug!("Ignoring repeated value for '{}'", name);
                continue;
            }
            submission.update.set(field, value.clone());
        }
        submission
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Token missing or invalid; nothing was written
    Rejected,
    Saved { writes: usize },
}

/// Persist a submitted metadata form for `font`.
///
/// Every present field is sanitized and fully replaces its stored value, an
/// empty string included. Absent fields are left as they are.
pub async fn save_font_meta(
    store: &FontStore,
    nonces: &NonceIssuer,
    font: &font::Model,
    submission: &FontSubmission,
) -> Result<SaveOutcome> {
    let token_ok = submission
        .nonce
        .as_deref()
        .is_some_and(|token| nonces.verify(token, FONT_META_ACTION));
    if !token_ok {
        tracing::warn!("Rejected metadata save for font {}: bad anti-forgery token", font.id);
        return Ok(SaveOutcome::Rejected);
    }

    let mut sanitized = FontMetaUpdate::default();
    for (field, value) in submission.update.present() {
        sanitized.set(field, sanitize_text_field(value));
    }

    if sanitized.is_empty() {
        tracing::debug!("No metadata fields submitted for font {}", font.id);
    }
    let writes = store.apply_update(font.id, &sanitized).await?;
    tracing::info!("Saved {} metadata field(s) for font {}", writes, font.id);
    Ok(SaveOutcome::Saved { writes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;
    use crate::fonts::schema::FontFormat;
    use std::sync::Arc;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn fixture() -> (FontStore, NonceIssuer, font::Model) {
        let store = FontStore::new(Arc::new(init_memory_database().await.unwrap()));
        let font = store.create_font("Inter").await.unwrap();
        (store, NonceIssuer::new("test-secret"), font)
    }

    fn selected(options: &[OptionView]) -> Vec<&str> {
        options.iter().filter(|o| o.selected).map(|o| o.value).collect()
    }

    #[test]
    fn test_render_defaults() {
        let nonces = NonceIssuer::new("test-secret");
        let view = render_editor(&FontMeta::default(), &nonces);

        assert_eq!(selected(&view.weights), vec!["normal"]);
        assert_eq!(selected(&view.styles), vec!["normal"]);
        assert_eq!(view.weights.len(), 11);
        assert_eq!(view.styles.len(), 3);
        assert!(nonces.verify(&view.nonce, FONT_META_ACTION));

        let formats: Vec<&str> = view.slots.iter().map(|s| s.format).collect();
        assert_eq!(formats, vec!["woff", "woff2", "ttf", "svg", "eot"]);
        assert!(view.slots.iter().all(|s| s.upload_visible && !s.delete_visible));
        assert_eq!(view.slots[1].label, "WOFF2");
        assert_eq!(view.slots[1].input_name, "font_url_woff2");
    }

    #[test]
    fn test_render_stored_state() {
        let mut meta = FontMeta::default();
        meta.set(MetaField::Weight, "bold".to_string());
        meta.set(MetaField::Style, "oblique".to_string());
        meta.set(MetaField::Url(FontFormat::Svg), "/media/4/a.svg".to_string());

        let view = render_editor(&meta, &NonceIssuer::new("s"));
        assert_eq!(selected(&view.weights), vec!["bold"]);
        assert_eq!(selected(&view.styles), vec!["oblique"]);

        let svg = &view.slots[FontFormat::Svg.index()];
        assert_eq!(svg.url, "/media/4/a.svg");
        assert!(!svg.upload_visible);
        assert!(svg.delete_visible);

        // The group template never carries stored URLs
        assert!(view.group_template.iter().all(|s| s.url.is_empty() && s.upload_visible));
    }

    #[test]
    fn test_submission_first_value_wins() {
        let submission = FontSubmission::from_pairs(&pairs(&[
            ("font_meta_nonce", "tok"),
            ("font_weight", "700"),
            ("font_url_woff", "/media/1/base.woff"),
            ("font_url_woff", ""),
            ("post_title", "ignored here"),
        ]));

        assert_eq!(submission.nonce.as_deref(), Some("tok"));
        assert_eq!(submission.update.get(MetaField::Weight), Some("700"));
        assert_eq!(
            submission.update.get(MetaField::Url(FontFormat::Woff)),
            Some("/media/1/base.woff")
        );
        assert_eq!(submission.update.get(MetaField::Style), None);
    }

    #[tokio::test]
    async fn test_round_trip_every_format() {
        let (store, nonces, font) = fixture().await;

        for format in FontFormat::ALL {
            let url = format!("/media/7/Inter.{}", format.tag());
            let token = nonces.create(FONT_META_ACTION);
            let submission = FontSubmission::from_pairs(&pairs(&[
                ("font_meta_nonce", token.as_str()),
                (MetaField::Url(format).form_name(), url.as_str()),
            ]));
            let outcome = save_font_meta(&store, &nonces, &font, &submission).await.unwrap();
            assert_eq!(outcome, SaveOutcome::Saved { writes: 1 });

            let view = render_editor(&store.load_meta(font.id).await.unwrap(), &nonces);
            assert_eq!(view.slots[format.index()].url, url);
        }
    }

    #[tokio::test]
    async fn test_empty_overwrites_but_absent_keeps() {
        let (store, nonces, font) = fixture().await;
        store.write_field(font.id, MetaField::Url(FontFormat::Ttf), "/media/1/a.ttf").await.unwrap();
        store.write_field(font.id, MetaField::Url(FontFormat::Eot), "/media/2/a.eot").await.unwrap();
        store.write_field(font.id, MetaField::Weight, "300").await.unwrap();

        let token = nonces.create(FONT_META_ACTION);
        let submission = FontSubmission::from_pairs(&pairs(&[
            ("font_meta_nonce", token.as_str()),
            ("font_url_ttf", ""),
        ]));
        save_font_meta(&store, &nonces, &font, &submission).await.unwrap();

        let meta = store.load_meta(font.id).await.unwrap();
        assert_eq!(meta.url(FontFormat::Ttf), "");
        assert_eq!(meta.url(FontFormat::Eot), "/media/2/a.eot");
        assert_eq!(meta.weight(), FontWeight::W300);
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_changes_nothing() {
        let (store, nonces, font) = fixture().await;
        store.write_field(font.id, MetaField::Style, "italic").await.unwrap();
        let before = store.load_meta(font.id).await.unwrap();

        let tokens = [
            None,
            Some("forged".to_string()),
            Some(nonces.create("other_action")),
        ];
        for token in &tokens {
            let mut items = vec![("font_style", "oblique"), ("font_url_woff", "/x.woff")];
            if let Some(t) = token {
                items.push(("font_meta_nonce", t.as_str()));
            }
            let submission = FontSubmission::from_pairs(&pairs(&items));
            let outcome = save_font_meta(&store, &nonces, &font, &submission).await.unwrap();
            assert_eq!(outcome, SaveOutcome::Rejected);
        }

        assert_eq!(store.load_meta(font.id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_values_are_sanitized() {
        let (store, nonces, font) = fixture().await;
        let token = nonces.create(FONT_META_ACTION);
        let submission = FontSubmission::from_pairs(&pairs(&[
            ("font_meta_nonce", token.as_str()),
            ("font_weight", " 900\n"),
            ("font_url_svg", "/media/1/a.svg<script>alert(1)</script>"),
        ]));
        save_font_meta(&store, &nonces, &font, &submission).await.unwrap();

        let meta = store.load_meta(font.id).await.unwrap();
        assert_eq!(meta.weight.as_deref(), Some("900"));
        assert_eq!(meta.url(FontFormat::Svg), "/media/1/a.svg");
    }
}
