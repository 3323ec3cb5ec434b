//! Slot-group state model for the font asset editor.
//!
//! The editor page is rendered from an [`AssetForm`] built from persisted
//! metadata. The server only builds and extends forms; the slot and group
//! transitions here are the reference definition that the embedded
//! `font_edit.html` script mirrors on the DOM. Every transition
//! addresses one slot or one group and leaves the rest of the form untouched.

#![allow(dead_code)] // Browser-side transitions are exercised by tests only

use super::schema::{file_extension, FontFormat, FontMeta};

/// Descriptor returned by the asset picker for the chosen file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PickedAsset {
    pub id: i32,
    pub filename: String,
    pub url: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Invalid file type! Please upload a .{expected} file.")]
    FormatMismatch { expected: FontFormat, found: String },

    #[error("No variation group at index {0}")]
    NoSuchGroup(usize),
}

/// One (format, url) pair with its upload/delete affordances.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssetSlot {
    format: FontFormat,
    url: String,
}

impl AssetSlot {
    pub fn new(format: FontFormat, url: impl Into<String>) -> Self {
        Self {
            format,
            url: url.into(),
        }
    }

    pub fn empty(format: FontFormat) -> Self {
        Self::new(format, String::new())
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn upload_visible(&self) -> bool {
        self.url.is_empty()
    }

    pub fn delete_visible(&self) -> bool {
        !self.url.is_empty()
    }

    /// Accept a picked file if its extension names this slot's format.
    ///
    /// On mismatch the slot keeps its previous URL.
    pub fn select(&mut self, picked: &PickedAsset) -> Result<(), SlotError> {
        if !self.format.matches_filename(&picked.filename) {
            return Err(SlotError::FormatMismatch {
                expected: self.format,
                found: file_extension(&picked.filename),
            });
        }
        self.url = picked.url.clone();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.url.clear();
    }
}

/// Five slots, one per format, in the fixed format order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlotGroup {
    slots: Vec<AssetSlot>,
}

impl SlotGroup {
    pub fn from_meta(meta: &FontMeta) -> Self {
        Self {
            slots: FontFormat::ALL
                .into_iter()
                .map(|f| AssetSlot::new(f, meta.url(f)))
                .collect(),
        }
    }

    /// Template copy: same formats and order, every slot emptied.
    pub fn cloned_empty(&self) -> Self {
        Self {
            slots: self.slots.iter().map(|s| AssetSlot::empty(s.format)).collect(),
        }
    }

    pub fn slots(&self) -> &[AssetSlot] {
        &self.slots
    }

    pub fn slot(&self, format: FontFormat) -> &AssetSlot {
        &self.slots[format.index()]
    }

    pub fn slot_mut(&mut self, format: FontFormat) -> &mut AssetSlot {
        &mut self.slots[format.index()]
    }
}

/// Which group a slot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupRef {
    Base,
    Variation(usize),
}

/// Whole editor form: the base group plus added variation groups.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssetForm {
    base: SlotGroup,
    variations: Vec<SlotGroup>,
}

impl AssetForm {
    pub fn from_meta(meta: &FontMeta) -> Self {
        Self {
            base: SlotGroup::from_meta(meta),
            variations: Vec::new(),
        }
    }

    pub fn base(&self) -> &SlotGroup {
        &self.base
    }

    pub fn variations(&self) -> &[SlotGroup] {
        &self.variations
    }

    fn group_mut(&mut self, group: GroupRef) -> Result<&mut SlotGroup, SlotError> {
        match group {
            GroupRef::Base => Ok(&mut self.base),
            GroupRef::Variation(i) => self.variations.get_mut(i).ok_or(SlotError::NoSuchGroup(i)),
        }
    }

    pub fn select(
        &mut self,
        group: GroupRef,
        format: FontFormat,
        picked: &PickedAsset,
    ) -> Result<(), SlotError> {
        self.group_mut(group)?.slot_mut(format).select(picked)
    }

    pub fn clear(&mut self, group: GroupRef, format: FontFormat) -> Result<(), SlotError> {
        self.group_mut(group)?.slot_mut(format).clear();
        Ok(())
    }

    /// Append an empty variation group and return its index.
    pub fn add_group(&mut self) -> usize {
        self.variations.push(self.base.cloned_empty());
        self.variations.len() - 1
    }

    pub fn delete_group(&mut self, index: usize) -> Result<SlotGroup, SlotError> {
        if index >= self.variations.len() {
            return Err(SlotError::NoSuchGroup(index));
        }
        Ok(self.variations.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::schema::MetaField;

    fn picked(filename: &str) -> PickedAsset {
        PickedAsset {
            id: 1,
            filename: filename.to_string(),
            url: format!("http://localhost:8080/media/1/{}", filename),
            mime_type: "font/ttf".to_string(),
        }
    }

    #[test]
    fn test_select_then_clear_toggles_controls() {
        let mut slot = AssetSlot::empty(FontFormat::Ttf);
        assert!(slot.upload_visible());
        assert!(!slot.delete_visible());

        slot.select(&picked("Inter.ttf")).unwrap();
        assert_eq!(slot.url(), "http://localhost:8080/media/1/Inter.ttf");
        assert!(!slot.upload_visible());
        assert!(slot.delete_visible());

        slot.clear();
        assert_eq!(slot.url(), "");
        assert!(slot.upload_visible());
        assert!(!slot.delete_visible());
    }

    #[test]
    fn test_mismatch_keeps_previous_state() {
        let mut slot = AssetSlot::new(FontFormat::Woff2, "/media/2/old.woff2");
        let err = slot.select(&picked("font.woff2.bak")).unwrap_err();
        assert_eq!(
            err,
            SlotError::FormatMismatch {
                expected: FontFormat::Woff2,
                found: "bak".to_string()
            }
        );
        assert_eq!(err.to_string(), "Invalid file type! Please upload a .woff2 file.");
        assert_eq!(slot.url(), "/media/2/old.woff2");

        slot.select(&picked("Font.WOFF2")).unwrap();
        assert!(slot.url().ends_with("Font.WOFF2"));
    }

    #[test]
    fn test_form_from_meta_prefills_slots() {
        let mut meta = FontMeta::default();
        meta.set(MetaField::Url(FontFormat::Svg), "/media/9/a.svg".to_string());
        let form = AssetForm::from_meta(&meta);

        let formats: Vec<FontFormat> = form.base().slots().iter().map(|s| s.format()).collect();
        assert_eq!(formats, FontFormat::ALL.to_vec());
        assert_eq!(form.base().slot(FontFormat::Svg).url(), "/media/9/a.svg");
        assert!(form.base().slot(FontFormat::Svg).delete_visible());
        assert!(form.base().slot(FontFormat::Woff).upload_visible());
    }

    #[test]
    fn test_added_group_is_empty_copy_of_template() {
        let mut meta = FontMeta::default();
        meta.set(MetaField::Url(FontFormat::Woff), "/media/1/a.woff".to_string());
        let mut form = AssetForm::from_meta(&meta);

        let index = form.add_group();
        let group = &form.variations()[index];
        for (slot, format) in group.slots().iter().zip(FontFormat::ALL) {
            assert_eq!(slot.format(), format);
            assert!(slot.upload_visible());
            assert!(!slot.delete_visible());
        }
    }

    #[test]
    fn test_add_then_delete_group_restores_form() {
        let form = AssetForm::from_meta(&FontMeta::default());
        let mut edited = form.clone();

        let index = edited.add_group();
        edited
            .select(GroupRef::Variation(index), FontFormat::Ttf, &picked("Bold.ttf"))
            .unwrap();
        edited.delete_group(index).unwrap();

        assert_eq!(edited, form);
    }

    #[test]
    fn test_groups_are_independent() {
        let mut form = AssetForm::from_meta(&FontMeta::default());
        let a = form.add_group();
        let b = form.add_group();

        form.select(GroupRef::Variation(b), FontFormat::Eot, &picked("x.eot")).unwrap();
        assert!(form.variations()[a].slot(FontFormat::Eot).upload_visible());
        assert!(form.base().slot(FontFormat::Eot).upload_visible());

        form.delete_group(a).unwrap();
        assert_eq!(form.variations().len(), 1);
        assert!(form.variations()[0].slot(FontFormat::Eot).delete_visible());

        assert_eq!(form.delete_group(5), Err(SlotError::NoSuchGroup(5)));
        assert!(form.clear(GroupRef::Variation(3), FontFormat::Eot).is_err());
    }
}
