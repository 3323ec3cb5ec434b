//! Closed metadata schema for font entities.
//!
//! Every metadata key the editor reads or writes is derived from [`MetaField`];
//! stored values stay plain text.

use std::fmt;

/// Font file formats a font entity can carry, in render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Woff,
    Woff2,
    Ttf,
    Svg,
    Eot,
}

impl FontFormat {
    /// Every format, in the fixed slot order.
    pub const ALL: [FontFormat; 5] = [
        FontFormat::Woff,
        FontFormat::Woff2,
        FontFormat::Ttf,
        FontFormat::Svg,
        FontFormat::Eot,
    ];

    /// Lower-case tag, also the expected file extension.
    pub fn tag(self) -> &'static str {
        match self {
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
            FontFormat::Ttf => "ttf",
            FontFormat::Svg => "svg",
            FontFormat::Eot => "eot",
        }
    }

    /// MIME type registered with the upload allowlist.
    pub fn mime_type(self) -> &'static str {
        match self {
            FontFormat::Woff => "font/woff",
            FontFormat::Woff2 => "font/woff2",
            FontFormat::Ttf => "font/ttf",
            FontFormat::Svg => "image/svg+xml",
            FontFormat::Eot => "application/vnd.ms-fontobject",
        }
    }

    /// Position of this format inside a slot group.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether `filename`'s extension names this format.
    ///
    /// Only the final dot-segment counts and case is ignored, so `Font.WOFF2`
    /// matches woff2 while `font.woff2.bak` does not.
    pub fn matches_filename(self, filename: &str) -> bool {
        file_extension(filename) == self.tag()
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Lower-cased final dot-segment of a filename.
///
/// A name without any dot yields the whole name.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// CSS font-weight values offered by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    W100,
    W200,
    W300,
    W400,
    W500,
    W600,
    W700,
    W800,
    W900,
    Bold,
}

impl FontWeight {
    pub const ALL: [FontWeight; 11] = [
        FontWeight::Normal,
        FontWeight::W100,
        FontWeight::W200,
        FontWeight::W300,
        FontWeight::W400,
        FontWeight::W500,
        FontWeight::W600,
        FontWeight::W700,
        FontWeight::W800,
        FontWeight::W900,
        FontWeight::Bold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::W100 => "100",
            FontWeight::W200 => "200",
            FontWeight::W300 => "300",
            FontWeight::W400 => "400",
            FontWeight::W500 => "500",
            FontWeight::W600 => "600",
            FontWeight::W700 => "700",
            FontWeight::W800 => "800",
            FontWeight::W900 => "900",
            FontWeight::Bold => "bold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.as_str() == value)
    }

    /// Label shown in the selector.
    pub fn label(self) -> &'static str {
        match self {
            FontWeight::Normal => "Normal",
            FontWeight::Bold => "Bold",
            other => other.as_str(),
        }
    }
}

/// CSS font-style values offered by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Normal, FontStyle::Italic, FontStyle::Oblique];

    pub fn as_str(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            FontStyle::Normal => "Normal",
            FontStyle::Italic => "Italic",
            FontStyle::Oblique => "Oblique",
        }
    }
}

/// A metadata field of a font entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaField {
    Weight,
    Style,
    Url(FontFormat),
}

impl MetaField {
    /// Every field, in the order the save handler writes them.
    pub fn all() -> impl Iterator<Item = MetaField> {
        FontFormat::ALL
            .into_iter()
            .map(MetaField::Url)
            .chain([MetaField::Weight, MetaField::Style])
    }

    /// Key under which the value is stored.
    pub fn meta_key(self) -> &'static str {
        match self {
            MetaField::Weight => "_font_weight",
            MetaField::Style => "_font_style",
            MetaField::Url(FontFormat::Woff) => "_font_url_woff",
            MetaField::Url(FontFormat::Woff2) => "_font_url_woff2",
            MetaField::Url(FontFormat::Ttf) => "_font_url_ttf",
            MetaField::Url(FontFormat::Svg) => "_font_url_svg",
            MetaField::Url(FontFormat::Eot) => "_font_url_eot",
        }
    }

    /// Name of the form input carrying this field.
    pub fn form_name(self) -> &'static str {
        match self {
            MetaField::Weight => "font_weight",
            MetaField::Style => "font_style",
            MetaField::Url(FontFormat::Woff) => "font_url_woff",
            MetaField::Url(FontFormat::Woff2) => "font_url_woff2",
            MetaField::Url(FontFormat::Ttf) => "font_url_ttf",
            MetaField::Url(FontFormat::Svg) => "font_url_svg",
            MetaField::Url(FontFormat::Eot) => "font_url_eot",
        }
    }

    pub fn from_meta_key(key: &str) -> Option<Self> {
        Self::all().find(|f| f.meta_key() == key)
    }

    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::all().find(|f| f.form_name() == name)
    }
}

/// Persisted metadata of one font, as loaded from the store.
///
/// Weight and style keep the raw stored text; [`FontMeta::weight`] and
/// [`FontMeta::style`] resolve it against the offered values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontMeta {
    pub weight: Option<String>,
    pub style: Option<String>,
    pub urls: [String; 5],
}

impl FontMeta {
    /// Stored weight, or `normal` when unset or not one of the offered values.
    pub fn weight(&self) -> FontWeight {
        self.weight
            .as_deref()
            .and_then(FontWeight::parse)
            .unwrap_or_default()
    }

    pub fn style(&self) -> FontStyle {
        self.style
            .as_deref()
            .and_then(FontStyle::parse)
            .unwrap_or_default()
    }

    pub fn url(&self, format: FontFormat) -> &str {
        &self.urls[format.index()]
    }

    /// Apply a raw stored value to the matching field.
    pub fn set(&mut self, field: MetaField, value: String) {
        match field {
            MetaField::Weight => self.weight = Some(value),
            MetaField::Style => self.style = Some(value),
            MetaField::Url(format) => self.urls[format.index()] = value,
        }
    }

    /// Formats with a non-empty URL.
    pub fn formats_set(&self) -> Vec<FontFormat> {
        FontFormat::ALL
            .into_iter()
            .filter(|f| !self.url(*f).is_empty())
            .collect()
    }
}

/// Fields present in one submission; absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontMetaUpdate {
    weight: Option<String>,
    style: Option<String>,
    urls: [Option<String>; 5],
}

impl FontMetaUpdate {
    pub fn set(&mut self, field: MetaField, value: String) {
        let slot = match field {
            MetaField::Weight => &mut self.weight,
            MetaField::Style => &mut self.style,
            MetaField::Url(format) => &mut self.urls[format.index()],
        };
        *slot = Some(value);
    }

    pub fn get(&self, field: MetaField) -> Option<&str> {
        match field {
            MetaField::Weight => self.weight.as_deref(),
            MetaField::Style => self.style.as_deref(),
            MetaField::Url(format) => self.urls[format.index()].as_deref(),
        }
    }

    pub fn contains(&self, field: MetaField) -> bool {
        self.get(field).is_some()
    }

    /// Present fields with their values, URLs first then weight and style.
    pub fn present(&self) -> impl Iterator<Item = (MetaField, &str)> + '_ {
        MetaField::all().filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}
