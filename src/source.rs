//! Source normalization: turn any accepted image description into a
//! [`CanonicalImage`].
//!
//! Accepted shapes, checked in this order (shapes overlap, so order matters):
//!
//! 1. falsy value (`null`, `false`, `0`, `""`, `[]`) → no image
//! 2. absolute http(s) URL string → id derived from the last path segment
//! 3. any other string → taken as an asset id
//! 4. object with a string `_ref` → a reference
//! 5. object with a string `_id` → an asset document
//! 6. object with `asset.url` → id derived from that URL
//! 7. object with any other `asset` object → an image with materialized asset
//! 8. anything else → no image
//!
//! `crop` and `hotspot` are then copied from the input object. If either is
//! missing (or `null`) it receives its default, so a [`CanonicalImage`]
//! always carries both.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything that can describe an image.
///
/// Strings cover asset ids and CDN URLs; documents cover references,
/// asset documents, and image objects as stored by the content backend.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Asset id or absolute image URL.
    Ref(String),
    /// JSON document: reference, asset document, or image object.
    Document(Value),
}

impl ImageSource {
    /// JSON rendering used in error messages.
    pub fn to_json_string(&self) -> String {
        match self {
            Self::Ref(s) => Value::String(s.clone()).to_string(),
            Self::Document(v) => v.to_string(),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::Ref(s.to_owned())
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self::Ref(s)
    }
}

impl From<Value> for ImageSource {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::Ref(s),
            other => Self::Document(other),
        }
    }
}

/// Fraction of the original asset trimmed from each edge, each in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractionalCrop {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Focal region: center `(x, y)` and extent, as fractions of the asset.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractionalHotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for FractionalHotspot {
    /// Centered, covering the whole asset.
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// A resolved image: asset id plus crop and hotspot (both always present).
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalImage {
    pub asset_ref: String,
    pub crop: FractionalCrop,
    pub hotspot: FractionalHotspot,
}

/// Normalize a source into a [`CanonicalImage`].
///
/// Returns `None` when the source does not describe an image.
pub fn normalize(source: &ImageSource) -> Option<CanonicalImage> {
    match source {
        ImageSource::Ref(s) => normalize_str(s),
        ImageSource::Document(v) => normalize_value(v),
    }
}

fn normalize_str(s: &str) -> Option<CanonicalImage> {
    if s.is_empty() {
        return None;
    }
    let asset_ref = if is_url(s) {
        log::trace!("source is a URL: {s}");
        url_to_id(s)
    } else {
        log::trace!("source is an asset id: {s}");
        s.to_owned()
    };
    Some(CanonicalImage {
        asset_ref,
        crop: FractionalCrop::default(),
        hotspot: FractionalHotspot::default(),
    })
}

fn normalize_value(value: &Value) -> Option<CanonicalImage> {
    if is_falsy(value) {
        return None;
    }
    let obj = match value {
        Value::String(s) => return normalize_str(s),
        Value::Object(obj) => obj,
        _ => return None,
    };

    let asset_ref = resolve_reference(obj)?;

    Some(CanonicalImage {
        asset_ref,
        crop: read_field(obj, "crop").unwrap_or_default(),
        hotspot: read_field(obj, "hotspot").unwrap_or_default(),
    })
}

/// Rules 4–7: derive the asset id from an object.
fn resolve_reference(obj: &Map<String, Value>) -> Option<String> {
    if let Some(r) = string_field(obj, "_ref") {
        log::trace!("source is a reference: {r}");
        return Some(r.to_owned());
    }
    if let Some(id) = string_field(obj, "_id") {
        log::trace!("source is an asset document: {id}");
        return Some(id.to_owned());
    }

    let asset = obj.get("asset").and_then(Value::as_object)?;
    if let Some(url) = string_field(asset, "url") {
        log::trace!("source is an asset stub with url: {url}");
        return Some(url_to_id(url));
    }

    // Materialized asset: take whichever id it carries. An empty id fails
    // later as a malformed reference rather than as an unresolved source.
    log::trace!("source is an image with materialized asset");
    let id = string_field(asset, "_ref")
        .or_else(|| string_field(asset, "_id"))
        .unwrap_or_default();
    Some(id.to_owned())
}

fn string_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Deserialize an optional sub-object of numbers.
///
/// A missing or non-object value counts as absent. Inside the object, each
/// non-numeric entry is dropped so that field alone takes its default.
fn read_field<T: serde::de::DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let fields = obj.get(key)?.as_object()?;
    let numeric: Map<String, Value> = fields
        .iter()
        .filter(|(_, v)| v.is_number())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    serde_json::from_value(Value::Object(numeric)).ok()
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(_) => false,
    }
}

/// Whether `s` starts with an `http://` or `https://` scheme.
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Derive an asset id from an image URL.
///
/// The last path segment is prefixed with `image-` and its trailing
/// `.<ext>` becomes `-<ext>`:
/// `https://cdn.example.com/images/p/d/abc-200x300.jpg` → `image-abc-200x300-jpg`.
pub fn url_to_id(image_url: &str) -> String {
    let last = url::Url::parse(image_url)
        .ok()
        .and_then(|u| u.path_segments()?.next_back().map(str::to_owned))
        .unwrap_or_else(|| {
            image_url
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_owned()
        });

    let file = match last.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_lowercase()) => {
            format!("{stem}-{ext}")
        }
        _ => last,
    };
    format!("image-{file}")
}
