//! Transform options: the typed record handed to URL resolution.
//!
//! Options arrive either through [`ImageUrlBuilder`](crate::ImageUrlBuilder)
//! setters or as a flat key/value map ([`TransformOptions::from_map`]) whose
//! keys may be canonical option names (`width`, `minHeight`) or their URL
//! names (`w`, `min-h`). The [`Param`] table is the single declaration of
//! both names and of the order parameters are serialized in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::fit::PixelRect;
use crate::source::ImageSource;

/// A serialized URL parameter, in serialization order.
///
/// Each has a canonical option name and the name used in the URL.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    Width,
    Height,
    Format,
    Download,
    Blur,
    Sharpen,
    Invert,
    Orientation,
    MinHeight,
    MaxHeight,
    MinWidth,
    MaxWidth,
    Quality,
    Fit,
    Crop,
    Saturation,
    Auto,
    Dpr,
    Pad,
    Frame,
}

impl Param {
    /// All parameters in serialization order.
    pub const ALL: [Self; 20] = [
        Self::Width,
        Self::Height,
        Self::Format,
        Self::Download,
        Self::Blur,
        Self::Sharpen,
        Self::Invert,
        Self::Orientation,
        Self::MinHeight,
        Self::MaxHeight,
        Self::MinWidth,
        Self::MaxWidth,
        Self::Quality,
        Self::Fit,
        Self::Crop,
        Self::Saturation,
        Self::Auto,
        Self::Dpr,
        Self::Pad,
        Self::Frame,
    ];

    /// Canonical option name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Format => "format",
            Self::Download => "download",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::Invert => "invert",
            Self::Orientation => "orientation",
            Self::MinHeight => "minHeight",
            Self::MaxHeight => "maxHeight",
            Self::MinWidth => "minWidth",
            Self::MaxWidth => "maxWidth",
            Self::Quality => "quality",
            Self::Fit => "fit",
            Self::Crop => "crop",
            Self::Saturation => "saturation",
            Self::Auto => "auto",
            Self::Dpr => "dpr",
            Self::Pad => "pad",
            Self::Frame => "frame",
        }
    }

    /// Name used in the URL query string.
    pub const fn alias(self) -> &'static str {
        match self {
            Self::Width => "w",
            Self::Height => "h",
            Self::Format => "fm",
            Self::Download => "dl",
            Self::Sharpen => "sharp",
            Self::Orientation => "or",
            Self::MinHeight => "min-h",
            Self::MaxHeight => "max-h",
            Self::MinWidth => "min-w",
            Self::MaxWidth => "max-w",
            Self::Quality => "q",
            Self::Saturation => "sat",
            other => other.name(),
        }
    }

    /// Look up a parameter by canonical name or URL name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key || p.alias() == key)
    }

    /// Rewrite a URL name to its canonical option name. Other keys pass through.
    pub fn canonical_key(key: &str) -> &str {
        match Self::from_key(key) {
            Some(p) => p.name(),
            None => key,
        }
    }

    /// Whether the URL name differs from the canonical name.
    pub fn has_distinct_alias(self) -> bool {
        self.alias() != self.name()
    }
}

/// A raw parameter value as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl ParamValue {
    /// Numeric view: numbers, and strings that parse as finite numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Self::Bool(_) => None,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&crate::query::format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// How the CDN fits the image into the requested size.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FitMode {
    Clip,
    Crop,
    Fill,
    FillMax,
    Max,
    Scale,
    Min,
}

/// Which part of the image the CDN keeps when cropping.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CropMode {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    FocalPoint,
    Entropy,
}

/// Automatic transforms.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AutoMode {
    /// Serve the best format the client accepts.
    Format,
}

macro_rules! keyword_enum {
    ($ty:ident, $err:ident, { $($variant:ident => $kw:literal),+ $(,)? }) => {
        impl $ty {
            /// Keyword used in the URL.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $kw,)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($kw => Ok(Self::$variant),)+
                    _ => Err(Error::$err(s.to_owned())),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(FitMode, InvalidFitMode, {
    Clip => "clip",
    Crop => "crop",
    Fill => "fill",
    FillMax => "fillmax",
    Max => "max",
    Scale => "scale",
    Min => "min",
});

keyword_enum!(CropMode, InvalidCropMode, {
    Top => "top",
    Bottom => "bottom",
    Left => "left",
    Right => "right",
    Center => "center",
    FocalPoint => "focalpoint",
    Entropy => "entropy",
});

keyword_enum!(AutoMode, InvalidAutoMode, {
    Format => "format",
});

/// Explicit focal point override, as fractions of the image.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Everything that goes into an image URL.
///
/// Values are plain optional fields. Values that arrived under a URL name
/// that differs from the canonical name (`w`, `q`, ...) are kept apart in
/// `aliased`; at serialization the canonical field wins.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct TransformOptions {
    /// CDN base URL. Defaults to [`DEFAULT_CDN_URL`](crate::DEFAULT_CDN_URL).
    pub base_url: Option<String>,
    pub project_id: Option<String>,
    pub dataset: Option<String>,
    /// The image to render.
    pub source: Option<ImageSource>,

    /// Explicit source rectangle; disables hotspot/crop fitting.
    pub rect: Option<PixelRect>,
    /// Explicit focal point; disables hotspot/crop fitting.
    pub focal_point: Option<FocalPoint>,
    /// Ignore the image's stored crop and hotspot.
    pub ignore_image_params: bool,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Background color (`bg`), emitted verbatim.
    pub bg: Option<String>,

    pub width: Option<f64>,
    pub height: Option<f64>,
    pub format: Option<String>,
    /// `true`, or a file name to download as.
    pub download: Option<ParamValue>,
    pub blur: Option<f64>,
    pub sharpen: Option<f64>,
    pub invert: Option<bool>,
    pub orientation: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub quality: Option<f64>,
    pub fit: Option<FitMode>,
    pub crop: Option<CropMode>,
    pub saturation: Option<f64>,
    pub auto: Option<AutoMode>,
    pub dpr: Option<f64>,
    pub pad: Option<f64>,
    pub frame: Option<u32>,

    /// Values supplied under a distinct URL name.
    pub aliased: BTreeMap<Param, ParamValue>,
}

impl TransformOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a flat key/value map.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut options = Self::new();
        for (key, value) in map {
            options.apply(key, value)?;
        }
        Ok(options)
    }

    /// Set one option by key. `null` values are ignored.
    ///
    /// Canonical names set the typed field. URL names that differ from the
    /// canonical name are recorded in `aliased`. Unknown keys are ignored.
    pub fn apply(&mut self, key: &str, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match key {
            "baseUrl" => self.base_url = Some(text(key, value)?),
            "projectId" => self.project_id = Some(text(key, value)?),
            "dataset" => self.dataset = Some(text(key, value)?),
            "source" => self.source = Some(ImageSource::from(value.clone())),
            "rect" => self.rect = Some(object(key, value)?),
            "focalPoint" => self.focal_point = Some(object(key, value)?),
            "ignoreImageParams" => self.ignore_image_params = truthy(value),
            "flipHorizontal" => self.flip_horizontal = truthy(value),
            "flipVertical" => self.flip_vertical = truthy(value),
            "bg" => self.bg = Some(text(key, value)?),
            _ => match Param::from_key(key) {
                Some(param) if param.has_distinct_alias() && key == param.alias() => {
                    let raw = ParamValue::from_json(value).ok_or_else(|| Error::InvalidOption {
                        key: key.to_owned(),
                        reason: "expected a number, string, or boolean",
                    })?;
                    self.aliased.insert(param, raw);
                }
                Some(param) => self.set_param(param, value)?,
                None => log::debug!("ignoring unknown image option `{key}`"),
            },
        }
        Ok(())
    }

    fn set_param(&mut self, param: Param, value: &Value) -> Result<()> {
        let key = param.name();
        match param {
            Param::Width => self.width = Some(number(key, value)?),
            Param::Height => self.height = Some(number(key, value)?),
            Param::Format => self.format = Some(text(key, value)?),
            Param::Download => {
                self.download = Some(ParamValue::from_json(value).ok_or_else(|| {
                    Error::InvalidOption {
                        key: key.to_owned(),
                        reason: "expected a boolean or a file name",
                    }
                })?)
            }
            Param::Blur => self.blur = Some(number(key, value)?),
            Param::Sharpen => self.sharpen = Some(number(key, value)?),
            Param::Invert => self.invert = Some(truthy(value)),
            Param::Orientation => self.orientation = Some(number(key, value)?),
            Param::MinHeight => self.min_height = Some(number(key, value)?),
            Param::MaxHeight => self.max_height = Some(number(key, value)?),
            Param::MinWidth => self.min_width = Some(number(key, value)?),
            Param::MaxWidth => self.max_width = Some(number(key, value)?),
            Param::Quality => self.quality = Some(number(key, value)?),
            Param::Fit => self.fit = Some(text(key, value)?.parse()?),
            Param::Crop => self.crop = Some(text(key, value)?.parse()?),
            Param::Saturation => self.saturation = Some(number(key, value)?),
            Param::Auto => self.auto = Some(text(key, value)?.parse()?),
            Param::Dpr => self.dpr = Some(number(key, value)?),
            Param::Pad => self.pad = Some(number(key, value)?),
            Param::Frame => {
                let frame = number(key, value)?;
                if frame != 1.0 {
                    return Err(Error::InvalidFrame(crate::query::format_number(frame)));
                }
                self.frame = Some(1);
            }
        }
        Ok(())
    }

    /// Value of a parameter's canonical field, if set.
    pub fn param(&self, param: Param) -> Option<ParamValue> {
        let num = |v: Option<f64>| v.map(ParamValue::Number);
        match param {
            Param::Width => num(self.width),
            Param::Height => num(self.height),
            Param::Format => self.format.as_deref().map(ParamValue::from),
            Param::Download => self.download.clone(),
            Param::Blur => num(self.blur),
            Param::Sharpen => num(self.sharpen),
            Param::Invert => self.invert.map(ParamValue::Bool),
            Param::Orientation => num(self.orientation),
            Param::MinHeight => num(self.min_height),
            Param::MaxHeight => num(self.max_height),
            Param::MinWidth => num(self.min_width),
            Param::MaxWidth => num(self.max_width),
            Param::Quality => num(self.quality),
            Param::Fit => self.fit.map(|m| ParamValue::from(m.as_str())),
            Param::Crop => self.crop.map(|m| ParamValue::from(m.as_str())),
            Param::Saturation => num(self.saturation),
            Param::Auto => self.auto.map(|m| ParamValue::from(m.as_str())),
            Param::Dpr => num(self.dpr),
            Param::Pad => num(self.pad),
            Param::Frame => self.frame.map(|f| ParamValue::Number(f64::from(f))),
        }
    }

    /// Value to serialize for a parameter: canonical field first, then alias.
    pub fn resolved_param(&self, param: Param) -> Option<ParamValue> {
        self.param(param)
            .or_else(|| self.aliased.get(&param).cloned())
    }

    /// Requested output width for crop fitting.
    ///
    /// Only the canonical `width` counts; a `w` kept in `aliased` is
    /// serialized but does not constrain the crop.
    pub fn requested_width(&self) -> Option<f64> {
        self.width
    }

    /// Requested output height for crop fitting. Only the canonical `height` counts.
    pub fn requested_height(&self) -> Option<f64> {
        self.height
    }
}

// ---- Value coercion ----

fn number(key: &str, value: &Value) -> Result<f64> {
    ParamValue::from_json(value)
        .and_then(|v| v.as_number())
        .ok_or_else(|| Error::InvalidOption {
            key: key.to_owned(),
            reason: "expected a number",
        })
}

fn text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::InvalidOption {
            key: key.to_owned(),
            reason: "expected a string",
        }),
    }
}

fn object<T: serde::de::DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|_| Error::InvalidOption {
        key: key.to_owned(),
        reason: "expected an object with numeric fields",
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
