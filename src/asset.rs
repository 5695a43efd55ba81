//! Asset id parsing.
//!
//! Image asset ids encode the stored image's identity, intrinsic pixel
//! dimensions, and format positionally:
//!
//! ```text
//! image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg
//! ^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^^ ^^^
//! kind  id                       WxH       format
//! ```

use crate::error::{Error, Result};

/// A parsed asset id. Dimensions are kept as parsed (not forced to integers).
#[derive(Clone, Debug, PartialEq)]
pub struct AssetDescriptor {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub format: String,
}

impl AssetDescriptor {
    /// File name of the asset on the CDN: `<id>-<width>x<height>.<format>`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.id,
            crate::query::format_number(self.width),
            crate::query::format_number(self.height),
            self.format
        )
    }
}

impl core::str::FromStr for AssetDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_asset_id(s)
    }
}

/// Parse an asset id of the form `image-<id>-<width>x<height>-<format>`.
///
/// Segments past the fourth are ignored. Fails with
/// [`Error::MalformedReference`] when the id, dimension, or format segment
/// is missing or empty, or when the dimensions are not two finite numbers.
pub fn parse_asset_id(reference: &str) -> Result<AssetDescriptor> {
    let malformed = || Error::MalformedReference {
        reference: reference.to_owned(),
    };

    let mut parts = reference.split('-');
    let (Some(_kind), Some(id), Some(dimensions), Some(format)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };
    if id.is_empty() || dimensions.is_empty() || format.is_empty() {
        return Err(malformed());
    }

    let (width, height) = parse_dimensions(dimensions).ok_or_else(malformed)?;

    Ok(AssetDescriptor {
        id: id.to_owned(),
        width,
        height,
        format: format.to_owned(),
    })
}

/// `2000x3000` → `(2000.0, 3000.0)`. Exactly one `x`, both sides finite.
fn parse_dimensions(s: &str) -> Option<(f64, f64)> {
    let (w, h) = s.split_once('x')?;
    if h.contains('x') {
        return None;
    }
    let w = parse_finite(w)?;
    let h = parse_finite(h)?;
    Some((w, h))
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
