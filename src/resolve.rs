//! Options → URL: normalize the source, parse its asset id, fit the crop,
//! serialize.

use crate::asset::parse_asset_id;
use crate::error::{Error, Result};
use crate::fit::{crop_rect, fit, hotspot_bounds};
use crate::options::TransformOptions;
use crate::query::spec_to_image_url;
use crate::source::normalize;

/// Resolve options into an image URL.
///
/// Hotspot-aware cropping runs unless the caller took control of the
/// geometry: an explicit `rect`, `focal_point`, `crop` mode, or
/// `ignore_image_params` each disable it.
///
/// # Errors
///
/// [`Error::UnresolvedSource`] when the source does not describe an image,
/// [`Error::MalformedReference`] when its asset id cannot be parsed.
pub fn resolve_image_url(options: &TransformOptions) -> Result<String> {
    let image = options
        .source
        .as_ref()
        .and_then(normalize)
        .ok_or_else(|| Error::UnresolvedSource {
            rendered: options
                .source
                .as_ref()
                .map_or_else(|| "null".to_owned(), |s| s.to_json_string()),
        })?;

    let asset = parse_asset_id(&image.asset_ref)?;

    let explicit_geometry = options.rect.is_some()
        || options.focal_point.is_some()
        || options.ignore_image_params
        || options.crop.is_some();

    if explicit_geometry {
        log::debug!("skipping automatic crop for {}", image.asset_ref);
        return Ok(spec_to_image_url(options, &asset));
    }

    let crop = crop_rect(&image.crop, &asset);
    let hotspot = hotspot_bounds(&image.hotspot, &asset);
    let fitted = fit(
        &crop,
        &hotspot,
        options.requested_width(),
        options.requested_height(),
    );
    log::debug!(
        "automatic crop for {}: {:?} -> {:?}",
        image.asset_ref,
        crop,
        fitted.rect
    );

    let mut merged = options.clone();
    merged.width = fitted.width;
    merged.height = fitted.height;
    merged.rect = Some(fitted.rect);
    Ok(spec_to_image_url(&merged, &asset))
}
