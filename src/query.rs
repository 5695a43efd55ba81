//! URL serialization.
//!
//! The inverse of a query-string parser: a [`TransformOptions`] plus the
//! parsed asset become `<base>/images/<project>/<dataset>/<file>?<params>`.
//! Parameter order is fixed so identical options always produce identical
//! URLs.

use crate::asset::AssetDescriptor;
use crate::options::{Param, TransformOptions};

/// CDN host used when no base URL is configured.
pub const DEFAULT_CDN_URL: &str = "https://cdn.sanity.io";

/// Render a number the way it appears in URLs: no trailing `.0`, no `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_owned();
    }
    n.to_string()
}

/// Serialize options for an already-parsed asset into an image URL.
///
/// Parameters, in order:
///
/// 1. `rect`, unless it covers the whole asset
/// 2. `bg`
/// 3. `fp-x`, `fp-y`
/// 4. `flip` (`h`, `v`, or `hv`)
/// 5. every [`Param`] in declaration order, under its URL name
///
/// Only step 5 values are percent-encoded. Without parameters the bare path
/// is returned, with no `?`.
pub fn spec_to_image_url(options: &TransformOptions, asset: &AssetDescriptor) -> String {
    let base_url = options
        .base_url
        .as_deref()
        .unwrap_or(DEFAULT_CDN_URL)
        .trim_end_matches('/');
    let project_id = options.project_id.as_deref().unwrap_or_default();
    let dataset = options.dataset.as_deref().unwrap_or_default();

    let mut url = format!(
        "{base_url}/images/{project_id}/{dataset}/{}",
        asset.file_name()
    );

    let params = query_pairs(options, asset);
    if !params.is_empty() {
        url.push('?');
        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
    }
    url
}

fn query_pairs(options: &TransformOptions, asset: &AssetDescriptor) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(rect) = options.rect
        && !rect.is_full(asset.width, asset.height)
    {
        let value = [rect.left, rect.top, rect.width, rect.height]
            .map(format_number)
            .join(",");
        params.push(("rect", value));
    }

    if let Some(bg) = &options.bg {
        params.push(("bg", bg.clone()));
    }

    if let Some(fp) = options.focal_point {
        params.push(("fp-x", format_number(fp.x)));
        params.push(("fp-y", format_number(fp.y)));
    }

    let mut flip = String::new();
    if options.flip_horizontal {
        flip.push('h');
    }
    if options.flip_vertical {
        flip.push('v');
    }
    if !flip.is_empty() {
        params.push(("flip", flip));
    }

    for param in Param::ALL {
        if let Some(value) = options.resolved_param(param) {
            let value = value.to_string();
            params.push((param.alias(), urlencoding::encode(&value).into_owned()));
        }
    }

    params
}
