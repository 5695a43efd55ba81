//! Crop fitting: derive the pixel rectangle to request from the CDN.
//!
//! Pure geometry over the stored crop and hotspot of an image. The crop
//! bounds which part of the asset may be shown; the hotspot says where to
//! center when the requested aspect ratio forces further trimming.
//!
//! # Example
//!
//! ```
//! use sanity_image_url::fit::{fit, HotspotBounds, PixelRect};
//!
//! // 2000×3000 asset, 10% cropped from each edge, hotspot at (600, 900).
//! let crop = PixelRect::new(200.0, 300.0, 1600.0, 2400.0);
//! let hotspot = HotspotBounds { left: 300.0, top: 450.0, right: 900.0, bottom: 1350.0 };
//!
//! let fitted = fit(&crop, &hotspot, Some(100.0), Some(80.0));
//! assert_eq!(fitted.rect, PixelRect::new(200.0, 300.0, 1600.0, 1280.0));
//! ```

use crate::asset::AssetDescriptor;
use crate::source::{FractionalCrop, FractionalHotspot};

/// Axis-aligned rectangle in asset pixel space.
///
/// Coordinates are `f64` because asset dimensions are not guaranteed to be
/// integral; values produced by [`fit`] and [`crop_rect`] are whole numbers.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rect.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether this rect covers the full asset (no actual crop).
    pub fn is_full(&self, asset_w: f64, asset_h: f64) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.width == asset_w && self.height == asset_h
    }
}

/// Hotspot region in asset pixel space, as edges. Not rounded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HotspotBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl HotspotBounds {
    fn center_x(&self) -> f64 {
        ((self.right - self.left) / 2.0 + self.left).round()
    }

    fn center_y(&self) -> f64 {
        ((self.bottom - self.top) / 2.0 + self.top).round()
    }
}

/// Output of [`fit`]: the requested size, untouched, and the rect to request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitResult {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rect: PixelRect,
}

/// Convert a fractional crop to pixels for the given asset.
///
/// Each edge is rounded independently, then width/height are derived from
/// the rounded near edges.
pub fn crop_rect(crop: &FractionalCrop, asset: &AssetDescriptor) -> PixelRect {
    let (aw, ah) = (asset.width, asset.height);
    let left = (crop.left * aw).round();
    let top = (crop.top * ah).round();
    PixelRect {
        left,
        top,
        width: (aw - crop.right * aw - left).round(),
        height: (ah - crop.bottom * ah - top).round(),
    }
}

/// Convert a fractional hotspot (center + extent) to pixel edges.
pub fn hotspot_bounds(hotspot: &FractionalHotspot, asset: &AssetDescriptor) -> HotspotBounds {
    let (aw, ah) = (asset.width, asset.height);
    let radius_x = hotspot.width * aw / 2.0;
    let radius_y = hotspot.height * ah / 2.0;
    let center_x = hotspot.x * aw;
    let center_y = hotspot.y * ah;
    HotspotBounds {
        left: center_x - radius_x,
        top: center_y - radius_y,
        right: center_x + radius_x,
        bottom: center_y + radius_y,
    }
}

/// Fit the crop to the requested aspect ratio, centered on the hotspot.
///
/// Without both a width and a height (zero counts as absent) there is no
/// aspect constraint and the crop is returned unchanged.
///
/// When the crop is wider than requested, its height is kept and the width
/// trimmed around the hotspot's horizontal center; otherwise its width is
/// kept and the height trimmed around the vertical center. The result always
/// stays inside the crop: the crop edge wins over hotspot centering.
///
/// The two branches round differently (`height` is re-rounded in the first,
/// `width` is taken as-is in the second). Existing URLs depend on this.
pub fn fit(
    crop: &PixelRect,
    hotspot: &HotspotBounds,
    width: Option<f64>,
    height: Option<f64>,
) -> FitResult {
    let (Some(img_w), Some(img_h)) = (width.filter(|w| *w != 0.0), height.filter(|h| *h != 0.0))
    else {
        return FitResult {
            width,
            height,
            rect: *crop,
        };
    };

    let desired_aspect = img_w / img_h;
    let crop_aspect = crop.width / crop.height;

    let rect = if crop_aspect > desired_aspect {
        // Crop is wider: keep height, trim width.
        let height = crop.height.round();
        let width = (height * desired_aspect).round();
        let top = non_negative(crop.top.round());

        let mut left = non_negative((hotspot.center_x() - width / 2.0).round());
        if left < crop.left {
            left = crop.left;
        } else if left + width > crop.left + crop.width {
            left = crop.left + crop.width - width;
        }

        PixelRect {
            left,
            top,
            width,
            height,
        }
    } else {
        // Crop is taller (or equal): keep width, trim height.
        let width = crop.width;
        let height = (width / desired_aspect).round();
        let left = non_negative(crop.left.round());

        let mut top = non_negative((hotspot.center_y() - height / 2.0).round());
        if top < crop.top {
            top = crop.top;
        } else if top + height > crop.top + crop.height {
            top = crop.top + crop.height - height;
        }

        PixelRect {
            left,
            top,
            width,
            height,
        }
    };

    FitResult {
        width,
        height,
        rect,
    }
}

/// `max(0, v)` that never yields negative zero.
fn non_negative(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::parse_asset_id;

    fn asset(w: u32, h: u32) -> AssetDescriptor {
        parse_asset_id(&format!("image-abc-{w}x{h}-jpg")).unwrap()
    }

    fn cropped_10pct() -> FractionalCrop {
        FractionalCrop {
            left: 0.1,
            top: 0.1,
            right: 0.1,
            bottom: 0.1,
        }
    }

    fn hotspot_30pct() -> FractionalHotspot {
        FractionalHotspot {
            x: 0.3,
            y: 0.3,
            width: 0.3,
            height: 0.3,
        }
    }

    #[test]
    fn crop_rect_ten_percent_margins() {
        let r = crop_rect(&cropped_10pct(), &asset(2000, 3000));
        assert_eq!(r, PixelRect::new(200.0, 300.0, 1600.0, 2400.0));
    }

    #[test]
    fn crop_rect_default_is_full() {
        let a = asset(2000, 3000);
        let r = crop_rect(&FractionalCrop::default(), &a);
        assert!(r.is_full(a.width, a.height));
    }

    #[test]
    fn hotspot_bounds_not_rounded() {
        let h = hotspot_bounds(&hotspot_30pct(), &asset(2000, 3000));
        assert_eq!(h.left, 300.0);
        assert_eq!(h.right, 900.0);
        assert_eq!(h.top, 450.0);
        assert_eq!(h.bottom, 1350.0);

        let h = hotspot_bounds(&FractionalHotspot::default(), &asset(3, 3));
        assert_eq!(h.left, 0.0);
        assert_eq!(h.right, 3.0);
    }

    #[test]
    fn no_dimensions_returns_crop() {
        let crop = PixelRect::new(200.0, 300.0, 1600.0, 2400.0);
        let hs = hotspot_bounds(&hotspot_30pct(), &asset(2000, 3000));
        let r = fit(&crop, &hs, None, None);
        assert_eq!(r.rect, crop);
        assert_eq!((r.width, r.height), (None, None));
    }

    #[test]
    fn single_dimension_returns_crop() {
        let crop = PixelRect::new(200.0, 300.0, 1600.0, 2400.0);
        let hs = hotspot_bounds(&hotspot_30pct(), &asset(2000, 3000));
        let r = fit(&crop, &hs, Some(100.0), None);
        assert_eq!(r.rect, crop);
        assert_eq!(r.width, Some(100.0));
        assert_eq!(r.height, None);
    }

    #[test]
    fn zero_dimension_counts_as_absent() {
        let crop = PixelRect::new(0.0, 0.0, 2000.0, 3000.0);
        let hs = hotspot_bounds(&FractionalHotspot::default(), &asset(2000, 3000));
        let r = fit(&crop, &hs, Some(0.0), Some(100.0));
        assert_eq!(r.rect, crop);
    }

    #[test]
    fn tall_request_centers_horizontally_on_hotspot() {
        // Uncropped 2000×3000, hotspot centered at x=600: 30×100 → 900 wide.
        let a = asset(2000, 3000);
        let crop = crop_rect(&FractionalCrop::default(), &a);
        let hs = hotspot_bounds(&hotspot_30pct(), &a);
        let r = fit(&crop, &hs, Some(30.0), Some(100.0));
        assert_eq!(r.rect, PixelRect::new(150.0, 0.0, 900.0, 3000.0));
    }

    #[test]
    fn wide_request_centers_vertically_on_hotspot() {
        let a = asset(2000, 3000);
        let crop = crop_rect(&FractionalCrop::default(), &a);
        let hs = hotspot_bounds(&hotspot_30pct(), &a);
        let r = fit(&crop, &hs, Some(100.0), Some(30.0));
        assert_eq!(r.rect, PixelRect::new(0.0, 600.0, 2000.0, 600.0));
    }

    #[test]
    fn tall_request_stays_within_crop() {
        let a = asset(2000, 3000);
        let crop = crop_rect(&cropped_10pct(), &a);
        let hs = hotspot_bounds(&hotspot_30pct(), &a);
        let r = fit(&crop, &hs, Some(30.0), Some(100.0));
        assert_eq!(r.rect, PixelRect::new(240.0, 300.0, 720.0, 2400.0));
    }

    #[test]
    fn hotspot_near_edge_is_pushed_inside_crop() {
        // Hotspot at the far right; the fitted rect must end at the crop's right edge.
        let a = asset(2000, 3000);
        let crop = crop_rect(&cropped_10pct(), &a);
        let hs = hotspot_bounds(
            &FractionalHotspot {
                x: 0.95,
                y: 0.5,
                width: 0.1,
                height: 0.1,
            },
            &a,
        );
        let r = fit(&crop, &hs, Some(30.0), Some(100.0));
        assert_eq!(r.rect.width, 720.0);
        assert_eq!(r.rect.left + r.rect.width, crop.left + crop.width);
    }

    #[test]
    fn hotspot_above_crop_snaps_to_crop_top() {
        let a = asset(2000, 3000);
        let crop = crop_rect(&cropped_10pct(), &a);
        let hs = hotspot_bounds(&hotspot_30pct(), &a);
        let r = fit(&crop, &hs, Some(100.0), Some(80.0));
        assert_eq!(r.rect, PixelRect::new(200.0, 300.0, 1600.0, 1280.0));
    }

    #[test]
    fn square_request_on_landscape_without_hotspot() {
        let a = asset(4288, 2848);
        let crop = crop_rect(&FractionalCrop::default(), &a);
        let hs = hotspot_bounds(&FractionalHotspot::default(), &a);
        let r = fit(&crop, &hs, Some(80.0), Some(80.0));
        assert_eq!(r.rect, PixelRect::new(720.0, 0.0, 2848.0, 2848.0));
        assert_eq!((r.width, r.height), (Some(80.0), Some(80.0)));
    }

    #[test]
    fn matching_aspect_yields_full_rect() {
        let a = asset(1200, 966);
        let crop = crop_rect(&FractionalCrop::default(), &a);
        let hs = hotspot_bounds(&FractionalHotspot::default(), &a);
        let r = fit(&crop, &hs, Some(1000.0), Some(805.0));
        assert!(r.rect.is_full(a.width, a.height), "{:?}", r.rect);
    }

    #[test]
    fn no_negative_zero() {
        assert!(non_negative(-0.0).is_sign_positive());
        assert!(non_negative(-3.0).is_sign_positive());
        assert_eq!(non_negative(4.0), 4.0);
    }
}
