//! Fluent, immutable URL builder.
//!
//! Every method returns a new builder; the one it was called on is left
//! untouched, so a configured base can be shared and specialized freely:
//!
//! ```
//! use sanity_image_url::ImageUrlBuilder;
//!
//! let base = ImageUrlBuilder::with_project("zp7mbokg", "production")
//!     .image("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
//! let thumb = base.size(100, 100);
//!
//! assert!(base.options().width.is_none());
//! assert!(thumb.url().unwrap().ends_with("?rect=0,500,2000,2000&w=100&h=100"));
//! ```

use serde_json::{Map, Value};

use crate::client::ClientLike;
use crate::error::{Error, Result};
use crate::fit::PixelRect;
use crate::options::{AutoMode, CropMode, FitMode, FocalPoint, Param, ParamValue, TransformOptions};
use crate::resolve::resolve_image_url;
use crate::source::ImageSource;

/// Accumulates [`TransformOptions`] and renders them as a URL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageUrlBuilder {
    options: TransformOptions,
}

impl ImageUrlBuilder {
    /// Builder with no project configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a project and dataset on the default CDN.
    pub fn with_project(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::new().project_id(project_id).dataset(dataset)
    }

    /// Builder configured from a content API client.
    pub fn from_client(client: &impl ClientLike) -> Self {
        let project = client.client_config().project_config();
        let mut options = TransformOptions::new();
        options.base_url = Some(project.base_url);
        options.project_id = project.project_id;
        options.dataset = project.dataset;
        Self { options }
    }

    /// Builder starting from existing options.
    pub fn from_options(options: TransformOptions) -> Self {
        Self { options }
    }

    /// The accumulated options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Render the URL.
    pub fn url(&self) -> Result<String> {
        resolve_image_url(&self.options)
    }

    /// Apply a flat map of options. URL names (`w`, `q`, ...) are rewritten
    /// to their canonical names first.
    pub fn with_options(&self, patch: &Map<String, Value>) -> Result<Self> {
        let mut options = self.options.clone();
        for (key, value) in patch {
            options.apply(Param::canonical_key(key), value)?;
        }
        Ok(Self { options })
    }

    fn patch(&self, f: impl FnOnce(&mut TransformOptions)) -> Self {
        let mut options = self.options.clone();
        f(&mut options);
        Self { options }
    }

    /// Image to render: asset id, image URL, reference, or image document.
    pub fn image(&self, source: impl Into<ImageSource>) -> Self {
        let source = source.into();
        self.patch(|o| o.source = Some(source))
    }

    /// Project the image belongs to.
    pub fn project_id(&self, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        self.patch(|o| o.project_id = Some(project_id))
    }

    /// Dataset the image belongs to.
    pub fn dataset(&self, dataset: impl Into<String>) -> Self {
        let dataset = dataset.into();
        self.patch(|o| o.dataset = Some(dataset))
    }

    /// CDN base URL. Trailing slashes are ignored.
    pub fn base_url(&self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.patch(|o| o.base_url = Some(base_url))
    }

    /// Background color, as the CDN expects it (e.g. `bf1942`).
    pub fn bg(&self, bg: impl Into<String>) -> Self {
        let bg = bg.into();
        self.patch(|o| o.bg = Some(bg))
    }

    /// Device pixel ratio. `0` and `1` leave the builder unchanged.
    pub fn dpr(&self, dpr: f64) -> Self {
        if dpr == 0.0 || dpr == 1.0 {
            return self.clone();
        }
        self.patch(|o| o.dpr = Some(dpr))
    }

    /// Output width in pixels (`w`).
    pub fn width(&self, width: u32) -> Self {
        self.patch(|o| o.width = Some(f64::from(width)))
    }

    /// Output height in pixels (`h`).
    pub fn height(&self, height: u32) -> Self {
        self.patch(|o| o.height = Some(f64::from(height)))
    }

    /// Output width and height. Together they drive hotspot cropping.
    pub fn size(&self, width: u32, height: u32) -> Self {
        self.patch(|o| {
            o.width = Some(f64::from(width));
            o.height = Some(f64::from(height));
        })
    }

    /// Explicit focal point, as fractions. Disables hotspot cropping.
    pub fn focal_point(&self, x: f64, y: f64) -> Self {
        self.patch(|o| o.focal_point = Some(FocalPoint { x, y }))
    }

    /// Upper bound on the output width (`max-w`).
    pub fn max_width(&self, max_width: u32) -> Self {
        self.patch(|o| o.max_width = Some(f64::from(max_width)))
    }

    /// Lower bound on the output width (`min-w`).
    pub fn min_width(&self, min_width: u32) -> Self {
        self.patch(|o| o.min_width = Some(f64::from(min_width)))
    }

    /// Upper bound on the output height (`max-h`).
    pub fn max_height(&self, max_height: u32) -> Self {
        self.patch(|o| o.max_height = Some(f64::from(max_height)))
    }

    /// Lower bound on the output height (`min-h`).
    pub fn min_height(&self, min_height: u32) -> Self {
        self.patch(|o| o.min_height = Some(f64::from(min_height)))
    }

    /// Blur amount (`blur`).
    pub fn blur(&self, blur: u32) -> Self {
        self.patch(|o| o.blur = Some(f64::from(blur)))
    }

    /// Sharpen amount (`sharp`).
    pub fn sharpen(&self, sharpen: u32) -> Self {
        self.patch(|o| o.sharpen = Some(f64::from(sharpen)))
    }

    /// Explicit source rectangle in asset pixels. Disables hotspot cropping.
    pub fn rect(&self, left: u32, top: u32, width: u32, height: u32) -> Self {
        let rect = PixelRect::new(
            f64::from(left),
            f64::from(top),
            f64::from(width),
            f64::from(height),
        );
        self.patch(|o| o.rect = Some(rect))
    }

    /// Output format, e.g. `png` or `webp` (`fm`).
    pub fn format(&self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.patch(|o| o.format = Some(format))
    }

    /// Invert colors.
    pub fn invert(&self, invert: bool) -> Self {
        self.patch(|o| o.invert = Some(invert))
    }

    /// Rotation in degrees (`or`).
    pub fn orientation(&self, orientation: i32) -> Self {
        self.patch(|o| o.orientation = Some(f64::from(orientation)))
    }

    /// Compression quality, 0 to 100 (`q`).
    pub fn quality(&self, quality: u32) -> Self {
        self.patch(|o| o.quality = Some(f64::from(quality)))
    }

    /// Serve as a download: `true`, or a file name to save as.
    pub fn force_download(&self, download: impl Into<ParamValue>) -> Self {
        let download = download.into();
        self.patch(|o| o.download = Some(download))
    }

    /// Mirror horizontally.
    pub fn flip_horizontal(&self) -> Self {
        self.patch(|o| o.flip_horizontal = true)
    }

    /// Mirror vertically.
    pub fn flip_vertical(&self) -> Self {
        self.patch(|o| o.flip_vertical = true)
    }

    /// Ignore the image's stored crop and hotspot.
    pub fn ignore_image_params(&self) -> Self {
        self.patch(|o| o.ignore_image_params = true)
    }

    /// Saturation adjustment, -100 to 100 (`sat`).
    pub fn saturation(&self, saturation: i32) -> Self {
        self.patch(|o| o.saturation = Some(f64::from(saturation)))
    }

    /// Padding in pixels around the image.
    pub fn pad(&self, pad: u32) -> Self {
        self.patch(|o| o.pad = Some(f64::from(pad)))
    }

    /// How the image fits the requested size.
    pub fn fit(&self, fit: FitMode) -> Self {
        self.patch(|o| o.fit = Some(fit))
    }

    /// CDN crop mode. Disables hotspot cropping.
    pub fn crop(&self, crop: CropMode) -> Self {
        self.patch(|o| o.crop = Some(crop))
    }

    /// Automatic transforms, such as format negotiation.
    pub fn auto(&self, auto: AutoMode) -> Self {
        self.patch(|o| o.auto = Some(auto))
    }

    /// Animated image frame. Only `1` is accepted.
    pub fn frame(&self, frame: u32) -> Result<Self> {
        if frame != 1 {
            return Err(Error::InvalidFrame(frame.to_string()));
        }
        Ok(self.patch(|o| o.frame = Some(frame)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use serde_json::json;

    const REF: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";
    const BASE: &str =
        "https://cdn.sanity.io/images/zp7mbokg/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg";

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::with_project("zp7mbokg", "production").image(REF)
    }

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn parent_untouched_by_child() {
        let parent = builder().width(100);
        let child = parent.height(50).blur(5);
        assert_eq!(parent.options().height, None);
        assert_eq!(parent.options().blur, None);
        assert_eq!(child.options().width, Some(100.0));
    }

    #[test]
    fn dpr_identity_values() {
        let b = builder();
        assert_eq!(b.dpr(1.0), b);
        assert_eq!(b.dpr(0.0), b);
        assert_eq!(b.dpr(3.0).url().unwrap(), format!("{BASE}?dpr=3"));
        assert_eq!(b.dpr(1.0).url().unwrap(), BASE);
    }

    #[test]
    fn frame_only_accepts_one() {
        assert_eq!(builder().frame(1).unwrap().url().unwrap(), format!("{BASE}?frame=1"));
        assert_eq!(builder().frame(2).unwrap_err(), Error::InvalidFrame("2".into()));
    }

    #[test]
    fn with_options_rewrites_aliases() {
        let b = builder()
            .with_options(&map(json!({ "w": 320, "q": 80, "fm": "png" })))
            .unwrap();
        assert_eq!(b.options().width, Some(320.0));
        assert_eq!(b.options().quality, Some(80.0));
        assert_eq!(b.options().format.as_deref(), Some("png"));
        assert!(b.options().aliased.is_empty());
    }

    #[test]
    fn with_options_keeps_base_url_unless_overridden() {
        let b = builder().base_url("https://mycustom.domain");
        let kept = b.with_options(&map(json!({ "width": 10 }))).unwrap();
        assert_eq!(kept.options().base_url.as_deref(), Some("https://mycustom.domain"));
        let replaced = b
            .with_options(&map(json!({ "baseUrl": "https://other.domain" })))
            .unwrap();
        assert_eq!(replaced.options().base_url.as_deref(), Some("https://other.domain"));
    }

    #[test]
    fn with_options_validates_enumerations() {
        let err = builder().with_options(&map(json!({ "fit": "moo" }))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid fit mode \"moo\"");
    }

    #[test]
    fn from_client_derives_cdn() {
        let client = ClientConfig {
            api_host: Some("https://api.totally.custom".into()),
            project_id: Some("abc123".into()),
            dataset: Some("foo".into()),
        };
        let b = ImageUrlBuilder::from_client(&client).image("image-abc-10x20-png");
        assert_eq!(
            b.url().unwrap(),
            "https://cdn.totally.custom/images/abc123/foo/abc-10x20.png"
        );
    }

    #[test]
    fn force_download_accepts_flag_or_name() {
        assert_eq!(builder().force_download(true).url().unwrap(), format!("{BASE}?dl=true"));
        assert_eq!(builder().force_download("a.png").url().unwrap(), format!("{BASE}?dl=a.png"));
    }
}
