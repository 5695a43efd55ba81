//! Image CDN URL building with crop and hotspot support.
//!
//! Pure computation: no I/O, no shared state, safe to call from any thread.
//!
//! # Modules
//!
//! - [`asset`]: asset id parsing (`image-<id>-<W>x<H>-<format>`)
//! - [`source`]: normalizing ids, URLs, references, and image documents
//! - [`fit`]: hotspot-aware crop fitting
//! - [`options`]: the typed option record and its URL name table
//! - [`query`]: URL serialization
//! - [`resolve`]: options → URL
//! - [`builder`]: fluent, immutable builder
//! - [`client`]: CDN host and project from client configuration
//!
//! # Example
//!
//! ```
//! use sanity_image_url::ImageUrlBuilder;
//! use serde_json::json;
//!
//! let image = json!({
//!     "asset": { "_ref": "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg" },
//!     "crop": { "top": 0.1, "bottom": 0.1, "left": 0.1, "right": 0.1 },
//!     "hotspot": { "x": 0.3, "y": 0.3, "width": 0.3, "height": 0.3 },
//! });
//!
//! let url = ImageUrlBuilder::with_project("zp7mbokg", "production")
//!     .image(image)
//!     .size(100, 80)
//!     .url()
//!     .unwrap();
//!
//! assert_eq!(
//!     url,
//!     "https://cdn.sanity.io/images/zp7mbokg/production/\
//!      Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg?rect=200,300,1600,1280&w=100&h=80"
//! );
//! ```

#![forbid(unsafe_code)]

pub mod asset;
pub mod builder;
pub mod client;
pub mod error;
pub mod fit;
pub mod options;
pub mod query;
pub mod resolve;
pub mod source;

pub use asset::{AssetDescriptor, parse_asset_id};
pub use builder::ImageUrlBuilder;
pub use client::{ClientConfig, ClientLike, DEFAULT_API_HOST, ProjectConfig};
pub use error::{Error, Result};
pub use fit::{FitResult, HotspotBounds, PixelRect, crop_rect, fit, hotspot_bounds};
pub use options::{AutoMode, CropMode, FitMode, FocalPoint, Param, ParamValue, TransformOptions};
pub use query::{DEFAULT_CDN_URL, format_number, spec_to_image_url};
pub use resolve::resolve_image_url;
pub use source::{CanonicalImage, FractionalCrop, FractionalHotspot, ImageSource, normalize};
