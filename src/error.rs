//! Error type shared by parsing, option intake, and URL resolution.

/// Example asset id quoted in [`Error::MalformedReference`] messages.
pub const EXAMPLE_ASSET_ID: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";

/// URL computation error.
///
/// All variants are terminal: the input is either well-formed or not, and
/// no partial URL is ever produced alongside an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Asset id does not follow `image-<id>-<width>x<height>-<format>`.
    #[error("Malformed asset _ref '{reference}'. Expected an id like \"{example}\".", example = EXAMPLE_ASSET_ID)]
    MalformedReference { reference: String },

    /// No image record could be derived from the source. `rendered` is the
    /// JSON form of what was rejected.
    #[error("Unable to resolve image URL from source ({rendered})")]
    UnresolvedSource { rendered: String },

    #[error("Invalid fit mode \"{0}\"")]
    InvalidFitMode(String),

    #[error("Invalid crop mode \"{0}\"")]
    InvalidCropMode(String),

    #[error("Invalid auto mode \"{0}\"")]
    InvalidAutoMode(String),

    #[error("Invalid frame value \"{0}\"")]
    InvalidFrame(String),

    /// An option value had the wrong shape for its key.
    #[error("Invalid value for option `{key}`: {reason}")]
    InvalidOption { key: String, reason: &'static str },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
