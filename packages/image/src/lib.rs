#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Software rendering of freehand polylines into encoded images.
//!
//! The [`image`] module rasterizes lists of points into an RGBA buffer and encodes the
//! result with one of the supported [`Encoding`]s. [`Color`] and [`data_uri`] are
//! available without the `image` feature so that configuration and transport code can
//! share them.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

mod color;

pub use color::{Color, ParseColorError};

#[cfg(feature = "image")]
pub mod image;

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Encoding {
    #[default]
    Png,
    Jpeg,
}

impl Encoding {
    /// The MIME type written into `data:` URIs for this encoding.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Guesses the encoding from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Wraps encoded image bytes in a base64 `data:` URI.
#[must_use]
pub fn data_uri(encoding: Encoding, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", encoding.mime_type(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn encoding_parses_screaming_snake_case() {
        assert_eq!(Encoding::from_str("PNG").unwrap(), Encoding::Png);
        assert_eq!(Encoding::from_str("JPEG").unwrap(), Encoding::Jpeg);
        assert!(Encoding::from_str("png").is_err());
    }

    #[test_log::test]
    fn encoding_from_extension_is_case_insensitive() {
        assert_eq!(Encoding::from_extension("PNG"), Some(Encoding::Png));
        assert_eq!(Encoding::from_extension("jpg"), Some(Encoding::Jpeg));
        assert_eq!(Encoding::from_extension("Jpeg"), Some(Encoding::Jpeg));
        assert_eq!(Encoding::from_extension("gif"), None);
    }

    #[test_log::test]
    fn encoding_round_trips_through_serde() {
        let json = serde_json::to_string(&Encoding::Jpeg).unwrap();
        assert_eq!(json, "\"JPEG\"");
        assert_eq!(serde_json::from_str::<Encoding>("\"PNG\"").unwrap(), Encoding::Png);
    }

    #[test_log::test]
    fn data_uri_prefixes_mime_type() {
        let uri = data_uri(Encoding::Png, b"abc");
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }
}
