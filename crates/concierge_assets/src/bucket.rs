//! Asset bucket enumeration.

use concierge_error::{AssetError, AssetErrorKind};

/// Logical namespace for uploaded assets.
///
/// Each bucket maps to its own upload directory and its own variant cache
/// subdirectory. Buckets never share variants or file names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Staff and guest profile pictures
    #[display("avatars")]
    Avatars,
    /// Hotel listing photography
    #[display("hotels")]
    Hotels,
    /// Home page hero and section imagery
    #[display("home")]
    Home,
}

impl Bucket {
    /// Bucket name as used in URLs and directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Hotels => "hotels",
            Bucket::Home => "home",
        }
    }
}

impl std::str::FromStr for Bucket {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatars" => Ok(Bucket::Avatars),
            "hotels" => Ok(Bucket::Hotels),
            "home" => Ok(Bucket::Home),
            _ => Err(AssetError::new(AssetErrorKind::UnknownBucket(s.to_string()))),
        }
    }
}
