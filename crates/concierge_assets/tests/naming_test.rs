//! Tests for stem sanitizing, extension normalizing and clamping.

use concierge_assets::{
    Bucket, MAX_QUALITY, MIN_MAX_DIMENSION, MIN_QUALITY, asset_url, clamp_max_dimension,
    clamp_quality, normalize_extension, sanitize_prefix, sanitize_stem,
};

#[test]
fn test_sanitize_stem() {
    assert_eq!(sanitize_stem("Lobby View (2).JPG"), "lobby-view-2");
    assert_eq!(sanitize_stem("__pool__deck__.png"), "pool-deck");
    assert_eq!(sanitize_stem("Café.jpg"), "caf");
    assert_eq!(sanitize_stem("no-extension"), "no-extension");
}

#[test]
fn test_sanitize_stem_falls_back() {
    assert_eq!(sanitize_stem(""), "asset");
    assert_eq!(sanitize_stem("???.png"), "asset");
}

#[test]
fn test_sanitize_stem_truncates() {
    let long = format!("{}.jpg", "a".repeat(100));
    assert_eq!(sanitize_stem(&long), "a".repeat(48));

    // A separator landing on the cut is trimmed
    let name = format!("{} tail.jpg", "b".repeat(47));
    assert_eq!(sanitize_stem(&name), "b".repeat(47));
}

#[test]
fn test_sanitize_prefix_strips_separators() {
    assert_eq!(sanitize_prefix("hotel"), "hotel");
    assert_eq!(sanitize_prefix("../../etc/Hotel"), "etc-hotel");
    assert_eq!(sanitize_prefix("a\\b"), "a-b");
    assert_eq!(sanitize_prefix(""), "upload");
}

#[test]
fn test_normalize_extension() {
    assert_eq!(normalize_extension("JPEG"), "jpg");
    assert_eq!(normalize_extension(".png"), "png");
    assert_eq!(normalize_extension("jpg"), "jpg");
    assert_eq!(normalize_extension("SVG"), "svg");
    assert_eq!(normalize_extension(""), "");
}

#[test]
fn test_clamps() {
    assert_eq!(clamp_quality(10), MIN_QUALITY);
    assert_eq!(clamp_quality(100), MAX_QUALITY);
    assert_eq!(clamp_quality(82), 82);
    assert_eq!(clamp_max_dimension(100), MIN_MAX_DIMENSION);
    assert_eq!(clamp_max_dimension(2560), 2560);
}

#[test]
fn test_asset_url() {
    assert_eq!(
        asset_url(Bucket::Hotels, "hotel-1-abc-lobby.webp"),
        "/api/v1/assets/hotels/hotel-1-abc-lobby.webp"
    );
}

#[test]
fn test_bucket_parsing() {
    assert_eq!("avatars".parse::<Bucket>().ok(), Some(Bucket::Avatars));
    assert_eq!("home".parse::<Bucket>().ok(), Some(Bucket::Home));
    assert!("videos".parse::<Bucket>().is_err());
    assert_eq!(Bucket::Hotels.to_string(), "hotels");
}
