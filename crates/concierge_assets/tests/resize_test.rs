//! Tests for aspect-preserving resize math.

use concierge_assets::{ImageDimensions, constrain_by_max_dimension, constrain_by_target_width};

fn dims(width: u32, height: u32) -> ImageDimensions {
    ImageDimensions { width, height }
}

#[test]
fn test_max_dimension_scales_longer_side() {
    assert_eq!(constrain_by_max_dimension(dims(1000, 500), 500), dims(500, 250));
    assert_eq!(constrain_by_max_dimension(dims(500, 1000), 500), dims(250, 500));
    assert_eq!(constrain_by_max_dimension(dims(4032, 3024), 2560), dims(2560, 1920));
}

#[test]
fn test_max_dimension_never_upscales() {
    assert_eq!(constrain_by_max_dimension(dims(400, 300), 500), dims(400, 300));
    assert_eq!(constrain_by_max_dimension(dims(500, 500), 500), dims(500, 500));
}

#[test]
fn test_max_dimension_keeps_sides_at_least_one() {
    assert_eq!(constrain_by_max_dimension(dims(10_000, 1), 640), dims(640, 1));
    assert_eq!(constrain_by_max_dimension(dims(1, 10_000), 640), dims(1, 640));
}

#[test]
fn test_max_dimension_rounds_to_nearest() {
    // 333 * 0.5 = 166.5 rounds away from zero
    assert_eq!(constrain_by_max_dimension(dims(1000, 333), 500), dims(500, 167));
}

#[test]
fn test_target_width_scales_down() {
    assert_eq!(constrain_by_target_width(dims(1000, 500), 400), Some(dims(400, 200)));
    assert_eq!(constrain_by_target_width(dims(1920, 1080), 768), Some(dims(768, 432)));
}

#[test]
fn test_target_width_never_upscales() {
    assert_eq!(constrain_by_target_width(dims(300, 200), 400), None);
    assert_eq!(constrain_by_target_width(dims(400, 200), 400), None);
}

#[test]
fn test_target_width_degenerate_inputs() {
    assert_eq!(constrain_by_target_width(dims(1000, 500), 0), None);
    assert_eq!(constrain_by_target_width(dims(0, 500), 400), None);
    assert_eq!(constrain_by_target_width(dims(1000, 0), 400), None);
}

#[test]
fn test_target_width_keeps_height_at_least_one() {
    assert_eq!(constrain_by_target_width(dims(10_000, 2), 100), Some(dims(100, 1)));
}
