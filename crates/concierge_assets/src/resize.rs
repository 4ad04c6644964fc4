//! Resize math for encoder hints. Neither function ever upscales.

use crate::ImageDimensions;

/// Fit `dims` inside a `max_dimension` square, keeping the aspect ratio.
///
/// Returns `dims` unchanged when the longer side already fits, so callers can
/// compare the result against the input to decide whether a resize is needed.
///
/// # Examples
///
/// ```
/// use concierge_assets::{constrain_by_max_dimension, ImageDimensions};
///
/// let dims = ImageDimensions { width: 1000, height: 500 };
/// assert_eq!(
///     constrain_by_max_dimension(dims, 500),
///     ImageDimensions { width: 500, height: 250 }
/// );
/// ```
pub fn constrain_by_max_dimension(dims: ImageDimensions, max_dimension: u32) -> ImageDimensions {
    let longer = dims.width.max(dims.height);
    if longer <= max_dimension || longer == 0 {
        return dims;
    }
    let ratio = f64::from(max_dimension) / f64::from(longer);
    ImageDimensions {
        width: scale(dims.width, ratio),
        height: scale(dims.height, ratio),
    }
}

/// Scale `dims` down to exactly `target_width`.
///
/// `None` when the source is already narrow enough, the target is zero, or
/// the source dimensions are degenerate.
pub fn constrain_by_target_width(
    dims: ImageDimensions,
    target_width: u32,
) -> Option<ImageDimensions> {
    if target_width == 0 || dims.width == 0 || dims.height == 0 {
        return None;
    }
    if dims.width <= target_width {
        return None;
    }
    let ratio = f64::from(target_width) / f64::from(dims.width);
    Some(ImageDimensions {
        width: target_width,
        height: scale(dims.height, ratio),
    })
}

fn scale(side: u32, ratio: f64) -> u32 {
    ((f64::from(side) * ratio).round() as u32).max(1)
}
