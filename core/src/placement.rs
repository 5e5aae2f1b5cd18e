//! Overlay placement
//!
//! Sizes the flat plane rendered over a detected anchor. Height is pinned to
//! the anchor's physical height; width follows the overlay's own aspect ratio.

use anchorview_types::{PhysicalSize, PixelSize, RectDimensions};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("overlay has invalid pixel size {width}x{height}")]
    InvalidAsset { width: u32, height: u32 },
}

/// Compute plane dimensions for an overlay image on an anchor.
///
/// Formula: `height = H`, `width = H * (w / h)` where `H` is the anchor's
/// physical height and `w x h` the overlay's pixel size.
pub fn compute_geometry(
    image: PixelSize,
    anchor: PhysicalSize,
) -> Result<RectDimensions, PlacementError> {
    let ratio = image.aspect_ratio().ok_or(PlacementError::InvalidAsset {
        width: image.width,
        height: image.height,
    })?;

    Ok(RectDimensions {
        width: anchor.height * ratio,
        height: anchor.height,
    })
}
