//! Centralized display formatting utilities.
//!
//! Console output and log lines go through this module so sizes and delays
//! render the same way everywhere.

use crate::geometry::{PhysicalSize, PixelSize, RectDimensions};

/// Format a length in meters with two decimal places.
///
/// # Examples
/// ```
/// use anchorview_types::formatting::format_meters;
/// assert_eq!(format_meters(0.2), "0.20 m");
/// assert_eq!(format_meters(1.0), "1.00 m");
/// ```
pub fn format_meters(m: f64) -> String {
    format!("{:.2} m", m)
}

/// Format a rectangle as `W x H` in meters.
///
/// # Examples
/// ```
/// use anchorview_types::RectDimensions;
/// use anchorview_types::formatting::format_rect;
/// let rect = RectDimensions { width: 0.2, height: 0.1 };
/// assert_eq!(format_rect(&rect), "0.20 m x 0.10 m");
/// ```
pub fn format_rect(rect: &RectDimensions) -> String {
    format!("{} x {}", format_meters(rect.width), format_meters(rect.height))
}

/// Format a physical anchor size as `W x H` in meters.
pub fn format_physical(size: &PhysicalSize) -> String {
    format!("{} x {}", format_meters(size.width), format_meters(size.height))
}

/// Format pixel dimensions as `WxH px`.
///
/// # Examples
/// ```
/// use anchorview_types::PixelSize;
/// use anchorview_types::formatting::format_pixels;
/// assert_eq!(format_pixels(&PixelSize::new(400, 200)), "400x200 px");
/// ```
pub fn format_pixels(size: &PixelSize) -> String {
    format!("{}x{} px", size.width, size.height)
}

/// Format a delay in seconds with one decimal place.
///
/// - Values <= 0: `now`
///
/// # Examples
/// ```
/// use anchorview_types::formatting::format_delay;
/// assert_eq!(format_delay(3.0), "3.0s");
/// assert_eq!(format_delay(7.5), "7.5s");
/// assert_eq!(format_delay(0.0), "now");
/// ```
pub fn format_delay(secs: f32) -> String {
    if secs <= 0.0 {
        return "now".to_string();
    }
    format!("{:.1}s", secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_meters() {
        assert_eq!(format_meters(0.0), "0.00 m");
        assert_eq!(format_meters(0.126), "0.13 m");
        assert_eq!(format_meters(12.0), "12.00 m");
    }

    #[test]
    fn test_format_physical() {
        assert_eq!(format_physical(&PhysicalSize::new(0.2, 0.1)), "0.20 m x 0.10 m");
    }

    #[test]
    fn test_format_delay() {
        assert_eq!(format_delay(-1.0), "now");
        assert_eq!(format_delay(0.3), "0.3s");
        assert_eq!(format_delay(5.0), "5.0s");
    }
}
