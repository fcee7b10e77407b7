//! Color definitions for the dial
//!
//! All colors are RGB565, the native format of the target panels.
//! To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use thiserror_no_std::Error;

// ============================================================================
// Fixed Colors
// ============================================================================

/// Dial fill while the fan is off (0x888888). Not configurable.
pub const GRAY: Rgb565 = Rgb565::new(0x88 >> 3, 0x88 >> 2, 0x88 >> 3);

/// Marker and label color
pub const MARKER: Rgb565 = Rgb565::new(0, 0, 0);

/// Page background behind the dial
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Color used when a configured color is missing or unreadable
pub const BLANK: Rgb565 = Rgb565::new(0, 0, 0);

// ============================================================================
// Parsing
// ============================================================================

/// Errors from [`parse_hex_color`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Not exactly six hex digits after the optional `#`
    #[error("color must be 6 hex digits, got {len}")]
    InvalidLength { len: usize },

    /// A character outside `0-9a-fA-F`
    #[error("invalid hex digit in color")]
    InvalidDigit,
}

/// Parse `#RRGGBB` or `RRGGBB` into an RGB565 color.
pub fn parse_hex_color(value: &str) -> Result<Rgb565, ColorParseError> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() != 6 {
        return Err(ColorParseError::InvalidLength { len: digits.len() });
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidDigit);
    }

    let rgb = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError::InvalidDigit)?;
    Ok(from_rgb888(rgb))
}

/// Convert a packed `0xRRGGBB` value to RGB565.
pub fn from_rgb888(rgb: u32) -> Rgb565 {
    let r = (rgb >> 16) as u8;
    let g = (rgb >> 8) as u8;
    let b = rgb as u8;
    Rgb565::from(Rgb888::new(r, g, b))
}
