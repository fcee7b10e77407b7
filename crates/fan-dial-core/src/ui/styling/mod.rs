//! Styling for the dial
//!
//! The dial is unthemed: three fill colors come from
//! configuration, everything else is fixed. See [`colors`].

pub mod colors;

pub use colors::{BLANK, ColorParseError, GRAY, MARKER, WHITE, from_rgb888, parse_hex_color};
