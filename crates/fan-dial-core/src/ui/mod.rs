// src/ui/mod.rs
//! Fan dial UI system
//!
//! - Core traits for drawable and touchable elements
//! - The dial component and its geometry
//! - Fixed colors and color parsing
//! - Dirty region tracking for efficient rendering

pub mod components;
pub mod core;
pub mod styling;

/// Width of the reference display in pixels
pub const DISPLAY_WIDTH_PX: u16 = 320;

/// Height of the reference display in pixels
pub const DISPLAY_HEIGHT_PX: u16 = 240;

// Re-export commonly used items
pub use components::{ClickInterceptor, DialColors, DialWidget};
pub use self::core::{
    Action, DirtyRegion, Drawable, PageId, TouchEvent, TouchPoint, TouchResult, Touchable,
};
