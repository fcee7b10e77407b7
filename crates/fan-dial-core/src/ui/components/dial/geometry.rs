//! Dial geometry: radius from widget size and the angular placement of each
//! fan speed.
//!
//! Every state sits on a fan of 45° steps starting at 9π/8 (just past the
//! left-hand side of the dial, measured clockwise in screen coordinates).
//! Positions are widget-local: `(0, 0)` is the widget's top-left corner.

use core::f32::consts::PI;

use embedded_graphics::prelude::*;
use libm::{cosf, roundf, sinf};

use crate::fan_speed::FanSpeed;

/// Angle of the first state (`Off`)
pub const START_ANGLE: f32 = PI * 9.0 / 8.0;

/// Angular distance between neighbouring states
pub const ANGLE_STEP: f32 = PI / 4.0;

/// Dial diameter as a fraction of the widget's shorter side
pub const DIAL_SIZE_FRACTION: f32 = 0.8;

/// Labels sit this far outside the dial edge
pub const RADIUS_OFFSET_LABEL: f32 = 30.0;

/// The marker sits this far inside the dial edge
pub const RADIUS_OFFSET_INDICATOR: f32 = -35.0;

/// Marker radius is the dial radius divided by this
pub const MARKER_RADIUS_DIVISOR: f32 = 12.0;

/// Sub-pixel position produced by the geometry functions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Snap to the nearest pixel.
    pub fn to_point(self) -> Point {
        Point::new(roundf(self.x) as i32, roundf(self.y) as i32)
    }
}

/// Dial radius for a widget of the given size.
pub fn dial_radius(size: Size) -> f32 {
    size.width.min(size.height) as f32 * DIAL_SIZE_FRACTION / 2.0
}

/// Widget-local center of the dial. Halves are truncated to whole pixels.
pub fn dial_center(size: Size) -> PointF {
    PointF::new((size.width / 2) as f32, (size.height / 2) as f32)
}

/// Angle, in radians, at which `speed` is placed.
pub fn fan_speed_angle(speed: FanSpeed) -> f32 {
    START_ANGLE + speed.ordinal() as f32 * ANGLE_STEP
}

/// Widget-local position of `speed` on a circle of `radius` around the
/// dial center.
pub fn fan_speed_position(size: Size, speed: FanSpeed, radius: f32) -> PointF {
    let angle = fan_speed_angle(speed);
    let center = dial_center(size);
    PointF::new(
        radius * cosf(angle) + center.x,
        radius * sinf(angle) + center.y,
    )
}
