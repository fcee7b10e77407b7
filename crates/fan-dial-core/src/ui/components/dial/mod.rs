// src/ui/components/dial/mod.rs
//! Fan speed dial: a tappable disc that cycles through the four fan speeds
//!
//! The dial draws a filled circle colored by the current speed, a small
//! marker pointing at the current speed, and a label for every speed placed
//! around the outside of the circle.

pub mod geometry;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_9X18_BOLD};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment as TextAlignment, Text};
use libm::roundf;
use log::{debug, warn};

use crate::config::DialConfig;
use crate::fan_speed::FanSpeed;
use crate::ui::core::{Action, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable};
use crate::ui::styling::{BLANK, GRAY, MARKER, parse_hex_color};
use geometry::{
    MARKER_RADIUS_DIVISOR, PointF, RADIUS_OFFSET_INDICATOR, RADIUS_OFFSET_LABEL, dial_center,
    dial_radius, fan_speed_position,
};

/// Font used for the speed labels
pub const LABEL_FONT: &MonoFont<'static> = &FONT_9X18_BOLD;

/// Hook that sees a click before the dial does.
///
/// Receives the current speed; returning `true` consumes the click and the
/// dial stays where it is.
pub type ClickInterceptor = fn(FanSpeed) -> bool;

/// Fill colors for the three running speeds. `Off` is always [`GRAY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialColors {
    pub low: Rgb565,
    pub medium: Rgb565,
    pub high: Rgb565,
}

impl Default for DialColors {
    fn default() -> Self {
        Self {
            low: BLANK,
            medium: BLANK,
            high: BLANK,
        }
    }
}

impl DialColors {
    pub fn new(low: Rgb565, medium: Rgb565, high: Rgb565) -> Self {
        Self { low, medium, high }
    }

    /// Resolve colors from configuration.
    ///
    /// Missing entries fall back to [`BLANK`] quietly, unreadable ones with a
    /// warning.
    pub fn from_config(config: &DialConfig<'_>) -> Self {
        Self {
            low: resolve_color("fan_color_1", config.fan_color_1),
            medium: resolve_color("fan_color_2", config.fan_color_2),
            high: resolve_color("fan_color_3", config.fan_color_3),
        }
    }

    /// Fill color for `speed`.
    pub fn for_speed(&self, speed: FanSpeed) -> Rgb565 {
        match speed {
            FanSpeed::Off => GRAY,
            FanSpeed::Low => self.low,
            FanSpeed::Medium => self.medium,
            FanSpeed::High => self.high,
        }
    }
}

fn resolve_color(name: &str, value: Option<&str>) -> Rgb565 {
    let Some(value) = value else {
        return BLANK;
    };

    parse_hex_color(value).unwrap_or_else(|e| {
        warn!("Ignoring {} = {:?}: {}", name, value, e);
        BLANK
    })
}

/// Diameter in whole pixels for a circle of `radius`. Negative radii draw nothing.
fn diameter(radius: f32) -> u32 {
    roundf(radius * 2.0).max(0.0) as u32
}

/// Circular fan speed control.
///
/// Starts at [`FanSpeed::Off`]. Each click advances to the next speed,
/// wrapping from `High` back to `Off`, updates the accessibility description
/// and marks the dial dirty.
///
/// # Examples
/// ```ignore
/// let mut dial = DialWidget::new(
///     Rectangle::new(Point::zero(), Size::new(320, 240)),
///     DialColors::new(Rgb565::GREEN, Rgb565::YELLOW, Rgb565::RED),
/// );
/// dial.perform_click();
/// assert_eq!(dial.fan_speed(), FanSpeed::Low);
/// assert_eq!(dial.content_description(), "1");
/// ```
pub struct DialWidget {
    bounds: Rectangle,
    radius: f32,
    fan_speed: FanSpeed,
    colors: DialColors,
    content_description: heapless::String<8>,
    click_interceptor: Option<ClickInterceptor>,
    dirty: bool,
}

impl DialWidget {
    pub fn new(bounds: Rectangle, colors: DialColors) -> Self {
        Self {
            bounds,
            radius: dial_radius(bounds.size),
            fan_speed: FanSpeed::Off,
            colors,
            content_description: heapless::String::new(),
            click_interceptor: None,
            dirty: true,
        }
    }

    pub fn from_config(bounds: Rectangle, config: &DialConfig<'_>) -> Self {
        Self::new(bounds, DialColors::from_config(config))
    }

    pub fn with_click_interceptor(mut self, interceptor: ClickInterceptor) -> Self {
        self.click_interceptor = Some(interceptor);
        self
    }

    pub fn set_click_interceptor(&mut self, interceptor: Option<ClickInterceptor>) {
        self.click_interceptor = interceptor;
    }

    /// Move or resize the dial. The radius follows the new size.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.radius = dial_radius(bounds.size);
            self.dirty = true;
            debug!(
                "Dial resized to {}x{}, radius {}",
                bounds.size.width, bounds.size.height, self.radius
            );
        }
    }

    /// Handle a click from the host.
    ///
    /// Always reports the click as handled, even when the interceptor
    /// consumed it.
    pub fn perform_click(&mut self) -> bool {
        if let Some(intercept) = self.click_interceptor
            && intercept(self.fan_speed)
        {
            return true;
        }

        let previous = self.fan_speed;
        self.fan_speed = previous.next();

        self.content_description.clear();
        self.content_description
            .push_str(self.fan_speed.label())
            .ok();

        self.dirty = true;
        debug!("Fan speed {:?} -> {:?}", previous, self.fan_speed);
        true
    }

    pub fn fan_speed(&self) -> FanSpeed {
        self.fan_speed
    }

    /// Accessibility text. Empty until the first click.
    pub fn content_description(&self) -> &str {
        &self.content_description
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn colors(&self) -> DialColors {
        self.colors
    }

    /// Disc color for the current speed.
    pub fn fill_color(&self) -> Rgb565 {
        self.colors.for_speed(self.fan_speed)
    }

    /// Widget-local center of the marker for the current speed.
    pub fn marker_position(&self) -> PointF {
        fan_speed_position(
            self.bounds.size,
            self.fan_speed,
            self.radius + RADIUS_OFFSET_INDICATOR,
        )
    }

    pub fn marker_radius(&self) -> f32 {
        self.radius / MARKER_RADIUS_DIVISOR
    }

    /// Widget-local anchor (horizontal center, baseline) of `speed`'s label.
    pub fn label_position(&self, speed: FanSpeed) -> PointF {
        fan_speed_position(self.bounds.size, speed, self.radius + RADIUS_OFFSET_LABEL)
    }

    fn to_screen(&self, local: PointF) -> Point {
        local.to_point() + self.bounds.top_left
    }
}

impl Drawable for DialWidget {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        // Disc
        let center = self.to_screen(dial_center(self.bounds.size));
        Circle::with_center(center, diameter(self.radius))
            .into_styled(PrimitiveStyle::with_fill(self.fill_color()))
            .draw(display)?;

        // Marker
        let marker = self.to_screen(self.marker_position());
        Circle::with_center(marker, diameter(self.marker_radius()))
            .into_styled(PrimitiveStyle::with_fill(MARKER))
            .draw(display)?;

        // Labels
        let text_style = MonoTextStyle::new(LABEL_FONT, MARKER);
        for speed in FanSpeed::ALL {
            let anchor = self.to_screen(self.label_position(speed));
            Text::with_alignment(speed.label(), anchor, text_style, TextAlignment::Center)
                .draw(display)?;
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Touchable for DialWidget {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> TouchResult {
        match event {
            TouchEvent::Press(point) if self.contains_point(point) => {
                let before = self.fan_speed;
                self.perform_click();

                if self.fan_speed != before {
                    TouchResult::Action(Action::FanSpeedChanged(self.fan_speed))
                } else {
                    TouchResult::Handled
                }
            }
            _ => TouchResult::NotHandled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use libm::fabsf;

    const GREEN: Rgb565 = Rgb565::new(0, 63, 0);
    const YELLOW: Rgb565 = Rgb565::new(31, 63, 0);
    const RED: Rgb565 = Rgb565::new(31, 0, 0);

    fn colors() -> DialColors {
        DialColors::new(GREEN, YELLOW, RED)
    }

    fn dial(width: u32, height: u32) -> DialWidget {
        DialWidget::new(
            Rectangle::new(Point::zero(), Size::new(width, height)),
            colors(),
        )
    }

    fn always_consume(_: FanSpeed) -> bool {
        true
    }

    fn consume_when_high(speed: FanSpeed) -> bool {
        speed == FanSpeed::High
    }

    #[test]
    fn test_starts_off_with_empty_description() {
        let dial = dial(320, 240);
        assert_eq!(dial.fan_speed(), FanSpeed::Off);
        assert_eq!(dial.content_description(), "");
        assert!(Drawable::is_dirty(&dial));
    }

    #[test]
    fn test_clicks_cycle_through_all_speeds() {
        let mut dial = dial(320, 240);
        for n in 1..=9 {
            assert!(dial.perform_click());
            assert_eq!(dial.fan_speed(), FanSpeed::ALL[n % 4]);
        }
    }

    #[test]
    fn test_description_tracks_new_speed() {
        let mut dial = dial(320, 240);
        for _ in 0..5 {
            dial.perform_click();
            assert_eq!(dial.content_description(), dial.fan_speed().label());
        }
    }

    #[test]
    fn test_click_marks_dirty() {
        let mut dial = dial(320, 240);
        Drawable::mark_clean(&mut dial);
        assert!(dial.dirty_region().is_none());

        dial.perform_click();
        assert!(Drawable::is_dirty(&dial));
        assert_eq!(
            dial.dirty_region().map(|r| r.bounds),
            Some(Drawable::bounds(&dial))
        );
    }

    #[test]
    fn test_interceptor_consumes_click() {
        let mut dial = dial(320, 240).with_click_interceptor(always_consume);
        Drawable::mark_clean(&mut dial);

        assert!(dial.perform_click(), "a consumed click is still handled");
        assert_eq!(dial.fan_speed(), FanSpeed::Off);
        assert_eq!(dial.content_description(), "");
        assert!(!Drawable::is_dirty(&dial));

        dial.set_click_interceptor(None);
        dial.perform_click();
        assert_eq!(dial.fan_speed(), FanSpeed::Low);
    }

    #[test]
    fn test_interceptor_sees_current_speed() {
        let mut dial = dial(320, 240).with_click_interceptor(consume_when_high);
        for _ in 0..6 {
            dial.perform_click();
        }
        assert_eq!(dial.fan_speed(), FanSpeed::High);
    }

    #[test]
    fn test_fill_color_per_speed() {
        let mut dial = dial(320, 240);
        let expected = [GRAY, GREEN, YELLOW, RED];
        for color in expected {
            assert_eq!(dial.fill_color(), color);
            dial.perform_click();
        }
    }

    #[test]
    fn test_off_is_gray_whatever_the_config() {
        let gray_like = DialColors::new(GRAY, GRAY, GRAY);
        assert_eq!(gray_like.for_speed(FanSpeed::Off), GRAY);
        assert_eq!(colors().for_speed(FanSpeed::Off), GRAY);
        assert_eq!(DialColors::default().for_speed(FanSpeed::Off), GRAY);
    }

    #[test]
    fn test_colors_from_config() {
        let config = DialConfig::new("#00FF00", "#FFFF00", "#FF0000");
        assert_eq!(
            DialColors::from_config(&config),
            DialColors::new(Rgb565::GREEN, Rgb565::YELLOW, Rgb565::RED)
        );
    }

    #[test]
    fn test_unset_or_bad_config_colors_fall_back_to_blank() {
        let config = DialConfig {
            fan_color_1: None,
            fan_color_2: Some("not a color"),
            fan_color_3: Some("#0000FF"),
        };
        let colors = DialColors::from_config(&config);
        assert_eq!(colors.low, BLANK);
        assert_eq!(colors.medium, BLANK);
        assert_eq!(colors.high, Rgb565::BLUE);
    }

    #[test]
    fn test_radius_follows_bounds() {
        let mut dial = dial(320, 240);
        assert_eq!(dial.radius(), 96.0);

        Drawable::mark_clean(&mut dial);
        dial.set_bounds(Rectangle::new(Point::new(10, 10), Size::new(100, 400)));
        assert_eq!(dial.radius(), 40.0);
        assert!(Drawable::is_dirty(&dial));

        // Same bounds again is not a change
        Drawable::mark_clean(&mut dial);
        dial.set_bounds(Rectangle::new(Point::new(10, 10), Size::new(100, 400)));
        assert!(!Drawable::is_dirty(&dial));
    }

    #[test]
    fn test_marker_and_label_positions() {
        let size = Size::new(400, 300);
        let mut dial = dial(size.width, size.height);
        let radius = dial.radius();
        let marker_r = radius + RADIUS_OFFSET_INDICATOR;
        let label_r = radius + RADIUS_OFFSET_LABEL;

        let expect = |r: f32, angle: f32| {
            PointF::new(r * libm::cosf(angle) + 200.0, r * libm::sinf(angle) + 150.0)
        };
        let close = |a: PointF, b: PointF| fabsf(a.x - b.x) < 1e-3 && fabsf(a.y - b.y) < 1e-3;

        let off_angle = 9.0 * core::f32::consts::PI / 8.0;
        assert!(close(dial.marker_position(), expect(marker_r, off_angle)));
        assert!(close(
            dial.label_position(FanSpeed::Off),
            expect(label_r, off_angle)
        ));

        for _ in 0..3 {
            dial.perform_click();
        }
        let high_angle = off_angle + 3.0 * core::f32::consts::PI / 4.0;
        assert_eq!(dial.fan_speed(), FanSpeed::High);
        assert!(close(dial.marker_position(), expect(marker_r, high_angle)));
        assert!(close(
            dial.label_position(FanSpeed::High),
            expect(label_r, high_angle)
        ));

        assert_eq!(dial.marker_radius(), radius / 12.0);
    }

    #[test]
    fn test_press_inside_produces_action() {
        let mut dial = dial(320, 240);
        let result = dial.handle_touch(TouchEvent::Press(TouchPoint::new(160, 120)));
        assert_eq!(
            result,
            TouchResult::Action(Action::FanSpeedChanged(FanSpeed::Low))
        );
    }

    #[test]
    fn test_press_outside_and_drag_are_ignored() {
        let mut dial = DialWidget::new(
            Rectangle::new(Point::new(100, 100), Size::new(50, 50)),
            colors(),
        );
        assert_eq!(
            dial.handle_touch(TouchEvent::Press(TouchPoint::new(10, 10))),
            TouchResult::NotHandled
        );
        assert_eq!(
            dial.handle_touch(TouchEvent::Drag(TouchPoint::new(120, 120))),
            TouchResult::NotHandled
        );
        assert_eq!(dial.fan_speed(), FanSpeed::Off);
    }

    #[test]
    fn test_consumed_press_is_handled_without_action() {
        let mut dial = dial(320, 240).with_click_interceptor(always_consume);
        assert_eq!(
            dial.handle_touch(TouchEvent::Press(TouchPoint::new(5, 5))),
            TouchResult::Handled
        );
    }

    #[test]
    fn test_draw_paints_disc_and_marker() {
        let size = Size::new(320, 240);
        let mut fb = FrameBuffer::new(size);
        fb.clear(Rgb565::WHITE).unwrap();

        let mut dial = dial(size.width, size.height);
        Drawable::draw(&dial, &mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(160, 120)), Some(GRAY));
        let marker = dial.marker_position().to_point();
        assert_eq!(fb.pixel(marker), Some(MARKER));
        // Corners are outside the dial and its labels
        assert_eq!(fb.pixel(Point::new(0, 239)), Some(Rgb565::WHITE));

        dial.perform_click();
        Drawable::draw(&dial, &mut fb).unwrap();
        assert_eq!(fb.pixel(Point::new(160, 120)), Some(GREEN));
        assert_eq!(fb.pixel(dial.marker_position().to_point()), Some(MARKER));
    }

    #[test]
    fn test_draw_respects_offset_bounds() {
        let mut fb = FrameBuffer::new(Size::new(200, 200));
        fb.clear(Rgb565::WHITE).unwrap();

        let dial = DialWidget::new(
            Rectangle::new(Point::new(100, 100), Size::new(100, 100)),
            colors(),
        );
        Drawable::draw(&dial, &mut fb).unwrap();

        assert_eq!(fb.pixel(Point::new(150, 150)), Some(GRAY));
        assert_eq!(fb.pixel(Point::new(50, 50)), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_draw_with_negative_origin_stays_inside_dial() {
        let mut fb = FrameBuffer::new(Size::new(200, 200));
        fb.clear(Rgb565::WHITE).unwrap();

        // Center lands on screen x = 0, disc spans x = -80..80
        let dial = DialWidget::new(
            Rectangle::new(Point::new(-100, 0), Size::new(200, 200)),
            colors(),
        );
        Drawable::draw(&dial, &mut fb).unwrap();

        assert_eq!(fb.pixel(Point::new(0, 100)), Some(GRAY));
        assert_eq!(fb.pixel(Point::new(60, 100)), Some(GRAY));
        assert_eq!(fb.pixel(Point::new(150, 100)), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(Point::new(199, 199)), Some(Rgb565::WHITE));
    }

    #[test]
    fn test_draw_paints_every_label_outside_disc() {
        let size = Size::new(400, 400);
        let mut fb = FrameBuffer::new(size);
        fb.clear(Rgb565::WHITE).unwrap();

        let dial = dial(size.width, size.height);
        Drawable::draw(&dial, &mut fb).unwrap();

        let center = dial_center(size).to_point();
        let radius = dial.radius() as i32;

        for speed in FanSpeed::ALL {
            let anchor = dial.label_position(speed).to_point();
            let mut inked = 0;

            // One glyph cell either side of the anchor, from cap height to descender
            for y in anchor.y - 18..=anchor.y + 4 {
                for x in anchor.x - 18..=anchor.x + 18 {
                    let p = Point::new(x, y);
                    if fb.pixel(p) != Some(MARKER) {
                        continue;
                    }
                    let d = p - center;
                    assert!(
                        d.x * d.x + d.y * d.y > radius * radius,
                        "label {:?} ink at {:?} is inside the disc",
                        speed,
                        p
                    );
                    inked += 1;
                }
            }

            assert!(inked > 0, "no label drawn for {:?}", speed);
        }
    }
}
