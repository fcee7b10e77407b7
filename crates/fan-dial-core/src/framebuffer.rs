//! RAM framebuffer with per-pixel change detection.
//!
//! Pages draw into this buffer instead of straight to the panel. After a
//! frame, only the rectangle containing changed pixels is flushed to the
//! real display in one `fill_contiguous` call. Tests use it as a render
//! surface they can read back.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Heap-allocated framebuffer implementing `DrawTarget<Color = Rgb565>`.
///
/// Starts black. Tracks a dirty bounding box so that only changed pixels are
/// flushed to the hardware display.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a framebuffer of `size`, filled with black pixels.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    /// Read back a pixel. `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.width + x])
    }

    /// Rectangle of pixels changed since the last flush, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to another display, then reset the dirty state.
    ///
    /// If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        let width = area.size.width as usize;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        // Borrow the pixel slice so the closure captures a shared reference,
        // avoiding the `FnMut` escaping-reference issue with `&mut self`.
        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = self.width as i64;
        let h = self.height as i64;

        // Ends come from the unclamped origin so negative origins shrink the fill.
        let left = area.top_left.x as i64;
        let top = area.top_left.y as i64;
        let x_start = left.clamp(0, w) as usize;
        let y_start = top.clamp(0, h) as usize;
        let x_end = (left + area.size.width as i64).clamp(0, w) as usize;
        let y_end = (top + area.size.height as i64).clamp(0, h) as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_black_and_clean() {
        let fb = FrameBuffer::new(Size::new(8, 4));
        assert_eq!(fb.pixel(Point::new(7, 3)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(8, 0)), None);
        assert_eq!(fb.pixel(Point::new(-1, 0)), None);
        assert!(fb.dirty_area().is_none());
    }

    #[test]
    fn test_dirty_area_covers_changed_pixels_only() {
        let mut fb = FrameBuffer::new(Size::new(20, 20));
        fb.fill_solid(
            &Rectangle::new(Point::new(2, 3), Size::new(4, 5)),
            Rgb565::RED,
        )
        .unwrap();
        // Same color as before: no change
        fb.fill_solid(
            &Rectangle::new(Point::new(15, 15), Size::new(2, 2)),
            Rgb565::BLACK,
        )
        .unwrap();

        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(2, 3), Size::new(4, 5)))
        );
    }

    #[test]
    fn test_fill_solid_with_negative_origin_stays_inside_area() {
        let mut fb = FrameBuffer::new(Size::new(40, 10));
        fb.fill_solid(
            &Rectangle::new(Point::new(-10, -1), Size::new(20, 3)),
            Rgb565::RED,
        )
        .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(9, 1)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(10, 0)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(15, 0)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(0, 2)), Some(Rgb565::BLACK));
        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::zero(), Size::new(10, 2)))
        );
    }

    #[test]
    fn test_fill_solid_fully_off_screen_is_noop() {
        let mut fb = FrameBuffer::new(Size::new(10, 10));
        fb.fill_solid(
            &Rectangle::new(Point::new(-30, 2), Size::new(20, 3)),
            Rgb565::RED,
        )
        .unwrap();

        assert!(fb.dirty_area().is_none());
    }

    #[test]
    fn test_draw_iter_clips_out_of_bounds() {
        let mut fb = FrameBuffer::new(Size::new(4, 4));
        fb.draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::RED),
            Pixel(Point::new(4, 4), Rgb565::RED),
            Pixel(Point::new(1, 1), Rgb565::RED),
        ])
        .unwrap();

        assert_eq!(fb.pixel(Point::new(1, 1)), Some(Rgb565::RED));
        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(1, 1), Size::new(1, 1)))
        );
    }

    #[test]
    fn test_flush_copies_dirty_region_and_resets() {
        let mut fb = FrameBuffer::new(Size::new(10, 10));
        fb.fill_solid(
            &Rectangle::new(Point::new(1, 1), Size::new(3, 2)),
            Rgb565::GREEN,
        )
        .unwrap();

        let mut panel = FrameBuffer::new(Size::new(10, 10));
        fb.flush(&mut panel).unwrap();

        assert!(fb.dirty_area().is_none());
        assert_eq!(panel.pixel(Point::new(1, 1)), Some(Rgb565::GREEN));
        assert_eq!(panel.pixel(Point::new(3, 2)), Some(Rgb565::GREEN));
        assert_eq!(panel.pixel(Point::new(4, 2)), Some(Rgb565::BLACK));
        assert_eq!(
            panel.dirty_area(),
            Some(Rectangle::new(Point::new(1, 1), Size::new(3, 2)))
        );

        // Nothing changed since: flushing again touches nothing
        let mut untouched = FrameBuffer::new(Size::new(10, 10));
        fb.flush(&mut untouched).unwrap();
        assert!(untouched.dirty_area().is_none());
    }
}
