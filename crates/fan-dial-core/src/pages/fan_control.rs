use embedded_graphics::prelude::*;
use embedded_graphics::{
    Drawable as EgDrawable,
    pixelcolor::Rgb565,
    primitives::{PrimitiveStyle, Rectangle},
};
use log::info;

use crate::pages::page::Page;
use crate::ui::styling::WHITE;
use crate::ui::{
    Action, DialColors, DialWidget, Drawable, PageId, TouchEvent, TouchResult, Touchable,
};

/// Full-screen page hosting a single fan speed dial.
///
/// Owns input dispatch for the dial: presses anywhere on the page become
/// clicks, and the resulting accessibility description is logged.
pub struct FanControlPage {
    bounds: Rectangle,
    dial: DialWidget,
    dirty: bool,
}

impl FanControlPage {
    pub fn new(bounds: Rectangle, colors: DialColors) -> Self {
        Self {
            bounds,
            dial: DialWidget::new(bounds, colors),
            dirty: true,
        }
    }

    pub fn dial(&self) -> &DialWidget {
        &self.dial
    }

    pub fn dial_mut(&mut self) -> &mut DialWidget {
        &mut self.dial
    }

    /// Resize the page; the dial always fills it.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.dial.set_bounds(bounds);
            self.dirty = true;
        }
    }
}

impl Page for FanControlPage {
    fn id(&self) -> PageId {
        PageId::FanControl
    }

    fn title(&self) -> &str {
        "Fan Control"
    }

    fn on_activate(&mut self) {
        self.dirty = true;
    }

    fn handle_touch(&mut self, event: TouchEvent) -> Option<Action> {
        match self.dial.handle_touch(event) {
            TouchResult::Action(action) => {
                info!("Dial now reads \"{}\"", self.dial.content_description());
                Some(action)
            }
            TouchResult::Handled | TouchResult::NotHandled => None,
        }
    }

    fn update(&mut self) {}

    fn draw_page<D: DrawTarget<Color = Rgb565>>(
        &mut self,
        display: &mut D,
    ) -> Result<(), D::Error> {
        Drawable::draw(self, display)
    }

    fn bounds(&self) -> Rectangle {
        Drawable::bounds(self)
    }

    fn is_dirty(&self) -> bool {
        Drawable::is_dirty(self)
    }

    fn mark_clean(&mut self) {
        Drawable::mark_clean(self)
    }

    fn mark_dirty(&mut self) {
        Drawable::mark_dirty(self)
    }
}

impl Drawable for FanControlPage {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        // Clear background so labels from the previous frame don't linger.
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(WHITE))
            .draw(display)?;

        self.dial.draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty || self.dial.is_dirty()
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
        self.dial.mark_clean();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.dial.mark_dirty();
    }
}
