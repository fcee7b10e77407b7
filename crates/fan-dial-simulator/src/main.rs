//! Desktop simulator for the fan speed dial.
//!
//! Hosts [`FanControlPage`] on a `SimulatorDisplay` via
//! `embedded-graphics-simulator`. Frames are drawn into a
//! [`FrameBuffer`] and flushed to the simulator display, the same way the
//! firmware drives its panel.
//!
//! By default it runs headless: it taps through every fan speed and writes
//! one PNG per state into the output directory (first argument, default
//! `target/fan-dial`). Build with `--features window` for an interactive
//! SDL2 window.
//!
//! # Key bindings (window mode)
//!
//! | Key        | Action                 |
//! |------------|------------------------|
//! | Space      | Click the dial         |
//! | Q / Escape | Quit                   |
//!
//! Mouse clicks are forwarded as touch events.
//!
//! # Environment
//!
//! `FAN_DIAL_COLOR_LOW`, `FAN_DIAL_COLOR_MEDIUM` and `FAN_DIAL_COLOR_HIGH`
//! override the dial colors (`#RRGGBB`). `RUST_LOG` controls logging.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use log::{error, info};

use fan_dial_core::DialConfig;
use fan_dial_core::framebuffer::FrameBuffer;
use fan_dial_core::pages::{FanControlPage, Page};
use fan_dial_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, DialColors};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window and snapshots.
const WINDOW_SCALE: u32 = 2;

/// Fallback dial colors when the environment doesn't set them.
const DEFAULT_COLOR_LOW: &str = "#76FF03";
const DEFAULT_COLOR_MEDIUM: &str = "#FFEB3B";
const DEFAULT_COLOR_HIGH: &str = "#FF5722";

/// Default snapshot directory for headless runs.
#[cfg(not(feature = "window"))]
const DEFAULT_OUTPUT_DIR: &str = "target/fan-dial";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Dial colors read from the environment, owned so a [`DialConfig`] can
/// borrow from them.
struct EnvColors {
    low: String,
    medium: String,
    high: String,
}

impl EnvColors {
    fn load() -> Self {
        let read =
            |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.into());
        Self {
            low: read("FAN_DIAL_COLOR_LOW", DEFAULT_COLOR_LOW),
            medium: read("FAN_DIAL_COLOR_MEDIUM", DEFAULT_COLOR_MEDIUM),
            high: read("FAN_DIAL_COLOR_HIGH", DEFAULT_COLOR_HIGH),
        }
    }

    fn config(&self) -> DialConfig<'_> {
        DialConfig::new(&self.low, &self.medium, &self.high)
    }
}

// ---------------------------------------------------------------------------
// Page helpers
// ---------------------------------------------------------------------------

/// Size of the simulated panel.
fn screen_size() -> Size {
    Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32)
}

fn create_page(config: &DialConfig<'_>) -> FanControlPage {
    let mut page = FanControlPage::new(
        Rectangle::new(Point::zero(), screen_size()),
        DialColors::from_config(config),
    );
    page.on_activate();
    page
}

/// Draw the page into the framebuffer and push the changed area to `display`.
fn render(
    page: &mut FanControlPage,
    fb: &mut FrameBuffer,
    display: &mut SimulatorDisplay<Rgb565>,
) {
    if let Err(e) = Page::draw_page(page, fb) {
        error!("Draw error: {:?}", e);
    }
    Page::mark_clean(page);
    if let Err(e) = fb.flush(display) {
        error!("Flush error: {:?}", e);
    }
}

// ---------------------------------------------------------------------------
// Headless snapshots
// ---------------------------------------------------------------------------

#[cfg(not(feature = "window"))]
fn run(page: &mut FanControlPage, fb: &mut FrameBuffer, display: &mut SimulatorDisplay<Rgb565>) {
    use std::path::PathBuf;

    let out_dir = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()),
    );
    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        error!("Cannot create {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();

    for step in 0..fan_dial_core::FanSpeed::ALL.len() {
        if step > 0 {
            page.dial_mut().perform_click();
        }
        render(page, fb, display);

        let speed = page.dial().fan_speed();
        let path = out_dir.join(format!("dial-{}-{}.png", speed.ordinal(), speed.label()));
        match display.to_rgb_output_image(&output_settings).save_png(&path) {
            Ok(()) => info!("Wrote {:?} snapshot to {}", speed, path.display()),
            Err(e) => {
                error!("Failed to write {}: {:?}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive window
// ---------------------------------------------------------------------------

#[cfg(feature = "window")]
fn run(page: &mut FanControlPage, fb: &mut FrameBuffer, display: &mut SimulatorDisplay<Rgb565>) {
    use std::time::{Duration, Instant};

    use embedded_graphics_simulator::{SimulatorEvent, Window, sdl2::Keycode};
    use fan_dial_core::ui::{TouchEvent, TouchPoint};

    /// Target frame duration (~30 FPS).
    const FRAME_DURATION: Duration = Duration::from_millis(33);

    info!("Keys: Space=Click  Q=Quit");

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Fan Dial Simulator", &output_settings);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    render(page, fb, display);
    window.update(display);

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }

                    if keycode == Keycode::Space {
                        page.dial_mut().perform_click();
                        info!("Click → {:?}", page.dial().fan_speed());
                    }
                }

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch = TouchEvent::Press(TouchPoint::new(
                        point.x.max(0) as u16,
                        point.y.max(0) as u16,
                    ));

                    if let Some(action) = Page::handle_touch(page, touch) {
                        info!("Touch → action {:?}", action);
                    }
                }

                _ => {}
            }
        }

        Page::update(page);

        if Page::is_dirty(page) {
            render(page, fb, display);
        }

        window.update(display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting fan-dial simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );

    let colors = EnvColors::load();
    let config = colors.config();

    let mut display = SimulatorDisplay::<Rgb565>::new(screen_size());
    let mut fb = FrameBuffer::new(screen_size());
    let mut page = create_page(&config);

    run(&mut page, &mut fb, &mut display);

    page.on_deactivate();
    info!("Simulator exiting");
}
