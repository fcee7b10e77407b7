//! Hardware-independent core library for the fan speed dial
//!
//! This crate contains the dial widget itself (state, input handling and
//! rendering), its configuration, the page that hosts it, and a RAM
//! framebuffer render surface.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on both
//! embedded targets and desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod config;
pub mod fan_speed;
pub mod framebuffer;
pub mod pages;
pub mod ui;

pub use config::{ConfigError, DialConfig};
pub use fan_speed::{FanSpeed, FanSpeedConvError};
