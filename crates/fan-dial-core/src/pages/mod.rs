//! Pages hosting the dial

pub mod fan_control;
pub mod page;

pub use fan_control::FanControlPage;
pub use page::Page;
