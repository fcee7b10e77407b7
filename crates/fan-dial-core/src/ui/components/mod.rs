//! UI components

pub mod dial;

pub use dial::{ClickInterceptor, DialColors, DialWidget, LABEL_FONT};
