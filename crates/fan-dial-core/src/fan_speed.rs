//! Discrete fan speed states shown on the dial

use thiserror_no_std::Error;

/// Operating state of the fan, in dial order.
///
/// The discriminant is the ordinal used to place the state around the dial.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FanSpeed {
    #[default]
    Off = 0,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    /// Every state in declared order.
    pub const ALL: [FanSpeed; 4] = [
        FanSpeed::Off,
        FanSpeed::Low,
        FanSpeed::Medium,
        FanSpeed::High,
    ];

    /// The state a single tap moves to. `High` wraps back to `Off`.
    pub fn next(self) -> Self {
        match self {
            FanSpeed::Off => FanSpeed::Low,
            FanSpeed::Low => FanSpeed::Medium,
            FanSpeed::Medium => FanSpeed::High,
            FanSpeed::High => FanSpeed::Off,
        }
    }

    /// Zero-based position of this state on the dial.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Text drawn next to the dial and reported as the accessibility description.
    pub fn label(self) -> &'static str {
        match self {
            FanSpeed::Off => "off",
            FanSpeed::Low => "1",
            FanSpeed::Medium => "2",
            FanSpeed::High => "3",
        }
    }
}

impl From<FanSpeed> for u8 {
    fn from(value: FanSpeed) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = FanSpeedConvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FanSpeed::ALL
            .get(value as usize)
            .copied()
            .ok_or(FanSpeedConvError { value })
    }
}

/// Returned when an integer does not name a [`FanSpeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{value} is not a fan speed ordinal (expected 0..=3)")]
pub struct FanSpeedConvError {
    pub value: u8,
}
