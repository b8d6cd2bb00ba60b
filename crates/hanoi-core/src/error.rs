/// A rejected disk-count request. The controller keeps its previous state
/// and reports the count it is still holding in `restored`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The count parsed but lies outside the accepted range.
    #[error("disk count {requested} is outside {min}..={max}; keeping {restored}")]
    OutOfRange {
        requested: u64,
        min: u32,
        max: u32,
        restored: u32,
    },

    /// The input was not an unsigned integer.
    #[error("'{input}' is not a number; keeping {restored}")]
    NotNumeric { input: String, restored: u32 },
}

impl InputError {
    /// The disk count that remains in effect after the rejection.
    pub fn restored(&self) -> u32 {
        match self {
            InputError::OutOfRange { restored, .. } | InputError::NotNumeric { restored, .. } => {
                *restored
            }
        }
    }
}

/// An inconsistent simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A length that must be strictly positive was zero or negative.
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    /// A duration was negative.
    #[error("{field} must not be negative")]
    NegativeDuration { field: &'static str },

    /// The disk-count range is empty or its default lies outside it.
    #[error("invalid disk count range: min {min}, max {max}, default {default}")]
    InvalidRange { min: u32, max: u32, default: u32 },

    /// The smallest disk allowed by the range would have no size.
    #[error("disk {index} would have non-positive size")]
    DegenerateDisk { index: u32 },
}
