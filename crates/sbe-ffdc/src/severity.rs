//! Engine-reported criticality of an FFDC record.

/// Severity byte carried in the FFDC record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Severity {
    /// No severity assigned.
    #[default]
    Undefined = 0,
    /// Failure was recovered by the engine.
    Recovered = 1,
    /// Failure predicts a future unrecoverable condition.
    Predictive = 2,
    /// Failure could not be recovered.
    Unrecoverable = 3,
}

impl Severity {
    /// Converts a severity to its wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a wire byte back into a severity.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Undefined),
            1 => Some(Self::Recovered),
            2 => Some(Self::Predictive),
            3 => Some(Self::Unrecoverable),
            _ => None,
        }
    }
}
