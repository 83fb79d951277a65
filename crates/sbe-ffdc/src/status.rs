//! Primary/secondary status word returned with every chip-op response.

/// Engine outcome code for the command that produced a response.
///
/// The raw 32-bit word carries the primary status in bits 16..=31 and the
/// secondary status in bits 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StatusWord {
    /// Primary status (high half-word).
    pub primary: u16,
    /// Secondary status (low half-word).
    pub secondary: u16,
}

impl StatusWord {
    /// Primary and secondary value reported for a successful command.
    pub const SUCCESS: Self = Self::new(0, 0);

    /// Builds a status word from its two halves.
    #[must_use]
    pub const fn new(primary: u16, secondary: u16) -> Self {
        Self { primary, secondary }
    }

    /// Splits a raw status word into its two halves.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(raw: u32) -> Self {
        Self {
            primary: (raw >> 16) as u16,
            secondary: raw as u16,
        }
    }

    /// Reassembles the raw status word.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        ((self.primary as u32) << 16) | self.secondary as u32
    }

    /// Returns `true` when both halves report success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.primary == 0 && self.secondary == 0
    }
}

impl From<u32> for StatusWord {
    fn from(raw: u32) -> Self {
        Self::from_u32(raw)
    }
}

impl From<StatusWord> for u32 {
    fn from(status: StatusWord) -> Self {
        status.as_u32()
    }
}
