//! Caller-selected decode behaviour.

/// Top-level configuration for a response decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodeConfig {
    /// Walks the FFDC chain that follows the status word.
    pub want_diagnostics: bool,
    /// Also decodes the leading payload as an FFDC chain when it opens with
    /// the FFDC sentinel. Only honoured together with `want_diagnostics`.
    pub decode_nested_payload: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            want_diagnostics: true,
            decode_nested_payload: false,
        }
    }
}

impl DecodeConfig {
    /// Configuration that only extracts payload and status.
    #[must_use]
    pub const fn status_only() -> Self {
        Self {
            want_diagnostics: false,
            decode_nested_payload: false,
        }
    }

    /// Enables or disables FFDC decoding.
    #[must_use]
    pub const fn with_diagnostics(mut self, want_diagnostics: bool) -> Self {
        self.want_diagnostics = want_diagnostics;
        self
    }

    /// Enables or disables decoding of FFDC carried as the payload.
    #[must_use]
    pub const fn with_nested_payload(mut self, decode_nested_payload: bool) -> Self {
        self.decode_nested_payload = decode_nested_payload;
        self
    }

    /// Returns `true` when the payload should be fed to the chain decoder.
    #[must_use]
    pub const fn decodes_nested_payload(self) -> bool {
        self.want_diagnostics && self.decode_nested_payload
    }
}
