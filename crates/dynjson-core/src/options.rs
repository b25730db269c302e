//! Parse limits and tuning knobs.

/// Default maximum container nesting accepted by the materializer.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Highest nesting limit honoured. Larger limits are clamped so deep input
/// cannot exhaust the stack of the recursive materializer.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Default number of spare token slots allocated on top of the counted total.
pub const DEFAULT_TOKEN_MARGIN: usize = 16;

/// Settings for [`parse_with`](crate::parse_with).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest container nesting materialized before failing with
    /// `NestingTooDeep`. Capped at [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
    /// Longest input, in bytes, handed to the tokenizer.
    pub max_input_len: usize,
    /// Extra token slots allocated for the populate pass.
    pub token_margin: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: u32::MAX as usize,
            token_margin: DEFAULT_TOKEN_MARGIN,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    pub fn with_token_margin(mut self, token_margin: usize) -> Self {
        self.token_margin = token_margin;
        self
    }
}
