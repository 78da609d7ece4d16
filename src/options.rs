//! Configuration options for document decoding.
//!
//! This module provides [`DecodeOptions`], the knobs for the decode path:
//!
//! - **strict vs tolerant**: strict propagates the first row error with
//!   its line number; tolerant (the default) skips offending rows and
//!   keeps going, which is the historical behavior of the JSON export.
//! - **trim**: run the pre-pass that drops leading garbage before the
//!   `EntityName:` line and truncates at the first incomplete data row.
//! - **max_rows / truncate_arrays**: the sampling mode, decoding only the
//!   first N rows and clamping every nested array to N elements.
//!
//! ## Examples
//!
//! ```rust
//! use linestruct::DecodeOptions;
//!
//! // Tolerant, whole document.
//! let options = DecodeOptions::new();
//!
//! // Strict validation-grade decode.
//! let options = DecodeOptions::strict();
//!
//! // First 3 rows, nested arrays clamped to 3 elements.
//! let options = DecodeOptions::sample();
//!
//! // Custom configuration.
//! let options = DecodeOptions::new().with_trim(true).with_max_rows(10);
//! ```

/// Default row and nested-array budget for [`DecodeOptions::sample`].
pub const SAMPLE_SIZE: usize = 3;

/// Configuration for the decode path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail the whole decode on the first bad row instead of skipping it.
    pub strict: bool,
    /// Drop leading garbage lines and incomplete trailing rows first.
    pub trim: bool,
    /// Decode at most this many data rows.
    pub max_rows: Option<usize>,
    /// Clamp every nested array in the decoded rows to `max_rows` elements.
    pub truncate_arrays: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict: false,
            trim: false,
            max_rows: None,
            truncate_arrays: false,
        }
    }
}

impl DecodeOptions {
    /// Creates the default options: tolerant, untrimmed, unlimited.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict options: any row error fails the decode.
    #[must_use]
    pub fn strict() -> Self {
        DecodeOptions {
            strict: true,
            ..Default::default()
        }
    }

    /// Creates sampling options: the first [`SAMPLE_SIZE`] rows, with every
    /// nested array truncated to the same budget.
    #[must_use]
    pub fn sample() -> Self {
        DecodeOptions {
            max_rows: Some(SAMPLE_SIZE),
            truncate_arrays: true,
            ..Default::default()
        }
    }

    /// Sets strict mode.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enables or disables the trim pre-pass.
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Caps the number of decoded rows.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}
