//! Document preprocessors
//!
//! The boundary between the raw extraction payload and structural parsing.
//! Everything after this layer works with normalized [`RawLine`]s and the
//! [`EmphasisIndex`] and never looks at the raw strings again.
//!
//! ```text
//! SourceDocument { lines, html }
//!     ↓
//! [normalizer]  →  Vec<RawLine>
//! [emphasis]    →  EmphasisIndex (aligned to the normalized lines)
//!     ↓
//! PreprocessorOutput
//! ```

pub mod emphasis;
pub mod normalizer;

pub use emphasis::EmphasisIndex;
pub use normalizer::{normalize_line, normalize_lines};

use crate::types::{RawLine, SourceDocument};

/// Normalized view of a source document
#[derive(Debug, Clone, Default)]
pub struct PreprocessorOutput {
    pub lines: Vec<RawLine>,
    pub emphasis: EmphasisIndex,
}

/// Converts a source document into the normalized form the rules run on.
///
/// Preprocessing is total: malformed HTML yields an empty emphasis index and
/// blank input yields no lines, never an error.
pub trait Preprocessor {
    fn process(&self, document: &SourceDocument) -> PreprocessorOutput;

    /// Name for logging
    fn name(&self) -> &str;
}

/// Line normalization followed by emphasis alignment
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPreprocessor;

impl Preprocessor for TextPreprocessor {
    fn process(&self, document: &SourceDocument) -> PreprocessorOutput {
        let lines = normalize_lines(&document.lines);
        let emphasis = EmphasisIndex::build(&document.html, &lines);
        tracing::debug!(
            preprocessor = self.name(),
            raw_lines = document.lines.len(),
            kept_lines = lines.len(),
            "preprocessed document"
        );
        PreprocessorOutput { lines, emphasis }
    }

    fn name(&self) -> &str {
        "text"
    }
}
