// Surveyforge Core Library
//
// Turns extracted survey documents (text lines plus an HTML rendering) into a
// typed questionnaire tree. Main interface is `SurveyProcessor`.

pub mod classifier;
pub mod config;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod rules;
pub mod tree;
pub mod types;

// Re-export main types and functions for easy use
pub use classifier::{Classification, QuestionClassifier};
pub use config::ParsingConfig;
pub use error::{Result, SurveyError};
pub use preprocessors::{Preprocessor, TextPreprocessor};
pub use processor::{PipelineStages, QuestionTrace, StepProfiler, SurveyProcessor};
pub use rules::validation::{ValidationIssue, ValidationReport};
pub use types::*;
