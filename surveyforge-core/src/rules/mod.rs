// Structural parsing and classification rules.
//
// - lexicon.rs: locale-spanning cue patterns shared by everything below
// - boundary_detection.rs: pass 1, line -> Boundary tags
// - windows.rs: pass 2, boundaries -> per-question windows
// - engine.rs: ScoringRule trait, ScoreDelta/Scores reducer, ScoringEngine
// - scoring.rs: the individual scoring rules
// - option_extraction.rs: marker matching and option lists
// - help_text.rs: parenthetical / emphasis help text
// - validation.rs: checks on the assembled tree

pub mod boundary_detection;
pub mod engine;
pub mod help_text;
pub mod lexicon;
pub mod option_extraction;
pub mod scoring;
pub mod validation;
pub mod windows;

pub use boundary_detection::BoundaryDetector;
pub use engine::{QuestionContext, ScoreDelta, Scores, ScoringEngine, ScoringRule};
pub use help_text::{HelpTextResolver, HelpTextSource};
pub use option_extraction::{MarkerKind, MarkerMatcher, OptionExtractor};
pub use validation::{TreeValidator, ValidationIssue, ValidationReport};
pub use windows::{build_windows, Window};
