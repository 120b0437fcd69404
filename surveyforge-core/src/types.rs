use crate::error::{Result, SurveyError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ===== INPUT CONTRACT =====
// Produced by the extraction collaborator: the document's text split into
// lines (not yet normalized) and a parallel HTML rendering that carries
// emphasis markup.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    pub lines: Vec<String>,
    pub html: String,
}

impl SourceDocument {
    pub fn new(lines: Vec<String>, html: impl Into<String>) -> Self {
        Self {
            lines,
            html: html.into(),
        }
    }

    /// Build a document from plain text, one line per line. No emphasis markup.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(str::to_string).collect(), String::new())
    }

    /// Parse the `{"lines": [...], "html": "..."}` payload.
    ///
    /// This is the only place an input-contract violation is reported:
    /// missing keys or non-string entries are rejected here, before the
    /// (total) parsing pipeline ever runs.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let object = value
            .as_object()
            .ok_or_else(|| SurveyError::InvalidInput("payload must be a JSON object".to_string()))?;

        let lines = match object.get("lines") {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        SurveyError::InvalidInput(format!("lines[{i}] is not a string"))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(SurveyError::InvalidInput(
                    "`lines` must be an array of strings".to_string(),
                ))
            }
            None => return Err(SurveyError::InvalidInput("missing `lines`".to_string())),
        };

        let html = match object.get("html") {
            Some(serde_json::Value::String(html)) => html.clone(),
            Some(_) => return Err(SurveyError::InvalidInput("`html` must be a string".to_string())),
            None => return Err(SurveyError::InvalidInput("missing `html`".to_string())),
        };

        Ok(Self { lines, html })
    }
}

// ===== PIPELINE INTERMEDIATES =====

/// A cleaned, non-empty line. `index` is the ordinal of the line in the
/// raw input; discarded lines leave gaps that are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

/// Text of one emphasized HTML region, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasisSpan {
    pub order: usize,
    pub text: String,
    /// Position (into the normalized line list) the span was aligned to, if any
    pub anchor: Option<usize>,
}

/// Dot-separated question number, optionally ending in a sibling letter
/// (`3.1`, `1.1.2.a`). The letter never adds a numbering level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionNumber {
    pub segments: Vec<u32>,
    pub suffix: Option<char>,
    /// The number as written in the document, minus a closing `.` or `)`
    pub label: String,
}

impl QuestionNumber {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().trim_end_matches(['.', ')']);
        if raw.is_empty() {
            return None;
        }

        let mut segments = Vec::new();
        let mut suffix = None;
        for part in raw.split('.') {
            if suffix.is_some() {
                return None;
            }
            if let Ok(n) = part.parse::<u32>() {
                segments.push(n);
                continue;
            }
            // "1a" style: digits glued to the letter
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            let rest = &part[digits.len()..];
            let mut rest_chars = rest.chars();
            match (rest_chars.next(), rest_chars.next()) {
                (Some(c), None) if c.is_ascii_lowercase() => {
                    if !digits.is_empty() {
                        segments.push(digits.parse().ok()?);
                    }
                    suffix = Some(c);
                }
                _ => return None,
            }
        }

        if segments.is_empty() {
            return None;
        }
        Some(Self {
            segments,
            suffix,
            label: raw.to_string(),
        })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// All segments but the last one; letter-suffixed numbers share the full
    /// segment list of their parent item.
    pub fn parent_segments(&self) -> &[u32] {
        if self.suffix.is_some() {
            &self.segments
        } else {
            &self.segments[..self.segments.len() - 1]
        }
    }
}

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    Section {
        title: String,
        level: u32,
    },
    Subsection {
        title: String,
        series_position: u32,
        series_total: u32,
    },
    QuestionStart {
        number: Option<QuestionNumber>,
        raw_text: String,
    },
}

/// A structurally significant line. `position` indexes the normalized line list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub position: usize,
    pub kind: BoundaryKind,
}

impl Boundary {
    pub fn is_question(&self) -> bool {
        matches!(self.kind, BoundaryKind::QuestionStart { .. })
    }
}

/// The six scored candidates of the type classifier. Declaration order is
/// the tie-break priority: earlier wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candidate {
    Boolean,
    Radio,
    Checkbox,
    Rating,
    Textarea,
    Text,
}

impl Candidate {
    pub const PRIORITY: [Candidate; 6] = [
        Candidate::Boolean,
        Candidate::Radio,
        Candidate::Checkbox,
        Candidate::Rating,
        Candidate::Textarea,
        Candidate::Text,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }
}

// ===== OUTPUT SCHEMA =====

/// Same string in every locale slot unless a downstream editor translates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub sq: String,
    pub sr: String,
}

impl LocalizedText {
    pub fn replicated(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            en: text.clone(),
            sq: text.clone(),
            sr: text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.sq.is_empty() && self.sr.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Textarea,
    Radio,
    Checkbox,
    Boolean,
    Select,
}

impl QuestionType {
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionType::Radio | QuestionType::Checkbox | QuestionType::Boolean | QuestionType::Select
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Boolean => "boolean",
            QuestionType::Select => "select",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// `option_<n>` in extraction order, never derived from the label
    pub value: String,
    pub label: LocalizedText,
    #[serde(rename = "allowsCustomInput")]
    pub allows_custom_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Numbering is kept verbatim in the text
    pub question_text: LocalizedText,
    pub question_type: QuestionType,
    /// Set by surrounding collaborators; the parser never marks questions required
    #[serde(default)]
    pub required: bool,
    pub options: Option<Vec<AnswerOption>>,
    pub help_text: LocalizedText,
    pub order_index: usize,
}

impl Question {
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub order_index: usize,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeMetadata {
    pub total_questions: usize,
    pub total_sections: usize,
    pub total_options: usize,
}

/// The sole output artifact of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireTree {
    pub sections: Vec<Section>,
    pub metadata: TreeMetadata,
}

impl QuestionnaireTree {
    pub fn from_sections(sections: Vec<Section>) -> Self {
        let total_questions = sections.iter().map(|s| s.questions.len()).sum();
        let total_options = sections
            .iter()
            .flat_map(|s| &s.questions)
            .map(Question::option_count)
            .sum();
        let metadata = TreeMetadata {
            total_questions,
            total_sections: sections.len(),
            total_options,
        };
        Self { sections, metadata }
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }
}

// Flat output format: one row per question, for quick review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatQuestionnaire {
    pub format: String,
    pub rows: Vec<FlatQuestionRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatQuestionRow {
    pub section: String,
    pub id: String,
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<String>,
    pub help_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_number_parses_hierarchy_and_letter_suffix() {
        let number = QuestionNumber::parse("1.1.2.a").unwrap();
        assert_eq!(number.segments, vec![1, 1, 2]);
        assert_eq!(number.suffix, Some('a'));
        assert_eq!(number.depth(), 3);
        assert_eq!(number.to_string(), "1.1.2.a");

        let glued = QuestionNumber::parse("3.1b").unwrap();
        assert_eq!(glued.segments, vec![3, 1]);
        assert_eq!(glued.suffix, Some('b'));
        assert_eq!(glued.to_string(), "3.1b");
        assert_eq!(QuestionNumber::parse("1.2.").unwrap().to_string(), "1.2");
        assert_eq!(QuestionNumber::parse("3.1b)").unwrap().to_string(), "3.1b");
    }

    #[test]
    fn question_number_rejects_garbage() {
        assert!(QuestionNumber::parse("").is_none());
        assert!(QuestionNumber::parse("a.1").is_none());
        assert!(QuestionNumber::parse("1.ab").is_none());
        assert_eq!(QuestionNumber::parse("4.").unwrap().segments, vec![4]);
    }

    #[test]
    fn from_json_rejects_contract_violations() {
        assert!(SourceDocument::from_json(r#"{"html": ""}"#).is_err());
        assert!(SourceDocument::from_json(r#"{"lines": ["a", 3], "html": ""}"#).is_err());
        assert!(SourceDocument::from_json(r#"{"lines": [], "html": 5}"#).is_err());
        assert!(SourceDocument::from_json(r#"["a"]"#).is_err());

        let doc = SourceDocument::from_json(r#"{"lines": ["1.1 Q"], "html": "<p></p>"}"#).unwrap();
        assert_eq!(doc.lines, vec!["1.1 Q".to_string()]);
    }

    #[test]
    fn tree_metadata_counts_options() {
        let question = Question {
            id: "1.1".to_string(),
            question_text: LocalizedText::replicated("1.1 Q"),
            question_type: QuestionType::Radio,
            required: false,
            options: Some(vec![AnswerOption {
                value: "option_1".to_string(),
                label: LocalizedText::replicated("A"),
                allows_custom_input: false,
            }]),
            help_text: LocalizedText::default(),
            order_index: 0,
        };
        let tree = QuestionnaireTree::from_sections(vec![Section {
            title: LocalizedText::replicated("S"),
            description: LocalizedText::default(),
            order_index: 0,
            questions: vec![question],
        }]);
        assert_eq!(tree.metadata.total_sections, 1);
        assert_eq!(tree.metadata.total_questions, 1);
        assert_eq!(tree.metadata.total_options, 1);
    }
}
