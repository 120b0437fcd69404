use super::lexicon;
use crate::config::OptionExtractionConfig;
use crate::types::{AnswerOption, LocalizedText, QuestionType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Marker patterns, tried in this order
static PAREN_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\(\s*[xX✓✔]?\s*\)|[○◯])\s*(.*)$").unwrap());
static BRACKET_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[\s*[xX✓✔]?\s*\]|[☐□▢☑☒])\s*(.*)$").unwrap());
static LETTER_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?[a-z]\)\s+(.*)$").unwrap());
static DIGIT_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(?\d{1,2}\)\s+(.*)$").unwrap());

/// Whole line in parentheses, optionally followed by a page counter
static PARENTHESIZED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((.+)\)\s*\d{0,4}$").unwrap());

/// Another question's numbering: `3.2 ...` or `1.1.a ...`
static QUESTION_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.)+\d+\.?[a-z]?[.)]?\s+\S").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Paren,
    Bracket,
    LetterParen,
    DigitParen,
    Bullet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch<'a> {
    pub kind: MarkerKind,
    /// Text left after the marker, trimmed
    pub label: &'a str,
}

/// Recognizes option markers at the start of a line.
///
/// Shared by the boundary detector (to tell headings from questions), the
/// classifier (marker-style signals) and the option extractor.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    bullet_glyphs: Vec<String>,
}

impl MarkerMatcher {
    pub fn new(config: &OptionExtractionConfig) -> Self {
        Self {
            bullet_glyphs: config.bullet_glyphs.clone(),
        }
    }

    /// First marker pattern matching `line`, in fixed order: parenthesis,
    /// bracket, letter-paren, digit-paren, bullet glyph.
    pub fn match_line<'a>(&self, line: &'a str) -> Option<MarkerMatch<'a>> {
        let line = line.trim();
        let patterns: [(&Regex, MarkerKind); 4] = [
            (&*PAREN_MARKER_REGEX, MarkerKind::Paren),
            (&*BRACKET_MARKER_REGEX, MarkerKind::Bracket),
            (&*LETTER_MARKER_REGEX, MarkerKind::LetterParen),
            (&*DIGIT_MARKER_REGEX, MarkerKind::DigitParen),
        ];
        for (regex, kind) in patterns {
            if let Some(label) = regex.captures(line).and_then(|c| c.get(1)) {
                return Some(MarkerMatch {
                    kind,
                    label: label.as_str().trim(),
                });
            }
        }
        self.match_bullet(line)
    }

    fn match_bullet<'a>(&self, line: &'a str) -> Option<MarkerMatch<'a>> {
        self.bullet_glyphs.iter().find_map(|glyph| {
            let rest = line.strip_prefix(glyph.as_str())?;
            // the glyph must be followed by whitespace, so "-5%" or "--" stay plain text
            rest.starts_with(char::is_whitespace).then(|| MarkerMatch {
                kind: MarkerKind::Bullet,
                label: rest.trim(),
            })
        })
    }

    pub fn marker_kind(&self, line: &str) -> Option<MarkerKind> {
        self.match_line(line).map(|m| m.kind)
    }

    /// A marker followed by actual label text
    pub fn is_option_like(&self, line: &str) -> bool {
        self.match_line(line).is_some_and(|m| !m.label.is_empty())
    }

    /// The text a line carries once any marker is removed
    pub fn strip_marker<'a>(&self, line: &'a str) -> &'a str {
        match self.match_line(line) {
            Some(m) => m.label,
            None => line.trim(),
        }
    }

    /// Inner text of an instruction line wrapped entirely in parentheses.
    /// Option lines and bare yes/no answers in parentheses do not count.
    pub fn parenthesized_inner<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line.trim();
        if self.is_option_like(line) {
            return None;
        }
        let inner = PARENTHESIZED_REGEX.captures(line)?.get(1)?.as_str().trim();
        (!inner.is_empty() && !lexicon::is_yes_no_token(inner)).then_some(inner)
    }
}

/// True when `line` opens another (hierarchically numbered) question
pub fn starts_numbered_question(line: &str) -> bool {
    QUESTION_NUMBER_REGEX.is_match(line.trim())
}

/// Walks a question window and turns its option lines into [`AnswerOption`]s
#[derive(Debug, Clone)]
pub struct OptionExtractor {
    config: OptionExtractionConfig,
    markers: MarkerMatcher,
}

impl OptionExtractor {
    pub fn new(config: &OptionExtractionConfig) -> Self {
        Self {
            config: config.clone(),
            markers: MarkerMatcher::new(config),
        }
    }

    /// Extract the options of a question of type `question_type` from its
    /// window lines. Stops at the first line that cannot be an option.
    pub fn extract<S: AsRef<str>>(&self, window: &[S], question_type: QuestionType) -> Vec<AnswerOption> {
        let mut labels: Vec<&str> = Vec::new();

        let body = window
            .iter()
            .map(AsRef::<str>::as_ref)
            .skip_while(|line| self.markers.parenthesized_inner(line).is_some());

        for line in body {
            let line = line.trim();
            if line.is_empty() || starts_numbered_question(line) || lexicon::is_separator(line) {
                break;
            }
            // routing notes between options belong to the help text
            if self.markers.parenthesized_inner(line).is_some() {
                continue;
            }

            match self.markers.match_line(line) {
                Some(marker) if marker.label.is_empty() => continue,
                Some(marker) => labels.push(marker.label),
                None => {
                    if !labels.is_empty() && lexicon::has_free_response_instruction(line) {
                        break;
                    }
                    if !self.accepts_bare_line(line, !labels.is_empty(), question_type) {
                        break;
                    }
                    labels.push(line);
                }
            }
        }

        let options = build_options(&labels);
        tracing::trace!(count = options.len(), %question_type, "extracted options");
        options
    }

    fn accepts_bare_line(&self, line: &str, has_options: bool, question_type: QuestionType) -> bool {
        if !(has_options || question_type.is_choice()) {
            return false;
        }
        let short = line.chars().count() < self.config.bare_option_max_chars
            && lexicon::word_count(line) <= self.config.bare_option_max_words;
        short || lexicon::is_yes_no_token(line)
    }
}

fn build_options(labels: &[&str]) -> Vec<AnswerOption> {
    let mut options: Vec<AnswerOption> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| AnswerOption {
            value: format!("option_{}", i + 1),
            label: LocalizedText::replicated(*label),
            allows_custom_input: lexicon::has_other_token(label) && lexicon::has_specify_cue(label),
        })
        .collect();

    // the last slot is the conventional place for a free-text "other"
    if !options.iter().any(|o| o.allows_custom_input) {
        if let Some(last) = options.last_mut() {
            if lexicon::has_other_token(&last.label.en) {
                last.allows_custom_input = true;
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> OptionExtractor {
        OptionExtractor::new(&OptionExtractionConfig::default())
    }

    fn labels(options: &[AnswerOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.en.as_str()).collect()
    }

    #[test]
    fn marker_order_is_fixed() {
        let markers = extractor().markers;
        assert_eq!(markers.marker_kind("( ) Po"), Some(MarkerKind::Paren));
        assert_eq!(markers.marker_kind("(x) Po"), Some(MarkerKind::Paren));
        assert_eq!(markers.marker_kind("[ ] Email"), Some(MarkerKind::Bracket));
        assert_eq!(markers.marker_kind("☐ Email"), Some(MarkerKind::Bracket));
        assert_eq!(markers.marker_kind("a) Primary"), Some(MarkerKind::LetterParen));
        assert_eq!(markers.marker_kind("(b) Secondary"), Some(MarkerKind::LetterParen));
        assert_eq!(markers.marker_kind("3) Three"), Some(MarkerKind::DigitParen));
        assert_eq!(markers.marker_kind("• Bullet"), Some(MarkerKind::Bullet));
        assert_eq!(markers.marker_kind("- Dash"), Some(MarkerKind::Bullet));
        assert_eq!(markers.marker_kind("-5% growth"), None);
        assert_eq!(markers.marker_kind("Plain text"), None);
        assert_eq!(markers.match_line("( )  Shumë  ").unwrap().label, "Shumë");
    }

    #[test]
    fn parenthesized_instructions_are_not_options() {
        let markers = extractor().markers;
        assert_eq!(
            markers.parenthesized_inner("(Please choose only one of the following:) 12"),
            Some("Please choose only one of the following:")
        );
        assert_eq!(markers.parenthesized_inner("(Po)"), None);
        assert_eq!(markers.parenthesized_inner("( ) Other (specify)"), None);
    }

    #[test]
    fn boolean_window_yields_two_localized_options() {
        let options = extractor().extract(&["( ) Po", "( ) Jo"], QuestionType::Boolean);
        assert_eq!(labels(&options), vec!["Po", "Jo"]);
        for option in &options {
            assert_eq!(option.label.en, option.label.sq);
            assert_eq!(option.label.sq, option.label.sr);
        }
        assert_eq!(options[0].value, "option_1");
        assert_eq!(options[1].value, "option_2");
    }

    #[test]
    fn extraction_stops_at_next_question() {
        let options = extractor().extract(
            &["( ) Option 1", "( ) Option 2", "3.2 Next question text"],
            QuestionType::Radio,
        );
        assert_eq!(labels(&options), vec!["Option 1", "Option 2"]);
    }

    #[test]
    fn extraction_stops_at_separator_and_free_response_prompt() {
        let extractor = extractor();
        let options = extractor.extract(&["( ) A", "----------", "( ) B"], QuestionType::Radio);
        assert_eq!(options.len(), 1);

        let options = extractor.extract(
            &["( ) A", "( ) B", "Please write your answer here", "( ) C"],
            QuestionType::Radio,
        );
        assert_eq!(labels(&options), vec!["A", "B"]);
    }

    #[test]
    fn leading_instructions_are_skipped() {
        let options = extractor().extract(
            &["(Zgjidhni vetëm një përgjigje)", "( ) Shumë", "( ) Pak"],
            QuestionType::Radio,
        );
        assert_eq!(labels(&options), vec!["Shumë", "Pak"]);
    }

    #[test]
    fn bare_lines_need_a_choice_type_or_a_previous_option() {
        let extractor = extractor();
        let bare = ["Albanian", "Serbian"];
        assert_eq!(extractor.extract(&bare, QuestionType::Radio).len(), 2);
        assert!(extractor.extract(&bare, QuestionType::Text).is_empty());

        let mixed = ["( ) Albanian", "Serbian"];
        assert_eq!(extractor.extract(&mixed, QuestionType::Text).len(), 2);

        let long = "word ".repeat(20);
        let options = extractor.extract(&["( ) Short", long.as_str(), "( ) Never"], QuestionType::Radio);
        assert_eq!(labels(&options), vec!["Short"]);
    }

    #[test]
    fn last_other_option_is_flagged_retroactively() {
        let options = extractor().extract(&["( ) Po", "( ) Jo", "( ) Tjetër"], QuestionType::Radio);
        assert_eq!(options.len(), 3);
        assert!(!options[0].allows_custom_input);
        assert!(!options[1].allows_custom_input);
        assert!(options[2].allows_custom_input);
    }

    #[test]
    fn explicit_specify_cue_flags_in_place() {
        let options = extractor().extract(
            &["[ ] Other (please specify)", "[ ] Email", "[ ] Phone"],
            QuestionType::Checkbox,
        );
        let flags: Vec<bool> = options.iter().map(|o| o.allows_custom_input).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn empty_marker_lines_are_skipped() {
        let options = extractor().extract(&["( ) A", "( )", "( ) B"], QuestionType::Radio);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["option_1", "option_2"]);
    }
}
