// Boundary detection: pass 1 of structural parsing.
//
// Each normalized line gets at most one boundary tag. Patterns are tried in
// precedence order and the first match wins:
//   1. section comment prefix            -> Section
//   2. "N. Capitalized" heading          -> Section (or QuestionStart, see HeadingPolicy)
//   3. "(n/N)" series counter            -> Subsection
//   4. "1.2.a text" / "3.1b text"        -> QuestionStart
//   5. "1.2 text"                        -> QuestionStart
//   6. "4. text"                         -> QuestionStart

use super::lexicon;
use super::option_extraction::MarkerMatcher;
use crate::config::{BoundaryConfig, HeadingPolicy, ParsingConfig};
use crate::types::{Boundary, BoundaryKind, QuestionNumber, RawLine};
use regex::Regex;
use std::sync::LazyLock;

static SECTION_HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+\p{Lu}").unwrap());
static SERIES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\s*/\s*(\d+)\)").unwrap());
static LETTER_QUESTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+\.)+\d+\.?[a-z])[.)]?\s+\S").unwrap());
static HIERARCHICAL_QUESTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:\d+\.)+\d+)\.?\s+\S").unwrap());
static SIMPLE_QUESTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.\s+\S").unwrap());
static TRAILING_COUNTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(\d{2,4})$").unwrap());

/// Trailing numbers in this range read as years and stay in titles
const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1900..=2099;

pub struct BoundaryDetector {
    config: BoundaryConfig,
    markers: MarkerMatcher,
}

impl BoundaryDetector {
    pub fn new(config: &ParsingConfig) -> Self {
        Self {
            config: config.boundaries.clone(),
            markers: MarkerMatcher::new(&config.options),
        }
    }

    /// Tag every structurally significant line. Positions index `lines`.
    pub fn detect(&self, lines: &[RawLine]) -> Vec<Boundary> {
        let mut boundaries: Vec<Boundary> = lines
            .iter()
            .enumerate()
            .filter_map(|(position, _)| {
                self.classify(lines, position)
                    .map(|kind| Boundary { position, kind })
            })
            .collect();

        if self.config.unnumbered_fallback && !boundaries.iter().any(Boundary::is_question) {
            boundaries = self.unnumbered_fallback(lines, boundaries);
        }

        tracing::debug!(
            boundaries = boundaries.len(),
            questions = boundaries.iter().filter(|b| b.is_question()).count(),
            "detected boundaries"
        );
        boundaries
    }

    fn classify(&self, lines: &[RawLine], position: usize) -> Option<BoundaryKind> {
        let text = lines[position].text.as_str();

        if let Some((title, level)) = self.comment_section(text) {
            return Some(BoundaryKind::Section { title, level });
        }

        if SECTION_HEADING_REGEX.is_match(text) {
            return Some(if self.heading_is_question(lines, position) {
                question_start(text, SECTION_HEADING_REGEX.captures(text).and_then(|c| c.get(1)))
            } else {
                BoundaryKind::Section {
                    title: clean_title(text),
                    level: 1,
                }
            });
        }

        if let Some(caps) = SERIES_REGEX.captures(text) {
            let counter = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            if let (Some(series_position), Some(series_total)) = (counter(1), counter(2)) {
                return Some(BoundaryKind::Subsection {
                    title: clean_title(text),
                    series_position,
                    series_total,
                });
            }
        }

        [
            &*LETTER_QUESTION_REGEX,
            &*HIERARCHICAL_QUESTION_REGEX,
            &*SIMPLE_QUESTION_REGEX,
        ]
        .into_iter()
        .find_map(|regex| regex.captures(text))
        .map(|caps| question_start(text, caps.get(1)))
    }

    /// `# Title`, `// Title`, `-- Title`, `§ Title`; the rest must hold a letter
    fn comment_section(&self, text: &str) -> Option<(String, u32)> {
        let prefix = self
            .config
            .comment_prefixes
            .iter()
            .find(|prefix| text.starts_with(prefix.as_str()))?;

        let (rest, level) = if prefix.chars().all(|c| c == '#') {
            let hashes = text.chars().take_while(|&c| c == '#').count();
            (&text[hashes..], hashes as u32)
        } else {
            (&text[prefix.len()..], 1)
        };

        let title = rest.trim();
        title
            .chars()
            .any(char::is_alphabetic)
            .then(|| (clean_title(title), level))
    }

    /// Resolves the numbered-heading ambiguity. Under the contextual policy a
    /// single-level `N. Capitalized` line is a question when it reads like one
    /// (ends in `?` or `:`) or when answers follow it directly.
    fn heading_is_question(&self, lines: &[RawLine], position: usize) -> bool {
        match self.config.numbered_heading_policy {
            HeadingPolicy::AlwaysSection => false,
            HeadingPolicy::Contextual => {
                let text = lines[position].text.trim_end();
                if text.ends_with('?') || text.ends_with(':') {
                    return true;
                }
                lines.get(position + 1).is_some_and(|next| {
                    self.markers.is_option_like(&next.text)
                        || lexicon::is_yes_no_token(self.markers.strip_marker(&next.text))
                })
            }
        }
    }

    /// Documents without any numbering: every plain line is a best-effort
    /// question. Option lines, yes/no answers, parenthesized instructions and
    /// already tagged lines are left alone.
    fn unnumbered_fallback(&self, lines: &[RawLine], detected: Vec<Boundary>) -> Vec<Boundary> {
        let mut detected = detected.into_iter().peekable();
        let mut boundaries = Vec::new();

        for (position, line) in lines.iter().enumerate() {
            if let Some(boundary) = detected.next_if(|b| b.position == position) {
                boundaries.push(boundary);
                continue;
            }
            let text = line.text.as_str();
            let answer_like = self.markers.match_line(text).is_some()
                || lexicon::is_yes_no_token(text)
                || self.markers.parenthesized_inner(text).is_some()
                || lexicon::is_separator(text);
            if !answer_like {
                boundaries.push(Boundary {
                    position,
                    kind: BoundaryKind::QuestionStart {
                        number: None,
                        raw_text: text.to_string(),
                    },
                });
            }
        }

        tracing::info!(
            questions = boundaries.iter().filter(|b| b.is_question()).count(),
            "no numbered questions found, using unnumbered fallback"
        );
        boundaries
    }
}

fn question_start(text: &str, number: Option<regex::Match<'_>>) -> BoundaryKind {
    BoundaryKind::QuestionStart {
        number: number.and_then(|m| QuestionNumber::parse(m.as_str())),
        raw_text: text.to_string(),
    }
}

/// Strip a trailing pagination counter from a heading. The leading number,
/// any `(n/N)` series suffix and a trailing year are part of the title and stay.
pub fn clean_title(text: &str) -> String {
    let text = text.trim();
    let is_year = |caps: &regex::Captures<'_>| {
        caps.get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .is_some_and(|n| YEAR_RANGE.contains(&n))
    };
    match TRAILING_COUNTER_REGEX.captures(text) {
        Some(caps) if !is_year(&caps) => TRAILING_COUNTER_REGEX.replace(text, "").into_owned(),
        _ => text.to_string(),
    }
}
