//! The scoring rules, one struct per heuristic.
//!
//! Every rule is a pure function of the [`QuestionContext`]. The engine applies
//! them in the order they are listed here.

use super::engine::{QuestionContext, ScoreDelta, ScoringRule};
use super::lexicon;
use super::option_extraction::MarkerKind;
use crate::types::Candidate;

/// Exactly two yes/no answers: a boolean, which is also a two-option radio
pub struct YesNoRule;

impl ScoringRule for YesNoRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        if ctx.yes_no_lines != 2 {
            return ScoreDelta::new();
        }
        ScoreDelta::new()
            .boost(Candidate::Boolean, ctx.weights.yes_no_boolean)
            .boost(Candidate::Radio, ctx.weights.yes_no_radio)
    }

    fn name(&self) -> &'static str {
        "YesNo"
    }
}

/// "Select all that apply" or bracket markers
pub struct CheckboxRule;

impl ScoringRule for CheckboxRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        let brackets = ctx.has_marker(MarkerKind::Bracket);
        let cue = lexicon::has_select_all_cue(ctx.question_text)
            || ctx.lines.iter().any(|line| lexicon::has_select_all_cue(line));

        let mut delta = ScoreDelta::new();
        if cue || brackets {
            delta = delta.boost(Candidate::Checkbox, ctx.weights.checkbox_cue);
        }
        if brackets {
            delta = delta.penalize(Candidate::Radio, ctx.weights.bracket_radio_penalty);
        }
        delta
    }

    fn name(&self) -> &'static str {
        "Checkbox"
    }
}

/// "Select only one" or parenthesis markers
pub struct RadioRule;

impl ScoringRule for RadioRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        let parens = ctx.has_marker(MarkerKind::Paren);
        let cue = lexicon::has_select_one_cue(ctx.question_text)
            || ctx.lines.iter().any(|line| lexicon::has_select_one_cue(line));

        let mut delta = ScoreDelta::new();
        if cue || parens {
            delta = delta.boost(Candidate::Radio, ctx.weights.radio_cue);
        }
        if parens {
            delta = delta.penalize(Candidate::Checkbox, ctx.weights.paren_checkbox_penalty);
        }
        delta
    }

    fn name(&self) -> &'static str {
        "Radio"
    }
}

/// Satisfaction and agreement vocabulary in the question text
pub struct RatingRule;

impl ScoringRule for RatingRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        if !lexicon::has_rating_vocabulary(ctx.question_text) {
            return ScoreDelta::new();
        }
        ScoreDelta::new()
            .boost(Candidate::Rating, ctx.weights.rating_vocabulary)
            .boost(Candidate::Radio, ctx.weights.rating_radio)
    }

    fn name(&self) -> &'static str {
        "Rating"
    }
}

/// Soft free-text signals: describe/explain vocabulary, blank fills, long questions
pub struct FreeTextRule;

impl ScoringRule for FreeTextRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        let mut delta = ScoreDelta::new();
        if lexicon::has_free_text_vocabulary(ctx.question_text) {
            delta = delta.boost(Candidate::Textarea, ctx.weights.free_text_vocabulary);
        }
        let blank_fill = lexicon::has_blank_fill(ctx.question_text)
            || ctx.lines.iter().any(|line| lexicon::has_blank_fill(line));
        if blank_fill && ctx.option_like_lines == 0 {
            delta = delta.boost(Candidate::Textarea, ctx.weights.blank_fill);
        }
        if lexicon::word_count(ctx.question_text) > ctx.long_question_words {
            delta = delta.boost(Candidate::Textarea, ctx.weights.long_question);
        }
        delta
    }

    fn name(&self) -> &'static str {
        "FreeText"
    }
}

/// A real option list beats any free-text vocabulary
pub struct OptionContextRule;

impl ScoringRule for OptionContextRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        match ctx.option_like_lines {
            0 => ScoreDelta::new(),
            1..=2 => ScoreDelta::new()
                .penalize(Candidate::Textarea, ctx.weights.option_context_penalty)
                .penalize(Candidate::Text, ctx.weights.option_context_penalty),
            _ => ScoreDelta::new()
                .zero(Candidate::Textarea)
                .zero(Candidate::Text)
                .boost(Candidate::Radio, ctx.weights.option_list_boost)
                .boost(Candidate::Checkbox, ctx.weights.option_list_boost),
        }
    }

    fn name(&self) -> &'static str {
        "OptionContext"
    }
}

/// Nothing to choose from and no scale: probably an open question
pub struct OpenQuestionRule;

impl ScoringRule for OpenQuestionRule {
    fn score(&self, ctx: &QuestionContext<'_>) -> ScoreDelta {
        if ctx.option_like_lines > 0 || ctx.has_scale_line {
            return ScoreDelta::new();
        }
        let penalty = ctx.weights.open_question_penalty;
        ScoreDelta::new()
            .penalize(Candidate::Radio, penalty)
            .penalize(Candidate::Checkbox, penalty)
            .penalize(Candidate::Rating, penalty)
            .boost(Candidate::Text, ctx.weights.open_question_text)
    }

    fn name(&self) -> &'static str {
        "OpenQuestion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, OptionExtractionConfig};
    use crate::rules::option_extraction::MarkerMatcher;

    fn with_context<R>(question: &str, lines: &[&str], f: impl FnOnce(&QuestionContext<'_>) -> R) -> R {
        let config = ClassifierConfig::default();
        let markers = MarkerMatcher::new(&OptionExtractionConfig::default());
        let context = QuestionContext::new(question, lines, &markers, &config);
        f(&context)
    }

    #[test]
    fn yes_no_needs_exactly_two_answers() {
        let delta = with_context("1.1 A?", &["( ) Po", "( ) Jo"], |ctx| YesNoRule.score(ctx));
        assert_eq!(delta.get(Candidate::Boolean), 6.0);
        assert_eq!(delta.get(Candidate::Radio), 2.0);

        let delta = with_context("1.1 A?", &["( ) Po"], |ctx| YesNoRule.score(ctx));
        assert!(delta.is_empty());
    }

    #[test]
    fn marker_style_suppresses_the_other_choice_type() {
        let delta = with_context("1.1 A?", &["[ ] x", "[ ] y"], |ctx| CheckboxRule.score(ctx));
        assert_eq!(delta.get(Candidate::Checkbox), 3.0);
        assert_eq!(delta.get(Candidate::Radio), -2.0);

        let delta = with_context("1.1 Select all that apply", &["x", "y"], |ctx| {
            CheckboxRule.score(ctx)
        });
        assert_eq!(delta.get(Candidate::Checkbox), 3.0);
        assert_eq!(delta.get(Candidate::Radio), 0.0);

        let delta = with_context("1.1 A?", &["( ) x"], |ctx| RadioRule.score(ctx));
        assert_eq!(delta.get(Candidate::Radio), 3.0);
        assert_eq!(delta.get(Candidate::Checkbox), -2.0);
    }

    #[test]
    fn free_text_signals_accumulate() {
        let long = format!("1.1 Please describe {}", "word ".repeat(25));
        let delta = with_context(&long, &["__________"], |ctx| FreeTextRule.score(ctx));
        assert_eq!(delta.get(Candidate::Textarea), 2.0 + 3.0 + 1.0);
    }

    #[test]
    fn long_option_lists_zero_free_text() {
        let lines = ["( ) a", "( ) b", "( ) c"];
        let delta = with_context("1.1 A?", &lines, |ctx| OptionContextRule.score(ctx));
        assert!(delta.zeroes(Candidate::Textarea));
        assert!(delta.zeroes(Candidate::Text));
        assert_eq!(delta.get(Candidate::Radio), 2.0);

        let delta = with_context("1.1 A?", &lines[..1], |ctx| OptionContextRule.score(ctx));
        assert_eq!(delta.get(Candidate::Textarea), -4.0);
        assert!(!delta.zeroes(Candidate::Textarea));
    }

    #[test]
    fn open_questions_lean_to_text_unless_a_scale_follows() {
        let delta = with_context("1.1 Emri?", &[], |ctx| OpenQuestionRule.score(ctx));
        assert_eq!(delta.get(Candidate::Text), 1.0);
        assert_eq!(delta.get(Candidate::Radio), -3.0);

        let delta = with_context("1.1 Vlerësoni", &["1 2 3 4 5"], |ctx| OpenQuestionRule.score(ctx));
        assert!(delta.is_empty());
    }
}
