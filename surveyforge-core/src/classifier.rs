use crate::config::ParsingConfig;
use crate::rules::engine::{QuestionContext, Scores, ScoringEngine};
use crate::rules::lexicon;
use crate::rules::option_extraction::MarkerMatcher;
use crate::types::{Candidate, QuestionType};
use serde::Serialize;

const HARD_OVERRIDE_CONFIDENCE: f32 = 0.95;

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub candidate: Candidate,
    /// Winner's share of the total score; fixed for hard overrides
    pub confidence: f32,
    pub scores: Scores,
    pub hard_override: bool,
}

impl Classification {
    /// Render type for a question with `option_count` extracted options.
    /// Ratings render as radio groups, long radio lists as selects.
    pub fn question_type(&self, option_count: usize, select_min_options: Option<usize>) -> QuestionType {
        match self.candidate {
            Candidate::Boolean => QuestionType::Boolean,
            Candidate::Checkbox => QuestionType::Checkbox,
            Candidate::Textarea => QuestionType::Textarea,
            Candidate::Text => QuestionType::Text,
            Candidate::Radio | Candidate::Rating => match select_min_options {
                Some(min) if option_count >= min => QuestionType::Select,
                _ => QuestionType::Radio,
            },
        }
    }

    /// Type used while extracting options, before the option count is known
    pub fn extraction_type(&self) -> QuestionType {
        self.question_type(0, None)
    }
}

pub struct QuestionClassifier {
    engine: ScoringEngine,
    markers: MarkerMatcher,
    config: ParsingConfig,
}

impl QuestionClassifier {
    pub fn new(config: &ParsingConfig) -> Self {
        Self {
            engine: ScoringEngine::from_config(&config.classifier),
            markers: MarkerMatcher::new(&config.options),
            config: config.clone(),
        }
    }

    pub fn classify(&self, question_text: &str, window: &[&str]) -> Classification {
        if self.has_hard_override(question_text, window) {
            tracing::trace!(question = question_text, "free-response instruction, forcing textarea");
            return Classification {
                candidate: Candidate::Textarea,
                confidence: HARD_OVERRIDE_CONFIDENCE,
                scores: Scores::default(),
                hard_override: true,
            };
        }

        let context = QuestionContext::new(question_text, window, &self.markers, &self.config.classifier);
        let scores = self.engine.run(&context);
        let candidate = scores.winner();
        let total = scores.total();
        let confidence = if total > 0.0 {
            scores.get(candidate) / total
        } else {
            0.0
        };

        tracing::trace!(question = question_text, ?candidate, confidence, "classified question");
        Classification {
            candidate,
            confidence,
            scores,
            hard_override: false,
        }
    }

    fn has_hard_override(&self, question_text: &str, window: &[&str]) -> bool {
        lexicon::has_free_response_instruction(question_text)
            || window
                .iter()
                .take(self.config.classifier.hard_override_lines)
                .any(|line| lexicon::has_free_response_instruction(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(question: &str, window: &[&str]) -> Classification {
        QuestionClassifier::new(&ParsingConfig::default()).classify(question, window)
    }

    #[test]
    fn yes_no_window_is_boolean() {
        let result = classify("1.1 A jeni student?", &["( ) Po", "( ) Jo"]);
        assert_eq!(result.candidate, Candidate::Boolean);
        assert!(!result.hard_override);
    }

    #[test]
    fn option_list_beats_describe_vocabulary() {
        let window = [
            "( ) Very satisfied",
            "( ) Satisfied",
            "( ) Neutral",
            "( ) Unsatisfied",
            "( ) Very unsatisfied",
        ];
        let result = classify("Please describe your satisfaction level", &window);
        assert_eq!(result.candidate, Candidate::Radio);
        assert_eq!(result.question_type(window.len(), Some(12)), QuestionType::Radio);
    }

    #[test]
    fn free_response_instruction_overrides_markers() {
        let result = classify(
            "2.3 Ju lutem shkruani përgjigjen tuaj këtu",
            &["( ) Po", "( ) Jo"],
        );
        assert_eq!(result.candidate, Candidate::Textarea);
        assert!(result.hard_override);
        assert_eq!(result.confidence, HARD_OVERRIDE_CONFIDENCE);

        let in_window = classify("2.4 Komente", &["Please write your answer here", "( ) x"]);
        assert!(in_window.hard_override);

        let too_far = classify(
            "2.5 Pyetje",
            &["( ) a", "( ) b", "( ) c", "Please write your answer here"],
        );
        assert!(!too_far.hard_override);
    }

    #[test]
    fn brackets_make_checkboxes() {
        let result = classify("1.4 Cilat gjuhë flisni?", &["[ ] Shqip", "[ ] Serbisht", "[ ] Anglisht"]);
        assert_eq!(result.candidate, Candidate::Checkbox);
    }

    #[test]
    fn open_questions_are_text_or_textarea() {
        assert_eq!(classify("1.5 Si quheni?", &[]).candidate, Candidate::Text);
        assert_eq!(
            classify("1.6 Pse e zgjodhët këtë profesion?", &[]).candidate,
            Candidate::Textarea
        );
    }

    #[test]
    fn ratings_render_as_radio_and_long_lists_as_select() {
        let result = classify("1.7 Sa të kënaqur jeni me shërbimin?", &["1 2 3 4 5"]);
        assert_eq!(result.candidate, Candidate::Rating);
        assert_eq!(result.question_type(5, Some(12)), QuestionType::Radio);

        let radio = classify("1.8 Komuna", &["( ) a", "( ) b", "( ) c"]);
        assert_eq!(radio.question_type(12, Some(12)), QuestionType::Select);
        assert_eq!(radio.question_type(12, None), QuestionType::Radio);
    }
}
