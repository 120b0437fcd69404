// Scoring engine shared by the classification rules.
//
// Each rule looks at one question and returns a ScoreDelta; the engine folds
// the deltas of every enabled rule, in canonical order, into a fresh Scores
// record. No state survives from one question to the next.

use super::lexicon;
use super::option_extraction::{MarkerKind, MarkerMatcher};
use super::scoring::{
    CheckboxRule, FreeTextRule, OpenQuestionRule, OptionContextRule, RadioRule, RatingRule,
    YesNoRule,
};
use crate::config::{ClassifierConfig, ScoringWeights};
use crate::types::Candidate;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

const CANDIDATES: usize = Candidate::PRIORITY.len();

/// Everything a scoring rule may look at, computed once per question
#[derive(Debug, Clone)]
pub struct QuestionContext<'a> {
    pub question_text: &'a str,
    pub lines: Vec<&'a str>,
    /// Marker kind of each window line, if any
    pub markers: Vec<Option<MarkerKind>>,
    /// Window lines whose text (marker removed) is a yes/no token
    pub yes_no_lines: usize,
    /// Window lines with a marker and a label
    pub option_like_lines: usize,
    pub has_scale_line: bool,
    pub weights: &'a ScoringWeights,
    pub long_question_words: usize,
}

impl<'a> QuestionContext<'a> {
    pub fn new(
        question_text: &'a str,
        lines: &[&'a str],
        markers: &MarkerMatcher,
        config: &'a ClassifierConfig,
    ) -> Self {
        let matches: Vec<_> = lines.iter().map(|line| markers.match_line(line)).collect();
        let yes_no_lines = lines
            .iter()
            .filter(|line| lexicon::is_yes_no_token(markers.strip_marker(line)))
            .count();
        let option_like_lines = matches
            .iter()
            .filter(|m| m.is_some_and(|m| !m.label.is_empty()))
            .count();

        Self {
            question_text,
            lines: lines.to_vec(),
            markers: matches.iter().map(|m| m.map(|m| m.kind)).collect(),
            yes_no_lines,
            option_like_lines,
            has_scale_line: lines.iter().any(|line| lexicon::is_scale_line(line)),
            weights: &config.weights,
            long_question_words: config.long_question_words,
        }
    }

    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.contains(&Some(kind))
    }
}

/// Additive adjustments from one rule, plus candidates it forces to zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreDelta {
    adds: [f32; CANDIDATES],
    zeroed: [bool; CANDIDATES],
}

impl ScoreDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boost(mut self, candidate: Candidate, amount: f32) -> Self {
        self.adds[candidate.slot()] += amount;
        self
    }

    pub fn penalize(mut self, candidate: Candidate, amount: f32) -> Self {
        self.adds[candidate.slot()] -= amount;
        self
    }

    pub fn zero(mut self, candidate: Candidate) -> Self {
        self.zeroed[candidate.slot()] = true;
        self
    }

    pub fn get(&self, candidate: Candidate) -> f32 {
        self.adds[candidate.slot()]
    }

    pub fn zeroes(&self, candidate: Candidate) -> bool {
        self.zeroed[candidate.slot()]
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Six non-negative candidate scores
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scores {
    values: [f32; CANDIDATES],
}

impl Scores {
    /// Apply a delta: add, floor at zero, then force zeroed candidates
    pub fn apply(self, delta: &ScoreDelta) -> Self {
        let mut values = self.values;
        for (slot, value) in values.iter_mut().enumerate() {
            *value = if delta.zeroed[slot] {
                0.0
            } else {
                (*value + delta.adds[slot]).max(0.0)
            };
        }
        Self { values }
    }

    pub fn get(&self, candidate: Candidate) -> f32 {
        self.values[candidate.slot()]
    }

    pub fn total(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Highest score, ties broken by candidate priority. All-zero yields `Text`.
    pub fn winner(&self) -> Candidate {
        let mut best = Candidate::Text;
        let mut best_score = 0.0;
        for candidate in Candidate::PRIORITY {
            let score = self.get(candidate);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CANDIDATES))?;
        for candidate in Candidate::PRIORITY {
            map.serialize_entry(&candidate, &self.get(candidate))?;
        }
        map.end()
    }
}

/// A named, independently testable scoring heuristic
pub trait ScoringRule {
    fn score(&self, context: &QuestionContext<'_>) -> ScoreDelta;

    /// Name used in the pipeline config
    fn name(&self) -> &'static str;
}

/// Every scoring rule in canonical application order
pub fn canonical_rules() -> Vec<Box<dyn ScoringRule + Send + Sync>> {
    vec![
        Box::new(YesNoRule),
        Box::new(CheckboxRule),
        Box::new(RadioRule),
        Box::new(RatingRule),
        Box::new(FreeTextRule),
        Box::new(OptionContextRule),
        Box::new(OpenQuestionRule),
    ]
}

pub struct ScoringEngine {
    rules: Vec<Box<dyn ScoringRule + Send + Sync>>,
}

impl ScoringEngine {
    /// Canonical rules minus the ones the pipeline config disables. The
    /// config can switch rules off but never reorder them.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let rules: Vec<_> = canonical_rules()
            .into_iter()
            .filter(|rule| {
                let enabled = config.pipeline.is_enabled(rule.name());
                if !enabled {
                    tracing::debug!(rule = rule.name(), "scoring rule disabled");
                }
                enabled
            })
            .collect();
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn run(&self, context: &QuestionContext<'_>) -> Scores {
        self.rules.iter().fold(Scores::default(), |scores, rule| {
            let delta = rule.score(context);
            if !delta.is_empty() {
                tracing::trace!(rule = rule.name(), ?delta, "rule fired");
            }
            scores.apply(&delta)
        })
    }
}
