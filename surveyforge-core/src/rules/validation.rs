use crate::types::*;
use serde::Serialize;

// Structural validation of an assembled tree. Pure reporting: the tree is
// never changed, callers decide what an issue means for them.

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub quality_score: f32,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    ChoiceWithoutOptions {
        question_id: String,
        question_type: QuestionType,
    },
    BooleanOptionCount {
        question_id: String,
        count: usize,
    },
    NumberingGap {
        previous: String,
        current: String,
    },
    EmptySection {
        order_index: usize,
        title: String,
    },
}

pub struct TreeValidator;

impl TreeValidator {
    pub fn validate(tree: &QuestionnaireTree) -> ValidationReport {
        let mut issues = Vec::new();

        for section in &tree.sections {
            if section.questions.is_empty() {
                issues.push(ValidationIssue::EmptySection {
                    order_index: section.order_index,
                    title: section.title.en.clone(),
                });
            }
            Self::validate_options(section, &mut issues);
            Self::validate_numbering(section, &mut issues);
        }

        let total_questions = tree.metadata.total_questions;
        let quality_score = if total_questions == 0 {
            1.0
        } else {
            (1.0 - (issues.len() as f32 / total_questions as f32)).max(0.0)
        };

        let report = ValidationReport {
            issues,
            quality_score,
            total_questions,
        };
        Self::log_report(&report);
        report
    }

    fn validate_options(section: &Section, issues: &mut Vec<ValidationIssue>) {
        for question in &section.questions {
            let count = question.option_count();
            if question.question_type.is_choice() && count == 0 {
                issues.push(ValidationIssue::ChoiceWithoutOptions {
                    question_id: question.id.clone(),
                    question_type: question.question_type,
                });
            } else if question.question_type == QuestionType::Boolean && count != 2 {
                issues.push(ValidationIssue::BooleanOptionCount {
                    question_id: question.id.clone(),
                    count,
                });
            }
        }
    }

    /// Sibling numbers should advance one step at a time (3.1 -> 3.2, a -> b)
    fn validate_numbering(section: &Section, issues: &mut Vec<ValidationIssue>) {
        let numbered: Vec<(&str, QuestionNumber)> = section
            .questions
            .iter()
            .filter_map(|q| numbering_of(&q.id).map(|n| (q.id.as_str(), n)))
            .collect();

        for pair in numbered.windows(2) {
            let ((previous_id, previous), (current_id, current)) = (&pair[0], &pair[1]);
            if skips_a_sibling(previous, current) {
                issues.push(ValidationIssue::NumberingGap {
                    previous: previous_id.to_string(),
                    current: current_id.to_string(),
                });
            }
        }
    }

    fn log_report(report: &ValidationReport) {
        if report.issues.is_empty() {
            tracing::debug!(questions = report.total_questions, "tree validation passed");
            return;
        }
        tracing::warn!(
            issues = report.issues.len(),
            quality_score = report.quality_score,
            "tree validation found issues"
        );
        for issue in report.issues.iter().take(5) {
            tracing::debug!(?issue, "validation issue");
        }
    }
}

/// Ids are question numbers, possibly with a `-k` duplicate suffix; synthetic
/// `q<n>` ids carry no numbering.
fn numbering_of(id: &str) -> Option<QuestionNumber> {
    let base = id.split_once('-').map_or(id, |(base, _)| base);
    QuestionNumber::parse(base)
}

fn skips_a_sibling(previous: &QuestionNumber, current: &QuestionNumber) -> bool {
    match (previous.suffix, current.suffix) {
        (Some(a), Some(b)) if previous.segments == current.segments => (b as u32) > (a as u32) + 1,
        (None, None)
            if previous.depth() == current.depth()
                && previous.parent_segments() == current.parent_segments() =>
        {
            let last = |n: &QuestionNumber| n.segments.last().copied().unwrap_or(0);
            last(current) > last(previous) + 1
        }
        _ => false,
    }
}
