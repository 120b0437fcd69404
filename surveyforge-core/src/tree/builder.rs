use crate::config::AssemblyConfig;
use crate::types::*;
use std::collections::HashMap;

/// A fully resolved question, not yet placed in a section
#[derive(Debug, Clone)]
pub struct ParsedQuestion {
    /// Position of the question line, used to pair it with its boundary
    pub position: usize,
    pub number: Option<QuestionNumber>,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<AnswerOption>>,
    pub help_text: LocalizedText,
}

pub struct TreeBuilder {
    config: AssemblyConfig,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(&AssemblyConfig::default())
    }
}

impl TreeBuilder {
    pub fn new(config: &AssemblyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Group questions under the most recent section boundary. Subsection
    /// titles are appended to the enclosing section's description; questions
    /// before any heading land in an implicit section.
    pub fn build(&self, boundaries: &[Boundary], questions: Vec<ParsedQuestion>) -> QuestionnaireTree {
        let mut sections: Vec<Section> = Vec::new();
        let mut ids = QuestionIds::default();
        let mut questions = questions.into_iter().peekable();

        for boundary in boundaries {
            match &boundary.kind {
                BoundaryKind::Section { title, .. } => {
                    sections.push(new_section(LocalizedText::replicated(title.as_str()), sections.len()));
                }
                BoundaryKind::Subsection { title, .. } => {
                    let section = self.current_section(&mut sections);
                    append_description(&mut section.description, title);
                }
                BoundaryKind::QuestionStart { .. } => {
                    let Some(parsed) = questions.next_if(|q| q.position == boundary.position) else {
                        continue;
                    };
                    let section = self.current_section(&mut sections);
                    let question = Question {
                        id: ids.assign(parsed.number.as_ref()),
                        question_text: LocalizedText::replicated(parsed.question_text),
                        question_type: parsed.question_type,
                        required: false,
                        options: parsed.options,
                        help_text: parsed.help_text,
                        order_index: section.questions.len(),
                    };
                    section.questions.push(question);
                }
            }
        }

        let tree = QuestionnaireTree::from_sections(sections);
        tracing::debug!(
            sections = tree.metadata.total_sections,
            questions = tree.metadata.total_questions,
            options = tree.metadata.total_options,
            "assembled questionnaire tree"
        );
        tree
    }

    fn current_section<'s>(&self, sections: &'s mut Vec<Section>) -> &'s mut Section {
        if sections.is_empty() {
            sections.push(new_section(self.config.implicit_section_title.clone(), 0));
        }
        let last = sections.len() - 1;
        &mut sections[last]
    }
}

fn new_section(title: LocalizedText, order_index: usize) -> Section {
    Section {
        title,
        description: LocalizedText::default(),
        order_index,
        questions: Vec::new(),
    }
}

fn append_description(description: &mut LocalizedText, title: &str) {
    for slot in [&mut description.en, &mut description.sq, &mut description.sr] {
        if !slot.is_empty() {
            slot.push_str(" | ");
        }
        slot.push_str(title);
    }
}

/// Hands out question ids: the number when there is one, `q<n>` otherwise,
/// with a `-k` suffix for repeated numbers.
#[derive(Default)]
struct QuestionIds {
    ordinal: usize,
    seen: HashMap<String, usize>,
}

impl QuestionIds {
    fn assign(&mut self, number: Option<&QuestionNumber>) -> String {
        self.ordinal += 1;
        let base = number.map_or_else(|| format!("q{}", self.ordinal), ToString::to_string);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}
