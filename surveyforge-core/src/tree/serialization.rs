use crate::error::Result;
use crate::types::*;

impl QuestionnaireTree {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One row per question in document order, labels in the `en` slot only
    pub fn to_flat_format(&self) -> FlatQuestionnaire {
        let rows = self
            .sections
            .iter()
            .flat_map(|section| {
                section.questions.iter().map(move |question| FlatQuestionRow {
                    section: section.title.en.clone(),
                    id: question.id.clone(),
                    question_type: question.question_type,
                    text: question.question_text.en.clone(),
                    options: question
                        .options
                        .iter()
                        .flatten()
                        .map(|option| option.label.en.clone())
                        .collect(),
                    help_text: question.help_text.en.clone(),
                })
            })
            .collect();

        FlatQuestionnaire {
            format: "flat".to_string(),
            rows,
        }
    }

    /// Write the tree as `"tree"` (the full schema) or `"flat"` JSON.
    /// Unknown formats fall back to the full schema.
    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        let json = match format {
            "flat" => serde_json::to_string_pretty(&self.to_flat_format())?,
            _ => self.to_json_pretty()?,
        };
        std::fs::write(path, json)?;
        Ok(())
    }
}
