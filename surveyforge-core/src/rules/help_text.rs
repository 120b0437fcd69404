use super::lexicon;
use super::option_extraction::{starts_numbered_question, MarkerMatcher};
use super::windows::Window;
use crate::config::{HelpTextConfig, OptionExtractionConfig};
use crate::preprocessors::EmphasisIndex;
use crate::types::EmphasisSpan;
use serde::{Deserialize, Serialize};

/// Where a question's help text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpTextSource {
    Parenthetical,
    Emphasis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHelpText {
    pub text: String,
    pub source: HelpTextSource,
}

pub struct HelpTextResolver {
    config: HelpTextConfig,
    markers: MarkerMatcher,
}

impl HelpTextResolver {
    pub fn new(config: &HelpTextConfig, options: &OptionExtractionConfig) -> Self {
        Self {
            config: config.clone(),
            markers: MarkerMatcher::new(options),
        }
    }

    /// Parenthesized instruction inside the window first, then the nearest
    /// emphasized span leading up to the question, then one in the window.
    pub fn resolve(&self, window: &Window<'_>, emphasis: &EmphasisIndex) -> Option<ResolvedHelpText> {
        self.from_parenthetical(window)
            .or_else(|| self.from_emphasis(window, emphasis))
    }

    fn from_parenthetical(&self, window: &Window<'_>) -> Option<ResolvedHelpText> {
        window.lines.iter().find_map(|line| {
            let inner = self.markers.parenthesized_inner(&line.text)?;
            (inner.chars().count() > self.config.min_length).then(|| ResolvedHelpText {
                text: inner.to_string(),
                source: HelpTextSource::Parenthetical,
            })
        })
    }

    /// Emphasis is searched in two places. First the lead-in: the question
    /// line and the lines above it, back to the previous boundary or the last
    /// answer option. Then the start of the window, before its first option.
    /// Window lines with no option after them lead into the next question and
    /// belong to it instead.
    fn from_emphasis(&self, window: &Window<'_>, emphasis: &EmphasisIndex) -> Option<ResolvedHelpText> {
        if !self.config.use_emphasis_fallback || emphasis.is_empty() {
            return None;
        }
        let accept = |span: &EmphasisSpan| {
            span.text.chars().count() >= self.config.min_length
                && !lexicon::is_yes_no_token(&span.text)
                && span.text != window.question_text
                && !starts_numbered_question(&span.text)
        };

        let lead_in = window
            .preceding
            .iter()
            .rev()
            .take_while(|line| !self.markers.is_option_like(&line.text))
            .count();
        let lead_in_start = window.position - lead_in;

        let first_option = window
            .lines
            .iter()
            .position(|line| self.markers.is_option_like(&line.text))
            .map(|offset| window.position + 1 + offset);
        let tail_end = match first_option {
            Some(position) => position,
            None if window.followed_by_question => window.position + 1,
            None => window.end,
        };

        emphasis
            .nearest(window.position, lead_in_start, window.position + 1, &accept)
            .or_else(|| emphasis.nearest(window.position, window.position + 1, tail_end, &accept))
            .map(|span| ResolvedHelpText {
                text: span.text.clone(),
                source: HelpTextSource::Emphasis,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsingConfig;
    use crate::preprocessors::normalize_lines;
    use crate::rules::boundary_detection::BoundaryDetector;
    use crate::rules::windows::build_windows;

    fn resolve_all(raw: &[&str], html: &str) -> Vec<Option<ResolvedHelpText>> {
        let config = ParsingConfig::default();
        let lines = normalize_lines(&raw.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        let emphasis = EmphasisIndex::build(html, &lines);
        let boundaries = BoundaryDetector::new(&config).detect(&lines);
        let resolver = HelpTextResolver::new(&config.help_text, &config.options);
        build_windows(&lines, &boundaries, config.windows.max_lines)
            .iter()
            .map(|window| resolver.resolve(window, &emphasis))
            .collect()
    }

    #[test]
    fn parenthesized_instruction_wins() {
        let found = resolve_all(
            &["1.1 Gjinia", "(Please choose only one of the following:) 14", "( ) M", "( ) F"],
            "<em>Something emphasized here</em>",
        );
        let help = found[0].as_ref().unwrap();
        assert_eq!(help.text, "Please choose only one of the following:");
        assert_eq!(help.source, HelpTextSource::Parenthetical);
    }

    #[test]
    fn short_parentheticals_and_yes_no_are_ignored() {
        let found = resolve_all(&["1.1 Gjinia", "(short)", "(Po)", "( ) M"], "");
        assert!(found[0].is_none());
    }

    #[test]
    fn emphasis_fallback_stays_within_the_question_context() {
        let found = resolve_all(
            &[
                "1. Të dhënat personale",
                "Plotësoni të gjitha fushat",
                "1.1 Emri",
                "1.2 Gjinia",
                "Zgjidhni vetëm një opsion",
                "( ) M",
            ],
            "<em>Plotësoni të gjitha fushat</em><p>x</p><em>Zgjidhni vetëm një opsion</em>",
        );
        assert_eq!(found[0].as_ref().unwrap().text, "Plotësoni të gjitha fushat");
        let second = found[1].as_ref().unwrap();
        assert_eq!(second.text, "Zgjidhni vetëm një opsion");
        assert_eq!(second.source, HelpTextSource::Emphasis);
    }

    #[test]
    fn instruction_between_questions_belongs_to_the_next_one() {
        let found = resolve_all(
            &["1.1 Emri juaj", "Kjo pyetje vlen vetëm për të punësuarit", "1.2 Ku punoni?"],
            "<p>1.1 Emri juaj</p><p><em>Kjo pyetje vlen vetëm për të punësuarit</em></p><p>1.2 Ku punoni?</p>",
        );
        assert!(found[0].is_none());
        let second = found[1].as_ref().unwrap();
        assert_eq!(second.text, "Kjo pyetje vlen vetëm për të punësuarit");
        assert_eq!(second.source, HelpTextSource::Emphasis);
    }

    #[test]
    fn instruction_before_the_options_stays_with_its_question() {
        let found = resolve_all(
            &["1.1 Gjinia", "Zgjidhni vetëm një opsion", "( ) Mashkull", "( ) Femër", "1.2 Mosha"],
            "<em>Zgjidhni vetëm një opsion</em>",
        );
        assert_eq!(found[0].as_ref().unwrap().text, "Zgjidhni vetëm një opsion");
        assert!(found[1].is_none());
    }

    #[test]
    fn bold_instruction_after_the_last_question() {
        let found = resolve_all(
            &["1.1 Emri juaj", "Shkruani emrin e plotë"],
            "<p>1.1 Emri juaj</p><p><strong>Shkruani emrin e plotë</strong></p>",
        );
        assert_eq!(found[0].as_ref().unwrap().text, "Shkruani emrin e plotë");
    }

    #[test]
    fn emphasized_question_lines_are_not_help_text() {
        let found = resolve_all(&["1.1 Emri juaj", "1.2 Mbiemri juaj"], "<b>1.1 Emri juaj</b><b>1.2 Mbiemri juaj</b>");
        assert!(found.iter().all(Option::is_none));
    }

    #[test]
    fn no_source_means_no_help_text() {
        let found = resolve_all(&["1.1 Emri", "1.2 Mbiemri"], "<p>plain</p>");
        assert!(found.iter().all(Option::is_none));
    }
}
