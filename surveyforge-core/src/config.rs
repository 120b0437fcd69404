use crate::error::{Result, SurveyError};
use crate::types::LocalizedText;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    #[serde(default)]
    pub boundaries: BoundaryConfig,
    #[serde(default)]
    pub windows: WindowConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub options: OptionExtractionConfig,
    #[serde(default)]
    pub help_text: HelpTextConfig,
    #[serde(default)]
    pub assembly: AssemblyConfig,
}

// ===== BOUNDARY DETECTION =====

/// How a single-level `N. Capitalized ...` line is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingPolicy {
    /// Always a section heading
    AlwaysSection,
    /// A question when it ends in `?`/`:` or the next line is option-like
    Contextual,
}

fn default_heading_policy() -> HeadingPolicy {
    HeadingPolicy::Contextual
}

fn default_comment_prefixes() -> Vec<String> {
    vec![
        "#".to_string(),
        "//".to_string(),
        "--".to_string(),
        "§".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(default = "default_heading_policy")]
    pub numbered_heading_policy: HeadingPolicy,

    /// Prefixes that mark a section comment line
    #[serde(default = "default_comment_prefixes")]
    pub comment_prefixes: Vec<String>,

    /// Treat plain lines as questions when a document carries no numbering at all
    #[serde(default = "default_true")]
    pub unnumbered_fallback: bool,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            numbered_heading_policy: default_heading_policy(),
            comment_prefixes: default_comment_prefixes(),
            unnumbered_fallback: true,
        }
    }
}

// ===== WINDOWS =====

fn default_max_window_lines() -> usize {
    40
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Upper bound on the lookahead window of a single question
    #[serde(default = "default_max_window_lines")]
    pub max_lines: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_window_lines(),
        }
    }
}

// ===== TYPE CLASSIFIER =====

fn default_long_question_words() -> usize {
    20
}

fn default_hard_override_lines() -> usize {
    3
}

fn default_select_min_options() -> Option<usize> {
    Some(12)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Question texts longer than this (in words) nudge towards textarea
    #[serde(default = "default_long_question_words")]
    pub long_question_words: usize,

    /// How many window lines are checked for a free-response instruction
    #[serde(default = "default_hard_override_lines")]
    pub hard_override_lines: usize,

    /// Radio questions with at least this many options render as a select
    #[serde(default = "default_select_min_options")]
    pub select_min_options: Option<usize>,

    #[serde(default)]
    pub weights: ScoringWeights,

    /// Scoring rule toggles
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            long_question_words: default_long_question_words(),
            hard_override_lines: default_hard_override_lines(),
            select_min_options: default_select_min_options(),
            weights: ScoringWeights::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Every increment and penalty the scoring rules apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub yes_no_boolean: f32,
    pub yes_no_radio: f32,
    pub checkbox_cue: f32,
    pub bracket_radio_penalty: f32,
    pub radio_cue: f32,
    pub paren_checkbox_penalty: f32,
    pub rating_vocabulary: f32,
    pub rating_radio: f32,
    pub free_text_vocabulary: f32,
    pub blank_fill: f32,
    pub long_question: f32,
    pub option_context_penalty: f32,
    pub option_list_boost: f32,
    pub open_question_penalty: f32,
    pub open_question_text: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            yes_no_boolean: 6.0,
            yes_no_radio: 2.0,
            checkbox_cue: 3.0,
            bracket_radio_penalty: 2.0,
            radio_cue: 3.0,
            paren_checkbox_penalty: 2.0,
            rating_vocabulary: 3.0,
            rating_radio: 1.0,
            free_text_vocabulary: 2.0,
            blank_fill: 3.0,
            long_question: 1.0,
            option_context_penalty: 4.0,
            option_list_boost: 2.0,
            open_question_penalty: 3.0,
            open_question_text: 1.0,
        }
    }
}

impl ScoringWeights {
    fn values(&self) -> [(&'static str, f32); 15] {
        [
            ("yes_no_boolean", self.yes_no_boolean),
            ("yes_no_radio", self.yes_no_radio),
            ("checkbox_cue", self.checkbox_cue),
            ("bracket_radio_penalty", self.bracket_radio_penalty),
            ("radio_cue", self.radio_cue),
            ("paren_checkbox_penalty", self.paren_checkbox_penalty),
            ("rating_vocabulary", self.rating_vocabulary),
            ("rating_radio", self.rating_radio),
            ("free_text_vocabulary", self.free_text_vocabulary),
            ("blank_fill", self.blank_fill),
            ("long_question", self.long_question),
            ("option_context_penalty", self.option_context_penalty),
            ("option_list_boost", self.option_list_boost),
            ("open_question_penalty", self.open_question_penalty),
            ("open_question_text", self.open_question_text),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scoring rules and whether they run. Rules not listed run by default.
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let names = [
            "YesNo",
            "Checkbox",
            "Radio",
            "Rating",
            "FreeText",
            "OptionContext",
            "OpenQuestion",
        ];
        Self {
            rules: names
                .iter()
                .map(|name| RuleConfig {
                    name: name.to_string(),
                    enabled: true,
                })
                .collect(),
        }
    }
}

impl PipelineConfig {
    pub fn is_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.name == rule_name)
            .map_or(true, |rule| rule.enabled)
    }
}

// ===== OPTION EXTRACTION =====

fn default_bare_option_max_chars() -> usize {
    150
}

fn default_bare_option_max_words() -> usize {
    15
}

fn default_bullet_glyphs() -> Vec<String> {
    vec![
        "•".to_string(),
        "·".to_string(),
        "●".to_string(),
        "■".to_string(),
        "▪".to_string(),
        "▫".to_string(),
        "◦".to_string(),
        "‣".to_string(),
        "⁃".to_string(),
        "-".to_string(),
        "–".to_string(),
        "*".to_string(),
        "→".to_string(),
        "➤".to_string(),
        "✓".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionExtractionConfig {
    /// Unmarked lines longer than this are not accepted as options
    #[serde(default = "default_bare_option_max_chars")]
    pub bare_option_max_chars: usize,

    #[serde(default = "default_bare_option_max_words")]
    pub bare_option_max_words: usize,

    /// Bullet glyphs recognized as option markers (must be followed by a space)
    #[serde(default = "default_bullet_glyphs")]
    pub bullet_glyphs: Vec<String>,
}

impl Default for OptionExtractionConfig {
    fn default() -> Self {
        Self {
            bare_option_max_chars: default_bare_option_max_chars(),
            bare_option_max_words: default_bare_option_max_words(),
            bullet_glyphs: default_bullet_glyphs(),
        }
    }
}

// ===== HELP TEXT =====

fn default_help_min_length() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpTextConfig {
    /// Parenthesized instructions must be longer than this (in characters)
    #[serde(default = "default_help_min_length")]
    pub min_length: usize,

    /// Fall back to the emphasis index when the window has no instruction line
    #[serde(default = "default_true")]
    pub use_emphasis_fallback: bool,
}

impl Default for HelpTextConfig {
    fn default() -> Self {
        Self {
            min_length: default_help_min_length(),
            use_emphasis_fallback: true,
        }
    }
}

// ===== TREE ASSEMBLY =====

fn default_implicit_section_title() -> LocalizedText {
    LocalizedText {
        en: "General".to_string(),
        sq: "Të përgjithshme".to_string(),
        sr: "Opšte".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Title of the section that holds questions seen before any section heading
    #[serde(default = "default_implicit_section_title")]
    pub implicit_section_title: LocalizedText,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            implicit_section_title: default_implicit_section_title(),
        }
    }
}

impl ParsingConfig {
    /// Load and validate a YAML config file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParsingConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|err| {
                tracing::warn!(path = p, error = %err, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.windows.max_lines == 0 {
            return Err(SurveyError::InvalidConfig(
                "windows.max_lines must be at least 1".to_string(),
            ));
        }
        if self.options.bare_option_max_words == 0 || self.options.bare_option_max_chars == 0 {
            return Err(SurveyError::InvalidConfig(
                "bare option limits must be positive".to_string(),
            ));
        }
        if self.classifier.select_min_options == Some(0) {
            return Err(SurveyError::InvalidConfig(
                "classifier.select_min_options must be positive or null".to_string(),
            ));
        }
        for (name, weight) in self.classifier.weights.values() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SurveyError::InvalidConfig(format!(
                    "classifier.weights.{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if self
            .options
            .bullet_glyphs
            .iter()
            .any(|glyph| glyph.trim().is_empty())
        {
            return Err(SurveyError::InvalidConfig(
                "options.bullet_glyphs must not contain blank entries".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
