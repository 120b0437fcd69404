use crate::classifier::{Classification, QuestionClassifier};
use crate::config::ParsingConfig;
use crate::error::Result;
use crate::preprocessors::{Preprocessor, PreprocessorOutput, TextPreprocessor};
use crate::rules::help_text::{HelpTextResolver, HelpTextSource};
use crate::rules::option_extraction::OptionExtractor;
use crate::rules::validation::{TreeValidator, ValidationReport};
use crate::rules::windows::{build_windows, Window};
use crate::rules::BoundaryDetector;
use crate::tree::{ParsedQuestion, TreeBuilder};
use crate::types::*;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect each stage boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub lines: Vec<RawLine>,
    pub emphasis: Vec<EmphasisSpan>,
    pub boundaries: Vec<Boundary>,
    pub questions: Vec<QuestionTrace>,
    pub tree: QuestionnaireTree,
    pub validation: ValidationReport,
}

/// How one question was classified, for stage dumps
#[derive(Debug, Clone, serde::Serialize)]
pub struct QuestionTrace {
    pub position: usize,
    pub question_text: String,
    pub window: Vec<String>,
    pub classification: Classification,
    pub question_type: QuestionType,
    pub option_count: usize,
    pub help_text_source: Option<HelpTextSource>,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        tracing::info!(step = step_name, elapsed_us = elapsed.as_micros() as u64, "step finished");
        self.timings.push((step_name.to_string(), elapsed));
        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                duration.as_secs_f64() / total.as_secs_f64() * 100.0
            };
            tracing::info!(
                step = step.as_str(),
                elapsed_us = duration.as_micros() as u64,
                share_pct = percentage,
                "performance summary"
            );
        }
        tracing::info!(total_us = total.as_micros() as u64, "total parse time");
    }
}

/// Runs the whole pipeline: normalize, detect boundaries, build windows,
/// classify, extract options and help text, assemble, validate.
///
/// Holds only immutable configuration and compiled matchers, so one
/// processor can parse any number of documents, from any number of threads.
pub struct SurveyProcessor {
    config: ParsingConfig,
    preprocessor: TextPreprocessor,
    detector: BoundaryDetector,
    classifier: QuestionClassifier,
    extractor: OptionExtractor,
    help_text: HelpTextResolver,
    tree_builder: TreeBuilder,
}

impl Default for SurveyProcessor {
    fn default() -> Self {
        Self::from_valid_config(ParsingConfig::default())
    }
}

impl SurveyProcessor {
    pub fn new(config: ParsingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ParsingConfig) -> Self {
        Self {
            preprocessor: TextPreprocessor,
            detector: BoundaryDetector::new(&config),
            classifier: QuestionClassifier::new(&config),
            extractor: OptionExtractor::new(&config.options),
            help_text: HelpTextResolver::new(&config.help_text, &config.options),
            tree_builder: TreeBuilder::new(&config.assembly),
            config,
        }
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Parse a document into its questionnaire tree. Never fails.
    pub fn parse(&self, document: &SourceDocument) -> QuestionnaireTree {
        self.run(document, &mut StepProfiler::new(false)).tree
    }

    pub fn parse_with_profiling(&self, document: &SourceDocument) -> QuestionnaireTree {
        let mut profiler = StepProfiler::new(true);
        let stages = self.run(document, &mut profiler);
        profiler.log_summary();
        stages.tree
    }

    /// Parse and keep every intermediate artifact
    pub fn capture_stages(&self, document: &SourceDocument) -> PipelineStages {
        let stages = self.run(document, &mut StepProfiler::new(false));
        tracing::debug!(
            lines = stages.lines.len(),
            boundaries = stages.boundaries.len(),
            questions = stages.questions.len(),
            "captured pipeline stages"
        );
        stages
    }

    fn run(&self, document: &SourceDocument, profiler: &mut StepProfiler) -> PipelineStages {
        tracing::debug!(lines = document.lines.len(), html_bytes = document.html.len(), "parsing survey document");

        let PreprocessorOutput { lines, emphasis } =
            profiler.time_step("1. Normalization + emphasis", || self.preprocessor.process(document));

        let boundaries = profiler.time_step("2. Boundary detection", || self.detector.detect(&lines));

        let windows = profiler.time_step("3. Windows", || {
            build_windows(&lines, &boundaries, self.config.windows.max_lines)
        });

        let (parsed, traces): (Vec<_>, Vec<_>) = profiler.time_step("4. Classification + extraction", || {
            windows
                .iter()
                .map(|window| self.parse_question(window, &emphasis))
                .unzip()
        });

        let tree = profiler.time_step("5. Tree assembly", || self.tree_builder.build(&boundaries, parsed));
        let validation = profiler.time_step("6. Validation", || TreeValidator::validate(&tree));

        tracing::info!(
            sections = tree.metadata.total_sections,
            questions = tree.metadata.total_questions,
            options = tree.metadata.total_options,
            quality_score = validation.quality_score,
            "parsed questionnaire"
        );

        PipelineStages {
            emphasis: emphasis.spans().to_vec(),
            lines,
            boundaries,
            questions: traces,
            tree,
            validation,
        }
    }

    fn parse_question(
        &self,
        window: &Window<'_>,
        emphasis: &crate::preprocessors::EmphasisIndex,
    ) -> (ParsedQuestion, QuestionTrace) {
        let texts = window.texts();
        let classification = self.classifier.classify(window.question_text, &texts);

        let extraction_type = classification.extraction_type();
        let extracted = extraction_type
            .is_choice()
            .then(|| self.extractor.extract(&texts, extraction_type));
        let option_count = extracted.as_ref().map_or(0, Vec::len);
        let question_type =
            classification.question_type(option_count, self.config.classifier.select_min_options);

        let help = self.help_text.resolve(window, emphasis);

        let trace = QuestionTrace {
            position: window.position,
            question_text: window.question_text.to_string(),
            window: texts.iter().map(|t| t.to_string()).collect(),
            classification,
            question_type,
            option_count,
            help_text_source: help.as_ref().map(|h| h.source),
        };
        let parsed = ParsedQuestion {
            position: window.position,
            number: window.number.cloned(),
            question_text: window.question_text.to_string(),
            question_type,
            options: extracted,
            help_text: help
                .map(|h| LocalizedText::replicated(h.text))
                .unwrap_or_default(),
        };
        (parsed, trace)
    }
}
