use anyhow::{bail, Context, Result};
use clap::Parser;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use surveyforge_core::{ParsingConfig, PipelineStages, SourceDocument, SurveyProcessor};

#[derive(Parser)]
#[command(name = "surveyforge")]
#[command(about = "Turn extracted survey documents into a typed questionnaire tree")]
struct Args {
    /// JSON payload of the form {"lines": [...], "html": "..."}
    #[arg(short, long, conflicts_with = "lines")]
    input: Option<String>,

    /// Plain text file, one extracted line per line
    #[arg(long)]
    lines: Option<String>,

    /// HTML rendition used for emphasis-based help text (with --lines)
    #[arg(long, requires = "lines")]
    html: Option<String>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: tree or flat
    #[arg(short = 'f', long, default_value = "tree")]
    output_format: String,

    /// Output file path (if not specified, derived from the input name)
    #[arg(short, long)]
    output: Option<String>,

    /// Print the default configuration as YAML and exit
    #[arg(long)]
    show_config: bool,

    /// Log timings for every pipeline step
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,
}

fn main() {
    init_tracing();

    if let Err(err) = run(Args::parse()) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    if args.show_config {
        print!("{}", ParsingConfig::default().to_yaml()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let config = ParsingConfig::load_from_file(path)
                .with_context(|| format!("failed to load config from {path}"))?;
            info!(path = path.as_str(), "loaded config");
            config
        }
        None => ParsingConfig::load_with_fallback(None),
    };
    let processor = SurveyProcessor::new(config).context("invalid parsing config")?;

    let (input_path, raw_input, document) = load_document(&args)?;
    info!(input = input_path, lines = document.lines.len(), "processing survey");

    if args.dump_stages {
        let stages = processor.capture_stages(&document);
        save_stages(&stages, &args.stages_dir, input_path, &raw_input)?;
        info!(dir = args.stages_dir.as_str(), "all stages dumped");
        return Ok(());
    }

    let tree = if args.profile {
        processor.parse_with_profiling(&document)
    } else {
        processor.parse(&document)
    };

    let output_path = match &args.output {
        Some(output) => output.clone(),
        None => {
            let stem = Path::new(input_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("survey");
            format!("{stem}_questionnaire.json")
        }
    };

    if !matches!(args.output_format.as_str(), "tree" | "flat") {
        warn!(format = args.output_format.as_str(), "unknown output format, using tree");
    }
    tree.save_with_format(&output_path, &args.output_format)
        .with_context(|| format!("failed to write {output_path}"))?;

    info!(
        output = output_path.as_str(),
        sections = tree.metadata.total_sections,
        questions = tree.metadata.total_questions,
        options = tree.metadata.total_options,
        "questionnaire saved"
    );
    Ok(())
}

/// Read the input files. Returns the path used for naming, the raw bytes
/// that were hashed into the stage summary, and the parsed document.
fn load_document(args: &Args) -> Result<(&str, String, SourceDocument)> {
    if let Some(path) = &args.input {
        let payload = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        let document = SourceDocument::from_json(&payload).with_context(|| format!("malformed payload in {path}"))?;
        return Ok((path.as_str(), payload, document));
    }

    let Some(path) = &args.lines else {
        bail!("no input given, pass --input <payload.json> or --lines <file.txt>");
    };
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let html = match &args.html {
        Some(html_path) => {
            fs::read_to_string(html_path).with_context(|| format!("failed to read {html_path}"))?
        }
        None => String::new(),
    };

    let mut document = SourceDocument::from_text(&text);
    document.html = html.clone();
    Ok((path.as_str(), text + &html, document))
}

fn save_stages(stages: &PipelineStages, output_dir: &str, input_path: &str, raw_input: &str) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| format!("failed to create {output_dir}"))?;

    write_stage(output_dir, "stage1_lines.json", &stages.lines, stages.lines.len())?;
    write_stage(output_dir, "stage2_emphasis.json", &stages.emphasis, stages.emphasis.len())?;
    write_stage(output_dir, "stage3_boundaries.json", &stages.boundaries, stages.boundaries.len())?;
    write_stage(output_dir, "stage4_questions.json", &stages.questions, stages.questions.len())?;

    let tree_path = format!("{output_dir}/stage5_tree.json");
    stages.tree.save_with_format(&tree_path, "tree")?;
    info!(path = tree_path.as_str(), questions = stages.tree.metadata.total_questions, "stage written");

    write_stage(
        output_dir,
        "stage6_validation.json",
        &stages.validation,
        stages.validation.issues.len(),
    )?;

    // Quick reference for comparing dumps across runs
    let digest = Sha256::digest(raw_input.as_bytes());
    let summary = serde_json::json!({
        "input": input_path,
        "input_sha256": format!("{digest:x}"),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "lines": stages.lines.len(),
            "emphasis_spans": stages.emphasis.len(),
            "boundaries": stages.boundaries.len(),
            "questions": stages.questions.len(),
            "sections": stages.tree.metadata.total_sections,
            "options": stages.tree.metadata.total_options,
            "validation_issues": stages.validation.issues.len(),
        },
        "quality_score": stages.validation.quality_score,
    });
    let summary_path = format!("{output_dir}/summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    info!(path = summary_path.as_str(), "stage written");

    Ok(())
}

fn write_stage<T: serde::Serialize + ?Sized>(output_dir: &str, name: &str, value: &T, count: usize) -> Result<()> {
    let path = format!("{output_dir}/{name}");
    fs::write(&path, serde_json::to_string_pretty(value)?).with_context(|| format!("failed to write {path}"))?;
    info!(path = path.as_str(), count, "stage written");
    Ok(())
}
