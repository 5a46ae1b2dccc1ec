//! Dataset Creator CLI.
//!
//! Turns text, PDF and Word files into an anonymized prompt/response JSONL
//! dataset, stores it with a versioned mirror, and manages version labels.

use clap::{Args, Parser, Subcommand};
use dc_common::{MediaType, OutputFormat, RawDocument};
use dc_core::config::{load_config, ConfigOptions};
use dc_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use dc_core::{CoreError, ExitCode, Pipeline, DEFAULT_TAG};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{error, info_span};

/// Dataset Creator - anonymize documents into prompt/response datasets
#[derive(Parser)]
#[command(name = "dc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Directory holding the dataset store
    #[arg(long, global = true, env = "DC_ROOT")]
    root: Option<PathBuf>,

    /// Config file (falls back to DC_CONFIG, then the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build, store and optionally label a dataset from input files
    Create(CreateArgs),
    /// Label a stored dataset version
    Label(LabelArgs),
    /// Print all version labels
    Labels,
    /// Print the first records of a stored dataset
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Tag attached to every record and used as the filename prefix
    #[arg(long, short = 't', default_value = DEFAULT_TAG)]
    tag: String,

    /// Version label to record for the new dataset
    #[arg(long, short = 'l')]
    label: Option<String>,

    /// Declared media type for every input (default: inferred from extension)
    #[arg(long)]
    media_type: Option<String>,

    /// Also write the JSONL content to this path
    #[arg(long)]
    download: Option<PathBuf>,

    /// Paragraph left over from a previous run, placed before the first input
    #[arg(long)]
    carry: Option<String>,

    /// Input files (.txt, .pdf, .docx)
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Dataset filename, as printed by `create`
    filename: String,

    /// Label text
    label: String,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Dataset filename, as printed by `create`
    filename: String,

    /// Number of records to show (default: preview_len from config)
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _enter = span.enter();

    let result = match &cli.command {
        Commands::Create(args) => run_create(&cli.global, args),
        Commands::Label(args) => run_label(&cli.global, args),
        Commands::Labels => run_labels(&cli.global),
        Commands::Preview(args) => run_preview(&cli.global, args),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            let code = e.exit_code();
            error!(error = %e, code = %code, "Command failed");
            output_error(&cli.global, &run_id, &e, code);
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn build_pipeline(global: &GlobalOpts) -> Result<Pipeline, CoreError> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
        root: global.root.clone(),
    };
    let resolved = load_config(&options)?;
    Pipeline::from_config(&resolved.config)
}

fn run_create(global: &GlobalOpts, args: &CreateArgs) -> Result<ExitCode, CoreError> {
    let pipeline = build_pipeline(global)?;

    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let mut raw = RawDocument::from_path(path).map_err(|e| CoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        if let Some(media_type) = &args.media_type {
            raw = raw.with_media_type(MediaType::from_mime(media_type));
        }
        inputs.push(raw);
    }

    let outcome = pipeline.run(
        &inputs,
        &args.tag,
        args.label.as_deref(),
        args.carry.as_deref(),
    )?;

    if let Some(path) = &args.download {
        std::fs::write(path, outcome.artifact.bytes()).map_err(|e| CoreError::Io {
            path: path.clone(),
            source: e,
        })?;
    }

    let exit_code = if outcome.is_partial() {
        ExitCode::PartialFail
    } else {
        ExitCode::Clean
    };

    match global.format {
        OutputFormat::Json => emit(&json!({
            "command": "create",
            "status": exit_code.code_name(),
            "filename": outcome.filename(),
            "records": outcome.records.len(),
            "preview": outcome.preview(),
            "leftover": outcome.leftover,
            "warnings": outcome.warnings,
            "scrub": outcome.scrub,
            "receipt": outcome.receipt,
            "label": outcome.label,
            "label_warning": outcome.label_warning,
            "download": args.download.as_ref().map(|p| p.display().to_string()),
        })),
        OutputFormat::Summary => {
            println!(
                "{}: {} records from {} files ({} skipped, {} redactions)",
                outcome.filename(),
                outcome.records.len(),
                outcome.files_processed,
                outcome.warnings.len(),
                outcome.scrub.total()
            );
            for warning in &outcome.warnings {
                println!("  skipped {}: {}", warning.file, warning.error);
            }
            if let Some(warning) = &outcome.label_warning {
                println!("  label not recorded: {}", warning);
            }
            if let Some(leftover) = &outcome.leftover {
                println!("  leftover (pass with --carry): {}", leftover);
            }
        }
    }

    Ok(exit_code)
}

fn run_label(global: &GlobalOpts, args: &LabelArgs) -> Result<ExitCode, CoreError> {
    let pipeline = build_pipeline(global)?;
    let labels = pipeline.label(&args.filename, &args.label)?;

    match global.format {
        OutputFormat::Json => emit(&json!({
            "command": "label",
            "filename": args.filename,
            "label": args.label,
            "labels": labels,
        })),
        OutputFormat::Summary => println!("{} => {}", args.filename, args.label),
    }
    Ok(ExitCode::Clean)
}

fn run_labels(global: &GlobalOpts) -> Result<ExitCode, CoreError> {
    let pipeline = build_pipeline(global)?;
    let labels = pipeline.labels().load()?;

    match global.format {
        OutputFormat::Json => emit(&json!(labels)),
        OutputFormat::Summary => {
            for (filename, label) in &labels {
                println!("{} => {}", filename, label);
            }
        }
    }
    Ok(ExitCode::Clean)
}

fn run_preview(global: &GlobalOpts, args: &PreviewArgs) -> Result<ExitCode, CoreError> {
    let pipeline = build_pipeline(global)?;
    let limit = args.limit.unwrap_or_else(|| pipeline.preview_len());
    let records = pipeline.preview(&args.filename, limit)?;

    match global.format {
        OutputFormat::Json => emit(&json!(records)),
        OutputFormat::Summary => {
            for record in &records {
                println!("[{}] {} -> {}", record.tag, record.prompt, record.response);
            }
        }
    }
    Ok(ExitCode::Clean)
}

// ============================================================================
// Output helpers
// ============================================================================

fn emit(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

fn output_error(global: &GlobalOpts, run_id: &str, error: &CoreError, code: ExitCode) {
    match global.format {
        OutputFormat::Json => {
            let response = json!({
                "run_id": run_id,
                "status": "error",
                "code": code.code_name(),
                "exit_code": code.as_i32(),
                "error": error.to_string(),
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("{}", response),
            }
        }
        OutputFormat::Summary => eprintln!("[{}] {}: {}", run_id, code.code_name(), error),
    }
}
