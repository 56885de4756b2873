//! outrank CLI - PDF outline extraction and persona-driven section ranking

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use outrank::{
    extract_outline_with_config, load_config, output, run_collection, ClassifierConfig,
    DocumentStatus, JsonFormat, PipelineOptions,
};

#[derive(Parser)]
#[command(name = "outrank")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the title and heading outline of a PDF
    Outline {
        /// Input PDF file, or a directory of PDFs
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output file or directory (stdout for a single file)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Minimum classifier score for a heading
        #[arg(long, value_name = "SCORE")]
        heading_threshold: Option<i32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank a collection of PDFs against a persona and job
    Rank {
        /// Collection directory containing config.json and the PDFs
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the collection directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Directory holding the cross-encoder model and tokenizer
        #[arg(long, value_name = "DIR", env = "OUTRANK_MODEL_DIR")]
        model_dir: Option<PathBuf>,

        /// Minimum classifier score for a heading
        #[arg(long, value_name = "SCORE")]
        heading_threshold: Option<i32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            heading_threshold,
            compact,
        } => cmd_outline(&input, output.as_deref(), heading_threshold, compact),
        Commands::Rank {
            input,
            output,
            model_dir,
            heading_threshold,
            compact,
        } => cmd_rank(&input, output.as_deref(), model_dir, heading_threshold, compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output_path: Option<&Path>,
    heading_threshold: Option<i32>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let config = classifier_config(heading_threshold);

    if input.is_dir() {
        return cmd_outline_dir(input, output_path, &config, format);
    }

    let outline = extract_outline_with_config(input, config)?;
    let json = output::to_json(&outline, format)?;

    if let Some(path) = output_path {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Extract outlines for every PDF in a directory, one JSON file each.
/// A failing document is reported and skipped.
fn classifier_config(heading_threshold: Option<i32>) -> ClassifierConfig {
    match heading_threshold {
        Some(threshold) => ClassifierConfig::new().with_threshold(threshold),
        None => ClassifierConfig::default(),
    }
}

fn cmd_outline_dir(
    input: &Path,
    output_dir: Option<&Path>,
    config: &ClassifierConfig,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdfs.sort();

    let dir = output_dir.unwrap_or(input);
    fs::create_dir_all(dir)?;

    let pb = ProgressBar::new(pdfs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = 0usize;
    for pdf in &pdfs {
        let name = pdf
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name.clone());

        match extract_outline_with_config(pdf, config.clone()) {
            Ok(outline) => {
                let stem = pdf
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let target = dir.join(format!("{}.json", stem));
                output::write_json(&target, &outline, format)?;
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("  {} {} ({})", "✗".red(), name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{} {} of {} documents -> {}",
        "Done:".green().bold(),
        pdfs.len() - failures,
        pdfs.len(),
        dir.display()
    );

    Ok(())
}

fn cmd_rank(
    input: &Path,
    output_dir: Option<&Path>,
    model_dir: Option<PathBuf>,
    heading_threshold: Option<i32>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = input.join("config.json");
    let config = load_config(&config_path)?;
    log::info!(
        "loaded config {} ({} documents)",
        config.challenge_info.challenge_id,
        config.documents.len()
    );

    let model_dir = model_dir.unwrap_or_else(outrank::rank::default_model_dir);
    let options = PipelineOptions::new(model_dir)
        .with_classifier(classifier_config(heading_threshold));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!(
        "Ranking {} documents for {}...",
        config.documents.len(),
        config.persona.role
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = run_collection(input, &config, &options)?;
    pb.finish_and_clear();

    for report in &result.reports {
        match &report.status {
            DocumentStatus::Processed { sections } => {
                println!(
                    "  {} {} ({} sections)",
                    "✓".green(),
                    report.filename,
                    sections
                );
            }
            DocumentStatus::Failed { reason } => {
                println!("  {} {} ({})", "✗".red(), report.filename, reason);
            }
        }
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let filename = output::result_filename(
        &config.challenge_info.challenge_id,
        &result.output.metadata.processing_timestamp,
    );
    let dir = output_dir.unwrap_or(input);
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    output::write_json(&path, &result.output, format)?;

    println!(
        "\n{} {} ranked sections -> {}",
        "Done:".green().bold(),
        result.output.extracted_sections.len(),
        path.display()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "outrank".green().bold(), env!("CARGO_PKG_VERSION"));
}
