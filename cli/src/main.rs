//! accesspdf CLI - PDF to accessible HTML conversion tool

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use accesspdf::render::report_to_json;
use accesspdf::{
    extract_content, validate_format, ConversionResult, ConvertOptions, ConvertedArtifact,
    Converter, DirectorySink, FileSource, JsonFormat, SourceDocument, StateRecorder,
};

const DEFAULT_OUTPUT_DIR: &str = "accesspdf_output";

#[derive(Parser)]
#[command(name = "accesspdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Validate PDFs and convert them to accessible HTML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file is a readable, non-empty PDF
    Validate {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert PDFs to accessible HTML
    Convert {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "ACCESSPDF_OUTPUT")]
        output: Option<PathBuf>,

        /// Declared document language
        #[arg(long, env = "ACCESSPDF_LANG", default_value = "es")]
        lang: String,

        /// Accessibility level label
        #[arg(long, env = "ACCESSPDF_LEVEL", default_value = "AA")]
        level: String,

        /// Convert one file at a time
        #[arg(long)]
        sequential: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();
    install_panic_hook();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Validate { input }) => cmd_validate(&input),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Convert {
            inputs,
            output,
            lang,
            level,
            sequential,
            json,
        }) => {
            let mut options = ConvertOptions::new()
                .with_language(lang)
                .with_accessibility_level(level);
            if sequential {
                options = options.sequential();
            }
            cmd_convert(&inputs, output.as_deref(), options, json)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: accesspdf <COMMAND> <FILE>".yellow());
            println!("       accesspdf --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Send panic reports to the logger instead of stderr.
///
/// Parser faults are contained and reported as conversion failures; the
/// default hook would still print a raw trace for each one.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| log::debug!("panic: {}", info)));
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (valid, message) = validate_format(&FileSource::new(input));
    if valid {
        println!("{} {}", "✓".green().bold(), message);
        Ok(())
    } else {
        Err(message.into())
    }
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = extract_content(&FileSource::new(input))?;

    if json {
        println!("{}", report_to_json(&report, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), report.metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), report.page_count);
    println!(
        "{}: {} bytes ({} MB)",
        "Size".bold(),
        report.size_bytes,
        report.size_mb
    );
    println!("{}: {}", "Title".bold(), report.title());
    println!("{}: {}", "Author".bold(), report.author());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        yes_no(report.metadata.encrypted)
    );
    println!(
        "{}: {}",
        "Tagged".bold(),
        yes_no(report.structurally_tagged())
    );

    Ok(())
}

/// Advances the progress bar as each document finishes.
struct ProgressRecorder {
    bar: ProgressBar,
}

impl StateRecorder for ProgressRecorder {
    fn record_document(&self, doc: &SourceDocument) {
        self.bar.set_message(doc.name().to_string());
        self.bar.inc(1);
    }

    fn record_artifact(&self, doc: &SourceDocument, artifact: &ConvertedArtifact) {
        log::debug!("{} -> {}", doc.name(), artifact.location.display());
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: ConvertOptions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = resolve_output_dir(output);

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let sink = Arc::new(DirectorySink::new(&output_dir));
    let recorder = Arc::new(ProgressRecorder { bar: pb.clone() });
    let converter = Converter::with_options(sink, options).with_recorder(recorder);

    let mut docs: Vec<SourceDocument> = inputs.iter().map(SourceDocument::from_path).collect();
    let results = converter.convert_all(&mut docs);
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&docs, &results);
    }

    let failed = results.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        return Err(format!("{} of {} conversions failed", failed, results.len()).into());
    }
    Ok(())
}

fn print_results(docs: &[SourceDocument], results: &[ConversionResult]) {
    println!("{}", "Conversion Results".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (doc, result) in docs.iter().zip(results) {
        match &result.artifact {
            Some(artifact) => println!(
                "{} {} -> {} ({} tags, {:.1} KB, {:.2?})",
                "✓".green().bold(),
                doc.name(),
                artifact.location.display(),
                artifact.tag_count,
                artifact.size_kb(),
                result.elapsed
            ),
            None => println!(
                "{} {}: {} ({:.2?})",
                "✗".red().bold(),
                doc.name(),
                result.message,
                result.elapsed
            ),
        }
    }
}

fn resolve_output_dir(output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn cmd_version() {
    println!("{} {}", "accesspdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to accessible HTML conversion tool");
}
