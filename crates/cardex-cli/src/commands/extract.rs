//! Extract command - pull contact fields from one card.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardex_core::{
    BusinessCardParser, CardParser, ExtractionResult, FieldKind, MergeReport, PocDetails,
};

use super::{extract_file, is_image, is_supported, load_config};
use crate::ocr_space::OcrSpaceClient;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text file, card image, or `-` to read text from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Existing contact record (JSON) whose empty fields should be filled
    #[arg(short, long)]
    existing: Option<PathBuf>,

    /// OCR.space engine to use for images
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    ocr_engine: Option<u8>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(engine) = args.ocr_engine {
        config.ocr.engine = engine;
    }

    let parser = BusinessCardParser::from_config(&config.extraction)?;
    let from_stdin = args.input.as_os_str() == "-";

    if !from_stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !from_stdin && !is_supported(&args.input) {
        debug!("Unknown extension, reading {} as text", args.input.display());
    }

    info!("Extracting card from {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let result = if from_stdin {
        pb.set_message("Reading stdin...");
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        parser.parse(&text)
    } else if is_image(&args.input) {
        pb.set_message("Running OCR...");
        let client = OcrSpaceClient::new(config.ocr.clone())?;
        extract_file(&args.input, &parser, Some(&client)).await?
    } else {
        pb.set_message("Extracting fields...");
        extract_file(&args.input, &parser, None).await?
    };

    pb.finish_and_clear();

    let output = match &args.existing {
        Some(path) => {
            let (record, report) = merge_into(path, &result)?;
            info!(
                "Filled {} empty fields of {}",
                report.filled_count(),
                path.display()
            );
            format_record(&record, args.format)?
        }
        None => format_result(&result, args.format)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let feedback = result.feedback();
    if feedback.is_warning() {
        eprintln!("{} {}", style("⚠").yellow(), feedback);
    } else {
        eprintln!("{} {}", style("✓").green(), feedback);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn merge_into(path: &Path, result: &ExtractionResult) -> anyhow::Result<(PocDetails, MergeReport)> {
    let content = fs::read_to_string(path)?;
    let mut record: PocDetails = serde_json::from_str(&content)?;
    let report = record.fill_empty(&result.card);
    Ok((record, report))
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(|kind| result.card.get(kind), Some(result.populated)),
        OutputFormat::Text => Ok(format_text(|kind| result.card.get(kind), result.populated)),
    }
}

fn format_record(record: &PocDetails, format: OutputFormat) -> anyhow::Result<String> {
    let populated = FieldKind::ALL
        .iter()
        .filter(|kind| record.get(**kind).is_some())
        .count();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(|kind| record.get(kind), None),
        OutputFormat::Text => Ok(format_text(|kind| record.get(kind), populated)),
    }
}

fn format_csv<'a>(
    field: impl Fn(FieldKind) -> Option<&'a str>,
    populated: Option<usize>,
) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = FieldKind::ALL.iter().map(|k| k.as_str()).collect();
    let mut row: Vec<String> = FieldKind::ALL
        .iter()
        .map(|k| field(*k).unwrap_or_default().to_string())
        .collect();

    if let Some(count) = populated {
        header.push("populated");
        row.push(count.to_string());
    }

    wtr.write_record(&header)?;
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text<'a>(field: impl Fn(FieldKind) -> Option<&'a str>, populated: usize) -> String {
    let mut output = String::new();

    for kind in FieldKind::ALL {
        let label = format!("{}:", label(kind));
        output.push_str(&format!("{:<9}{}\n", label, field(kind).unwrap_or("-")));
    }

    output.push_str(&format!("\nFields: {}/{}\n", populated, FieldKind::ALL.len()));
    output
}

fn label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Name => "Name",
        FieldKind::Company => "Company",
        FieldKind::City => "City",
        FieldKind::Phone => "Phone",
        FieldKind::Email => "Email",
        FieldKind::Url => "Website",
    }
}
