//! Batch command - extract cards from many files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cardex_core::{BusinessCardParser, ExtractionResult, FieldKind};

use super::extract::{format_result, OutputFormat};
use super::{extract_file, is_image, is_supported, load_config};
use crate::ocr_space::OcrSpaceClient;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching text or image files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processed_at: DateTime<Utc>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = BusinessCardParser::from_config(&config.extraction)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let ocr = if files.iter().any(|p| is_image(p)) {
        Some(OcrSpaceClient::new(config.ocr.clone())?)
    } else {
        None
    };

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = extract_file(&path, &parser, ocr.as_ref()).await;
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => {
                debug!("{}: {} fields", path.display(), result.populated);
                results.push(ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processed_at: Utc::now(),
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processed_at: Utc::now(),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for processed in &successful {
            if let Some(result) = &processed.result {
                let output_path = output_path(output_dir, &processed.path, args.format);
                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let empty = successful
        .iter()
        .filter(|r| r.result.as_ref().is_some_and(|res| res.populated == 0))
        .count();

    println!();
    println!(
        "{} Processed {} cards in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} with no details, {} failed",
        style(successful.len()).green(),
        style(empty).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for processed in &failed {
            println!(
                "  - {}: {}",
                processed.path.display(),
                processed.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("card");
    output_dir.join(format!("{}.{}", stem, format.extension()))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status", "populated"];
    header.extend(FieldKind::ALL.iter().map(|k| k.as_str()));
    header.extend(["processed_at", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for processed in results {
        let filename = processed
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let mut row: Vec<String> = vec![filename.to_string()];
        match &processed.result {
            Some(result) => {
                row.push("success".to_string());
                row.push(result.populated.to_string());
                row.extend(
                    FieldKind::ALL
                        .iter()
                        .map(|k| result.card.get(*k).unwrap_or_default().to_string()),
                );
            }
            None => {
                row.push("error".to_string());
                row.push(String::new());
                row.extend(FieldKind::ALL.iter().map(|_| String::new()));
            }
        }
        row.push(processed.processed_at.to_rfc3339());
        row.push(processed.processing_time_ms.to_string());
        row.push(processed.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/out"), Path::new("/cards/lisa.png"), OutputFormat::Text);
        assert_eq!(path, PathBuf::from("/out/lisa.txt"));
    }

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.csv");

        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.txt"),
                result: Some(cardex_core::extract_card("Maria Garcia\nmaria@iberia.es")),
                error: None,
                processed_at: Utc::now(),
                processing_time_ms: 3,
            },
            ProcessResult {
                path: PathBuf::from("b.png"),
                result: None,
                error: Some("missing API key for OCR service".to_string()),
                processed_at: Utc::now(),
                processing_time_ms: 1,
            },
        ];
        write_summary(&summary, &results).unwrap();

        let mut reader = csv::Reader::from_path(&summary).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "filename", "status", "populated", "name", "company", "city", "phone", "email",
                "website", "processed_at", "processing_time_ms", "error"
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][1], "success");
        assert_eq!(&rows[0][2], "2");
        assert_eq!(&rows[0][7], "maria@iberia.es");
        assert_eq!(&rows[1][1], "error");
        assert_eq!(&rows[1][11], "missing API key for OCR service");
    }
}
