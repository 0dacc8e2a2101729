use banklens_core::error::BankLensError;
use banklens_core::extraction::pdftotext::PdftotextExtractor;
use banklens_core::metadata::{extract_metadata, meta_from_file_name};
use banklens_core::model::FinancialRecord;
use banklens_core::rules::builtin;
use banklens_core::{Analyzer, DocumentAnalysis};
use chrono::Datelike;
use std::path::{Path, PathBuf};

use crate::output;

pub fn run(
    files: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    preset: &str,
    output_format: &str,
    show_trace: bool,
) -> Result<(), BankLensError> {
    let config = match config_file {
        Some(path) => banklens_core::rules::load_config(&path)?,
        None => builtin::load_preset(preset)?,
    };
    tracing::info!(config = %config.name, version = %config.version, "loaded analysis config");

    let max_year = chrono::Local::now().year();
    let analyzer = Analyzer::new(&config);

    let mut analyses = Vec::with_capacity(files.len());
    for path in &files {
        analyses.push(analyze_file(&analyzer, path, max_year)?);
    }

    match output_format {
        "json" => output::json::print(&analyses, show_trace)?,
        _ => output::table::print(&analyses, &config, show_trace),
    }

    Ok(())
}

fn analyze_file(
    analyzer: &Analyzer<'_>,
    path: &Path,
    max_year: i32,
) -> Result<DocumentAnalysis, BankLensError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    tracing::info!(file = %file_name, "analysing");
    match extension.as_str() {
        "xlsx" => {
            let bytes = std::fs::read(path)?;
            analyzer.analyze_workbook(&bytes, &file_name, max_year)
        }
        "pdf" => {
            let bytes = std::fs::read(path)?;
            let extractor = PdftotextExtractor::new();
            analyzer.analyze_pdf(&bytes, &extractor, &file_name, max_year)
        }
        "txt" | "md" => {
            let text = std::fs::read_to_string(path)?;
            let meta = extract_metadata(&text, &[], max_year);
            Ok(analyzer
                .analyze_text(&text)
                .with_source(file_name)
                .with_meta(meta))
        }
        // A record produced elsewhere, keyed by indicator
        "json" => {
            let bytes = std::fs::read(path)?;
            let record: FinancialRecord = serde_json::from_slice(&bytes)?;
            let meta = meta_from_file_name(&file_name, max_year);
            Ok(analyzer
                .analyze_record(record)
                .with_source(file_name)
                .with_meta(meta))
        }
        _ => Err(BankLensError::UnsupportedInput(file_name)),
    }
}
