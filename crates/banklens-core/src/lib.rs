pub mod accounts;
pub mod error;
pub mod extraction;
pub mod indicators;
pub mod metadata;
pub mod model;
pub mod parsing;
pub mod ratios;
pub mod rules;
pub mod stability;
pub mod tables;
pub mod trace;
pub mod validate;

use error::BankLensError;
use extraction::table::filter_valid_tables;
use extraction::workbook::read_tables_workbook;
use extraction::TextSource;
use indicators::IndicatorRegistry;
use model::{DocumentMeta, FinancialRecord, Table};
use parsing::UnitPatterns;
use ratios::{RatioCalculator, RatioKind, RatioResult};
use rules::schema::AnalysisConfig;
use serde::Serialize;
use stability::StabilityScore;
use std::collections::BTreeMap;
use tables::{aggregate_with, Aggregation, TableWalker};
use trace::{build_ratio_decisions, build_stability_decision, TraceBundle};

/// Everything known about one analysed report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<DocumentMeta>,
    pub record: FinancialRecord,
    pub ratios: BTreeMap<RatioKind, RatioResult>,
    pub stability: StabilityScore,
    pub trace: TraceBundle,
    pub warnings: Vec<String>,
}

impl DocumentAnalysis {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Runs extraction, ratios and the stability score with one vocabulary
/// and one config.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    registry: &'a IndicatorRegistry,
    units: &'a UnitPatterns,
    config: &'a AnalysisConfig,
}

impl<'a> Analyzer<'a> {
    /// Analyzer over the built-in synonyms and unit patterns.
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Analyzer {
            registry: IndicatorRegistry::default_registry(),
            units: UnitPatterns::default_patterns(),
            config,
        }
    }

    pub fn with_registry(mut self, registry: &'a IndicatorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_units(mut self, units: &'a UnitPatterns) -> Self {
        self.units = units;
        self
    }

    pub fn analyze_tables(&self, tables: &[Table]) -> DocumentAnalysis {
        let walker = TableWalker::new(self.registry, self.units, &self.config.calibration);
        let aggregation = aggregate_with(tables, &walker);
        self.finish("tables", aggregation, Vec::new())
    }

    pub fn analyze_text(&self, text: &str) -> DocumentAnalysis {
        let aggregation = accounts::analyze_statement_text(text, self.registry, self.units);
        self.finish("text", aggregation, validate::validate_text_content(text))
    }

    /// Score a record that was extracted elsewhere.
    pub fn analyze_record(&self, record: FinancialRecord) -> DocumentAnalysis {
        let aggregation = Aggregation {
            record,
            trace: TraceBundle::default(),
        };
        self.finish("record", aggregation, Vec::new())
    }

    /// Analyse an `.xlsx` produced by the PDF table exporter. Bank and
    /// year come from the file name.
    pub fn analyze_workbook(
        &self,
        bytes: &[u8],
        file_name: &str,
        max_year: i32,
    ) -> Result<DocumentAnalysis, BankLensError> {
        let tables = filter_valid_tables(read_tables_workbook(bytes)?);
        Ok(self
            .analyze_tables(&tables)
            .with_source(file_name)
            .with_meta(metadata::meta_from_file_name(file_name, max_year)))
    }

    /// Analyse a PDF through a text backend. Bank and year are read from
    /// the text.
    pub fn analyze_pdf(
        &self,
        bytes: &[u8],
        source: &dyn TextSource,
        file_name: &str,
        max_year: i32,
    ) -> Result<DocumentAnalysis, BankLensError> {
        let text = source.extract_text(bytes)?;
        let meta = metadata::extract_metadata(&text, &[], max_year);
        Ok(self.analyze_text(&text).with_source(file_name).with_meta(meta))
    }

    fn finish(&self, source: &str, aggregation: Aggregation, mut warnings: Vec<String>) -> DocumentAnalysis {
        let Aggregation { record, mut trace } = aggregation;

        let ratios = RatioCalculator::new(&record, self.config).calculate_all();
        let stability = stability::compose(&ratios, self.config);

        trace.decisions.extend(build_ratio_decisions(&ratios));
        trace.decisions.push(build_stability_decision(&stability));

        warnings.extend(validate::validate_record(&record));
        for (kind, result) in &ratios {
            warnings.extend(
                validate::validate_ratio(result)
                    .into_iter()
                    .map(|w| format!("{kind}: {w}")),
            );
        }

        tracing::info!(
            source,
            indicators = record.resolved_count(),
            score = stability.score,
            band = %stability.band,
            "analysis complete"
        );

        DocumentAnalysis {
            source: source.to_string(),
            meta: None,
            record,
            ratios,
            stability,
            trace,
            warnings,
        }
    }
}

/// Main API entry point for tables handed over by an extractor.
pub fn analyze_tables(
    tables: &[Table],
    registry: &IndicatorRegistry,
    config: &AnalysisConfig,
) -> DocumentAnalysis {
    Analyzer::new(config).with_registry(registry).analyze_tables(tables)
}

/// Main API entry point for plain report text.
pub fn analyze_text(text: &str, registry: &IndicatorRegistry, config: &AnalysisConfig) -> DocumentAnalysis {
    Analyzer::new(config).with_registry(registry).analyze_text(text)
}

/// Order analyses by stability score, best first. Ties keep input order.
pub fn rank_documents(analyses: &[DocumentAnalysis]) -> Vec<&DocumentAnalysis> {
    let mut ranked: Vec<&DocumentAnalysis> = analyses.iter().collect();
    ranked.sort_by(|a, b| b.stability.score.total_cmp(&a.stability.score));
    ranked
}
