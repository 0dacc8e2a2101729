use banklens_core::indicators::{Indicator, IndicatorFamily};
use banklens_core::rules::schema::AnalysisConfig;
use banklens_core::trace::TraceLocation;
use banklens_core::{rank_documents, DocumentAnalysis};

pub fn print(analyses: &[DocumentAnalysis], config: &AnalysisConfig, show_trace: bool) {
    for (i, analysis) in analyses.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_analysis(analysis, config, show_trace);
    }

    if analyses.len() > 1 {
        println!("\n=== Ranking ===\n");
        for (place, analysis) in rank_documents(analyses).iter().enumerate() {
            let bank = analysis
                .meta
                .as_ref()
                .map(|m| format!("{} ({})", m.bank_name, m.report_year))
                .unwrap_or_else(|| analysis.source.clone());
            println!(
                "  {:>2}. {:<40} {:.2}  {}",
                place + 1,
                bank,
                analysis.stability.score,
                analysis.stability.band.title()
            );
        }
    }
}

fn print_analysis(analysis: &DocumentAnalysis, config: &AnalysisConfig, show_trace: bool) {
    println!("=== {} ===\n", analysis.source);
    if let Some(meta) = &analysis.meta {
        println!("  Bank: {}", meta.bank_name);
        println!("  Year: {}\n", meta.report_year);
    }

    let resolved: Vec<(Indicator, f64)> = analysis.record.resolved().collect();
    if resolved.is_empty() {
        println!("  No indicators extracted.\n");
    } else {
        println!("  Indicators:");
        let width = resolved
            .iter()
            .map(|(i, _)| i.label().chars().count())
            .max()
            .unwrap_or(20);
        for (indicator, value) in &resolved {
            println!(
                "    {:<width$}  {}",
                indicator.label(),
                format_indicator(*indicator, *value),
                width = width
            );
        }
        println!();
    }

    println!("  Ratios ({} v{}):", config.name, config.version);
    for (kind, result) in &analysis.ratios {
        let value = if result.interpretation.is_calculable() {
            kind.format_value(result.value)
        } else {
            "-".to_string()
        };
        let weight = config.weights.get(kind).copied().unwrap_or(0.0);
        println!(
            "    {:<32} {:>10}  w={:.2}  {}",
            kind.title(),
            value,
            weight,
            result.interpretation
        );
    }
    println!();

    let stability = &analysis.stability;
    let marker = if stability.band.is_at_risk() { " (!)" } else { "" };
    println!("  Stability: {}{}", stability.interpretation, marker);
    println!("  Recommendation: {}\n", stability.band.recommendation());

    if !analysis.warnings.is_empty() {
        println!("  Warnings:");
        for w in &analysis.warnings {
            println!("    - {w}");
        }
        println!();
    }

    if show_trace {
        print_trace(analysis);
    }
}

fn print_trace(analysis: &DocumentAnalysis) {
    let trace = &analysis.trace;
    if !trace.entries.is_empty() {
        println!("  Trace:");
        for entry in &trace.entries {
            let location = match &entry.location {
                TraceLocation::Cell {
                    table_index,
                    row_index,
                    column,
                } => format!("table {table_index}, row {row_index}, col {column}"),
                TraceLocation::Section { section } => section.clone(),
            };
            println!(
                "    {} <- '{}' = '{}' [{}]",
                entry.indicator.key(),
                entry.raw_label,
                entry.raw_value,
                location
            );
            for step in &entry.steps {
                println!("      {}", step.message);
            }
        }
        println!();
    }
    for w in &trace.warnings {
        println!("  trace warning: {}", w.message);
    }
}

fn format_indicator(indicator: Indicator, value: f64) -> String {
    match indicator.family() {
        IndicatorFamily::Amount if value.abs() >= 1e9 => {
            format!("{:.2} млрд руб.", value / 1e9)
        }
        IndicatorFamily::Amount => format!("{value:.0} руб."),
        IndicatorFamily::Percentage => format!("{value:.2}%"),
        IndicatorFamily::Count => format!("{value:.0}"),
    }
}
