use banklens_core::error::BankLensError;
use banklens_core::rules::builtin;
use banklens_core::rules::schema::{AnalysisConfig, ThresholdPair};
use std::path::Path;

pub fn list() -> Result<(), BankLensError> {
    println!("Available predefined configs:\n");
    for name in builtin::PRESETS {
        let config = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, config.name, config.version);
        if let Some(ref desc) = config.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), BankLensError> {
    let config = builtin::load_preset(preset)?;
    print_config(&config);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), BankLensError> {
    let config = banklens_core::rules::load_config(file)?;

    println!("Config '{}' (v{}) is valid.", config.name, config.version);
    println!("  Thresholds: {} ratios", config.thresholds.len());
    println!("  Weights sum to {:.3}", config.total_weight());

    let missing: Vec<&str> = config
        .thresholds
        .keys()
        .filter(|kind| !config.weights.contains_key(kind))
        .map(|kind| kind.key())
        .collect();
    if !missing.is_empty() {
        println!("\nWarnings:");
        println!("  - ratios without a stability weight: {}", missing.join(", "));
    }
    Ok(())
}

fn print_config(config: &AnalysisConfig) {
    println!("{} (version {})\n", config.name, config.version);
    if let Some(ref desc) = config.description {
        println!("{}\n", desc);
    }

    println!("Thresholds:\n");
    println!("  {:<32} {:<16} {:<12} {:<12} Weight", "Ratio", "Direction", "Bound", "Ideal");
    println!("  {}", "-".repeat(82));
    for (kind, pair) in &config.thresholds {
        let (direction, bound, ideal) = match *pair {
            ThresholdPair::HigherIsBetter { min, ideal } => ("higher better", min, ideal),
            ThresholdPair::LowerIsBetter {
                ideal_max,
                concerning_max,
            } => ("lower better", concerning_max, ideal_max),
        };
        let weight = config.weights.get(kind).copied().unwrap_or(0.0);
        println!(
            "  {:<32} {:<16} {:<12} {:<12} {:.2}",
            kind.title(),
            direction,
            kind.format_value(bound),
            kind.format_value(ideal),
            weight
        );
    }

    let c = &config.calibration;
    println!("\nCalibration:\n");
    println!("  demand deposit share        {}", c.demand_deposit_share);
    println!("  short-term liability share  {}", c.short_term_liability_share);
    println!("  problem loan share          {}", c.problem_loan_share);
    println!("  assumed unit multiplier     {:e}", c.assumed_unit_multiplier);
    println!("  assumed unit ceiling        {:e}", c.assumed_unit_ceiling);
    println!();
}
