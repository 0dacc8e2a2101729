pub mod builtin;
pub mod schema;

use crate::error::BankLensError;
use crate::ratios::RatioKind;
use schema::{AnalysisConfig, ThresholdPair};
use std::path::Path;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Load an analysis config from a JSON file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, BankLensError> {
    let content = std::fs::read_to_string(path).map_err(|e| BankLensError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse an analysis config from a JSON string read from `source`.
pub fn parse_config(json: &str, source: &Path) -> Result<AnalysisConfig, BankLensError> {
    let config: AnalysisConfig =
        serde_json::from_str(json).map_err(|e| BankLensError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse an analysis config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<AnalysisConfig, BankLensError> {
    let config: AnalysisConfig = serde_json::from_str(json).map_err(BankLensError::Json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is complete and internally consistent.
pub fn validate_config(config: &AnalysisConfig) -> Result<(), BankLensError> {
    for kind in RatioKind::ALL {
        let Some(pair) = config.thresholds.get(kind) else {
            return Err(BankLensError::ConfigInvalid(format!(
                "missing threshold for '{}'",
                kind.key()
            )));
        };

        match (kind.lower_is_better(), pair) {
            (false, ThresholdPair::HigherIsBetter { min, ideal }) => {
                if !(min.is_finite() && ideal.is_finite()) || min >= ideal {
                    return Err(BankLensError::ConfigInvalid(format!(
                        "'{}' needs min < ideal (got {} and {})",
                        kind.key(),
                        min,
                        ideal
                    )));
                }
            }
            (
                true,
                ThresholdPair::LowerIsBetter {
                    ideal_max,
                    concerning_max,
                },
            ) => {
                if !(ideal_max.is_finite() && concerning_max.is_finite())
                    || ideal_max >= concerning_max
                {
                    return Err(BankLensError::ConfigInvalid(format!(
                        "'{}' needs ideal_max < concerning_max (got {} and {})",
                        kind.key(),
                        ideal_max,
                        concerning_max
                    )));
                }
            }
            _ => {
                return Err(BankLensError::ConfigInvalid(format!(
                    "'{}' has the wrong threshold direction",
                    kind.key()
                )));
            }
        }
    }

    if config.weights.is_empty() {
        return Err(BankLensError::ConfigInvalid("weights must not be empty".into()));
    }

    if let Some((kind, weight)) = config
        .weights
        .iter()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(BankLensError::ConfigInvalid(format!(
            "weight for '{}' must be a non-negative number (got {})",
            kind.key(),
            weight
        )));
    }

    let total = config.total_weight();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(BankLensError::ConfigInvalid(format!(
            "weights must sum to 1.0 (got {total})"
        )));
    }

    let c = &config.calibration;
    let shares = [
        ("demand_deposit_share", c.demand_deposit_share),
        ("short_term_liability_share", c.short_term_liability_share),
        ("problem_loan_share", c.problem_loan_share),
    ];
    for (name, share) in shares {
        if !(0.0..=1.0).contains(&share) {
            return Err(BankLensError::ConfigInvalid(format!(
                "calibration '{name}' must be within [0, 1] (got {share})"
            )));
        }
    }
    if c.assumed_unit_multiplier < 1.0 || c.assumed_unit_ceiling <= 0.0 {
        return Err(BankLensError::ConfigInvalid(
            "calibration unit multiplier must be >= 1 and ceiling positive".into(),
        ));
    }

    Ok(())
}
