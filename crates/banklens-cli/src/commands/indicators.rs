use banklens_core::error::BankLensError;
use banklens_core::indicators::{IndicatorFamily, IndicatorRegistry};

pub fn list() -> Result<(), BankLensError> {
    let registry = IndicatorRegistry::default_registry();
    println!("Canonical indicators ({}):\n", registry.len());
    for (indicator, patterns) in registry.entries() {
        let family = match indicator.family() {
            IndicatorFamily::Amount => "amount",
            IndicatorFamily::Percentage => "percentage",
            IndicatorFamily::Count => "count",
        };
        let first = patterns.first().map(|re| re.as_str()).unwrap_or("-");
        println!("  {:<52} {:<11} {}", indicator.key(), family, first);
    }
    Ok(())
}
