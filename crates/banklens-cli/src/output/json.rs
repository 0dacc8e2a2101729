use banklens_core::error::BankLensError;
use banklens_core::DocumentAnalysis;
use serde_json::Value;

pub fn print(analyses: &[DocumentAnalysis], show_trace: bool) -> Result<(), BankLensError> {
    let mut values = analyses
        .iter()
        .map(|a| to_value(a, show_trace))
        .collect::<Result<Vec<_>, _>>()?;

    let json = if values.len() == 1 {
        serde_json::to_string_pretty(&values.remove(0))?
    } else {
        serde_json::to_string_pretty(&values)?
    };
    println!("{json}");
    Ok(())
}

fn to_value(analysis: &DocumentAnalysis, show_trace: bool) -> Result<Value, BankLensError> {
    let mut value = serde_json::to_value(analysis)?;
    if !show_trace {
        if let Value::Object(map) = &mut value {
            map.remove("trace");
        }
    }
    Ok(value)
}
