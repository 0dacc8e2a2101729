pub mod number;
pub mod units;

pub use number::{parse_amount, parse_localized_number, Amount};
pub use units::{UnitMultiplier, UnitPatterns};
