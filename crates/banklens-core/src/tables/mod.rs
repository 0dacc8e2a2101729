pub mod aggregate;
pub mod walker;

pub use aggregate::{aggregate, aggregate_with, Aggregation};
pub use walker::{TableExtraction, TableWalker};
