//! ABCD assessment engine
//!
//! Pure calculators for the four domains (Anthropometry, Biochemistry,
//! Clinical, Dietetics) and the composite evaluator. Nothing here touches the
//! database or performs I/O; every function is safe to call from any thread.

pub mod anthropometry;
pub mod biochemistry;
pub mod clinical;
pub mod composite;
pub mod dietetics;
pub mod reference;
pub mod validation;

pub use composite::{evaluate, evaluate_with, EvaluationOptions, ProteinBasis};
pub use anthropometry::PediatricBmiMode;
pub use reference::{GrowthMetric, ReferenceTable, DEFAULT_GROWTH_REFERENCE};
pub use validation::ValidationError;

/// Append `item` unless an identical entry is already present
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|existing| existing == item) {
        list.push(item.to_string());
    }
}
