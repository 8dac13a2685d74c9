//! Structural checks on parsed extractions.
//!
//! Validation never blocks output. Missing high-priority categories are
//! warnings; only a completely empty extraction is an error.

use super::categories::EXPECTED_CATEGORIES;
use super::types::{ExtractionResult, ValidationReport};

/// Check a parsed extraction for minimal completeness. Warning and error
/// checks are independent; both always run.
pub fn validate_extraction(result: &ExtractionResult) -> ValidationReport {
    let mut warnings = Vec::new();
    for expected in EXPECTED_CATEGORIES {
        let needle = expected.to_lowercase();
        let found = result
            .categories
            .iter()
            .any(|record| record.category.to_lowercase().contains(&needle));
        if !found {
            warnings.push(format!("Missing expected category: {expected}"));
        }
    }

    let mut errors = Vec::new();
    if result.categories.is_empty() {
        errors.push("No clinical data points extracted".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        warnings,
        errors,
    }
}
