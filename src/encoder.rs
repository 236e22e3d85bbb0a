//! Feature encoding between the quote form and the regression model.
//!
//! The model was trained against a fixed-order numeric schema; this module
//! owns that contract. A row is always emitted in [`FEATURE_COLUMNS`] order
//! with categorical fields replaced by their integer codes. A mismatch with
//! the artifact's training schema would silently produce a meaningless
//! prediction, so the column list is also checked against the artifact's
//! declared feature names at startup.

use crate::models::QuoteRequest;

/// Number of columns in an encoded feature row.
pub const FEATURE_COUNT: usize = 7;

/// Column names in the exact order the model expects them.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Age",
    "Gender",
    "Annual Income",
    "Credit Score",
    "Insurance Duration",
    "Health Score",
    "Policy Type",
];

/// Encodes a validated quote request into a single model feature row.
///
/// Deterministic and total over in-domain requests: the same request always
/// yields the same row.
pub fn encode(request: &QuoteRequest) -> [f64; FEATURE_COUNT] {
    [
        f64::from(request.age),
        request.gender.code(),
        f64::from(request.annual_income),
        f64::from(request.credit_score),
        f64::from(request.insurance_duration),
        f64::from(request.health_score),
        request.policy_type.code(),
    ]
}
