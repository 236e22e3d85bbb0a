use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

// ============ Field Domains ============

/// Minimum accepted customer age.
pub const AGE_MIN: u32 = 18;
/// Maximum accepted customer age.
pub const AGE_MAX: u32 = 100;
/// Minimum accepted annual income, in currency units.
pub const ANNUAL_INCOME_MIN: u32 = 10_000;
/// Maximum accepted annual income, in currency units.
pub const ANNUAL_INCOME_MAX: u32 = 200_000;
/// Minimum accepted credit score.
pub const CREDIT_SCORE_MIN: u32 = 300;
/// Maximum accepted credit score.
pub const CREDIT_SCORE_MAX: u32 = 850;
/// Minimum accepted insurance duration, in years.
pub const INSURANCE_DURATION_MIN: u32 = 1;
/// Maximum accepted insurance duration, in years.
pub const INSURANCE_DURATION_MAX: u32 = 30;
/// Minimum accepted health score.
pub const HEALTH_SCORE_MIN: u32 = 0;
/// Maximum accepted health score.
pub const HEALTH_SCORE_MAX: u32 = 100;

// ============ Categorical Fields ============

/// Customer gender as offered by the quote form selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All selectable values, in encoding order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Integer code the model was trained with.
    pub fn code(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
            Gender::Other => 2.0,
        }
    }

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Policy type as offered by the quote form selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PolicyType {
    #[serde(rename = "Type 1")]
    Type1,
    #[serde(rename = "Type 2")]
    Type2,
    #[serde(rename = "Type 3")]
    Type3,
}

impl PolicyType {
    /// All selectable values, in encoding order.
    pub const ALL: [PolicyType; 3] = [PolicyType::Type1, PolicyType::Type2, PolicyType::Type3];

    /// Integer code the model was trained with.
    pub fn code(self) -> f64 {
        match self {
            PolicyType::Type1 => 0.0,
            PolicyType::Type2 => 1.0,
            PolicyType::Type3 => 2.0,
        }
    }

    /// Display label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            PolicyType::Type1 => "Type 1",
            PolicyType::Type2 => "Type 2",
            PolicyType::Type3 => "Type 3",
        }
    }
}

// ============ Quote Request / Response ============

/// One customer's submitted attributes for one prediction.
///
/// Constructed fresh on each form submission and discarded after the
/// prediction is produced; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Customer age in years.
    pub age: u32,
    /// Customer gender.
    pub gender: Gender,
    /// Annual income in currency units.
    pub annual_income: u32,
    /// Credit score.
    pub credit_score: u32,
    /// Insurance duration in years.
    pub insurance_duration: u32,
    /// Health score.
    pub health_score: u32,
    /// Requested policy type.
    pub policy_type: PolicyType,
}

impl QuoteRequest {
    /// Checks every numeric field against its documented domain.
    ///
    /// Categorical fields need no check here: the serde enums only admit the
    /// values the selectors offer.
    pub fn validate(&self) -> Result<(), AppError> {
        check_bounds("age", self.age, AGE_MIN, AGE_MAX)?;
        check_bounds(
            "annual_income",
            self.annual_income,
            ANNUAL_INCOME_MIN,
            ANNUAL_INCOME_MAX,
        )?;
        check_bounds(
            "credit_score",
            self.credit_score,
            CREDIT_SCORE_MIN,
            CREDIT_SCORE_MAX,
        )?;
        check_bounds(
            "insurance_duration",
            self.insurance_duration,
            INSURANCE_DURATION_MIN,
            INSURANCE_DURATION_MAX,
        )?;
        check_bounds(
            "health_score",
            self.health_score,
            HEALTH_SCORE_MIN,
            HEALTH_SCORE_MAX,
        )?;
        Ok(())
    }
}

fn check_bounds(field: &str, value: u32, min: u32, max: u32) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::BadRequest(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

/// The predicted premium for one quote request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// Raw model output.
    pub premium: f64,
    /// Monetary display string, e.g. `$1,234.56`.
    pub formatted: String,
    /// SHA-256 fingerprint of the model artifact that produced the prediction.
    pub model_fingerprint: String,
    /// When the prediction was produced.
    pub generated_at: DateTime<Utc>,
}

/// Formats a premium as a dollar amount with thousands separators and two
/// decimal places, matching the form's success banner.
pub fn format_premium(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let rem = cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("${}{}.{:02}", sign, grouped, rem)
}

// ============ Quote Form Schema ============

/// Domain of one numeric form field (rendered as a bounded slider).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NumericFieldSpec {
    /// JSON field name expected by the quote endpoint.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound.
    pub max: u32,
    /// Default value shown by the form.
    pub default: u32,
}

/// Options of one categorical form field (rendered as a closed selector).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoricalFieldSpec {
    /// JSON field name expected by the quote endpoint.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Selectable labels, in encoding order.
    pub options: Vec<String>,
}

/// Full description of the quote form's input surface.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteSchema {
    pub numeric_fields: Vec<NumericFieldSpec>,
    pub categorical_fields: Vec<CategoricalFieldSpec>,
}

impl QuoteSchema {
    /// Builds the schema from the same domain constants the validator uses.
    pub fn current() -> Self {
        Self {
            numeric_fields: vec![
                NumericFieldSpec {
                    name: "age".into(),
                    label: "Age".into(),
                    min: AGE_MIN,
                    max: AGE_MAX,
                    default: 30,
                },
                NumericFieldSpec {
                    name: "annual_income".into(),
                    label: "Annual Income".into(),
                    min: ANNUAL_INCOME_MIN,
                    max: ANNUAL_INCOME_MAX,
                    default: 50_000,
                },
                NumericFieldSpec {
                    name: "credit_score".into(),
                    label: "Credit Score".into(),
                    min: CREDIT_SCORE_MIN,
                    max: CREDIT_SCORE_MAX,
                    default: 700,
                },
                NumericFieldSpec {
                    name: "insurance_duration".into(),
                    label: "Insurance Duration (in years)".into(),
                    min: INSURANCE_DURATION_MIN,
                    max: INSURANCE_DURATION_MAX,
                    default: 5,
                },
                NumericFieldSpec {
                    name: "health_score".into(),
                    label: "Health Score".into(),
                    min: HEALTH_SCORE_MIN,
                    max: HEALTH_SCORE_MAX,
                    default: 70,
                },
            ],
            categorical_fields: vec![
                CategoricalFieldSpec {
                    name: "gender".into(),
                    label: "Gender".into(),
                    options: Gender::ALL.iter().map(|g| g.label().to_string()).collect(),
                },
                CategoricalFieldSpec {
                    name: "policy_type".into(),
                    label: "Policy Type".into(),
                    options: PolicyType::ALL
                        .iter()
                        .map(|p| p.label().to_string())
                        .collect(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_are_a_bijection() {
        let codes: Vec<f64> = Gender::ALL.iter().map(|g| g.code()).collect();
        assert_eq!(codes, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn policy_type_codes_are_a_bijection() {
        let codes: Vec<f64> = PolicyType::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn policy_type_labels_round_trip_through_serde() {
        for policy in PolicyType::ALL {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.label()));
            let back: PolicyType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, policy);
        }
    }

    #[test]
    fn unknown_categorical_labels_are_rejected() {
        assert!(serde_json::from_str::<Gender>("\"Unknown\"").is_err());
        assert!(serde_json::from_str::<PolicyType>("\"Type 4\"").is_err());
    }

    #[test]
    fn validate_accepts_domain_boundaries() {
        let mut req = sample_request();
        req.age = AGE_MIN;
        req.annual_income = ANNUAL_INCOME_MAX;
        req.health_score = HEALTH_SCORE_MIN;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_domain_values() {
        let mut req = sample_request();
        req.age = 17;
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("age must be between 18 and 100"));

        let mut req = sample_request();
        req.credit_score = 851;
        assert!(req.validate().is_err());

        let mut req = sample_request();
        req.insurance_duration = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn format_premium_groups_thousands() {
        assert_eq!(format_premium(1234.56), "$1,234.56");
        assert_eq!(format_premium(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_premium(999.999), "$1,000.00");
        assert_eq!(format_premium(0.0), "$0.00");
        assert_eq!(format_premium(-1234.5), "$-1,234.50");
    }

    fn sample_request() -> QuoteRequest {
        QuoteRequest {
            age: 30,
            gender: Gender::Male,
            annual_income: 50_000,
            credit_score: 700,
            insurance_duration: 5,
            health_score: 70,
            policy_type: PolicyType::Type1,
        }
    }
}
