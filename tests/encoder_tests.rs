/// Unit tests for the feature-encoding contract
/// Tests column order, categorical codes, and the reference scenario
use rust_premium_api::encoder::{encode, FEATURE_COLUMNS, FEATURE_COUNT};
use rust_premium_api::models::{Gender, PolicyType, QuoteRequest};

fn base_request() -> QuoteRequest {
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

#[cfg(test)]
mod column_order_tests {
    use super::*;

    #[test]
    fn test_seven_columns_in_model_order() {
        assert_eq!(FEATURE_COUNT, 7);
        assert_eq!(
            FEATURE_COLUMNS,
            [
                "Age",
                "Gender",
                "Annual Income",
                "Credit Score",
                "Insurance Duration",
                "Health Score",
                "Policy Type",
            ]
        );
    }

    #[test]
    fn test_reference_scenario() {
        // Age=30, Gender=Male, Annual Income=50000, Credit Score=700,
        // Insurance Duration=5, Health Score=70, Policy Type="Type 1"
        let row = encode(&base_request());
        assert_eq!(row, [30.0, 0.0, 50_000.0, 700.0, 5.0, 70.0, 0.0]);
    }

    #[test]
    fn test_numeric_fields_pass_through_unchanged() {
        let mut req = base_request();
        req.age = 64;
        req.annual_income = 123_456;
        req.credit_score = 333;
        req.insurance_duration = 29;
        req.health_score = 1;

        let row = encode(&req);
        assert_eq!(row[0], 64.0);
        assert_eq!(row[2], 123_456.0);
        assert_eq!(row[3], 333.0);
        assert_eq!(row[4], 29.0);
        assert_eq!(row[5], 1.0);
    }
}

#[cfg(test)]
mod categorical_mapping_tests {
    use super::*;

    #[test]
    fn test_gender_mapping() {
        let cases = [
            (Gender::Male, 0.0),
            (Gender::Female, 1.0),
            (Gender::Other, 2.0),
        ];
        for (gender, expected) in cases {
            let mut req = base_request();
            req.gender = gender;
            assert_eq!(encode(&req)[1], expected, "gender {:?}", gender);
        }
    }

    #[test]
    fn test_policy_type_mapping() {
        let cases = [
            (PolicyType::Type1, 0.0),
            (PolicyType::Type2, 1.0),
            (PolicyType::Type3, 2.0),
        ];
        for (policy, expected) in cases {
            let mut req = base_request();
            req.policy_type = policy;
            assert_eq!(encode(&req)[6], expected, "policy {:?}", policy);
        }
    }

    #[test]
    fn test_categorical_change_touches_only_its_column() {
        let mut req = base_request();
        let before = encode(&req);
        req.gender = Gender::Female;
        let after = encode(&req);

        assert_ne!(before[1], after[1]);
        for i in [0usize, 2, 3, 4, 5, 6] {
            assert_eq!(before[i], after[i]);
        }
    }
}
