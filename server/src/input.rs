//! Request body coercion into a [`FeatureVector`].
//!
//! Every field is checked for presence before any value is converted, so a
//! body missing `age` with a bad `glucose` reports the missing field.

use diabetes_data::{FEATURE_COUNT, Feature, FeatureVector};
use serde_json::{Map, Value};

use crate::error::ServiceError;

/// Parse the JSON prediction body.
///
/// # Errors
///
/// - [`ServiceError::InvalidBody`] if `body` is not an object
/// - [`ServiceError::MissingField`] for the first absent field in schema order
/// - [`ServiceError::InvalidInput`] for the first value that is not a finite
///   number or a string holding one
pub fn parse_features(body: &Value) -> Result<FeatureVector, ServiceError> {
    let object = body.as_object().ok_or_else(|| {
        ServiceError::InvalidBody(format!("expected a JSON object, got {}", kind(body)))
    })?;

    if let Some(missing) = Feature::ALL
        .iter()
        .find(|feature| !object.contains_key(feature.wire_name()))
    {
        return Err(ServiceError::MissingField(missing.wire_name()));
    }

    let mut values = [0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        values[feature.index()] = coerce(object, feature)?;
    }
    Ok(FeatureVector::new(values))
}

fn coerce(object: &Map<String, Value>, feature: Feature) -> Result<f64, ServiceError> {
    let field = feature.wire_name();
    let raw = object.get(field).ok_or(ServiceError::MissingField(field))?;

    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ServiceError::InvalidInput {
            field,
            value: display_raw(raw),
        })
}

/// Strings are shown without their JSON quotes.
fn display_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "pregnancies": 6,
            "glucose": 148,
            "bloodPressure": 72,
            "skinThickness": 35,
            "insulin": 0,
            "bmi": 33.6,
            "diabetesPedigreeFunction": 0.627,
            "age": 50
        })
    }

    #[test]
    fn test_parses_in_schema_order() {
        let features = parse_features(&body()).unwrap();
        assert_eq!(
            features.as_array(),
            &[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]
        );
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let mut body = body();
        body["glucose"] = json!(" 148.5 ");
        body["age"] = json!("50");
        let features = parse_features(&body).unwrap();
        assert_eq!(features.get(Feature::Glucose), 148.5);
        assert_eq!(features.get(Feature::Age), 50.0);
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for feature in Feature::ALL {
            let mut body = body();
            body.as_object_mut().unwrap().remove(feature.wire_name());
            match parse_features(&body) {
                Err(ServiceError::MissingField(name)) => assert_eq!(name, feature.wire_name()),
                other => panic!("expected MissingField for {feature}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_reported_before_invalid() {
        let mut body = body();
        body["glucose"] = json!("abc");
        body.as_object_mut().unwrap().remove("age");
        assert!(matches!(
            parse_features(&body),
            Err(ServiceError::MissingField("age"))
        ));
    }

    #[test]
    fn test_non_numeric_string_is_invalid() {
        let mut body = body();
        body["glucose"] = json!("abc");
        match parse_features(&body) {
            Err(ServiceError::InvalidInput { field, value }) => {
                assert_eq!(field, "glucose");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_other_json_types_are_invalid() {
        let rejected = [
            json!(null),
            json!(true),
            json!({"v": 1}),
            json!([1]),
            json!("NaN"),
            json!("inf"),
        ];
        for bad in rejected {
            let mut body = body();
            body["bmi"] = bad.clone();
            assert!(
                matches!(
                    parse_features(&body),
                    Err(ServiceError::InvalidInput { field: "bmi", .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_object_body() {
        let err = parse_features(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidBody(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut body = body();
        body["name"] = json!("patient-7");
        assert!(parse_features(&body).is_ok());
    }
}
