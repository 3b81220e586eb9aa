//! Request validation against the field table

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{Domain, FieldSpec, MedicationFlag, OrderedMap, FIELDS};

/// A validated attribute value, in its canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Real(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Structured rejection listing every offending field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    /// Names of the offending fields
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// A complete, validated feature set in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: Vec<FeatureValue>,
}

impl FeatureRecord {
    /// Pairs of (field declaration, value) in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FeatureValue)> {
        FIELDS.iter().zip(self.values.iter())
    }

    /// Value by pipeline column name
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.iter().find(|(f, _)| f.column == column).map(|(_, v)| v)
    }

    /// The renamed mapping actually submitted to the model
    pub fn to_processed(&self) -> OrderedMap<FeatureValue> {
        self.iter().map(|(f, v)| (f.column, v.clone())).collect()
    }
}

fn check_field(spec: &FieldSpec, value: &Value) -> Result<FeatureValue, String> {
    match spec.domain {
        Domain::Choice(allowed) => {
            let text = value
                .as_str()
                .ok_or_else(|| format!("expected a string, got {}", type_name(value)))?;
            if allowed.contains(&text) {
                Ok(FeatureValue::Text(text.to_string()))
            } else {
                let options: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
                Err(format!("must be one of {}, got '{}'", options.join(", "), text))
            }
        }
        Domain::Integer { .. } => {
            let number = integer_value(value)?;
            spec.domain.check_range(number as f64)?;
            Ok(FeatureValue::Integer(number))
        }
        Domain::Real { .. } => {
            let number = value
                .as_f64()
                .filter(|_| value.is_number())
                .ok_or_else(|| format!("expected a number, got {}", type_name(value)))?;
            spec.domain.check_range(number)?;
            Ok(FeatureValue::Real(number))
        }
        Domain::Flag => {
            // integral floats count as integers here too
            let flag = match value {
                Value::Number(_) => MedicationFlag::Numeric(
                    integer_value(value).map_err(|_| format!("must be 'Yes', 'No', 1 or 0, got {}", value))?,
                ),
                _ => serde_json::from_value(value.clone())
                    .map_err(|_| format!("must be 'Yes', 'No', 1 or 0, got {}", value))?,
            };
            flag.to_numeric().map(FeatureValue::Integer)
        }
    }
}

fn integer_value(value: &Value) -> Result<i64, String> {
    let Value::Number(number) = value else {
        return Err(format!("expected an integer, got {}", type_name(value)));
    };
    if let Some(v) = number.as_i64() {
        return Ok(v);
    }
    match number.as_f64() {
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        Some(v) if v.fract() != 0.0 => Err(format!("expected an integer, got {}", v)),
        _ => Err("integer out of range".to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate a request body against every field declaration.
///
/// All fields are checked before returning, so the rejection lists every
/// violation at once. Unknown keys are ignored.
pub fn validate(body: &Value) -> Result<FeatureRecord, ValidationError> {
    let object = body
        .as_object()
        .ok_or_else(|| ValidationError::single("body", format!("expected a JSON object, got {}", type_name(body))))?;

    let mut values = Vec::with_capacity(FIELDS.len());
    let mut violations = Vec::new();

    for spec in FIELDS.iter() {
        match object.get(spec.name) {
            None => violations.push(Violation {
                field: spec.name.to_string(),
                message: "field required".to_string(),
            }),
            Some(value) => match check_field(spec, value) {
                Ok(v) => values.push(v),
                Err(message) => violations.push(Violation {
                    field: spec.name.to_string(),
                    message,
                }),
            },
        }
    }

    if violations.is_empty() {
        Ok(FeatureRecord { values })
    } else {
        Err(ValidationError { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PremiumRequest;
    use serde_json::json;

    fn sample() -> Value {
        PremiumRequest::sample().to_json()
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = sample();
        body[field] = value;
        body
    }

    #[test]
    fn test_valid_sample() {
        let record = validate(&sample()).unwrap();
        assert_eq!(record.get("age"), Some(&FeatureValue::Integer(30)));
        assert_eq!(record.get("gender"), Some(&FeatureValue::Text("Male".into())));
        assert_eq!(record.get("current_medications"), Some(&FeatureValue::Integer(0)));
        assert_eq!(record.to_processed().len(), 25);
    }

    #[test]
    fn test_bounds_rejected() {
        let err = validate(&with("Age", json!(0))).unwrap_err();
        assert_eq!(err.fields(), vec!["Age"]);

        let err = validate(&with("Policy_Tenure", json!(11))).unwrap_err();
        assert_eq!(err.fields(), vec!["Policy_Tenure"]);

        let err = validate(&with("Loyalty_Score", json!(1.5))).unwrap_err();
        assert!(err.to_string().contains("Loyalty_Score"));

        assert!(validate(&with("Age", json!(120))).is_err());
        assert!(validate(&with("Age", json!(119))).is_ok());
        assert!(validate(&with("Claim_History", json!(0))).is_ok());
        assert!(validate(&with("Claim_History", json!(-1))).is_err());
    }

    #[test]
    fn test_literal_sets() {
        let err = validate(&with("Gender", json!("male"))).unwrap_err();
        assert!(err.violations[0].message.contains("'Male'"));
        assert!(validate(&with("Food_Habit", json!("Mostly Restaurant"))).is_ok());
        assert!(validate(&with("Area_Type", json!(3))).is_err());
    }

    #[test]
    fn test_collects_all_violations() {
        let mut body = with("Age", json!(0));
        body["Policy_Tenure"] = json!(11);
        body.as_object_mut().unwrap().remove("BMI");
        let err = validate(&body).unwrap_err();
        assert_eq!(err.fields(), vec!["Age", "BMI", "Policy_Tenure"]);
        assert_eq!(err.violations[1].message, "field required");
    }

    #[test]
    fn test_medication_forms_normalize_identically() {
        let text = validate(&with("Current_Medications", json!("Yes"))).unwrap();
        let number = validate(&with("Current_Medications", json!(1))).unwrap();
        assert_eq!(text, number);
        assert_eq!(text.get("current_medications"), Some(&FeatureValue::Integer(1)));

        assert!(validate(&with("Current_Medications", json!(2))).is_err());
        assert!(validate(&with("Current_Medications", json!(0.5))).is_err());
        assert!(validate(&with("Current_Medications", json!("maybe"))).is_err());
        assert!(validate(&with("Current_Medications", json!(true))).is_err());
    }

    #[test]
    fn test_medication_accepts_integral_float() {
        let float = validate(&with("Current_Medications", json!(1.0))).unwrap();
        let text = validate(&with("Current_Medications", json!("Yes"))).unwrap();
        assert_eq!(float, text);
        let zero = validate(&with("Current_Medications", json!(0.0))).unwrap();
        assert_eq!(zero.get("current_medications"), Some(&FeatureValue::Integer(0)));
    }

    #[test]
    fn test_integer_fields() {
        assert!(validate(&with("Age", json!(30.0))).is_ok());
        assert!(validate(&with("Age", json!(30.5))).is_err());
        assert!(validate(&with("Age", json!("30"))).is_err());
    }

    #[test]
    fn test_non_object_body() {
        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.fields(), vec!["body"]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let record = validate(&with("Favourite_Colour", json!("blue"))).unwrap();
        assert!(record.get("favourite_colour").is_none());
    }
}
