//! Typed prediction request, as sent by the client

use serde::{Deserialize, Serialize};

/// Medication flag accepted either as text or as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicationFlag {
    Numeric(i64),
    Text(String),
}

impl MedicationFlag {
    pub fn yes() -> Self {
        MedicationFlag::Text("Yes".to_string())
    }

    pub fn no() -> Self {
        MedicationFlag::Text("No".to_string())
    }

    /// Canonical 1/0 form. Only the literals "Yes", "No", 1 and 0 are accepted.
    pub fn to_numeric(&self) -> Result<i64, String> {
        match self {
            MedicationFlag::Numeric(v @ (0 | 1)) => Ok(*v),
            MedicationFlag::Numeric(v) => Err(format!("must be 'Yes', 'No', 1 or 0, got {}", v)),
            MedicationFlag::Text(s) if s == "Yes" || s == "No" => {
                Ok(if s.eq_ignore_ascii_case("yes") { 1 } else { 0 })
            }
            MedicationFlag::Text(s) => Err(format!("must be 'Yes', 'No', 1 or 0, got '{}'", s)),
        }
    }
}

/// Full request body of the predict endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumRequest {
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Marital_Status")]
    pub marital_status: String,
    #[serde(rename = "Occupation")]
    pub occupation: String,
    #[serde(rename = "Education")]
    pub education: String,
    #[serde(rename = "Monthly_Income")]
    pub monthly_income: f64,
    #[serde(rename = "Area_Type")]
    pub area_type: String,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Smoking_Status")]
    pub smoking_status: String,
    #[serde(rename = "Alcohol_Consumption")]
    pub alcohol_consumption: String,
    #[serde(rename = "Physical_Activity_hr_wk")]
    pub physical_activity_hr_wk: f64,
    #[serde(rename = "Sleep_hr_day")]
    pub sleep_hr_day: f64,
    #[serde(rename = "Family_History")]
    pub family_history: String,
    #[serde(rename = "Preexisting_Condition")]
    pub preexisting_condition: String,
    #[serde(rename = "Doctor_Visits_Last_Year")]
    pub doctor_visits_last_year: i64,
    #[serde(rename = "Current_Medications")]
    pub current_medications: MedicationFlag,
    #[serde(rename = "Stress_Level")]
    pub stress_level: String,
    #[serde(rename = "Pollution_Exposure")]
    pub pollution_exposure: String,
    #[serde(rename = "Food_Habit")]
    pub food_habit: String,
    #[serde(rename = "Claim_History")]
    pub claim_history: i64,
    #[serde(rename = "Claim_Amount_Last_Year")]
    pub claim_amount_last_year: f64,
    #[serde(rename = "Insurance_Type")]
    pub insurance_type: String,
    #[serde(rename = "Policy_Tenure")]
    pub policy_tenure: i64,
    #[serde(rename = "Premium_Paid_Last_Year")]
    pub premium_paid_last_year: f64,
    #[serde(rename = "Loyalty_Score")]
    pub loyalty_score: f64,
}

impl PremiumRequest {
    /// Reference input: a 30 year old non-smoker with no claims.
    pub fn sample() -> Self {
        Self {
            age: 30,
            gender: "Male".into(),
            marital_status: "Single".into(),
            occupation: "Private Job".into(),
            education: "Bachelor".into(),
            monthly_income: 50_000.0,
            area_type: "Urban".into(),
            bmi: 25.0,
            smoking_status: "Never".into(),
            alcohol_consumption: "Never".into(),
            physical_activity_hr_wk: 5.0,
            sleep_hr_day: 7.0,
            family_history: "No".into(),
            preexisting_condition: "None".into(),
            doctor_visits_last_year: 2,
            current_medications: MedicationFlag::no(),
            stress_level: "Low".into(),
            pollution_exposure: "Low".into(),
            food_habit: "Home-cooked".into(),
            claim_history: 0,
            claim_amount_last_year: 0.0,
            insurance_type: "Basic".into(),
            policy_tenure: 5,
            premium_paid_last_year: 0.0,
            loyalty_score: 0.5,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
