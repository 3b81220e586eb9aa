//! Local risk-factor hints derived from the raw input

use std::fmt;

use crate::schema::PremiumRequest;

const HIGH_BMI: f64 = 30.0;
const LOW_ACTIVITY_HR_WK: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskFactor {
    Smoking,
    RegularAlcohol,
    HighStress,
    HighPollution,
    Condition(String),
    HighBmi,
    LowActivity,
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::Smoking => write!(f, "Current smoker"),
            RiskFactor::RegularAlcohol => write!(f, "Regular alcohol consumption"),
            RiskFactor::HighStress => write!(f, "High stress level"),
            RiskFactor::HighPollution => write!(f, "High pollution exposure"),
            RiskFactor::Condition(name) => write!(f, "Preexisting condition: {}", name),
            RiskFactor::HighBmi => write!(f, "BMI above {}", HIGH_BMI),
            RiskFactor::LowActivity => {
                write!(f, "Less than {} hours of physical activity per week", LOW_ACTIVITY_HR_WK)
            }
        }
    }
}

/// Risk factors present in a request, in a fixed order
pub fn assess(request: &PremiumRequest) -> Vec<RiskFactor> {
    let mut risks = Vec::new();
    if request.smoking_status == "Current" {
        risks.push(RiskFactor::Smoking);
    }
    if request.alcohol_consumption == "Regular" {
        risks.push(RiskFactor::RegularAlcohol);
    }
    if request.stress_level == "High" {
        risks.push(RiskFactor::HighStress);
    }
    if request.pollution_exposure == "High" {
        risks.push(RiskFactor::HighPollution);
    }
    if request.preexisting_condition != "None" {
        risks.push(RiskFactor::Condition(request.preexisting_condition.clone()));
    }
    if request.bmi > HIGH_BMI {
        risks.push(RiskFactor::HighBmi);
    }
    if request.physical_activity_hr_wk < LOW_ACTIVITY_HR_WK {
        risks.push(RiskFactor::LowActivity);
    }
    risks
}
