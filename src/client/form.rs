//! Prompts collecting one prediction request

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::schema::{
    MedicationFlag, PremiumRequest, ALCOHOL_LEVELS, AREA_TYPES, CONDITIONS, EDUCATION_LEVELS,
    FOOD_HABITS, GENDERS, INSURANCE_TYPES, LOW_MODERATE_HIGH, MARITAL_STATUSES, OCCUPATIONS,
    SMOKING_STATUSES, YES_NO,
};

/// Whole-number prompt limits, inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntRange {
    pub min: i64,
    pub max: Option<i64>,
}

impl IntRange {
    pub fn check(&self, value: i64) -> Result<(), String> {
        if value < self.min {
            return Err(format!("must be at least {}", self.min));
        }
        match self.max {
            Some(max) if value > max => Err(format!("must be at most {}", max)),
            _ => Ok(()),
        }
    }
}

/// Real-number prompt limits. The lower limit may be exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealRange {
    pub min: f64,
    pub min_exclusive: bool,
    pub max: Option<f64>,
}

impl RealRange {
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("must be a number".to_string());
        }
        if self.min_exclusive && value <= self.min {
            return Err(format!("must be greater than {}", self.min));
        }
        if !self.min_exclusive && value < self.min {
            return Err(format!("must be at least {}", self.min));
        }
        match self.max {
            Some(max) if value > max => Err(format!("must be at most {}", max)),
            _ => Ok(()),
        }
    }
}

const fn ints(min: i64, max: Option<i64>) -> IntRange {
    IntRange { min, max }
}

const fn at_least(min: f64, max: Option<f64>) -> RealRange {
    RealRange { min, min_exclusive: false, max }
}

const fn above(min: f64, max: Option<f64>) -> RealRange {
    RealRange { min, min_exclusive: true, max }
}

pub const AGE: IntRange = ints(1, Some(119));
pub const DOCTOR_VISITS: IntRange = ints(1, Some(50));
pub const CLAIM_HISTORY: IntRange = ints(0, Some(20));
pub const POLICY_TENURE: IntRange = ints(1, Some(10));

pub const MONTHLY_INCOME: RealRange = at_least(1.0, None);
pub const BMI: RealRange = at_least(10.0, Some(50.0));
pub const PHYSICAL_ACTIVITY: RealRange = above(0.0, None);
pub const SLEEP: RealRange = at_least(1.0, Some(24.0));
pub const CLAIM_AMOUNT: RealRange = at_least(0.0, None);
pub const PREMIUM_PAID: RealRange = at_least(0.0, None);
pub const LOYALTY: RealRange = above(0.0, Some(1.0));

fn choose(theme: &ColorfulTheme, prompt: &str, options: &[&str], current: &str) -> anyhow::Result<String> {
    let default = options.iter().position(|o| *o == current).unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(options)
        .default(default)
        .interact()?;
    Ok(options[index].to_string())
}

fn integer(theme: &ColorfulTheme, prompt: &str, range: IntRange, current: i64) -> anyhow::Result<i64> {
    Ok(Input::<i64>::with_theme(theme)
        .with_prompt(prompt)
        .default(current)
        .validate_with(move |v: &i64| range.check(*v))
        .interact_text()?)
}

fn real(theme: &ColorfulTheme, prompt: &str, range: RealRange, current: f64) -> anyhow::Result<f64> {
    Ok(Input::<f64>::with_theme(theme)
        .with_prompt(prompt)
        .default(current)
        .validate_with(move |v: &f64| range.check(*v))
        .interact_text()?)
}

/// Ask for every field, offering the previous request's values as defaults
pub fn collect_request(theme: &ColorfulTheme, previous: &PremiumRequest) -> anyhow::Result<PremiumRequest> {
    let p = previous;
    let medication_default = if p.current_medications.to_numeric() == Ok(1) { "Yes" } else { "No" };

    println!();
    println!("  Personal");
    let age = integer(theme, "Age", AGE, p.age)?;
    let gender = choose(theme, "Gender", GENDERS, &p.gender)?;
    let marital_status = choose(theme, "Marital status", MARITAL_STATUSES, &p.marital_status)?;
    let occupation = choose(theme, "Occupation", OCCUPATIONS, &p.occupation)?;
    let education = choose(theme, "Education", EDUCATION_LEVELS, &p.education)?;
    let monthly_income = real(theme, "Monthly income", MONTHLY_INCOME, p.monthly_income)?;
    let area_type = choose(theme, "Area type", AREA_TYPES, &p.area_type)?;

    println!();
    println!("  Health & lifestyle");
    let bmi = real(theme, "BMI", BMI, p.bmi)?;
    let smoking_status = choose(theme, "Smoking status", SMOKING_STATUSES, &p.smoking_status)?;
    let alcohol_consumption = choose(theme, "Alcohol consumption", ALCOHOL_LEVELS, &p.alcohol_consumption)?;
    let physical_activity_hr_wk =
        real(theme, "Physical activity (hours/week)", PHYSICAL_ACTIVITY, p.physical_activity_hr_wk)?;
    let sleep_hr_day = real(theme, "Sleep (hours/day)", SLEEP, p.sleep_hr_day)?;
    let family_history = choose(theme, "Family history of illness", YES_NO, &p.family_history)?;
    let preexisting_condition = choose(theme, "Preexisting condition", CONDITIONS, &p.preexisting_condition)?;
    let doctor_visits_last_year =
        integer(theme, "Doctor visits last year", DOCTOR_VISITS, p.doctor_visits_last_year)?;
    let current_medications = match choose(theme, "Current medications", YES_NO, medication_default)?.as_str() {
        "Yes" => MedicationFlag::yes(),
        _ => MedicationFlag::no(),
    };
    let stress_level = choose(theme, "Stress level", LOW_MODERATE_HIGH, &p.stress_level)?;
    let pollution_exposure = choose(theme, "Pollution exposure", LOW_MODERATE_HIGH, &p.pollution_exposure)?;
    let food_habit = choose(theme, "Food habit", FOOD_HABITS, &p.food_habit)?;

    println!();
    println!("  Policy");
    let claim_history = integer(theme, "Claims filed", CLAIM_HISTORY, p.claim_history)?;
    let claim_amount_last_year = real(theme, "Claim amount last year", CLAIM_AMOUNT, p.claim_amount_last_year)?;
    let insurance_type = choose(theme, "Insurance type", INSURANCE_TYPES, &p.insurance_type)?;
    let policy_tenure = integer(theme, "Policy tenure (years)", POLICY_TENURE, p.policy_tenure)?;
    let premium_paid_last_year = real(theme, "Premium paid last year", PREMIUM_PAID, p.premium_paid_last_year)?;
    let loyalty_score = real(theme, "Loyalty score (0-1]", LOYALTY, p.loyalty_score)?;

    Ok(PremiumRequest {
        age,
        gender,
        marital_status,
        occupation,
        education,
        monthly_income,
        area_type,
        bmi,
        smoking_status,
        alcohol_consumption,
        physical_activity_hr_wk,
        sleep_hr_day,
        family_history,
        preexisting_condition,
        doctor_visits_last_year,
        current_medications,
        stress_level,
        pollution_exposure,
        food_habit,
        claim_history,
        claim_amount_last_year,
        insurance_type,
        policy_tenure,
        premium_paid_last_year,
        loyalty_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field_by_name;

    #[test]
    fn test_int_range() {
        assert!(AGE.check(0).is_err());
        assert!(AGE.check(1).is_ok());
        assert!(AGE.check(119).is_ok());
        assert!(AGE.check(120).is_err());
        assert!(CLAIM_HISTORY.check(0).is_ok());
    }

    #[test]
    fn test_real_range() {
        assert!(LOYALTY.check(0.0).is_err());
        assert!(LOYALTY.check(1.0).is_ok());
        assert!(PHYSICAL_ACTIVITY.check(0.0).is_err());
        assert!(BMI.check(9.9).is_err());
        assert!(BMI.check(f64::NAN).is_err());
        assert!(CLAIM_AMOUNT.check(0.0).is_ok());
    }

    /// Every value the prompts allow must also pass service validation.
    #[test]
    fn test_prompt_limits_within_service_domain() {
        let ints = [
            ("Age", AGE),
            ("Doctor_Visits_Last_Year", DOCTOR_VISITS),
            ("Claim_History", CLAIM_HISTORY),
            ("Policy_Tenure", POLICY_TENURE),
        ];
        for (name, range) in ints {
            let domain = field_by_name(name).unwrap().domain;
            assert!(domain.check_range(range.min as f64).is_ok(), "{} min", name);
            if let Some(max) = range.max {
                assert!(domain.check_range(max as f64).is_ok(), "{} max", name);
            }
        }

        let reals = [
            ("Monthly_Income", MONTHLY_INCOME),
            ("BMI", BMI),
            ("Physical_Activity_hr_wk", PHYSICAL_ACTIVITY),
            ("Sleep_hr_day", SLEEP),
            ("Claim_Amount_Last_Year", CLAIM_AMOUNT),
            ("Premium_Paid_Last_Year", PREMIUM_PAID),
            ("Loyalty_Score", LOYALTY),
        ];
        for (name, range) in reals {
            let domain = field_by_name(name).unwrap().domain;
            let lowest = if range.min_exclusive { range.min + 1e-6 } else { range.min };
            assert!(domain.check_range(lowest).is_ok(), "{} min", name);
            if let Some(max) = range.max {
                assert!(domain.check_range(max).is_ok(), "{} max", name);
            }
        }
    }
}
