//! Shared fixtures: a generated insurance dataset with a rule-based label

#![allow(dead_code)]

use polars::prelude::*;
use premium_predictor::inference::PremiumPipeline;
use premium_predictor::schema::{
    ALCOHOL_LEVELS, AREA_TYPES, CONDITIONS, EDUCATION_LEVELS, FOOD_HABITS, GENDERS, INSURANCE_TYPES,
    LOW_MODERATE_HIGH, MARITAL_STATUSES, OCCUPATIONS, SMOKING_STATUSES, YES_NO,
};
use premium_predictor::training::{TrainEngine, TrainingConfig};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

fn pick<'a>(rng: &mut ChaCha8Rng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `n` rows with the raw CSV header names. The label grows with age,
/// smoking, BMI, preexisting conditions and claim history.
pub fn synthetic_frame(n: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut age = Vec::with_capacity(n);
    let mut gender = Vec::with_capacity(n);
    let mut marital = Vec::with_capacity(n);
    let mut occupation = Vec::with_capacity(n);
    let mut education = Vec::with_capacity(n);
    let mut income = Vec::with_capacity(n);
    let mut area = Vec::with_capacity(n);
    let mut bmi = Vec::with_capacity(n);
    let mut smoking = Vec::with_capacity(n);
    let mut alcohol = Vec::with_capacity(n);
    let mut activity = Vec::with_capacity(n);
    let mut sleep = Vec::with_capacity(n);
    let mut family = Vec::with_capacity(n);
    let mut condition = Vec::with_capacity(n);
    let mut visits = Vec::with_capacity(n);
    let mut medications = Vec::with_capacity(n);
    let mut stress = Vec::with_capacity(n);
    let mut pollution = Vec::with_capacity(n);
    let mut food = Vec::with_capacity(n);
    let mut claims = Vec::with_capacity(n);
    let mut claim_amount = Vec::with_capacity(n);
    let mut insurance = Vec::with_capacity(n);
    let mut tenure = Vec::with_capacity(n);
    let mut premium_paid = Vec::with_capacity(n);
    let mut loyalty = Vec::with_capacity(n);
    let mut label = Vec::with_capacity(n);

    for _ in 0..n {
        let a: i64 = rng.gen_range(18..80);
        let smoke = pick(&mut rng, SMOKING_STATUSES);
        let b = round2(rng.gen_range(17.0..40.0));
        let cond = pick(&mut rng, CONDITIONS);
        let c: i64 = rng.gen_range(0..4);

        let mut score = (a as f64 - 18.0) / 15.0;
        if smoke == "Current" {
            score += 2.0;
        }
        if b > 30.0 {
            score += 1.0;
        }
        if cond != "None" {
            score += 1.5;
        }
        score += c as f64 * 0.5;
        let category = if score < 2.0 {
            "Low"
        } else if score < 4.0 {
            "Medium"
        } else {
            "High"
        };

        age.push(a);
        gender.push(pick(&mut rng, GENDERS));
        marital.push(pick(&mut rng, MARITAL_STATUSES));
        occupation.push(pick(&mut rng, OCCUPATIONS));
        education.push(pick(&mut rng, EDUCATION_LEVELS));
        income.push(round2(rng.gen_range(5_000.0..150_000.0)));
        area.push(pick(&mut rng, AREA_TYPES));
        bmi.push(b);
        smoking.push(smoke);
        alcohol.push(pick(&mut rng, ALCOHOL_LEVELS));
        activity.push(round2(rng.gen_range(0.5..12.0)));
        sleep.push(round2(rng.gen_range(4.0..10.0)));
        family.push(pick(&mut rng, YES_NO));
        condition.push(cond);
        visits.push(rng.gen_range(1..12i64));
        medications.push(pick(&mut rng, YES_NO));
        stress.push(pick(&mut rng, LOW_MODERATE_HIGH));
        pollution.push(pick(&mut rng, LOW_MODERATE_HIGH));
        food.push(pick(&mut rng, FOOD_HABITS));
        claims.push(c);
        claim_amount.push(if c == 0 { 0.0 } else { round2(rng.gen_range(500.0..20_000.0)) });
        insurance.push(pick(&mut rng, INSURANCE_TYPES));
        tenure.push(rng.gen_range(1..11i64));
        premium_paid.push(round2(rng.gen_range(1_000.0..30_000.0)));
        loyalty.push(round2(rng.gen_range(0.05..1.0)));
        label.push(category);
    }

    df! {
        "Age" => age,
        "Gender" => gender,
        "Marital_Status" => marital,
        "Occupation" => occupation,
        "Education" => education,
        "Monthly_Income" => income,
        "Area_Type" => area,
        "BMI" => bmi,
        "Smoking_Status" => smoking,
        "Alcohol_Consumption" => alcohol,
        "Physical_Activity_hr_wk" => activity,
        "Sleep_hr_day" => sleep,
        "Family_History" => family,
        "Preexisting_Condition" => condition,
        "Doctor_Visits_Last_Year" => visits,
        "Current_Medications" => medications,
        "Stress_Level" => stress,
        "Pollution_Exposure" => pollution,
        "Food_Habit" => food,
        "Claim_History" => claims,
        "Claim_Amount_Last_Year" => claim_amount,
        "Insurance_Type" => insurance,
        "Policy_Tenure" => tenure,
        "Premium_Paid_Last_Year" => premium_paid,
        "Loyalty_Score" => loyalty,
        "Premium Category" => label,
    }
    .expect("synthetic frame")
}

pub fn write_csv(df: &DataFrame, path: &Path) {
    let mut file = std::fs::File::create(path).expect("create csv");
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df.clone())
        .expect("write csv");
}

/// Small forest settings so the suite stays fast
pub fn small_config() -> TrainingConfig {
    TrainingConfig::default()
        .with_n_estimators(25)
        .with_max_depth(Some(8))
}

/// Fit a pipeline on a generated dataset, going through CSV like the CLI does
pub fn fit_pipeline(rows: usize, seed: u64) -> PremiumPipeline {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("insurance.csv");
    write_csv(&synthetic_frame(rows, seed), &path);

    let df = TrainEngine::load_csv(&path).expect("load csv");
    let (pipeline, _) = TrainEngine::new(small_config()).fit(&df).expect("fit");
    pipeline
}
