//! Feature schema
//!
//! The single source of truth for the 25 input attributes: their name at
//! the HTTP boundary, the column name the fitted pipeline expects, and the
//! domain each value must fall in. The service validates against it, the
//! trainer uses the internal names, and the client builds its form from
//! the same literal sets.

mod ordered;
mod request;
mod validate;

pub use ordered::OrderedMap;
pub use request::{MedicationFlag, PremiumRequest};
pub use validate::{validate, FeatureRecord, FeatureValue, ValidationError, Violation};

/// Name of the target column after header normalization
pub const TARGET_COLUMN: &str = "premium_category";

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];
pub const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];
pub const OCCUPATIONS: &[&str] = &[
    "Private Job",
    "Farmer",
    "Freelancer",
    "Teacher",
    "Student",
    "Doctor",
    "Unemployed",
    "Construction Worker",
];
pub const EDUCATION_LEVELS: &[&str] = &["None", "Primary", "SSC", "HSC", "Bachelor", "Master", "PhD"];
pub const AREA_TYPES: &[&str] = &["Urban", "Rural", "Semi-urban"];
pub const SMOKING_STATUSES: &[&str] = &["Never", "Former", "Current"];
pub const ALCOHOL_LEVELS: &[&str] = &["Never", "Occasional", "Regular"];
pub const YES_NO: &[&str] = &["Yes", "No"];
pub const CONDITIONS: &[&str] = &["None", "Asthma", "Diabetes", "Hypertension", "Heart Disease"];
pub const LOW_MODERATE_HIGH: &[&str] = &["Low", "Moderate", "High"];
pub const FOOD_HABITS: &[&str] = &["Home-cooked", "Mostly Restaurant", "Mixed"];
pub const INSURANCE_TYPES: &[&str] = &["Comprehensive", "Basic", "Family", "Critical Illness"];

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// No limit on this side
    Unbounded,
    /// Value must be strictly beyond the limit
    Exclusive(f64),
    /// Value may equal the limit
    Inclusive(f64),
}

impl Bound {
    fn admits_lower(&self, value: f64) -> bool {
        match *self {
            Bound::Unbounded => true,
            Bound::Exclusive(limit) => value > limit,
            Bound::Inclusive(limit) => value >= limit,
        }
    }

    fn admits_upper(&self, value: f64) -> bool {
        match *self {
            Bound::Unbounded => true,
            Bound::Exclusive(limit) => value < limit,
            Bound::Inclusive(limit) => value <= limit,
        }
    }

    fn lower_message(&self) -> String {
        match *self {
            Bound::Unbounded => String::new(),
            Bound::Exclusive(limit) => format!("must be greater than {}", limit),
            Bound::Inclusive(limit) => format!("must be greater than or equal to {}", limit),
        }
    }

    fn upper_message(&self) -> String {
        match *self {
            Bound::Unbounded => String::new(),
            Bound::Exclusive(limit) => format!("must be less than {}", limit),
            Bound::Inclusive(limit) => format!("must be less than or equal to {}", limit),
        }
    }
}

/// Value domain of a single attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// One of a fixed set of literals
    Choice(&'static [&'static str]),
    /// Whole number within bounds
    Integer { min: Bound, max: Bound },
    /// Real number within bounds
    Real { min: Bound, max: Bound },
    /// "Yes"/"No" or 1/0, normalized to 1/0
    Flag,
}

impl Domain {
    /// Check a number against the bounds of a numeric domain.
    pub fn check_range(&self, value: f64) -> Result<(), String> {
        let (min, max) = match self {
            Domain::Integer { min, max } | Domain::Real { min, max } => (min, max),
            _ => return Ok(()),
        };
        if !min.admits_lower(value) {
            return Err(min.lower_message());
        }
        if !max.admits_upper(value) {
            return Err(max.upper_message());
        }
        Ok(())
    }

    /// Whether the fitted pipeline sees this attribute as a numeric column
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Domain::Choice(_))
    }
}

/// Declaration of one attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Name at the HTTP boundary
    pub name: &'static str,
    /// Column name inside the pipeline
    pub column: &'static str,
    pub domain: Domain,
}

const fn field(name: &'static str, column: &'static str, domain: Domain) -> FieldSpec {
    FieldSpec { name, column, domain }
}

const POSITIVE: Bound = Bound::Exclusive(0.0);
const NON_NEGATIVE: Bound = Bound::Inclusive(0.0);
const OPEN: Bound = Bound::Unbounded;

/// All attributes, in the order they are submitted to the pipeline
pub const FIELDS: [FieldSpec; 25] = [
    field("Age", "age", Domain::Integer { min: POSITIVE, max: Bound::Exclusive(120.0) }),
    field("Gender", "gender", Domain::Choice(GENDERS)),
    field("Marital_Status", "marital_status", Domain::Choice(MARITAL_STATUSES)),
    field("Occupation", "occupation", Domain::Choice(OCCUPATIONS)),
    field("Education", "education", Domain::Choice(EDUCATION_LEVELS)),
    field("Monthly_Income", "monthly_income", Domain::Real { min: POSITIVE, max: OPEN }),
    field("Area_Type", "area_type", Domain::Choice(AREA_TYPES)),
    field("BMI", "bmi", Domain::Real { min: POSITIVE, max: OPEN }),
    field("Smoking_Status", "smoking_status", Domain::Choice(SMOKING_STATUSES)),
    field("Alcohol_Consumption", "alcohol_consumption", Domain::Choice(ALCOHOL_LEVELS)),
    field("Physical_Activity_hr_wk", "physical_activity_hr_wk", Domain::Real { min: POSITIVE, max: OPEN }),
    field("Sleep_hr_day", "sleep_hr_day", Domain::Real { min: POSITIVE, max: OPEN }),
    field("Family_History", "family_history", Domain::Choice(YES_NO)),
    field("Preexisting_Condition", "preexisting_condition", Domain::Choice(CONDITIONS)),
    field("Doctor_Visits_Last_Year", "doctor_visits_last_year", Domain::Integer { min: POSITIVE, max: OPEN }),
    field("Current_Medications", "current_medications", Domain::Flag),
    field("Stress_Level", "stress_level", Domain::Choice(LOW_MODERATE_HIGH)),
    field("Pollution_Exposure", "pollution_exposure", Domain::Choice(LOW_MODERATE_HIGH)),
    field("Food_Habit", "food_habit", Domain::Choice(FOOD_HABITS)),
    field("Claim_History", "claim_history", Domain::Integer { min: NON_NEGATIVE, max: OPEN }),
    field("Claim_Amount_Last_Year", "claim_amount_last_year", Domain::Real { min: NON_NEGATIVE, max: OPEN }),
    field("Insurance_Type", "insurance_type", Domain::Choice(INSURANCE_TYPES)),
    field("Policy_Tenure", "policy_tenure", Domain::Integer { min: POSITIVE, max: Bound::Inclusive(10.0) }),
    field("Premium_Paid_Last_Year", "premium_paid_last_year", Domain::Real { min: NON_NEGATIVE, max: OPEN }),
    field("Loyalty_Score", "loyalty_score", Domain::Real { min: POSITIVE, max: Bound::Inclusive(1.0) }),
];

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn is_lowercase_of(column: &str, name: &str) -> bool {
    let (c, n) = (column.as_bytes(), name.as_bytes());
    if c.len() != n.len() {
        return false;
    }
    let mut i = 0;
    while i < c.len() {
        if c[i] != n[i].to_ascii_lowercase() {
            return false;
        }
        i += 1;
    }
    true
}

const fn mapping_is_consistent(fields: &[FieldSpec]) -> bool {
    let mut i = 0;
    while i < fields.len() {
        if !is_lowercase_of(fields[i].column, fields[i].name) {
            return false;
        }
        let mut j = i + 1;
        while j < fields.len() {
            if str_eq(fields[i].name, fields[j].name) || str_eq(fields[i].column, fields[j].column) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

// Every external name maps to exactly one internal column, and vice versa.
const _: () = assert!(
    mapping_is_consistent(&FIELDS),
    "FIELDS must map each external name to a distinct lower-case column"
);

/// Look up an attribute by its external name
pub fn field_by_name(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Look up an attribute by its pipeline column name
pub fn field_by_column(column: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.column == column)
}
