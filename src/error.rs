use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancingPlanError {
    #[error("Invalid amount {amount} for {group} category '{category}' in year {year}: must be a finite, non-negative number")]
    InvalidAmount {
        group: String,
        category: String,
        year: u32,
        amount: f64,
    },

    #[error("Invalid horizon {0}: must be between 1 and 5 years")]
    InvalidHorizon(u32),

    #[error("Year {year} is outside the plan horizon 1..={horizon}")]
    YearOutOfRange { year: u32, horizon: u32 },

    #[error("Comparison requires at least 2 plans, got {0}")]
    InsufficientPlans(usize),

    #[error("Import row '{label}' matched no category")]
    UnclassifiedRow { label: String },

    #[error("Import parse failure: {0}")]
    ImportParseFailure(String),

    #[error("A plan named '{0}' already exists")]
    DuplicatePlanName(String),

    #[error("No plan named '{0}'")]
    PlanNotFound(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FinancingPlanError>;
