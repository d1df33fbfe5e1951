// ⚠️ Error Types
// Only malformed top-level input and upstream failures are errors.
// Missing or unparseable cost items are not: they price at zero.

use thiserror::Error;

/// Errors raised while validating budget inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BudgetError {
    #[error("Invalid salary: {0}. Salary must be a positive number")]
    InvalidSalary(String),
}

/// Errors raised while fetching a city's cost page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Upstream returned HTTP {status} for {city}")]
    Status { city: String, status: u16 },

    #[error("Upstream request failed for {city}: {source}")]
    Http {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("No cost data found for {0}")]
    NoData(String),
}

impl FetchError {
    /// True when upstream says the city does not exist (or blocks us with a 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. } | FetchError::NoData(_))
    }
}

/// Errors surfaced by the city service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("City name is empty")]
    EmptyCity,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Budget(#[from] BudgetError),
}
