use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, LoanError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    /// The term yields no payments, or more than a `u32` can count.
    #[error("invalid term: {years} years and {months} months")]
    InvalidTerm { years: u32, months: u32 },

    /// Non-positive principal or negative rate.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("payment date after {0} is out of range")]
    DateOutOfRange(NaiveDate),
}
