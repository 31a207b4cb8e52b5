use thiserror::Error;

pub type FdResult<T> = Result<T, FdError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FdError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value out of range for {what}: {value} (expected {min}..={max})")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
