//! Input-layer errors.
//!
//! The calculator never fails; everything here is raised while turning a
//! raw [`InputForm`](crate::InputForm) into validated inputs, or while
//! checking a profile.

use fd_core::FdError;
use thiserror::Error;

/// Result type for input resolution.
pub type InputResult<T> = Result<T, InputError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A scalar field is non-finite or outside its declared range.
    #[error("Invalid input: {0}")]
    Field(#[from] FdError),

    #[error("Target TRS must be positive, got {value}")]
    NonPositiveTarget { value: f64 },

    #[error("Batch volume is required by profile '{profile}'")]
    MissingVolume { profile: String },

    #[error("Batch volume must be positive, got {value} L")]
    NonPositiveVolume { value: f64 },

    #[error("Profile '{profile}' uses a fixed fermentor volume of {fixed} L, got {supplied} L")]
    FixedVolumeConflict {
        profile: String,
        supplied: f64,
        fixed: f64,
    },

    #[error("Invalid profile '{profile}': {what}")]
    InvalidProfile { profile: String, what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = InputError::from(FdError::OutOfRange {
            what: "pH",
            value: 8.4,
            min: 7.0,
            max: 8.0,
        });
        assert!(err.to_string().contains("pH"));

        let err = InputError::MissingVolume {
            profile: "literature".into(),
        };
        assert!(err.to_string().contains("literature"));
    }
}
