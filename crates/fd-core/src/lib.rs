//! fd-core: stable foundation for fermdose.
//!
//! Contains:
//! - units (uom SI types + constructors in process units)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FdError, FdResult};
pub use numeric::*;
pub use units::*;
