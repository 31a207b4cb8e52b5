//! Shared application service layer for fermdose.
//!
//! Gives the CLI (and any other frontend) one place for scenario file
//! handling, profile resolution, evaluation and report rendering.

pub mod error;
pub mod report;
pub mod run_service;
pub mod scenario_service;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use report::{render_batch, render_evaluation, render_profiles, render_sweep};
pub use run_service::{
    BatchEntry, BatchReport, Evaluation, evaluate, evaluate_batch, evaluate_file_sweep,
    evaluate_sweep,
};
pub use scenario_service::{
    ScenarioIssue, ScenarioSummary, calculator_for, list_scenarios, load_scenarios,
    resolve_profile, validate_scenarios,
};
