//! fd-dosing: molasses dilution and nutrient dosing.
//!
//! Contains:
//! - grade (molasses grades + per-grade multipliers)
//! - profile (operating profiles and injected constants)
//! - inputs (raw input form, range checks, validated inputs)
//! - calculator (the pure `compute` transform and its result record)
//! - advisory (operator-facing notices derived from a result)
//! - sweeps (parametric evaluation over one input)

pub mod advisory;
pub mod calculator;
pub mod error;
pub mod grade;
pub mod inputs;
pub mod profile;
pub mod sweeps;

pub use advisory::{Advisory, Severity, assess};
pub use calculator::{DosingCalculator, NitrogenSalt, ProcessResult, RiskLevel, YeastUnit};
pub use error::{InputError, InputResult};
pub use grade::{GradeFactors, GradeTable, MolassesGrade};
pub use inputs::{InputForm, ProcessInputs, Trs};
pub use profile::{
    DosingConstants, InputLimits, NitrogenFractions, OperatingProfile, Range, TrsConvention,
    TrsUnit, VolumeSource, YeastDosing,
};
pub use sweeps::{SweepDefinition, SweepError, SweepParameter, SweepPoint, SweepResult, run_sweep};
