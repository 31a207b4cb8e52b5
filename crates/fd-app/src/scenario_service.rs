//! Scenario file loading, validation, and introspection.

use std::path::Path;

use fd_dosing::{DosingCalculator, OperatingProfile};
use fd_project::{ScenarioFile, validate_file};

use crate::error::{AppError, AppResult};

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub profile: String,
    pub grade: String,
}

/// A scenario whose inputs do not pass its profile's checks.
#[derive(Debug, Clone)]
pub struct ScenarioIssue {
    pub scenario_id: String,
    pub message: String,
}

/// Load a scenario file (YAML, or JSON by extension) and check its structure.
pub fn load_scenarios(path: &Path) -> AppResult<ScenarioFile> {
    if let Err(source) = std::fs::metadata(path) {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source,
        });
    }
    let file = fd_project::load(path)?;
    tracing::debug!(
        path = %path.display(),
        scenarios = file.scenarios.len(),
        profiles = file.profiles.len(),
        "loaded scenario file"
    );
    Ok(file)
}

/// Structural validation plus an input check of every scenario.
///
/// Structural problems are errors; scenarios whose inputs are out of range
/// come back as issues so the rest of the file can still be reported.
pub fn validate_scenarios(file: &ScenarioFile) -> AppResult<Vec<ScenarioIssue>> {
    validate_file(file)?;

    let mut issues = Vec::new();
    for scenario in &file.scenarios {
        let calc = calculator_for(file, &scenario.profile)?;
        if let Err(err) = calc.resolve(&scenario.inputs) {
            tracing::warn!(scenario = %scenario.id, error = %err, "scenario inputs rejected");
            issues.push(ScenarioIssue {
                scenario_id: scenario.id.clone(),
                message: err.to_string(),
            });
        }
    }
    Ok(issues)
}

/// Find a profile by name: custom profiles in `file` first, then built-ins.
pub fn resolve_profile(file: Option<&ScenarioFile>, name: &str) -> AppResult<OperatingProfile> {
    let found = match file {
        Some(file) => file.profile(name),
        None => OperatingProfile::builtin(name),
    };
    found.ok_or_else(|| AppError::ProfileNotFound(name.to_string()))
}

/// Calculator for `profile` using the file's constants.
pub fn calculator_for(file: &ScenarioFile, profile: &str) -> AppResult<DosingCalculator> {
    let profile = resolve_profile(Some(file), profile)?;
    Ok(DosingCalculator::new(profile, file.constants()))
}

/// List all scenarios in the file.
pub fn list_scenarios(file: &ScenarioFile) -> Vec<ScenarioSummary> {
    file.scenarios
        .iter()
        .map(|s| ScenarioSummary {
            id: s.id.clone(),
            name: s.name.clone(),
            profile: s.profile.clone(),
            grade: s.inputs.grade.to_string(),
        })
        .collect()
}
