//! Scenario file validation logic.

use crate::migrate::CURRENT_VERSION;
use crate::schema::{ScenarioDef, ScenarioFile};
use fd_dosing::{OperatingProfile, SweepDefinition};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_file(file: &ScenarioFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > CURRENT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    if let Some(constants) = &file.constants {
        constants
            .validate()
            .map_err(|e| ValidationError::InvalidValue {
                field: "constants".to_string(),
                value: String::new(),
                reason: e.to_string(),
            })?;
    }

    let builtin_names: HashSet<String> = OperatingProfile::builtins()
        .into_iter()
        .map(|p| p.name)
        .collect();
    let mut profile_names = HashSet::new();
    for profile in &file.profiles {
        if builtin_names.contains(&profile.name) || !profile_names.insert(&profile.name) {
            return Err(ValidationError::DuplicateId {
                id: profile.name.clone(),
                context: "profiles".to_string(),
            });
        }
        profile
            .validate()
            .map_err(|e| ValidationError::InvalidValue {
                field: format!("profile '{}'", profile.name),
                value: profile.name.clone(),
                reason: e.to_string(),
            })?;
    }

    let mut scenario_ids = HashSet::new();
    for scenario in &file.scenarios {
        if !scenario_ids.insert(&scenario.id) {
            return Err(ValidationError::DuplicateId {
                id: scenario.id.clone(),
                context: "scenarios".to_string(),
            });
        }
        validate_scenario(file, scenario)?;
    }

    let mut sweep_ids = HashSet::new();
    for sweep in &file.sweeps {
        if !sweep_ids.insert(&sweep.id) {
            return Err(ValidationError::DuplicateId {
                id: sweep.id.clone(),
                context: "sweeps".to_string(),
            });
        }
        if !scenario_ids.contains(&sweep.scenario_id) {
            return Err(ValidationError::MissingReference {
                id: sweep.scenario_id.clone(),
                context: format!("sweep '{}' scenario_id", sweep.id),
            });
        }
        let def = &sweep.sweep;
        SweepDefinition::new(def.parameter, def.start, def.end, def.num_points).map_err(|e| {
            ValidationError::InvalidValue {
                field: format!("sweep '{}'", sweep.id),
                value: format!("{}..{} x{}", def.start, def.end, def.num_points),
                reason: e.to_string(),
            }
        })?;
    }

    Ok(())
}

fn validate_scenario(file: &ScenarioFile, scenario: &ScenarioDef) -> Result<(), ValidationError> {
    if scenario.id.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "scenario id".to_string(),
            value: String::new(),
            reason: "must not be empty".to_string(),
        });
    }
    if file.profile(&scenario.profile).is_none() {
        return Err(ValidationError::MissingReference {
            id: scenario.profile.clone(),
            context: format!("scenario '{}' profile", scenario.id),
        });
    }
    Ok(())
}
