//! fd-project: scenario file format and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{CURRENT_VERSION, migrate_to_current};
pub use schema::*;
pub use validate::{ValidationError, validate_file};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Migration error: {what}")]
    Migration { what: String },
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<ScenarioFile> {
    let content = std::fs::read_to_string(path)?;
    let mut file: ScenarioFile = serde_yaml::from_str(&content)?;
    file = migrate_to_current(file)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &std::path::Path, file: &ScenarioFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<ScenarioFile> {
    let content = std::fs::read_to_string(path)?;
    let mut file: ScenarioFile = serde_json::from_str(&content)?;
    file = migrate_to_current(file)?;
    validate_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &std::path::Path, file: &ScenarioFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<ScenarioFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
