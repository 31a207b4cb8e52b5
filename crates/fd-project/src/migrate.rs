//! Scenario file migration.
//!
//! Files written before the `version` field existed deserialize as version 0.

use crate::schema::ScenarioFile;
use crate::{ProjectError, ProjectResult};

pub const CURRENT_VERSION: u32 = 1;

/// Step `file` up to [`CURRENT_VERSION`]. Newer files pass through untouched
/// and are rejected by validation.
pub fn migrate_to_current(mut file: ScenarioFile) -> ProjectResult<ScenarioFile> {
    while file.version < CURRENT_VERSION {
        file = migrate_one_version(file)?;
    }
    Ok(file)
}

fn migrate_one_version(file: ScenarioFile) -> ProjectResult<ScenarioFile> {
    match file.version {
        0 => migrate_v0_to_v1(file),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut file: ScenarioFile) -> ProjectResult<ScenarioFile> {
    file.version = 1;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(version: u32) -> ScenarioFile {
        ScenarioFile {
            version,
            name: "test".to_string(),
            constants: None,
            profiles: vec![],
            scenarios: vec![],
            sweeps: vec![],
        }
    }

    #[test]
    fn migrate_current_is_noop() {
        let file = empty(CURRENT_VERSION);
        assert_eq!(migrate_to_current(file.clone()).unwrap(), file);
    }

    #[test]
    fn unversioned_file_is_stamped() {
        let migrated = migrate_to_current(empty(0)).unwrap();
        assert_eq!(migrated.version, CURRENT_VERSION);
        assert_eq!(migrated.name, "test");
    }

    #[test]
    fn future_version_is_left_for_validation() {
        let file = empty(CURRENT_VERSION + 1);
        assert_eq!(migrate_to_current(file.clone()).unwrap(), file);
    }
}
