//! Scenario file schema definitions.

use fd_dosing::{DosingConstants, InputForm, OperatingProfile, SweepDefinition};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioFile {
    /// Absent in files that predate versioning; read as 0 and migrated
    #[serde(default)]
    pub version: u32,
    pub name: String,
    /// Overrides for the process constants; defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constants: Option<DosingConstants>,
    /// Custom profiles, referenced by name alongside the built-ins
    #[serde(default)]
    pub profiles: Vec<OperatingProfile>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sweeps: Vec<SweepDef>,
}

impl ScenarioFile {
    pub fn constants(&self) -> DosingConstants {
        self.constants.clone().unwrap_or_default()
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioDef> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Custom profile first, then built-in.
    pub fn profile(&self, name: &str) -> Option<OperatingProfile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .or_else(|| OperatingProfile::builtin(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub id: String,
    pub name: String,
    pub profile: String,
    pub inputs: InputForm,
}

/// A sweep over one input of an existing scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub id: String,
    pub scenario_id: String,
    #[serde(flatten)]
    pub sweep: SweepDefinition,
}
