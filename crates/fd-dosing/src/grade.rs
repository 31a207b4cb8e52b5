//! Molasses grades and the multipliers they apply.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Molasses purity grade, ordered by increasing impurity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MolassesGrade {
    Clean,
    Grade1,
    Grade2,
    Blackstrap,
}

impl MolassesGrade {
    pub const ALL: [MolassesGrade; 4] = [
        MolassesGrade::Clean,
        MolassesGrade::Grade1,
        MolassesGrade::Grade2,
        MolassesGrade::Blackstrap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Grade1 => "Grade 1",
            Self::Grade2 => "Grade 2",
            Self::Blackstrap => "Blackstrap",
        }
    }

    /// Parse a grade name, tolerant of case, spaces and separators
    /// (`"grade 2"`, `"Grade-2"`, `"grade2"` all match).
    pub fn parse(text: &str) -> Option<Self> {
        let key: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "clean" => Some(Self::Clean),
            "grade1" | "g1" => Some(Self::Grade1),
            "grade2" | "g2" => Some(Self::Grade2),
            "blackstrap" => Some(Self::Blackstrap),
            _ => None,
        }
    }
}

impl fmt::Display for MolassesGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Per-grade dosing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeFactors {
    /// Multiplier on the yeast dose
    pub yeast: f64,
    /// Multiplier on every nitrogen salt mass
    pub nutrient: f64,
    /// Target TRS is clamped to the profile ceiling for this grade
    #[serde(default)]
    pub clamp_target: bool,
    /// Grade alone raises methanol risk to HIGH
    #[serde(default)]
    pub methanol_hazard: bool,
}

impl GradeFactors {
    pub const fn neutral() -> Self {
        Self {
            yeast: 1.0,
            nutrient: 1.0,
            clamp_target: false,
            methanol_hazard: false,
        }
    }
}

/// Multiplier table indexed by [`MolassesGrade`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTable {
    pub clean: GradeFactors,
    pub grade1: GradeFactors,
    pub grade2: GradeFactors,
    pub blackstrap: GradeFactors,
}

impl GradeTable {
    pub fn factors(&self, grade: MolassesGrade) -> GradeFactors {
        match grade {
            MolassesGrade::Clean => self.clean,
            MolassesGrade::Grade1 => self.grade1,
            MolassesGrade::Grade2 => self.grade2,
            MolassesGrade::Blackstrap => self.blackstrap,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MolassesGrade, GradeFactors)> + '_ {
        MolassesGrade::ALL.into_iter().map(|g| (g, self.factors(g)))
    }
}

impl Default for GradeTable {
    fn default() -> Self {
        Self {
            clean: GradeFactors::neutral(),
            grade1: GradeFactors::neutral(),
            grade2: GradeFactors {
                yeast: 1.05,
                nutrient: 1.1,
                clamp_target: false,
                methanol_hazard: false,
            },
            blackstrap: GradeFactors {
                yeast: 1.1,
                nutrient: 1.2,
                clamp_target: true,
                methanol_hazard: true,
            },
        }
    }
}
