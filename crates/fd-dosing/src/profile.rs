//! Operating profiles and process constants.
//!
//! A profile selects one historical operating regime: how TRS values are
//! entered, where the methanol pH threshold sits, how Blackstrap targets are
//! capped, where the batch volume comes from and how yeast is dosed.
//! [`DosingConstants`] holds the figures shared by every profile.

use crate::error::{InputError, InputResult};
use crate::grade::{GradeFactors, GradeTable};
use fd_core::constants::TRS_G_PER_L_PER_PERCENT;
use fd_core::{FdError, ensure_in_range};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a TRS figure is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrsUnit {
    /// Percent w/v; converted at 10 g/L per percent
    Percent,
    GramsPerLiter,
}

impl TrsUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::GramsPerLiter => "g/L",
        }
    }

    /// Convert a value in this unit to g/L.
    ///
    /// This is the single unit boundary of the calculator. Percent assumes
    /// near-unit density (1 % = 10 g/L); all later arithmetic is in g/L.
    pub fn to_g_per_l(self, value: f64) -> f64 {
        match self {
            Self::Percent => value * TRS_G_PER_L_PER_PERCENT,
            Self::GramsPerLiter => value,
        }
    }

    /// Inverse of [`TrsUnit::to_g_per_l`].
    pub fn from_g_per_l(self, g_per_l: f64) -> f64 {
        match self {
            Self::Percent => g_per_l / TRS_G_PER_L_PER_PERCENT,
            Self::GramsPerLiter => g_per_l,
        }
    }
}

impl fmt::Display for TrsUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Units used for the raw molasses TRS and the post-dilution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrsConvention {
    pub source: TrsUnit,
    pub target: TrsUnit,
}

/// Where the batch volume comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VolumeSource {
    /// Always the fermentor volume from [`DosingConstants`]
    Fixed,
    /// Supplied with every input form
    PerBatch,
}

/// How the yeast requirement is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum YeastDosing {
    /// Grams of dry yeast at a fixed rate per liter of diluted wort
    DryMass { base_rate_g_per_l: f64 },
    /// Liters of slurry as a percent of diluted volume
    Slurry { default_pitch_percent: f64 },
}

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, value: f64, what: &'static str) -> Result<f64, FdError> {
        ensure_in_range(value, self.min, self.max, what)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.min, self.max)
    }
}

/// Accepted ranges for form fields, each in the unit the profile enters it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub trs: Range,
    pub fan_mg_l: Range,
    pub ph: Range,
    pub target_trs: Range,
    pub temperature_c: Range,
    pub density_kg_l: Range,
    pub yeast_pitch_percent: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NitrogenFractions {
    pub ammonium_sulfate: f64,
    pub urea: f64,
    pub dap: f64,
}

impl Default for NitrogenFractions {
    fn default() -> Self {
        Self {
            ammonium_sulfate: 0.21,
            urea: 0.46,
            dap: 0.18,
        }
    }
}

/// Process constants shared by all profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingConstants {
    /// FAN the wort is topped up to
    pub target_fan_mg_l: f64,
    /// Elemental nitrogen mass fraction of each supplement salt
    pub nitrogen_fractions: NitrogenFractions,
    /// Volume used by [`VolumeSource::Fixed`] profiles
    pub fermentor_volume_l: f64,
    /// IPA risk is HIGH above this temperature
    pub ipa_max_temperature_c: f64,
    /// IPA risk is HIGH below this FAN
    pub ipa_min_fan_mg_l: f64,
    /// Methanol risk is HIGH above this raw TRS
    pub methanol_max_trs_g_l: f64,
}

impl Default for DosingConstants {
    fn default() -> Self {
        Self {
            target_fan_mg_l: 220.0,
            nitrogen_fractions: NitrogenFractions::default(),
            fermentor_volume_l: 238_000.0,
            ipa_max_temperature_c: 32.0,
            ipa_min_fan_mg_l: 150.0,
            methanol_max_trs_g_l: 200.0,
        }
    }
}

impl DosingConstants {
    pub fn validate(&self) -> InputResult<()> {
        let bad = |what: &str| InputError::InvalidProfile {
            profile: "constants".to_string(),
            what: what.to_string(),
        };
        let fractions = [
            self.nitrogen_fractions.ammonium_sulfate,
            self.nitrogen_fractions.urea,
            self.nitrogen_fractions.dap,
        ];
        if fractions.iter().any(|f| !(f.is_finite() && *f > 0.0 && *f <= 1.0)) {
            return Err(bad("nitrogen fractions must lie in (0, 1]"));
        }
        if !(self.fermentor_volume_l.is_finite() && self.fermentor_volume_l > 0.0) {
            return Err(bad("fermentor volume must be positive"));
        }
        if !(self.target_fan_mg_l.is_finite() && self.target_fan_mg_l >= 0.0) {
            return Err(bad("target FAN must be non-negative"));
        }
        let thresholds = [
            self.ipa_max_temperature_c,
            self.ipa_min_fan_mg_l,
            self.methanol_max_trs_g_l,
        ];
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(bad("risk thresholds must be finite"));
        }
        Ok(())
    }
}

/// One operating regime of the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trs_convention: TrsConvention,
    /// Methanol risk is HIGH above this pH
    pub methanol_ph_threshold: f64,
    /// Upper bound on the effective target for clamping grades, in g/L
    pub target_ceiling_g_l: f64,
    #[serde(default)]
    pub grades: GradeTable,
    pub volume: VolumeSource,
    pub yeast: YeastDosing,
    pub limits: InputLimits,
    /// Advise the operator when pH is above this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_advisory_limit: Option<f64>,
}

impl OperatingProfile {
    /// Neutral-pH plant process: TRS in percent, target in g/L, fixed
    /// 238 000 L fermentor, dry yeast.
    pub fn lab() -> Self {
        Self {
            name: "lab".to_string(),
            description: "Lab-controlled neutral-pH process, fixed fermentor".to_string(),
            trs_convention: TrsConvention {
                source: TrsUnit::Percent,
                target: TrsUnit::GramsPerLiter,
            },
            methanol_ph_threshold: 7.5,
            target_ceiling_g_l: 140.0,
            grades: GradeTable::default(),
            volume: VolumeSource::Fixed,
            yeast: YeastDosing::DryMass {
                base_rate_g_per_l: 0.27,
            },
            limits: InputLimits {
                trs: Range::new(5.0, 50.0),
                fan_mg_l: Range::new(0.0, 500.0),
                ph: Range::new(7.0, 8.0),
                target_trs: Range::new(110.0, 140.0),
                temperature_c: Range::new(25.0, 35.0),
                density_kg_l: Range::new(1.2, 1.6),
                yeast_pitch_percent: Range::new(0.0, 100.0),
            },
            ph_advisory_limit: Some(7.8),
        }
    }

    /// Acidic process from published practice: TRS and target both in
    /// percent, per-batch volume, yeast pitched as slurry.
    pub fn literature() -> Self {
        Self {
            name: "literature".to_string(),
            description: "Literature acidic process, per-batch volume, slurry pitch".to_string(),
            trs_convention: TrsConvention {
                source: TrsUnit::Percent,
                target: TrsUnit::Percent,
            },
            methanol_ph_threshold: 5.2,
            target_ceiling_g_l: 150.0,
            grades: GradeTable::default(),
            volume: VolumeSource::PerBatch,
            yeast: YeastDosing::Slurry {
                default_pitch_percent: 10.0,
            },
            limits: InputLimits {
                trs: Range::new(5.0, 50.0),
                fan_mg_l: Range::new(0.0, 500.0),
                ph: Range::new(3.0, 7.0),
                target_trs: Range::new(10.0, 20.0),
                temperature_c: Range::new(25.0, 35.0),
                density_kg_l: Range::new(1.2, 1.6),
                yeast_pitch_percent: Range::new(0.0, 100.0),
            },
            ph_advisory_limit: None,
        }
    }

    pub fn builtins() -> Vec<Self> {
        vec![Self::lab(), Self::literature()]
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Option<Self> {
        Self::builtins()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn grade_factors(&self, grade: crate::MolassesGrade) -> GradeFactors {
        self.grades.factors(grade)
    }

    /// Structural sanity checks. Does not look at any input form.
    pub fn validate(&self) -> InputResult<()> {
        let bad = |what: String| InputError::InvalidProfile {
            profile: self.name.clone(),
            what,
        };

        if self.name.trim().is_empty() {
            return Err(bad("name must not be empty".to_string()));
        }
        if !self.methanol_ph_threshold.is_finite() {
            return Err(bad("methanol pH threshold must be finite".to_string()));
        }
        if !(self.target_ceiling_g_l.is_finite() && self.target_ceiling_g_l > 0.0) {
            return Err(bad("target ceiling must be positive".to_string()));
        }
        for (grade, factors) in self.grades.iter() {
            let ok = |v: f64| v.is_finite() && v > 0.0;
            if !ok(factors.yeast) || !ok(factors.nutrient) {
                return Err(bad(format!("multipliers for {grade} must be positive")));
            }
        }
        match self.yeast {
            YeastDosing::DryMass { base_rate_g_per_l } => {
                if !(base_rate_g_per_l.is_finite() && base_rate_g_per_l >= 0.0) {
                    return Err(bad("yeast base rate must be non-negative".to_string()));
                }
            }
            YeastDosing::Slurry {
                default_pitch_percent,
            } => {
                if !self.limits.yeast_pitch_percent.contains(default_pitch_percent) {
                    return Err(bad(format!(
                        "default pitch {default_pitch_percent} % outside {}",
                        self.limits.yeast_pitch_percent
                    )));
                }
            }
        }

        let limits = [
            ("trs", self.limits.trs),
            ("fan_mg_l", self.limits.fan_mg_l),
            ("ph", self.limits.ph),
            ("target_trs", self.limits.target_trs),
            ("temperature_c", self.limits.temperature_c),
            ("density_kg_l", self.limits.density_kg_l),
            ("yeast_pitch_percent", self.limits.yeast_pitch_percent),
        ];
        for (what, range) in limits {
            if !(range.min.is_finite() && range.max.is_finite() && range.min <= range.max) {
                return Err(bad(format!("limit '{what}' must be a finite, ordered range")));
            }
        }
        if self.limits.target_trs.min <= 0.0 {
            return Err(bad("target TRS lower limit must be positive".to_string()));
        }

        Ok(())
    }
}
