//! Input form and validated process inputs.
//!
//! [`InputForm`] is what a caller collects (form, CLI flags, scenario file).
//! [`InputForm::resolve`] applies the profile's ranges and volume rules and
//! tags each TRS figure with its unit, producing [`ProcessInputs`] that the
//! calculator accepts without further checks.

use crate::error::{InputError, InputResult};
use crate::grade::MolassesGrade;
use crate::profile::{DosingConstants, OperatingProfile, TrsUnit, VolumeSource, YeastDosing};
use fd_core::{Tolerances, ensure_finite, nearly_equal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A TRS figure together with the unit it was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trs {
    pub value: f64,
    pub unit: TrsUnit,
}

impl Trs {
    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: TrsUnit::Percent,
        }
    }

    pub fn g_per_l(value: f64) -> Self {
        Self {
            value,
            unit: TrsUnit::GramsPerLiter,
        }
    }

    /// Normalized concentration in g/L.
    pub fn to_g_per_l(self) -> f64 {
        self.unit.to_g_per_l(self.value)
    }
}

impl fmt::Display for Trs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Raw caller-supplied values, before any checks.
///
/// `trs` and `target_trs` are bare numbers in whatever unit the profile's
/// [`TrsConvention`](crate::TrsConvention) says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputForm {
    pub trs: f64,
    pub fan_mg_l: f64,
    pub ph: f64,
    pub target_trs: f64,
    pub temperature_c: f64,
    pub grade: MolassesGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_l: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yeast_pitch_percent: Option<f64>,
    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_l: Option<f64>,
    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity_cp: Option<f64>,
    /// Display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yeast_strain: Option<String>,
}

impl InputForm {
    /// Default values of the lab form.
    pub fn lab_defaults() -> Self {
        Self {
            trs: 18.0,
            fan_mg_l: 150.0,
            ph: 7.2,
            target_trs: 130.0,
            temperature_c: 30.0,
            grade: MolassesGrade::Clean,
            volume_l: None,
            yeast_pitch_percent: None,
            density_kg_l: Some(1.4),
            viscosity_cp: None,
            yeast_strain: None,
        }
    }

    /// Check every field against `profile` and produce calculator inputs.
    pub fn resolve(
        &self,
        profile: &OperatingProfile,
        constants: &DosingConstants,
    ) -> InputResult<ProcessInputs> {
        let limits = &profile.limits;

        // Zero target would divide by zero in the volume step; reject it even
        // when a custom profile's limits would let it through.
        let target_trs = ensure_finite(self.target_trs, "target TRS")?;
        if target_trs <= 0.0 {
            return Err(InputError::NonPositiveTarget { value: target_trs });
        }

        let trs = limits.trs.check(self.trs, "TRS")?;
        let target_trs = limits.target_trs.check(target_trs, "target TRS")?;
        let fan_mg_l = limits.fan_mg_l.check(self.fan_mg_l, "FAN")?;
        let ph = limits.ph.check(self.ph, "pH")?;
        let temperature_c = limits.temperature_c.check(self.temperature_c, "temperature")?;

        if let Some(density) = self.density_kg_l {
            limits.density_kg_l.check(density, "molasses density")?;
        }
        if let Some(viscosity) = self.viscosity_cp {
            ensure_finite(viscosity, "molasses viscosity")?;
        }
        let yeast_pitch_percent = match (profile.yeast, self.yeast_pitch_percent) {
            (_, Some(pitch)) => Some(limits.yeast_pitch_percent.check(pitch, "yeast pitch")?),
            (
                YeastDosing::Slurry {
                    default_pitch_percent,
                },
                None,
            ) => Some(default_pitch_percent),
            (YeastDosing::DryMass { .. }, None) => None,
        };

        let volume_l = self.resolve_volume(profile, constants)?;

        Ok(ProcessInputs {
            trs: Trs {
                value: trs,
                unit: profile.trs_convention.source,
            },
            target_trs: Trs {
                value: target_trs,
                unit: profile.trs_convention.target,
            },
            fan_mg_l,
            ph,
            temperature_c,
            volume_l,
            grade: self.grade,
            yeast_pitch_percent,
        })
    }

    fn resolve_volume(
        &self,
        profile: &OperatingProfile,
        constants: &DosingConstants,
    ) -> InputResult<f64> {
        match (profile.volume, self.volume_l) {
            (VolumeSource::Fixed, None) => Ok(constants.fermentor_volume_l),
            (VolumeSource::Fixed, Some(supplied)) => {
                let fixed = constants.fermentor_volume_l;
                if nearly_equal(supplied, fixed, Tolerances::default()) {
                    Ok(fixed)
                } else {
                    Err(InputError::FixedVolumeConflict {
                        profile: profile.name.clone(),
                        supplied,
                        fixed,
                    })
                }
            }
            (VolumeSource::PerBatch, None) => Err(InputError::MissingVolume {
                profile: profile.name.clone(),
            }),
            (VolumeSource::PerBatch, Some(supplied)) => {
                let supplied = ensure_finite(supplied, "batch volume")?;
                if supplied <= 0.0 {
                    return Err(InputError::NonPositiveVolume { value: supplied });
                }
                Ok(supplied)
            }
        }
    }
}

/// Validated inputs to [`DosingCalculator::compute`](crate::DosingCalculator::compute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInputs {
    /// Raw molasses TRS
    pub trs: Trs,
    /// Desired TRS after dilution, before any grade clamp
    pub target_trs: Trs,
    pub fan_mg_l: f64,
    pub ph: f64,
    pub temperature_c: f64,
    pub volume_l: f64,
    pub grade: MolassesGrade,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yeast_pitch_percent: Option<f64>,
}
