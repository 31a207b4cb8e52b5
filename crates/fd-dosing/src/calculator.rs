//! Dilution, nutrient and yeast dosing.
//!
//! [`DosingCalculator::compute`] is a pure transform from validated
//! [`ProcessInputs`] to a [`ProcessResult`]. It never fails and never
//! clamps: a target stronger than the source yields a negative water volume
//! that the caller has to surface.

use crate::advisory::{self, Advisory};
use crate::error::InputResult;
use crate::inputs::{InputForm, ProcessInputs};
use crate::profile::{DosingConstants, OperatingProfile, YeastDosing};
use fd_core::units::{Mass, Volume, as_grams, grams, liters, mg_per_l};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    High,
}

impl RiskLevel {
    fn from_flag(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Low => "LOW",
            Self::High => "HIGH",
        })
    }
}

/// Unit of [`ProcessResult::yeast_required`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YeastUnit {
    /// Grams of dry yeast
    Grams,
    /// Liters of slurry
    Liters,
}

/// Nitrogen supplement options. Alternatives, not additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NitrogenSalt {
    AmmoniumSulfate,
    Urea,
    Dap,
}

impl NitrogenSalt {
    pub const ALL: [NitrogenSalt; 3] = [
        NitrogenSalt::AmmoniumSulfate,
        NitrogenSalt::Urea,
        NitrogenSalt::Dap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AmmoniumSulfate => "Ammonium Sulfate",
            Self::Urea => "Urea",
            Self::Dap => "DAP",
        }
    }
}

/// Output of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Raw molasses TRS after unit normalization
    pub source_trs_g_l: f64,
    /// Target actually used, after the grade clamp
    pub effective_target_trs_g_l: f64,
    pub final_volume_l: f64,
    /// Negative when the target is stronger than the source
    pub water_to_add_l: f64,
    pub nitrogen_deficit_g: f64,
    pub ammonium_sulfate_g: f64,
    pub urea_g: f64,
    pub dap_g: f64,
    pub yeast_required: f64,
    pub yeast_unit: YeastUnit,
    pub ipa_risk: RiskLevel,
    pub methanol_risk: RiskLevel,
}

impl ProcessResult {
    pub fn is_inverse_dilution(&self) -> bool {
        self.water_to_add_l < 0.0
    }

    pub fn needs_nitrogen(&self) -> bool {
        self.nitrogen_deficit_g > 0.0
    }

    pub fn final_volume(&self) -> Volume {
        liters(self.final_volume_l)
    }

    pub fn water_to_add(&self) -> Volume {
        liters(self.water_to_add_l)
    }

    pub fn nitrogen_deficit(&self) -> Mass {
        grams(self.nitrogen_deficit_g)
    }

    pub fn salt_mass(&self, salt: NitrogenSalt) -> Mass {
        grams(match salt {
            NitrogenSalt::AmmoniumSulfate => self.ammonium_sulfate_g,
            NitrogenSalt::Urea => self.urea_g,
            NitrogenSalt::Dap => self.dap_g,
        })
    }
}

/// Calculator bound to one operating profile and a set of constants.
#[derive(Debug, Clone)]
pub struct DosingCalculator {
    profile: OperatingProfile,
    constants: DosingConstants,
}

impl DosingCalculator {
    pub fn new(profile: OperatingProfile, constants: DosingConstants) -> Self {
        Self { profile, constants }
    }

    pub fn with_profile(profile: OperatingProfile) -> Self {
        Self::new(profile, DosingConstants::default())
    }

    pub fn profile(&self) -> &OperatingProfile {
        &self.profile
    }

    pub fn constants(&self) -> &DosingConstants {
        &self.constants
    }

    /// Validate a raw form against this calculator's profile.
    pub fn resolve(&self, form: &InputForm) -> InputResult<ProcessInputs> {
        form.resolve(&self.profile, &self.constants)
    }

    /// Grade-clamped target in g/L.
    ///
    /// Derived before any volume arithmetic so the clamp always feeds the
    /// dilution, never the other way round.
    pub fn effective_target_g_l(&self, inputs: &ProcessInputs) -> f64 {
        let requested = inputs.target_trs.to_g_per_l();
        if self.profile.grade_factors(inputs.grade).clamp_target {
            requested.min(self.profile.target_ceiling_g_l)
        } else {
            requested
        }
    }

    pub fn compute(&self, inputs: &ProcessInputs) -> ProcessResult {
        let c = &self.constants;
        let factors = self.profile.grade_factors(inputs.grade);

        // Both sides in g/L from here on; see `TrsUnit::to_g_per_l`.
        let source_trs_g_l = inputs.trs.to_g_per_l();
        let effective_target_trs_g_l = self.effective_target_g_l(inputs);

        let final_volume_l = inputs.volume_l * source_trs_g_l / effective_target_trs_g_l;
        let water_to_add_l = final_volume_l - inputs.volume_l;

        let fan_gap_mg_l = (c.target_fan_mg_l - inputs.fan_mg_l).max(0.0);
        let deficit: Mass = mg_per_l(fan_gap_mg_l) * liters(final_volume_l);
        let nitrogen_deficit_g = as_grams(deficit);

        let fractions = &c.nitrogen_fractions;
        let salt = |fraction: f64| nitrogen_deficit_g / fraction * factors.nutrient;

        let (yeast_required, yeast_unit) = match self.profile.yeast {
            YeastDosing::DryMass { base_rate_g_per_l } => (
                final_volume_l * base_rate_g_per_l * factors.yeast,
                YeastUnit::Grams,
            ),
            YeastDosing::Slurry {
                default_pitch_percent,
            } => {
                // `resolve` fills the default; hand-built inputs may still omit it.
                let pitch = inputs.yeast_pitch_percent.unwrap_or(default_pitch_percent);
                (
                    final_volume_l * pitch / 100.0 * factors.yeast,
                    YeastUnit::Liters,
                )
            }
        };

        let ipa_risk = RiskLevel::from_flag(
            inputs.temperature_c > c.ipa_max_temperature_c || inputs.fan_mg_l < c.ipa_min_fan_mg_l,
        );
        let methanol_risk = RiskLevel::from_flag(
            source_trs_g_l > c.methanol_max_trs_g_l
                || inputs.ph > self.profile.methanol_ph_threshold
                || factors.methanol_hazard,
        );

        ProcessResult {
            source_trs_g_l,
            effective_target_trs_g_l,
            final_volume_l,
            water_to_add_l,
            nitrogen_deficit_g,
            ammonium_sulfate_g: salt(fractions.ammonium_sulfate),
            urea_g: salt(fractions.urea),
            dap_g: salt(fractions.dap),
            yeast_required,
            yeast_unit,
            ipa_risk,
            methanol_risk,
        }
    }

    /// Advisories for a computed result.
    pub fn assess(&self, inputs: &ProcessInputs, result: &ProcessResult) -> Vec<Advisory> {
        advisory::assess(inputs, result, &self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::MolassesGrade;
    use crate::inputs::Trs;
    use fd_core::{Tolerances, nearly_equal};

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-6,
            rel: 1e-9,
        }
    }

    fn reference_inputs() -> ProcessInputs {
        ProcessInputs {
            trs: Trs::percent(18.0),
            target_trs: Trs::g_per_l(130.0),
            fan_mg_l: 150.0,
            ph: 7.2,
            temperature_c: 30.0,
            volume_l: 238_000.0,
            grade: MolassesGrade::Clean,
            yeast_pitch_percent: None,
        }
    }

    #[test]
    fn reference_scenario() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let r = calc.compute(&reference_inputs());

        assert_eq!(r.source_trs_g_l, 180.0);
        assert_eq!(r.effective_target_trs_g_l, 130.0);
        assert!(nearly_equal(r.final_volume_l, 238_000.0 * 180.0 / 130.0, tol()));
        assert!((r.final_volume_l - 329_538.46).abs() < 0.01);
        assert!((r.water_to_add_l - 91_538.46).abs() < 0.01);
        assert!((r.nitrogen_deficit_g - 23_067.69).abs() < 0.01);
        assert!((r.ammonium_sulfate_g - 109_846.15).abs() < 0.01);
        assert!(nearly_equal(r.urea_g, r.nitrogen_deficit_g / 0.46, tol()));
        assert!(nearly_equal(r.dap_g, r.nitrogen_deficit_g / 0.18, tol()));
        assert!(nearly_equal(r.yeast_required, r.final_volume_l * 0.27, tol()));
        assert_eq!(r.yeast_unit, YeastUnit::Grams);
        assert_eq!(r.ipa_risk, RiskLevel::Low);
        assert_eq!(r.methanol_risk, RiskLevel::Low);
    }

    #[test]
    fn deficit_matches_plain_arithmetic() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let r = calc.compute(&reference_inputs());
        assert!(nearly_equal(
            r.nitrogen_deficit_g,
            70.0 * r.final_volume_l / 1000.0,
            tol()
        ));
    }

    #[test]
    fn inverse_dilution_keeps_sign() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let mut inputs = reference_inputs();
        inputs.trs = Trs::percent(10.0);
        let r = calc.compute(&inputs);

        assert!(r.is_inverse_dilution());
        assert!(r.final_volume_l < inputs.volume_l);
        assert_eq!(r.water_to_add_l, r.final_volume_l - inputs.volume_l);
    }

    #[test]
    fn blackstrap_clamps_before_volume() {
        let calc = DosingCalculator::with_profile(OperatingProfile::literature());
        let inputs = ProcessInputs {
            trs: Trs::percent(40.0),
            target_trs: Trs::percent(18.0),
            fan_mg_l: 220.0,
            ph: 4.5,
            temperature_c: 30.0,
            volume_l: 10_000.0,
            grade: MolassesGrade::Blackstrap,
            yeast_pitch_percent: None,
        };
        let r = calc.compute(&inputs);

        assert_eq!(r.effective_target_trs_g_l, 150.0);
        assert!(nearly_equal(r.final_volume_l, 10_000.0 * 400.0 / 150.0, tol()));
        assert_eq!(r.methanol_risk, RiskLevel::High);
    }

    #[test]
    fn clamp_does_not_raise_low_targets() {
        let calc = DosingCalculator::with_profile(OperatingProfile::literature());
        let inputs = ProcessInputs {
            trs: Trs::percent(40.0),
            target_trs: Trs::percent(12.0),
            fan_mg_l: 220.0,
            ph: 4.5,
            temperature_c: 30.0,
            volume_l: 10_000.0,
            grade: MolassesGrade::Blackstrap,
            yeast_pitch_percent: None,
        };
        assert_eq!(calc.effective_target_g_l(&inputs), 120.0);
    }

    #[test]
    fn slurry_mode_uses_pitch_percent() {
        let calc = DosingCalculator::with_profile(OperatingProfile::literature());
        let mut inputs = ProcessInputs {
            trs: Trs::percent(30.0),
            target_trs: Trs::percent(15.0),
            fan_mg_l: 250.0,
            ph: 4.5,
            temperature_c: 30.0,
            volume_l: 1_000.0,
            grade: MolassesGrade::Clean,
            yeast_pitch_percent: Some(5.0),
        };
        let r = calc.compute(&inputs);
        assert_eq!(r.yeast_unit, YeastUnit::Liters);
        assert!(nearly_equal(r.yeast_required, 100.0, tol()));

        inputs.yeast_pitch_percent = None;
        let r = calc.compute(&inputs);
        assert!(nearly_equal(r.yeast_required, 200.0, tol()));
    }

    #[test]
    fn ipa_boundaries_are_strict() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let mut inputs = reference_inputs();
        inputs.temperature_c = 32.0;
        inputs.fan_mg_l = 150.0;
        assert_eq!(calc.compute(&inputs).ipa_risk, RiskLevel::Low);

        inputs.temperature_c = 32.5;
        assert_eq!(calc.compute(&inputs).ipa_risk, RiskLevel::High);

        inputs.temperature_c = 30.0;
        inputs.fan_mg_l = 149.0;
        assert_eq!(calc.compute(&inputs).ipa_risk, RiskLevel::High);
    }

    #[test]
    fn methanol_threshold_follows_profile() {
        let mut inputs = reference_inputs();
        inputs.ph = 6.0;
        let lab = DosingCalculator::with_profile(OperatingProfile::lab());
        assert_eq!(lab.compute(&inputs).methanol_risk, RiskLevel::Low);

        let lit = DosingCalculator::with_profile(OperatingProfile::literature());
        assert_eq!(lit.compute(&inputs).methanol_risk, RiskLevel::High);

        // threshold is strict
        inputs.ph = 5.2;
        assert_eq!(lit.compute(&inputs).methanol_risk, RiskLevel::Low);
        inputs.ph = 5.25;
        assert_eq!(lit.compute(&inputs).methanol_risk, RiskLevel::High);
    }

    #[test]
    fn methanol_high_on_rich_source() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let mut inputs = reference_inputs();
        inputs.trs = Trs::percent(20.5);
        assert_eq!(calc.compute(&inputs).methanol_risk, RiskLevel::High);

        inputs.trs = Trs::percent(20.0);
        assert_eq!(calc.compute(&inputs).methanol_risk, RiskLevel::Low);
    }

    #[test]
    fn injected_constants_are_used() {
        let constants = DosingConstants {
            target_fan_mg_l: 300.0,
            ..DosingConstants::default()
        };
        let calc = DosingCalculator::new(OperatingProfile::lab(), constants);
        let mut inputs = reference_inputs();
        inputs.fan_mg_l = 250.0;
        let r = calc.compute(&inputs);
        assert!(r.needs_nitrogen());
        assert!(nearly_equal(
            r.nitrogen_deficit_g,
            50.0 * r.final_volume_l / 1000.0,
            tol()
        ));
    }

    #[test]
    fn typed_accessors_agree_with_fields() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let r = calc.compute(&reference_inputs());
        assert!(nearly_equal(
            fd_core::as_liters(r.water_to_add()),
            r.water_to_add_l,
            tol()
        ));
        assert!(nearly_equal(
            fd_core::as_grams(r.salt_mass(NitrogenSalt::Dap)),
            r.dap_g,
            tol()
        ));
    }
}
