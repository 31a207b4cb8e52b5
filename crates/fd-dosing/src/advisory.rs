//! Operator advisories derived from a computed result.

use crate::calculator::ProcessResult;
use crate::grade::MolassesGrade;
use crate::inputs::ProcessInputs;
use crate::profile::OperatingProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Advisory {
    /// Target is stronger than the source; water would have to be removed.
    InverseDilution { water_to_add_l: f64 },
    NitrogenSufficient,
    TargetClamped { requested_g_l: f64, ceiling_g_l: f64 },
    Pretreatment { grade: MolassesGrade },
    PhAboveAdvisory { ph: f64, limit: f64 },
    IpaRisk,
    MethanolRisk,
}

impl Advisory {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NitrogenSufficient | Self::TargetClamped { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InverseDilution { water_to_add_l } => write!(
                f,
                "Target TRS exceeds source TRS: cannot dilute ({water_to_add_l:.1} L water)"
            ),
            Self::NitrogenSufficient => f.write_str("FAN sufficient, no nitrogen additions needed"),
            Self::TargetClamped {
                requested_g_l,
                ceiling_g_l,
            } => write!(
                f,
                "Target TRS lowered from {requested_g_l:.0} g/L to the {ceiling_g_l:.0} g/L grade ceiling"
            ),
            Self::Pretreatment { grade } => write!(
                f,
                "{grade} feed: use pretreatment (filter/settle) to reduce solids and methanol risk"
            ),
            Self::PhAboveAdvisory { ph, limit } => {
                write!(f, "pH {ph:.1} is above {limit:.1}, adjust toward the process range")
            }
            Self::IpaRisk => f.write_str("IPA risk high: reduce temperature or increase FAN"),
            Self::MethanolRisk => {
                f.write_str("Methanol risk high: dilute molasses or pre-clean low-grade feed")
            }
        }
    }
}

/// Collect advisories in display order: dilution, nitrogen, feed, risk.
pub fn assess(
    inputs: &ProcessInputs,
    result: &ProcessResult,
    profile: &OperatingProfile,
) -> Vec<Advisory> {
    let mut out = Vec::new();

    if result.is_inverse_dilution() {
        out.push(Advisory::InverseDilution {
            water_to_add_l: result.water_to_add_l,
        });
    }

    let requested_g_l = inputs.target_trs.to_g_per_l();
    if result.effective_target_trs_g_l < requested_g_l {
        out.push(Advisory::TargetClamped {
            requested_g_l,
            ceiling_g_l: result.effective_target_trs_g_l,
        });
    }

    if !result.needs_nitrogen() {
        out.push(Advisory::NitrogenSufficient);
    }

    if inputs.grade >= MolassesGrade::Grade2 {
        out.push(Advisory::Pretreatment {
            grade: inputs.grade,
        });
    }

    if let Some(limit) = profile.ph_advisory_limit {
        if inputs.ph > limit {
            out.push(Advisory::PhAboveAdvisory {
                ph: inputs.ph,
                limit,
            });
        }
    }

    if result.ipa_risk.is_high() {
        out.push(Advisory::IpaRisk);
    }
    if result.methanol_risk.is_high() {
        out.push(Advisory::MethanolRisk);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::DosingCalculator;
    use crate::inputs::InputForm;

    fn run(profile: OperatingProfile, form: &InputForm) -> Vec<Advisory> {
        let calc = DosingCalculator::with_profile(profile);
        let inputs = calc.resolve(form).unwrap();
        let result = calc.compute(&inputs);
        calc.assess(&inputs, &result)
    }

    #[test]
    fn clean_reference_has_no_warnings() {
        let advisories = run(OperatingProfile::lab(), &InputForm::lab_defaults());
        assert!(advisories.iter().all(|a| a.severity() == Severity::Info));
    }

    #[test]
    fn inverse_dilution_is_reported() {
        let mut form = InputForm::lab_defaults();
        form.trs = 10.0;
        let advisories = run(OperatingProfile::lab(), &form);
        assert!(matches!(
            advisories.first(),
            Some(Advisory::InverseDilution { water_to_add_l }) if *water_to_add_l < 0.0
        ));
    }

    #[test]
    fn low_grade_feed_gets_pretreatment_and_methanol() {
        let mut form = InputForm::lab_defaults();
        form.grade = MolassesGrade::Blackstrap;
        let advisories = run(OperatingProfile::lab(), &form);
        assert!(advisories.contains(&Advisory::Pretreatment {
            grade: MolassesGrade::Blackstrap
        }));
        assert!(advisories.contains(&Advisory::MethanolRisk));
    }

    #[test]
    fn nitrogen_sufficient_when_fan_meets_target() {
        let mut form = InputForm::lab_defaults();
        form.fan_mg_l = 220.0;
        let advisories = run(OperatingProfile::lab(), &form);
        assert!(advisories.contains(&Advisory::NitrogenSufficient));
    }

    #[test]
    fn ph_advisory_only_on_lab_profile() {
        let mut form = InputForm::lab_defaults();
        form.ph = 7.9;
        let advisories = run(OperatingProfile::lab(), &form);
        assert!(advisories.contains(&Advisory::PhAboveAdvisory { ph: 7.9, limit: 7.8 }));
    }

    #[test]
    fn messages_mention_remedy() {
        assert!(Advisory::IpaRisk.to_string().contains("reduce temperature"));
        let msg = Advisory::InverseDilution {
            water_to_add_l: -12.5,
        }
        .to_string();
        assert!(msg.contains("-12.5"));
    }
}
