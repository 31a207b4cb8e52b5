//! Plain-text rendering of evaluations, batches, sweeps and profiles.

use fd_core::units::{as_kilograms, as_liters, grams};
use fd_dosing::{
    NitrogenSalt, OperatingProfile, ProcessResult, Severity, SweepResult, TrsUnit, VolumeSource,
    YeastDosing, YeastUnit,
};

use crate::run_service::{BatchReport, Evaluation};

fn yeast_line(result: &ProcessResult) -> String {
    match result.yeast_unit {
        YeastUnit::Grams => format!(
            "{:.2} kg dry yeast",
            as_kilograms(grams(result.yeast_required))
        ),
        YeastUnit::Liters => format!("{:.1} L yeast slurry", result.yeast_required),
    }
}

/// Effective target in the unit it was entered in, with g/L alongside.
fn target_text(unit: TrsUnit, target_g_l: f64) -> String {
    match unit {
        TrsUnit::GramsPerLiter => format!("{target_g_l:.0} g/L"),
        TrsUnit::Percent => format!(
            "{:.1} {} ({target_g_l:.0} g/L)",
            unit.from_g_per_l(target_g_l),
            unit
        ),
    }
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Full report for one evaluation, in the order an operator reads it.
pub fn render_evaluation(eval: &Evaluation) -> String {
    let r = &eval.result;
    let form = &eval.form;
    let mut lines = vec![
        format!("== {} ({}) ==", eval.scenario_name, eval.scenario_id),
        format!("Profile: {}", eval.profile),
        format!(
            "TRS: {} -> {:.0} g/L source, target {}",
            eval.inputs.trs,
            r.source_trs_g_l,
            target_text(eval.inputs.target_trs.unit, r.effective_target_trs_g_l)
        ),
    ];

    let water = as_liters(r.water_to_add());
    if r.is_inverse_dilution() {
        lines.push(format!(
            "Water to add: {water:.1} L  [CANNOT DILUTE: target above source]"
        ));
    } else {
        lines.push(format!("Water to add: {water:.1} L"));
    }
    lines.push(format!("Final volume: {:.1} L", as_liters(r.final_volume())));

    let strain = form.yeast_strain.as_deref().unwrap_or("yeast");
    lines.push(format!("Yeast ({strain}): {}", yeast_line(r)));
    lines.push(format!(
        "Fermentation temp: {:.1} °C",
        eval.inputs.temperature_c
    ));

    lines.push(match form.density_kg_l {
        Some(density) => format!("Molasses: {} (density {density:.2} kg/L)", eval.inputs.grade),
        None => format!("Molasses: {}", eval.inputs.grade),
    });

    if r.needs_nitrogen() {
        lines.push(format!(
            "FAN adjustment (choose one, deficit {:.2} kg N):",
            as_kilograms(r.nitrogen_deficit())
        ));
        for salt in NitrogenSalt::ALL {
            lines.push(format!(
                "  - {}: {:.2} kg",
                salt.label(),
                as_kilograms(r.salt_mass(salt))
            ));
        }
    }

    lines.push(format!("IPA risk: {}", r.ipa_risk));
    lines.push(format!("Methanol risk: {}", r.methanol_risk));

    for advisory in &eval.advisories {
        let tag = match advisory.severity() {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        lines.push(format!("[{tag}] {advisory}"));
    }

    join_lines(lines)
}

/// One line per scenario, then the full report of each success.
pub fn render_batch(report: &BatchReport) -> String {
    let mut lines = vec![
        format!("Batch: {}", report.name),
        format!(
            "{:<20} {:>14} {:>14} {:>6} {:>9}",
            "scenario", "water [L]", "final [L]", "IPA", "methanol"
        ),
    ];
    for entry in &report.entries {
        match (&entry.evaluation, &entry.error) {
            (Some(eval), _) => {
                let r = &eval.result;
                lines.push(format!(
                    "{:<20} {:>14.1} {:>14.1} {:>6} {:>9}",
                    entry.scenario_id, r.water_to_add_l, r.final_volume_l, r.ipa_risk, r.methanol_risk
                ));
            }
            (None, Some(err)) => {
                lines.push(format!("{:<20} error: {err}", entry.scenario_id));
            }
            (None, None) => {}
        }
    }

    let mut out = join_lines(lines);
    for eval in report.evaluations() {
        out.push('\n');
        out.push_str(&render_evaluation(eval));
    }
    out
}

pub fn render_sweep(sweep: &SweepResult) -> String {
    let mut lines = vec![
        format!(
            "Sweep over {} ({} ok, {} failed)",
            sweep.parameter, sweep.num_successful, sweep.num_failed
        ),
        format!(
            "{:>10} {:>14} {:>14} {:>12} {:>6} {:>9}",
            "value", "water [L]", "final [L]", "urea [kg]", "IPA", "methanol"
        ),
    ];
    for point in &sweep.points {
        lines.push(match &point.outcome {
            Ok(r) => format!(
                "{:>10.2} {:>14.1} {:>14.1} {:>12.2} {:>6} {:>9}",
                point.value,
                r.water_to_add_l,
                r.final_volume_l,
                as_kilograms(r.salt_mass(NitrogenSalt::Urea)),
                r.ipa_risk,
                r.methanol_risk
            ),
            Err(err) => format!("{:>10.2} rejected: {err}", point.value),
        });
    }
    join_lines(lines)
}

pub fn render_profiles(profiles: &[OperatingProfile]) -> String {
    let mut out = String::new();
    for p in profiles {
        let volume = match p.volume {
            VolumeSource::Fixed => "fixed fermentor",
            VolumeSource::PerBatch => "per batch",
        };
        let yeast = match p.yeast {
            YeastDosing::DryMass { base_rate_g_per_l } => {
                format!("dry yeast {base_rate_g_per_l} g/L")
            }
            YeastDosing::Slurry {
                default_pitch_percent,
            } => format!("slurry, default pitch {default_pitch_percent} %"),
        };
        out.push_str(&format!("{} - {}\n", p.name, p.description));
        out.push_str(&format!(
            "  TRS in {}, target in {} ({}), pH {}\n",
            p.trs_convention.source, p.trs_convention.target, p.limits.target_trs, p.limits.ph
        ));
        out.push_str(&format!(
            "  methanol pH threshold {}, Blackstrap ceiling {} g/L, volume {volume}, {yeast}\n",
            p.methanol_ph_threshold, p.target_ceiling_g_l
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_service::evaluate;
    use fd_dosing::{DosingCalculator, InputForm, MolassesGrade};

    #[test]
    fn reference_report_lists_salts_in_kg() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let eval = evaluate(&calc, "ref", "Reference", &InputForm::lab_defaults()).unwrap();
        let text = render_evaluation(&eval);

        assert!(text.contains("Water to add: 91538.5 L"));
        assert!(text.contains("Ammonium Sulfate: 109.85 kg"));
        assert!(text.contains("IPA risk: LOW"));
        assert!(!text.contains("CANNOT DILUTE"));
    }

    #[test]
    fn inverse_dilution_is_marked() {
        let calc = DosingCalculator::with_profile(OperatingProfile::lab());
        let mut form = InputForm::lab_defaults();
        form.trs = 10.0;
        let eval = evaluate(&calc, "weak", "Weak", &form).unwrap();
        assert!(render_evaluation(&eval).contains("CANNOT DILUTE"));
    }

    #[test]
    fn percent_target_is_shown_in_entered_unit() {
        let calc = DosingCalculator::with_profile(OperatingProfile::literature());
        let form = InputForm {
            trs: 40.0,
            fan_mg_l: 220.0,
            ph: 4.5,
            target_trs: 18.0,
            temperature_c: 30.0,
            grade: MolassesGrade::Blackstrap,
            volume_l: Some(10_000.0),
            yeast_pitch_percent: None,
            density_kg_l: None,
            viscosity_cp: None,
            yeast_strain: None,
        };
        let eval = evaluate(&calc, "bs", "Blackstrap", &form).unwrap();
        // clamped from 18 % to the 150 g/L ceiling
        assert!(render_evaluation(&eval).contains("target 15.0 % (150 g/L)"));
    }

    #[test]
    fn lab_target_stays_in_g_per_l() {
        assert_eq!(target_text(TrsUnit::GramsPerLiter, 130.0), "130 g/L");
    }

    #[test]
    fn profiles_render_both_builtins() {
        let text = render_profiles(&OperatingProfile::builtins());
        assert!(text.contains("lab - "));
        assert!(text.contains("literature - "));
        assert!(text.contains("slurry"));
    }
}
