//! Batch evaluation of the demo scenario file.

use std::path::PathBuf;

use fd_app::{
    evaluate_batch, evaluate_file_sweep, list_scenarios, load_scenarios, render_batch,
    validate_scenarios,
};
use fd_dosing::{Advisory, RiskLevel, YeastUnit};
use fd_project::ScenarioDef;

fn demo_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("demos");
    path.push("scenarios");
    path.push("plant_week.yaml");
    path
}

#[test]
fn demo_batch_evaluates_in_file_order() {
    let file = load_scenarios(&demo_path()).expect("demo file should load");
    assert!(validate_scenarios(&file).unwrap().is_empty());

    let report = evaluate_batch(&file).unwrap();
    let ids: Vec<&str> = report.entries.iter().map(|e| e.scenario_id.as_str()).collect();
    let listed: Vec<String> = list_scenarios(&file).into_iter().map(|s| s.id).collect();
    assert_eq!(ids, listed);
    assert_eq!(report.failed(), 0);

    let by_id = |id: &str| {
        report
            .evaluations()
            .find(|e| e.scenario_id == id)
            .expect("scenario evaluated")
    };

    let reference = by_id("reference");
    assert!((reference.result.water_to_add_l - 91_538.46).abs() < 0.01);
    assert_eq!(reference.result.ipa_risk, RiskLevel::Low);

    let blackstrap = by_id("blackstrap-b");
    assert_eq!(blackstrap.result.effective_target_trs_g_l, 125.0);
    assert!((blackstrap.result.final_volume_l - 115_200.0).abs() < 1e-6);
    assert_eq!(blackstrap.result.methanol_risk, RiskLevel::High);
    assert_eq!(blackstrap.result.ipa_risk, RiskLevel::High);
    assert!(blackstrap.advisories.contains(&Advisory::TargetClamped {
        requested_g_l: 140.0,
        ceiling_g_l: 125.0
    }));

    let acidic = by_id("acidic-trial");
    assert_eq!(acidic.result.yeast_unit, YeastUnit::Liters);
    assert!((acidic.result.yeast_required - 2_205.0).abs() < 1e-6);
    assert!(acidic.advisories.contains(&Advisory::NitrogenSufficient));

    let weak = by_id("weak-feed");
    assert!(weak.result.is_inverse_dilution());
    assert!(matches!(
        weak.advisories.first(),
        Some(Advisory::InverseDilution { .. })
    ));

    let text = render_batch(&report);
    assert!(text.contains("Batch: Plant week 42"));
    assert!(text.contains("CANNOT DILUTE"));
}

#[test]
fn rejected_scenario_does_not_sink_batch() {
    let mut file = load_scenarios(&demo_path()).unwrap();
    let mut bad: ScenarioDef = file.scenarios[0].clone();
    bad.id = "too-hot".to_string();
    bad.inputs.temperature_c = 40.0;
    file.scenarios.push(bad);

    let issues = validate_scenarios(&file).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].scenario_id, "too-hot");

    let report = evaluate_batch(&file).unwrap();
    assert_eq!(report.failed(), 1);
    let entry = report.entries.last().unwrap();
    assert!(entry.error.as_deref().unwrap().contains("temperature"));
}

#[test]
fn declared_sweep_runs() {
    let file = load_scenarios(&demo_path()).unwrap();
    let sweep = evaluate_file_sweep(&file, "reference-target").unwrap();
    assert_eq!(sweep.points.len(), 7);
    assert_eq!(sweep.num_failed, 0);

    assert!(evaluate_file_sweep(&file, "nope").is_err());
}

#[test]
fn batch_report_serializes_to_json() {
    let file = load_scenarios(&demo_path()).unwrap();
    let report = evaluate_batch(&file).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["entries"][0]["evaluation"]["result"]["ipa_risk"], "LOW");
}
