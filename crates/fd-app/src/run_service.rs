//! Scenario evaluation.
//!
//! Each evaluation is an independent pure computation, so batches fan out
//! over rayon's pool; output order follows the scenario file.

use fd_dosing::{
    Advisory, DosingCalculator, InputForm, ProcessInputs, ProcessResult, SweepDefinition,
    SweepResult, run_sweep,
};
use fd_project::ScenarioFile;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::scenario_service::calculator_for;

/// One computed scenario with everything a report needs.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub scenario_id: String,
    pub scenario_name: String,
    pub profile: String,
    pub form: InputForm,
    pub inputs: ProcessInputs,
    pub result: ProcessResult,
    pub advisories: Vec<Advisory>,
}

/// Batch outcome for one scenario; exactly one of the two is set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub scenario_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub name: String,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn evaluations(&self) -> impl Iterator<Item = &Evaluation> {
        self.entries.iter().filter_map(|e| e.evaluation.as_ref())
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }
}

/// Resolve, compute and assess a single form.
pub fn evaluate(
    calculator: &DosingCalculator,
    scenario_id: &str,
    scenario_name: &str,
    form: &InputForm,
) -> AppResult<Evaluation> {
    let inputs = calculator.resolve(form).inspect_err(|err| {
        tracing::warn!(scenario = scenario_id, error = %err, "inputs rejected");
    })?;
    let result = calculator.compute(&inputs);
    let advisories = calculator.assess(&inputs, &result);

    tracing::debug!(
        scenario = scenario_id,
        profile = %calculator.profile().name,
        final_volume_l = result.final_volume_l,
        water_to_add_l = result.water_to_add_l,
        ipa = %result.ipa_risk,
        methanol = %result.methanol_risk,
        "scenario evaluated"
    );
    if result.is_inverse_dilution() {
        tracing::warn!(
            scenario = scenario_id,
            water_to_add_l = result.water_to_add_l,
            "target TRS is above source TRS"
        );
    }

    Ok(Evaluation {
        scenario_id: scenario_id.to_string(),
        scenario_name: scenario_name.to_string(),
        profile: calculator.profile().name.clone(),
        form: form.clone(),
        inputs,
        result,
        advisories,
    })
}

/// Evaluate every scenario in the file in parallel.
///
/// A scenario with rejected inputs becomes an error entry; the batch only
/// fails as a whole when a profile reference cannot be resolved.
pub fn evaluate_batch(file: &ScenarioFile) -> AppResult<BatchReport> {
    let calculators: Vec<DosingCalculator> = file
        .scenarios
        .iter()
        .map(|s| calculator_for(file, &s.profile))
        .collect::<AppResult<_>>()?;

    let entries: Vec<BatchEntry> = file
        .scenarios
        .par_iter()
        .zip(calculators.par_iter())
        .map(|(scenario, calc)| {
            match evaluate(calc, &scenario.id, &scenario.name, &scenario.inputs) {
                Ok(evaluation) => BatchEntry {
                    scenario_id: scenario.id.clone(),
                    evaluation: Some(evaluation),
                    error: None,
                },
                Err(err) => BatchEntry {
                    scenario_id: scenario.id.clone(),
                    evaluation: None,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect();

    let report = BatchReport {
        name: file.name.clone(),
        entries,
    };
    tracing::info!(
        scenarios = report.entries.len(),
        failed = report.failed(),
        "batch evaluated"
    );
    Ok(report)
}

/// Run an ad-hoc sweep around `base`.
pub fn evaluate_sweep(
    calculator: &DosingCalculator,
    base: &InputForm,
    sweep: &SweepDefinition,
) -> AppResult<SweepResult> {
    // Re-check in case the definition was built field by field.
    SweepDefinition::new(sweep.parameter, sweep.start, sweep.end, sweep.num_points)?;
    let result = run_sweep(calculator, base, sweep);
    tracing::debug!(
        parameter = %sweep.parameter,
        ok = result.num_successful,
        failed = result.num_failed,
        "sweep evaluated"
    );
    Ok(result)
}

/// Run a sweep declared in the scenario file.
pub fn evaluate_file_sweep(file: &ScenarioFile, sweep_id: &str) -> AppResult<SweepResult> {
    let def = file
        .sweeps
        .iter()
        .find(|s| s.id == sweep_id)
        .ok_or_else(|| AppError::SweepNotFound(sweep_id.to_string()))?;
    let scenario = file
        .scenario(&def.scenario_id)
        .ok_or_else(|| AppError::ScenarioNotFound(def.scenario_id.clone()))?;
    let calc = calculator_for(file, &scenario.profile)?;
    evaluate_sweep(&calc, &scenario.inputs, &def.sweep)
}
