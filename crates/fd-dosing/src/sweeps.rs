//! Parametric sweeps over a single form input.
//!
//! A sweep holds every other field of a base [`InputForm`] fixed and steps
//! one parameter linearly between two bounds. Each point is resolved against
//! the calculator's profile, so points outside the profile's limits are
//! recorded as failures instead of aborting the sweep.

use crate::calculator::{DosingCalculator, ProcessResult};
use crate::error::InputError;
use crate::inputs::InputForm;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Form field a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepParameter {
    TargetTrs,
    Trs,
    FanMgL,
    TemperatureC,
    Ph,
}

impl SweepParameter {
    pub fn label(self) -> &'static str {
        match self {
            Self::TargetTrs => "target TRS",
            Self::Trs => "TRS",
            Self::FanMgL => "FAN [mg/L]",
            Self::TemperatureC => "temperature [°C]",
            Self::Ph => "pH",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "target_trs" | "target" => Some(Self::TargetTrs),
            "trs" => Some(Self::Trs),
            "fan" | "fan_mg_l" => Some(Self::FanMgL),
            "temperature" | "temperature_c" | "temp" => Some(Self::TemperatureC),
            "ph" => Some(Self::Ph),
            _ => None,
        }
    }

    fn apply(self, form: &mut InputForm, value: f64) {
        match self {
            Self::TargetTrs => form.target_trs = value,
            Self::Trs => form.trs = value,
            Self::FanMgL => form.fan_mg_l = value,
            Self::TemperatureC => form.temperature_c = value,
            Self::Ph => form.ph = value,
        }
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid sweep configuration: {0}")]
    InvalidConfiguration(String),
}

/// Definition of a single parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub parameter: SweepParameter,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

impl SweepDefinition {
    pub fn new(
        parameter: SweepParameter,
        start: f64,
        end: f64,
        num_points: usize,
    ) -> Result<Self, SweepError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SweepError::InvalidConfiguration(
                "bounds must be finite".to_string(),
            ));
        }
        if num_points < 2 {
            return Err(SweepError::InvalidConfiguration(
                "sweep must have at least 2 points".to_string(),
            ));
        }
        if (start - end).abs() < 1e-12 {
            return Err(SweepError::InvalidConfiguration(
                "start and end values must be different".to_string(),
            ));
        }
        Ok(Self {
            parameter,
            start,
            end,
            num_points,
        })
    }

    /// Uniformly spaced points; the last point is exactly `end`.
    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end;
        points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub value: f64,
    pub outcome: Result<ProcessResult, InputError>,
}

#[derive(Debug, Clone)]
pub struct SweepResult {
    pub parameter: SweepParameter,
    pub points: Vec<SweepPoint>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepResult {
    /// `(value, result)` pairs for the points that computed.
    pub fn successes(&self) -> impl Iterator<Item = (f64, &ProcessResult)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.outcome.as_ref().ok().map(|r| (p.value, r)))
    }
}

pub fn run_sweep(
    calculator: &DosingCalculator,
    base: &InputForm,
    sweep: &SweepDefinition,
) -> SweepResult {
    let points: Vec<SweepPoint> = sweep
        .generate_points()
        .into_iter()
        .map(|value| {
            let mut form = base.clone();
            sweep.parameter.apply(&mut form, value);
            let outcome = calculator
                .resolve(&form)
                .map(|inputs| calculator.compute(&inputs));
            SweepPoint { value, outcome }
        })
        .collect();

    let num_successful = points.iter().filter(|p| p.outcome.is_ok()).count();
    let num_failed = points.len() - num_successful;

    SweepResult {
        parameter: sweep.parameter,
        points,
        num_successful,
        num_failed,
    }
}
