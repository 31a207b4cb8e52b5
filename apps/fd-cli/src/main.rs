use clap::{Args, Parser, Subcommand};
use fd_app::{
    AppError, AppResult, evaluate, evaluate_batch, evaluate_file_sweep, evaluate_sweep,
    load_scenarios, render_batch, render_evaluation, render_profiles, render_sweep,
    resolve_profile, validate_scenarios,
};
use fd_dosing::{
    DosingCalculator, DosingConstants, InputForm, MolassesGrade, OperatingProfile,
    SweepDefinition, SweepParameter, SweepResult,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fd-cli")]
#[command(about = "fermdose CLI - molasses dilution, nutrient and yeast dosing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute dosing for one set of inputs
    Compute {
        #[command(flatten)]
        form: FormArgs,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every scenario in a scenario file
    Batch {
        /// Path to the scenario YAML (or .json) file
        scenario_path: PathBuf,
        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate scenario file structure and scenario inputs
    Validate {
        /// Path to the scenario YAML (or .json) file
        scenario_path: PathBuf,
    },
    /// List built-in operating profiles
    Profiles,
    /// Sweep one input and tabulate the results
    Sweep {
        #[command(flatten)]
        form: FormArgs,
        /// Parameter to vary (target-trs, trs, fan, temperature, ph)
        #[arg(long, value_parser = parse_parameter)]
        parameter: SweepParameter,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        /// Number of points, endpoints included
        #[arg(long, default_value_t = 5)]
        points: usize,
        /// Output CSV file path (optional, defaults to a table on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a sweep declared in a scenario file
    SweepFile {
        /// Path to the scenario YAML (or .json) file
        scenario_path: PathBuf,
        /// Sweep ID
        sweep_id: String,
        /// Output CSV file path (optional, defaults to a table on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Input form fields; defaults are the lab form's.
#[derive(Args)]
struct FormArgs {
    /// Operating profile (lab, literature)
    #[arg(long, default_value = "lab")]
    profile: String,
    /// Molasses TRS, in the profile's source unit
    #[arg(long, default_value_t = 18.0)]
    trs: f64,
    /// Molasses FAN [mg/L]
    #[arg(long, default_value_t = 150.0)]
    fan: f64,
    /// Molasses pH
    #[arg(long, default_value_t = 7.2)]
    ph: f64,
    /// Target TRS after dilution, in the profile's target unit
    #[arg(long, default_value_t = 130.0)]
    target: f64,
    /// Fermentation temperature [°C]
    #[arg(long, default_value_t = 30.0)]
    temp: f64,
    /// Molasses grade (clean, grade1, grade2, blackstrap)
    #[arg(long, default_value = "clean", value_parser = parse_grade)]
    grade: MolassesGrade,
    /// Batch volume [L]; required by per-batch profiles
    #[arg(long)]
    volume: Option<f64>,
    /// Yeast pitch [% of diluted volume], slurry profiles only
    #[arg(long)]
    pitch: Option<f64>,
    /// Molasses density [kg/L], display only
    #[arg(long)]
    density: Option<f64>,
    /// Molasses viscosity [cP], display only
    #[arg(long)]
    viscosity: Option<f64>,
    /// Yeast strain label, display only
    #[arg(long)]
    strain: Option<String>,
}

impl FormArgs {
    fn calculator(&self) -> AppResult<DosingCalculator> {
        let profile = resolve_profile(None, &self.profile)?;
        Ok(DosingCalculator::new(profile, DosingConstants::default()))
    }

    fn form(&self) -> InputForm {
        InputForm {
            trs: self.trs,
            fan_mg_l: self.fan,
            ph: self.ph,
            target_trs: self.target,
            temperature_c: self.temp,
            grade: self.grade,
            volume_l: self.volume,
            yeast_pitch_percent: self.pitch,
            density_kg_l: self.density,
            viscosity_cp: self.viscosity,
            yeast_strain: self.strain.clone(),
        }
    }
}

fn parse_grade(text: &str) -> Result<MolassesGrade, String> {
    MolassesGrade::parse(text).ok_or_else(|| format!("unknown molasses grade '{text}'"))
}

fn parse_parameter(text: &str) -> Result<SweepParameter, String> {
    SweepParameter::parse(text).ok_or_else(|| format!("unknown sweep parameter '{text}'"))
}

fn main() -> AppResult<()> {
    // Initialize tracing; diagnostics go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compute { form, json } => cmd_compute(&form, json),
        Commands::Batch {
            scenario_path,
            json,
        } => cmd_batch(&scenario_path, json),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Profiles => cmd_profiles(),
        Commands::Sweep {
            form,
            parameter,
            start,
            end,
            points,
            output,
        } => cmd_sweep(&form, parameter, start, end, points, output.as_deref()),
        Commands::SweepFile {
            scenario_path,
            sweep_id,
            output,
        } => cmd_sweep_file(&scenario_path, &sweep_id, output.as_deref()),
    }
}

fn cmd_compute(args: &FormArgs, json: bool) -> AppResult<()> {
    let calc = args.calculator()?;
    let eval = evaluate(&calc, "cli", "Command line inputs", &args.form())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
    } else {
        print!("{}", render_evaluation(&eval));
    }
    Ok(())
}

fn cmd_batch(scenario_path: &Path, json: bool) -> AppResult<()> {
    let file = load_scenarios(scenario_path)?;
    tracing::debug!(path = %scenario_path.display(), "evaluating batch");
    let report = evaluate_batch(&file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_batch(&report));
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario file: {}", scenario_path.display());
    let file = load_scenarios(scenario_path)?;
    let issues = validate_scenarios(&file)?;

    if issues.is_empty() {
        println!("✓ Scenario file is valid ({} scenarios)", file.scenarios.len());
        return Ok(());
    }
    for issue in &issues {
        println!("  {}: {}", issue.scenario_id, issue.message);
    }
    Err(AppError::InvalidInput(format!(
        "{} scenario(s) have rejected inputs",
        issues.len()
    )))
}

fn cmd_profiles() -> AppResult<()> {
    print!("{}", render_profiles(&OperatingProfile::builtins()));
    Ok(())
}

fn cmd_sweep(
    args: &FormArgs,
    parameter: SweepParameter,
    start: f64,
    end: f64,
    points: usize,
    output: Option<&Path>,
) -> AppResult<()> {
    let calc = args.calculator()?;
    let sweep = SweepDefinition::new(parameter, start, end, points)?;
    let result = evaluate_sweep(&calc, &args.form(), &sweep)?;
    emit_sweep(&result, output)
}

fn cmd_sweep_file(scenario_path: &Path, sweep_id: &str, output: Option<&Path>) -> AppResult<()> {
    let file = load_scenarios(scenario_path)?;
    let result = evaluate_file_sweep(&file, sweep_id)?;
    emit_sweep(&result, output)
}

fn emit_sweep(result: &SweepResult, output: Option<&Path>) -> AppResult<()> {
    let Some(path) = output else {
        print!("{}", render_sweep(result));
        return Ok(());
    };

    // Build CSV; rejected points are left out
    let mut csv = String::from(
        "value,final_volume_l,water_to_add_l,ammonium_sulfate_g,urea_g,dap_g,yeast_required,ipa_risk,methanol_risk\n",
    );
    for (value, r) in result.successes() {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            value,
            r.final_volume_l,
            r.water_to_add_l,
            r.ammonium_sulfate_g,
            r.urea_g,
            r.dap_g,
            r.yeast_required,
            r.ipa_risk,
            r.methanol_risk
        ));
    }
    std::fs::write(path, csv)?;
    println!(
        "✓ Exported {} sweep points to {}",
        result.num_successful,
        path.display()
    );
    Ok(())
}
