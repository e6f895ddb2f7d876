//! # Impact CLI
//!
//! Command-line driver for `impact_core`. Reads JSON request bundles, runs
//! them against the standard or a custom set of design tables and prints a
//! summary, the result JSON, or both.
//!
//! ```text
//! impact run bundle.json                   # tagged bundle {"type": "Tower", ...}
//! impact tower request.json --json         # untagged single-domain request
//! impact settlement request.json --contour # contour grid and levels
//! impact demo                              # built-in scenarios
//! impact equations                         # equation reference (markdown)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use impact_core::calculations::pipeline::{PipelineRequest, PipelineResult};
use impact_core::calculations::settlement::{
    DepthRange, PileSpec, RoadbedSpec, SettlementCalculator, SettlementRequest, SettlementResult, SoilLayer,
};
use impact_core::calculations::tower::{TowerRequest, TowerResult};
use impact_core::calculations::{CalculationItem, CalculationOutput};
use impact_core::equations::generate_equations_markdown;
use impact_core::errors::CalcError;
use impact_core::materials::SoilType;
use impact_core::DesignTables;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "impact", version, about = "Construction impact assessment for highway infrastructure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Print the result bundle as JSON instead of a summary.
    #[arg(long, global = true)]
    json: bool,
    /// Design tables JSON replacing the standard tables.
    #[arg(long, global = true)]
    tables: Option<PathBuf>,
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a tagged request bundle ({"type": "Settlement" | "Pipeline" | "Tower", ...}).
    Run { bundle: PathBuf },
    /// Runs an untagged settlement request.
    Settlement {
        request: PathBuf,
        /// Print the contour grid and levels as JSON instead of the result.
        #[arg(long)]
        contour: bool,
    },
    /// Runs an untagged pipe-jacking request.
    Pipeline { request: PathBuf },
    /// Runs an untagged tower foundation request.
    Tower { request: PathBuf },
    /// Runs the built-in demonstration scenarios.
    Demo,
    /// Prints the equation reference as markdown.
    Equations,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if let Some(calc_error) = err.downcast_ref::<CalcError>() {
                if let Ok(json) = serde_json::to_string_pretty(calc_error) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let tables = load_tables(cli.tables.as_deref())?;

    let outputs = match &cli.command {
        Commands::Run { bundle } => {
            let text = read(bundle)?;
            let item = CalculationItem::from_json(&text)?;
            info!(calc_type = item.calc_type(), label = item.label(), "running bundle");
            vec![item.run(&tables)?]
        }
        Commands::Settlement { request, contour: true } => {
            let result = SettlementCalculator::new(&tables).calculate(&parse(request)?)?;
            println!("{}", serde_json::to_string_pretty(&result.contour_data())?);
            return Ok(());
        }
        Commands::Settlement { request, contour: false } => {
            vec![CalculationItem::Settlement(parse(request)?).run(&tables)?]
        }
        Commands::Pipeline { request } => vec![CalculationItem::Pipeline(parse(request)?).run(&tables)?],
        Commands::Tower { request } => vec![CalculationItem::Tower(parse(request)?).run(&tables)?],
        Commands::Demo => demo_scenarios()
            .iter()
            .map(|item| item.run(&tables))
            .collect::<Result<Vec<_>, _>>()?,
        Commands::Equations => {
            print!("{}", generate_equations_markdown());
            return Ok(());
        }
    };

    if cli.json {
        let json = if outputs.len() == 1 {
            serde_json::to_string_pretty(&outputs[0])?
        } else {
            serde_json::to_string_pretty(&outputs)?
        };
        println!("{}", json);
    } else {
        for output in &outputs {
            print_summary(output);
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read(path)?;
    let value = serde_json::from_str(&text).map_err(|e| CalcError::from_json_error(&e))?;
    Ok(value)
}

fn load_tables(path: Option<&Path>) -> Result<DesignTables> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading design tables");
            let tables = DesignTables::from_json(&read(path)?)
                .with_context(|| format!("invalid design tables in {}", path.display()))?;
            Ok(tables)
        }
        None => Ok(DesignTables::standard().clone()),
    }
}

fn demo_scenarios() -> Vec<CalculationItem> {
    let layer = |start: f64, end: f64, name: &str, e: f64, nu: f64| {
        SoilLayer::new(DepthRange { start_m: start, end_m: end }, name, e, nu)
    };
    vec![
        CalculationItem::Settlement(SettlementRequest {
            label: "Scenario A - overpass piles".to_string(),
            pile1: PileSpec { diameter_m: 1.0, length_m: 20.0, load_kn: 1000.0 },
            pile2: PileSpec { diameter_m: 1.2, length_m: 25.0, load_kn: 1200.0 },
            roadbed: RoadbedSpec { width_m: 12.0, pile1_distance_m: 6.0, pile2_distance_m: 8.0 },
            soil_layers: vec![
                layer(0.0, 5.0, "Clay", 10.0, 0.35),
                layer(5.0, 10.0, "Sand", 15.0, 0.30),
                layer(10.0, 15.0, "Clay", 12.0, 0.35),
                layer(15.0, 20.0, "Sand", 18.0, 0.28),
            ],
            road_classification: "first-class highway".to_string(),
        }),
        CalculationItem::Pipeline(PipelineRequest {
            label: "Reference pipe jacking".to_string(),
            ..PipelineRequest::new(1.0, 100.0, 2.0)
        }),
        CalculationItem::Tower(TowerRequest {
            label: "Scenario B - tower foundation".to_string(),
            tower_load_kn: 500.0,
            horizontal_force_kn: 50.0,
            force_height_m: 15.0,
            base_weight_kn: 200.0,
            base_width_m: 2.0,
            base_length_m: 3.0,
            embedment_depth_m: 1.5,
            soil: SoilType::Clay,
        }),
    ]
}

// ============================================================================
// Summaries
// ============================================================================

fn print_summary(output: &CalculationOutput) {
    println!("═══════════════════════════════════════");
    println!("  {} - {}", output.calc_type().to_uppercase(), output.label());
    println!("═══════════════════════════════════════");
    match output {
        CalculationOutput::Settlement(r) => print_settlement(r),
        CalculationOutput::Pipeline(r) => print_pipeline(r),
        CalculationOutput::Tower(r) => print_tower(r),
    }
    println!();
    println!("Recommendations:");
    for (i, rec) in output.recommendations().iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
    println!();
    println!("  RESULT: {} ({})", if output.passes() { "PASS" } else { "FAIL" }, output.level());
    println!();
}

fn print_settlement(r: &SettlementResult) {
    let s = &r.safety;
    println!("Classification: {}", s.classification.display_name());
    println!(
        "Piles at x = {:.1} m and {:.1} m (spacing {:.1} m, interaction {:.3})",
        r.layout.pile1_x_m, r.layout.pile2_x_m, r.layout.spacing_m, r.layout.interaction_factor
    );
    println!();
    println!("Settlement:");
    println!("  Max:  {:.2} mm at {}", r.statistics.max_settlement_mm, r.statistics.max_point_id);
    println!("  Mean: {:.2} mm", r.statistics.mean_settlement_mm);
    println!();
    println!("Limits:");
    println!("  Approach: {:>6.0} mm {}", s.limits.approach_limit_mm, status_icon(!s.exceeds_approach));
    println!("  Bridge:   {:>6.0} mm {}", s.limits.bridge_limit_mm, status_icon(!s.exceeds_bridge));
    println!("  General:  {:>6.0} mm {}", s.limits.general_limit_mm, status_icon(!s.exceeds_general));
    if r.used_fallback {
        println!();
        println!("  Note: default soil layer or road classification was used");
    }
    for warning in r.advisories.iter().chain(&r.physics_check.warnings) {
        println!("  Note: {}", warning);
    }
}

fn print_pipeline(r: &PipelineResult) {
    let p = &r.push_force;
    println!("Push force: {:.1} kN (K = {:.2})", p.total_kn, p.safety_factor);
    println!(
        "  F1 = {:.1} kN, F2 = {:.1} kN, F3 = {:.1} kN",
        p.friction_resistance_kn, p.face_resistance_kn, p.joint_resistance_kn
    );
    println!();
    println!("Checks:");
    println!(
        "  Strength:    {:.1} / {:.1} kN {}",
        p.total_kn,
        r.pipe_capacity_kn,
        status_icon(r.checks.strength)
    );
    println!(
        "  Work well:   {:.1} / {:.1} kN {}",
        p.total_kn,
        r.backstop_capacity_kn,
        status_icon(r.checks.work_well)
    );
    println!(
        "  Hoop stress: {:.0} / {:.0} kPa {}",
        r.response.hoop_stress_kpa,
        r.response.allowable_stress_kpa,
        status_icon(r.checks.stress)
    );
    println!(
        "  Deformation: {:.1} / {:.1} mm {}",
        r.response.deformation_mm,
        r.response.allowable_deformation_mm,
        status_icon(r.checks.deformation)
    );
}

fn print_tower(r: &TowerResult) {
    for case in [&r.normal, &r.extreme] {
        println!("{} load case:", case.case);
        println!(
            "  Bearing:     {:.1} / {:.1} kPa {}",
            case.max_pressure_kpa,
            case.bearing_capacity_kpa,
            status_icon(case.bearing_check)
        );
        println!(
            "  Overturning: {:.2} (≥ {:.2}) {}",
            case.overturning_factor,
            case.required_overturning_factor,
            status_icon(case.overturning_check)
        );
        println!(
            "  Sliding:     {:.2} (≥ {:.2}) {}",
            case.sliding_factor,
            case.required_sliding_factor,
            status_icon(case.sliding_check)
        );
    }
    if r.base_separation {
        println!("  Note: base separation under the normal load case");
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}
