//! conslaw2d CLI - run finite-volume test problems on polygonal meshes.
//!
//! Usage: conslaw2d <COMMAND> [OPTIONS] <MESH>
//!
//! Run `conslaw2d --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nalgebra::{Vector3, Vector4};

use conslaw2d::flux::{AcousticGodunov, Hll, Hllc, LaxFriedrichs, NumericalFlux, Roe, Rusanov};
use conslaw2d::io::{self, ReaderOptions};
use conslaw2d::mesh::PolygonalMesh;
use conslaw2d::model::{ConservationLaw, Euler, LinearAcoustics, ShallowWater};
use conslaw2d::solver::{
    reflective, transparent, BoundaryContext, FiniteVolume, FrameFormat, SolverOptions,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const GAMMA: f64 = 1.4;

#[derive(Parser)]
#[command(name = "conslaw2d")]
#[command(author, version, about = "Finite-volume solver for 2D conservation laws", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        mesh: PathBuf,

        /// Reject boundary edges that match no mesh edge
        #[arg(long)]
        strict_edges: bool,
    },

    /// Run a test problem
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Test problem
    #[arg(value_enum)]
    scenario: Scenario,

    /// Input mesh file
    mesh: PathBuf,

    /// Number of time steps (default depends on the problem)
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Write a frame every this many steps
    #[arg(short, long, default_value = "50")]
    every: usize,

    /// Courant number (default depends on the problem)
    #[arg(short, long)]
    cfl: Option<f64>,

    /// Directory for solution frames
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Frame layout
    #[arg(short, long, value_enum, default_value = "cells")]
    format: OutputFormat,

    /// Numerical flux (default depends on the problem)
    #[arg(long, value_enum)]
    flux: Option<FluxKind>,

    /// Reject boundary edges that match no mesh edge
    #[arg(long)]
    strict_edges: bool,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Gaussian pressure pulse (linear acoustics)
    AcousticWave,
    /// Circular dam break (shallow water)
    DamBreak,
    /// Sod shock tube (Euler)
    Sod,
    /// Shock hitting a light gas bubble (Euler)
    ShockBubble,
    /// Oblique shock reflected by a wall (Euler)
    ShockReflection,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FluxKind {
    /// Lax-Friedrichs (all models)
    LaxFriedrichs,
    /// Exact Riemann solver (acoustics)
    Godunov,
    /// Local Lax-Friedrichs (Euler)
    Rusanov,
    /// HLL (Euler)
    Hll,
    /// HLLC (Euler)
    Hllc,
    /// Roe with entropy fix (Euler)
    Roe,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Flat-shaded triangles
    Cells,
    /// Triangles with vertex-averaged values
    Interpolated,
    /// First primitive variable at each vertex
    Vertex,
}

impl From<OutputFormat> for FrameFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Cells => FrameFormat::Cells,
            OutputFormat::Interpolated => FrameFormat::Interpolated,
            OutputFormat::Vertex => FrameFormat::VertexValues,
        }
    }
}

impl Scenario {
    fn default_steps(self) -> usize {
        match self {
            Scenario::AcousticWave | Scenario::DamBreak => 1000,
            Scenario::Sod => 501,
            Scenario::ShockBubble => 5000,
            Scenario::ShockReflection => 3001,
        }
    }

    fn default_cfl(self) -> f64 {
        match self {
            Scenario::ShockReflection => 0.3,
            _ => 0.1,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Info { mesh, strict_edges } => cmd_info(&mesh, strict_edges)?,
        Commands::Run(args) => cmd_run(&args)?,
    }
    Ok(())
}

fn load_mesh(path: &Path, strict_edges: bool) -> CliResult<PolygonalMesh> {
    let options = ReaderOptions::new().with_strict_boundary_edges(strict_edges);
    let start = Instant::now();
    let mesh = io::load_with(path, &options)?;
    println!("Loaded: {} ({:.2?})", path.display(), start.elapsed());
    Ok(mesh)
}

fn cmd_info(input: &Path, strict_edges: bool) -> CliResult<()> {
    let mesh = load_mesh(input, strict_edges)?;

    println!("{}", mesh.stats());

    println!("Total area: {:.6}", mesh.total_area());
    if let Some((min_area, max_area)) = area_range(&mesh) {
        println!("Polygon area range: [{:.6}, {:.6}]", min_area, max_area);
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}) to ({:.3}, {:.3})",
            min.x, min.y, max.x, max.y
        );
    }

    if !mesh.is_valid() {
        println!("Warning: mesh connectivity is inconsistent");
    }

    Ok(())
}

/// Smallest and largest polygon area, if there are any polygons.
fn area_range(mesh: &PolygonalMesh) -> Option<(f64, f64)> {
    mesh.polygon_ids()
        .map(|p| mesh.polygon_area(p))
        .fold(None, |range, area| match range {
            None => Some((area, area)),
            Some((lo, hi)) => Some((f64::min(lo, area), f64::max(hi, area))),
        })
}

fn cmd_run(args: &RunArgs) -> CliResult<()> {
    let mesh = load_mesh(&args.mesh, args.strict_edges)?;
    if args.every == 0 {
        return Err("--every must be at least 1".into());
    }

    let scenario = args.scenario;
    match scenario {
        Scenario::AcousticWave => {
            let model = LinearAcoustics::new(1.0, 1.0);
            match args.flux.unwrap_or(FluxKind::Godunov) {
                FluxKind::Godunov => {
                    simulate(model, AcousticGodunov, &mesh, acoustic_pulse, transparent, args)
                }
                FluxKind::LaxFriedrichs => {
                    simulate(model, LaxFriedrichs, &mesh, acoustic_pulse, transparent, args)
                }
                other => Err(unsupported(other, scenario)),
            }
        }
        Scenario::DamBreak => match args.flux.unwrap_or(FluxKind::LaxFriedrichs) {
            FluxKind::LaxFriedrichs => simulate(
                ShallowWater::default(),
                LaxFriedrichs,
                &mesh,
                dam_break,
                dam_break_walls,
                args,
            ),
            other => Err(unsupported(other, scenario)),
        },
        Scenario::Sod => run_euler(&mesh, sod, transparent, args),
        Scenario::ShockBubble => run_euler(&mesh, shock_bubble, transparent, args),
        Scenario::ShockReflection => run_euler(&mesh, oblique_shock, shock_reflection_bc, args),
    }
}

fn run_euler<IC, BC>(mesh: &PolygonalMesh, initial: IC, boundary: BC, args: &RunArgs) -> CliResult<()>
where
    IC: Fn(usize, f64, f64) -> Vector4<f64> + Send + Sync + 'static,
    BC: Fn(&BoundaryContext, &Vector4<f64>) -> Vector4<f64> + Send + Sync + 'static,
{
    let model = Euler::new(GAMMA);
    match args.flux.unwrap_or(FluxKind::Roe) {
        FluxKind::LaxFriedrichs => simulate(model, LaxFriedrichs, mesh, initial, boundary, args),
        FluxKind::Rusanov => simulate(model, Rusanov, mesh, initial, boundary, args),
        FluxKind::Hll => simulate(model, Hll, mesh, initial, boundary, args),
        FluxKind::Hllc => simulate(model, Hllc, mesh, initial, boundary, args),
        FluxKind::Roe => simulate(model, Roe, mesh, initial, boundary, args),
        other => Err(unsupported(other, args.scenario)),
    }
}

fn unsupported(flux: FluxKind, scenario: Scenario) -> Box<dyn std::error::Error> {
    format!("flux {:?} is not available for {:?}", flux, scenario).into()
}

fn simulate<M, F, IC, BC>(
    model: M,
    flux: F,
    mesh: &PolygonalMesh,
    initial: IC,
    boundary: BC,
    args: &RunArgs,
) -> CliResult<()>
where
    M: ConservationLaw,
    F: NumericalFlux<M>,
    IC: Fn(usize, f64, f64) -> M::State + Send + Sync + 'static,
    BC: Fn(&BoundaryContext, &M::State) -> M::State + Send + Sync + 'static,
{
    let steps = args.steps.unwrap_or_else(|| args.scenario.default_steps());
    let cfl = args.cfl.unwrap_or_else(|| args.scenario.default_cfl());
    let options = SolverOptions::default()
        .with_cfl(cfl)
        .with_parallel(!args.sequential);

    let mut solver = FiniteVolume::new(model, flux, mesh, initial)
        .with_boundary_condition(boundary)
        .with_options(options)?;
    solver.init();

    let mode = if args.sequential { "sequential" } else { "parallel" };
    println!(
        "Running {:?} ({} steps, cfl={}, {})...",
        args.scenario, steps, cfl, mode
    );

    let start = Instant::now();
    for step in 0..steps {
        solver.timestep()?;
        if step % args.every == 0 {
            solver.save_frame(&args.output, step / args.every, args.format.into())?;
        }
        show_progress(step + 1, steps, solver.time());
    }
    let elapsed = start.elapsed();

    println!(
        "Done: t = {:.6} after {} steps ({:.2?}), frames in {}",
        solver.time(),
        steps,
        elapsed,
        args.output.display()
    );
    Ok(())
}

/// Draw a progress bar on the terminal.
fn show_progress(current: usize, total: usize, time: f64) {
    if total == 0 {
        return;
    }
    let percent = ((current * 100) + (total / 2)) / total;
    let previous = (((current - 1) * 100) + (total / 2)) / total;
    if percent == previous && current < total {
        return;
    }

    let bar_width = 30;
    let filled = (percent * bar_width) / 100;
    let bar = "=".repeat(filled);
    let space = " ".repeat(bar_width - filled);

    eprint!("\r[{}{}] {:3}% t={:.4e}", bar, space, percent, time);
    let _ = std::io::stderr().flush();

    if current >= total {
        eprintln!();
    }
}

// ==================== Test problems ====================

fn acoustic_pulse(_tag: usize, x: f64, y: f64) -> Vector3<f64> {
    Vector3::new(2.0 * (-80.0 * (x * x + y * y)).exp(), 0.0, 0.0)
}

fn dam_break(_tag: usize, x: f64, _y: f64) -> Vector3<f64> {
    Vector3::new(if x < 0.0 { 4.0 } else { 1.0 }, 0.0, 0.0)
}

fn dam_break_walls(ctx: &BoundaryContext, w: &Vector3<f64>) -> Vector3<f64> {
    match ctx.tag {
        8 | 10 | 11 | 13 | 15 | 18 => reflective(ctx, w),
        _ => *w,
    }
}

fn sod(_tag: usize, x: f64, _y: f64) -> Vector4<f64> {
    if x < 0.0 {
        Vector4::new(1.0, 0.75, 0.0, 1.0)
    } else {
        Vector4::new(0.125, 0.0, 0.0, 0.1)
    }
}

/// Still gas at unit density and pressure, hit by a shock of pressure ratio 10
/// coming from the left, with a light bubble of radius 0.2 centred at `(0.5, 0)`.
fn shock_bubble(_tag: usize, x: f64, y: f64) -> Vector4<f64> {
    let (rho_out, u_out, p_out) = (1.0, 0.0, 1.0);
    let p_inf = 10.0;

    // Post-shock state from the Rankine-Hugoniot relations
    let c_out = (GAMMA * p_out / rho_out).sqrt();
    let speed = u_out
        + c_out * ((GAMMA + 1.0) / (2.0 * GAMMA) * (p_inf / p_out) + (GAMMA - 1.0) / (2.0 * GAMMA)).sqrt();
    let rel = (u_out - speed).powi(2);
    let rho_inf = rho_out * ((GAMMA + 1.0) * rel) / ((GAMMA - 1.0) * rel + 2.0 * GAMMA * p_out / rho_out);
    let u_inf = (1.0 - rho_out / rho_inf) * speed + u_out * rho_out / rho_inf;

    if (x - 0.5).powi(2) + y * y < 0.2 * 0.2 {
        Vector4::new(0.1, 0.0, 0.0, 1.0)
    } else if x > 0.2 {
        Vector4::new(rho_out, u_out, 0.0, p_out)
    } else {
        Vector4::new(rho_inf, u_inf, 0.0, p_inf)
    }
}

fn oblique_shock(_tag: usize, _x: f64, _y: f64) -> Vector4<f64> {
    Vector4::new(1.4, 2.9, 0.0, 1.0)
}

fn shock_reflection_bc(ctx: &BoundaryContext, w: &Vector4<f64>) -> Vector4<f64> {
    match ctx.tag {
        0 => reflective(ctx, w),
        2 => Vector4::new(2.4739, 2.5876, -0.5438, 2.2685),
        3 => oblique_shock(ctx.tag, ctx.midpoint.x, ctx.midpoint.y),
        _ => *w,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "conslaw2d", "run", "sod", "tube.msh", "--steps", "10", "--flux", "hllc", "--format",
            "interpolated",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.scenario, Scenario::Sod);
                assert_eq!(args.steps, Some(10));
                assert_eq!(args.flux, Some(FluxKind::Hllc));
                assert_eq!(args.every, 50);
                assert!(args.format == OutputFormat::Interpolated);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_area_range() {
        let empty: PolygonalMesh = PolygonalMesh::new();
        assert_eq!(area_range(&empty), None);

        let positions = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(3.0, 0.0),
        ];
        let mesh: PolygonalMesh =
            conslaw2d::mesh::build_from_polygons(&positions, &[vec![0usize, 1, 2, 3], vec![1, 4, 2]])
                .unwrap();
        assert_eq!(area_range(&mesh), Some((0.5, 2.0)));
    }

    #[test]
    fn test_shock_bubble_post_shock_state() {
        let w = shock_bubble(0, -1.0, 0.0);
        // Pressure ratio 10 in air gives a density ratio of about 3.8
        assert!((w[0] - 3.8).abs() < 0.05);
        assert!(w[1] > 0.0);
        assert_eq!(w[3], 10.0);

        assert_eq!(shock_bubble(0, 0.5, 0.0)[0], 0.1);
        assert_eq!(shock_bubble(0, 0.9, 0.0)[0], 1.0);
    }

    #[test]
    fn test_dam_break_walls() {
        let ctx = BoundaryContext {
            tag: 8,
            midpoint: Point2::origin(),
            normal: Vector2::new(1.0, 0.0),
            time: 0.0,
        };
        let w = Vector3::new(2.0, 1.0, 0.5);
        assert_eq!(dam_break_walls(&ctx, &w), Vector3::new(2.0, -1.0, 0.5));

        let open = BoundaryContext { tag: 1, ..ctx };
        assert_eq!(dam_break_walls(&open, &w), w);
    }
}
