use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use orbit_sim::playback::PlaybackPlan;
use orbit_sim::table::{self, TableError};
use orbit_sim::{Config, PropagationError, Propagator};

const DEFAULT_OUTPUT: &str = "orbit_data.csv";

#[derive(Parser)]
#[command(name = "orbit-sim")]
#[command(about = "Two-body satellite orbit propagator")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read altitude (km), speed (m/s, 0 = auto) and duration (s) and write
    /// the trajectory table
    Run {
        /// Read the three values from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Table destination, `-` for stdout
        #[arg(long, short, default_value = DEFAULT_OUTPUT)]
        output: String,
        /// Orbital plane tilt about +X (deg)
        #[arg(long, allow_negative_numbers = true)]
        inclination: Option<f64>,
    },
    /// Serve the simulation API and UI
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Summarize a trajectory table for playback
    Inspect { table: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match cli.command {
        Commands::Run {
            input,
            output,
            inclination,
        } => run(&config, input.as_deref(), &output, inclination),
        Commands::Serve { bind } => serve(config, bind),
        Commands::Inspect { table } => inspect(&config, &table),
    }
}

fn load_config(path: Option<&str>) -> Result<Config, ExitCode> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    Config::from_file(path).map_err(|e| {
        eprintln!("Error loading config {}: {}", path, e);
        ExitCode::FAILURE
    })
}

fn run(config: &Config, input: Option<&Path>, output: &str, inclination: Option<f64>) -> ExitCode {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut request = match table::parse_request(&text) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(deg) = inclination {
        request = request.with_inclination(deg);
    }

    let propagator = Propagator::new(config.propagator.clone());
    let trajectory = match propagator.propagate(&request) {
        Ok(t) => t,
        Err(e @ PropagationError::InvalidInput { .. }) => {
            eprintln!("Invalid input: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            return ExitCode::from(2);
        }
    };

    let written = if output == "-" {
        table::write_table(&trajectory, io::stdout().lock())
    } else {
        table::write_table_file(&trajectory, Path::new(output))
    };
    if let Err(e) = written {
        eprintln!("Error writing {}: {}", output, e);
        return ExitCode::FAILURE;
    }

    if output != "-" {
        println!("{}", trajectory.summary());
        println!("Trajectory written to {}", output);
    }
    ExitCode::SUCCESS
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn serve(mut config: Config, bind: Option<String>) -> ExitCode {
    if let Some(bind) = bind {
        config.web.bind = bind;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(orbit_sim::web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(config: &Config, path: &Path) -> ExitCode {
    let rows = match table::read_table_file(path) {
        Ok(rows) => rows,
        Err(TableError::Io(e)) => {
            eprintln!("Error: {} not found or unreadable: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error reading {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let plan = match PlaybackPlan::from_rows(&rows, &config.playback) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Loaded {} rows from {}", plan.rows, path.display());
    println!(
        "Axis range: +/-{:.1} m (max coordinate {:.1} m)",
        plan.axis_range, plan.max_abs_coordinate
    );
    println!(
        "Frames: {} every {} ms ({:.1} s of playback)",
        plan.frames.len(),
        plan.frame_interval_ms,
        plan.playback_ms() as f64 / 1000.0
    );
    if let (Some(first), Some(last)) = (plan.frames.first(), plan.frames.last()) {
        println!("  first: {}", first.label);
        println!("  last:  {}", last.label);
    }
    ExitCode::SUCCESS
}
