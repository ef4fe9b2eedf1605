//! Graftmeter command line entry point.
//!
//! # Usage
//!
//! ```bash
//! graftmeter report session.json
//! graftmeter calibrate 12 40 130 40 --length 2
//! graftmeter area 0 0 100 0 100 100 0 100 --scale 50
//! graftmeter dims scalp.jpg
//! graftmeter config --write
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use graftmeter::constants::DEFAULT_REFERENCE_LENGTH_CM;
use graftmeter::geometry::{calibrate_reference, physical_area, shoelace_area};
use graftmeter::model::{ImageInfo, points_from_flat};
use graftmeter::{CalibrationScale, MeasureConfig, MeasureError, MeasurementSession, Point, format};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "graftmeter")]
#[command(about = "Calibrated area and graft-count measurement", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the regions and total count of a saved session
    Report {
        /// Session snapshot (.json)
        path: PathBuf,
    },

    /// Print the scale of a reference segment in pixels per cm
    #[command(allow_negative_numbers = true)]
    Calibrate {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,

        /// Physical length of the segment in cm
        #[arg(long, default_value_t = DEFAULT_REFERENCE_LENGTH_CM)]
        length: f64,
    },

    /// Print the shoelace area of a polygon given as x y pairs
    #[command(allow_negative_numbers = true)]
    Area {
        /// Vertex coordinates in image pixels: x0 y0 x1 y1 ...
        #[arg(required = true, num_args = 6..)]
        coords: Vec<f64>,

        /// Pixels per cm; also prints the physical area when given
        #[arg(long)]
        scale: Option<f64>,
    },

    /// Print an image's native dimensions
    Dims {
        /// Image file
        path: PathBuf,
    },

    /// Print the active configuration and where it is stored
    Config {
        /// Write the active configuration to the default path
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let config = MeasureConfig::load_from_default_path().unwrap_or_default();
    init_logging(&config);

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Report { path } => report(&path, &config),
        Commands::Calibrate {
            x1,
            y1,
            x2,
            y2,
            length,
        } => calibrate(Point::new(x1, y1), Point::new(x2, y2), length),
        Commands::Area { coords, scale } => area(&coords, scale, &config),
        Commands::Dims { path } => dims(&path),
        Commands::Config { write } => show_config(&config, write),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` overrides the configured level.
fn init_logging(config: &MeasureConfig) {
    let level = config.log_level.to_level_filter();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format_timestamp(None)
        .init();
}

fn report(path: &Path, config: &MeasureConfig) -> CliResult {
    let snapshot = format::import(path)?;
    let session = MeasurementSession::from_snapshot(snapshot, config)?;

    if let Some(image) = session.image() {
        println!("{} ({}x{})", image.name, image.width, image.height);
    }

    match session.summaries() {
        Ok(summaries) => {
            for summary in &summaries {
                println!("#{} {}", summary.id, summary.describe());
            }
            println!(
                "Total: {} grafts in {} regions",
                session.total_count()?,
                summaries.len()
            );
        }
        Err(MeasureError::MissingCalibration) => {
            for region in session.regions() {
                println!(
                    "#{} {} points – {:.1} px² ({})",
                    region.id(),
                    region.boundary().len(),
                    region.area_pixels(),
                    region.color()
                );
            }
            println!("Not calibrated: physical areas and counts unavailable");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn calibrate(p1: Point, p2: Point, length: f64) -> CliResult {
    let scale = calibrate_reference(p1, p2, length)?;
    println!("{:.6} px/cm", scale.pixels_per_unit());
    Ok(())
}

/// Pair up flat coordinates into a boundary; an unpaired value is an error.
fn boundary_from_coords(coords: &[f64]) -> Result<Vec<Point>, String> {
    if coords.len() % 2 != 0 {
        return Err(format!("Expected x y pairs, got {} values", coords.len()));
    }
    Ok(points_from_flat(coords))
}

fn area(coords: &[f64], scale: Option<f64>, config: &MeasureConfig) -> CliResult {
    let boundary = boundary_from_coords(coords)?;
    let area_pixels = shoelace_area(&boundary)?;
    println!("{:.2} px²", area_pixels);

    if let Some(scale) = scale {
        let scale = CalibrationScale::new(scale)?;
        let area_cm = physical_area(area_pixels, Some(scale), config.device_correction.factor())?;
        println!("{:.4} cm²", area_cm);
    }
    Ok(())
}

fn dims(path: &Path) -> CliResult {
    let (width, height) = image::image_dimensions(path)?;
    let info = ImageInfo::from_path(path, width, height);
    println!("{}: {}x{}", info.name, info.width, info.height);
    Ok(())
}

fn show_config(config: &MeasureConfig, write: bool) -> CliResult {
    match MeasureConfig::default_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no config directory available"),
    }
    println!("{}", config.to_json()?);

    if write {
        config.save_to_default_path()?;
    }
    Ok(())
}
