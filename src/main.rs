mod app;
mod canvas;
mod colors;
mod config;
mod error;
mod help;
mod settings;
mod terminal;
mod wave;

use clap::{Args, Parser, Subcommand};
use config::{clamp_scale, CurveFamily, DisplayMode, FrameConfig, RunConfig, WaveParameter, WaveSettings};
use error::AppError;
use log::{debug, warn};
use settings::Settings;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use wave::phase::PhaseMode;

const DEFAULT_FPS: u32 = 60;

#[derive(Parser)]
#[command(name = "termwave")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Animated sine and rounded-square waves drawn in braille", long_about = None)]
struct Cli {
    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, global = true, env = "TERMWAVE_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive animation
    Run {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Target frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Braille dots per logical unit
        #[arg(long)]
        scale: Option<f64>,

        /// Advance the phase by a fixed step per frame instead of by elapsed time
        #[arg(long)]
        fixed_step: bool,
    },

    /// Print a single frame to stdout
    Frame {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Phase offset, in wavelengths
        #[arg(short, long, default_value = "0.0", allow_hyphen_values = true)]
        phase: f64,

        /// Width in terminal cells
        #[arg(long, default_value = "80")]
        width: u16,

        /// Height in terminal cells
        #[arg(long, default_value = "24")]
        height: u16,

        /// Braille dots per logical unit
        #[arg(long)]
        scale: Option<f64>,

        /// Fail on an unreadable or invalid config file
        #[arg(long)]
        strict: bool,
    },

    /// Show where the config file is read from
    ConfigPath,
}

#[derive(Args)]
struct ShapeArgs {
    /// Half-height of the wave
    #[arg(short, long)]
    amplitude: Option<f64>,

    /// Length of one period
    #[arg(short, long)]
    wavelength: Option<f64>,

    /// Number of periods drawn
    #[arg(short, long)]
    cycles: Option<f64>,

    /// Wavelengths per second (negative scrolls the other way)
    #[arg(short, long, allow_hyphen_values = true)]
    speed: Option<f64>,

    /// Stroke width
    #[arg(short, long)]
    thickness: Option<f64>,

    /// 0 = sine, 1 = nearly square (sine family only)
    #[arg(short = 'e', long)]
    squareness: Option<f64>,

    /// Curve family: sine, rounded
    #[arg(short = 'T', long)]
    family: Option<String>,

    /// Light background
    #[arg(long)]
    light: bool,
}

impl ShapeArgs {
    /// Layer command-line values on top of `base`
    fn apply(&self, base: WaveSettings) -> WaveSettings {
        let mut settings = base;
        let overrides = [
            (WaveParameter::Amplitude, self.amplitude),
            (WaveParameter::Wavelength, self.wavelength),
            (WaveParameter::Cycles, self.cycles),
            (WaveParameter::Speed, self.speed),
            (WaveParameter::Thickness, self.thickness),
            (WaveParameter::Squareness, self.squareness),
        ];
        for (param, value) in overrides {
            if let Some(value) = value {
                settings.params.set(param, value);
            }
        }
        if let Some(name) = &self.family {
            settings.family = CurveFamily::parse(name).unwrap_or_else(|| {
                eprintln!("Unknown family: {}. Using sine.", name);
                eprintln!("Available: sine, rounded");
                CurveFamily::Sine
            });
        }
        if self.light {
            settings.mode = DisplayMode::Light;
        }
        settings
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), AppError> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| AppError::LogFile {
                path: path.clone(),
                source,
            })?;
            let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        // The animation owns the screen, so only errors go to stderr
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")),
    };
    builder.try_init()?;
    Ok(())
}

fn load_settings(strict: bool) -> Result<Settings, AppError> {
    match Settings::load() {
        Ok(settings) => Ok(settings),
        Err(e) if strict => Err(e.into()),
        Err(e) => {
            warn!("{}; using defaults", e);
            Ok(Settings::default())
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    init_logging(cli.log_file.as_ref())?;

    match cli.command {
        Commands::Run {
            shape,
            fps,
            scale,
            fixed_step,
        } => {
            let file = load_settings(false)?;
            let settings = shape.apply(file.apply(WaveSettings::default()));
            let phase_mode = if fixed_step {
                PhaseMode::FixedStep
            } else {
                file.wave.phase_mode.unwrap_or_default()
            };
            let config = RunConfig {
                settings,
                phase_mode,
                fps: fps.or(file.wave.fps).unwrap_or(DEFAULT_FPS).clamp(1, 240),
                scale: clamp_scale(scale.or(file.wave.scale).unwrap_or(1.0)),
            };
            debug!("starting with {:?}", config);
            app::run(config)?;
        }
        Commands::Frame {
            shape,
            phase,
            width,
            height,
            scale,
            strict,
        } => {
            let file = load_settings(strict)?;
            let config = FrameConfig {
                settings: shape.apply(file.apply(WaveSettings::default())),
                phase,
                width,
                height,
                scale: clamp_scale(scale.or(file.wave.scale).unwrap_or(1.0)),
            };
            app::render_frame(&config).write_to(&mut io::stdout().lock())?;
        }
        Commands::ConfigPath => {
            println!("{}", Settings::config_path().display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("termwave: {}", e);
            ExitCode::FAILURE
        }
    }
}
