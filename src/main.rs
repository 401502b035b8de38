use clap::{Parser, Subcommand};
use flashback::config::{self, Overrides, SlideshowConfig};
use flashback::{logging, output, pipeline};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Settings that override `flashback.toml`.
#[derive(clap::Args, Clone, Debug)]
struct ConfigArgs {
    /// Config file (default: ./flashback.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Folder containing the photos
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Folder the finished video is written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Output file prefix
    #[arg(long, global = true)]
    base_name: Option<String>,

    /// Frames per second
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// Output size as WIDTHxHEIGHT, e.g. 1080x1920 for vertical video
    #[arg(long, global = true)]
    resolution: Option<String>,

    /// ffmpeg executable name or path
    #[arg(long, global = true)]
    ffmpeg: Option<String>,

    /// Seed for shuffle and zoom; the same seed reproduces the same video
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Oldest photo first instead of shuffled
    #[arg(long, global = true, conflicts_with = "random")]
    chronological: bool,

    /// Shuffle photos (overrides order.random = false)
    #[arg(long, global = true)]
    random: bool,

    /// Disable the zoom/pan effect
    #[arg(long, global = true)]
    no_zoom: bool,

    /// Show every photo for timing.static_duration instead of accelerating
    #[arg(long = "static", global = true)]
    static_timing: bool,

    /// Debug-level diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl ConfigArgs {
    fn overrides(&self) -> Overrides {
        let random = if self.chronological {
            Some(false)
        } else if self.random {
            Some(true)
        } else {
            None
        };
        Overrides {
            input_dir: self.input.clone(),
            output_dir: self.output_dir.clone(),
            base_name: self.base_name.clone(),
            fps: self.fps,
            resolution: self.resolution.clone(),
            encoder_program: self.ffmpeg.clone(),
            seed: self.seed,
            random,
            zoom: self.no_zoom.then_some(false),
            crescendo: self.static_timing.then_some(false),
            log_level: self.verbose.then(|| "debug".to_string()),
        }
    }
}

#[derive(Parser)]
#[command(name = "flashback")]
#[command(about = "Turn a folder of photos into an accelerating flashback video")]
#[command(long_about = "\
Turn a folder of photos into an accelerating flashback video

Each photo becomes a short clip with a slow random zoom. The first photo is
shown longest, every following one a little shorter, until the last flashes
by in a single frame. A high-speed loop through all photos closes the video.

Input structure:

  input_images/
  ├── IMG_0001.jpg      # jpg, jpeg, png, tiff, bmp
  ├── IMG_0002.png
  └── ...               # subfolders are ignored

Output: memory_flashback_30fps_1.mp4 (numbered, never overwritten)

Requires ffmpeg on PATH (or --ffmpeg <path>).
Run 'flashback gen-config' to generate a documented flashback.toml.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    args: ConfigArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the video (default)
    Render,
    /// Show clip order, durations, and zoom without running ffmpeg
    Plan {
        /// Print the full plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify photos are found and ffmpeg can be started
    Check,
    /// Print a stock flashback.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Render) {
        Command::Render => {
            let config = load(&cli.args)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::run(&config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            output::print_summary(&result?);
        }
        Command::Plan { json } => {
            let config = load(&cli.args)?;
            let seed = pipeline::resolve_seed(&config);
            let plan = pipeline::build_plan(&config, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Command::Check => {
            let config = load(&cli.args)?;
            let report = pipeline::check(&config)?;
            output::print_check(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config file (explicit or `./flashback.toml`), then command-line overrides.
///
/// Logging is initialized here since its level comes from the resolved config.
fn load(args: &ConfigArgs) -> Result<SlideshowConfig, config::ConfigError> {
    let overrides = args.overrides();
    let config = match &args.config {
        Some(path) => config::load_config_file(path, overrides)?,
        None => config::load_config(Path::new("."), overrides)?,
    };
    logging::init_logging(&config.logging);
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}
