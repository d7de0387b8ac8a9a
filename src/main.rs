use std::path::PathBuf;
use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use stitch_planner::{
    config::Config,
    report::{export_plan, load_plan, serialize_plan, PlanFormat, PlanReport, PlanSummary},
    SegmentPlanner,
};

mod interactive;

use interactive::InteractiveSession;

#[derive(Parser)]
#[command(
    name = "stitch-planner",
    version,
    about = "Plan overlapping generations for long AI-generated videos",
    long_about = "Stitch-Planner works out how to build a long video from a model that can only generate a limited number of frames at a time: how many generations are needed, which frame each one continues from, and how many overlapping frames to discard.",
    group(ArgGroup::new("target").args(["frames", "duration"]))
)]
struct Cli {
    /// Target number of frames
    #[arg(short, long, conflicts_with = "duration")]
    frames: Option<u32>,

    /// Target duration in seconds
    #[arg(short, long, allow_negative_numbers = true)]
    duration: Option<f64>,

    /// Frames per second used with --duration [default: 24]
    #[arg(long, allow_negative_numbers = true, requires = "duration")]
    fps: Option<f64>,

    /// Max frames per generation [default: 81]
    #[arg(long)]
    max_frames: Option<u32>,

    /// Overlap frames between generations [default: 8]
    #[arg(long)]
    overlap: Option<u32>,

    /// Always generate full-length final segments
    #[arg(long)]
    no_trim_final: bool,

    /// Export the plan to a .json or .toml file
    #[arg(short, long, requires = "target", conflicts_with = "interactive")]
    export: Option<PathBuf>,

    /// Print the plan as JSON instead of text
    #[arg(long, conflicts_with = "interactive")]
    json: bool,

    /// Load and display a previously exported plan
    #[arg(long, conflicts_with_all = ["frames", "duration"])]
    load: Option<PathBuf>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration (file plus overrides) to a TOML file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_frames) = self.max_frames {
            config.planner.max_frames = max_frames;
        }
        if let Some(overlap) = self.overlap {
            config.planner.overlap_frames = overlap;
        }
        if self.no_trim_final {
            config.planner.trim_final_generation = false;
        }
    }

    /// Whether anything besides saving the configuration was asked for
    fn has_request(&self) -> bool {
        self.frames.is_some() || self.duration.is_some() || self.load.is_some() || self.interactive
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting Stitch-Planner v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            debug!("Using default configuration");
            Config::default()
        }
    };
    cli.apply_overrides(&mut config);
    config.validate().map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if let Some(path) = &cli.save_config {
        config.save_to_file(path)?;
        info!("Configuration saved to {:?}", path);
        if !cli.has_request() {
            return Ok(());
        }
    }

    if let Some(path) = &cli.load {
        let plan = load_plan(path)?;
        info!("Loaded plan: {}", PlanSummary(&plan));
        print_plan(&plan, cli.json, &config)?;
        return Ok(());
    }

    if cli.interactive {
        return InteractiveSession::new(config)?.run();
    }

    let planner = SegmentPlanner::from_config(&config.planner)?;
    let result = if let Some(frames) = cli.frames {
        planner.calculate_segments(frames)
    } else if let Some(duration) = cli.duration {
        let fps = cli.fps.unwrap_or(config.timing.default_fps);
        planner.calculate_from_duration(duration, fps)
    } else {
        // Nothing to plan on the command line, so ask for it
        return InteractiveSession::new(config)?.run();
    };
    let plan = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;

    info!("Planned {}", PlanSummary(&plan));
    print_plan(&plan, cli.json, &config)?;

    if let Some(path) = &cli.export {
        export_plan(&plan, path, config.export.pretty)
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        println!("\nGeneration plan exported to: {}", path.display());
    }

    Ok(())
}

fn print_plan(plan: &stitch_planner::Plan, json: bool, config: &Config) -> Result<()> {
    if json {
        println!("{}", serialize_plan(plan, PlanFormat::Json, config.export.pretty)?);
    } else {
        println!("{}", PlanReport::new(plan));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from([
            "stitch-planner", "--frames", "300", "--max-frames", "121", "--overlap", "24", "--no-trim-final",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.planner.max_frames, 121);
        assert_eq!(config.planner.overlap_frames, 24);
        assert!(!config.planner.trim_final_generation);
        assert!(cli.has_request());
    }

    #[test]
    fn test_saved_config_carries_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        let cli = Cli::try_parse_from(["stitch-planner", "--overlap", "16", "--save-config", "planner.toml"]).unwrap();
        assert!(!cli.has_request());

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.planner.overlap_frames, 16);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_export_conflicts_with_load() {
        let result = Cli::try_parse_from(["stitch-planner", "--load", "plan.json", "--export", "copy.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_requires_target() {
        assert!(Cli::try_parse_from(["stitch-planner", "--export", "plan.json"]).is_err());
        assert!(Cli::try_parse_from(["stitch-planner", "-i", "--export", "plan.json"]).is_err());
        assert!(Cli::try_parse_from(["stitch-planner", "--frames", "150", "--export", "plan.json"]).is_ok());
    }

    #[test]
    fn test_fps_requires_duration() {
        assert!(Cli::try_parse_from(["stitch-planner", "--frames", "300", "--fps", "30"]).is_err());
        assert!(Cli::try_parse_from(["stitch-planner", "--fps", "30"]).is_err());
        assert!(Cli::try_parse_from(["stitch-planner", "--duration", "10", "--fps", "30"]).is_ok());
    }

    #[test]
    fn test_negative_duration_reaches_planner() {
        let cli = Cli::try_parse_from(["stitch-planner", "--duration", "-5"]).unwrap();
        assert_eq!(cli.duration, Some(-5.0));
    }
}
