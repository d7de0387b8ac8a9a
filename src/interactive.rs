use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use tracing::{debug, warn};

use stitch_planner::{
    config::{Config, PlannerConfig},
    report::{export_plan, PlanReport},
    Plan, PlannerError, SegmentPlanner,
};

const MENU: [&str; 4] = [
    "Calculate by target frames",
    "Calculate by duration",
    "Change settings",
    "Quit",
];

/// Prompt-driven planning loop
pub struct InteractiveSession {
    config: Config,
    planner: SegmentPlanner,
}

impl InteractiveSession {
    pub fn new(config: Config) -> stitch_planner::Result<Self> {
        let planner = SegmentPlanner::from_config(&config.planner)?;
        Ok(Self { config, planner })
    }

    pub fn run(&mut self) -> Result<()> {
        println!("Video Overlap Planner");
        println!("{}", "=".repeat(40));
        self.print_settings();

        loop {
            let choice = Select::new()
                .with_prompt("What would you like to do?")
                .items(&MENU)
                .default(0)
                .interact_opt()
                .context("Failed to show menu")?;

            let outcome = match choice {
                Some(0) => {
                    let frames: u32 = Input::new()
                        .with_prompt("Enter target frames")
                        .interact_text()
                        .context("Failed to read target frames")?;
                    self.planner.calculate_segments(frames)
                }
                Some(1) => {
                    let duration: f64 = Input::new()
                        .with_prompt("Enter duration in seconds")
                        .interact_text()
                        .context("Failed to read duration")?;
                    let fps: f64 = Input::new()
                        .with_prompt("Enter FPS")
                        .default(self.config.timing.default_fps)
                        .interact_text()
                        .context("Failed to read FPS")?;
                    self.planner.calculate_from_duration(duration, fps)
                }
                Some(2) => {
                    self.change_settings()?;
                    continue;
                }
                _ => break,
            };

            match outcome {
                Ok(plan) => {
                    println!("\n{}", PlanReport::new(&plan));
                    self.offer_export(&plan)?;
                    println!("\n{}\n", "=".repeat(60));
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Rejected planning request: {}", e);
                    eprintln!("❌ {}", e.user_message());
                }
                Err(e) => return Err(e.into()),
            }
        }

        println!("Exiting...");
        Ok(())
    }

    fn print_settings(&self) {
        println!("Max frames per generation: {}", self.planner.max_frames());
        println!("Overlap frames: {}", self.planner.overlap_frames());
        println!();
    }

    fn change_settings(&mut self) -> Result<()> {
        let max_frames: u32 = Input::new()
            .with_prompt("Max frames per generation")
            .default(self.planner.max_frames())
            .interact_text()
            .context("Failed to read max frames")?;
        let overlap_frames: u32 = Input::new()
            .with_prompt("Overlap frames")
            .default(self.planner.overlap_frames())
            .interact_text()
            .context("Failed to read overlap frames")?;

        match self.apply_settings(max_frames, overlap_frames) {
            Ok(()) => self.print_settings(),
            Err(e) => eprintln!("❌ {} Keeping previous settings.", e.user_message()),
        }
        Ok(())
    }

    /// Swap in a new generation budget, keeping the old one if it is invalid
    fn apply_settings(&mut self, max_frames: u32, overlap_frames: u32) -> std::result::Result<(), PlannerError> {
        let planner_config = PlannerConfig {
            max_frames,
            overlap_frames,
            ..self.config.planner
        };
        self.planner = SegmentPlanner::from_config(&planner_config)?;
        self.config.planner = planner_config;
        debug!("Planner settings changed to {:?}", planner_config);
        Ok(())
    }

    fn offer_export(&self, plan: &Plan) -> Result<()> {
        let export = Confirm::new()
            .with_prompt("Export plan to a file?")
            .default(false)
            .interact()
            .context("Failed to read export choice")?;
        if !export {
            return Ok(());
        }

        let filename: String = Input::new()
            .with_prompt("Enter filename")
            .default(self.config.export.default_filename.clone())
            .interact_text()
            .context("Failed to read filename")?;

        match export_plan(plan, &filename, self.config.export.pretty) {
            Ok(()) => println!("\nGeneration plan exported to: {}", filename),
            Err(e) => eprintln!("❌ {}", e.user_message()),
        }
        Ok(())
    }
}
