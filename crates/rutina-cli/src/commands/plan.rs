use std::path::PathBuf;

use clap::Subcommand;
use rutina_core::EngineConfig;

use super::{load_config, load_plan};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Print a plan with the durations the engine would use
    Show {
        /// Path to a plan JSON file
        file: PathBuf,
        /// Optional engine config TOML
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate a plan file
    Check {
        /// Path to a plan JSON file
        file: PathBuf,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Show { file, config } => {
            let plan = load_plan(&file)?;
            let config = load_config(config.as_deref())?;
            plan.validate()?;
            show(&plan, &config);
        }
        PlanAction::Check { file } => {
            let plan = load_plan(&file)?;
            plan.validate()?;
            println!("ok: {} exercises", plan.len());
        }
    }
    Ok(())
}

fn show(plan: &rutina_core::SessionPlan, config: &EngineConfig) {
    println!("{:?} session, {} exercises", plan.kind, plan.len());
    for (order, exercise) in plan.exercises.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {} series x {:>3}s work, {:>3}s rest",
            order + 1,
            exercise.name,
            exercise.series,
            exercise.work_secs(config),
            exercise.rest_secs(config),
        );
        if let Some(notes) = &exercise.notes {
            println!("      {notes}");
        }
    }
}
