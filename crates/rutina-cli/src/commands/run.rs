use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio::time::{interval, MissedTickBehavior};
use uuid::Uuid;

use rutina_core::{Event, Phase, ProgressReporter, SessionController};

use super::{load_config, load_plan};

#[derive(Args)]
pub struct RunArgs {
    /// Path to a plan JSON file
    pub plan: PathBuf,
    /// Backend base URL (e.g. http://localhost:3001/api/routines).
    /// Without it the run is offline: nothing is reported.
    #[arg(long)]
    pub server: Option<String>,
    /// Backend session id. Generated when omitted (offline runs).
    #[arg(long)]
    pub session_id: Option<Uuid>,
    /// Engine config TOML
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Scale warm-up durations by an intensity multiplier
    #[arg(long)]
    pub intensity: Option<f64>,
}

pub async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut plan = load_plan(&args.plan)?;
    if let Some(multiplier) = args.intensity {
        plan = plan.scaled_for_intensity(multiplier);
    }
    let config = load_config(args.config.as_deref())?;

    let session_id = args.session_id.unwrap_or_else(Uuid::new_v4);
    let reporter = match &args.server {
        Some(base_url) => ProgressReporter::http(session_id, base_url)?,
        None => ProgressReporter::disabled(session_id),
    };

    let mut controller = SessionController::new(plan, config, reporter)?;
    println!(
        "session {} -- {} exercises",
        controller.session_id(),
        controller.plan().len()
    );

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !controller.is_finished() {
        if let Some(state) = controller.current_state() {
            if state.phase == Phase::Ready {
                let exercise = &controller.plan().exercises[controller.current_index()];
                println!(
                    "-> {} ({} series x {}s)",
                    exercise.name, state.series_total, state.time_left_secs
                );
                if let Some(event) = controller.begin_current() {
                    print_event(&event);
                }
            }
        }

        ticker.tick().await;
        for event in controller.tick() {
            print_event(&event);
        }
    }

    let summary = controller.summary();
    println!(
        "done: {} completed, {} skipped, {} cancelled, {}s active",
        summary.completed, summary.skipped, summary.cancelled, summary.total_active_secs
    );
    Ok(())
}

fn print_event(event: &Event) {
    match event {
        Event::SeriesStarted {
            series_index,
            series_total,
            duration_secs,
            at,
            ..
        } => println!(
            "[{}] series {series_index}/{series_total} -- {duration_secs}s",
            at.format("%H:%M:%S")
        ),
        Event::SeriesCompleted {
            series_index,
            active_secs,
            at,
            ..
        } => println!(
            "[{}] series {series_index} done ({active_secs}s active)",
            at.format("%H:%M:%S")
        ),
        Event::RestStarted {
            duration_secs, at, ..
        } => println!("[{}] rest {duration_secs}s", at.format("%H:%M:%S")),
        Event::ExerciseCompleted {
            order, active_secs, ..
        } => println!("exercise {} completed ({active_secs}s active)", order + 1),
        Event::SessionFinished {
            total_active_secs, ..
        } => println!("session finished -- {total_active_secs}s active in total"),
        Event::ReportFailed {
            description, error, ..
        } => eprintln!("warning: could not report {description}: {error}"),
        _ => {}
    }
}
