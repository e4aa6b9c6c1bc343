//! End-to-end session flows against a recording reporter, driven tick by
//! tick with the default configuration.

use rutina_core::reporter::ReportRequest;
use rutina_core::{
    EngineConfig, Event, Exercise, Outcome, Phase, ProgressReporter, SessionController,
    SessionPlan,
};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

fn training_controller(
    exercises: Vec<Exercise>,
) -> (SessionController, UnboundedReceiver<ReportRequest>) {
    let (reporter, rx) = ProgressReporter::recording(Uuid::new_v4());
    let controller = SessionController::new(
        SessionPlan::training(exercises),
        EngineConfig::default(),
        reporter,
    )
    .unwrap();
    (controller, rx)
}

fn drain(rx: &mut UnboundedReceiver<ReportRequest>) -> Vec<ReportRequest> {
    let mut requests = Vec::new();
    while let Ok(request) = rx.try_recv() {
        requests.push(request);
    }
    requests
}

fn tick_n(controller: &mut SessionController, n: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..n {
        events.extend(controller.tick());
    }
    events
}

/// Three series of 30 s work with 60 s rest: the full phase sequence is
/// ready, exercise(S1), rest, exercise(S2), rest, exercise(S3), completed,
/// with three series reports and 90 s of active time.
#[test]
fn three_series_scenario() {
    let (mut controller, mut rx) =
        training_controller(vec![Exercise::timed("Plank", 3, 30).with_rest_secs(60)]);

    let state = controller.current_state().unwrap();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.time_left_secs, 30);

    let mut events = Vec::new();
    events.extend(controller.begin_current());
    for _ in 0..(30 + 60 + 30 + 60 + 30) {
        events.extend(controller.tick());
    }

    // Reconstruct the phase sequence from the emitted events.
    let mut phases = vec![Phase::Ready];
    for event in &events {
        match event {
            Event::SeriesStarted { .. } => phases.push(Phase::Exercise),
            Event::RestStarted { .. } => phases.push(Phase::Rest),
            Event::ExerciseCompleted { .. } => phases.push(Phase::Completed),
            _ => {}
        }
    }
    assert_eq!(
        phases,
        vec![
            Phase::Ready,
            Phase::Exercise,
            Phase::Rest,
            Phase::Exercise,
            Phase::Rest,
            Phase::Exercise,
            Phase::Completed,
        ]
    );
    assert!(controller.is_finished());
    assert_eq!(controller.total_active_secs(), 90);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::SessionFinished { total_active_secs: 90, .. })));

    let series: Vec<u32> = drain(&mut rx)
        .into_iter()
        .filter_map(|request| match request {
            ReportRequest::Series { series_index, .. } => Some(series_index),
            _ => None,
        })
        .collect();
    assert_eq!(series, vec![1, 2, 3]);
}

/// 10 target reps at 3 s per rep derive max(30, 10 * 3) = 30 s of work.
#[test]
fn rep_based_duration_derivation_scenario() {
    let (mut controller, _rx) = training_controller(vec![Exercise::reps("Push-ups", 1, "10")]);
    controller.begin_current().unwrap();
    let state = controller.current_state().unwrap();
    assert_eq!(state.time_left_secs, 30);
}

/// Skipping during the rest after series 2 of 3: outcome skipped, no series
/// reports beyond the two already earned, immediate advance.
#[test]
fn skip_during_rest_scenario() {
    let (mut controller, mut rx) = training_controller(vec![
        Exercise::timed("Plank", 3, 30).with_rest_secs(60),
        Exercise::timed("Wall sit", 1, 30).with_rest_secs(60),
    ]);

    controller.begin_current().unwrap();
    tick_n(&mut controller, 30 + 60 + 30); // S1, rest, S2 -> resting again
    assert_eq!(controller.current_state().unwrap().phase, Phase::Rest);
    drain(&mut rx);

    controller.skip(0);
    assert_eq!(controller.outcome(0), Some(Outcome::Skipped));
    assert_eq!(controller.current_index(), 1);
    assert!(!controller.is_finished());

    let requests = drain(&mut rx);
    assert!(requests
        .iter()
        .all(|r| !matches!(r, ReportRequest::Series { .. })));
    assert_eq!(
        requests,
        vec![ReportRequest::Outcome {
            exercise_order: 0,
            status: Outcome::Skipped,
            series_completed: 2,
            seconds_spent: 60,
        }]
    );
}

/// Pause/resume preserves the remaining seconds exactly and freezes active
/// time while paused.
#[test]
fn pause_resume_preserves_time() {
    let (mut controller, _rx) =
        training_controller(vec![Exercise::timed("Plank", 1, 30).with_rest_secs(60)]);
    controller.begin_current().unwrap();
    tick_n(&mut controller, 12);

    controller.pause().unwrap();
    let paused = controller.current_state().unwrap();
    assert_eq!(paused.time_left_secs, 18);
    assert_eq!(paused.active_secs, 12);

    tick_n(&mut controller, 25); // the clock keeps ticking; the machine ignores it
    let still_paused = controller.current_state().unwrap();
    assert_eq!(still_paused.time_left_secs, 18);
    assert_eq!(still_paused.active_secs, 12);

    controller.resume().unwrap();
    tick_n(&mut controller, 18);
    assert!(controller.is_finished());
    assert_eq!(controller.total_active_secs(), 30);
}

/// Cancelling mid-session ends it without touching later exercises.
#[test]
fn cancel_scenario() {
    let (mut controller, mut rx) = training_controller(vec![
        Exercise::timed("Plank", 2, 30).with_rest_secs(60),
        Exercise::timed("Wall sit", 1, 30).with_rest_secs(60),
        Exercise::timed("Squat hold", 1, 30).with_rest_secs(60),
    ]);
    controller.begin_current().unwrap();
    tick_n(&mut controller, 10);

    controller.cancel(0);
    assert_eq!(controller.outcome(0), Some(Outcome::Cancelled));
    assert_eq!(controller.outcome(1), Some(Outcome::Pending));
    assert_eq!(controller.outcome(2), Some(Outcome::Pending));
    assert!(controller.is_finished());

    // No further progress is possible.
    assert!(tick_n(&mut controller, 60).is_empty());
    assert!(controller.begin_current().is_none());

    let requests = drain(&mut rx);
    assert_eq!(requests.last(), Some(&ReportRequest::FinishSession));
}

/// A mixed session: completed, skipped, completed -> summary adds up and
/// the finish request is sent exactly once.
#[test]
fn mixed_outcome_session() {
    let (mut controller, mut rx) = training_controller(vec![
        Exercise::timed("Plank", 1, 30).with_rest_secs(60),
        Exercise::reps("Push-ups", 3, "8-10"),
        Exercise::timed("Wall sit", 1, 30).with_rest_secs(60),
    ]);

    controller.begin_current().unwrap();
    tick_n(&mut controller, 30);
    controller.skip(1);
    controller.begin_current().unwrap();
    tick_n(&mut controller, 30);

    let summary = controller.summary();
    assert!(summary.finished);
    assert_eq!(summary.completed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.cancelled, 0);
    assert_eq!(summary.total_active_secs, 60);

    let finishes = drain(&mut rx)
        .into_iter()
        .filter(|r| matches!(r, ReportRequest::FinishSession))
        .count();
    assert_eq!(finishes, 1);
}
