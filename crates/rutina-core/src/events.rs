use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every observable state change in a session produces an Event.
/// The UI layer polls these; nothing in the engine blocks on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A work phase began (first series on start, later ones after rest).
    SeriesStarted {
        order: usize,
        series_index: u32,
        series_total: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// A work phase ran to completion (naturally or force-advanced).
    SeriesCompleted {
        order: usize,
        series_index: u32,
        /// Cumulative work-phase seconds for this exercise so far.
        active_secs: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        order: usize,
        series_index: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        order: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        order: usize,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    ExerciseReset {
        order: usize,
        at: DateTime<Utc>,
    },
    /// All series done; `active_secs` is the exercise's total work time.
    ExerciseCompleted {
        order: usize,
        series_total: u32,
        active_secs: u32,
        at: DateTime<Utc>,
    },
    ExerciseSkipped {
        order: usize,
        /// Fully completed series at the moment of skipping.
        series_completed: u32,
        at: DateTime<Utc>,
    },
    ExerciseCancelled {
        order: usize,
        series_completed: u32,
        at: DateTime<Utc>,
    },
    SessionFinished {
        session_id: Uuid,
        total_active_secs: u32,
        at: DateTime<Utc>,
    },
    /// A progress report could not be delivered. Non-fatal by contract:
    /// local progression already moved on and is never rolled back.
    ReportFailed {
        description: String,
        error: String,
        at: DateTime<Utc>,
    },
}
