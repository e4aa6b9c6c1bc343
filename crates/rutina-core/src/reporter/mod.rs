//! At-most-once progress reporting.
//!
//! The reporter is split in two: a cheap synchronous handle the session
//! controller calls, and a spawned transport task that talks to the
//! backend. The handle deduplicates locally and enqueues; phase transitions
//! therefore never wait on the network. Delivery is attempted once —
//! failures are logged, surfaced as [`Event::ReportFailed`], and never
//! retried here. The local state machine is the source of truth; the
//! backend is an eventually-consistent mirror.

mod http;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::ReportError;
use crate::events::Event;
use crate::session::Outcome;

pub use http::HttpBackend;

/// One queued report for the transport task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportRequest {
    /// A work series finished; cumulative active seconds so far.
    Series {
        exercise_order: usize,
        series_index: u32,
        seconds_spent: u32,
    },
    /// An exercise reached a terminal outcome without finishing all series.
    Outcome {
        exercise_order: usize,
        status: Outcome,
        series_completed: u32,
        seconds_spent: u32,
    },
    /// Accumulated warm-up time (warm-up sessions only).
    WarmupTime { seconds: u32 },
    /// Close the backend session.
    FinishSession,
}

impl ReportRequest {
    /// Short human-readable label for warnings and logs.
    pub fn describe(&self) -> String {
        match self {
            ReportRequest::Series {
                exercise_order,
                series_index,
                ..
            } => format!("series {series_index} of exercise {exercise_order}"),
            ReportRequest::Outcome {
                exercise_order,
                status,
                ..
            } => format!("{} outcome of exercise {exercise_order}", status.as_str()),
            ReportRequest::WarmupTime { .. } => "warm-up time".to_string(),
            ReportRequest::FinishSession => "session finish".to_string(),
        }
    }
}

/// Handle used by the session controller to emit reports.
///
/// Series reports are deduplicated by `(exercise_order, series_index)`
/// before anything is queued: a repeat is dropped without a network call.
pub struct ProgressReporter {
    session_id: Uuid,
    reported_series: HashSet<(usize, u32)>,
    tx: mpsc::UnboundedSender<ReportRequest>,
    warnings: Option<mpsc::UnboundedReceiver<Event>>,
}

impl ProgressReporter {
    /// Reporter backed by the HTTP backend. Spawns the transport task, so
    /// this must be called inside a tokio runtime.
    pub fn http(session_id: Uuid, base_url: &str) -> Result<Self, ReportError> {
        let backend = HttpBackend::new(base_url, session_id)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (warn_tx, warn_rx) = mpsc::unbounded_channel();
        tokio::spawn(http::pump(rx, backend, warn_tx));
        Ok(Self {
            session_id,
            reported_series: HashSet::new(),
            tx,
            warnings: Some(warn_rx),
        })
    }

    /// Reporter whose queue goes straight to the returned receiver instead
    /// of a transport. Tests assert on the received requests.
    pub fn recording(session_id: Uuid) -> (Self, mpsc::UnboundedReceiver<ReportRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                session_id,
                reported_series: HashSet::new(),
                tx,
                warnings: None,
            },
            rx,
        )
    }

    /// Reporter that drops everything. For offline runs.
    pub fn disabled(session_id: Uuid) -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        Self {
            session_id,
            reported_series: HashSet::new(),
            tx,
            warnings: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Report one completed series. Fire-and-forget; repeats for the same
    /// `(exercise_order, series_index)` are dropped locally.
    pub fn report_series(&mut self, exercise_order: usize, series_index: u32, seconds_spent: u32) {
        if !self.reported_series.insert((exercise_order, series_index)) {
            tracing::debug!(
                exercise_order,
                series_index,
                "series already reported; dropping repeat"
            );
            return;
        }
        self.enqueue(ReportRequest::Series {
            exercise_order,
            series_index,
            seconds_spent,
        });
    }

    /// Report a terminal outcome (skipped/cancelled, or a partial save).
    pub fn report_outcome(
        &mut self,
        exercise_order: usize,
        status: Outcome,
        series_completed: u32,
        seconds_spent: u32,
    ) {
        self.enqueue(ReportRequest::Outcome {
            exercise_order,
            status,
            series_completed,
            seconds_spent,
        });
    }

    pub fn report_warmup_time(&mut self, seconds: u32) {
        self.enqueue(ReportRequest::WarmupTime { seconds });
    }

    pub fn finish_session(&mut self) {
        self.enqueue(ReportRequest::FinishSession);
    }

    /// Drain delivery warnings produced by the transport task.
    pub fn poll_warnings(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(warnings) = self.warnings.as_mut() {
            while let Ok(event) = warnings.try_recv() {
                events.push(event);
            }
        }
        events
    }

    fn enqueue(&self, request: ReportRequest) {
        // A closed sink means there is nothing to report to; reporting is
        // fire-and-forget, so this is not an error path.
        if self.tx.send(request).is_err() {
            tracing::debug!("report sink closed; dropping report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn series_reports_are_deduplicated() {
        let (mut reporter, mut rx) = ProgressReporter::recording(session_id());
        reporter.report_series(0, 1, 30);
        reporter.report_series(0, 1, 30);
        reporter.report_series(0, 1, 31);

        assert_eq!(
            rx.try_recv().unwrap(),
            ReportRequest::Series {
                exercise_order: 0,
                series_index: 1,
                seconds_spent: 30
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn distinct_series_pass_through() {
        let (mut reporter, mut rx) = ProgressReporter::recording(session_id());
        reporter.report_series(0, 1, 30);
        reporter.report_series(0, 2, 60);
        reporter.report_series(1, 1, 30);

        let mut received = Vec::new();
        while let Ok(request) = rx.try_recv() {
            received.push(request);
        }
        assert_eq!(received.len(), 3);
    }

    #[test]
    fn disabled_reporter_swallows_everything() {
        let mut reporter = ProgressReporter::disabled(session_id());
        reporter.report_series(0, 1, 30);
        reporter.finish_session();
        assert!(reporter.poll_warnings().is_empty());
    }

    #[test]
    fn describe_names_the_request() {
        let request = ReportRequest::Series {
            exercise_order: 2,
            series_index: 3,
            seconds_spent: 10,
        };
        assert_eq!(request.describe(), "series 3 of exercise 2");
        assert_eq!(ReportRequest::FinishSession.describe(), "session finish");
    }
}
