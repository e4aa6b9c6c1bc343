//! Session-level orchestration.
//!
//! The controller owns the plan, the outcome ledger, and at most one live
//! [`ExerciseMachine`] at a time — there is exactly one logical clock, and
//! no two exercises ever tick concurrently. The caller drives it with
//! `tick()` once per second and with the user-facing commands; the
//! controller reacts to machine events by reporting progress and advancing.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::events::Event;
use crate::exercise::{ExecutionState, ExerciseMachine};
use crate::plan::{SessionKind, SessionPlan};
use crate::reporter::ProgressReporter;

/// Terminal (or not-yet-terminal) status of an exercise within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pending,
    Completed,
    Skipped,
    Cancelled,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pending => "pending",
            Outcome::Completed => "completed",
            Outcome::Skipped => "skipped",
            Outcome::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != Outcome::Pending
    }
}

/// Aggregated view of a session, for summary screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub cancelled: usize,
    pub pending: usize,
    pub total_active_secs: u32,
    pub finished: bool,
}

/// Executes one session plan from start to finalization.
pub struct SessionController {
    session_id: Uuid,
    plan: SessionPlan,
    config: EngineConfig,
    reporter: ProgressReporter,
    outcomes: Vec<Outcome>,
    current: Option<ExerciseMachine>,
    current_index: usize,
    total_active_secs: u32,
    finished: bool,
}

impl SessionController {
    /// Build a controller over a validated plan. The reporter carries the
    /// backend session id obtained by the caller before the session began.
    pub fn new(
        plan: SessionPlan,
        config: EngineConfig,
        reporter: ProgressReporter,
    ) -> Result<Self> {
        plan.validate()?;
        config.validate()?;
        let outcomes = vec![Outcome::Pending; plan.len()];
        let first = ExerciseMachine::new(plan.exercises[0].clone(), 0, config.clone());
        Ok(Self {
            session_id: reporter.session_id(),
            plan,
            config,
            reporter,
            outcomes,
            current: Some(first),
            current_index: 0,
            total_active_secs: 0,
            finished: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_state(&self) -> Option<ExecutionState> {
        self.current.as_ref().map(ExerciseMachine::state)
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.outcomes.get(index).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn total_active_secs(&self) -> u32 {
        self.total_active_secs
    }

    pub fn summary(&self) -> SessionSummary {
        let count = |outcome| self.outcomes.iter().filter(|&&o| o == outcome).count();
        SessionSummary {
            total: self.outcomes.len(),
            completed: count(Outcome::Completed),
            skipped: count(Outcome::Skipped),
            cancelled: count(Outcome::Cancelled),
            pending: count(Outcome::Pending),
            total_active_secs: self.total_active_secs,
            finished: self.finished,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the current exercise's first series. No-op unless it is
    /// sitting in `ready`.
    pub fn begin_current(&mut self) -> Option<Event> {
        self.current.as_mut().and_then(ExerciseMachine::start)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.current.as_mut().and_then(ExerciseMachine::pause)
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.current.as_mut().and_then(ExerciseMachine::resume)
    }

    /// Reset the current exercise back to `ready`.
    pub fn reset_current(&mut self) -> Option<Event> {
        self.current.as_mut().and_then(ExerciseMachine::reset)
    }

    /// Override the current exercise's per-series work duration.
    pub fn set_work_secs(&mut self, secs: u32) {
        if let Some(machine) = self.current.as_mut() {
            machine.set_work_secs(secs);
        }
    }

    /// Manually trigger the transition the running timer would perform.
    pub fn force_advance(&mut self) -> Vec<Event> {
        let events = match self.current.as_mut() {
            Some(machine) => machine.force_advance(),
            None => Vec::new(),
        };
        self.absorb(events)
    }

    /// Advance the session clock by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = match self.current.as_mut() {
            Some(machine) => machine.tick(),
            None => Vec::new(),
        };
        let mut events = self.absorb(events);
        events.extend(self.reporter.poll_warnings());
        events
    }

    /// Mark an exercise as skipped and move on.
    ///
    /// Skipping the current exercise stops its timer and advances exactly
    /// as completion would, but without series reports for unfinished
    /// series. Skipping an already-terminal exercise is a no-op.
    pub fn skip(&mut self, index: usize) -> Vec<Event> {
        if self.finished || self.outcome(index) != Some(Outcome::Pending) {
            return Vec::new();
        }
        self.outcomes[index] = Outcome::Skipped;
        let mut events = Vec::new();

        let (series_completed, active_secs) = if index == self.current_index {
            self.take_current_progress()
        } else {
            (0, 0)
        };
        if self.plan.kind == SessionKind::Training {
            self.reporter
                .report_outcome(index, Outcome::Skipped, series_completed, active_secs);
        }
        events.push(Event::ExerciseSkipped {
            order: index,
            series_completed,
            at: Utc::now(),
        });
        if index == self.current_index {
            events.extend(self.advance_or_finalize());
        }
        events
    }

    /// Mark an exercise as cancelled and end the session immediately.
    pub fn cancel(&mut self, index: usize) -> Vec<Event> {
        if self.finished || self.outcome(index) != Some(Outcome::Pending) {
            return Vec::new();
        }
        self.outcomes[index] = Outcome::Cancelled;
        let mut events = Vec::new();

        let (series_completed, active_secs) = if index == self.current_index {
            self.take_current_progress()
        } else {
            (0, 0)
        };
        if self.plan.kind == SessionKind::Training {
            self.reporter
                .report_outcome(index, Outcome::Cancelled, series_completed, active_secs);
        }
        events.push(Event::ExerciseCancelled {
            order: index,
            series_completed,
            at: Utc::now(),
        });
        // No auto-advance after a cancel: the session is over.
        events.extend(self.finalize());
        events
    }

    /// Finish the session. Idempotent; notifies the backend exactly once.
    pub fn finalize(&mut self) -> Vec<Event> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;
        self.current = None;
        match self.plan.kind {
            SessionKind::Training => self.reporter.finish_session(),
            SessionKind::Warmup => self.reporter.report_warmup_time(self.total_active_secs),
        }
        tracing::info!(
            session = %self.session_id,
            total_active_secs = self.total_active_secs,
            "session finalized"
        );
        vec![Event::SessionFinished {
            session_id: self.session_id,
            total_active_secs: self.total_active_secs,
            at: Utc::now(),
        }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// React to machine events: report series, record completions, advance.
    fn absorb(&mut self, events: Vec<Event>) -> Vec<Event> {
        let mut out = events;
        let mut extra = Vec::new();
        for event in &out {
            match *event {
                Event::SeriesCompleted {
                    order,
                    series_index,
                    active_secs,
                    ..
                } => {
                    if self.plan.kind == SessionKind::Training {
                        self.reporter.report_series(order, series_index, active_secs);
                    }
                }
                Event::ExerciseCompleted {
                    order, active_secs, ..
                } => {
                    self.outcomes[order] = Outcome::Completed;
                    self.total_active_secs += active_secs;
                    extra.extend(self.advance_or_finalize());
                }
                _ => {}
            }
        }
        out.extend(extra);
        out
    }

    /// Stop and discard the current machine, keeping its partial progress.
    fn take_current_progress(&mut self) -> (u32, u32) {
        match self.current.take() {
            Some(machine) => {
                let progress = (machine.series_completed(), machine.active_secs());
                self.total_active_secs += progress.1;
                progress
            }
            None => (0, 0),
        }
    }

    /// Load the next pending exercise, or finalize if none remain.
    fn advance_or_finalize(&mut self) -> Vec<Event> {
        self.current = None;
        let next = (self.current_index + 1..self.plan.len())
            .find(|&i| self.outcomes[i] == Outcome::Pending);
        match next {
            Some(index) => {
                self.current_index = index;
                self.current = Some(ExerciseMachine::new(
                    self.plan.exercises[index].clone(),
                    index,
                    self.config.clone(),
                ));
                Vec::new()
            }
            None => self.finalize(),
        }
    }
}
