//! Per-exercise phase state machine.
//!
//! Walks one exercise through `ready -> exercise -> rest -> exercise -> ...
//! -> completed`, driven by a caller-owned one-second tick. The machine is
//! pure state: it emits [`Event`]s and performs no I/O, so the session
//! controller decides what to report and when to advance.
//!
//! Every transition out of `exercise` or `rest` — natural expiry or
//! force-advance — goes through the [`TransitionGuard`] before any side
//! effect, so a repeated delivery of the same expiry is dropped.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::events::Event;
use crate::plan::Exercise;
use crate::timer::{Countdown, Signature, Tick, TransitionGuard};

/// Execution phase of one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ready,
    Exercise,
    Rest,
    Completed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Exercise => "exercise",
            Phase::Rest => "rest",
            Phase::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed)
    }
}

/// Snapshot of an exercise's execution state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    pub phase: Phase,
    pub series_index: u32,
    pub series_total: u32,
    pub time_left_secs: u32,
    /// Seconds spent in the `exercise` phase only; rest never counts.
    pub active_secs: u32,
    pub running: bool,
    pub last_handled: Option<Signature>,
}

/// State machine executing a single exercise.
pub struct ExerciseMachine {
    exercise: Exercise,
    /// 0-based position of the exercise in its plan.
    order: usize,
    config: EngineConfig,
    phase: Phase,
    /// 1-based, only ever increases except on a full reset.
    series_index: u32,
    active_secs: u32,
    /// Manual replacement for the derived work duration (0 = no timer).
    work_secs_override: Option<u32>,
    countdown: Countdown,
    guard: TransitionGuard,
}

impl ExerciseMachine {
    pub fn new(exercise: Exercise, order: usize, config: EngineConfig) -> Self {
        let mut countdown = Countdown::new();
        countdown.reset(exercise.work_secs(&config));
        Self {
            exercise,
            order,
            config,
            phase: Phase::Ready,
            series_index: 1,
            active_secs: 0,
            work_secs_override: None,
            countdown,
            guard: TransitionGuard::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn series_index(&self) -> u32 {
        self.series_index
    }

    pub fn series_total(&self) -> u32 {
        self.exercise.series
    }

    pub fn active_secs(&self) -> u32 {
        self.active_secs
    }

    pub fn time_left_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Fully completed series so far (the current one does not count until
    /// its work phase expires).
    pub fn series_completed(&self) -> u32 {
        match self.phase {
            Phase::Ready => 0,
            Phase::Exercise => self.series_index - 1,
            Phase::Rest => self.series_index,
            Phase::Completed => self.exercise.series,
        }
    }

    pub fn state(&self) -> ExecutionState {
        ExecutionState {
            phase: self.phase,
            series_index: self.series_index,
            series_total: self.exercise.series,
            time_left_secs: self.countdown.remaining_secs(),
            active_secs: self.active_secs,
            running: self.countdown.is_running(),
            last_handled: self.guard.last_handled(),
        }
    }

    fn work_secs(&self) -> u32 {
        self.work_secs_override
            .unwrap_or_else(|| self.exercise.work_secs(&self.config))
    }

    fn signature(&self) -> Signature {
        Signature::new(self.phase, self.series_index)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the first series. Only valid from `ready`; a no-op otherwise.
    pub fn start(&mut self) -> Option<Event> {
        if self.phase != Phase::Ready {
            return None;
        }
        self.phase = Phase::Exercise;
        let work = self.work_secs();
        self.countdown.reset(work);
        self.countdown.resume();
        Some(Event::SeriesStarted {
            order: self.order,
            series_index: self.series_index,
            series_total: self.exercise.series,
            duration_secs: work,
            at: Utc::now(),
        })
    }

    /// Suspend the tick without touching phase or series. No-op when the
    /// countdown is not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.countdown.is_running() {
            return None;
        }
        self.countdown.pause();
        Some(Event::TimerPaused {
            order: self.order,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Continue from the exact remaining seconds. No-op when already
    /// running, out of phase, or with nothing left to count.
    pub fn resume(&mut self) -> Option<Event> {
        if self.countdown.is_running()
            || !matches!(self.phase, Phase::Exercise | Phase::Rest)
            || self.countdown.remaining_secs() == 0
        {
            return None;
        }
        self.countdown.resume();
        Some(Event::TimerResumed {
            order: self.order,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Return to `ready` with series 1 and no accumulated time. No-op once
    /// completed.
    pub fn reset(&mut self) -> Option<Event> {
        if self.phase == Phase::Completed {
            return None;
        }
        self.phase = Phase::Ready;
        self.series_index = 1;
        self.active_secs = 0;
        self.countdown.reset(self.work_secs());
        self.guard.clear();
        Some(Event::ExerciseReset {
            order: self.order,
            at: Utc::now(),
        })
    }

    /// Replace the derived work duration for this exercise's series.
    ///
    /// Zero means "no timer": the work phase then only moves on via
    /// [`Self::force_advance`]. Takes effect immediately when a work phase
    /// is underway.
    pub fn set_work_secs(&mut self, secs: u32) {
        self.work_secs_override = Some(secs);
        if self.phase == Phase::Exercise {
            self.countdown.reset(secs);
            self.countdown.resume();
        }
    }

    /// Perform the transition a natural expiry would perform, immediately.
    ///
    /// Still passes through the transition guard, so a force-advance racing
    /// a just-handled expiry is dropped. From `ready` this behaves like
    /// [`Self::start`].
    pub fn force_advance(&mut self) -> Vec<Event> {
        match self.phase {
            Phase::Ready => self.start().into_iter().collect(),
            Phase::Exercise | Phase::Rest => self.apply_expiry(self.signature()),
            Phase::Completed => Vec::new(),
        }
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.countdown.tick() {
            Tick::Idle => Vec::new(),
            Tick::Running(_) => {
                if self.phase == Phase::Exercise {
                    self.active_secs += 1;
                }
                Vec::new()
            }
            Tick::Expired => {
                if self.phase == Phase::Exercise {
                    self.active_secs += 1;
                }
                self.apply_expiry(self.signature())
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The single authoritative transition function. All completion
    /// handling — guard check, event emission, phase change — happens here,
    /// synchronously, once per expiry.
    fn apply_expiry(&mut self, signature: Signature) -> Vec<Event> {
        if !self.guard.should_handle(signature) {
            tracing::debug!(
                order = self.order,
                phase = signature.phase.as_str(),
                series = signature.series_index,
                "duplicate phase completion dropped"
            );
            return Vec::new();
        }

        match self.phase {
            Phase::Exercise => {
                let mut events = vec![Event::SeriesCompleted {
                    order: self.order,
                    series_index: self.series_index,
                    active_secs: self.active_secs,
                    at: Utc::now(),
                }];
                if self.series_index < self.exercise.series {
                    self.phase = Phase::Rest;
                    let rest = self.exercise.rest_secs(&self.config);
                    self.countdown.reset(rest);
                    self.countdown.resume();
                    events.push(Event::RestStarted {
                        order: self.order,
                        series_index: self.series_index,
                        duration_secs: rest,
                        at: Utc::now(),
                    });
                } else {
                    self.phase = Phase::Completed;
                    self.countdown.reset(0);
                    events.push(Event::ExerciseCompleted {
                        order: self.order,
                        series_total: self.exercise.series,
                        active_secs: self.active_secs,
                        at: Utc::now(),
                    });
                }
                events
            }
            Phase::Rest => {
                self.series_index += 1;
                self.phase = Phase::Exercise;
                let work = self.work_secs();
                self.countdown.reset(work);
                self.countdown.resume();
                vec![Event::SeriesStarted {
                    order: self.order,
                    series_index: self.series_index,
                    series_total: self.exercise.series,
                    duration_secs: work,
                    at: Utc::now(),
                }]
            }
            Phase::Ready | Phase::Completed => Vec::new(),
        }
    }

    /// Re-deliver an expiry with an explicit signature, as a stale deferred
    /// callback would. Test-only: proves the guard drops the repeat.
    #[cfg(test)]
    pub(crate) fn replay_expiry(&mut self, signature: Signature) -> Vec<Event> {
        self.apply_expiry(signature)
    }
}
