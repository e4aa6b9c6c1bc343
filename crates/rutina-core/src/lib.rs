//! # Rutina Core Library
//!
//! Core business logic for Rutina's workout session execution: a
//! countdown-driven state machine that walks a user through an ordered list
//! of exercises, each split into repeated work/rest series, while
//! guaranteeing that completion side effects fire exactly once and that
//! progress reaches the backend at most once.
//!
//! ## Architecture
//!
//! - **Countdown / ExerciseMachine**: caller-driven state machines — no
//!   internal threads; the embedding layer invokes `tick()` once per second
//! - **TransitionGuard**: signature-based dedup of phase completions
//! - **ProgressReporter**: fire-and-forget, at-most-once delivery to the
//!   backend; failures surface as warning events, never as errors
//! - **SessionController**: plan execution, outcome ledger, finalization
//!
//! ## Key Components
//!
//! - [`SessionController`]: runs one session plan end to end
//! - [`ExerciseMachine`]: per-exercise phase state machine
//! - [`ProgressReporter`]: backend reporting seam
//! - [`EngineConfig`]: duration defaults and rest bounds

pub mod config;
pub mod error;
pub mod events;
pub mod exercise;
pub mod plan;
pub mod reporter;
pub mod session;
pub mod timer;

pub use config::EngineConfig;
pub use error::{ConfigError, CoreError, PlanError, ReportError, Result};
pub use events::Event;
pub use exercise::{ExecutionState, ExerciseMachine, Phase};
pub use plan::{Exercise, ExerciseTarget, SessionKind, SessionPlan};
pub use reporter::{ProgressReporter, ReportRequest};
pub use session::{Outcome, SessionController, SessionSummary};
pub use timer::{Countdown, Signature, Tick, TransitionGuard};
