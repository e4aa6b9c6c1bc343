//! Session plans and exercise definitions.
//!
//! A plan is an ordered, immutable list of exercises supplied by an external
//! plan provider (methodology generator, routine builder, warm-up catalog).
//! The engine never edits a plan; changing one means starting a new session.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::PlanError;

/// What the user is asked to do for each series of an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseTarget {
    /// Hold/perform for a fixed number of seconds per series.
    Duration { secs: u32 },
    /// Perform a repetition count. Kept as the raw text the plan provider
    /// sent ("12", "8-10", "x15"); the first integer in it is used.
    Reps { target: String },
}

/// One exercise inside a session plan. Immutable for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    /// Number of work/rest cycles, at least 1.
    pub series: u32,
    pub target: ExerciseTarget,
    /// Rest between series; clamped into the engine's bounds at runtime.
    #[serde(default)]
    pub rest_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    pub fn timed(name: impl Into<String>, series: u32, secs: u32) -> Self {
        Self {
            name: name.into(),
            series,
            target: ExerciseTarget::Duration { secs },
            rest_secs: None,
            notes: None,
        }
    }

    pub fn reps(name: impl Into<String>, series: u32, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            series,
            target: ExerciseTarget::Reps {
                target: target.into(),
            },
            rest_secs: None,
            notes: None,
        }
    }

    pub fn with_rest_secs(mut self, secs: u32) -> Self {
        self.rest_secs = Some(secs);
        self
    }

    /// First integer in the repetition text, if any ("8-10" -> 8).
    pub fn parsed_reps(&self) -> Option<u32> {
        match &self.target {
            ExerciseTarget::Reps { target } => first_integer(target),
            ExerciseTarget::Duration { .. } => None,
        }
    }

    /// Seconds one work phase of this exercise should run.
    ///
    /// Time-based exercises use their explicit duration. Rep-based ones get
    /// an estimate of `per_rep_secs * reps`, floored at `min_derived_secs`.
    /// Anything unusable falls back to `default_exercise_secs`.
    pub fn work_secs(&self, config: &EngineConfig) -> u32 {
        match &self.target {
            ExerciseTarget::Duration { secs } if *secs > 0 => *secs,
            ExerciseTarget::Duration { .. } => config.default_exercise_secs,
            ExerciseTarget::Reps { .. } => match self.parsed_reps() {
                Some(reps) => config
                    .min_derived_secs
                    .max(reps.saturating_mul(config.per_rep_secs)),
                None => config.default_exercise_secs,
            },
        }
    }

    /// Rest duration for this exercise, clamped into the configured bounds.
    pub fn rest_secs(&self, config: &EngineConfig) -> u32 {
        config.clamp_rest(self.rest_secs.unwrap_or(config.default_rest_secs))
    }
}

/// Which engine variant a plan runs under.
///
/// Warm-ups report their accumulated time as a single figure instead of
/// per-series progress, and do not close the backend session themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Training,
    Warmup,
}

impl Default for SessionKind {
    fn default() -> Self {
        SessionKind::Training
    }
}

/// An ordered sequence of exercises executed as one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    #[serde(default)]
    pub kind: SessionKind,
    pub exercises: Vec<Exercise>,
}

impl SessionPlan {
    pub fn training(exercises: Vec<Exercise>) -> Self {
        Self {
            kind: SessionKind::Training,
            exercises,
        }
    }

    pub fn warmup(exercises: Vec<Exercise>) -> Self {
        Self {
            kind: SessionKind::Warmup,
            exercises,
        }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.exercises.is_empty() {
            return Err(PlanError::Empty);
        }
        for (order, exercise) in self.exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                return Err(PlanError::UnnamedExercise { order });
            }
            if exercise.series == 0 {
                return Err(PlanError::ZeroSeries {
                    name: exercise.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Scale every explicit duration by an intensity multiplier, floored at
    /// 20 seconds. Used by warm-up catalogs that ship one base plan per
    /// level.
    pub fn scaled_for_intensity(mut self, multiplier: f64) -> Self {
        for exercise in &mut self.exercises {
            if let ExerciseTarget::Duration { secs } = &mut exercise.target {
                *secs = 20u32.max((f64::from(*secs) * multiplier).round() as u32);
            }
        }
        self
    }
}

fn first_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
