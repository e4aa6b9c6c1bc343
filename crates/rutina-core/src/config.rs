//! Engine configuration.
//!
//! The training screens historically hard-coded slightly different rest
//! bounds and duration defaults per call site. All of those knobs are
//! explicit fields here; call sites pick a preset or override individual
//! values with the builder methods.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable durations for the session engine.
///
/// All values are in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Exercise-phase duration when nothing better can be derived.
    #[serde(default = "default_exercise_secs")]
    pub default_exercise_secs: u32,
    /// Estimated seconds per repetition for rep-based exercises.
    #[serde(default = "default_per_rep_secs")]
    pub per_rep_secs: u32,
    /// Floor for durations derived from repetition counts.
    #[serde(default = "default_min_derived_secs")]
    pub min_derived_secs: u32,
    /// Rest duration when the exercise does not specify one.
    #[serde(default = "default_rest_secs")]
    pub default_rest_secs: u32,
    /// Lower clamp bound for rest durations.
    #[serde(default = "default_min_rest_secs")]
    pub min_rest_secs: u32,
    /// Upper clamp bound for rest durations.
    #[serde(default = "default_max_rest_secs")]
    pub max_rest_secs: u32,
}

fn default_exercise_secs() -> u32 {
    45
}
fn default_per_rep_secs() -> u32 {
    3
}
fn default_min_derived_secs() -> u32 {
    30
}
fn default_rest_secs() -> u32 {
    60
}
fn default_min_rest_secs() -> u32 {
    30
}
fn default_max_rest_secs() -> u32 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_exercise_secs: default_exercise_secs(),
            per_rep_secs: default_per_rep_secs(),
            min_derived_secs: default_min_derived_secs(),
            default_rest_secs: default_rest_secs(),
            min_rest_secs: default_min_rest_secs(),
            max_rest_secs: default_max_rest_secs(),
        }
    }
}

impl EngineConfig {
    /// Guided-exercise preset: rest clamped to [30, 70].
    pub fn guided() -> Self {
        Self {
            min_rest_secs: 30,
            max_rest_secs: 70,
            ..Self::default()
        }
    }

    /// Compact-rest preset: rest clamped to [45, 60].
    pub fn compact_rest() -> Self {
        Self {
            min_rest_secs: 45,
            max_rest_secs: 60,
            ..Self::default()
        }
    }

    pub fn with_default_exercise_secs(mut self, secs: u32) -> Self {
        self.default_exercise_secs = secs;
        self
    }

    pub fn with_per_rep_secs(mut self, secs: u32) -> Self {
        self.per_rep_secs = secs;
        self
    }

    pub fn with_rest_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_rest_secs = min;
        self.max_rest_secs = max;
        self
    }

    pub fn with_default_rest_secs(mut self, secs: u32) -> Self {
        self.default_rest_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_exercise_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_exercise_secs".into(),
                message: "must be at least 1 second".into(),
            });
        }
        if self.per_rep_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "per_rep_secs".into(),
                message: "must be at least 1 second".into(),
            });
        }
        if self.min_rest_secs > self.max_rest_secs {
            return Err(ConfigError::InvalidValue {
                key: "min_rest_secs".into(),
                message: format!(
                    "lower rest bound ({}) exceeds upper bound ({})",
                    self.min_rest_secs, self.max_rest_secs
                ),
            });
        }
        Ok(())
    }

    /// Clamp a rest duration into the configured bounds.
    pub fn clamp_rest(&self, secs: u32) -> u32 {
        secs.clamp(self.min_rest_secs, self.max_rest_secs)
    }
}
