//! Level and state definitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{SchemaError, SchemaResult, TimeFrame};

/// One node of a level's state machine.
///
/// Only the id and timing are interpreted here. Any other fields the
/// gameplay executor relies on are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Unique within the owning level.
    #[serde(rename = "Id", alias = "id")]
    pub id: String,
    #[serde(
        rename = "TimeFrame",
        alias = "timeFrame",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub time_frame: Option<TimeFrame>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl State {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time_frame: None,
            extra: Map::new(),
        }
    }

    pub fn with_time_frame(mut self, time_frame: TimeFrame) -> Self {
        self.time_frame = Some(time_frame);
        self
    }
}

/// Root content schema of a package (`level.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Session time limit in seconds.
    #[serde(rename = "TimeLimitSeconds", alias = "timeLimitSeconds")]
    pub time_limit_seconds: i32,
    #[serde(rename = "States", alias = "states", default)]
    pub states: Vec<State>,
    /// Id of the state the session starts in.
    #[serde(rename = "InitialState", alias = "initialState")]
    pub initial_state_id: String,
    /// Sound file name played when the session starts.
    #[serde(rename = "StartSound", alias = "startSound", default)]
    pub start_sound_name: Option<String>,
    /// Sound file name played when the session ends.
    #[serde(rename = "FinishSound", alias = "finishSound", default)]
    pub finish_sound_name: Option<String>,
}

impl Level {
    /// Decodes and validates a level from its schema text.
    pub fn from_json(text: &str) -> SchemaResult<Self> {
        // Tolerate a UTF-8 BOM written by some editors.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let level: Level = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Encodes the level using the package wire names.
    pub fn to_json_pretty(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the structural invariants of the level.
    ///
    /// State ids must be unique, the initial state must name one of them,
    /// and every time frame average must be finite and non-negative.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut seen = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !seen.insert(state.id.as_str()) {
                return Err(SchemaError::DuplicateStateId(state.id.clone()));
            }
            if let Some(tf) = &state.time_frame {
                if !tf.average_seconds.is_finite() || tf.average_seconds < 0.0 {
                    return Err(SchemaError::InvalidAverage {
                        state: state.id.clone(),
                        average: tf.average_seconds,
                    });
                }
            }
        }

        if !seen.contains(self.initial_state_id.as_str()) {
            return Err(SchemaError::UnknownInitialState(
                self.initial_state_id.clone(),
            ));
        }

        Ok(())
    }

    /// The state the session starts in, if it exists.
    pub fn initial_state(&self) -> Option<&State> {
        self.state(&self.initial_state_id)
    }

    /// Looks up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }
}
