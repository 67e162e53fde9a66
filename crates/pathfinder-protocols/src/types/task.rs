//! Task input, step records and the terminal task result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-text task input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub query: String,
}

impl TaskInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Outcome of one recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    Success,
    Failure,
}

/// An immutable record of one executed pipeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_index: usize,
    pub agent_name: String,
    pub action_name: String,
    pub outcome: StepOutcome,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub message: String,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        self.outcome == StepOutcome::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Error,
}

/// Terminal output of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub status: TaskStatus,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub message: String,
}

impl TaskResult {
    pub fn success(data: Map<String, Value>, message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Success,
            data,
            message: message.into(),
        }
    }

    /// An error result carries no data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Error,
            data: Map::new(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }
}
