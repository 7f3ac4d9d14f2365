use crate::utils::error::{KindError, Result};
use crate::domain::closed_set::{self, ClosedSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// State of the last evaluation. Limited to three values so that machines
/// can act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SandboxState {
    Success,
    InProgress,
    Failed,
}

impl SandboxState {
    pub const ALL: [SandboxState; 3] = [
        SandboxState::Success,
        SandboxState::InProgress,
        SandboxState::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxState::Success => "success",
            SandboxState::InProgress => "in_progress",
            SandboxState::Failed => "failed",
        }
    }

    /// True when the evaluation has finished, either way.
    pub fn is_terminal(&self) -> bool {
        match self {
            SandboxState::Success | SandboxState::Failed => true,
            SandboxState::InProgress => false,
        }
    }

    pub(crate) fn expected() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl ClosedSet for SandboxState {
    const VARIANTS: &'static [&'static str] = &["success", "in_progress", "failed"];

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn as_str(&self) -> &'static str {
        SandboxState::as_str(self)
    }
}

impl<'de> Deserialize<'de> for SandboxState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        closed_set::deserialize(deserializer)
    }
}

impl fmt::Display for SandboxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SandboxState {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| KindError::InvalidEnumValue {
                field: "state".to_string(),
                value: s.to_string(),
                expected: Self::expected(),
            })
    }
}

/// One operator's evaluation of the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorState {
    /// Resource version that was last evaluated.
    pub last_evaluation: String,
    pub state: SandboxState,
    /// Free-form, no format requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive_state: Option<String>,
    /// Operator-specific extra information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl OperatorState {
    pub fn new(last_evaluation: impl Into<String>, state: SandboxState) -> Self {
        Self {
            last_evaluation: last_evaluation.into(),
            state,
            descriptive_state: None,
            details: None,
        }
    }

    pub fn with_descriptive_state(mut self, descriptive_state: impl Into<String>) -> Self {
        self.descriptive_state = Some(descriptive_state.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    pub name: String,
    pub nested_struct: Value,
    pub anything_plz: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub some_map: Option<BTreeMap<String, Value>>,
    /// Operator id to that operator's evaluation. Every operator consuming
    /// this kind adds its own entry and leaves the others alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_states: Option<BTreeMap<String, OperatorState>>,
}

impl Sandbox {
    pub fn new(name: impl Into<String>, nested_struct: Value, anything_plz: Value) -> Self {
        Self {
            name: name.into(),
            nested_struct,
            anything_plz,
            some_map: None,
            operator_states: None,
        }
    }

    pub fn operator_state(&self, operator_id: &str) -> Option<&OperatorState> {
        self.operator_states.as_ref()?.get(operator_id)
    }

    /// Inserts or replaces the entry for `operator_id` only. Returns the
    /// entry it replaced.
    pub fn record_operator_state(
        &mut self,
        operator_id: impl Into<String>,
        state: OperatorState,
    ) -> Option<OperatorState> {
        let operator_id = operator_id.into();
        tracing::debug!(
            sandbox = %self.name,
            operator = %operator_id,
            state = %state.state,
            "recording operator state"
        );
        self.operator_states
            .get_or_insert_with(BTreeMap::new)
            .insert(operator_id, state)
    }

    /// Applies entries written by other operators key by key. Keys missing
    /// from `other` are kept.
    pub fn merge_operator_states<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = (String, OperatorState)>,
    {
        for (operator_id, state) in other {
            self.record_operator_state(operator_id, state);
        }
    }
}
