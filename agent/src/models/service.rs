//! Services as reported by the adapter

use std::fmt;

use serde::{Deserialize, Serialize};

use outpost_api::ServiceStatus;

/// A workload created by the adapter. Never persisted by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterService {
    pub id: String,

    #[serde(rename = "actualState", default)]
    pub actual_state: ActualState,
}

impl AdapterService {
    pub fn new(id: impl Into<String>, actual_state: ActualState) -> Self {
        Self {
            id: id.into(),
            actual_state,
        }
    }

    pub fn to_status(&self) -> ServiceStatus {
        ServiceStatus {
            id: self.id.clone(),
            actual_state: self.actual_state.to_string(),
        }
    }
}

/// Observed state of a service.
///
/// Lookups that the adapter answers with 404 or another non-200 status are
/// reported in band instead of failing the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActualState {
    NotFound,
    Error,
    Reported(String),
}

impl Default for ActualState {
    fn default() -> Self {
        ActualState::Reported(String::new())
    }
}

impl From<String> for ActualState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "not found" => ActualState::NotFound,
            "error" => ActualState::Error,
            _ => ActualState::Reported(s),
        }
    }
}

impl From<ActualState> for String {
    fn from(state: ActualState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for ActualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActualState::NotFound => f.write_str("not found"),
            ActualState::Error => f.write_str("error"),
            ActualState::Reported(s) => f.write_str(s),
        }
    }
}
