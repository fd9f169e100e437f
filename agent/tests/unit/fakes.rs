//! In-memory stand-ins for the store and the adapter

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use outpost_agent::adapter::AdapterClient;
use outpost_agent::errors::AgentError;
use outpost_agent::models::deployment::Deployment;
use outpost_agent::models::service::{ActualState, AdapterService};
use outpost_agent::storage::deployments::DeploymentStore;

/// Calls observed by the fakes, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateServices(serde_json::Value),
    GetService(String),
    DeleteService(String),
    FetchMetadata,
    Save(String),
    Remove(i64),
}

pub type CallLog = std::sync::Arc<Mutex<Vec<Call>>>;

pub fn new_log() -> CallLog {
    CallLog::default()
}

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<Deployment>>,
    pub next_id: Mutex<i64>,
    pub fail_all: bool,
    pub fail_save: bool,
    pub log: CallLog,
}

impl FakeStore {
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn insert(&self, deployment: Deployment) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(deployment.id);
        self.rows.lock().unwrap().push(deployment);
    }

    pub fn ids(&self) -> Vec<i64> {
        self.rows.lock().unwrap().iter().map(|d| d.id).collect()
    }

    pub fn get(&self, id: i64) -> Option<Deployment> {
        self.rows.lock().unwrap().iter().find(|d| d.id == id).cloned()
    }
}

#[async_trait]
impl DeploymentStore for FakeStore {
    async fn find_by_id(&self, id: i64) -> Result<Deployment, AgentError> {
        self.get(id)
            .ok_or_else(|| AgentError::NotFound(format!("deployment '{}' not found", id)))
    }

    async fn all(&self) -> Result<Vec<Deployment>, AgentError> {
        if self.fail_all {
            return Err(AgentError::Internal("store unavailable".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn save(&self, deployment: &mut Deployment) -> Result<(), AgentError> {
        self.log.lock().unwrap().push(Call::Save(deployment.name.clone()));
        if self.fail_save {
            return Err(AgentError::Internal("disk full".to_string()));
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        deployment.id = *next_id;
        self.rows.lock().unwrap().push(deployment.clone());
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<(), AgentError> {
        self.log.lock().unwrap().push(Call::Remove(id));
        self.rows.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAdapter {
    /// States returned by `get_service`, keyed by service id
    pub states: HashMap<String, ActualState>,
    /// `get_service` fails outright for this id
    pub fail_get: Option<String>,
    /// `delete_service` fails for this id
    pub fail_delete: Option<String>,
    pub fail_create: bool,
    pub metadata: Option<serde_json::Value>,
    pub log: CallLog,
}

impl FakeAdapter {
    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AdapterClient for FakeAdapter {
    async fn create_services(&self, payload: Vec<u8>) -> Result<Vec<AdapterService>, AgentError> {
        let body: serde_json::Value = serde_json::from_slice(&payload)?;
        self.log.lock().unwrap().push(Call::CreateServices(body.clone()));
        if self.fail_create {
            return Err(AgentError::AdapterError(
                "Failed to create services, resp code: 500, body: boom".to_string(),
            ));
        }

        let services = body
            .as_array()
            .map(|images| {
                images
                    .iter()
                    .map(|img| {
                        let name = img["name"].as_str().unwrap_or("unnamed");
                        AdapterService::new(format!("{}-pod", name), ActualState::default())
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(services)
    }

    async fn get_service(&self, id: &str) -> Result<AdapterService, AgentError> {
        self.log.lock().unwrap().push(Call::GetService(id.to_string()));
        if self.fail_get.as_deref() == Some(id) {
            return Err(AgentError::AdapterError(format!(
                "connection reset while fetching service '{}'",
                id
            )));
        }
        let state = self
            .states
            .get(id)
            .cloned()
            .unwrap_or(ActualState::NotFound);
        Ok(AdapterService::new(id, state))
    }

    async fn delete_service(&self, id: &str) -> Result<(), AgentError> {
        self.log.lock().unwrap().push(Call::DeleteService(id.to_string()));
        if self.fail_delete.as_deref() == Some(id) {
            return Err(AgentError::AdapterError(format!(
                "Failed to delete service '{}', resp code: 500, body: nope",
                id
            )));
        }
        Ok(())
    }

    async fn fetch_metadata(&self) -> Result<serde_json::Value, AgentError> {
        self.log.lock().unwrap().push(Call::FetchMetadata);
        self.metadata
            .clone()
            .ok_or_else(|| AgentError::AdapterError("adapter unreachable".to_string()))
    }
}

/// A stored record with the given services and template
pub fn record(id: i64, name: &str, service_ids: &[&str], template: &str) -> Deployment {
    Deployment {
        id,
        name: name.to_string(),
        service_ids: serde_json::to_string(service_ids).unwrap(),
        template: template.to_string(),
    }
}
