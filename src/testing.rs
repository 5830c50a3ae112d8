//! Scripted in-memory store for controller tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::SyncError;
use crate::store::Store;

/// How the next listing call behaves
#[derive(Debug, Clone, Default)]
pub(crate) struct Step {
    pub delay: Duration,
    pub fail: Option<SyncError>,
}

#[derive(Default)]
pub(crate) struct ScriptedStore {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    list_steps: Mutex<VecDeque<Step>>,
    create_failure: Mutex<Option<SyncError>>,
    requests: Mutex<Vec<String>>,
    next_id: Mutex<i64>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(path: &str, rows: Vec<Value>) -> Self {
        let store = Self::new();
        store.set_rows(path, rows);
        store
    }

    pub fn set_rows(&self, path: &str, rows: Vec<Value>) {
        self.rows.lock().unwrap().insert(path.to_string(), rows);
    }

    pub fn push_row(&self, path: &str, row: Value) {
        self.rows
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, path: &str) -> Vec<Value> {
        self.rows.lock().unwrap().get(path).cloned().unwrap_or_default()
    }

    pub fn script_list(&self, step: Step) {
        self.list_steps.lock().unwrap().push_back(step);
    }

    pub fn fail_next_create(&self, error: SyncError) {
        *self.create_failure.lock().unwrap() = Some(error);
    }

    /// Requests seen so far, as "GET path" / "POST path"
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Store for ScriptedStore {
    async fn list(&self, path: &str) -> Result<Vec<Value>, SyncError> {
        self.requests.lock().unwrap().push(format!("GET {}", path));
        let step = self.list_steps.lock().unwrap().pop_front().unwrap_or_default();
        let rows = self.rows(path);
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        match step.fail {
            Some(e) => Err(e),
            None => Ok(rows),
        }
    }

    async fn create(&self, path: &str, body: Value) -> Result<(), SyncError> {
        self.requests.lock().unwrap().push(format!("POST {}", path));
        if let Some(e) = self.create_failure.lock().unwrap().take() {
            return Err(e);
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let mut row = body;
        if let Some(obj) = row.as_object_mut() {
            obj.insert("id".to_string(), json!(id));
        }
        self.push_row(path, row);
        Ok(())
    }
}
