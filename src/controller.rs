//! List-sync controller
//!
//! Keeps one entity collection in step with the store by re-reading the whole
//! collection on mount, on demand and after every create attempt. Every
//! refresh is tagged with a generation so a slow, superseded response can never
//! overwrite a newer one.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ErrorInfo, SyncError};
use crate::schema::{Entity, EntityKind, FormValues};
use crate::store::Store;

/// What a failed refresh does to the items already on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Blank the list
    #[default]
    Clear,
    KeepLastGood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub timeout: Duration,
    pub policy: FailurePolicy,
    pub seed_mode: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.request_timeout(),
            policy: config.failure_policy,
            seed_mode: config.seed_mode,
        }
    }
}

/// Items and error of one panel; always replaced together
#[derive(Debug, Clone, Serialize)]
pub struct PanelState<R> {
    pub items: Vec<R>,
    pub last_error: Option<ErrorInfo>,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Generation of the refresh whose result is currently shown
    pub generation: u64,
}

impl<R> Default for PanelState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            last_error: None,
            refreshed_at: None,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Failed,
    /// A newer refresh was issued while this one was in flight
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    /// The form parsed and a create request was sent
    pub accepted: bool,
    pub created: bool,
    pub clear_form: bool,
}

pub struct ListSync<E: Entity, S: Store> {
    store: Arc<S>,
    state: Mutex<PanelState<E::Row>>,
    issued: AtomicU64,
    options: SyncOptions,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, S: Store> ListSync<E, S> {
    pub fn new(store: Arc<S>, options: SyncOptions) -> Self {
        Self {
            store,
            state: Mutex::new(PanelState::default()),
            issued: AtomicU64::new(0),
            options,
            _entity: PhantomData,
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn snapshot(&self) -> PanelState<E::Row> {
        self.lock().clone()
    }

    pub fn items(&self) -> Vec<E::Row> {
        self.lock().items.clone()
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.lock().last_error.clone()
    }

    /// Drops the local collection, as when the panel unmounts. Refreshes
    /// still in flight are superseded.
    pub fn reset(&self) {
        let mut state = self.lock();
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        *state = PanelState {
            generation,
            ..PanelState::default()
        };
    }

    /// Re-reads the whole collection from the store
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_after(None).await
    }

    /// Parses the form, creates one record and re-reads the collection
    /// whatever the create result was. Validation failures send nothing.
    pub async fn submit(&self, form: &FormValues) -> SubmitOutcome {
        let kind = E::KIND;
        let body = match E::parse_form(form).and_then(|draft| Ok(serde_json::to_value(&draft)?)) {
            Ok(body) => body,
            Err(e) => {
                warn!("[{}] Rejected form: {}", kind, e);
                self.lock().last_error = Some(ErrorInfo::from(&e));
                return SubmitOutcome {
                    accepted: false,
                    created: false,
                    clear_form: false,
                };
            }
        };

        let create_error = match self.bounded(self.store.create(kind.path(), body)).await {
            Ok(()) => {
                info!("[{}] Created record", kind);
                None
            }
            Err(e) => {
                error!("[{}] Create failed: {}", kind, e);
                let info = ErrorInfo::from(&e);
                self.lock().last_error = Some(info.clone());
                Some(info)
            }
        };
        let created = create_error.is_none();

        self.refresh_after(create_error).await;

        SubmitOutcome {
            accepted: true,
            created,
            clear_form: !self.options.seed_mode,
        }
    }

    // `carried` is a create failure that stays visible when the follow-up read succeeds
    async fn refresh_after(&self, carried: Option<ErrorInfo>) -> RefreshOutcome {
        let kind = E::KIND;
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.fetch().await;

        let mut state = self.lock();
        let latest = self.issued.load(Ordering::SeqCst);
        if generation != latest {
            debug!(
                "[{}] Dropping refresh {} (latest is {})",
                kind, generation, latest
            );
            return RefreshOutcome::Stale;
        }

        state.generation = generation;
        match result {
            Ok(rows) => {
                info!("[{}] Loaded {} rows", kind, rows.len());
                state.items = rows;
                state.last_error = carried;
                state.refreshed_at = Some(Utc::now());
                RefreshOutcome::Applied
            }
            Err(e) => {
                error!("[{}] Refresh failed: {}", kind, e);
                state.last_error = Some(ErrorInfo::from(&e));
                if self.options.policy == FailurePolicy::Clear {
                    state.items.clear();
                }
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<E::Row>, SyncError> {
        let values = self.bounded(self.store.list(E::KIND.path())).await?;
        let mut rows = values
            .into_iter()
            .map(|v| serde_json::from_value::<E::Row>(v).map_err(SyncError::from))
            .collect::<Result<Vec<_>, _>>()?;
        E::sort(&mut rows);
        Ok(rows)
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        let limit = self.options.timeout;
        tokio::time::timeout(limit, request)
            .await
            .map_err(|_| SyncError::Timeout(limit))?
    }

    fn lock(&self) -> MutexGuard<'_, PanelState<E::Row>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
