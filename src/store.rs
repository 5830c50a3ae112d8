//! The external store that holds the authoritative board data

use std::future::Future;

use serde_json::Value;

use crate::error::SyncError;

/// Read-all and create-one access to the store, addressed by collection path.
/// Rows travel as JSON so one store serves every entity kind.
pub trait Store: Send + Sync + 'static {
    fn list(&self, path: &str) -> impl Future<Output = Result<Vec<Value>, SyncError>> + Send;

    fn create(&self, path: &str, body: Value) -> impl Future<Output = Result<(), SyncError>> + Send;
}
