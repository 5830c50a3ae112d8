//! Potluck Board
//!
//! Sign-up board for a recurring potluck: guests register attendance and the
//! meal, beverage or utensil they will bring. Every panel runs the same
//! list-sync protocol against a REST store: load the whole collection on
//! mount, create one record per form submission, then re-read the collection.

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod rest;
pub mod schema;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use board::{Board, Page, SubmitResponse};
pub use config::{Config, Target};
pub use controller::{
    FailurePolicy, ListSync, PanelState, RefreshOutcome, SubmitOutcome, SyncOptions,
};
pub use error::{ErrorInfo, ErrorKind, SyncError};
pub use rest::RestStore;
pub use schema::{Entity, EntityKind, FieldSpec, FormValues, InputKind};
pub use store::Store;
pub use view::PanelView;
