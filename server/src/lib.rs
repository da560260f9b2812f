//! JSON-over-HTTP access layer for users and their todos.
//!
//! # Overview
//! Ten endpoints (create, list, get, update, delete for each resource) sit
//! on top of a persistence gateway (`store::Store`). Handlers translate a
//! request into one store call and the outcome into a status code plus
//! either the record or a fixed `{"error": "..."}` body.
//!
//! # Design
//! - The store is injected once as `Arc<dyn Store>` and shared by every
//!   handler; tests substitute `InMemoryStore` or a failing fake.
//! - Handlers hold no state between requests. Concurrent writes to the same
//!   record are serialized by the store; the last write wins.
//! - Only GET by id distinguishes "not found". Update and delete report a
//!   missing id through their generic error.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub mod error;
pub mod model;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use error::HandlerError;
pub use model::{Todo, TodoInput, User, UserInput};
pub use routes::{router, AppState};
pub use store::{InMemoryStore, SqliteStore, Store, StoreError};
pub use validation::PayloadPolicy;

/// Router over `store` with the default (permissive) payload policy.
pub fn app(store: Arc<dyn Store>) -> Router {
    router(AppState::new(store, PayloadPolicy::default()))
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}
