//! Router and the pieces shared by the per-resource handlers.
//!
//! # Design
//! `AppState` carries the one store handle every handler uses. Handlers
//! take the path id as `Result<Path<String>, PathRejection>`: an id that is
//! not a UUID, or does not even decode to UTF-8, cannot name a stored record,
//! so it is answered exactly like an unknown id instead of with axum's
//! default path rejection. Bodies are taken as
//! `Result<Json<_>, JsonRejection>` for the same reason: a body the store
//! would not accept is that endpoint's 400, whatever the parse failure was.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    middleware,
    routing::get,
    Json, Router,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::store::{Store, StoreError};
use crate::telemetry::trace_requests;
use crate::validation::{PayloadPolicy, Validate};

pub mod todos;
pub mod users;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub payloads: PayloadPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, payloads: PayloadPolicy) -> Self {
        Self { store, payloads }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .layer(middleware::from_fn(trace_requests))
        .with_state(state)
}

/// The record id named by the path, or `None` when it cannot name one.
fn parse_id(path: Result<Path<String>, PathRejection>) -> Option<Uuid> {
    let Path(raw) = path
        .map_err(|rejection| debug!(error = %rejection, "path id rejected"))
        .ok()?;
    Uuid::parse_str(&raw).ok()
}

/// Unwrap a JSON payload and apply the configured policy, mapping any
/// failure to `on_error`.
fn accept<P: Validate>(
    payload: Result<Json<P>, JsonRejection>,
    policy: PayloadPolicy,
    on_error: HandlerError,
) -> Result<P, HandlerError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(error = %rejection, "request body rejected");
        on_error
    })?;
    policy.check(&payload).map_err(|field| {
        debug!(field, "blank required field");
        on_error
    })?;
    Ok(payload)
}

/// Log a store failure and replace it with the endpoint's fixed response.
fn store_failure(operation: &'static str, on_error: HandlerError) -> impl FnOnce(StoreError) -> HandlerError {
    move |err| {
        warn!(operation, error = %err, "store call failed");
        on_error
    }
}
