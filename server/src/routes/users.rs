//! Handlers for `/users` and `/users/{id}`.
//!
//! Only `get_user` tells "no such user" apart from other failures; update
//! and delete fold a missing id into their generic error, as the endpoint
//! table prescribes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use super::{accept, parse_id, store_failure, AppState};
use crate::error::HandlerError;
use crate::model::{User, UserInput};

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), HandlerError> {
    let input = accept(payload, state.payloads, HandlerError::CREATE_USER)?;
    let user = state
        .store
        .create_user(input)
        .await
        .map_err(store_failure("create user", HandlerError::CREATE_USER))?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, HandlerError> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(store_failure("list users", HandlerError::LIST_USERS))?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<User>, HandlerError> {
    let Some(id) = parse_id(path) else {
        return Err(HandlerError::USER_NOT_FOUND);
    };
    state
        .store
        .find_user(id)
        .await
        .map_err(store_failure("fetch user", HandlerError::FETCH_USER))?
        .map(Json)
        .ok_or(HandlerError::USER_NOT_FOUND)
}

pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, HandlerError> {
    let input = accept(payload, state.payloads, HandlerError::UPDATE_USER)?;
    let id = parse_id(path).ok_or(HandlerError::UPDATE_USER)?;
    let user = state
        .store
        .update_user(id, input)
        .await
        .map_err(store_failure("update user", HandlerError::UPDATE_USER))?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(path).ok_or(HandlerError::DELETE_USER)?;
    state
        .store
        .delete_user(id)
        .await
        .map_err(store_failure("delete user", HandlerError::DELETE_USER))?;
    Ok(StatusCode::NO_CONTENT)
}
