//! Handlers for `/todos` and `/todos/{id}`. Same contract as the user
//! handlers, including which failures surface as 404.

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
use crate::model::{Todo, TodoInput};

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), HandlerError> {
    let input = accept(payload, state.payloads, HandlerError::CREATE_TODO)?;
    let todo = state
        .store
        .create_todo(input)
        .await
        .map_err(store_failure("create todo", HandlerError::CREATE_TODO))?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, HandlerError> {
    let todos = state
        .store
        .list_todos()
        .await
        .map_err(store_failure("list todos", HandlerError::LIST_TODOS))?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Todo>, HandlerError> {
    let Some(id) = parse_id(path) else {
        return Err(HandlerError::TODO_NOT_FOUND);
    };
    state
        .store
        .find_todo(id)
        .await
        .map_err(store_failure("fetch todo", HandlerError::FETCH_TODO))?
        .map(Json)
        .ok_or(HandlerError::TODO_NOT_FOUND)
}

pub async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Todo>, HandlerError> {
    let input = accept(payload, state.payloads, HandlerError::UPDATE_TODO)?;
    let id = parse_id(path).ok_or(HandlerError::UPDATE_TODO)?;
    let todo = state
        .store
        .update_todo(id, input)
        .await
        .map_err(store_failure("update todo", HandlerError::UPDATE_TODO))?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(path).ok_or(HandlerError::DELETE_TODO)?;
    state
        .store
        .delete_todo(id)
        .await
        .map_err(store_failure("delete todo", HandlerError::DELETE_TODO))?;
    Ok(StatusCode::NO_CONTENT)
}
