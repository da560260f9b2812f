//! HTTP error responses for the resource handlers.
//!
//! # Design
//! Every failing endpoint answers with a fixed English message in
//! `{"error": "..."}`. The underlying cause is logged, never returned, so
//! the message set is closed and listed here in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// A status code paired with the endpoint's fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerError {
    status: StatusCode,
    message: &'static str,
}

impl HandlerError {
    pub const CREATE_USER: Self = Self::bad_request("Error creating user");
    pub const LIST_USERS: Self = Self::internal("Error fetching users");
    pub const USER_NOT_FOUND: Self = Self::not_found("User not found");
    pub const FETCH_USER: Self = Self::internal("Error fetching user");
    pub const UPDATE_USER: Self = Self::bad_request("Error updating user");
    pub const DELETE_USER: Self = Self::internal("Error deleting user");

    pub const CREATE_TODO: Self = Self::bad_request("Error creating todo");
    pub const LIST_TODOS: Self = Self::internal("Error fetching todos");
    pub const TODO_NOT_FOUND: Self = Self::not_found("Todo not found");
    pub const FETCH_TODO: Self = Self::internal("Error fetching todo");
    pub const UPDATE_TODO: Self = Self::bad_request("Error updating todo");
    pub const DELETE_TODO: Self = Self::internal("Error deleting todo");

    const fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    const fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
        }
    }

    const fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn renders_error_envelope() {
        let response = HandlerError::USER_NOT_FOUND.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[test]
    fn statuses_follow_endpoint_table() {
        assert_eq!(HandlerError::CREATE_TODO.status(), StatusCode::BAD_REQUEST);
        assert_eq!(HandlerError::LIST_TODOS.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(HandlerError::UPDATE_USER.status(), StatusCode::BAD_REQUEST);
        assert_eq!(HandlerError::DELETE_USER.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(HandlerError::FETCH_TODO.message(), "Error fetching todo");
    }
}
