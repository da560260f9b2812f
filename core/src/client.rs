//! Stateless request builder and response parser for the taskboard API.
//!
//! # Design
//! `TaskboardClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the matching `HttpResponse`. The caller runs the round-trip
//! in between, keeping this crate free of I/O.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Todo, TodoInput, User, UserInput};

const USERS: &str = "users";
const TODOS: &str = "todos";

#[derive(Debug, Clone)]
pub struct TaskboardClient {
    base_url: String,
}

impl TaskboardClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- users ---

    pub fn build_list_users(&self) -> HttpRequest {
        self.request(HttpMethod::Get, USERS, None)
    }

    pub fn build_get_user(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &item(USERS, id), None)
    }

    pub fn build_create_user(&self, input: &UserInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, USERS, input)
    }

    pub fn build_update_user(&self, id: Uuid, input: &UserInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &item(USERS, id), input)
    }

    pub fn build_delete_user(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &item(USERS, id), None)
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        decode(response, 201)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        decode(response, 200)
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // --- todos ---

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, TODOS, None)
    }

    pub fn build_get_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, &item(TODOS, id), None)
    }

    pub fn build_create_todo(&self, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, TODOS, input)
    }

    pub fn build_update_todo(&self, id: Uuid, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &item(TODOS, id), input)
    }

    pub fn build_delete_todo(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, &item(TODOS, id), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url: format!("{}/{path}", self.base_url),
            headers,
            body,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(ApiError::Serialization)?;
        Ok(self.request(method, path, Some(body)))
    }
}

fn item(collection: &str, id: Uuid) -> String {
    format!("{collection}/{id}")
}

fn decode<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Map an unexpected status to `ApiError`, preferring the server's
/// `{"error": ...}` message over the raw body.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|body| body.error)
        .unwrap_or_else(|_| response.body.clone());
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TaskboardClient {
        TaskboardClient::new("http://localhost:3000")
    }

    fn ada() -> UserInput {
        UserInput {
            username: "ada".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            password: "x".to_string(),
        }
    }

    #[test]
    fn build_list_users_has_no_body() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_targets_item_path() {
        let req = client().build_get_todo(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:3000/todos/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn build_create_user_sends_json() {
        let req = client().build_create_user(&ada()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/users");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "ada");
        assert_eq!(body["password"], "x");
    }

    #[test]
    fn build_update_todo_omits_unset_done() {
        let input = TodoInput {
            title: "t".to_string(),
            description: "d".to_string(),
            done: None,
            user_id: Uuid::nil(),
        };
        let req = client().build_update_todo(Uuid::nil(), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("done").is_none());
        assert_eq!(body["userId"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn build_delete_user_uses_delete() {
        let req = client().build_delete_user(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = TaskboardClient::new("http://localhost:3000//").build_list_todos();
        assert_eq!(req.url, "http://localhost:3000/todos");
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":"00000000-0000-0000-0000-000000000001","title":"T","description":"D","done":false,"userId":"00000000-0000-0000-0000-000000000002"}]"#,
        );
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "T");
        assert_eq!(todos[0].user_id.to_string(), "00000000-0000-0000-0000-000000000002");
    }

    #[test]
    fn parse_get_user_not_found_keeps_message() {
        let response = HttpResponse::new(404, r#"{"error":"User not found"}"#);
        let err = client().parse_get_user(response).unwrap_err();
        match err {
            ApiError::NotFound { message } => assert_eq!(message, "User not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_create_user_conflict_is_http_error() {
        let response = HttpResponse::new(400, r#"{"error":"Error creating user"}"#);
        let err = client().parse_create_user(response).unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(matches!(
            err,
            ApiError::Http { status: 400, ref message } if message == "Error creating user"
        ));
    }

    #[test]
    fn parse_falls_back_to_raw_body() {
        let response = HttpResponse::new(502, "bad gateway");
        let err = client().parse_list_users(response).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Http { status: 502, ref message } if message == "bad gateway"
        ));
    }

    #[test]
    fn parse_delete_todo_requires_204() {
        assert!(client().parse_delete_todo(HttpResponse::new(204, "")).is_ok());
        let err = client()
            .parse_delete_todo(HttpResponse::new(500, r#"{"error":"Error deleting todo"}"#))
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn parse_get_todo_bad_json() {
        let err = client()
            .parse_get_todo(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
        assert_eq!(err.status(), None);
    }
}
