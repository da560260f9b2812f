//! Records and request payloads for the two persisted resources.
//!
//! # Design
//! Records (`User`, `Todo`) are what the store hands back and what the API
//! serializes. Payloads (`UserInput`, `TodoInput`) are what callers send on
//! create and update. Payloads reject unknown keys, so a caller can never
//! smuggle an `id` or any other undeclared column into the store.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A stored user.
///
/// `password` is kept and returned verbatim. See DESIGN.md before exposing
/// this beyond a trusted network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub password: String,
}

/// Fields accepted by `POST /users` and `PUT /users/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserInput {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub password: String,
}

impl User {
    pub fn from_input(id: Uuid, input: UserInput) -> Self {
        Self {
            id,
            username: input.username,
            firstname: input.firstname,
            lastname: input.lastname,
            password: input.password,
        }
    }
}

/// A stored todo, owned by the user named in `user_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub user_id: Uuid,
}

/// Fields accepted by `POST /todos` and `PUT /todos/{id}`.
///
/// `done` is optional: on create it defaults to `false`, on update an
/// absent value leaves the stored flag alone. An explicit `null` is not
/// absence; the column is not nullable, so it is refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
    #[serde(
        default,
        deserialize_with = "present_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub done: Option<bool>,
    pub user_id: Uuid,
}

/// Only runs when the key is present, so `null` fails as a non-boolean.
fn present_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    bool::deserialize(deserializer).map(Some)
}

impl Todo {
    pub fn from_input(id: Uuid, input: TodoInput) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            done: input.done.unwrap_or(false),
            user_id: input.user_id,
        }
    }

    /// Overwrite every caller-controlled field with `input`.
    pub fn apply(&mut self, input: TodoInput) {
        self.title = input.title;
        self.description = input.description;
        if let Some(done) = input.done {
            self.done = done;
        }
        self.user_id = input.user_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_user_id_in_camel_case() {
        let todo = Todo {
            id: Uuid::nil(),
            title: "Write".to_string(),
            description: "the report".to_string(),
            done: false,
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["userId"], "00000000-0000-0000-0000-000000000000");
        assert!(json.get("user_id").is_none());
        assert_eq!(json["done"], false);
    }

    #[test]
    fn todo_input_done_is_optional() {
        let input: TodoInput = serde_json::from_str(
            r#"{"title":"t","description":"d","userId":"00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert_eq!(input.done, None);
        assert!(!Todo::from_input(Uuid::nil(), input).done);
    }

    #[test]
    fn todo_input_rejects_null_done() {
        let result: Result<TodoInput, _> = serde_json::from_str(
            r#"{"title":"t","description":"d","done":null,"userId":"00000000-0000-0000-0000-000000000001"}"#,
        );
        assert!(result.is_err());

        let input: TodoInput = serde_json::from_str(
            r#"{"title":"t","description":"d","done":true,"userId":"00000000-0000-0000-0000-000000000001"}"#,
        )
        .unwrap();
        assert_eq!(input.done, Some(true));
    }

    #[test]
    fn todo_input_rejects_unknown_fields() {
        let result: Result<TodoInput, _> = serde_json::from_str(
            r#"{"title":"t","description":"d","userId":"00000000-0000-0000-0000-000000000001","priority":3}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn user_input_rejects_caller_supplied_id() {
        let result: Result<UserInput, _> = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","username":"ada","firstname":"Ada","lastname":"Lovelace","password":"x"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn user_input_requires_every_field() {
        let result: Result<UserInput, _> =
            serde_json::from_str(r#"{"username":"ada","firstname":"Ada","lastname":"Lovelace"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn apply_keeps_done_when_absent() {
        let mut todo = Todo {
            id: Uuid::nil(),
            title: "old".to_string(),
            description: "old".to_string(),
            done: true,
            user_id: Uuid::nil(),
        };
        let owner = Uuid::new_v4();
        todo.apply(TodoInput {
            title: "new".to_string(),
            description: "new".to_string(),
            done: None,
            user_id: owner,
        });
        assert_eq!(todo.title, "new");
        assert!(todo.done);
        assert_eq!(todo.user_id, owner);
    }
}
