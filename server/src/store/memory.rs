//! Volatile store backed by in-process collections.
//!
//! Enforces the same constraints as the SQLite schema (unique usernames,
//! todo owners must exist, users with todos cannot be deleted) so that tests
//! written against it hold for the durable store too. Lists come back in
//! insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore, UserStore};
use crate::model::{Todo, TodoInput, User, UserInput};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// Cloning yields another handle onto the same tables.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, input: UserInput) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&input.username, None) {
            return Err(StoreError::Conflict("users.username".to_string()));
        }
        let user = User::from_input(Uuid::new_v4(), input);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn update_user(&self, id: Uuid, input: UserInput) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(id) {
            return Err(StoreError::NotFound);
        }
        if tables.username_taken(&input.username, Some(id)) {
            return Err(StoreError::Conflict("users.username".to_string()));
        }
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        *user = User::from_input(id, input);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let index = tables
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        if tables.todos.iter().any(|t| t.user_id == id) {
            return Err(StoreError::MissingReference("todos.userId".to_string()));
        }
        tables.users.remove(index);
        Ok(())
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn create_todo(&self, input: TodoInput) -> StoreResult<Todo> {
        let mut tables = self.tables.write().await;
        if !tables.user_exists(input.user_id) {
            return Err(StoreError::MissingReference("todos.userId".to_string()));
        }
        let todo = Todo::from_input(Uuid::new_v4(), input);
        tables.todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn list_todos(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.tables.read().await.todos.clone())
    }

    async fn update_todo(&self, id: Uuid, input: TodoInput) -> StoreResult<Todo> {
        let mut tables = self.tables.write().await;
        let owner_exists = tables.user_exists(input.user_id);
        let todo = tables
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        if !owner_exists {
            return Err(StoreError::MissingReference("todos.userId".to_string()));
        }
        todo.apply(input);
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let index = tables
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        tables.todos.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> UserInput {
        UserInput {
            username: "ada".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            password: "x".to_string(),
        }
    }

    fn chore(user_id: Uuid) -> TodoInput {
        TodoInput {
            title: "Notes".to_string(),
            description: "Annotate the engine paper".to_string(),
            done: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = InMemoryStore::new();
        store.create_user(ada()).await.unwrap();
        let err = store.create_user(ada()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_may_keep_own_username() {
        let store = InMemoryStore::new();
        let user = store.create_user(ada()).await.unwrap();
        let mut input = ada();
        input.lastname = "King".to_string();
        let updated = store.update_user(user.id, input).await.unwrap();
        assert_eq!(updated.lastname, "King");
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update_user(Uuid::new_v4(), ada()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn todo_requires_existing_owner() {
        let store = InMemoryStore::new();
        let err = store.create_todo(chore(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[tokio::test]
    async fn owner_with_todos_cannot_be_deleted() {
        let store = InMemoryStore::new();
        let user = store.create_user(ada()).await.unwrap();
        let todo = store.create_todo(chore(user.id)).await.unwrap();

        let err = store.delete_user(user.id).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));

        store.delete_todo(todo.id).await.unwrap();
        store.delete_user(user.id).await.unwrap();
        assert!(store.find_user(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lists_preserve_insertion_order() {
        let store = InMemoryStore::new();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let mut input = ada();
            input.username = name.to_string();
            ids.push(store.create_user(input).await.unwrap().id);
        }
        let listed: Vec<Uuid> = store
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn clones_share_tables() {
        let store = InMemoryStore::new();
        let other = store.clone();
        let user = store.create_user(ada()).await.unwrap();
        assert_eq!(other.find_user(user.id).await.unwrap(), Some(user));
    }
}
