//! Persistence gateway used by the resource handlers.
//!
//! # Design
//! Handlers never touch a database directly. They receive one shared
//! `Arc<dyn Store>` at router construction and call the per-resource traits
//! below. Two implementations ship with the crate: `InMemoryStore` (tests,
//! throwaway runs) and `SqliteStore` (durable).
//!
//! The contract the handlers rely on:
//! - `find_*` reports absence as `Ok(None)`, never as an error.
//! - `update_*` and `delete_*` on an unknown id fail with `StoreError::NotFound`.
//! - Uniqueness and reference violations fail with `Conflict` and
//!   `MissingReference` respectively; anything else is `Backend`.
//! - Identifiers are assigned by the store and never change.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Todo, TodoInput, User, UserInput};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a `Store`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record has the requested identifier.
    #[error("record not found")]
    NotFound,

    /// A unique column already holds the submitted value.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A reference points at a record that does not exist, or a delete would
    /// leave dangling references behind.
    #[error("reference constraint violated: {0}")]
    MissingReference(String),

    /// The storage engine failed for a reason the caller cannot act on.
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore {
    async fn create_user(&self, input: UserInput) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: Uuid, input: UserInput) -> StoreResult<User>;
    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait TodoStore {
    async fn create_todo(&self, input: TodoInput) -> StoreResult<Todo>;
    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>>;
    async fn list_todos(&self) -> StoreResult<Vec<Todo>>;
    async fn update_todo(&self, id: Uuid, input: TodoInput) -> StoreResult<Todo>;
    async fn delete_todo(&self, id: Uuid) -> StoreResult<()>;
}

/// The single handle shared by every handler.
pub trait Store: UserStore + TodoStore + Send + Sync {}

impl<T> Store for T where T: UserStore + TodoStore + Send + Sync {}
