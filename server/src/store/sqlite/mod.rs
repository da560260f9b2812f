//! Durable store on top of SQLite.
//!
//! # Design
//! One `rusqlite::Connection` sits behind a mutex shared by every clone of
//! the store. Each operation moves onto tokio's blocking pool, takes the
//! lock, and runs a single statement, so SQLite itself serializes
//! concurrent writes to the same row (last write wins).
//!
//! # Invariants
//! - Connections handed out by `open`/`open_in_memory` have
//!   `foreign_keys=ON` and every migration applied.
//! - Identifiers are stored as hyphenated UUID text.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::{StoreError, StoreResult, TodoStore, UserStore};
use crate::model::{Todo, TodoInput, User, UserInput};

pub mod migrations;

const USER_COLUMNS: &str = "id, username, firstname, lastname, password";
const TODO_COLUMNS: &str = "id, title, description, done, user_id";

/// Failures while opening or migrating a database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("database schema version {found} is newer than supported {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let started_at = Instant::now();
        let conn = Connection::open(path)
            .map_err(DbError::from)
            .and_then(bootstrap);
        match conn {
            Ok(conn) => {
                info!(
                    path = %path.display(),
                    duration_ms = started_at.elapsed().as_millis() as u64,
                    "database opened"
                );
                Ok(Self::from_connection(conn))
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "database open failed");
                Err(err)
            }
        }
    }

    /// Open a private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = bootstrap(Connection::open_in_memory()?)?;
        info!("in-memory database opened");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("connection lock poisoned".to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|err| StoreError::Backend(err.to_string()))?
    }
}

fn bootstrap(mut conn: Connection) -> Result<Connection, DbError> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    migrations::apply_migrations(&mut conn)?;
    Ok(conn)
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            rusqlite::Error::SqliteFailure(failure, message) => {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        StoreError::Conflict(detail)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::MissingReference(detail),
                    _ => StoreError::Backend(err.to_string()),
                }
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

fn uuid_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(index)?;
    Uuid::parse_str(&raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        username: row.get(1)?,
        firstname: row.get(2)?,
        lastname: row.get(3)?,
        password: row.get(4)?,
    })
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        done: row.get(3)?,
        user_id: uuid_column(row, 4)?,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, input: UserInput) -> StoreResult<User> {
        self.with_conn(move |conn| {
            let user = User::from_input(Uuid::new_v4(), input);
            conn.execute(
                "INSERT INTO users (id, username, firstname, lastname, password)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    user.id.to_string(),
                    user.username,
                    user.firstname,
                    user.lastname,
                    user.password,
                ],
            )?;
            Ok(user)
        })
        .await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.with_conn(move |conn| {
            let user = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"),
                    params![id.to_string()],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
        .await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid;"))?;
            let users = stmt
                .query_map([], user_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(users)
        })
        .await
    }

    async fn update_user(&self, id: Uuid, input: UserInput) -> StoreResult<User> {
        self.with_conn(move |conn| {
            let user = conn.query_row(
                &format!(
                    "UPDATE users
                     SET username = ?1, firstname = ?2, lastname = ?3, password = ?4
                     WHERE id = ?5
                     RETURNING {USER_COLUMNS};"
                ),
                params![
                    input.username,
                    input.firstname,
                    input.lastname,
                    input.password,
                    id.to_string(),
                ],
                user_from_row,
            )?;
            Ok(user)
        })
        .await
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM users WHERE id = ?1;", params![id.to_string()])?;
            if removed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn create_todo(&self, input: TodoInput) -> StoreResult<Todo> {
        self.with_conn(move |conn| {
            let todo = Todo::from_input(Uuid::new_v4(), input);
            conn.execute(
                "INSERT INTO todos (id, title, description, done, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    todo.id.to_string(),
                    todo.title,
                    todo.description,
                    todo.done,
                    todo.user_id.to_string(),
                ],
            )?;
            Ok(todo)
        })
        .await
    }

    async fn find_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        self.with_conn(move |conn| {
            let todo = conn
                .query_row(
                    &format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?1;"),
                    params![id.to_string()],
                    todo_from_row,
                )
                .optional()?;
            Ok(todo)
        })
        .await
    }

    async fn list_todos(&self) -> StoreResult<Vec<Todo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY rowid;"))?;
            let todos = stmt
                .query_map([], todo_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(todos)
        })
        .await
    }

    async fn update_todo(&self, id: Uuid, input: TodoInput) -> StoreResult<Todo> {
        self.with_conn(move |conn| {
            // A NULL `done` keeps the stored flag.
            let todo = conn.query_row(
                &format!(
                    "UPDATE todos
                     SET title = ?1, description = ?2, done = COALESCE(?3, done), user_id = ?4
                     WHERE id = ?5
                     RETURNING {TODO_COLUMNS};"
                ),
                params![
                    input.title,
                    input.description,
                    input.done,
                    input.user_id.to_string(),
                    id.to_string(),
                ],
                todo_from_row,
            )?;
            Ok(todo)
        })
        .await
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<()> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM todos WHERE id = ?1;", params![id.to_string()])?;
            if removed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }
}
