//! Command-line and environment configuration for the server binary.
//!
//! Every flag has a `TASKBOARD_*` environment fallback, so the binary can
//! be configured entirely from a container environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::store::sqlite::DbError;
use crate::store::{InMemoryStore, SqliteStore, Store};
use crate::validation::PayloadPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// SQLite database file at `--database`.
    Sqlite,
    /// Process memory; everything is lost on exit.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Users and todos over JSON/HTTP.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskboard-server", version)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "TASKBOARD_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Persistence backend.
    #[arg(long, env = "TASKBOARD_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite database file, created on first use.
    #[arg(long, env = "TASKBOARD_DATABASE", default_value = "taskboard.db")]
    pub database: PathBuf,

    /// Refuse create/update payloads with blank required text fields.
    #[arg(long, env = "TASKBOARD_STRICT_PAYLOADS")]
    pub strict_payloads: bool,

    #[arg(long, env = "TASKBOARD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn open_store(&self) -> Result<Arc<dyn Store>, DbError> {
        let store: Arc<dyn Store> = match self.store {
            StoreKind::Sqlite => Arc::new(SqliteStore::open(&self.database)?),
            StoreKind::Memory => Arc::new(InMemoryStore::new()),
        };
        Ok(store)
    }

    pub fn payload_policy(&self) -> PayloadPolicy {
        PayloadPolicy::from_strict(self.strict_payloads)
    }
}

/// Reasons the binary can fail before it starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] DbError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("server terminated: {0}")]
    Serve(std::io::Error),
}
