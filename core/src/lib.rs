//! Client core for the taskboard users/todos API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! HTTP round-trip, so the core stays deterministic and transport-agnostic.
//!
//! # Design
//! - `TaskboardClient` is stateless; it holds only `base_url`.
//! - Each endpoint is split into `build_*` and `parse_*`, making the I/O
//!   boundary explicit.
//! - Error bodies (`{"error": "..."}`) are surfaced as the message of the
//!   returned `ApiError`.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TaskboardClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Todo, TodoInput, User, UserInput};
