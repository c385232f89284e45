//! # Core Abstractions
//!
//! Error types and the service seams the bridges depend on.
//!
//! - **[`error`]**: `ApiError`, `AppError`, `Result<T>`
//! - **[`service`]**: `AuthApi`, `MediaApi`, `AgentApi`, `TokenStore`, `Navigator`
//!
//! ## Dependency Injection
//!
//! Bridges take `Arc<dyn Trait>` collaborators so tests can swap in fakes:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use channel::core::service::{AuthApi, TokenStore};
//! use channel::services::credentials::MemoryTokenStore;
//!
//! let credentials: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, Result};
pub use service::{AgentApi, AuthApi, MediaApi, Navigator, TokenStore};
