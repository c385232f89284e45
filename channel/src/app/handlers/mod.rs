//! # Page Handlers
//!
//! User actions, organized by page.

pub mod auth;
pub mod channel;
pub mod dashboard;
pub mod settings;
