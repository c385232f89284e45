//! # Utility Functions
//!
//! ## Modules
//!
//! - **[`validation`]**: Sign-in and sign-up form validation
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Timestamp conversion and duration formatting

pub mod validation;
