//! # Backend API Client Module
//!
//! HTTP client for the backend REST API.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and path helpers
//! ├── client.rs   - ApiClient (bearer injection, 401 handling, HttpError)
//! ├── auth.rs     - /auth/* (login, register, logout, me, profile, refresh)
//! ├── livekit.rs  - /livekit/* (access tokens, room CRUD)
//! └── agent.rs    - /ai-agent/* (message, history, activation)
//! ```

pub mod agent;
pub mod auth;
pub mod client;
pub mod livekit;

pub use client::ApiClient;

/// Percent-encode a value for use as a single URL path segment.
pub(crate) fn path_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("quick-session-1700000000000"), "quick-session-1700000000000");
        assert_eq!(path_segment("AI Support Session"), "AI%20Support%20Session");
        assert_eq!(path_segment("a/b?c"), "a%2Fb%3Fc");
    }
}
