// Error types: internal (store/service) and API-facing enums
pub mod api;
pub mod internal;

pub use api::{ApiError, AuthError};
pub use internal::InternalError;

/// Prefer the human-readable suffix of an internal error message.
///
/// Internal errors carry a `"<category>: "` prefix for logs; when the
/// message is surfaced to the actor, the first such prefix is stripped so
/// the error taxonomy does not leak into the UI. Messages without a colon
/// pass through unchanged.
pub fn user_facing_message(message: &str) -> &str {
    match message.split_once(':') {
        Some((_, rest)) => rest.trim_start(),
        None => message,
    }
}
