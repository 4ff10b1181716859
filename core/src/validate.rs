//! Presence checks for required request fields.
//!
//! Runs before any request is built, so invalid input never costs a
//! round-trip. Ids that end up in the URL path must also be non-empty: an
//! empty one would produce paths such as `/rooms/`.

use crate::error::ApiError;

/// Return the value of a required path id or `MissingArgument(name)`.
pub(crate) fn require_path_segment<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingArgument(name)),
    }
}

/// Return the value of a required field or `MissingArgument(name)`.
pub(crate) fn require<'a, T>(value: &'a Option<T>, name: &'static str) -> Result<&'a T, ApiError> {
    value.as_ref().ok_or(ApiError::MissingArgument(name))
}
