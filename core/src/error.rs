//! Error types for the chat API client.
//!
//! # Design
//! `MissingArgument` is the only error raised before a request exists: the
//! validator refuses to build anything when a required field is absent.
//! Server failures are never interpreted. Typed parse helpers report an
//! unexpected status as `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `ChatClient` build/parse methods and `ChatSession` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was absent (or empty) when building a request.
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),

    /// The server answered with a status other than the one the operation expects.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not produce a response at all.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors raised while loading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is not set")]
    MissingVar(&'static str),
}
