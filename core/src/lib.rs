//! Synchronous API client core for a hosted chat service (rooms and users).
//!
//! # Overview
//! Validates operation options, builds `HttpRequest` values and parses
//! `HttpResponse` values (host-does-IO pattern). `ChatSession` pairs the
//! client with a `Transport` and returns the normalized `{status, body}`
//! envelope for every call.
//!
//! # Design
//! - `ChatClient` is stateless: it holds the base URL and an optional token.
//! - Required fields are checked before a request exists; a missing one is
//!   `ApiError::MissingArgument` and no network call happens.
//! - Server responses are passed through without interpretation. There are
//!   no retries.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;
mod validate;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse};
pub use session::ChatSession;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    CreateRoomOptions, CreateUserOptions, CreateUsersOptions, CustomData, GetRoomsOptions, IdOptions, Room,
    RoomMembershipOptions, UpdateRoomOptions, User,
};
