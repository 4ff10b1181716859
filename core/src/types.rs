//! Domain DTOs and per-operation options for the chat API.
//!
//! # Design
//! Entities (`Room`, `User`) are what the server returns. Options structs are
//! what callers pass in: every field is an `Option` so that presence checks
//! happen in one place (`validate`) and a missing field is reported as
//! `ApiError::MissingArgument` rather than refused by the type checker. Fields
//! that end up in the URL path are skipped when the options are serialized as
//! a request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque client-defined metadata attached to a room or user.
pub type CustomData = Map<String, Value>;

/// A room as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub member_user_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.member_user_ids.iter().any(|id| id == user_id)
    }
}

/// A user as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Options for `create_user`. Requires `id` and `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Options for `create_users`. Requires `users`, each of which requires `id` and `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUsersOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<CreateUserOptions>>,
}

/// Options for `create_room`. Requires `name` and `creator_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRoomOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Options for `update_room`. Requires `id`; only the fields present are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRoomOptions {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Options for operations addressed by a single id: `delete_room`,
/// `get_room`, `get_user_rooms` and `get_user_joinable_rooms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdOptions {
    pub id: Option<String>,
}

impl IdOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

/// Options for `get_rooms`. Both filters are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetRoomsOptions {
    #[serde(default)]
    pub include_private: Option<bool>,
    #[serde(default)]
    pub from_id: Option<String>,
}

/// Options for `add_users_to_room` and `remove_users_from_room`. Requires both fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomMembershipOptions {
    #[serde(skip_serializing)]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,
}
