//! Stateless HTTP request builder and response parser for the chat API.
//!
//! # Design
//! `ChatClient` holds only the base URL and an optional token, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that validates its options and produces an `HttpRequest`, and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! actual HTTP round-trip (see `transport`), keeping this module
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateRoomOptions, CreateUserOptions, CreateUsersOptions, GetRoomsOptions, IdOptions, Room,
    RoomMembershipOptions, UpdateRoomOptions, User,
};
use crate::validate::{require, require_path_segment};

/// Synchronous, stateless client for the chat API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    token: Option<String>,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self::from_config(ClientConfig::new(base_url))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn build_create_user(&self, opts: &CreateUserOptions) -> Result<HttpRequest, ApiError> {
        require(&opts.id, "id")?;
        require(&opts.name, "name")?;
        self.json_request(HttpMethod::Post, "/users".to_string(), opts)
    }

    pub fn build_create_users(&self, opts: &CreateUsersOptions) -> Result<HttpRequest, ApiError> {
        for user in require(&opts.users, "users")? {
            require(&user.id, "id")?;
            require(&user.name, "name")?;
        }
        self.json_request(HttpMethod::Post, "/batch_users".to_string(), opts)
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    pub fn build_create_room(&self, opts: &CreateRoomOptions) -> Result<HttpRequest, ApiError> {
        require(&opts.name, "name")?;
        require(&opts.creator_id, "creator_id")?;
        self.json_request(HttpMethod::Post, "/rooms".to_string(), opts)
    }

    pub fn build_update_room(&self, opts: &UpdateRoomOptions) -> Result<HttpRequest, ApiError> {
        let id = require_path_segment(&opts.id, "id")?;
        self.json_request(HttpMethod::Put, format!("/rooms/{}", encode(id)), opts)
    }

    pub fn build_delete_room(&self, opts: &IdOptions) -> Result<HttpRequest, ApiError> {
        let id = require_path_segment(&opts.id, "id")?;
        Ok(self.request(HttpMethod::Delete, format!("/rooms/{}", encode(id)), None))
    }

    pub fn build_get_room(&self, opts: &IdOptions) -> Result<HttpRequest, ApiError> {
        let id = require_path_segment(&opts.id, "id")?;
        Ok(self.request(HttpMethod::Get, format!("/rooms/{}", encode(id)), None))
    }

    pub fn build_get_rooms(&self, opts: &GetRoomsOptions) -> HttpRequest {
        let mut query = Vec::new();
        if let Some(include_private) = opts.include_private {
            query.push(format!("include_private={include_private}"));
        }
        if let Some(from_id) = &opts.from_id {
            query.push(format!("from_id={}", encode(from_id)));
        }
        let path = if query.is_empty() {
            "/rooms".to_string()
        } else {
            format!("/rooms?{}", query.join("&"))
        };
        self.request(HttpMethod::Get, path, None)
    }

    pub fn build_get_user_rooms(&self, opts: &IdOptions) -> Result<HttpRequest, ApiError> {
        let id = require_path_segment(&opts.id, "id")?;
        Ok(self.request(HttpMethod::Get, format!("/users/{}/rooms", encode(id)), None))
    }

    pub fn build_get_user_joinable_rooms(&self, opts: &IdOptions) -> Result<HttpRequest, ApiError> {
        let id = require_path_segment(&opts.id, "id")?;
        Ok(self.request(HttpMethod::Get, format!("/users/{}/rooms?joinable=true", encode(id)), None))
    }

    pub fn build_add_users_to_room(&self, opts: &RoomMembershipOptions) -> Result<HttpRequest, ApiError> {
        self.build_membership_change(opts, "add")
    }

    pub fn build_remove_users_from_room(&self, opts: &RoomMembershipOptions) -> Result<HttpRequest, ApiError> {
        self.build_membership_change(opts, "remove")
    }

    fn build_membership_change(&self, opts: &RoomMembershipOptions, action: &str) -> Result<HttpRequest, ApiError> {
        let room_id = require_path_segment(&opts.room_id, "room_id")?;
        require(&opts.user_ids, "user_ids")?;
        self.json_request(HttpMethod::Put, format!("/rooms/{}/users/{action}", encode(room_id)), opts)
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_create_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_create_room(&self, response: HttpResponse) -> Result<Room, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_room(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_delete_room(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_get_room(&self, response: HttpResponse) -> Result<Room, ApiError> {
        parse_json(response, 200)
    }

    /// Parses the response of `get_rooms`, `get_user_rooms` and
    /// `get_user_joinable_rooms`.
    pub fn parse_room_list(&self, response: HttpResponse) -> Result<Vec<Room>, ApiError> {
        parse_json(response, 200)
    }

    /// Parses the response of `add_users_to_room` and `remove_users_from_room`.
    pub fn parse_membership_change(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    // -----------------------------------------------------------------------
    // Request assembly
    // -----------------------------------------------------------------------

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let url = format!("{}{path}", self.base_url);
        log::debug!("built {} {url}", method.as_str());
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn json_request<T: Serialize>(&self, method: HttpMethod, path: String, body: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Anything but the expected status is passed back verbatim as `HttpError`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
