//! High-level facade: one method per operation, each returning `{status, body}`.
//!
//! A call validates its options, builds the request, runs it through the
//! transport exactly once and wraps whatever came back in an `ApiResponse`.
//! Validation failures return before the transport is touched.

use crate::client::ChatClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{ApiResponse, HttpRequest};
use crate::transport::Transport;
use crate::types::{
    CreateRoomOptions, CreateUserOptions, CreateUsersOptions, GetRoomsOptions, IdOptions, RoomMembershipOptions,
    UpdateRoomOptions,
};

#[derive(Debug, Clone)]
pub struct ChatSession<T> {
    client: ChatClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl ChatSession<crate::transport::UreqTransport> {
    /// Session over the blocking ureq transport.
    pub fn connect(config: ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> ChatSession<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ChatClient::from_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn create_user(&self, opts: &CreateUserOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_user(opts)?)
    }

    pub fn create_users(&self, opts: &CreateUsersOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_users(opts)?)
    }

    pub fn create_room(&self, opts: &CreateRoomOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_room(opts)?)
    }

    pub fn update_room(&self, opts: &UpdateRoomOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_room(opts)?)
    }

    pub fn delete_room(&self, opts: &IdOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_room(opts)?)
    }

    pub fn get_room(&self, opts: &IdOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_room(opts)?)
    }

    pub fn get_rooms(&self, opts: &GetRoomsOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_rooms(opts))
    }

    pub fn get_user_rooms(&self, opts: &IdOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_user_rooms(opts)?)
    }

    pub fn get_user_joinable_rooms(&self, opts: &IdOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_user_joinable_rooms(opts)?)
    }

    pub fn add_users_to_room(&self, opts: &RoomMembershipOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_add_users_to_room(opts)?)
    }

    pub fn remove_users_from_room(&self, opts: &RoomMembershipOptions) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_remove_users_from_room(opts)?)
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse::from_http(self.transport.execute(request)?))
    }
}
