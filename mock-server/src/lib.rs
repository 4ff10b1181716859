use std::{
    collections::{BTreeMap, HashMap, HashSet},
    ops::Bound::{Excluded, Unbounded},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub private: bool,
    pub member_user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub custom_data: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct CreateUsers {
    pub users: Vec<CreateUser>,
}

#[derive(Deserialize)]
pub struct CreateRoom {
    pub name: String,
    pub creator_id: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub user_ids: Vec<String>,
    pub custom_data: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub private: Option<bool>,
    pub custom_data: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct MembershipChange {
    pub user_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct RoomsQuery {
    #[serde(default)]
    pub include_private: bool,
    pub from_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UserRoomsQuery {
    #[serde(default)]
    pub joinable: bool,
}

/// In-memory state. Rooms are keyed by a counter so that ascending key order
/// is creation order, which is the listing order `from_id` pages over.
#[derive(Default)]
pub struct Store {
    users: HashMap<String, User>,
    rooms: BTreeMap<u64, Room>,
    next_room_id: u64,
}

impl Store {
    fn missing_user<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Option<&'a String> {
        ids.into_iter().find(|id| !self.users.contains_key(*id))
    }

    fn room(&self, id: &str) -> Result<&Room, Failure> {
        room_key(id)
            .and_then(|key| self.rooms.get(&key))
            .ok_or_else(room_not_found)
    }

    fn room_mut(&mut self, id: &str) -> Result<&mut Room, Failure> {
        room_key(id)
            .and_then(|key| self.rooms.get_mut(&key))
            .ok_or_else(room_not_found)
    }
}

fn room_key(id: &str) -> Option<u64> {
    id.parse().ok()
}

fn room_not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, "room not found")
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", post(create_user))
        .route("/batch_users", post(create_users))
        .route("/users/{id}/rooms", get(user_rooms))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/{id}", get(get_room).put(update_room).delete(delete_room))
        .route("/rooms/{id}/users/add", put(add_users))
        .route("/rooms/{id}/users/remove", put(remove_users))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("mock chat service listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn new_user(input: CreateUser) -> User {
    let now = Utc::now();
    User {
        id: input.id,
        name: input.name,
        avatar_url: input.avatar_url,
        custom_data: input.custom_data,
        created_at: now,
        updated_at: now,
    }
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), Failure> {
    let mut store = db.write().await;
    if store.users.contains_key(&input.id) {
        return Err(failure(StatusCode::CONFLICT, "user already exists"));
    }
    let user = new_user(input);
    store.users.insert(user.id.clone(), user.clone());
    log::info!("created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn create_users(
    State(db): State<Db>,
    Json(input): Json<CreateUsers>,
) -> Result<(StatusCode, Json<Vec<User>>), Failure> {
    let mut store = db.write().await;
    let mut seen = HashSet::new();
    for user in &input.users {
        if store.users.contains_key(&user.id) || !seen.insert(user.id.as_str()) {
            return Err(failure(StatusCode::CONFLICT, "user already exists"));
        }
    }
    let users: Vec<User> = input.users.into_iter().map(new_user).collect();
    for user in &users {
        store.users.insert(user.id.clone(), user.clone());
    }
    log::info!("created {} users", users.len());
    Ok((StatusCode::CREATED, Json(users)))
}

async fn create_room(
    State(db): State<Db>,
    Json(input): Json<CreateRoom>,
) -> Result<(StatusCode, Json<Room>), Failure> {
    let mut store = db.write().await;
    if store
        .missing_user(std::iter::once(&input.creator_id).chain(&input.user_ids))
        .is_some()
    {
        return Err(failure(StatusCode::NOT_FOUND, "user not found"));
    }

    let mut members = vec![input.creator_id];
    for id in input.user_ids {
        if !members.contains(&id) {
            members.push(id);
        }
    }

    store.next_room_id += 1;
    let key = store.next_room_id;
    let now = Utc::now();
    let room = Room {
        id: key.to_string(),
        name: input.name,
        private: input.private,
        member_user_ids: members,
        custom_data: input.custom_data,
        created_at: now,
        updated_at: now,
    };
    store.rooms.insert(key, room.clone());
    log::info!("created room {} ({})", room.id, room.name);
    Ok((StatusCode::CREATED, Json(room)))
}

async fn list_rooms(
    State(db): State<Db>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<Room>>, Failure> {
    let after = match query.from_id.as_deref() {
        Some(id) => id
            .parse::<u64>()
            .map_err(|_| failure(StatusCode::BAD_REQUEST, "from_id must be a room id"))?,
        None => 0,
    };
    let store = db.read().await;
    let rooms = store
        .rooms
        .range((Excluded(after), Unbounded))
        .map(|(_, room)| room)
        .filter(|room| query.include_private || !room.private)
        .cloned()
        .collect();
    Ok(Json(rooms))
}

async fn get_room(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Room>, Failure> {
    let store = db.read().await;
    store.room(&id).map(|room| Json(room.clone()))
}

async fn update_room(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRoom>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let room = store.room_mut(&id)?;
    if let Some(name) = input.name {
        room.name = name;
    }
    if let Some(private) = input.private {
        room.private = private;
    }
    if let Some(custom_data) = input.custom_data {
        room.custom_data = Some(custom_data);
    }
    room.updated_at = Utc::now();
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_room(State(db): State<Db>, Path(id): Path<String>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let room = room_key(&id)
        .and_then(|key| store.rooms.remove(&key))
        .ok_or_else(room_not_found)?;
    log::info!("deleted room {} ({})", room.id, room.name);
    Ok(StatusCode::NO_CONTENT)
}

async fn add_users(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<MembershipChange>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    if store.missing_user(&input.user_ids).is_some() {
        return Err(failure(StatusCode::NOT_FOUND, "user not found"));
    }
    let room = store.room_mut(&id)?;
    for user_id in input.user_ids {
        if !room.member_user_ids.contains(&user_id) {
            room.member_user_ids.push(user_id);
        }
    }
    room.updated_at = Utc::now();
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_users(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<MembershipChange>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let room = store.room_mut(&id)?;
    room.member_user_ids.retain(|member| !input.user_ids.contains(member));
    room.updated_at = Utc::now();
    Ok(StatusCode::NO_CONTENT)
}

/// Rooms the user belongs to, or with `joinable=true`, public rooms they do not.
async fn user_rooms(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<UserRoomsQuery>,
) -> Result<Json<Vec<Room>>, Failure> {
    let store = db.read().await;
    if !store.users.contains_key(&id) {
        return Err(failure(StatusCode::NOT_FOUND, "user not found"));
    }
    let rooms = store
        .rooms
        .values()
        .filter(|room| {
            let member = room.member_user_ids.contains(&id);
            if query.joinable {
                !member && !room.private
            } else {
                member
            }
        })
        .cloned()
        .collect();
    Ok(Json(rooms))
}
