use axum::http::{self, Request, StatusCode};
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, Room, User};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn call(app: &mut RouterIntoService<String>, request: Request<String>) -> axum::response::Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

async fn create_user(app: &mut RouterIntoService<String>, id: &str) {
    let body = format!(r#"{{"id":"{id}","name":"{id}"}}"#);
    let resp = call(app, json_request("POST", "/users", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn create_room(app: &mut RouterIntoService<String>, body: &str) -> Room {
    let resp = call(app, json_request("POST", "/rooms", body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn list(app: &mut RouterIntoService<String>, uri: &str) -> Vec<Room> {
    let resp = call(app, empty_request("GET", uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- users ---

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"id":"ham","name":"Ham"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.id, "ham");
    assert_eq!(user.name, "Ham");
}

#[tokio::test]
async fn create_user_twice_conflicts() {
    let mut app = app().into_service();
    create_user(&mut app, "ham").await;
    let resp = call(&mut app, json_request("POST", "/users", r#"{"id":"ham","name":"Ham"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn batch_users_are_created_together() {
    let mut app = app().into_service();
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/batch_users",
            r#"{"users":[{"id":"ham","name":"Ham"},{"id":"jam","name":"Jam"}]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 2);

    // a batch with one existing id creates nothing
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/batch_users",
            r#"{"users":[{"id":"spam","name":"Spam"},{"id":"ham","name":"Ham"}]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let resp = call(&mut app, empty_request("GET", "/users/spam/rooms")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- rooms ---

#[tokio::test]
async fn list_rooms_empty() {
    let resp = app().oneshot(empty_request("GET", "/rooms")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let rooms: Vec<Room> = body_json(resp).await;
    assert!(rooms.is_empty());
}

#[tokio::test]
async fn create_room_makes_creator_a_member() {
    let mut app = app().into_service();
    create_user(&mut app, "ham").await;
    let room = create_room(&mut app, r#"{"name":"my room","creator_id":"ham"}"#).await;
    assert_eq!(room.name, "my room");
    assert!(!room.private);
    assert_eq!(room.member_user_ids, vec!["ham".to_string()]);
}

#[tokio::test]
async fn create_room_with_unknown_creator_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/rooms", r#"{"name":"my room","creator_id":"ghost"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn create_room_missing_name_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/rooms", r#"{"creator_id":"ham"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_room_not_found() {
    let resp = app().oneshot(empty_request("GET", "/rooms/99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app().oneshot(empty_request("GET", "/rooms/not-a-number")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_rooms_filters_private_and_pages_by_from_id() {
    let mut app = app().into_service();
    create_user(&mut app, "ham").await;
    let first = create_room(&mut app, r#"{"name":"my room","creator_id":"ham","private":true}"#).await;
    let second = create_room(&mut app, r#"{"name":"my second room","creator_id":"ham"}"#).await;

    let rooms = list(&mut app, "/rooms").await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, second.id);

    let rooms = list(&mut app, "/rooms?include_private=true").await;
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].id, first.id);
    assert!(rooms[0].private);

    let rooms = list(&mut app, &format!("/rooms?include_private=true&from_id={}", first.id)).await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, second.id);

    let rooms = list(&mut app, &format!("/rooms?include_private=true&from_id={}", second.id)).await;
    assert!(rooms.is_empty());

    let resp = call(&mut app, empty_request("GET", "/rooms?from_id=abc")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_rooms_and_joinable_rooms() {
    let mut app = app().into_service();
    create_user(&mut app, "ham").await;
    create_user(&mut app, "jam").await;
    let own = create_room(&mut app, r#"{"name":"mine","creator_id":"ham"}"#).await;
    let other = create_room(&mut app, r#"{"name":"theirs","creator_id":"jam"}"#).await;
    create_room(&mut app, r#"{"name":"secret","creator_id":"jam","private":true}"#).await;

    let rooms = list(&mut app, "/users/ham/rooms").await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, own.id);

    let rooms = list(&mut app, "/users/ham/rooms?joinable=true").await;
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, other.id);

    let resp = call(&mut app, empty_request("GET", "/users/ghost/rooms")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn room_lifecycle() {
    let mut app = app().into_service();
    create_user(&mut app, "ham").await;
    create_user(&mut app, "jam").await;
    create_user(&mut app, "spam").await;

    // create
    let room = create_room(&mut app, r#"{"name":"my room","creator_id":"ham","custom_data":{"foo":"bar"}}"#).await;
    let uri = format!("/rooms/{}", room.id);
    assert_eq!(room.custom_data.as_ref().unwrap()["foo"], "bar");

    // update
    let resp = call(
        &mut app,
        json_request("PUT", &uri, r#"{"name":"new name","private":true,"custom_data":{"foo":"baz"}}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = call(&mut app, empty_request("GET", &uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Room = body_json(resp).await;
    assert_eq!(fetched.name, "new name");
    assert!(fetched.private);
    assert_eq!(fetched.custom_data.as_ref().unwrap()["foo"], "baz");

    // add members, twice to check idempotence
    for _ in 0..2 {
        let resp = call(
            &mut app,
            json_request("PUT", &format!("{uri}/users/add"), r#"{"user_ids":["jam","spam"]}"#),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
    let fetched: Room = body_json(call(&mut app, empty_request("GET", &uri)).await).await;
    assert_eq!(fetched.member_user_ids, vec!["ham", "jam", "spam"]);

    // adding an unknown user is rejected
    let resp = call(
        &mut app,
        json_request("PUT", &format!("{uri}/users/add"), r#"{"user_ids":["ghost"]}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // remove a member
    let resp = call(
        &mut app,
        json_request("PUT", &format!("{uri}/users/remove"), r#"{"user_ids":["spam"]}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let fetched: Room = body_json(call(&mut app, empty_request("GET", &uri)).await).await;
    assert_eq!(fetched.member_user_ids, vec!["ham", "jam"]);

    // delete
    let resp = call(&mut app, empty_request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get and delete after delete - 404
    let resp = call(&mut app, empty_request("GET", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = call(&mut app, empty_request("DELETE", &uri)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(list(&mut app, "/rooms?include_private=true").await.is_empty());
}
