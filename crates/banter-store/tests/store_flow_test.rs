//! Integration tests: store actions driving a stateful in-process fake of
//! the chat API, session persistence through the storage seam included.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use banter_client::ClientConfig;
use banter_storage::{MemoryStorage, Storage, keys};
use banter_store::AppState;
use banter_types::api::ErrorBody;
use banter_types::{Conversation, Message, MessageRole, UserProfile};

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct FakeApi {
    conversations: Arc<Mutex<Vec<Conversation>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            detail: "Could not validate credentials".into(),
        }),
    )
}

fn test_user() -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        email: "a@b.com".into(),
        name: "Ada".into(),
    }
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    if body["password"] == "Abcdefg1" {
        Ok(Json(json!({ "token": TOKEN, "user": test_user() })))
    } else {
        Err(unauthorized())
    }
}

async fn me(headers: HeaderMap) -> Result<Json<UserProfile>, (StatusCode, Json<ErrorBody>)> {
    if authorized(&headers) {
        Ok(Json(test_user()))
    } else {
        Err(unauthorized())
    }
}

async fn list_conversations(State(api): State<FakeApi>) -> Json<Vec<Conversation>> {
    Json(api.conversations.lock().unwrap().clone())
}

async fn create_conversation(
    State(api): State<FakeApi>,
    Json(body): Json<Value>,
) -> Json<Conversation> {
    let now = Utc::now();
    let conversation = Conversation {
        id: Uuid::new_v4(),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        created_at: now,
        updated_at: now,
        messages: vec![],
    };
    api.conversations.lock().unwrap().push(conversation.clone());
    Json(conversation)
}

async fn rename_conversation(
    State(api): State<FakeApi>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Conversation>, StatusCode> {
    let mut conversations = api.conversations.lock().unwrap();
    let conversation = conversations
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    conversation.title = body["title"].as_str().unwrap_or_default().to_string();
    Ok(Json(conversation.clone()))
}

async fn delete_conversation(
    State(api): State<FakeApi>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut conversations = api.conversations.lock().unwrap();
    let before = conversations.len();
    conversations.retain(|c| c.id != id);
    if conversations.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn send_message(
    State(api): State<FakeApi>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Message>, StatusCode> {
    let message = Message {
        id: Uuid::new_v4(),
        role: MessageRole::User,
        content: body["content"].as_str().unwrap_or_default().to_string(),
        timestamp: Utc::now(),
    };
    let mut conversations = api.conversations.lock().unwrap();
    let conversation = conversations
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    conversation.messages.push(message.clone());
    conversation.updated_at = message.timestamp;
    Ok(Json(message))
}

async fn spawn_api(logout_status: StatusCode) -> SocketAddr {
    let api = FakeApi::default();
    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/auth/logout",
            post(move || async move { logout_status }),
        )
        .route("/api/auth/me", get(me))
        .route("/api/conversations", get(list_conversations))
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations/{id}", put(rename_conversation))
        .route("/api/conversations/{id}", delete(delete_conversation))
        .route("/api/conversations/{id}/messages", post(send_message))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn app_for(addr: SocketAddr, storage: Arc<dyn Storage>) -> AppState {
    AppState::new(
        ClientConfig {
            base_url: format!("http://{}/api", addr),
            request_timeout: Duration::from_secs(5),
            retry_timeout: Duration::from_secs(10),
        },
        storage,
    )
}

#[tokio::test]
async fn login_persists_token_and_sets_authenticated() {
    let addr = spawn_api(StatusCode::OK).await;
    let storage = Arc::new(MemoryStorage::new());
    let app = app_for(addr, storage.clone());

    assert!(!app.session.is_authenticated());

    let user = app.session.login("a@b.com", "Abcdefg1").await.unwrap();
    assert_eq!(user.name, "Ada");
    assert!(app.session.is_authenticated());
    assert_eq!(storage.read(keys::TOKEN).as_deref(), Some(TOKEN));
    assert!(storage.read(keys::USER).is_some());
}

#[tokio::test]
async fn failed_login_leaves_session_anonymous() {
    let addr = spawn_api(StatusCode::OK).await;
    let storage = Arc::new(MemoryStorage::new());
    let app = app_for(addr, storage.clone());

    let err = app.session.login("a@b.com", "wrong").await.unwrap_err();
    assert_eq!(err.message, "Could not validate credentials");
    assert!(!app.session.is_authenticated());
    assert_eq!(storage.read(keys::TOKEN), None);
}

#[tokio::test]
async fn logout_clears_locally_even_when_remote_fails() {
    let addr = spawn_api(StatusCode::INTERNAL_SERVER_ERROR).await;
    let storage = Arc::new(MemoryStorage::new());
    let app = app_for(addr, storage.clone());

    app.session.login("a@b.com", "Abcdefg1").await.unwrap();
    assert!(app.session.is_authenticated());

    app.session.logout().await;
    assert!(!app.session.is_authenticated());
    assert_eq!(storage.read(keys::TOKEN), None);
    assert_eq!(storage.read(keys::USER), None);
}

#[tokio::test]
async fn session_restores_from_storage_and_check_refreshes_user() {
    let addr = spawn_api(StatusCode::OK).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.write(keys::TOKEN, TOKEN).unwrap();

    let app = app_for(addr, storage.clone());
    assert!(app.session.is_authenticated());
    assert_eq!(app.session.current_user(), None);

    let user = app.session.check_session().await.unwrap();
    assert_eq!(user.email, "a@b.com");
    assert_eq!(app.session.current_user().map(|u| u.email), Some("a@b.com".into()));
}

#[tokio::test]
async fn stale_token_fails_the_check_and_forces_clear() {
    let addr = spawn_api(StatusCode::OK).await;
    let storage = Arc::new(MemoryStorage::new());
    storage.write(keys::TOKEN, "stale-token").unwrap();

    let app = app_for(addr, storage.clone());
    assert!(app.session.is_authenticated());

    assert_eq!(app.session.check_session().await, None);
    assert!(!app.session.is_authenticated());
    assert_eq!(storage.read(keys::TOKEN), None);
}

#[tokio::test]
async fn conversation_flow_end_to_end() {
    let addr = spawn_api(StatusCode::OK).await;
    let app = app_for(addr, Arc::new(MemoryStorage::new()));
    app.session.login("a@b.com", "Abcdefg1").await.unwrap();

    // Create: list gains exactly one entry with the title and a server id.
    let created = app.chat.create_conversation("Trip planning").await.unwrap();
    let listed = app.chat.conversations();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Trip planning");
    assert_eq!(listed[0].id, created.id);
    assert_eq!(app.chat.current_conversation().map(|c| c.id), Some(created.id));

    // Send: current conversation holds exactly one user message "Hello".
    let sent = app.chat.send_message(created.id, "Hello").await.unwrap();
    assert_eq!(sent.role, MessageRole::User);

    let current = app.chat.current_conversation().unwrap();
    assert_eq!(current.messages.len(), 1);
    assert_eq!(current.messages[0].role, MessageRole::User);
    assert_eq!(current.messages[0].content, "Hello");
    assert_eq!(current.updated_at, sent.timestamp);

    // The list copy is kept in sync with the current copy.
    let listed = app.chat.conversations();
    assert_eq!(listed[0].messages.len(), 1);
    assert_eq!(listed[0].updated_at, sent.timestamp);
    assert!(!app.chat.is_loading());

    // Rename touches both copies.
    app.chat
        .rename_conversation(created.id, "Trip planning (Rome)")
        .await
        .unwrap();
    assert_eq!(app.chat.conversations()[0].title, "Trip planning (Rome)");
    assert_eq!(
        app.chat.current_conversation().unwrap().title,
        "Trip planning (Rome)"
    );

    // Delete clears the current pointer along with the list entry.
    app.chat.delete_conversation(created.id).await.unwrap();
    assert!(app.chat.conversations().is_empty());
    assert!(app.chat.current_conversation().is_none());
}

#[tokio::test]
async fn failed_action_leaves_state_untouched() {
    let addr = spawn_api(StatusCode::OK).await;
    let app = app_for(addr, Arc::new(MemoryStorage::new()));
    app.session.login("a@b.com", "Abcdefg1").await.unwrap();

    let created = app.chat.create_conversation("kept").await.unwrap();

    // Deleting an unknown id fails remotely; nothing is rolled back or
    // removed locally because nothing was applied optimistically.
    let err = app.chat.delete_conversation(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.code, banter_client::ErrorCode::Http(404));
    assert_eq!(app.chat.conversations().len(), 1);
    assert_eq!(app.chat.current_conversation().map(|c| c.id), Some(created.id));
}
