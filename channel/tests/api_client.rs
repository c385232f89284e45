//! REST client behavior against a mock backend

use std::sync::Arc;

use channel::app::router::Route;
use channel::config::ChannelConfig;
use channel::core::error::ApiError;
use channel::core::service::{AgentApi, AuthApi, MediaApi, Navigator, TokenStore};
use channel::services::api::ApiClient;
use channel::services::credentials::MemoryTokenStore;
use parking_lot::Mutex;
use serde_json::json;
use shared::{LoginCredentials, ProfileUpdate};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

struct Harness {
    server: MockServer,
    client: ApiClient,
    store: Arc<MemoryTokenStore>,
    navigator: Arc<RecordingNavigator>,
}

async fn harness(token: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let config = ChannelConfig {
        api_base_url: format!("{}/api", server.uri()),
        ..ChannelConfig::default()
    };
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::default(),
    });
    let navigator = Arc::new(RecordingNavigator::default());
    let client = ApiClient::new(&config, store.clone(), navigator.clone()).unwrap();
    Harness {
        server,
        client,
        store,
        navigator,
    }
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "email": "alice@example.com",
        "name": "Alice",
        "role": "user",
        "createdAt": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let h = harness(Some("t1")).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.client.current_user().await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Alice");
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let h = harness(None).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .and(body_json(json!({"email": "alice@example.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user": user_json(), "token": "t1"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let response = h
        .client
        .login(&LoginCredentials {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, "t1");
}

#[tokio::test]
async fn test_unauthorized_clears_token_and_redirects_once() {
    let h = harness(Some("expired")).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .mount(&h.server)
        .await;

    let err = h.client.current_user().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Token expired");
    assert_eq!(h.store.token(), None);
    assert_eq!(h.navigator.routes.lock().clone(), vec![Route::Login]);
}

#[tokio::test]
async fn test_http_error_carries_status_and_payload() {
    let h = harness(Some("t1")).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/profile"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"error": "Email already in use", "field": "email"})),
        )
        .mount(&h.server)
        .await;

    let err = h
        .client
        .update_profile(&ProfileUpdate {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        ApiError::Http {
            status,
            message,
            payload,
        } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Email already in use");
            assert_eq!(payload.unwrap()["field"], "email");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // Only 401 touches the session
    assert_eq!(h.store.token().as_deref(), Some("t1"));
    assert!(h.navigator.routes.lock().is_empty());
}

#[tokio::test]
async fn test_plain_text_error_body_becomes_message() {
    let h = harness(None).await;
    Mock::given(method("GET"))
        .and(path("/api/livekit/rooms/standup"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&h.server)
        .await;

    let err = h.client.get_room_info("standup").await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "upstream unavailable");
}

#[tokio::test]
async fn test_access_token_request_shape() {
    let h = harness(Some("t1")).await;
    Mock::given(method("POST"))
        .and(path("/api/livekit/token"))
        .and(body_json(json!({"roomName": "standup", "participantName": "u1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "media-token"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let token = h.client.get_access_token("standup", "u1").await.unwrap();

    assert_eq!(token, "media-token");
}

#[tokio::test]
async fn test_empty_success_body_is_accepted() {
    let h = harness(Some("t1")).await;
    Mock::given(method("DELETE"))
        .and(path("/api/livekit/rooms/AI%20Support"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.delete_room("AI Support").await.unwrap();
}

#[tokio::test]
async fn test_agent_message_endpoint() {
    let h = harness(Some("t1")).await;
    Mock::given(method("POST"))
        .and(path("/api/ai-agent/message"))
        .and(body_json(json!({"message": "hello", "roomId": "standup"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hi there"})))
        .mount(&h.server)
        .await;

    let reply = h.client.send_message("hello", "standup").await.unwrap();

    assert_eq!(reply.response, "hi there");
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let config = ChannelConfig {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        ..ChannelConfig::default()
    };
    let client = ApiClient::new(
        &config,
        Arc::new(MemoryTokenStore::default()),
        Arc::new(RecordingNavigator::default()),
    )
    .unwrap();

    let err = client.current_user().await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
}
