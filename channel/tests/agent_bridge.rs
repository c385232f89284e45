//! Agent bridge against a local WebSocket server

use std::future::Future;
use std::time::Duration;

use channel::bridge::agent::{AgentBridge, AgentOptions, NO_RESPONSE};
use futures_util::{SinkExt, StreamExt};
use shared::{AIAgentMessage, AgentMessageType, SenderType, User, UserRole};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};

const RESPONSE_FRAME: &str =
    r#"{"id":"r1","type":"response","content":"Hello","timestamp":1700000000000,"userId":"u1"}"#;

fn alice() -> User {
    User {
        id: "u1".to_string(),
        email: "alice@example.com".to_string(),
        name: "Alice".to_string(),
        avatar: None,
        role: UserRole::User,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        last_login: None,
    }
}

/// Accept one connection, report its request URI, and hand it to `script`
async fn serve_once<F, Fut>(script: F) -> (String, oneshot::Receiver<String>)
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (uri_tx, uri_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_hdr_async(
            stream,
            |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
                let _ = uri_tx.send(request.uri().to_string());
                Ok(response)
            },
        )
        .await
        .unwrap();
        script(ws).await;
    });

    (format!("ws://{}", addr), uri_rx)
}

fn bridge(url: &str, processing_timeout: Option<Duration>) -> AgentBridge {
    AgentBridge::new(
        AgentOptions {
            websocket_url: url.to_string(),
            api_key: "demo-key".to_string(),
            processing_timeout,
        },
        Some(alice()),
    )
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}

/// Keep the connection open until the client goes away
async fn drain(mut ws: WebSocketStream<TcpStream>) {
    while let Some(Ok(_)) = ws.next().await {}
}

#[tokio::test]
async fn test_connect_passes_credentials_in_query() {
    let (url, uri) = serve_once(drain).await;
    let agent = bridge(&url, None);

    assert!(agent.connect_to_agent().await.unwrap());

    assert_eq!(uri.await.unwrap(), "/?token=demo-key&userId=u1");
    assert!(agent.is_connected());
    assert_eq!(agent.error(), None);

    // Already open
    assert!(!agent.connect_to_agent().await.unwrap());
}

#[tokio::test]
async fn test_response_frame_is_appended() {
    let (url, _) = serve_once(|mut ws| async move {
        ws.send(Message::Text(RESPONSE_FRAME.to_string())).await.unwrap();
        drain(ws).await;
    })
    .await;
    let agent = bridge(&url, None);
    agent.connect_to_agent().await.unwrap();

    wait_for(|| agent.messages().len() == 1).await;

    let message = &agent.messages()[0];
    assert_eq!(message.id, "r1");
    assert_eq!(message.content, "Hello");
    assert_eq!(message.sender.id, "ai_agent");
    assert_eq!(message.sender.name, "AI Assistant");
    assert_eq!(message.sender.sender_type, SenderType::AiAgent);
    assert_eq!(message.timestamp, "2023-11-14T22:13:20.000Z");
    assert!(!agent.is_processing());
}

#[tokio::test]
async fn test_command_round_trip_with_echo() {
    let (url, _) = serve_once(|mut ws| async move {
        while let Some(Ok(frame)) = ws.next().await {
            let Message::Text(text) = frame else {
                continue;
            };
            let command: AIAgentMessage = serde_json::from_str(&text).unwrap();
            assert_eq!(command.message_type, AgentMessageType::Command);
            assert_eq!(command.user_id, "u1");

            // Echo the command back, then answer it
            ws.send(Message::Text(text.clone())).await.unwrap();
            let reply = AIAgentMessage {
                id: format!("reply-{}", command.id),
                message_type: AgentMessageType::Response,
                content: format!("You said: {}", command.content),
                timestamp: command.timestamp,
                user_id: command.user_id.clone(),
                metadata: None,
            };
            ws.send(Message::Text(serde_json::to_string(&reply).unwrap()))
                .await
                .unwrap();
        }
    })
    .await;
    let agent = bridge(&url, None);
    agent.connect_to_agent().await.unwrap();

    assert!(agent.send_command("summarize the call"));

    let state = agent.state();
    assert!(state.is_processing);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].sender.sender_type, SenderType::User);
    assert_eq!(state.messages[0].sender.name, "Alice");

    wait_for(|| !agent.is_processing()).await;

    let messages = agent.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "You said: summarize the call");
    assert!(messages[1].is_from_agent());
    assert_eq!(messages[1].id, format!("reply-{}", messages[0].id));
}

#[tokio::test]
async fn test_transcription_is_not_echoed_locally() {
    let (url, _) = serve_once(drain).await;
    let agent = bridge(&url, None);
    agent.connect_to_agent().await.unwrap();

    assert!(agent.send_transcription("hello there"));

    let state = agent.state();
    assert!(state.messages.is_empty());
    assert!(!state.is_processing);
}

#[tokio::test]
async fn test_server_close_marks_disconnected() {
    let (url, _) = serve_once(|mut ws| async move {
        ws.close(None).await.unwrap();
    })
    .await;
    let agent = bridge(&url, None);
    agent.connect_to_agent().await.unwrap();

    wait_for(|| !agent.is_connected()).await;

    assert!(!agent.send_command("anyone there?"));
    assert!(agent.messages().is_empty());
}

#[tokio::test]
async fn test_processing_timeout_clears_thinking_state() {
    let (url, _) = serve_once(drain).await;
    let agent = bridge(&url, Some(Duration::from_millis(50)));
    agent.connect_to_agent().await.unwrap();

    assert!(agent.send_command("are you there?"));
    assert!(agent.is_processing());

    wait_for(|| !agent.is_processing()).await;

    assert_eq!(agent.error().as_deref(), Some(NO_RESPONSE));
}

#[tokio::test]
async fn test_disconnect_stops_sending() {
    let (url, _) = serve_once(drain).await;
    let agent = bridge(&url, None);
    agent.connect_to_agent().await.unwrap();

    agent.disconnect();

    assert!(!agent.is_connected());
    assert!(!agent.send_command("hello"));
    assert!(agent.messages().is_empty());
}
