//! Shared helpers for the integration tests: an in-process server on an
//! ephemeral port and a small WebSocket client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use trivia_rooms_server::{
    config::GameSettings, domain::Question, infrastructure::repository::InMemoryQuestionRepository,
    serve,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// (id, text, options, correct index)
const QUESTIONS: [(&str, &str, [&str; 3], i64); 3] = [
    ("q-sum", "2 + 2?", ["3", "4", "5"], 1),
    ("q-planet", "Largest planet?", ["Jupiter", "Mars", "Venus"], 0),
    ("q-ocean", "Largest ocean?", ["Atlantic", "Indian", "Pacific"], 2),
];

pub fn correct_index_for(question_id: &str) -> i64 {
    QUESTIONS
        .iter()
        .find(|(id, ..)| *id == question_id)
        .map(|(.., index)| *index)
        .expect("unknown question id")
}

fn question_bank() -> Vec<Question> {
    QUESTIONS
        .iter()
        .map(|(id, text, options, index)| {
            Question::new(
                id.to_string(),
                text.to_string(),
                options.iter().map(|o| o.to_string()).collect(),
                *index,
            )
            .unwrap()
        })
        .collect()
}

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the fixture question bank and a fast countdown.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let settings = GameSettings {
            countdown_interval: Duration::from_millis(10),
            ..GameSettings::default()
        };

        tokio::spawn(async move {
            let questions = Arc::new(InMemoryQuestionRepository::new(question_bank()));
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, questions, settings, shutdown)
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Connect and introduce the player by name.
    pub async fn connect(&self, name: &str) -> TestClient {
        let (stream, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = TestClient { stream };
        client.send(serde_json::json!({"playerName": name})).await;
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn send(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send");
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) {
        self.stream
            .send(Message::Binary(bytes.into()))
            .await
            .expect("Failed to send");
    }

    /// Next envelope, or `None` once the server closed the connection.
    pub async fn next(&mut self) -> Option<Value> {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a message")?;
            match msg.ok()? {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
                }
                Message::Close(_) => return None,
                _ => {}
            }
        }
    }

    /// Skip envelopes until one of type `kind` arrives.
    pub async fn expect(&mut self, kind: &str) -> Value {
        loop {
            let envelope = self
                .next()
                .await
                .unwrap_or_else(|| panic!("Connection closed while waiting for '{kind}'"));
            if envelope["type"] == kind {
                return envelope;
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
