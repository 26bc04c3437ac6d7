//! Data transfer objects for the WebSocket protocol, the HTTP API and the question bank file.

pub mod http;
pub mod question;
pub mod websocket;
