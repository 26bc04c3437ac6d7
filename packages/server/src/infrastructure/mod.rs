//! Infrastructure 層
//!
//! インメモリのレジストリ、問題バンク、通信用 DTO、送信処理を実装します。

pub mod broadcast;
pub mod dto;
pub mod repository;

pub use broadcast::{Broadcaster, CleanupReceiver, DeliveryError};
