//! Repository 実装
//!
//! ドメイン層が定義する Repository trait の具体的な実装。
//! ユースケースはこれらの型ではなく trait に依存します。

pub mod inmemory;
pub mod question;

pub use inmemory::{InMemoryPlayerRepository, InMemoryRoomRepository};
pub use question::{InMemoryQuestionRepository, JsonFileQuestionRepository};
