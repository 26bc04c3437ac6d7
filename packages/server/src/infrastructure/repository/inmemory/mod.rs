//! InMemory Repository 実装
//!
//! tokio の Mutex で保護した HashMap をインメモリ DB として使用します。

mod player;
mod room;

pub use player::InMemoryPlayerRepository;
pub use room::InMemoryRoomRepository;
