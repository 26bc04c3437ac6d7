//! UseCase 層
//!
//! プレイヤーの操作ごとに 1 つの構造体を持つレイヤー。
//! UI 層から呼び出され、Repository trait を通じて Domain 層を操作し、
//! `Broadcaster` で結果を通知します。

pub mod connect_player;
pub mod create_room;
pub mod disconnect_player;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod list_rooms;
pub mod start_game;
pub mod submit_answer;

pub use connect_player::ConnectPlayerUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use error::GameError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use start_game::StartGameUseCase;
pub use submit_answer::SubmitAnswerUseCase;
