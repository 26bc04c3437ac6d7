//! UseCase: ルーム作成
//!
//! 作成しただけではルームに参加しない。作成者には `created` を、
//! 全員には新しい `roomsList` を送信する。

use std::sync::Arc;

use crate::{
    domain::{Player, RoomName, RoomRepository},
    infrastructure::{Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::GameError, list_rooms::broadcast_rooms_list};

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, broadcaster: Broadcaster) -> Self {
        Self { rooms, broadcaster }
    }

    /// ルーム作成を実行
    ///
    /// # Errors
    ///
    /// * `GameError::InvalidInput` - ルーム名が空または長すぎる
    /// * `GameError::RoomAlreadyExists` - 同名のルームが存在する（状態は変わらない）
    pub async fn execute(&self, player: &Player, room_name: String) -> Result<(), GameError> {
        let name = RoomName::new(room_name)?;
        self.rooms.create_room(name.clone()).await?;
        tracing::info!("Player '{}' created room '{}'", player.name, name);

        self.broadcaster
            .send(
                &player.id,
                &ServerMessage::Created(format!("Room created: {name}")),
            )
            .await;
        broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
        Ok(())
    }
}
