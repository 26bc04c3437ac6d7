//! UseCase: ルーム参加
//!
//! 参加はプレイヤーの移動として扱う。参加先に追加する前に、それまでいた
//! ルームからは削除される。ゲーム中のルームにも参加でき、途中参加者は次の
//! 問題の配信から加わる。

use std::sync::Arc;

use crate::{
    domain::{Player, RoomName, RoomRepository},
    infrastructure::{Broadcaster, dto::websocket::ServerMessage},
};

use super::{
    error::GameError, leave_room::notify_departures, list_rooms::broadcast_rooms_list,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, broadcaster: Broadcaster) -> Self {
        Self { rooms, broadcaster }
    }

    /// ルーム参加を実行
    ///
    /// # Errors
    ///
    /// * `GameError::InvalidInput` - ルーム名が空または長すぎる
    /// * `GameError::RoomNotFound` - ルームが存在しない（元のルームからは退出済み）
    pub async fn execute(&self, player: &Player, room_name: String) -> Result<(), GameError> {
        let name = RoomName::new(room_name)?;
        let outcome = self.rooms.join_room(player, &name).await;
        notify_departures(&outcome.departures, &self.broadcaster).await;

        let room = match outcome.joined {
            Ok(room) => room,
            Err(e) => {
                if !outcome.departures.is_empty() {
                    broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
                }
                return Err(e.into());
            }
        };
        tracing::info!("Player '{}' joined room '{}'", player.name, name);

        let (member_ids, member_names) = {
            let room = room.lock().await;
            (room.member_ids(), room.member_names())
        };
        self.broadcaster
            .send_many(&member_ids, &ServerMessage::PlayerListUpdate(member_names))
            .await;
        broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
        Ok(())
    }
}
