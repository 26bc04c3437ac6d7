//! UseCase: ルーム退出
//!
//! `leave` はプレイヤーを所属する全ルームから削除する。空になったルームは
//! 削除し、残ったルームには新しい `playerListUpdate` を送信する。進行中の
//! セッションはそのまま続き、退出したプレイヤーのスコアも残る。

use std::sync::Arc;

use crate::{
    domain::{Departure, Player, RoomRepository},
    infrastructure::{Broadcaster, dto::websocket::ServerMessage},
};

use super::list_rooms::broadcast_rooms_list;

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>, broadcaster: Broadcaster) -> Self {
        Self { rooms, broadcaster }
    }

    /// ルーム退出を実行
    ///
    /// # Arguments
    ///
    /// * `player` - 退出するプレイヤー
    /// * `room_name` - クライアントが所属していると認識しているルーム名（ログ出力のみに使用）
    ///
    /// # Returns
    ///
    /// 退出したルームの数
    pub async fn execute(&self, player: &Player, room_name: &str) -> usize {
        let departures = self.rooms.leave_all_rooms(&player.id, None).await;
        tracing::info!(
            "Player '{}' left {} room(s) (requested '{}')",
            player.name,
            departures.len(),
            room_name
        );

        notify_departures(&departures, &self.broadcaster).await;
        if !departures.is_empty() {
            broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
        }
        departures.len()
    }
}

/// 退出後も残っている各ルームに `playerListUpdate` を送信
pub(crate) async fn notify_departures(departures: &[Departure], broadcaster: &Broadcaster) {
    for departure in departures.iter().filter(|d| !d.deleted) {
        let (member_ids, member_names) = {
            let room = departure.room.lock().await;
            (room.member_ids(), room.member_names())
        };
        broadcaster
            .send_many(&member_ids, &ServerMessage::PlayerListUpdate(member_names))
            .await;
    }
}
