//! UseCase: プレイヤー切断処理
//!
//! 接続の受信タスクが終了したとき、および配信失敗時にクリーンアップタスクから
//! 呼ばれる。同じプレイヤーに対して 2 回呼ばれても問題ない。

use std::sync::Arc;

use crate::{
    domain::{Player, PlayerId, PlayerRepository, RoomRepository},
    infrastructure::Broadcaster,
};

use super::{leave_room::notify_departures, list_rooms::broadcast_rooms_list};

/// プレイヤー切断のユースケース
pub struct DisconnectPlayerUseCase {
    players: Arc<dyn PlayerRepository>,
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl DisconnectPlayerUseCase {
    /// 新しい DisconnectPlayerUseCase を作成
    pub fn new(
        players: Arc<dyn PlayerRepository>,
        rooms: Arc<dyn RoomRepository>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            players,
            rooms,
            broadcaster,
        }
    }

    /// プレイヤー切断を実行
    ///
    /// 全ルームとプレイヤーレジストリからプレイヤーを削除する。
    ///
    /// # Returns
    ///
    /// * `Some(Player)` - 削除したプレイヤー
    /// * `None` - すでにクリーンアップ済み
    pub async fn execute(&self, player_id: &PlayerId) -> Option<Player> {
        let departures = self.rooms.leave_all_rooms(player_id, None).await;
        let player = self.players.unregister(player_id).await;

        match &player {
            Some(player) => tracing::info!(
                "Player '{}' ({}) disconnected, left {} room(s)",
                player.name,
                player.id,
                departures.len()
            ),
            None => tracing::debug!("Player {} was already disconnected", player_id),
        }

        notify_departures(&departures, &self.broadcaster).await;
        if player.is_some() || !departures.is_empty() {
            broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
        }
        player
    }
}
