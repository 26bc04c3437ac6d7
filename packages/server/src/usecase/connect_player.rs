//! UseCase: プレイヤー接続処理
//!
//! 新しい接続は名前を送った時点でプレイヤーになる。この時点ではどのルームにも
//! 所属しない。新規プレイヤーがロビーを見られるよう、全員に最新の `roomsList`
//! を送信する。

use std::sync::Arc;

use trivia_rooms_shared::time::get_jst_timestamp;

use crate::{
    domain::{
        OutboundSender, Player, PlayerIdFactory, PlayerName, PlayerRepository, RoomRepository,
        Timestamp,
    },
    infrastructure::Broadcaster,
};

use super::list_rooms::broadcast_rooms_list;

/// プレイヤー接続のユースケース
pub struct ConnectPlayerUseCase {
    players: Arc<dyn PlayerRepository>,
    rooms: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl ConnectPlayerUseCase {
    /// 新しい ConnectPlayerUseCase を作成
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

    /// プレイヤー接続を実行
    ///
    /// プレイヤーを登録し、ルーム一覧を通知する。
    ///
    /// # Arguments
    ///
    /// * `name` - 最初のフレームで受け取った表示名
    /// * `sender` - 接続の送信タスクが読み出す送信キュー
    pub async fn execute(&self, name: PlayerName, sender: OutboundSender) -> Player {
        let player = Player::new(
            PlayerIdFactory::generate(),
            name,
            Timestamp::new(get_jst_timestamp()),
        );
        self.players.register(player.clone(), sender).await;
        tracing::info!("Player '{}' connected as {}", player.name, player.id);

        broadcast_rooms_list(&self.rooms, &self.broadcaster).await;
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, drain, types};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_player_registers_and_sends_rooms_list() {
        // テスト項目: 接続したプレイヤーが登録され roomsList を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let usecase = ConnectPlayerUseCase::new(
            harness.players(),
            harness.rooms(),
            harness.broadcaster.clone(),
        );
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let player = usecase
            .execute(PlayerName::new("alice".to_string()).unwrap(), tx)
            .await;

        // then (期待する結果):
        assert_eq!(harness.players.count_players().await, 1);
        assert_eq!(harness.players.get_player(&player.id).await, Some(player));
        let messages = drain(&mut rx);
        assert_eq!(types(&messages), vec!["roomsList"]);
        assert_eq!(messages[0]["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_names_get_distinct_ids() {
        // テスト項目: 同じ表示名でも別々のプレイヤーとして扱われる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = ConnectPlayerUseCase::new(
            harness.players(),
            harness.rooms(),
            harness.broadcaster.clone(),
        );
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let first = usecase
            .execute(PlayerName::new("alice".to_string()).unwrap(), tx1)
            .await;
        let second = usecase
            .execute(PlayerName::new("alice".to_string()).unwrap(), tx2)
            .await;

        // then (期待する結果):
        assert_ne!(first.id, second.id);
        assert_eq!(harness.players.count_players().await, 2);
    }

    #[tokio::test]
    async fn test_existing_players_see_updated_rooms_list() {
        // テスト項目: 既存プレイヤーにも roomsList が届く
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx_alice) = harness.connect("alice").await;
        harness.room_with("trivia", &[&alice]).await;
        let usecase = ConnectPlayerUseCase::new(
            harness.players(),
            harness.rooms(),
            harness.broadcaster.clone(),
        );
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase
            .execute(PlayerName::new("bob".to_string()).unwrap(), tx)
            .await;

        // then (期待する結果):
        let messages = drain(&mut rx_alice);
        assert_eq!(types(&messages), vec!["roomsList"]);
        assert_eq!(messages[0]["data"][0]["roomName"], "trivia");
    }
}
