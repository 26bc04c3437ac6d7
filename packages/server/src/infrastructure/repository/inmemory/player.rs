//! InMemory Player Repository 実装
//!
//! ドメイン層が定義する PlayerRepository trait の具体的な実装。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{OutboundSender, Player, PlayerId, PlayerRepository};

/// 登録済みプレイヤーとその送信キュー
struct ConnectedPlayer {
    player: Player,
    sender: OutboundSender,
}

/// インメモリ Player Repository 実装
///
/// ロックはマップを操作する間だけ保持する。sender は複製して取り出し、
/// ロック解放後に使用する。
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<PlayerId, ConnectedPlayer>>,
}

impl InMemoryPlayerRepository {
    /// 新しい InMemoryPlayerRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn get_player(&self, player_id: &PlayerId) -> Option<Player> {
        let players = self.players.lock().await;
        players.get(player_id).map(|connected| connected.player.clone())
    }

    #[cfg(test)]
    pub(crate) async fn count_players(&self) -> usize {
        let players = self.players.lock().await;
        players.len()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn register(&self, player: Player, sender: OutboundSender) {
        let mut players = self.players.lock().await;
        players.insert(player.id, ConnectedPlayer { player, sender });
    }

    async fn unregister(&self, player_id: &PlayerId) -> Option<Player> {
        let mut players = self.players.lock().await;
        players.remove(player_id).map(|connected| connected.player)
    }

    async fn senders_for(&self, player_ids: &[PlayerId]) -> Vec<(PlayerId, OutboundSender)> {
        let players = self.players.lock().await;
        player_ids
            .iter()
            .filter_map(|id| players.get(id).map(|c| (*id, c.sender.clone())))
            .collect()
    }

    async fn all_senders(&self) -> Vec<(PlayerId, OutboundSender)> {
        let players = self.players.lock().await;
        players
            .iter()
            .map(|(id, c)| (*id, c.sender.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerIdFactory, PlayerName, Timestamp};
    use tokio::sync::mpsc;

    fn player(name: &str) -> Player {
        Player::new(
            PlayerIdFactory::generate(),
            PlayerName::new(name.to_string()).unwrap(),
            Timestamp::new(0),
        )
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        // テスト項目: 登録したプレイヤーを削除できる
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = player("alice");
        repo.register(alice.clone(), tx).await;

        // when (操作):
        let removed = repo.unregister(&alice.id).await;

        // then (期待する結果):
        assert_eq!(removed, Some(alice.clone()));
        assert_eq!(repo.count_players().await, 0);
        assert!(repo.get_player(&alice.id).await.is_none());
    }

    #[tokio::test]
    async fn test_unregister_twice_returns_none() {
        // テスト項目: 二重の削除は None を返すだけでエラーにならない
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = player("alice");
        repo.register(alice.clone(), tx).await;
        repo.unregister(&alice.id).await;

        // when (操作):
        let removed = repo.unregister(&alice.id).await;

        // then (期待する結果):
        assert!(removed.is_none());
    }

    #[tokio::test]
    async fn test_same_name_players_are_registered_separately() {
        // テスト項目: 同じ表示名のプレイヤーも別々に登録される
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        repo.register(player("alice"), tx1).await;
        repo.register(player("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(repo.count_players().await, 2);
        assert_eq!(repo.all_senders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_senders_for_skips_unknown_players() {
        // テスト項目: 未登録の ID は送信先から除外される
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let alice = player("alice");
        repo.register(alice.clone(), tx).await;

        // when (操作):
        let senders = repo
            .senders_for(&[alice.id, PlayerIdFactory::generate()])
            .await;

        // then (期待する結果):
        assert_eq!(senders.len(), 1);
        senders[0].1.send("hello".to_string()).unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }
}
