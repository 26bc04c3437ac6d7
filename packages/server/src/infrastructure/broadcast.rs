//! 送信処理
//!
//! メッセージは 1 度だけエンコードし、各宛先の送信キューに積む。
//! 積めなかった場合は接続の送信タスクが終了しているので、ログを出して
//! そのプレイヤーを切断クリーンアップのキューに入れる。
//! 他の宛先には影響せず、再送もしない。

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::{OutboundSender, PlayerId, PlayerRepository},
    infrastructure::dto::websocket::ServerMessage,
};

/// 切断クリーンアップキューの受信側
pub type CleanupReceiver = mpsc::UnboundedReceiver<PlayerId>;

/// 配信エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("channel to player {0} is closed")]
    ChannelClosed(PlayerId),
}

/// 登録済みプレイヤーへのメッセージ配信
#[derive(Clone)]
pub struct Broadcaster {
    players: Arc<dyn PlayerRepository>,
    cleanup_tx: mpsc::UnboundedSender<PlayerId>,
}

impl Broadcaster {
    /// 新しい Broadcaster と、配信に失敗したプレイヤーのキューを作成
    pub fn new(players: Arc<dyn PlayerRepository>) -> (Self, CleanupReceiver) {
        let (cleanup_tx, cleanup_rx) = mpsc::unbounded_channel();
        (
            Self {
                players,
                cleanup_tx,
            },
            cleanup_rx,
        )
    }

    /// 1 人のプレイヤーに送信し、配信できた数（0 または 1）を返す
    pub async fn send(&self, player_id: &PlayerId, message: &ServerMessage) -> usize {
        self.send_many(std::slice::from_ref(player_id), message)
            .await
    }

    /// 指定したプレイヤーのうち登録済みの全員に送信
    pub async fn send_many(&self, player_ids: &[PlayerId], message: &ServerMessage) -> usize {
        if player_ids.is_empty() {
            return 0;
        }
        let targets = self.players.senders_for(player_ids).await;
        self.deliver(targets, message)
    }

    /// 接続中の全プレイヤーに送信
    pub async fn broadcast_all(&self, message: &ServerMessage) -> usize {
        let targets = self.players.all_senders().await;
        self.deliver(targets, message)
    }

    fn deliver(&self, targets: Vec<(PlayerId, OutboundSender)>, message: &ServerMessage) -> usize {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode '{}' message: {}", message.kind(), e);
                return 0;
            }
        };

        let mut delivered = 0;
        for (player_id, sender) in targets {
            match Self::push(&player_id, &sender, json.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to send '{}': {}", message.kind(), e);
                    if self.cleanup_tx.send(player_id).is_err() {
                        tracing::debug!("Cleanup queue closed; skipping cleanup of {}", player_id);
                    }
                }
            }
        }
        tracing::debug!("Sent '{}' to {} player(s)", message.kind(), delivered);
        delivered
    }

    fn push(
        player_id: &PlayerId,
        sender: &OutboundSender,
        json: String,
    ) -> Result<(), DeliveryError> {
        sender
            .send(json)
            .map_err(|_| DeliveryError::ChannelClosed(*player_id))
    }
}
