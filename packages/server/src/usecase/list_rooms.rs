//! UseCase: ルーム一覧
//!
//! `roomsList` メッセージと HTTP API 向けに全ルームのスナップショットを返す。

use std::sync::Arc;

use crate::{
    domain::{RoomName, RoomRepository, RoomSnapshot},
    infrastructure::{
        Broadcaster,
        dto::websocket::{RoomListEntry, ServerMessage},
    },
};

/// ルーム一覧のユースケース
pub struct ListRoomsUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// 全ルームを名前順で取得
    pub async fn execute(&self) -> Vec<RoomSnapshot> {
        self.rooms.list_rooms().await
    }

    /// 名前でルームを 1 件取得
    ///
    /// 名前は作成時と同じ規則（前後の空白を除去）で正規化してから比較する。
    pub async fn find(&self, name: &str) -> Option<RoomSnapshot> {
        let name = RoomName::new(name.to_string()).ok()?;
        self.execute()
            .await
            .into_iter()
            .find(|room| room.name == name)
    }

    /// `roomsList` メッセージの行を構築
    pub async fn build_rooms_list(&self) -> Vec<RoomListEntry> {
        self.execute().await.iter().map(RoomListEntry::from).collect()
    }
}

/// 現在の `roomsList` を接続中の全プレイヤーに送信
pub(crate) async fn broadcast_rooms_list(
    rooms: &Arc<dyn RoomRepository>,
    broadcaster: &Broadcaster,
) {
    let entries = ListRoomsUseCase::new(rooms.clone())
        .build_rooms_list()
        .await;
    broadcaster
        .broadcast_all(&ServerMessage::RoomsList(entries))
        .await;
}
