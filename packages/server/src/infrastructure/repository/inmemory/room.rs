//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! マップのロックは名前からルームへの検索・追加・削除だけを保護する。
//! 各ルームは自身のロックを持つため、無関係なルーム同士は競合しない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use trivia_rooms_shared::time::get_jst_timestamp;

use crate::domain::{
    Departure, JoinOutcome, Player, PlayerId, RepositoryError, Room, RoomName, RoomRepository,
    RoomSnapshot, SharedRoom, Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomName, SharedRoom>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }

    async fn room_names(&self) -> Vec<RoomName> {
        let rooms = self.rooms.lock().await;
        rooms.keys().cloned().collect()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, name: RoomName) -> Result<SharedRoom, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(&name) {
            return Err(RepositoryError::RoomAlreadyExists(name.into_string()));
        }
        let room = Arc::new(Mutex::new(Room::new(
            name.clone(),
            Timestamp::new(get_jst_timestamp()),
        )));
        rooms.insert(name, room.clone());
        Ok(room)
    }

    async fn get_room(&self, name: &RoomName) -> Option<SharedRoom> {
        let rooms = self.rooms.lock().await;
        rooms.get(name).cloned()
    }

    async fn join_room(&self, player: &Player, name: &RoomName) -> JoinOutcome {
        let departures = self.leave_all_rooms(&player.id, Some(name)).await;

        // Adding under the map lock keeps a concurrent delete of an emptied
        // room from slipping in between lookup and insert.
        let rooms = self.rooms.lock().await;
        let joined = match rooms.get(name) {
            Some(room) => {
                room.lock().await.add_member(player.clone());
                Ok(room.clone())
            }
            None => Err(RepositoryError::RoomNotFound(name.as_str().to_string())),
        };

        JoinOutcome { departures, joined }
    }

    async fn leave_all_rooms(
        &self,
        player_id: &PlayerId,
        except: Option<&RoomName>,
    ) -> Vec<Departure> {
        let mut departures = Vec::new();

        // One room lock at a time
        for name in self.room_names().await {
            if except == Some(&name) {
                continue;
            }

            let mut rooms = self.rooms.lock().await;
            let Some(room) = rooms.get(&name).cloned() else {
                continue;
            };
            let mut guard = room.lock().await;
            if !guard.remove_member(player_id) {
                continue;
            }

            let deleted = guard.is_empty();
            if deleted {
                rooms.remove(&name);
                tracing::info!("Room '{}' deleted because it is now empty", name);
            }
            drop(guard);

            departures.push(Departure {
                room_name: name,
                room,
                deleted,
            });
        }

        departures
    }

    async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let handles: Vec<SharedRoom> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };

        let mut snapshots = Vec::with_capacity(handles.len());
        for room in handles {
            snapshots.push(room.lock().await.snapshot());
        }
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}
