//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};
use trivia_rooms_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{RoomSnapshot, SessionPhase};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub name: String,
    pub players: Vec<String>,
    pub phase: SessionPhase,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomSummaryDto {
    fn from(room: &RoomSnapshot) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            players: room.member_names(),
            phase: room.phase,
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub name: String,
    pub members: Vec<MemberDetailDto>,
    pub phase: SessionPhase,
    pub created_at: String, // ISO 8601
}

impl From<&RoomSnapshot> for RoomDetailDto {
    fn from(room: &RoomSnapshot) -> Self {
        Self {
            name: room.name.as_str().to_string(),
            members: room
                .members
                .iter()
                .map(|p| MemberDetailDto {
                    name: p.name.as_str().to_string(),
                    connected_at: timestamp_to_jst_rfc3339(p.connected_at.value()),
                })
                .collect(),
            phase: room.phase,
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        }
    }
}

/// Member entry of the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub name: String,
    pub connected_at: String, // ISO 8601
}
