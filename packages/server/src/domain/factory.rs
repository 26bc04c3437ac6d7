//! Domain factories for creating domain entities and value objects.

use super::PlayerId;

/// Factory for generating PlayerId instances.
///
/// Every connection gets a fresh id, so two players with the same display
/// name never collide.
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    /// Generate a new PlayerId with a random UUID v4.
    pub fn generate() -> PlayerId {
        PlayerId::from_uuid(uuid::Uuid::new_v4())
    }
}
