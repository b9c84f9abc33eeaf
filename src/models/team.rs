//! Team roster and the derived team-strength view.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A league team: a name and an ordered roster of player ids.
/// Roster order matters for display only, never for rules.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<PlayerId>,
}

impl Team {
    /// Create a new team with an empty roster.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
        }
    }

    /// Sum of member level points. Display strength only.
    pub fn strength(&self, all_players: &[Player]) -> u32 {
        self.players
            .iter()
            .filter_map(|id| all_players.iter().find(|p| p.id == *id))
            .map(|p| p.level.points())
            .sum()
    }
}
