//! Player data structures: gender, skill level, and the player record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Player gender, used by match eligibility rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    /// The other gender (Mixed Doubles pairs one of each).
    pub fn opposite(self) -> Gender {
        match self {
            Gender::M => Gender::F,
            Gender::F => Gender::M,
        }
    }
}

/// Skill tier, ordered weakest to strongest. Display strength only; the
/// rules engine never branches on it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "Luyện Khí Kỳ")]
    LuyenKhiKy,
    #[serde(rename = "Trúc Cơ")]
    TrucCo,
    #[serde(rename = "Kết Đan")]
    KetDan,
    #[serde(rename = "Nguyên Anh")]
    NguyenAnh,
}

impl Level {
    /// Strength points for team-strength display (1 for the lowest tier, 4 for the top).
    pub fn points(self) -> u32 {
        match self {
            Level::LuyenKhiKy => 1,
            Level::TrucCo => 2,
            Level::KetDan => 3,
            Level::NguyenAnh => 4,
        }
    }
}

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gender: Gender,
    pub level: Level,
}

impl Player {
    /// Create a new player with a fresh id.
    pub fn new(name: impl Into<String>, gender: Gender, level: Level) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
            level,
        }
    }
}

/// Display name for a player id; falls back to the raw id when the player
/// is no longer registered (e.g. deleted after being fielded).
pub fn player_name(players: &[Player], id: PlayerId) -> String {
    players
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Gender lookup by id; `None` for unknown players.
pub fn player_gender(players: &[Player], id: PlayerId) -> Option<Gender> {
    players.iter().find(|p| p.id == id).map(|p| p.gender)
}
