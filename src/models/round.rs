//! Round, Match, and Game: one round is a head-to-head encounter between
//! two teams, played as up to six doubles matches of best-of-three games.

use crate::models::player::PlayerId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Best of three: first side to this many game wins takes the match.
pub const GAMES_TO_WIN_MATCH: usize = 2;
/// A match never holds more than three games.
pub const GAMES_PER_MATCH: usize = 3;
/// A round holds at most six matches (the 3 Men's + 2 Mixed + 1 Women's template).
pub const MAX_MATCHES_PER_ROUND: usize = 6;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Which side of a match (team 1 is the round's `team1_id`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Doubles discipline of a match. Serialized with the display names the
/// API clients show verbatim.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "Men's Doubles")]
    MensDoubles,
    #[serde(rename = "Mixed Doubles")]
    MixedDoubles,
    #[serde(rename = "Women's Doubles")]
    WomensDoubles,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::MensDoubles => write!(f, "Men's Doubles"),
            MatchType::MixedDoubles => write!(f, "Mixed Doubles"),
            MatchType::WomensDoubles => write!(f, "Women's Doubles"),
        }
    }
}

/// One game (set) within a match. `winner` is `None` while in progress.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub team1_score: i32,
    pub team2_score: i32,
    pub winner: Option<Side>,
}

/// Match lifecycle. Timestamps record when the transition happened; the
/// variant itself is what gates further operations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MatchStatus {
    /// Players still being assigned; no play yet.
    #[default]
    Building,
    /// Match underway.
    InPlay { started_at: DateTime<Utc> },
    /// Match finished and locked.
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
}

impl MatchStatus {
    pub fn is_building(&self) -> bool {
        matches!(self, MatchStatus::Building)
    }

    pub fn is_in_play(&self) -> bool {
        matches!(self, MatchStatus::InPlay { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MatchStatus::Completed { .. })
    }
}

/// A single doubles match within a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    #[serde(rename = "type")]
    pub kind: MatchType,
    /// Player ids fielded by the round's team 1 (at most 2).
    pub team1_players: Vec<PlayerId>,
    /// Player ids fielded by the round's team 2 (at most 2).
    pub team2_players: Vec<PlayerId>,
    /// Best of three games, in play order.
    pub games: Vec<Game>,
    /// Set once a side has won two games; cleared on stop.
    pub winner: Option<Side>,
    pub status: MatchStatus,
}

impl Match {
    pub fn new(kind: MatchType) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            team1_players: Vec::new(),
            team2_players: Vec::new(),
            games: Vec::new(),
            winner: None,
            status: MatchStatus::Building,
        }
    }

    pub fn side_players(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::Team1 => &self.team1_players,
            Side::Team2 => &self.team2_players,
        }
    }

    pub fn side_players_mut(&mut self, side: Side) -> &mut Vec<PlayerId> {
        match side {
            Side::Team1 => &mut self.team1_players,
            Side::Team2 => &mut self.team2_players,
        }
    }

    /// All player ids fielded in this match, both sides.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team1_players
            .iter()
            .chain(self.team2_players.iter())
            .copied()
    }

    pub fn fields_player(&self, id: PlayerId) -> bool {
        self.player_ids().any(|p| p == id)
    }

    /// Both sides staffed with a full doubles pair.
    pub fn is_fully_staffed(&self) -> bool {
        self.team1_players.len() == crate::logic::PLAYERS_PER_SIDE
            && self.team2_players.len() == crate::logic::PLAYERS_PER_SIDE
    }

    /// Games won by the given side so far.
    pub fn game_wins(&self, side: Side) -> usize {
        self.games.iter().filter(|g| g.winner == Some(side)).count()
    }

    /// Re-derive the match winner from game winners (first side to two games).
    pub fn recompute_winner(&mut self) {
        self.winner = if self.game_wins(Side::Team1) >= GAMES_TO_WIN_MATCH {
            Some(Side::Team1)
        } else if self.game_wins(Side::Team2) >= GAMES_TO_WIN_MATCH {
            Some(Side::Team2)
        } else {
            None
        };
    }
}

/// A conflict-free split of a six-match round into two groups of three.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SubRounds {
    pub first: Vec<MatchId>,
    pub second: Vec<MatchId>,
}

impl SubRounds {
    /// Order-independent comparison: `{first, second}` as a set of id-sets,
    /// so swapping the groups or reordering ids within one compares equal.
    pub fn same_partition(&self, other: &SubRounds) -> bool {
        fn sorted(ids: &[MatchId]) -> Vec<MatchId> {
            let mut v = ids.to_vec();
            v.sort();
            v
        }
        let (a1, a2) = (sorted(&self.first), sorted(&self.second));
        let (b1, b2) = (sorted(&other.first), sorted(&other.second));
        (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1)
    }
}

/// One head-to-head encounter between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub name: String,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    /// Per-round roster snapshot for team 1 (editable until completion).
    pub team1_lineup: Vec<PlayerId>,
    /// Per-round roster snapshot for team 2.
    pub team2_lineup: Vec<PlayerId>,
    pub matches: Vec<Match>,
    /// Terminal flag; a completed round only feeds the standings.
    pub completed: bool,
    /// Present only while the round holds exactly six fully staffed matches
    /// and a conflict-free split exists.
    pub sub_rounds: Option<SubRounds>,
}

impl Round {
    pub fn new(name: impl Into<String>, team1_id: TeamId, team2_id: TeamId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team1_id,
            team2_id,
            team1_lineup: Vec::new(),
            team2_lineup: Vec::new(),
            matches: Vec::new(),
            completed: false,
            sub_rounds: None,
        }
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn lineup(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::Team1 => &self.team1_lineup,
            Side::Team2 => &self.team2_lineup,
        }
    }
}
