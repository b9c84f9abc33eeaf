//! Data structures for the badminton league: players, teams, rounds,
//! matches, and the league state itself.

mod league;
mod player;
mod round;
mod team;

pub use league::{League, LeagueError};
pub use player::{player_gender, player_name, Gender, Level, Player, PlayerId};
pub use round::{
    Game, Match, MatchId, MatchStatus, MatchType, Round, RoundId, Side, SubRounds,
    GAMES_PER_MATCH, GAMES_TO_WIN_MATCH, MAX_MATCHES_PER_ROUND,
};
pub use team::{Team, TeamId};
