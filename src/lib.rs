//! Badminton league web app: library with models and the match/round
//! rules engine.

pub mod logic;
pub mod models;

pub use logic::{
    arrange_sub_rounds, calculate_standings, head_to_head_stats, is_valid_arrangement,
    validate_game_score, validate_player_addition_to_match, validate_player_gender_for_match,
    validate_round_player_assignments, AdditionError, AssignmentViolation, EligibilityError,
    HeadToHeadStat, ScoreError, TeamStanding,
};
pub use models::{
    Game, Gender, League, LeagueError, Level, Match, MatchId, MatchStatus, MatchType, Player,
    PlayerId, Round, RoundId, Side, SubRounds, Team, TeamId,
};
