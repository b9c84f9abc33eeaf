//! The rules engine: pure, synchronous validation and scoring functions
//! over entity snapshots. Nothing here mutates or performs I/O.

mod eligibility;
mod game_score;
mod round_assignments;
mod standings;
mod sub_rounds;

pub use eligibility::{validate_player_gender_for_match, EligibilityError, PLAYERS_PER_SIDE};
pub use game_score::{
    validate_game_score, ScoreError, DEUCE_THRESHOLD, MAX_GAME_SCORE, STANDARD_GAME_TARGET,
};
pub use round_assignments::{
    validate_player_addition_to_match, validate_round_player_assignments, AdditionError,
    AssignmentViolation, MAX_MATCHES_PER_PLAYER, MAX_MIXED_DOUBLES_PER_PLAYER,
};
pub use standings::{
    calculate_standings, head_to_head_stats, HeadToHeadStat, TeamStanding, POINTS_PER_MATCH_WIN,
};
pub use sub_rounds::{
    arrange_sub_rounds, is_valid_arrangement, SUB_ROUND_GROUP_SIZE, SUB_ROUND_MATCH_COUNT,
};
