//! Badminton single-game scoring law: win at 21, win by 2 past 20-all,
//! hard cap at 30 (golden point once the opponent holds 29).

use crate::models::Side;

/// A game is won at this score unless play has reached 20-all.
pub const STANDARD_GAME_TARGET: i32 = 21;
/// At this score and above, a two-point lead is required to win.
pub const DEUCE_THRESHOLD: i32 = 20;
/// Absolute score cap; reaching it wins outright.
pub const MAX_GAME_SCORE: i32 = 30;

/// Ways a score pair can violate the game law.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreError {
    Negative,
    AboveMaximum,
    CapRequiresDeuce,
    MustWinByTwo,
    OverrunWithoutDeuce,
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::Negative => write!(f, "Scores cannot be negative"),
            ScoreError::AboveMaximum => write!(f, "Maximum score is {}", MAX_GAME_SCORE),
            ScoreError::CapRequiresDeuce => write!(
                f,
                "Score cannot reach {} unless opponent has at least {}",
                MAX_GAME_SCORE,
                MAX_GAME_SCORE - 1
            ),
            ScoreError::MustWinByTwo => {
                write!(f, "At 20-20 or higher, must win by 2 points")
            }
            ScoreError::OverrunWithoutDeuce => write!(
                f,
                "Score cannot exceed {} unless opponent has at least {}",
                STANDARD_GAME_TARGET, DEUCE_THRESHOLD
            ),
        }
    }
}

/// Validate a game score pair and determine the winner, if any.
///
/// `Ok(None)` means the score is legal but the game is still in progress.
/// Called on every score edit, so it must stay cheap and side-effect free;
/// a given pair always yields the same verdict.
pub fn validate_game_score(
    team1_score: i32,
    team2_score: i32,
) -> Result<Option<Side>, ScoreError> {
    if team1_score < 0 || team2_score < 0 {
        return Err(ScoreError::Negative);
    }
    if team1_score > MAX_GAME_SCORE || team2_score > MAX_GAME_SCORE {
        return Err(ScoreError::AboveMaximum);
    }

    // The golden point ends play at 30-29; 30-30 cannot occur.
    if team1_score == MAX_GAME_SCORE && team2_score == MAX_GAME_SCORE {
        return Err(ScoreError::MustWinByTwo);
    }

    // Hard cap: 30 is only reachable from 29-all (or 29-30) and wins outright.
    if team1_score == MAX_GAME_SCORE {
        if team2_score < MAX_GAME_SCORE - 1 {
            return Err(ScoreError::CapRequiresDeuce);
        }
        return Ok(Some(Side::Team1));
    }
    if team2_score == MAX_GAME_SCORE {
        if team1_score < MAX_GAME_SCORE - 1 {
            return Err(ScoreError::CapRequiresDeuce);
        }
        return Ok(Some(Side::Team2));
    }

    // Past 20-all: a two-point lead wins; 21 is never a valid score here
    // because it cannot carry a two-point lead over 20 or more.
    if team1_score >= DEUCE_THRESHOLD && team2_score >= DEUCE_THRESHOLD {
        if team1_score - team2_score >= 2 {
            return Ok(Some(Side::Team1));
        }
        if team2_score - team1_score >= 2 {
            return Ok(Some(Side::Team2));
        }
        if team1_score == STANDARD_GAME_TARGET || team2_score == STANDARD_GAME_TARGET {
            return Err(ScoreError::MustWinByTwo);
        }
        return Ok(None);
    }

    // Normal-length game: exactly 21 with the opponent short of 20 wins.
    if team1_score == STANDARD_GAME_TARGET {
        return Ok(Some(Side::Team1));
    }
    if team2_score == STANDARD_GAME_TARGET {
        return Ok(Some(Side::Team2));
    }

    // Neither side past 21 without the opponent reaching deuce territory.
    if team1_score > STANDARD_GAME_TARGET || team2_score > STANDARD_GAME_TARGET {
        return Err(ScoreError::OverrunWithoutDeuce);
    }

    Ok(None)
}
