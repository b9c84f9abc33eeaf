//! Round-wide assignment rules: per-player load limits, the Mixed Doubles
//! cap, and pairing uniqueness across all matches of a round.

use crate::models::{player_name, MatchId, MatchType, Player, PlayerId, Round, Side};
use std::collections::{HashMap, HashSet};

/// A player may be fielded in at most this many matches per round.
pub const MAX_MATCHES_PER_PLAYER: usize = 2;
/// A player may be fielded in at most this many Mixed Doubles matches per round.
pub const MAX_MIXED_DOUBLES_PER_PLAYER: usize = 1;

/// Rejection reasons for a single tentative player addition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdditionError {
    MatchNotFound,
    MatchLimit,
    MixedDoublesLimit,
    DuplicatePair,
}

impl std::fmt::Display for AdditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdditionError::MatchNotFound => write!(f, "Match not found"),
            AdditionError::MatchLimit => write!(
                f,
                "Player is already playing in {MAX_MATCHES_PER_PLAYER} matches (maximum is {MAX_MATCHES_PER_PLAYER})"
            ),
            AdditionError::MixedDoublesLimit => write!(
                f,
                "Player is already playing in {MAX_MIXED_DOUBLES_PER_PLAYER} Mixed Doubles match (maximum is {MAX_MIXED_DOUBLES_PER_PLAYER})"
            ),
            AdditionError::DuplicatePair => {
                write!(f, "This pair of players is already used in another match")
            }
        }
    }
}

/// One violation found by the full-round check. Messages are shown to the
/// user verbatim, one per line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssignmentViolation {
    UnfieldedPlayer { name: String },
    MatchOverload { name: String, count: usize },
    MixedDoublesOveruse { name: String, count: usize },
    DuplicatePair { first: String, second: String },
}

impl std::fmt::Display for AssignmentViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentViolation::UnfieldedPlayer { name } => {
                write!(f, "{name} must play at least 1 match")
            }
            AssignmentViolation::MatchOverload { name, count } => write!(
                f,
                "{name} is playing in {count} matches (maximum is {MAX_MATCHES_PER_PLAYER})"
            ),
            AssignmentViolation::MixedDoublesOveruse { name, count } => write!(
                f,
                "{name} is playing in {count} Mixed Doubles matches (maximum is {MAX_MIXED_DOUBLES_PER_PLAYER})"
            ),
            AssignmentViolation::DuplicatePair { first, second } => write!(
                f,
                "The pair of players ({first}, {second}) is used in more than one match"
            ),
        }
    }
}

/// Sorted two-id key so pair identity ignores side and listing order.
fn pair_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Check a single tentative addition of `player_id` to one side of one
/// match, against every match already in the round. Removals never need a
/// check. Re-adding a player already on that side passes (no-op upstream).
pub fn validate_player_addition_to_match(
    round: &Round,
    match_id: MatchId,
    side: Side,
    player_id: PlayerId,
) -> Result<(), AdditionError> {
    let target = round
        .get_match(match_id)
        .ok_or(AdditionError::MatchNotFound)?;
    let current = target.side_players(side);
    let already_here = current.contains(&player_id);

    let match_count = round
        .matches
        .iter()
        .filter(|m| m.fields_player(player_id))
        .count();
    if !already_here && match_count >= MAX_MATCHES_PER_PLAYER {
        return Err(AdditionError::MatchLimit);
    }

    if target.kind == MatchType::MixedDoubles {
        let mixed_count = round
            .matches
            .iter()
            .filter(|m| m.kind == MatchType::MixedDoubles && m.fields_player(player_id))
            .count();
        if !already_here && mixed_count >= MAX_MIXED_DOUBLES_PER_PLAYER {
            return Err(AdditionError::MixedDoublesLimit);
        }
    }

    // Pairing uniqueness: once the addition completes a pair, that pair
    // must not already be fielded together anywhere else in the round.
    if current.len() + 1 == 2 && !already_here {
        let candidate = pair_key(current[0], player_id);
        for m in &round.matches {
            if m.id == match_id {
                continue;
            }
            for side_players in [&m.team1_players, &m.team2_players] {
                if side_players.len() == 2
                    && pair_key(side_players[0], side_players[1]) == candidate
                {
                    return Err(AdditionError::DuplicatePair);
                }
            }
        }
    }

    Ok(())
}

/// Check the full set of assignments in a round against both teams'
/// lineups, collecting every violation so the user can fix all issues in
/// one pass. Empty result means the round is valid. Generation order is
/// deterministic: duplicate pairs in match order, then the per-player
/// checks in lineup order.
pub fn validate_round_player_assignments(
    round: &Round,
    team1_players: &[PlayerId],
    team2_players: &[PlayerId],
    all_players: &[Player],
) -> Vec<AssignmentViolation> {
    let mut errors = Vec::new();

    let lineup: Vec<PlayerId> = team1_players
        .iter()
        .chain(team2_players.iter())
        .copied()
        .collect();

    let mut match_counts: HashMap<PlayerId, usize> = HashMap::new();
    let mut mixed_counts: HashMap<PlayerId, usize> = HashMap::new();
    let mut seen_pairs: HashSet<(PlayerId, PlayerId)> = HashSet::new();

    for m in &round.matches {
        for id in m.player_ids() {
            *match_counts.entry(id).or_insert(0) += 1;
            if m.kind == MatchType::MixedDoubles {
                *mixed_counts.entry(id).or_insert(0) += 1;
            }
        }

        // Duplicate pairs are only detectable on fully staffed sides.
        if m.team1_players.len() == 2 && m.team2_players.len() == 2 {
            for side_players in [&m.team1_players, &m.team2_players] {
                let key = pair_key(side_players[0], side_players[1]);
                if !seen_pairs.insert(key) {
                    errors.push(AssignmentViolation::DuplicatePair {
                        first: player_name(all_players, side_players[0]),
                        second: player_name(all_players, side_players[1]),
                    });
                }
            }
        }
    }

    for &id in &lineup {
        if match_counts.get(&id).copied().unwrap_or(0) == 0 {
            errors.push(AssignmentViolation::UnfieldedPlayer {
                name: player_name(all_players, id),
            });
        }
    }
    for &id in &lineup {
        let count = match_counts.get(&id).copied().unwrap_or(0);
        if count > MAX_MATCHES_PER_PLAYER {
            errors.push(AssignmentViolation::MatchOverload {
                name: player_name(all_players, id),
                count,
            });
        }
    }
    for &id in &lineup {
        let count = mixed_counts.get(&id).copied().unwrap_or(0);
        if count > MAX_MIXED_DOUBLES_PER_PLAYER {
            errors.push(AssignmentViolation::MixedDoublesOveruse {
                name: player_name(all_players, id),
                count,
            });
        }
    }

    errors
}
