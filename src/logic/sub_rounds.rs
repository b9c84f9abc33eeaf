//! Sub-round arrangement: split a six-match round into two groups of three
//! with no player appearing twice inside a group, so the two groups can be
//! contested as simultaneous sessions.

use crate::models::{PlayerId, Round, SubRounds};
use std::collections::HashSet;

/// Sub-rounds apply only to rounds holding exactly this many matches.
pub const SUB_ROUND_MATCH_COUNT: usize = 6;
/// Size of each of the two groups.
pub const SUB_ROUND_GROUP_SIZE: usize = 3;

fn rosters(round: &Round) -> Vec<HashSet<PlayerId>> {
    round
        .matches
        .iter()
        .map(|m| m.player_ids().collect())
        .collect()
}

/// A group is conflict-free when its matches' player sets are pairwise
/// disjoint.
fn group_is_conflict_free(group: &[usize], rosters: &[HashSet<PlayerId>]) -> bool {
    for (i, &a) in group.iter().enumerate() {
        for &b in &group[i + 1..] {
            if !rosters[a].is_disjoint(&rosters[b]) {
                return false;
            }
        }
    }
    true
}

/// Whether a stored partition is still a valid conflict-free split of the
/// round's current matches.
pub fn is_valid_arrangement(round: &Round, sub_rounds: &SubRounds) -> bool {
    if round.matches.len() != SUB_ROUND_MATCH_COUNT
        || !round.matches.iter().all(|m| m.is_fully_staffed())
    {
        return false;
    }
    if sub_rounds.first.len() != SUB_ROUND_GROUP_SIZE
        || sub_rounds.second.len() != SUB_ROUND_GROUP_SIZE
    {
        return false;
    }

    // Both groups together must cover the round's matches exactly.
    let mut covered: Vec<_> = sub_rounds
        .first
        .iter()
        .chain(sub_rounds.second.iter())
        .copied()
        .collect();
    covered.sort();
    covered.dedup();
    if covered.len() != SUB_ROUND_MATCH_COUNT
        || !covered.iter().all(|id| round.get_match(*id).is_some())
    {
        return false;
    }

    let rosters = rosters(round);
    let index_of = |id| round.matches.iter().position(|m| m.id == id);
    for group in [&sub_rounds.first, &sub_rounds.second] {
        let indices: Vec<usize> = group.iter().filter_map(|&id| index_of(id)).collect();
        if !group_is_conflict_free(&indices, &rosters) {
            return false;
        }
    }
    true
}

/// Compute a conflict-free two-group split of the round's matches.
///
/// Returns `None` when the round is not arrangeable (not exactly six
/// matches, a side short of two players), when no conflict-free split
/// exists, or when the stored partition already equals the fresh result
/// (idempotent no-op, so recomputation never signals needless churn).
///
/// Enumeration is exhaustive over the 20 three-of-six index combinations
/// in lexicographic order; the first split whose two groups are both
/// internally conflict-free wins, making the result deterministic for a
/// given match/roster configuration.
pub fn arrange_sub_rounds(round: &Round) -> Option<SubRounds> {
    if round.matches.len() != SUB_ROUND_MATCH_COUNT
        || !round.matches.iter().all(|m| m.is_fully_staffed())
    {
        return None;
    }

    let rosters = rosters(round);
    let n = round.matches.len();

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let group_a = [i, j, k];
                let group_b: Vec<usize> =
                    (0..n).filter(|idx| !group_a.contains(idx)).collect();
                if group_is_conflict_free(&group_a, &rosters)
                    && group_is_conflict_free(&group_b, &rosters)
                {
                    let fresh = SubRounds {
                        first: group_a.iter().map(|&idx| round.matches[idx].id).collect(),
                        second: group_b.iter().map(|&idx| round.matches[idx].id).collect(),
                    };
                    if let Some(existing) = &round.sub_rounds {
                        if existing.same_partition(&fresh) {
                            return None;
                        }
                    }
                    return Some(fresh);
                }
            }
        }
    }

    None
}
