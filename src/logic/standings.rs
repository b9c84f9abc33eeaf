//! Standings: per-team tallies over completed rounds, ranked by a
//! multi-level comparator, plus head-to-head aggregates per team pair.

use crate::models::{Match, Round, Side, Team, TeamId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A match win is worth this many standings points; game and point
/// differentials are tiebreakers only.
pub const POINTS_PER_MATCH_WIN: u32 = 1;

/// One team's aggregate line in the standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_points: u32,
}

/// Head-to-head record of one team against one opponent, aggregated over
/// every completed round between the two.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct HeadToHeadStat {
    pub opponent_id: TeamId,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub match_diff: i32,
    pub games_won: u32,
    pub games_lost: u32,
    pub game_diff: i32,
    pub points_for: i32,
    pub points_against: i32,
    pub point_diff: i32,
}

/// Only finished matches with a decided winner feed the standings.
fn contributes(m: &Match) -> bool {
    m.status.is_completed() && m.winner.is_some()
}

#[derive(Clone, Copy, Default)]
struct Diffs {
    games: i32,
    points: i32,
}

/// Overall game/point differentials per team across all completed rounds.
fn overall_diffs(teams: &[Team], rounds: &[Round]) -> HashMap<TeamId, Diffs> {
    let mut diffs: HashMap<TeamId, Diffs> = teams.iter().map(|t| (t.id, Diffs::default())).collect();

    for round in rounds.iter().filter(|r| r.completed) {
        if !diffs.contains_key(&round.team1_id) || !diffs.contains_key(&round.team2_id) {
            continue;
        }
        for m in round.matches.iter().filter(|m| contributes(m)) {
            for g in &m.games {
                if let Some(t1) = diffs.get_mut(&round.team1_id) {
                    t1.points += g.team1_score - g.team2_score;
                    match g.team1_score.cmp(&g.team2_score) {
                        Ordering::Greater => t1.games += 1,
                        Ordering::Less => t1.games -= 1,
                        Ordering::Equal => {}
                    }
                }
                if let Some(t2) = diffs.get_mut(&round.team2_id) {
                    t2.points += g.team2_score - g.team1_score;
                    match g.team2_score.cmp(&g.team1_score) {
                        Ordering::Greater => t2.games += 1,
                        Ordering::Less => t2.games -= 1,
                        Ordering::Equal => {}
                    }
                }
            }
        }
    }
    diffs
}

/// Head-to-head aggregates keyed by (team, opponent), both directions.
fn pair_records(teams: &[Team], rounds: &[Round]) -> HashMap<(TeamId, TeamId), HeadToHeadStat> {
    let known: HashSet<TeamId> = teams.iter().map(|t| t.id).collect();
    let mut pairs: HashMap<(TeamId, TeamId), HeadToHeadStat> = HashMap::new();

    for round in rounds.iter().filter(|r| r.completed) {
        let (t1, t2) = (round.team1_id, round.team2_id);
        if !known.contains(&t1) || !known.contains(&t2) {
            continue;
        }
        for (us, them, our_side) in [(t1, t2, Side::Team1), (t2, t1, Side::Team2)] {
            let stat = pairs.entry((us, them)).or_insert_with(|| HeadToHeadStat {
                opponent_id: them,
                ..HeadToHeadStat::default()
            });
            for m in round.matches.iter().filter(|m| contributes(m)) {
                if m.winner == Some(our_side) {
                    stat.matches_won += 1;
                } else {
                    stat.matches_lost += 1;
                }
                for g in &m.games {
                    let (ours, theirs) = match our_side {
                        Side::Team1 => (g.team1_score, g.team2_score),
                        Side::Team2 => (g.team2_score, g.team1_score),
                    };
                    stat.points_for += ours;
                    stat.points_against += theirs;
                    match ours.cmp(&theirs) {
                        Ordering::Greater => stat.games_won += 1,
                        Ordering::Less => stat.games_lost += 1,
                        Ordering::Equal => {}
                    }
                }
            }
            stat.match_diff = stat.matches_won as i32 - stat.matches_lost as i32;
            stat.game_diff = stat.games_won as i32 - stat.games_lost as i32;
            stat.point_diff = stat.points_for - stat.points_against;
        }
    }
    pairs
}

/// Head-to-head stats for every team, against each opponent it has met in
/// a completed round. Opponents are listed in name order for determinism.
pub fn head_to_head_stats(teams: &[Team], rounds: &[Round]) -> HashMap<TeamId, Vec<HeadToHeadStat>> {
    let pairs = pair_records(teams, rounds);
    let name_of: HashMap<TeamId, &str> =
        teams.iter().map(|t| (t.id, t.name.as_str())).collect();

    let mut out: HashMap<TeamId, Vec<HeadToHeadStat>> =
        teams.iter().map(|t| (t.id, Vec::new())).collect();
    for ((us, _), stat) in &pairs {
        if let Some(list) = out.get_mut(us) {
            list.push(*stat);
        }
    }
    for list in out.values_mut() {
        list.sort_by(|a, b| {
            name_of
                .get(&a.opponent_id)
                .cmp(&name_of.get(&b.opponent_id))
                .then_with(|| a.opponent_id.cmp(&b.opponent_id))
        });
    }
    out
}

/// Head-to-head (match, game, point) differentials of `team` restricted to
/// the given subgroup of opponents.
fn restricted_h2h(
    team: TeamId,
    subgroup: &[TeamId],
    pairs: &HashMap<(TeamId, TeamId), HeadToHeadStat>,
) -> (i32, i32, i32) {
    let mut totals = (0, 0, 0);
    for &other in subgroup {
        if other == team {
            continue;
        }
        if let Some(stat) = pairs.get(&(team, other)) {
            totals.0 += stat.match_diff;
            totals.1 += stat.game_diff;
            totals.2 += stat.point_diff;
        }
    }
    totals
}

/// Compute the ranked standings table.
///
/// Only completed rounds contribute, and within them only completed
/// matches with a winner. A round counts as played for both teams once it
/// has at least one contributing match. Ranking: total points descending,
/// then overall game differential, overall point differential,
/// head-to-head (match, game, point differential) restricted to the teams
/// tied on points, and finally team name ascending. The comparator
/// short-circuits level by level, so later keys only decide genuine ties.
pub fn calculate_standings(teams: &[Team], rounds: &[Round]) -> Vec<TeamStanding> {
    let mut table: HashMap<TeamId, TeamStanding> = teams
        .iter()
        .map(|t| {
            (
                t.id,
                TeamStanding {
                    team_id: t.id,
                    team_name: t.name.clone(),
                    rounds_played: 0,
                    wins: 0,
                    losses: 0,
                    total_points: 0,
                },
            )
        })
        .collect();

    for round in rounds.iter().filter(|r| r.completed) {
        if !table.contains_key(&round.team1_id) || !table.contains_key(&round.team2_id) {
            continue;
        }
        let mut any_contributing = false;
        for m in round.matches.iter().filter(|m| contributes(m)) {
            any_contributing = true;
            let (winner_id, loser_id) = match m.winner {
                Some(Side::Team1) => (round.team1_id, round.team2_id),
                Some(Side::Team2) => (round.team2_id, round.team1_id),
                None => continue,
            };
            if let Some(w) = table.get_mut(&winner_id) {
                w.wins += 1;
                w.total_points += POINTS_PER_MATCH_WIN;
            }
            if let Some(l) = table.get_mut(&loser_id) {
                l.losses += 1;
            }
        }
        if any_contributing {
            for id in [round.team1_id, round.team2_id] {
                if let Some(s) = table.get_mut(&id) {
                    s.rounds_played += 1;
                }
            }
        }
    }

    let diffs = overall_diffs(teams, rounds);
    let pairs = pair_records(teams, rounds);
    let points_of: HashMap<TeamId, u32> =
        table.values().map(|s| (s.team_id, s.total_points)).collect();

    let mut standings: Vec<TeamStanding> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| {
                let da = diffs.get(&a.team_id).copied().unwrap_or_default();
                let db = diffs.get(&b.team_id).copied().unwrap_or_default();
                db.games.cmp(&da.games)
            })
            .then_with(|| {
                let da = diffs.get(&a.team_id).copied().unwrap_or_default();
                let db = diffs.get(&b.team_id).copied().unwrap_or_default();
                db.points.cmp(&da.points)
            })
            .then_with(|| {
                // Both teams share a point total here; compare their
                // head-to-head records within that tied subgroup.
                let tied: Vec<TeamId> = points_of
                    .iter()
                    .filter(|(_, &p)| p == a.total_points)
                    .map(|(&id, _)| id)
                    .collect();
                let ra = restricted_h2h(a.team_id, &tied, &pairs);
                let rb = restricted_h2h(b.team_id, &tied, &pairs);
                rb.0.cmp(&ra.0)
                    .then_with(|| rb.1.cmp(&ra.1))
                    .then_with(|| rb.2.cmp(&ra.2))
            })
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    standings
}
