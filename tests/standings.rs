//! Integration tests for standings calculation and tiebreaks.

use badminton_league_web::{
    calculate_standings, head_to_head_stats, Game, Match, MatchStatus, MatchType, Round, Side,
    Team,
};
use chrono::Utc;

fn teams(names: &[&str]) -> Vec<Team> {
    names.iter().map(|name| Team::new(*name)).collect()
}

fn game(team1_score: i32, team2_score: i32) -> Game {
    let winner = if team1_score > team2_score {
        Some(Side::Team1)
    } else if team2_score > team1_score {
        Some(Side::Team2)
    } else {
        None
    };
    Game {
        team1_score,
        team2_score,
        winner,
    }
}

/// A completed match with the given games; the winner follows from them.
fn completed_match(games: Vec<Game>) -> Match {
    let mut m = Match::new(MatchType::MensDoubles);
    m.games = games;
    m.recompute_winner();
    m.status = MatchStatus::Completed {
        started_at: Utc::now(),
        completed_at: Utc::now(),
    };
    m
}

fn completed_round(team1: &Team, team2: &Team, matches: Vec<Match>) -> Round {
    let mut round = Round::new("Round", team1.id, team2.id);
    round.matches = matches;
    round.completed = true;
    round
}

/// Straight-game win for the given side, with a fixed margin.
fn straight_win(side: Side) -> Match {
    match side {
        Side::Team1 => completed_match(vec![game(21, 10), game(21, 10)]),
        Side::Team2 => completed_match(vec![game(10, 21), game(10, 21)]),
    }
}

#[test]
fn match_wins_drive_points_and_order() {
    let ts = teams(&["Eagles", "Falcons"]);
    let round = completed_round(
        &ts[0],
        &ts[1],
        vec![
            straight_win(Side::Team1),
            straight_win(Side::Team1),
            straight_win(Side::Team1),
            straight_win(Side::Team2),
            straight_win(Side::Team2),
        ],
    );

    let standings = calculate_standings(&ts, &[round]);
    assert_eq!(standings[0].team_name, "Eagles");
    assert_eq!(standings[0].wins, 3);
    assert_eq!(standings[0].losses, 2);
    assert_eq!(standings[0].total_points, 3);
    assert_eq!(standings[0].rounds_played, 1);
    assert_eq!(standings[1].team_name, "Falcons");
    assert_eq!(standings[1].wins, 2);
    assert_eq!(standings[1].total_points, 2);
    assert_eq!(standings[1].rounds_played, 1);
}

#[test]
fn incomplete_rounds_and_matches_do_not_contribute() {
    let ts = teams(&["Eagles", "Falcons"]);

    // Round not completed: nothing counts, even with finished matches.
    let mut open_round = completed_round(&ts[0], &ts[1], vec![straight_win(Side::Team1)]);
    open_round.completed = false;

    // Completed round, but the match is still in play (winner decided is
    // not enough; the match itself must be completed).
    let mut in_play = straight_win(Side::Team2);
    in_play.status = MatchStatus::InPlay {
        started_at: Utc::now(),
    };
    let half_done = completed_round(&ts[0], &ts[1], vec![in_play]);

    let standings = calculate_standings(&ts, &[open_round, half_done]);
    for s in &standings {
        assert_eq!(s.wins, 0);
        assert_eq!(s.total_points, 0);
        assert_eq!(s.rounds_played, 0);
    }
}

#[test]
fn game_differential_breaks_point_ties() {
    let ts = teams(&["Ants", "Bees", "Crows"]);
    // Ants beat Crows 2-1 in games; Bees beat Crows 2-0. Equal points,
    // higher overall game differential ranks first.
    let r1 = completed_round(
        &ts[0],
        &ts[2],
        vec![completed_match(vec![game(21, 10), game(10, 21), game(21, 10)])],
    );
    let r2 = completed_round(&ts[1], &ts[2], vec![straight_win(Side::Team1)]);

    let standings = calculate_standings(&ts, &[r1, r2]);
    assert_eq!(standings[0].team_name, "Bees");
    assert_eq!(standings[1].team_name, "Ants");
    assert_eq!(standings[0].total_points, standings[1].total_points);
}

#[test]
fn point_differential_breaks_game_ties() {
    let ts = teams(&["Ants", "Bees", "Crows"]);
    // Both winners take two straight games (game diff +2 each), but the
    // Ants win by wider margins.
    let r1 = completed_round(
        &ts[0],
        &ts[2],
        vec![completed_match(vec![game(21, 0), game(21, 0)])],
    );
    let r2 = completed_round(
        &ts[1],
        &ts[2],
        vec![completed_match(vec![game(21, 19), game(21, 19)])],
    );

    let standings = calculate_standings(&ts, &[r1, r2]);
    assert_eq!(standings[0].team_name, "Ants");
    assert_eq!(standings[1].team_name, "Bees");
}

#[test]
fn head_to_head_breaks_remaining_ties_within_the_group() {
    let ts = teams(&["Zebras", "Aces", "Crows", "Drakes"]);
    let (zebras, aces, crows, drakes) = (&ts[0], &ts[1], &ts[2], &ts[3]);

    // Zebras beat Aces head-to-head, then lose an identical match to the
    // Drakes, cancelling their overall differentials. Aces beat Crows to
    // equal the Zebras on points with the same overall differentials.
    let rounds = vec![
        completed_round(zebras, aces, vec![straight_win(Side::Team1)]),
        completed_round(zebras, drakes, vec![straight_win(Side::Team2)]),
        completed_round(aces, crows, vec![straight_win(Side::Team1)]),
    ];

    let standings = calculate_standings(&ts, &rounds);
    let order: Vec<&str> = standings.iter().map(|s| s.team_name.as_str()).collect();

    // Drakes lead the tied trio on overall game differential; Zebras rank
    // above Aces only through the head-to-head win (alphabetical order
    // would say otherwise).
    assert_eq!(order, vec!["Drakes", "Zebras", "Aces", "Crows"]);
}

#[test]
fn full_tie_falls_back_to_team_name() {
    let ts = teams(&["Cobras", "Asps", "Boas"]);
    // Perfect rock-paper-scissors with identical scores: every tiebreak
    // level cancels out.
    let rounds = vec![
        completed_round(&ts[0], &ts[1], vec![straight_win(Side::Team1)]),
        completed_round(&ts[1], &ts[2], vec![straight_win(Side::Team1)]),
        completed_round(&ts[2], &ts[0], vec![straight_win(Side::Team1)]),
    ];

    let standings = calculate_standings(&ts, &rounds);
    let order: Vec<&str> = standings.iter().map(|s| s.team_name.as_str()).collect();
    assert_eq!(order, vec!["Asps", "Boas", "Cobras"]);
}

#[test]
fn teams_without_rounds_still_appear() {
    let ts = teams(&["Eagles", "Falcons", "Gulls"]);
    let round = completed_round(&ts[0], &ts[1], vec![straight_win(Side::Team1)]);

    let standings = calculate_standings(&ts, &[round]);
    assert_eq!(standings.len(), 3);
    let gulls = standings
        .iter()
        .find(|s| s.team_name == "Gulls")
        .expect("all teams are listed");
    assert_eq!(gulls.rounds_played, 0);
    assert_eq!(gulls.total_points, 0);
}

#[test]
fn head_to_head_stats_aggregate_both_directions() {
    let ts = teams(&["Eagles", "Falcons"]);
    let round = completed_round(
        &ts[0],
        &ts[1],
        vec![
            straight_win(Side::Team1),
            completed_match(vec![game(21, 15), game(10, 21), game(21, 18)]),
        ],
    );

    let stats = head_to_head_stats(&ts, &[round]);
    let eagles = &stats[&ts[0].id];
    assert_eq!(eagles.len(), 1);
    let vs_falcons = &eagles[0];
    assert_eq!(vs_falcons.opponent_id, ts[1].id);
    assert_eq!(vs_falcons.matches_won, 2);
    assert_eq!(vs_falcons.matches_lost, 0);
    assert_eq!(vs_falcons.match_diff, 2);
    assert_eq!(vs_falcons.games_won, 4);
    assert_eq!(vs_falcons.games_lost, 1);
    assert_eq!(vs_falcons.game_diff, 3);
    assert_eq!(vs_falcons.points_for, 21 + 21 + 21 + 10 + 21);
    assert_eq!(vs_falcons.points_against, 10 + 10 + 15 + 21 + 18);
    assert_eq!(vs_falcons.point_diff, vs_falcons.points_for - vs_falcons.points_against);

    let falcons = &stats[&ts[1].id];
    let vs_eagles = &falcons[0];
    assert_eq!(vs_eagles.matches_won, 0);
    assert_eq!(vs_eagles.matches_lost, 2);
    assert_eq!(vs_eagles.game_diff, -3);
    assert_eq!(vs_eagles.point_diff, -vs_falcons.point_diff);
}

#[test]
fn standings_are_deterministic() {
    let ts = teams(&["Eagles", "Falcons"]);
    let round = completed_round(&ts[0], &ts[1], vec![straight_win(Side::Team1)]);
    let rounds = vec![round];

    assert_eq!(
        calculate_standings(&ts, &rounds),
        calculate_standings(&ts, &rounds)
    );
}
