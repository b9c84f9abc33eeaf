//! Integration tests for league orchestration: team membership, match
//! state transitions, and round completion gating.

use badminton_league_web::{
    AdditionError, EligibilityError, Gender, League, LeagueError, Level, MatchId, MatchType,
    PlayerId, RoundId, ScoreError, Side,
};

/// Two teams of three men each, one round, two valid matches sharing one
/// player per team (every lineup player fielded, all caps respected).
struct Fixture {
    league: League,
    round: RoundId,
    match1: MatchId,
    match2: MatchId,
    a: Vec<PlayerId>,
    b: Vec<PlayerId>,
}

fn fixture() -> Fixture {
    let mut league = League::new();
    let a: Vec<PlayerId> = (0..3)
        .map(|i| {
            league
                .add_player(format!("A{i}"), Gender::M, Level::TrucCo)
                .expect("fresh name")
        })
        .collect();
    let b: Vec<PlayerId> = (0..3)
        .map(|i| {
            league
                .add_player(format!("B{i}"), Gender::M, Level::TrucCo)
                .expect("fresh name")
        })
        .collect();

    let team_a = league.create_team("Team A").expect("fresh name");
    let team_b = league.create_team("Team B").expect("fresh name");
    for &p in &a {
        league.add_player_to_team(team_a, p).expect("unattached");
    }
    for &p in &b {
        league.add_player_to_team(team_b, p).expect("unattached");
    }

    let round = league
        .create_round("Round 1", team_a, team_b)
        .expect("teams exist");
    let match1 = league
        .add_match_to_round(round, MatchType::MensDoubles)
        .expect("round open");
    let match2 = league
        .add_match_to_round(round, MatchType::MensDoubles)
        .expect("round open");
    for (m, side, player) in [
        (match1, Side::Team1, a[0]),
        (match1, Side::Team1, a[1]),
        (match1, Side::Team2, b[0]),
        (match1, Side::Team2, b[1]),
        (match2, Side::Team1, a[0]),
        (match2, Side::Team1, a[2]),
        (match2, Side::Team2, b[0]),
        (match2, Side::Team2, b[2]),
    ] {
        league
            .add_player_to_match(round, m, side, player)
            .expect("valid assignment");
    }

    Fixture {
        league,
        round,
        match1,
        match2,
        a,
        b,
    }
}

/// Drive a match to a decided, completed state with straight games.
fn play_out(league: &mut League, round: RoundId, m: MatchId, winner: Side) {
    league.start_match(round, m).expect("match startable");
    let (s1, s2) = match winner {
        Side::Team1 => (21, 10),
        Side::Team2 => (10, 21),
    };
    league.update_game_score(round, m, 0, s1, s2).expect("legal score");
    league.update_game_score(round, m, 1, s1, s2).expect("legal score");
    league.complete_match(round, m).expect("winner decided");
}

#[test]
fn player_names_are_unique_case_insensitive() {
    let mut league = League::new();
    league.add_player("Anh", Gender::M, Level::TrucCo).expect("fresh name");
    assert_eq!(
        league.add_player("anh", Gender::F, Level::KetDan),
        Err(LeagueError::DuplicatePlayerName)
    );
}

#[test]
fn a_player_belongs_to_at_most_one_team() {
    let mut league = League::new();
    let p = league.add_player("Anh", Gender::M, Level::TrucCo).expect("fresh name");
    let t1 = league.create_team("Team A").expect("fresh name");
    let t2 = league.create_team("Team B").expect("fresh name");

    league.add_player_to_team(t1, p).expect("unattached");
    assert_eq!(
        league.add_player_to_team(t2, p),
        Err(LeagueError::AlreadyOnTeam {
            team: "Team A".to_string()
        })
    );

    // Moving is the sanctioned way to change teams.
    league.move_player(p, t2).expect("move allowed");
    assert!(league.team(t1).expect("team exists").players.is_empty());
    assert_eq!(league.team(t2).expect("team exists").players, vec![p]);
}

#[test]
fn deleting_a_player_cascades_to_rosters_and_lineups() {
    let mut f = fixture();
    let gone = f.a[2];
    f.league.delete_player(gone).expect("player exists");

    assert!(f.league.player(gone).is_none());
    for team in &f.league.teams {
        assert!(!team.players.contains(&gone));
    }
    let round = f.league.round(f.round).expect("round exists");
    assert!(!round.team1_lineup.contains(&gone));
    // The other lineup is untouched.
    assert!(round.team2_lineup.contains(&f.b[2]));
}

#[test]
fn gender_rules_apply_when_fielding_players() {
    let mut f = fixture();
    let w = f
        .league
        .add_player("Mai", Gender::F, Level::NguyenAnh)
        .expect("fresh name");
    let m3 = f
        .league
        .add_match_to_round(f.round, MatchType::MensDoubles)
        .expect("round open");

    assert_eq!(
        f.league.add_player_to_match(f.round, m3, Side::Team1, w),
        Err(LeagueError::Eligibility(EligibilityError::MenOnly))
    );
}

#[test]
fn a_side_holds_at_most_two_players() {
    let mut f = fixture();
    assert_eq!(
        f.league
            .add_player_to_match(f.round, f.match1, Side::Team1, f.a[2]),
        Err(LeagueError::SideFull)
    );
}

#[test]
fn refielding_an_existing_pair_is_rejected() {
    let mut f = fixture();
    let m3 = f
        .league
        .add_match_to_round(f.round, MatchType::MensDoubles)
        .expect("round open");

    f.league
        .add_player_to_match(f.round, m3, Side::Team1, f.a[1])
        .expect("first slot");
    // {a0, a1} already plays together in match 1.
    assert_eq!(
        f.league.add_player_to_match(f.round, m3, Side::Team1, f.a[0]),
        Err(LeagueError::Addition(AdditionError::DuplicatePair))
    );
}

#[test]
fn starting_needs_a_full_pair_on_both_sides() {
    let mut f = fixture();
    f.league
        .remove_player_from_match(f.round, f.match1, f.a[1])
        .expect("removal is always allowed");
    assert_eq!(
        f.league.start_match(f.round, f.match1),
        Err(LeagueError::UnderStaffed)
    );
}

#[test]
fn starting_needs_valid_round_assignments() {
    let mut f = fixture();
    // A lineup player with no match blocks every start.
    let bench = f
        .league
        .add_player("Bench", Gender::M, Level::LuyenKhiKy)
        .expect("fresh name");
    let mut lineup = f.league.round(f.round).expect("round exists").team1_lineup.clone();
    lineup.push(bench);
    f.league
        .set_round_lineup(f.round, Side::Team1, lineup)
        .expect("round open");

    match f.league.start_match(f.round, f.match1) {
        Err(LeagueError::RoundRules(violations)) => {
            assert!(violations
                .iter()
                .any(|v| v.to_string() == "Bench must play at least 1 match"));
        }
        other => panic!("expected round rule violations, got {other:?}"),
    }
}

#[test]
fn players_cannot_be_in_two_matches_in_play() {
    let mut f = fixture();
    f.league.start_match(f.round, f.match1).expect("valid round");
    // match2 shares a0 and b0 with the in-play match1.
    assert_eq!(
        f.league.start_match(f.round, f.match2),
        Err(LeagueError::PlayerBusy)
    );

    // Once match1 completes, the shared players are free again.
    f.league
        .update_game_score(f.round, f.match1, 0, 21, 10)
        .expect("legal score");
    f.league
        .update_game_score(f.round, f.match1, 1, 21, 10)
        .expect("legal score");
    f.league.complete_match(f.round, f.match1).expect("decided");
    f.league.start_match(f.round, f.match2).expect("no conflict left");
}

#[test]
fn started_matches_lock_player_edits() {
    let mut f = fixture();
    f.league.start_match(f.round, f.match1).expect("valid round");
    assert_eq!(
        f.league
            .remove_player_from_match(f.round, f.match1, f.a[0]),
        Err(LeagueError::MatchStarted)
    );
    assert_eq!(
        f.league.start_match(f.round, f.match1),
        Err(LeagueError::MatchStarted)
    );
}

#[test]
fn scores_are_validated_and_capped_at_three_games() {
    let mut f = fixture();
    f.league.start_match(f.round, f.match1).expect("valid round");
    assert_eq!(
        f.league.update_game_score(f.round, f.match1, 0, 25, 10),
        Err(LeagueError::InvalidScore(ScoreError::OverrunWithoutDeuce))
    );
    assert_eq!(
        f.league.update_game_score(f.round, f.match1, 3, 21, 10),
        Err(LeagueError::InvalidGameIndex)
    );
}

#[test]
fn best_of_three_decides_the_match_winner() {
    let mut f = fixture();
    f.league.start_match(f.round, f.match1).expect("valid round");

    f.league.update_game_score(f.round, f.match1, 0, 21, 10).expect("legal");
    f.league.update_game_score(f.round, f.match1, 1, 10, 21).expect("legal");
    assert_eq!(
        f.league.complete_match(f.round, f.match1),
        Err(LeagueError::NoWinner)
    );

    f.league.update_game_score(f.round, f.match1, 2, 22, 20).expect("legal");
    let m = f
        .league
        .round(f.round)
        .and_then(|r| r.get_match(f.match1))
        .expect("match exists");
    assert_eq!(m.winner, Some(Side::Team1));
    f.league.complete_match(f.round, f.match1).expect("decided");
}

#[test]
fn stopping_a_match_rolls_everything_back() {
    let mut f = fixture();
    f.league.start_match(f.round, f.match1).expect("valid round");
    f.league.update_game_score(f.round, f.match1, 0, 21, 10).expect("legal");
    f.league.update_game_score(f.round, f.match1, 1, 21, 10).expect("legal");

    f.league.stop_match(f.round, f.match1).expect("not completed");
    let m = f
        .league
        .round(f.round)
        .and_then(|r| r.get_match(f.match1))
        .expect("match exists");
    assert!(m.games.is_empty());
    assert_eq!(m.winner, None);
    assert!(m.status.is_building());

    // Completed matches are locked against rollback.
    play_out(&mut f.league, f.round, f.match1, Side::Team1);
    assert_eq!(
        f.league.stop_match(f.round, f.match1),
        Err(LeagueError::MatchCompleted)
    );
}

#[test]
fn round_completion_is_gated_and_terminal() {
    let mut f = fixture();

    assert_eq!(
        f.league.complete_round(f.round),
        Err(LeagueError::IncompleteMatches { count: 2 })
    );

    play_out(&mut f.league, f.round, f.match1, Side::Team1);
    play_out(&mut f.league, f.round, f.match2, Side::Team2);
    f.league.complete_round(f.round).expect("all matches done");

    // Terminal: no second completion, no further edits of any kind.
    assert_eq!(f.league.complete_round(f.round), Err(LeagueError::RoundCompleted));
    assert_eq!(
        f.league.add_match_to_round(f.round, MatchType::MensDoubles),
        Err(LeagueError::RoundCompleted)
    );
    assert_eq!(
        f.league.stop_match(f.round, f.match1),
        Err(LeagueError::RoundCompleted)
    );
}

#[test]
fn empty_rounds_cannot_complete() {
    let mut league = League::new();
    let t1 = league.create_team("Team A").expect("fresh name");
    let t2 = league.create_team("Team B").expect("fresh name");
    let round = league.create_round("Round 1", t1, t2).expect("teams exist");
    assert_eq!(league.complete_round(round), Err(LeagueError::NoMatches));
}

#[test]
fn completed_rounds_feed_the_standings() {
    let mut f = fixture();
    play_out(&mut f.league, f.round, f.match1, Side::Team1);
    play_out(&mut f.league, f.round, f.match2, Side::Team2);
    f.league.complete_round(f.round).expect("all matches done");

    let standings = f.league.standings();
    assert_eq!(standings.len(), 2);
    for s in &standings {
        assert_eq!(s.wins, 1);
        assert_eq!(s.losses, 1);
        assert_eq!(s.total_points, 1);
        assert_eq!(s.rounds_played, 1);
    }

    let h2h = f.league.head_to_head();
    let team_a = f.league.teams[0].id;
    assert_eq!(h2h[&team_a][0].matches_won, 1);
    assert_eq!(h2h[&team_a][0].matches_lost, 1);
}

/// Building the full six-match template through the league keeps the
/// sub-round split current on every assignment change.
#[test]
fn sub_rounds_follow_match_edits() {
    let mut league = League::new();
    let am: Vec<PlayerId> = (0..4)
        .map(|i| league.add_player(format!("AM{i}"), Gender::M, Level::TrucCo).expect("fresh"))
        .collect();
    let aw: Vec<PlayerId> = (0..2)
        .map(|i| league.add_player(format!("AW{i}"), Gender::F, Level::TrucCo).expect("fresh"))
        .collect();
    let bm: Vec<PlayerId> = (0..4)
        .map(|i| league.add_player(format!("BM{i}"), Gender::M, Level::TrucCo).expect("fresh"))
        .collect();
    let bw: Vec<PlayerId> = (0..2)
        .map(|i| league.add_player(format!("BW{i}"), Gender::F, Level::TrucCo).expect("fresh"))
        .collect();

    let team_a = league.create_team("Team A").expect("fresh");
    let team_b = league.create_team("Team B").expect("fresh");
    for &p in am.iter().chain(aw.iter()) {
        league.add_player_to_team(team_a, p).expect("unattached");
    }
    for &p in bm.iter().chain(bw.iter()) {
        league.add_player_to_team(team_b, p).expect("unattached");
    }
    let round = league.create_round("Template", team_a, team_b).expect("teams");

    let kinds = [
        MatchType::MensDoubles,
        MatchType::MensDoubles,
        MatchType::MensDoubles,
        MatchType::MixedDoubles,
        MatchType::MixedDoubles,
        MatchType::WomensDoubles,
    ];
    let assignments: [[PlayerId; 4]; 6] = [
        [am[0], am[1], bm[0], bm[1]],
        [am[2], am[3], bm[2], bm[3]],
        [am[0], am[2], bm[0], bm[2]],
        [am[1], aw[0], bm[1], bw[0]],
        [am[3], aw[1], bm[3], bw[1]],
        [aw[0], aw[1], bw[0], bw[1]],
    ];

    let mut match_ids = Vec::new();
    for (kind, players) in kinds.iter().zip(assignments.iter()) {
        let m = league.add_match_to_round(round, *kind).expect("round open");
        match_ids.push(m);
        league.add_player_to_match(round, m, Side::Team1, players[0]).expect("valid");
        league.add_player_to_match(round, m, Side::Team1, players[1]).expect("valid");
        league.add_player_to_match(round, m, Side::Team2, players[2]).expect("valid");
        league.add_player_to_match(round, m, Side::Team2, players[3]).expect("valid");
    }

    let stored = league
        .round(round)
        .and_then(|r| r.sub_rounds.clone())
        .expect("split exists once all six matches are staffed");
    assert_eq!(stored.first.len(), 3);
    assert_eq!(stored.second.len(), 3);

    // A seventh match is over the cap.
    assert_eq!(
        league.add_match_to_round(round, MatchType::MensDoubles),
        Err(LeagueError::RoundFull)
    );

    // Dropping a match invalidates the split.
    league
        .remove_match_from_round(round, match_ids[5])
        .expect("round open");
    assert!(league.round(round).expect("round exists").sub_rounds.is_none());
}
