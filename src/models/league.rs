//! League state and gated mutations. The `League` owns the authoritative
//! in-memory roster of players, teams, and rounds; every mutation first
//! consults the pure rules in `crate::logic` and leaves all state
//! untouched on a failed check.

use crate::logic::{
    arrange_sub_rounds, is_valid_arrangement, validate_game_score,
    validate_player_addition_to_match, validate_player_gender_for_match,
    validate_round_player_assignments, AdditionError, AssignmentViolation, EligibilityError,
    ScoreError, PLAYERS_PER_SIDE,
};
use crate::logic::{calculate_standings, head_to_head_stats, HeadToHeadStat, TeamStanding};
use crate::models::round::{GAMES_PER_MATCH, MAX_MATCHES_PER_ROUND};
use crate::models::{
    Game, Gender, Level, Match, MatchId, MatchStatus, MatchType, Player, PlayerId, Round, RoundId,
    Side, Team, TeamId,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors that can occur during league operations. Every message is meant
/// for direct display to the user; a failed operation mutates nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Name was empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// A team with this name already exists.
    DuplicateTeamName,
    PlayerNotFound(PlayerId),
    TeamNotFound(TeamId),
    RoundNotFound(RoundId),
    MatchNotFound(MatchId),
    /// A player belongs to at most one team at a time.
    AlreadyOnTeam { team: String },
    /// A round needs two distinct teams.
    SameTeam,
    /// The round is completed; completion is terminal and locks all edits.
    RoundCompleted,
    /// A round holds at most six matches.
    RoundFull,
    /// Doubles sides hold at most two players.
    SideFull,
    /// The match has left the Building state; players are locked.
    MatchStarted,
    MatchCompleted,
    MatchNotInPlay,
    /// Both sides need a full pair before play can start.
    UnderStaffed,
    /// Some player is already fielded in another in-play match.
    PlayerBusy,
    /// Best of three is undecided; completion needs a winner.
    NoWinner,
    NoMatches,
    IncompleteMatches { count: usize },
    InvalidGameIndex,
    InvalidScore(ScoreError),
    Eligibility(EligibilityError),
    Addition(AdditionError),
    /// Full-round validation failed; every violation is preserved.
    RoundRules(Vec<AssignmentViolation>),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::EmptyName => write!(f, "Name cannot be empty"),
            LeagueError::DuplicatePlayerName => {
                write!(f, "A player with this name already exists")
            }
            LeagueError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            LeagueError::PlayerNotFound(_) => write!(f, "Player not found"),
            LeagueError::TeamNotFound(_) => write!(f, "Team not found"),
            LeagueError::RoundNotFound(_) => write!(f, "Round not found"),
            LeagueError::MatchNotFound(_) => write!(f, "Match not found"),
            LeagueError::AlreadyOnTeam { team } => {
                write!(f, "Player is already on team {team}")
            }
            LeagueError::SameTeam => write!(f, "A round needs two different teams"),
            LeagueError::RoundCompleted => write!(f, "Round is already completed"),
            LeagueError::RoundFull => {
                write!(f, "A round can have at most {MAX_MATCHES_PER_ROUND} matches")
            }
            LeagueError::SideFull => {
                write!(f, "Doubles matches can only have 2 players per team")
            }
            LeagueError::MatchStarted => write!(f, "Match has already started"),
            LeagueError::MatchCompleted => write!(f, "Match is already completed"),
            LeagueError::MatchNotInPlay => write!(f, "Match is not in play"),
            LeagueError::UnderStaffed => write!(
                f,
                "Both teams must field {PLAYERS_PER_SIDE} players to start the match"
            ),
            LeagueError::PlayerBusy => write!(
                f,
                "One or more players are already participating in another active match"
            ),
            LeagueError::NoWinner => {
                write!(f, "Match must have a winner before it can be completed")
            }
            LeagueError::NoMatches => write!(f, "Cannot complete round: no matches have been added"),
            LeagueError::IncompleteMatches { count } => {
                write!(f, "{count} match(es) have not been completed")
            }
            LeagueError::InvalidGameIndex => {
                write!(f, "A match has at most {GAMES_PER_MATCH} games")
            }
            LeagueError::InvalidScore(e) => write!(f, "{e}"),
            LeagueError::Eligibility(e) => write!(f, "{e}"),
            LeagueError::Addition(e) => write!(f, "{e}"),
            LeagueError::RoundRules(violations) => {
                let joined = violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                write!(f, "{joined}")
            }
        }
    }
}

impl From<ScoreError> for LeagueError {
    fn from(e: ScoreError) -> Self {
        LeagueError::InvalidScore(e)
    }
}

impl From<EligibilityError> for LeagueError {
    fn from(e: EligibilityError) -> Self {
        LeagueError::Eligibility(e)
    }
}

impl From<AdditionError> for LeagueError {
    fn from(e: AdditionError) -> Self {
        LeagueError::Addition(e)
    }
}

/// Full league state: players, teams, and rounds.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub rounds: Vec<Round>,
}

impl League {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn round(&self, id: RoundId) -> Option<&Round> {
        self.rounds.iter().find(|r| r.id == id)
    }

    fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, LeagueError> {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(LeagueError::TeamNotFound(id))
    }

    /// Mutable round that is still editable (not completed).
    fn editable_round(&mut self, id: RoundId) -> Result<&mut Round, LeagueError> {
        let round = self
            .rounds
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LeagueError::RoundNotFound(id))?;
        if round.completed {
            return Err(LeagueError::RoundCompleted);
        }
        Ok(round)
    }

    // --- players ---

    /// Register a player. Names are unique, case-insensitive.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        gender: Gender,
        level: Level,
    ) -> Result<PlayerId, LeagueError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(LeagueError::DuplicatePlayerName);
        }
        let player = Player::new(trimmed, gender, level);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Edit a player's name, gender, or level.
    pub fn update_player(
        &mut self,
        id: PlayerId,
        name: impl Into<String>,
        gender: Gender,
        level: Level,
    ) -> Result<(), LeagueError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self
            .players
            .iter()
            .any(|p| p.id != id && p.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(LeagueError::DuplicatePlayerName);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))?;
        player.name = trimmed.to_string();
        player.gender = gender;
        player.level = level;
        Ok(())
    }

    /// Delete a player. Cascades to every team roster and to the lineups of
    /// rounds still in progress; historical match assignments keep the id.
    pub fn delete_player(&mut self, id: PlayerId) -> Result<(), LeagueError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(LeagueError::PlayerNotFound(id))?;
        self.players.remove(idx);
        for team in &mut self.teams {
            team.players.retain(|&p| p != id);
        }
        for round in self.rounds.iter_mut().filter(|r| !r.completed) {
            round.team1_lineup.retain(|&p| p != id);
            round.team2_lineup.retain(|&p| p != id);
        }
        Ok(())
    }

    // --- teams ---

    pub fn create_team(&mut self, name: impl Into<String>) -> Result<TeamId, LeagueError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(LeagueError::DuplicateTeamName);
        }
        let team = Team::new(trimmed);
        let id = team.id;
        self.teams.push(team);
        Ok(id)
    }

    pub fn rename_team(&mut self, id: TeamId, name: impl Into<String>) -> Result<(), LeagueError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if self
            .teams
            .iter()
            .any(|t| t.id != id && t.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(LeagueError::DuplicateTeamName);
        }
        self.team_mut(id)?.name = trimmed.to_string();
        Ok(())
    }

    pub fn delete_team(&mut self, id: TeamId) -> Result<(), LeagueError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(LeagueError::TeamNotFound(id))?;
        self.teams.remove(idx);
        Ok(())
    }

    /// Add a player to a team roster. A player belongs to at most one team.
    pub fn add_player_to_team(
        &mut self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> Result<(), LeagueError> {
        if self.player(player_id).is_none() {
            return Err(LeagueError::PlayerNotFound(player_id));
        }
        if let Some(holder) = self.teams.iter().find(|t| t.players.contains(&player_id)) {
            return Err(LeagueError::AlreadyOnTeam {
                team: holder.name.clone(),
            });
        }
        self.team_mut(team_id)?.players.push(player_id);
        Ok(())
    }

    pub fn remove_player_from_team(
        &mut self,
        team_id: TeamId,
        player_id: PlayerId,
    ) -> Result<(), LeagueError> {
        self.team_mut(team_id)?.players.retain(|&p| p != player_id);
        Ok(())
    }

    /// Move a player to another team (removing them from their current one).
    pub fn move_player(&mut self, player_id: PlayerId, to_team: TeamId) -> Result<(), LeagueError> {
        if self.player(player_id).is_none() {
            return Err(LeagueError::PlayerNotFound(player_id));
        }
        if self.team(to_team).is_none() {
            return Err(LeagueError::TeamNotFound(to_team));
        }
        for team in &mut self.teams {
            team.players.retain(|&p| p != player_id);
        }
        self.team_mut(to_team)?.players.push(player_id);
        Ok(())
    }

    // --- rounds ---

    /// Create a round between two teams. Lineups snapshot the current team
    /// rosters and stay editable until the round completes.
    pub fn create_round(
        &mut self,
        name: impl Into<String>,
        team1_id: TeamId,
        team2_id: TeamId,
    ) -> Result<RoundId, LeagueError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if team1_id == team2_id {
            return Err(LeagueError::SameTeam);
        }
        let team1 = self
            .team(team1_id)
            .ok_or(LeagueError::TeamNotFound(team1_id))?;
        let team2 = self
            .team(team2_id)
            .ok_or(LeagueError::TeamNotFound(team2_id))?;

        let mut round = Round::new(trimmed, team1_id, team2_id);
        round.team1_lineup = team1.players.clone();
        round.team2_lineup = team2.players.clone();
        let id = round.id;
        self.rounds.push(round);
        Ok(id)
    }

    pub fn delete_round(&mut self, id: RoundId) -> Result<(), LeagueError> {
        let idx = self
            .rounds
            .iter()
            .position(|r| r.id == id)
            .ok_or(LeagueError::RoundNotFound(id))?;
        self.rounds.remove(idx);
        Ok(())
    }

    /// Replace one side's lineup for a round still in progress.
    pub fn set_round_lineup(
        &mut self,
        round_id: RoundId,
        side: Side,
        player_ids: Vec<PlayerId>,
    ) -> Result<(), LeagueError> {
        let round = self.editable_round(round_id)?;
        match side {
            Side::Team1 => round.team1_lineup = player_ids,
            Side::Team2 => round.team2_lineup = player_ids,
        }
        Ok(())
    }

    pub fn add_match_to_round(
        &mut self,
        round_id: RoundId,
        kind: MatchType,
    ) -> Result<MatchId, LeagueError> {
        let round = self.editable_round(round_id)?;
        if round.matches.len() >= MAX_MATCHES_PER_ROUND {
            return Err(LeagueError::RoundFull);
        }
        let m = Match::new(kind);
        let id = m.id;
        round.matches.push(m);
        Self::refresh_sub_rounds(round);
        Ok(id)
    }

    pub fn remove_match_from_round(
        &mut self,
        round_id: RoundId,
        match_id: MatchId,
    ) -> Result<(), LeagueError> {
        let round = self.editable_round(round_id)?;
        let idx = round
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        round.matches.remove(idx);
        Self::refresh_sub_rounds(round);
        Ok(())
    }

    /// Add a player to one side of a match: gender eligibility, then the
    /// round-wide addition rules, then the doubles side cap. Re-adding a
    /// player already on that side is a no-op.
    pub fn add_player_to_match(
        &mut self,
        round_id: RoundId,
        match_id: MatchId,
        side: Side,
        player_id: PlayerId,
    ) -> Result<(), LeagueError> {
        let gender = self
            .player(player_id)
            .map(|p| p.gender)
            .ok_or(LeagueError::PlayerNotFound(player_id))?;

        {
            let round = self
                .round(round_id)
                .ok_or(LeagueError::RoundNotFound(round_id))?;
            if round.completed {
                return Err(LeagueError::RoundCompleted);
            }
            let m = round
                .get_match(match_id)
                .ok_or(LeagueError::MatchNotFound(match_id))?;
            if !m.status.is_building() {
                return Err(LeagueError::MatchStarted);
            }
            let current = m.side_players(side);
            if current.contains(&player_id) {
                return Ok(());
            }
            if current.len() >= PLAYERS_PER_SIDE {
                return Err(LeagueError::SideFull);
            }
            validate_player_gender_for_match(m.kind, gender, current, &self.players)?;
            validate_player_addition_to_match(round, match_id, side, player_id)?;
        }

        let round = self.editable_round(round_id)?;
        if let Some(m) = round.get_match_mut(match_id) {
            m.side_players_mut(side).push(player_id);
        }
        Self::refresh_sub_rounds(round);
        Ok(())
    }

    /// Remove a player from a match side. Removal needs no validation.
    pub fn remove_player_from_match(
        &mut self,
        round_id: RoundId,
        match_id: MatchId,
        player_id: PlayerId,
    ) -> Result<(), LeagueError> {
        let round = self.editable_round(round_id)?;
        let m = round
            .get_match_mut(match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if !m.status.is_building() {
            return Err(LeagueError::MatchStarted);
        }
        m.team1_players.retain(|&p| p != player_id);
        m.team2_players.retain(|&p| p != player_id);
        Self::refresh_sub_rounds(round);
        Ok(())
    }

    /// Record one game's score pair. The pair must satisfy the scoring law;
    /// the match winner is re-derived from game winners afterwards.
    pub fn update_game_score(
        &mut self,
        round_id: RoundId,
        match_id: MatchId,
        game_index: usize,
        team1_score: i32,
        team2_score: i32,
    ) -> Result<(), LeagueError> {
        if game_index >= GAMES_PER_MATCH {
            return Err(LeagueError::InvalidGameIndex);
        }
        let winner = validate_game_score(team1_score, team2_score)?;

        let round = self.editable_round(round_id)?;
        let m = round
            .get_match_mut(match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if m.status.is_completed() {
            return Err(LeagueError::MatchCompleted);
        }
        while m.games.len() <= game_index {
            m.games.push(Game::default());
        }
        m.games[game_index] = Game {
            team1_score,
            team2_score,
            winner,
        };
        m.recompute_winner();
        Ok(())
    }

    /// Building -> InPlay. Requires full staffing, a fully valid set of
    /// round assignments, and no player shared with another in-play match.
    pub fn start_match(&mut self, round_id: RoundId, match_id: MatchId) -> Result<(), LeagueError> {
        {
            let round = self
                .round(round_id)
                .ok_or(LeagueError::RoundNotFound(round_id))?;
            if round.completed {
                return Err(LeagueError::RoundCompleted);
            }
            let m = round
                .get_match(match_id)
                .ok_or(LeagueError::MatchNotFound(match_id))?;
            if !m.status.is_building() {
                return Err(LeagueError::MatchStarted);
            }
            if !m.is_fully_staffed() {
                return Err(LeagueError::UnderStaffed);
            }

            let violations = validate_round_player_assignments(
                round,
                &round.team1_lineup,
                &round.team2_lineup,
                &self.players,
            );
            if !violations.is_empty() {
                return Err(LeagueError::RoundRules(violations));
            }

            let busy = round.matches.iter().any(|other| {
                other.id != match_id
                    && other.status.is_in_play()
                    && m.player_ids().any(|p| other.fields_player(p))
            });
            if busy {
                return Err(LeagueError::PlayerBusy);
            }
        }

        let round = self.editable_round(round_id)?;
        if let Some(m) = round.get_match_mut(match_id) {
            m.status = MatchStatus::InPlay {
                started_at: Utc::now(),
            };
        }
        Ok(())
    }

    /// InPlay -> Completed. The best of three must be decided.
    pub fn complete_match(
        &mut self,
        round_id: RoundId,
        match_id: MatchId,
    ) -> Result<(), LeagueError> {
        let round = self.editable_round(round_id)?;
        let m = round
            .get_match_mut(match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        let started_at = match m.status {
            MatchStatus::InPlay { started_at } => started_at,
            _ => return Err(LeagueError::MatchNotInPlay),
        };
        if m.winner.is_none() {
            return Err(LeagueError::NoWinner);
        }
        m.status = MatchStatus::Completed {
            started_at,
            completed_at: Utc::now(),
        };
        Ok(())
    }

    /// Building|InPlay -> Building: full rollback of games, winner, and
    /// status. Completed matches are locked.
    pub fn stop_match(&mut self, round_id: RoundId, match_id: MatchId) -> Result<(), LeagueError> {
        let round = self.editable_round(round_id)?;
        let m = round
            .get_match_mut(match_id)
            .ok_or(LeagueError::MatchNotFound(match_id))?;
        if m.status.is_completed() {
            return Err(LeagueError::MatchCompleted);
        }
        m.games.clear();
        m.winner = None;
        m.status = MatchStatus::Building;
        Ok(())
    }

    /// Mark a round completed (terminal, one-way). Requires at least one
    /// match, every match completed with a winner, and valid assignments.
    pub fn complete_round(&mut self, round_id: RoundId) -> Result<(), LeagueError> {
        let violations = {
            let round = self
                .round(round_id)
                .ok_or(LeagueError::RoundNotFound(round_id))?;
            if round.completed {
                return Err(LeagueError::RoundCompleted);
            }
            if round.matches.is_empty() {
                return Err(LeagueError::NoMatches);
            }
            let incomplete = round
                .matches
                .iter()
                .filter(|m| !m.status.is_completed() || m.winner.is_none())
                .count();
            if incomplete > 0 {
                return Err(LeagueError::IncompleteMatches { count: incomplete });
            }
            validate_round_player_assignments(
                round,
                &round.team1_lineup,
                &round.team2_lineup,
                &self.players,
            )
        };
        if !violations.is_empty() {
            return Err(LeagueError::RoundRules(violations));
        }
        let round = self.editable_round(round_id)?;
        round.completed = true;
        Ok(())
    }

    /// Recompute the sub-round split for a round on demand. Returns whether
    /// the stored arrangement changed.
    pub fn arrange_round_sub_rounds(&mut self, round_id: RoundId) -> Result<bool, LeagueError> {
        let round = self.editable_round(round_id)?;
        match arrange_sub_rounds(round) {
            Some(fresh) => {
                round.sub_rounds = Some(fresh);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Keep the stored sub-round split consistent after any change to a
    /// round's matches or assignments: refresh it, or drop it once the
    /// round stops being arrangeable.
    fn refresh_sub_rounds(round: &mut Round) {
        if let Some(fresh) = arrange_sub_rounds(round) {
            round.sub_rounds = Some(fresh);
        } else {
            let still_valid = round
                .sub_rounds
                .as_ref()
                .is_some_and(|sr| is_valid_arrangement(round, sr));
            if !still_valid {
                round.sub_rounds = None;
            }
        }
    }

    // --- derived views ---

    pub fn standings(&self) -> Vec<TeamStanding> {
        calculate_standings(&self.teams, &self.rounds)
    }

    pub fn head_to_head(&self) -> HashMap<TeamId, Vec<HeadToHeadStat>> {
        head_to_head_stats(&self.teams, &self.rounds)
    }
}
