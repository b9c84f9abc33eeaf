//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), ADMIN_TOKEN (admin login).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use badminton_league_web::{
    Gender, League, LeagueError, Level, MatchId, MatchType, PlayerId, RoundId, Side, TeamId,
};
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state: the single league, shared across workers.
type AppState = Data<RwLock<League>>;

/// Session flag set after a successful admin login.
const ADMIN_SESSION_KEY: &str = "is_admin";

/// Admin token the login endpoint compares against (from env).
struct AdminConfig {
    token: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
}

#[derive(Deserialize)]
struct PlayerBody {
    name: String,
    gender: Gender,
    level: Level,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct TeamPlayerBody {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct MovePlayerBody {
    to_team_id: TeamId,
}

#[derive(Deserialize)]
struct CreateRoundBody {
    name: String,
    team1_id: TeamId,
    team2_id: TeamId,
}

#[derive(Deserialize)]
struct LineupBody {
    side: Side,
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct AddMatchBody {
    #[serde(rename = "type")]
    kind: MatchType,
}

#[derive(Deserialize)]
struct MatchPlayerBody {
    side: Side,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct GameScoreBody {
    team1_score: i32,
    team2_score: i32,
}

/// One row of a CSV roster import: name,gender,level.
#[derive(Deserialize)]
struct PlayerImportRecord {
    name: String,
    gender: Gender,
    level: Level,
}

#[derive(serde::Serialize)]
struct ImportResponse {
    imported: usize,
    errors: Vec<String>,
}

/// Path segment: round id (e.g. /api/rounds/{id})
#[derive(Deserialize)]
struct RoundPath {
    id: RoundId,
}

/// Path segments: round id and match id (e.g. /api/rounds/{id}/matches/{match_id})
#[derive(Deserialize)]
struct RoundMatchPath {
    id: RoundId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct RoundMatchPlayerPath {
    id: RoundId,
    match_id: MatchId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct RoundMatchGamePath {
    id: RoundId,
    match_id: MatchId,
    game_index: usize,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TeamId,
}

#[derive(Deserialize)]
struct TeamPlayerPath {
    id: TeamId,
    player_id: PlayerId,
}

fn is_admin(session: &Session) -> bool {
    session
        .get::<bool>(ADMIN_SESSION_KEY)
        .ok()
        .flatten()
        .unwrap_or(false)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Unauthorized" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Map engine errors: unknown ids to 404, everything else to 400 with the
/// display message the validators produced.
fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::PlayerNotFound(_)
        | LeagueError::TeamNotFound(_)
        | LeagueError::RoundNotFound(_)
        | LeagueError::MatchNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "badminton-league-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Exchange the admin token for a session cookie.
#[post("/api/auth/login")]
async fn api_login(
    session: Session,
    config: Data<AdminConfig>,
    body: Json<LoginBody>,
) -> HttpResponse {
    if body.token != config.token {
        return unauthorized();
    }
    if session.insert(ADMIN_SESSION_KEY, true).is_err() {
        return HttpResponse::InternalServerError().body("session error");
    }
    HttpResponse::Ok().json(serde_json::json!({ "is_admin": true }))
}

#[post("/api/auth/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "is_admin": false }))
}

#[get("/api/auth/me")]
async fn api_auth_me(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "is_admin": is_admin(&session) }))
}

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.players)
}

#[post("/api/players")]
async fn api_add_player(state: AppState, session: Session, body: Json<PlayerBody>) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_player(body.name.trim(), body.gender, body.level) {
        Ok(_) => HttpResponse::Ok().json(&g.players),
        Err(e) => error_response(&e),
    }
}

#[put("/api/players/{id}")]
async fn api_update_player(
    state: AppState,
    session: Session,
    path: Path<PlayerPath>,
    body: Json<PlayerBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.update_player(path.id, body.name.trim(), body.gender, body.level) {
        Ok(()) => HttpResponse::Ok().json(&g.players),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, session: Session, path: Path<PlayerPath>) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_player(path.id) {
        Ok(()) => HttpResponse::Ok().json(&*g),
        Err(e) => error_response(&e),
    }
}

/// Bulk roster import: CSV body with a name,gender,level header. Rows that
/// fail validation are reported individually; valid rows still land.
#[post("/api/players/import")]
async fn api_import_players(state: AppState, session: Session, body: String) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };

    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut imported = 0;
    let mut errors = Vec::new();
    for (row, record) in reader.deserialize::<PlayerImportRecord>().enumerate() {
        let line = row + 2; // header is line 1
        match record {
            Ok(rec) => match g.add_player(rec.name.trim(), rec.gender, rec.level) {
                Ok(_) => imported += 1,
                Err(e) => errors.push(format!("line {line}: {e}")),
            },
            Err(e) => errors.push(format!("line {line}: {e}")),
        }
    }
    log::info!("CSV import: {} player(s) added, {} rejected", imported, errors.len());
    HttpResponse::Ok().json(ImportResponse { imported, errors })
}

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.teams)
}

#[post("/api/teams")]
async fn api_create_team(state: AppState, session: Session, body: Json<NameBody>) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.create_team(body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

#[put("/api/teams/{id}")]
async fn api_rename_team(
    state: AppState,
    session: Session,
    path: Path<TeamPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.rename_team(path.id, body.name.trim()) {
        Ok(()) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, session: Session, path: Path<TeamPath>) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_team(path.id) {
        Ok(()) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

#[post("/api/teams/{id}/players")]
async fn api_team_add_player(
    state: AppState,
    session: Session,
    path: Path<TeamPath>,
    body: Json<TeamPlayerBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_player_to_team(path.id, body.player_id) {
        Ok(()) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/teams/{id}/players/{player_id}")]
async fn api_team_remove_player(
    state: AppState,
    session: Session,
    path: Path<TeamPlayerPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_player_from_team(path.id, path.player_id) {
        Ok(()) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

/// Move a player between teams (drag-and-drop in the UI).
#[post("/api/players/{id}/move")]
async fn api_move_player(
    state: AppState,
    session: Session,
    path: Path<PlayerPath>,
    body: Json<MovePlayerBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.move_player(path.id, body.to_team_id) {
        Ok(()) => HttpResponse::Ok().json(&g.teams),
        Err(e) => error_response(&e),
    }
}

#[get("/api/rounds")]
async fn api_list_rounds(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.rounds)
}

#[post("/api/rounds")]
async fn api_create_round(
    state: AppState,
    session: Session,
    body: Json<CreateRoundBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.create_round(body.name.trim(), body.team1_id, body.team2_id) {
        Ok(_) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/rounds/{id}")]
async fn api_delete_round(state: AppState, session: Session, path: Path<RoundPath>) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.delete_round(path.id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[put("/api/rounds/{id}/lineup")]
async fn api_set_lineup(
    state: AppState,
    session: Session,
    path: Path<RoundPath>,
    body: Json<LineupBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.set_round_lineup(path.id, body.side, body.player_ids.clone()) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[post("/api/rounds/{id}/matches")]
async fn api_add_match(
    state: AppState,
    session: Session,
    path: Path<RoundPath>,
    body: Json<AddMatchBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_match_to_round(path.id, body.kind) {
        Ok(_) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/rounds/{id}/matches/{match_id}")]
async fn api_remove_match(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_match_from_round(path.id, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

/// Assign a player to a match side. Gender eligibility and round-wide
/// rules are enforced before anything is stored.
#[post("/api/rounds/{id}/matches/{match_id}/players")]
async fn api_match_add_player(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPath>,
    body: Json<MatchPlayerBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.add_player_to_match(path.id, path.match_id, body.side, body.player_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/rounds/{id}/matches/{match_id}/players/{player_id}")]
async fn api_match_remove_player(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPlayerPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.remove_player_from_match(path.id, path.match_id, path.player_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

/// Record one game's score (validated on every edit).
#[put("/api/rounds/{id}/matches/{match_id}/games/{game_index}")]
async fn api_set_game_score(
    state: AppState,
    session: Session,
    path: Path<RoundMatchGamePath>,
    body: Json<GameScoreBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.update_game_score(
        path.id,
        path.match_id,
        path.game_index,
        body.team1_score,
        body.team2_score,
    ) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[post("/api/rounds/{id}/matches/{match_id}/start")]
async fn api_start_match(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.start_match(path.id, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[post("/api/rounds/{id}/matches/{match_id}/complete")]
async fn api_complete_match(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.complete_match(path.id, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

/// Roll a match back to Building, clearing games and winner.
#[post("/api/rounds/{id}/matches/{match_id}/stop")]
async fn api_stop_match(
    state: AppState,
    session: Session,
    path: Path<RoundMatchPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.stop_match(path.id, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(&g.rounds),
        Err(e) => error_response(&e),
    }
}

#[post("/api/rounds/{id}/complete")]
async fn api_complete_round(
    state: AppState,
    session: Session,
    path: Path<RoundPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.complete_round(path.id) {
        Ok(()) => {
            log::info!("Round {} completed", path.id);
            HttpResponse::Ok().json(&g.rounds)
        }
        Err(e) => error_response(&e),
    }
}

/// Recompute the two conflict-free sub-round groups for a six-match round.
#[post("/api/rounds/{id}/sub-rounds/arrange")]
async fn api_arrange_sub_rounds(
    state: AppState,
    session: Session,
    path: Path<RoundPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.arrange_round_sub_rounds(path.id) {
        Ok(changed) => {
            if changed {
                log::info!("Sub-rounds rearranged for round {}", path.id);
            }
            HttpResponse::Ok().json(&g.rounds)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/standings")]
async fn api_standings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.standings())
}

#[get("/api/standings/head-to-head")]
async fn api_head_to_head(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.head_to_head())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let admin_token = std::env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin".to_string());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(League::new()));
    let config = Data::new(AdminConfig { token: admin_token });
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_login)
            .service(api_logout)
            .service(api_auth_me)
            .service(api_list_players)
            .service(api_add_player)
            .service(api_update_player)
            .service(api_delete_player)
            .service(api_import_players)
            .service(api_move_player)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_rename_team)
            .service(api_delete_team)
            .service(api_team_add_player)
            .service(api_team_remove_player)
            .service(api_list_rounds)
            .service(api_create_round)
            .service(api_delete_round)
            .service(api_set_lineup)
            .service(api_add_match)
            .service(api_remove_match)
            .service(api_match_add_player)
            .service(api_match_remove_player)
            .service(api_set_game_score)
            .service(api_start_match)
            .service(api_complete_match)
            .service(api_stop_match)
            .service(api_complete_round)
            .service(api_arrange_sub_rounds)
            .service(api_standings)
            .service(api_head_to_head)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
