//! Single binary web server: JSON API for dual meets.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, MEET_IDLE_HOURS (meets idle this long are dropped, default 12).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use wrestling_meet_web::{
    add_points, assign_bout_wrestler, complete_bout, compute_bout_order, forfeit_bout,
    import_roster_csv, pause_clock, reset_clock, start_bout, start_clock, start_meet, BoutId,
    ChoiceParity, DualMeet, MeetId, MeetStore, MemoryStore, Side, StoreError, WeightClass, WinType,
    WrestlerId,
};

type AppState = Data<MeetStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateMeetBody {
    name: String,
    home_team: String,
    away_team: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    weight_classes: Option<Vec<WeightClass>>,
    #[serde(default)]
    weigh_in_allowance: Option<f64>,
}

#[derive(Deserialize)]
struct BoutOrderBody {
    weight_classes: Vec<WeightClass>,
    starting_weight_class: WeightClass,
    #[serde(default)]
    home_choice: ChoiceParity,
}

#[derive(Deserialize)]
struct WeightClassesBody {
    weight_classes: Vec<WeightClass>,
}

#[derive(Deserialize)]
struct ScheduleBody {
    #[serde(default)]
    starting_weight_class: Option<WeightClass>,
    #[serde(default)]
    home_choice: Option<ChoiceParity>,
    #[serde(default)]
    weigh_in_allowance: Option<f64>,
}

#[derive(Deserialize)]
struct AddWrestlerBody {
    first_name: String,
    last_name: String,
    #[serde(default)]
    weight_class: Option<WeightClass>,
    #[serde(default)]
    grade: Option<u8>,
}

#[derive(Deserialize)]
struct WrestlerWeightClassBody {
    weight_class: Option<WeightClass>,
}

#[derive(Deserialize)]
struct WeighInBody {
    weight: f64,
}

#[derive(Deserialize)]
struct AssignWrestlerBody {
    side: Side,
    wrestler_id: Option<WrestlerId>,
}

#[derive(Deserialize)]
struct PointsBody {
    side: Side,
    points: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ClockAction {
    Start,
    Pause,
    Reset,
}

#[derive(Deserialize)]
struct ClockBody {
    action: ClockAction,
}

#[derive(Deserialize)]
struct CompleteBoutBody {
    winner: Side,
    win_type: WinType,
}

/// Path segment: meet id (e.g. /api/meets/{id})
#[derive(Deserialize)]
struct MeetPath {
    id: MeetId,
}

/// Path segments: meet id and team side (e.g. /api/meets/{id}/teams/home)
#[derive(Deserialize)]
struct MeetSidePath {
    id: MeetId,
    side: Side,
}

#[derive(Deserialize)]
struct MeetWrestlerPath {
    id: MeetId,
    wrestler_id: Uuid,
}

#[derive(Deserialize)]
struct MeetBoutPath {
    id: MeetId,
    bout_id: BoutId,
}

fn error_response(e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No meet" })),
        StoreError::Meet(e) => {
            log::debug!("Rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        StoreError::Serialization(_) | StoreError::Lock => {
            log::warn!("Store failure: {}", e);
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Apply a change to a stored meet and answer with the updated meet.
fn update_meet<T>(
    store: &MeetStore,
    id: MeetId,
    f: impl FnOnce(&mut DualMeet) -> Result<T, wrestling_meet_web::MeetError>,
) -> HttpResponse {
    match store.update(id, f) {
        Ok((meet, _)) => HttpResponse::Ok().json(meet),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "wrestling-meet-web",
    })
}

/// Stateless bout order computation (no meet needed; cheap enough to call per keystroke).
#[post("/api/bout-order")]
async fn api_compute_bout_order(body: Json<BoutOrderBody>) -> HttpResponse {
    match compute_bout_order(&body.weight_classes, body.starting_weight_class, body.home_choice) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Create a new meet (returns it with id; client stores id for subsequent requests).
#[post("/api/meets")]
async fn api_create_meet(store: AppState, body: Json<CreateMeetBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut meet = DualMeet::new(body.name.trim(), body.home_team.trim(), body.away_team.trim());
    meet.date = body.date;
    let configured = body
        .weight_classes
        .as_deref()
        .map_or(Ok(()), |w| meet.set_weight_classes(w))
        .and_then(|()| {
            body.weigh_in_allowance
                .map_or(Ok(()), |a| meet.set_weigh_in_allowance(a))
        });
    if let Err(e) = configured {
        return error_response(e.into());
    }
    if let Err(e) = store.save(&meet) {
        return error_response(e);
    }
    log::info!("Created meet {} ({} vs {})", meet.id, meet.home_team.name, meet.away_team.name);
    HttpResponse::Ok().json(meet)
}

/// Get a meet by id (404 if not found). Reading it refreshes its activity time.
#[get("/api/meets/{id}")]
async fn api_get_meet(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    match store.load(path.id) {
        Ok(meet) => HttpResponse::Ok().json(meet),
        Err(e) => error_response(e),
    }
}

#[delete("/api/meets/{id}")]
async fn api_delete_meet(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    match store.delete(path.id) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => error_response(StoreError::NotFound(path.id)),
        Err(e) => error_response(e),
    }
}

/// Replace the weight classes (Setup only).
#[put("/api/meets/{id}/weight-classes")]
async fn api_set_weight_classes(store: AppState, path: Path<MeetPath>, body: Json<WeightClassesBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| m.set_weight_classes(&body.weight_classes))
}

/// Update starting weight class, home choice parity, and weigh-in allowance (Setup only).
#[put("/api/meets/{id}/schedule")]
async fn api_set_schedule(store: AppState, path: Path<MeetPath>, body: Json<ScheduleBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| {
        if let Some(w) = body.starting_weight_class {
            m.set_starting_weight_class(w)?;
        }
        if let Some(parity) = body.home_choice {
            m.set_home_choice(parity)?;
        }
        if let Some(allowance) = body.weigh_in_allowance {
            m.set_weigh_in_allowance(allowance)?;
        }
        Ok(())
    })
}

/// Draw a random starting weight class (Setup only).
#[post("/api/meets/{id}/schedule/draw")]
async fn api_draw_starting_weight(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    update_meet(&store, path.id, |m| m.draw_starting_weight_class(&mut rand::thread_rng()))
}

/// Bout order preview for the meet's current settings.
#[get("/api/meets/{id}/bout-order")]
async fn api_meet_bout_order(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    match store.load(path.id).and_then(|m| m.bout_order().map_err(StoreError::from)) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(e) => error_response(e),
    }
}

/// Potential matches at each weight class (preview only).
#[get("/api/meets/{id}/pairings")]
async fn api_pairings(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    match store.load(path.id) {
        Ok(meet) => HttpResponse::Ok().json(meet.pairings()),
        Err(e) => error_response(e),
    }
}

/// Add a wrestler to a roster (Setup only).
#[post("/api/meets/{id}/teams/{side}/wrestlers")]
async fn api_add_wrestler(store: AppState, path: Path<MeetSidePath>, body: Json<AddWrestlerBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| {
        m.add_wrestler(path.side, &body.first_name, &body.last_name, body.weight_class, body.grade)
    })
}

/// Import a roster from a CSV body (Setup only, all-or-nothing).
#[post("/api/meets/{id}/teams/{side}/roster")]
async fn api_import_roster(store: AppState, path: Path<MeetSidePath>, body: String) -> HttpResponse {
    update_meet(&store, path.id, |m| import_roster_csv(m, path.side, body.as_bytes()))
}

/// Remove a wrestler (Setup only).
#[delete("/api/meets/{id}/wrestlers/{wrestler_id}")]
async fn api_remove_wrestler(store: AppState, path: Path<MeetWrestlerPath>) -> HttpResponse {
    update_meet(&store, path.id, |m| m.remove_wrestler(path.wrestler_id))
}

#[put("/api/meets/{id}/wrestlers/{wrestler_id}/weight-class")]
async fn api_set_wrestler_weight_class(
    store: AppState,
    path: Path<MeetWrestlerPath>,
    body: Json<WrestlerWeightClassBody>,
) -> HttpResponse {
    update_meet(&store, path.id, |m| m.set_wrestler_weight_class(path.wrestler_id, body.weight_class))
}

/// Record a weigh-in (Setup only).
#[put("/api/meets/{id}/wrestlers/{wrestler_id}/weigh-in")]
async fn api_weigh_in(store: AppState, path: Path<MeetWrestlerPath>, body: Json<WeighInBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| {
        m.record_weigh_in(path.wrestler_id, body.weight, Utc::now()).map(|_| ())
    })
}

/// Start the meet: generate bouts (Setup -> InProgress).
#[post("/api/meets/{id}/start")]
async fn api_start_meet(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    update_meet(&store, path.id, start_meet)
}

/// Restart: back to Setup with rosters kept.
#[post("/api/meets/{id}/restart")]
async fn api_restart_meet(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    update_meet(&store, path.id, DualMeet::restart)
}

#[get("/api/meets/{id}/scores")]
async fn api_team_scores(store: AppState, path: Path<MeetPath>) -> HttpResponse {
    match store.load(path.id) {
        Ok(meet) => HttpResponse::Ok().json(meet.team_scores()),
        Err(e) => error_response(e),
    }
}

/// Change who wrestles in one corner of a pending bout.
#[put("/api/meets/{id}/bouts/{bout_id}/wrestlers")]
async fn api_assign_bout_wrestler(
    store: AppState,
    path: Path<MeetBoutPath>,
    body: Json<AssignWrestlerBody>,
) -> HttpResponse {
    update_meet(&store, path.id, |m| assign_bout_wrestler(m, path.bout_id, body.side, body.wrestler_id))
}

#[post("/api/meets/{id}/bouts/{bout_id}/start")]
async fn api_start_bout(store: AppState, path: Path<MeetBoutPath>) -> HttpResponse {
    update_meet(&store, path.id, |m| start_bout(m, path.bout_id, Utc::now()))
}

#[post("/api/meets/{id}/bouts/{bout_id}/points")]
async fn api_add_points(store: AppState, path: Path<MeetBoutPath>, body: Json<PointsBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| add_points(m, path.bout_id, body.side, body.points))
}

/// Start, pause, or reset the bout clock.
#[post("/api/meets/{id}/bouts/{bout_id}/clock")]
async fn api_bout_clock(store: AppState, path: Path<MeetBoutPath>, body: Json<ClockBody>) -> HttpResponse {
    update_meet(&store, path.id, |m| match body.action {
        ClockAction::Start => start_clock(m, path.bout_id, Utc::now()),
        ClockAction::Pause => pause_clock(m, path.bout_id, Utc::now()),
        ClockAction::Reset => reset_clock(m, path.bout_id),
    })
}

#[post("/api/meets/{id}/bouts/{bout_id}/complete")]
async fn api_complete_bout(
    store: AppState,
    path: Path<MeetBoutPath>,
    body: Json<CompleteBoutBody>,
) -> HttpResponse {
    update_meet(&store, path.id, |m| {
        complete_bout(m, path.bout_id, body.winner, body.win_type, Utc::now())
    })
}

/// Settle a bout with an open corner by forfeit.
#[post("/api/meets/{id}/bouts/{bout_id}/forfeit")]
async fn api_forfeit_bout(store: AppState, path: Path<MeetBoutPath>) -> HttpResponse {
    update_meet(&store, path.id, |m| forfeit_bout(m, path.bout_id, Utc::now()))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_idle_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let idle_hours: u64 = std::env::var("MEET_IDLE_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_idle_hours);
    let max_idle = Duration::from_secs(idle_hours.saturating_mul(3600));
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Data::new(MeetStore::new(Arc::new(MemoryStore::new())));

    // Background task: every 30 minutes, drop meets idle for longer than MEET_IDLE_HOURS
    let store_cleanup = store.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = store_cleanup.purge_idle(max_idle);
            if removed > 0 {
                log::info!("Cleaned up {} inactive meet(s) (no activity for {}h)", removed, idle_hours);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .service(api_health)
            .service(api_compute_bout_order)
            .service(api_create_meet)
            .service(api_get_meet)
            .service(api_delete_meet)
            .service(api_set_weight_classes)
            .service(api_set_schedule)
            .service(api_draw_starting_weight)
            .service(api_meet_bout_order)
            .service(api_pairings)
            .service(api_add_wrestler)
            .service(api_import_roster)
            .service(api_remove_wrestler)
            .service(api_set_wrestler_weight_class)
            .service(api_weigh_in)
            .service(api_start_meet)
            .service(api_restart_meet)
            .service(api_team_scores)
            .service(api_assign_bout_wrestler)
            .service(api_start_bout)
            .service(api_add_points)
            .service(api_bout_clock)
            .service(api_complete_bout)
            .service(api_forfeit_bout)
    })
    .bind(bind)?
    .run()
    .await
}
