//! Single binary web server: the admin page at `/`, HTML fragments under
//! `/fragments`, and the panel actions as a JSON API under `/api`.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! ADMIN_STORE (local | document), ADMIN_DATA_DIR, ADMIN_PAGE_SIZE, ADMIN_SEED.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tournament_admin::config::{AppConfig, StoreBackend};
use tournament_admin::store::{readiness, FileStorage, MemoryCollection};
use tournament_admin::{
    AdminPanel, DocumentStore, FormFields, LocalStore, PanelError, RecordId, RecordStore, Section,
    StoreError, SubmitOutcome,
};

type AppState = Data<AdminPanel>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    backend: &'static str,
}

#[derive(Deserialize)]
struct SectionBody {
    section: Section,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct PageBody {
    page: usize,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id}/delete)
#[derive(Deserialize)]
struct TournamentPath {
    id: String,
}

#[derive(Deserialize)]
struct NotificationPath {
    id: u64,
}

fn error_response(e: &PanelError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        PanelError::Validation(_) => HttpResponse::BadRequest().json(body),
        PanelError::Store(StoreError::NotFound(_)) => HttpResponse::NotFound().json(body),
        PanelError::Store(_) => HttpResponse::BadGateway().json(body),
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/api/health")]
async fn api_health(state: AppState) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-admin",
        backend: state.backend(),
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[get("/")]
async fn index(state: AppState) -> HttpResponse {
    html(state.render_page(Instant::now()))
}

#[get("/api/dashboard")]
async fn api_dashboard(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard())
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.listing())
}

/// Reload the collection from the store.
#[post("/api/tournaments/reload")]
async fn api_reload(state: AppState) -> HttpResponse {
    match state.refresh().await {
        Ok(()) => HttpResponse::Ok().json(state.listing()),
        Err(e) => error_response(&PanelError::from(e)),
    }
}

/// Switch between dashboard and tournaments. Stats are recomputed on read.
#[put("/api/section")]
async fn api_show_section(state: AppState, body: Json<SectionBody>) -> HttpResponse {
    state.show_section(body.section);
    match body.section {
        Section::Dashboard => HttpResponse::Ok().json(state.dashboard()),
        Section::Tournaments => HttpResponse::Ok().json(state.listing()),
    }
}

/// Search text; resets to page 1.
#[put("/api/view/search")]
async fn api_search(state: AppState, body: Json<SearchBody>) -> HttpResponse {
    state.set_query(&body.query);
    HttpResponse::Ok().json(state.listing())
}

/// Status filter ("" for all); resets to page 1.
#[put("/api/view/status")]
async fn api_status_filter(state: AppState, body: Json<StatusBody>) -> HttpResponse {
    state.set_status_filter(&body.status);
    HttpResponse::Ok().json(state.listing())
}

#[put("/api/view/page")]
async fn api_go_to_page(state: AppState, body: Json<PageBody>) -> HttpResponse {
    state.go_to_page(body.page);
    HttpResponse::Ok().json(state.listing())
}

#[post("/api/view/next")]
async fn api_next_page(state: AppState) -> HttpResponse {
    state.next_page();
    HttpResponse::Ok().json(state.listing())
}

#[post("/api/view/prev")]
async fn api_prev_page(state: AppState) -> HttpResponse {
    state.prev_page();
    HttpResponse::Ok().json(state.listing())
}

#[post("/api/form/create")]
async fn api_form_create(state: AppState) -> HttpResponse {
    state.open_create();
    HttpResponse::Ok().json(state.form())
}

/// Open the form bound to a record. Unknown ids leave the form as it was.
#[post("/api/form/edit/{id}")]
async fn api_form_edit(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = RecordId::from(path.id.as_str());
    state.open_edit(&id);
    HttpResponse::Ok().json(state.form())
}

#[post("/api/form/close")]
async fn api_form_close(state: AppState) -> HttpResponse {
    state.close_form();
    HttpResponse::Ok().json(state.form())
}

/// Live prize-split check while typing.
#[post("/api/form/prizes")]
async fn api_form_prizes(state: AppState, body: Json<FormFields>) -> HttpResponse {
    HttpResponse::Ok().json(state.update_fields(body.into_inner()))
}

#[post("/api/form/submit")]
async fn api_form_submit(state: AppState, body: Json<FormFields>) -> HttpResponse {
    match state.submit_form(body.into_inner()).await {
        Ok(SubmitOutcome::Created(t)) => HttpResponse::Created().json(t),
        Ok(SubmitOutcome::Updated(t)) => HttpResponse::Ok().json(t),
        Ok(SubmitOutcome::Ignored) => HttpResponse::Accepted().json(state.form()),
        Err(e) => error_response(&e),
    }
}

/// Open the delete confirmation for a record.
#[post("/api/tournaments/{id}/delete")]
async fn api_request_delete(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = RecordId::from(path.id.as_str());
    let open = state.request_delete(&id);
    HttpResponse::Ok().json(serde_json::json!({
        "open": open,
        "prompt": state.confirm_prompt().map(|(title, message)| {
            serde_json::json!({ "title": title, "message": message })
        }),
    }))
}

#[post("/api/confirm/accept")]
async fn api_confirm_accept(state: AppState) -> HttpResponse {
    match state.confirm_accept().await {
        Ok(ran) => HttpResponse::Ok().json(serde_json::json!({ "ran": ran, "listing": state.listing() })),
        Err(e) => error_response(&e),
    }
}

#[post("/api/confirm/cancel")]
async fn api_confirm_cancel(state: AppState) -> HttpResponse {
    state.confirm_cancel();
    HttpResponse::NoContent().finish()
}

#[get("/api/notifications")]
async fn api_notifications(state: AppState) -> HttpResponse {
    let now = Instant::now();
    let items: Vec<_> = state
        .notifications(now)
        .into_iter()
        .map(|n| {
            serde_json::json!({
                "id": n.id,
                "severity": n.severity,
                "message": n.message,
                "phase": n.phase(now),
            })
        })
        .collect();
    HttpResponse::Ok().json(items)
}

#[delete("/api/notifications/{id}")]
async fn api_dismiss_notification(state: AppState, path: Path<NotificationPath>) -> HttpResponse {
    if state.dismiss_notification(path.id) {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(serde_json::json!({ "error": "No notification" }))
    }
}

#[get("/fragments/grid")]
async fn fragment_grid(state: AppState) -> HttpResponse {
    html(state.render_grid())
}

#[get("/fragments/pagination")]
async fn fragment_pagination(state: AppState) -> HttpResponse {
    html(state.render_pagination())
}

#[get("/fragments/dashboard")]
async fn fragment_dashboard(state: AppState) -> HttpResponse {
    html(state.render_dashboard())
}

#[get("/fragments/form")]
async fn fragment_form(state: AppState) -> HttpResponse {
    html(state.render_form())
}

#[get("/fragments/confirm")]
async fn fragment_confirm(state: AppState) -> HttpResponse {
    html(state.render_confirm())
}

#[get("/fragments/notifications")]
async fn fragment_notifications(state: AppState) -> HttpResponse {
    html(state.render_notifications(Instant::now()))
}

fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(index)
        .service(api_health)
        .service(favicon)
        .service(api_dashboard)
        .service(api_list_tournaments)
        .service(api_reload)
        .service(api_show_section)
        .service(api_search)
        .service(api_status_filter)
        .service(api_go_to_page)
        .service(api_next_page)
        .service(api_prev_page)
        .service(api_form_create)
        .service(api_form_edit)
        .service(api_form_close)
        .service(api_form_prizes)
        .service(api_form_submit)
        .service(api_request_delete)
        .service(api_confirm_accept)
        .service(api_confirm_cancel)
        .service(api_notifications)
        .service(api_dismiss_notification)
        .service(fragment_grid)
        .service(fragment_pagination)
        .service(fragment_dashboard)
        .service(fragment_form)
        .service(fragment_confirm)
        .service(fragment_notifications);
}

async fn build_store(config: &AppConfig) -> std::io::Result<Arc<dyn RecordStore>> {
    match config.backend {
        StoreBackend::Local => {
            log::info!("Using local storage in {}", config.data_dir.display());
            let storage = FileStorage::new(&config.data_dir);
            Ok(Arc::new(LocalStore::new(storage).seeded(config.seed)))
        }
        StoreBackend::Document => {
            let (notifier, ready) = readiness();
            actix_web::rt::spawn(async move {
                if !notifier.ready(MemoryCollection::new()) {
                    log::warn!("Document backend initialized but nobody was waiting");
                }
            });
            let store = DocumentStore::connect(ready)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = build_store(&config).await?;
    let panel = AdminPanel::new(store, config.page_size);
    panel.start().await;
    let state = Data::new(panel);

    // Background task: drop notifications whose exit transition has finished
    let state_sweep = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            state_sweep.sweep_notifications(Instant::now());
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use tournament_admin::store::MemoryStorage;

    fn panel() -> Data<AdminPanel> {
        let store = LocalStore::new(MemoryStorage::new());
        Data::new(AdminPanel::new(Arc::new(store), 6))
    }

    fn fields(title: &str, prizes: (&str, &str, &str)) -> FormFields {
        FormFields {
            title: title.into(),
            subtitle: "Sub".into(),
            start_date: "2024-11-15T10:00".into(),
            duration: "3".into(),
            prize_pool: "10000".into(),
            max_participants: "100".into(),
            difficulty: "Easy".into(),
            language: "Rust".into(),
            description: "desc".into(),
            rules: "a\nb".into(),
            first_prize: prizes.0.into(),
            second_prize: prizes.1.into(),
            third_prize: prizes.2.into(),
        }
    }

    #[actix_web::test]
    async fn health_reports_backend() {
        let state = panel();
        state.start().await;
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["backend"], "local");
    }

    #[actix_web::test]
    async fn submit_creates_and_invalid_prizes_are_rejected() {
        let state = panel();
        state.start().await;
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/form/create").to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/api/form/submit")
            .set_json(fields("Bad split", ("50", "30", "10")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/form/submit")
            .set_json(fields("Rust Cup", ("50", "30", "20")))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/fragments/grid").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("Rust Cup"));
        assert!(text.contains("$5,000"));
    }

    #[actix_web::test]
    async fn delete_goes_through_confirmation() {
        let state = panel();
        state.start().await;
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;
        let before = state.records().len();
        let id = state.records()[0].id.to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{}/delete", id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["open"], true);

        let req = test::TestRequest::post().uri("/api/confirm/accept").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ran"], true);
        assert_eq!(state.records().len(), before - 1);
    }
}
