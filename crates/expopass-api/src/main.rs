// ExpoPass API server
// Badge scanning backend: registration, check-in toggle, lead capture,
// matchmaking, and the live check-in feed.

mod attendees;
mod badges;
mod checkins;
mod events;
mod leads;
mod matchmaking;
mod notifications;
mod scans;
mod services;
mod settings;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use expopass_contracts::*;
use expopass_storage::Database;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    active_event: Option<String>,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    db: Arc<Database>,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    let active_event = state
        .db
        .get_app_settings()
        .await
        .ok()
        .and_then(|s| s.event_id)
        .map(|id| id.to_string());

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        active_event,
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        attendees::create_attendee,
        attendees::list_attendees,
        attendees::get_attendee,
        attendees::get_attendee_by_email,
        attendees::update_attendee,
        attendees::delete_attendee,
        attendees::reissue_badge,
        badges::get_badge,
        badges::delete_badge,
        badges::mark_printed,
        badges::mark_reprint,
        badges::bulk_status,
        scans::submit_scan,
        checkins::list_check_ins,
        checkins::stream_check_ins,
        checkins::attendee_history,
        leads::list_leads,
        leads::get_lead,
        leads::update_lead,
        matchmaking::recommend,
        matchmaking::list_matches,
        notifications::list_notifications,
        notifications::mark_read,
        events::create_event,
        events::list_events,
        events::get_event,
        events::daily_stats,
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            Attendee, CreateAttendeeRequest, UpdateAttendeeRequest,
            attendee::ScoreProfileDto,
            Badge, BulkBadgeStatusRequest, badges::BulkStatusResponse,
            CheckIn,
            Lead, UpdateLeadRequest,
            MatchRecord, RecommendRequest, Recommendation,
            Notification,
            ScanRequest, ScanOutcome, ScanAction, ScanErrorKind,
            UserCategory, CheckDirection, BadgeStatus, LeadStatus,
            events::Event, events::CreateEventRequest,
            DailyStat,
            AppSettings, UpdateSettingsRequest,
            ListResponse<Attendee>,
            ListResponse<CheckIn>,
            ListResponse<Lead>,
            ListResponse<MatchRecord>,
            ListResponse<Recommendation>,
            ListResponse<Notification>,
            ListResponse<events::Event>,
            ListResponse<DailyStat>,
        )
    ),
    tags(
        (name = "attendees", description = "Attendee registration and management"),
        (name = "badges", description = "Badge issuance and print workflow"),
        (name = "scans", description = "Badge scan resolution"),
        (name = "checkins", description = "Check-in feed (list and SSE)"),
        (name = "leads", description = "Exhibitor lead management"),
        (name = "matchmaking", description = "Attendee matchmaking"),
        (name = "notifications", description = "In-app notifications"),
        (name = "events", description = "Event registry and statistics"),
        (name = "settings", description = "Global app settings")
    ),
    info(
        title = "ExpoPass API",
        version = "0.1.0",
        description = "API for event badge scanning: check-ins, leads, and matchmaking",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expopass_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("expopass-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    let db = Arc::new(db);

    let settings = db
        .get_app_settings()
        .await
        .context("Failed to load app settings")?;
    match settings.event_id {
        Some(event_id) => tracing::info!(%event_id, "Active event configured"),
        None => tracing::warn!("No active event configured; scans must pass event_id explicitly"),
    }

    // Create module-specific states
    let attendees_state = attendees::AppState::new(db.clone());
    let badges_state = badges::AppState { db: db.clone() };
    let scans_state = scans::AppState::new(db.clone());
    let checkins_state = checkins::AppState { db: db.clone() };
    let leads_state = leads::AppState { db: db.clone() };
    let matchmaking_state = matchmaking::AppState::new(db.clone());
    let notifications_state = notifications::AppState { db: db.clone() };
    let events_state = events::AppState { db: db.clone() };
    let settings_state = settings::AppState { db: db.clone() };
    let health_state = HealthState { db: db.clone() };

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/attendees
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when the UI is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(attendees::routes(attendees_state))
        .merge(badges::routes(badges_state))
        .merge(scans::routes(scans_state))
        .merge(checkins::routes(checkins_state))
        .merge(leads::routes(leads_state))
        .merge(matchmaking::routes(matchmaking_state))
        .merge(notifications::routes(notifications_state))
        .merge(events::routes(events_state))
        .merge(settings::routes(settings_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health).with_state(health_state));

    // Apply API prefix if configured
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = "0.0.0.0:8080";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/v1/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
