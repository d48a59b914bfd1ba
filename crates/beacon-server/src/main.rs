use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use beacon_api::auth::{self, AppState, AppStateInner};
use beacon_api::middleware::{require_admin, require_user};
use beacon_api::session::SessionGate;
use beacon_api::{articles, credentials, dashboard, plans, profile, reports, resources, safety};
use beacon_db::Database;
use beacon_types::models::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("BEACON_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("BEACON_DB_PATH").unwrap_or_else(|_| "beacon.db".into());
    let host = std::env::var("BEACON_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("BEACON_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_email =
        std::env::var("BEACON_ADMIN_EMAIL").unwrap_or_else(|_| "admin@beacon.local".into());
    let admin_password =
        std::env::var("BEACON_ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".into());

    // Init database and seed the single admin account
    let db = Database::open(&PathBuf::from(&db_path))?;
    seed_admin(&db, &admin_email, &admin_password)?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        sessions: SessionGate::new(jwt_secret),
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/admin/login", post(auth::admin_login))
        .route("/auth/logout", post(auth::logout))
        .route("/articles", get(articles::list_articles))
        .route("/resources", get(resources::directory))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/home", get(dashboard::home))
        .route("/reports", get(reports::my_reports).post(reports::create_report))
        .route("/plans", get(plans::my_plans).post(plans::create_plan))
        .route("/safety", get(safety::my_history).post(safety::check_in))
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .layer(from_fn_with_state(state.clone(), require_user))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/dashboard", get(dashboard::admin_dashboard))
        .route("/admin/reports", get(reports::list_reports))
        .route("/admin/reports/{report_id}/verify", post(reports::verify_report))
        .route("/admin/reports/{report_id}/resolve", post(reports::resolve_report))
        .route(
            "/admin/resources",
            get(resources::recent_resources).post(resources::upsert_resource),
        )
        .layer(from_fn_with_state(state.clone(), require_admin))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Beacon server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Idempotent bootstrap: create the admin account once, on first start.
fn seed_admin(db: &Database, email: &str, password: &str) -> anyhow::Result<()> {
    let email = email.trim().to_lowercase();
    if db.get_user_by_email(&email)?.is_some() {
        return Ok(());
    }

    let password_hash = credentials::hash_password(password)?;
    db.create_user(
        &Uuid::new_v4().to_string(),
        &email,
        "Beacon Admin",
        None,
        None,
        Role::Admin,
        &password_hash,
    )?;

    info!("Seeded admin account {}", email);
    Ok(())
}
