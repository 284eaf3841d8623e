use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use devhub_rust::archmodel::{self, ModelState};
use devhub_rust::bugs::{self, BugState};
use devhub_rust::clients::{AuthClient, CalendarClient, ForumClient};
use devhub_rust::config::AppConfig;
use devhub_rust::forum::{self, ForumState};
use devhub_rust::reviews::{self, ReviewState};
use devhub_rust::store::PostgresStore;
use devhub_rust::vcs::{self, GitBackend, VcsState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("DevHub: developer collaboration services");

    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: host={}, services on ports {}-{}",
        config.server.host, config.server.bugs_port, config.server.vcs_port
    );

    println!("Connecting to PostgreSQL...");
    let database_url = config.database_url()?;
    let max_connections = config.database.max_connections.unwrap_or(20);
    let postgres_store =
        PostgresStore::with_max_connections(&database_url, max_connections).await?;

    println!("Running database migrations...");
    postgres_store.migrate().await?;
    println!("Database ready");

    let store = Arc::new(postgres_store);

    let calendar = CalendarClient::new(config.services.calendar_url.clone());
    let auth = AuthClient::new(config.services.auth_url.clone());
    let forum_client = ForumClient::new(config.services.forum_url.clone());

    // Browser clients call the services directly, so CORS stays permissive.
    let bugs_app = bugs::create_router::<PostgresStore>()
        .with_state(BugState {
            store: Arc::clone(&store),
            calendar: calendar.clone(),
            forum: forum_client,
        })
        .layer(CorsLayer::permissive());

    let reviews_app = reviews::create_router::<PostgresStore>()
        .with_state(ReviewState {
            store: Arc::clone(&store),
            calendar: calendar.clone(),
            auth,
        })
        .layer(CorsLayer::permissive());

    let models_app = archmodel::create_router()
        .with_state(ModelState::new())
        .layer(CorsLayer::permissive());

    let forum_app = forum::create_router::<PostgresStore>()
        .with_state(ForumState {
            store: Arc::clone(&store),
            calendar,
        })
        .layer(CorsLayer::permissive());

    let repos_dir = PathBuf::from(&config.vcs.repos_dir);
    std::fs::create_dir_all(&repos_dir)?;
    let vcs_app = vcs::create_router()
        .with_state(VcsState {
            backend: GitBackend::new(repos_dir),
        })
        .layer(CorsLayer::permissive());

    tokio::try_join!(
        serve_on(config.bugs_address(), bugs_app, "bug tracker"),
        serve_on(config.reviews_address(), reviews_app, "code review"),
        serve_on(config.models_address(), models_app, "architectural models"),
        serve_on(config.forum_address(), forum_app, "forum"),
        serve_on(config.vcs_address(), vcs_app, "version control"),
    )?;

    Ok(())
}

async fn serve_on(address: String, app: Router, name: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&address).await?;
    log::info!("{} service running on http://{}", name, address);
    axum::serve(listener, app).await?;
    Ok(())
}
