use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use studymate::config::{LoggingSettings, Settings, StoreBackend};
use studymate::routes::{self, errors, AppState};
use studymate::{MatchingEngine, MemoryStore, PostgresStore};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber; RUST_LOG takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    init_logging(&settings.logging);
    info!("Starting StudyMate partner-matching service...");

    let top_limit = settings.matching.top_profiles;

    // Store handles live for the whole process and are released after shutdown
    let (engine, postgres) = match settings.store.backend {
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(&settings.database).await.map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::other(format!("PostgreSQL connection error: {}", e))
            })?;
            let store = Arc::new(store);
            info!("PostgreSQL store initialized");
            (MatchingEngine::from_store(store.clone(), top_limit), Some(store))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on shutdown");
            (MatchingEngine::from_store(Arc::new(MemoryStore::new()), top_limit), None)
        }
    };

    let app_state = AppState { engine };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let result = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(errors::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(errors::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await;

    if let Some(store) = postgres {
        store.close().await;
    }

    info!("StudyMate server stopped");
    result
}
