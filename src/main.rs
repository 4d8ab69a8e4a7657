use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use forkcast::config::{LoggingSettings, Settings};
use forkcast::core::{CandidateSourcer, RecommendationPipeline};
use forkcast::routes::{self, restaurants::AppState};
use forkcast::services::{LocalSearchClient, PlaceDetailClient, PostgresPreferenceStore};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// RUST_LOG wins over the configured level when set
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

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

fn startup_error<E: std::fmt::Display>(context: &str, err: E) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting Forkcast recommendation service...");

    let search = LocalSearchClient::from_settings(&settings.search)
        .map_err(|e| startup_error("Failed to build search client", e))?;
    let detail = PlaceDetailClient::from_settings(&settings.detail)
        .map_err(|e| startup_error("Failed to build detail client", e))?;

    info!(
        "Provider clients initialized (search: {} rps, detail: {} rps)",
        settings.search.requests_per_second, settings.detail.requests_per_second
    );

    let store = Arc::new(
        PostgresPreferenceStore::from_settings(&settings.database)
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!(
        "Preference store initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    let sourcer = CandidateSourcer::from_settings(&settings.sourcing);
    let pipeline = RecommendationPipeline::new(Arc::new(search), Arc::new(detail), store.clone(), sourcer)
        .with_limits(settings.recommendation.clone());

    info!(
        "Pipeline initialized ({} pages x {} results per category)",
        sourcer.pages_per_category(),
        sourcer.page_size()
    );

    let app_state = AppState {
        pipeline,
        store,
        recommendation: settings.recommendation.clone(),
        sourcing: settings.sourcing.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
