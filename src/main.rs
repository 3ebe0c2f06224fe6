use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use jobmatch::config::{LoggingSettings, Settings};
use jobmatch::core::{ranking::default_max_workers, RankingPipeline};
use jobmatch::routes::{self, recommendations::AppState};
use jobmatch::services::{AppwriteClient, AppwriteCollections, RecommendationCache, RecommendationService};
use std::sync::Arc;
use std::time::Duration;
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

/// LOG_LEVEL / LOG_FORMAT take precedence over the configured logging section
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
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
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Jobmatch recommendation service...");

    let collections = AppwriteCollections {
        job_postings: settings.collection.job_postings.clone(),
        preference_profiles: settings.collection.preference_profiles.clone(),
    };

    let appwrite = Arc::new(
        AppwriteClient::new(
            settings.appwrite.endpoint.clone(),
            settings.appwrite.api_key.clone(),
            settings.appwrite.project_id.clone(),
            settings.appwrite.database_id.clone(),
            collections,
            Duration::from_secs(settings.appwrite.timeout_secs.unwrap_or(30)),
        )
        .map_err(|e| {
            error!("Failed to create Appwrite client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    info!("Appwrite client initialized");

    let budgets = settings.point_budgets();
    let max_workers = settings.ranking.max_workers.unwrap_or_else(default_max_workers);
    let pipeline = RankingPipeline::new(budgets, max_workers);

    info!("Ranking pipeline initialized with budgets: {:?}, max workers: {}", budgets, max_workers);

    let mut service = RecommendationService::new(appwrite.clone(), appwrite, pipeline)
        .with_candidate_fetch_limit(settings.ranking.candidate_fetch_limit);

    if settings.cache.enabled {
        info!(
            "Recommendation cache enabled ({} entries, TTL: {}s)",
            settings.cache.capacity, settings.cache.ttl_secs
        );
        service = service.with_cache(RecommendationCache::new(
            settings.cache.capacity,
            settings.cache.ttl_secs,
        ));
    }

    let app_state = AppState {
        service: Arc::new(service),
        ranking: settings.ranking.clone(),
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
