use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;
use crate::config::RankingSettings;
use crate::core::RecommendError;
use crate::models::{ErrorResponse, HealthResponse, RankingOptions, RecommendRequest, RecommendResponse};
use crate::services::{RecommendationError, RecommendationService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
    pub ranking: RankingSettings,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20,
///   "minScore": 20.0,
///   "deadlineMs": 250,
///   "requirePreferences": false
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    use actix_web::http::StatusCode;

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: field_errors={:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let user_id = req.user_id.trim();
    let defaults = state.ranking.default_options();

    // Cap limit to prevent oversized responses
    let options = RankingOptions {
        min_score_threshold: req.min_score.unwrap_or(defaults.min_score_threshold),
        limit: req
            .limit
            .map(usize::from)
            .unwrap_or(defaults.limit)
            .min(state.ranking.max_limit as usize),
        require_preferences: req.require_preferences,
    };
    let deadline = req
        .deadline_ms
        .or(state.ranking.default_deadline_ms)
        .map(Duration::from_millis);

    tracing::info!(
        "Recommending jobs for user: {}, limit: {}, threshold: {}",
        user_id,
        options.limit,
        options.min_score_threshold
    );

    match state.service.recommend(user_id, options, deadline).await {
        Ok(rec) => {
            tracing::info!(
                "Returning {} recommendations for user {} (from {} candidates, {} skipped, partial: {})",
                rec.result.results.len(),
                user_id,
                rec.total_candidates,
                rec.result.skipped_count,
                rec.result.partial
            );

            HttpResponse::Ok().json(RecommendResponse {
                recommendations: rec.result.results.clone(),
                skipped_count: rec.result.skipped_count,
                partial: rec.result.partial,
                total_candidates: rec.total_candidates,
            })
        }
        Err(RecommendationError::Ranking(RecommendError::InvalidProfile(msg))) => {
            tracing::info!("Invalid profile for {}: {}", user_id, msg);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, "Invalid profile", msg)
        }
        Err(RecommendationError::ProfileNotFound(msg)) => {
            error_response(StatusCode::NOT_FOUND, "Profile not found", msg)
        }
        Err(e @ RecommendationError::Source(_)) => {
            tracing::error!("Failed to load recommendation inputs for {}: {}", user_id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load postings", e.to_string())
        }
        Err(e @ RecommendationError::Worker(_)) => {
            tracing::error!("Recommendation failed for {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Recommendation failed", e.to_string())
        }
    }
}
