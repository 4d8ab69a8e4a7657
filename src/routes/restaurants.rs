use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::{RecommendationSettings, SourcingSettings};
use crate::core::{PipelineError, RecommendationPipeline};
use crate::models::{ErrorResponse, HealthResponse, RecommendRequest, RecommendResponse};
use crate::services::PreferenceStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: RecommendationPipeline,
    pub store: Arc<dyn PreferenceStore>,
    pub recommendation: RecommendationSettings,
    pub sourcing: SourcingSettings,
}

/// Configure all restaurant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/restaurants/recommend", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn error_response(err: &PipelineError) -> HttpResponse {
    match err {
        PipelineError::Validation(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        PipelineError::SearchUnavailable { .. } => HttpResponse::BadGateway().json(ErrorResponse {
            error: "Search provider unavailable".to_string(),
            message: err.to_string(),
            status_code: 502,
        }),
    }
}

/// Recommend restaurants endpoint
///
/// POST /api/v1/restaurants/recommend
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "latitude": 37.5665,
///   "longitude": 126.978,
///   "categories": ["ramen"],
///   "radius": 1000,
///   "sort": "accuracy|distance|rating",
///   "limit": 10,
///   "minRating": 4.0,
///   "openNowOnly": true,
///   "includeUnknownHours": false,
///   "tagIds": [7],
///   "favoritesOnly": false
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let criteria = match req
        .into_inner()
        .into_criteria(&state.recommendation, &state.sourcing.default_categories)
    {
        Ok(criteria) => criteria,
        Err(e) => {
            tracing::info!("Rejected recommend request: {}", e);
            return error_response(&e);
        }
    };

    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        %request_id,
        user_id = criteria.user_id.as_deref().unwrap_or("anonymous"),
        categories = ?criteria.categories,
        sort = ?criteria.sort_mode,
        budget = criteria.result_budget,
        "Recommending restaurants"
    );

    match state.pipeline.run(&criteria).await {
        Ok(result) => {
            tracing::debug!(%request_id, returned = result.results.len(), "Recommendation complete");
            HttpResponse::Ok().json(RecommendResponse::from(result))
        }
        Err(e) => {
            tracing::error!(%request_id, "Recommendation failed: {}", e);
            error_response(&e)
        }
    }
}
