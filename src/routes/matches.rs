use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ErrorResponse, HealthResponse, MatchRequest, PairingResponse, PairingsResponse, RecommendResponse,
    ReleaseRequest, ReleaseResponse,
};
use crate::services::{MatchLedger, MatchService, ProfileStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/recommend", web::post().to(recommend))
        .route("/matches/request", web::post().to(request_match))
        .route("/ledger/pairings", web::get().to(list_pairings))
        .route("/ledger/release", web::post().to(release));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn store_error(context: &str, err: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.service.profiles().health_check().await.unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Stateless recommendations
///
/// POST /api/v1/matches/recommend
///
/// Request body:
/// ```json
/// { "userId": "string" }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.service.recommend(&req.user_id).await {
        Ok(matches) => HttpResponse::Ok().json(RecommendResponse {
            user_id: req.user_id.clone(),
            matches,
        }),
        Err(e) => store_error("Failed to compute recommendations", e),
    }
}

/// Stateful pairing
///
/// POST /api/v1/matches/request
///
/// Request body:
/// ```json
/// { "userId": "string" }
/// ```
async fn request_match(
    state: web::Data<AppState>,
    req: web::Json<MatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.service.request_match(&req.user_id).await {
        Ok(outcome) => {
            let committed = outcome.committed();
            HttpResponse::Ok().json(PairingResponse {
                user_id: req.user_id.clone(),
                matched: outcome.matched,
                committed,
            })
        }
        Err(e) => store_error("Failed to request match", e),
    }
}

/// GET /api/v1/ledger/pairings
async fn list_pairings(state: web::Data<AppState>) -> impl Responder {
    match state.service.ledger().pairings().await {
        Ok(pairings) => {
            let count = pairings.len();
            HttpResponse::Ok().json(PairingsResponse { pairings, count })
        }
        Err(e) => store_error("Failed to list pairings", e),
    }
}

/// Release every pairing a profile appears in
///
/// POST /api/v1/ledger/release
///
/// Request body:
/// ```json
/// { "name": "string" }
/// ```
async fn release(
    state: web::Data<AppState>,
    req: web::Json<ReleaseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.service.ledger().release(&req.name).await {
        Ok(released) => HttpResponse::Ok().json(ReleaseResponse {
            name: req.name.clone(),
            released,
        }),
        Err(e) => store_error("Failed to release pairings", e),
    }
}
