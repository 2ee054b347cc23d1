use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{MatchError, MatchRequest, MatchService};
use crate::graph::VenueStore;

/// Router builder exposing the ranking endpoint.
pub fn match_router<S>(service: Arc<MatchService<S>>) -> Router
where
    S: VenueStore + 'static,
{
    Router::new()
        .route("/api/v1/venues/match", post(match_handler::<S>))
        .with_state(service)
}

pub(crate) async fn match_handler<S>(
    State(service): State<Arc<MatchService<S>>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    S: VenueStore + 'static,
{
    match service.rank(&request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error @ MatchError::InvalidAttendees(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(MatchError::Store(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
