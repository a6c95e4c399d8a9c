//! Sample user registration handler

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    api::extractors::ValidatedJson,
    models::{SampleRequest, SampleResponse},
    request_context::RequestContext,
    state::AppState,
};

/// `POST /api/v1/user/register`
///
/// The body is validated before this runs; invalid payloads never reach it.
pub async fn register_user(
    State(state): State<AppState>,
    context: RequestContext,
    ValidatedJson(request): ValidatedJson<SampleRequest>,
) -> Json<SampleResponse> {
    tracing::info!(
        request_id = %context.request_id(),
        name = %request.name,
        "Registering user"
    );

    Json(SampleResponse {
        message: format!("{} registered", request.name),
        timestamp: Utc::now().with_timezone(&state.config.response.offset()),
        data: request,
    })
}
