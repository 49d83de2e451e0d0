//! Handler for the link shortening endpoint.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "long_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created` with:
///
/// ```json
/// { "code": "21", "short_url": "http://localhost:3000/21" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is not a well-formed absolute URL.
/// Returns 500 Internal Server Error if the store insert fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let code = state.link_service.create_short_link(&payload.long_url).await?;
    let short_url = format!("{}/{}", state.base_url.trim_end_matches('/'), code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse { code, short_url }),
    ))
}
