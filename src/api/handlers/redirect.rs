//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// All the interesting behavior (cache-aside lookup, hit dispatch) lives in
/// the link service; this handler only maps the outcome onto HTTP. The
/// redirect is 307 Temporary so clients keep re-resolving through us and
/// every access is counted.
///
/// # Errors
///
/// Returns 400 Bad Request for codes outside the base-62 alphabet.
/// Returns 404 Not Found if no link backs the code.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let long_url = state.link_service.resolve(&code).await?;
    Ok(Redirect::temporary(&long_url))
}
