use crate::routes::AppState;
use crate::util::errors::EndpointError;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::Response;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use std::sync::Arc;

pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response<Body>, EndpointError> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == state.authorization);

    if !authorized {
        return Err(EndpointError::Unauthorized);
    }

    Ok(next.run(request).await)
}
