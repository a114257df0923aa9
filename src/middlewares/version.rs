use crate::constants::VERSION;
use crate::util::errors::EndpointError;
use axum::body::Body;
use axum::extract::{Path, Request};
use axum::http::Response;
use axum::middleware::Next;
use std::collections::HashMap;

/// Rejects any `/v{version}` prefix other than the one this build serves
pub async fn check(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response<Body>, EndpointError> {
    let requested = params.get("version").map(String::as_str);

    if requested != Some(VERSION.to_string().as_str()) {
        tracing::debug!("Rejected {} for api version {:?}", request.uri(), requested);
        return Err(EndpointError::UnprocessableEntity("Unsupported version"));
    }

    Ok(next.run(request).await)
}
