use crate::util::errors::EndpointError;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Response;
use axum::middleware::Next;
use std::time::Instant;

#[tracing::instrument(skip_all)]
pub async fn request(request: Request, next: Next) -> Result<Response<Body>, EndpointError> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        "Received a request! [Endpoint: {} {}] [Status: {}] [Took: {}ms]",
        method,
        uri,
        response.status(),
        start.elapsed().as_millis()
    );

    Ok(response)
}
