use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Config at {path} is not valid: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unknown logging level [{0}]")]
    InvalidLevel(String),
    #[error("livestream.cookies is not a usable header value: {0}")]
    InvalidCookie(#[source] reqwest::header::InvalidHeaderValue),
    #[error("HTTP client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Transport level failure while loading a single page
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} was not sent due to [{source}]")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Response received from {url} is not ok [{status}]")]
    FailedStatusCode { url: String, status: StatusCode },
    #[error("Response body from {url} could not be used: {reason}")]
    InvalidBody { url: String, reason: String },
}

impl FetchError {
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
            };
        }

        Self::Request {
            url: url.to_string(),
            source,
        }
    }
}

/// Failure to decide the live status of one channel
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Page {url} is missing required data: {reason}")]
    MalformedPage { url: String, reason: &'static str },
    #[error("Invalid channel URL provided [{0}]")]
    InvalidChannel(String),
}

/// A signal that was present but could not be interpreted
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unrecognised timestamp [{0}]")]
    Timestamp(String),
    #[error("Invalid URL [{0}]")]
    Url(String),
    #[error("URL {url} has no usable [{param}] parameter")]
    MissingParameter { url: String, param: &'static str },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage file {path} could not be accessed: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage file {path} is corrupt: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage write did not finish: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Unprocessable Entity due to: {0}")]
    UnprocessableEntity(&'static str),
    #[error("Required option {0} missing")]
    MissingOption(&'static str),
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for EndpointError {
    #[tracing::instrument]
    fn into_response(self) -> Response<Body> {
        tracing::warn!(
            "Something Happened when processing this endpoint: {:?}",
            self
        );

        let status = match &self {
            EndpointError::Unauthorized => StatusCode::FORBIDDEN,
            EndpointError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EndpointError::MissingOption(_) => StatusCode::BAD_REQUEST,
            EndpointError::Resolver(ResolverError::InvalidChannel(_)) => StatusCode::BAD_REQUEST,
            EndpointError::Resolver(ResolverError::Fetch(FetchError::Timeout { .. })) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            EndpointError::Resolver(_) => StatusCode::BAD_GATEWAY,
            EndpointError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_mentions_url_and_status() {
        let error = FetchError::FailedStatusCode {
            url: "https://www.youtube.com/@a/live".into(),
            status: StatusCode::NOT_FOUND,
        };
        assert!(error.to_string().contains("https://www.youtube.com/@a/live"));
        assert!(error.to_string().contains("404"));
    }

    #[test]
    fn endpoint_errors_map_to_status_codes() {
        let invalid = EndpointError::Resolver(ResolverError::InvalidChannel("nope".into()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let timeout = EndpointError::Resolver(ResolverError::Fetch(FetchError::Timeout {
            url: "https://example.com/live".into(),
        }));
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let malformed = EndpointError::Resolver(ResolverError::MalformedPage {
            url: "https://example.com/live".into(),
            reason: "canonical link",
        });
        assert_eq!(malformed.into_response().status(), StatusCode::BAD_GATEWAY);

        assert_eq!(
            EndpointError::Unauthorized.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
