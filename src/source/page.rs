use crate::util::config::LivestreamConfig;
use crate::util::errors::{ConfigError, FetchError};
use crate::util::headers::generate_headers;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};
use std::time::Duration;

/// Markup of a fetched page together with the address it was served from
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    markup: String,
}

impl Document {
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: markup.into(),
        }
    }

    /// Final URL after the transport followed redirects
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Attribute of the first element matching `selector`.
    /// The markup is parsed per call so the document stays `Send`.
    pub fn select_attr(&self, selector: &Selector, attribute: &str) -> Option<String> {
        let html = Html::parse_document(&self.markup);
        html.select(selector)
            .next()
            .and_then(|element| element.value().attr(attribute))
            .map(str::to_string)
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    async fn fetch_document(&self, url: &str) -> Result<Document, FetchError>;
}

/// reqwest backed fetcher, redirects are followed with the client's default policy
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &LivestreamConfig) -> Result<Self, ConfigError> {
        let headers =
            generate_headers(config.cookies.as_deref()).map_err(ConfigError::InvalidCookie)?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.fetch_timeout_ms()))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms()))
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch_document(&self, url: &str) -> Result<Document, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| FetchError::from_reqwest(url, error))?;

        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::FailedStatusCode {
                url: url.to_string(),
                status,
            });
        }

        let final_url = response.url().to_string();

        let markup = response
            .text()
            .await
            .map_err(|error| FetchError::from_reqwest(url, error))?;

        if markup.trim().is_empty() {
            return Err(FetchError::InvalidBody {
                url: url.to_string(),
                reason: "empty body".to_string(),
            });
        }

        tracing::debug!("Fetched {} ({} bytes) from {}", final_url, markup.len(), url);

        Ok(Document::new(final_url, markup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::response::{Html as HtmlResponse, Redirect};
    use axum::routing::get;
    use tokio::net::TcpListener;

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", address)
    }

    fn fetcher(timeout_ms: u64) -> HttpPageFetcher {
        HttpPageFetcher::from_config(&LivestreamConfig {
            fetch_timeout_ms: Some(timeout_ms),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn select_attr_reads_first_match() {
        let document = Document::new(
            "https://www.youtube.com/@a/live",
            r#"<html><head>
                <link rel="canonical" href="https://www.youtube.com/watch?v=first">
                <link rel="canonical" href="https://www.youtube.com/watch?v=second">
                <meta itemprop="startDate" content="2024-01-01T00:00:00+00:00">
            </head><body></body></html>"#,
        );

        let canonical = Selector::parse("link[rel=canonical]").unwrap();
        let start = Selector::parse("meta[itemprop=startDate]").unwrap();
        let missing = Selector::parse("meta[itemprop=endDate]").unwrap();

        assert_eq!(
            document.select_attr(&canonical, "href").as_deref(),
            Some("https://www.youtube.com/watch?v=first")
        );
        assert_eq!(
            document.select_attr(&start, "content").as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(document.select_attr(&missing, "content"), None);
        assert_eq!(document.select_attr(&canonical, "title"), None);
    }

    #[test]
    fn unusable_cookie_fails_client_construction() {
        let result = HttpPageFetcher::from_config(&LivestreamConfig {
            cookies: Some("bad\nvalue".into()),
            ..Default::default()
        });

        assert!(matches!(result, Err(ConfigError::InvalidCookie(_))));
    }

    #[tokio::test]
    async fn follows_redirects_and_reports_final_url() {
        let base = serve(
            Router::new()
                .route("/@a/live", get(|| async { Redirect::temporary("/watch") }))
                .route(
                    "/watch",
                    get(|| async { HtmlResponse("<html><head><title>x</title></head></html>") }),
                ),
        )
        .await;

        let document = fetcher(2_000)
            .fetch_document(&format!("{}/@a/live", base))
            .await
            .unwrap();

        assert_eq!(document.url(), format!("{}/watch", base));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let base = serve(Router::new().route(
            "/@a/live",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        ))
        .await;

        let url = format!("{}/@a/live", base);
        let error = fetcher(2_000).fetch_document(&url).await.unwrap_err();

        assert!(matches!(
            &error,
            FetchError::FailedStatusCode { url: failed, status }
                if *status == StatusCode::TOO_MANY_REQUESTS && *failed == url
        ));
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let base = serve(Router::new().route("/@a/live", get(|| async { "" }))).await;

        let error = fetcher(2_000)
            .fetch_document(&format!("{}/@a/live", base))
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::InvalidBody { .. }));
    }

    #[tokio::test]
    async fn slow_page_times_out() {
        let base = serve(Router::new().route(
            "/@a/live",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;

        let error = fetcher(100)
            .fetch_document(&format!("{}/@a/live", base))
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = fetcher(2_000)
            .fetch_document(&format!("http://{}/@a/live", address))
            .await
            .unwrap_err();

        assert!(matches!(error, FetchError::Request { .. }));
    }
}
