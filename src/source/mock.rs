use super::page::{Document, PageFetcher};
use crate::util::errors::FetchError;
use async_trait::async_trait;
use axum::http::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

enum Scripted {
    Page { markup: String, delay: Duration },
    Timeout,
}

/// Scripted fetcher: known URLs return their markup, anything else is a 404
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, Scripted>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, markup: impl Into<String>) -> Self {
        self.delayed_page(url, markup, 0)
    }

    pub fn delayed_page(mut self, url: &str, markup: impl Into<String>, delay_ms: u64) -> Self {
        self.pages.insert(
            url.to_string(),
            Scripted::Page {
                markup: markup.into(),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn timeout(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), Scripted::Timeout);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_document(&self, url: &str) -> Result<Document, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        match self.pages.get(url) {
            Some(Scripted::Page { markup, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(Document::new(url, markup.clone()))
            }
            Some(Scripted::Timeout) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            None => Err(FetchError::FailedStatusCode {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}

pub fn channel_page(canonical: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Channel</title><link rel="canonical" href="{}"></head><body></body></html>"#,
        canonical
    )
}

pub fn watch_page(start_date: Option<&str>) -> String {
    let meta = start_date
        .map(|start| format!(r#"<meta itemprop="startDate" content="{}">"#, start))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html><html><head><title>Broadcast</title></head><body><div itemscope itemtype="http://schema.org/VideoObject"><meta itemprop="name" content="Broadcast">{}</div></body></html>"#,
        meta
    )
}
