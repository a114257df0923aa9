use super::common::UrlPatterns;
use crate::source::page::PageFetcher;
use crate::util::channels::ChannelRef;
use crate::util::errors::{ParseError, ResolverError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use scraper::Selector;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum LiveStatus {
    NotLive,
    #[serde(rename_all = "camelCase")]
    Live {
        watch_url: String,
        /// `None` when the watch page publishes no start date
        scheduled_start: Option<DateTime<Utc>>,
    },
}

impl LiveStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, LiveStatus::Live { .. })
    }
}

struct PageSelectors {
    canonical: Selector,
    start_date: Selector,
}

impl PageSelectors {
    fn new() -> Self {
        Self {
            canonical: Selector::parse("link[rel=canonical]").unwrap(),
            start_date: Selector::parse("meta[itemprop=startDate]").unwrap(),
        }
    }
}

/// Decides whether a single channel is broadcasting.
///
/// The channel's `/live` page declares the running broadcast as its canonical
/// address. Anything other than a watch URL means there is nothing live, and a
/// watch URL whose start date is still ahead is an upcoming stream.
pub struct LiveResolver {
    fetcher: Arc<dyn PageFetcher>,
    patterns: UrlPatterns,
    selectors: PageSelectors,
}

impl LiveResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            patterns: UrlPatterns::new(),
            selectors: PageSelectors::new(),
        }
    }

    pub async fn resolve(&self, channel: &ChannelRef) -> Result<LiveStatus, ResolverError> {
        self.resolve_at(channel, Utc::now()).await
    }

    #[tracing::instrument(skip_all, fields(channel = %channel))]
    pub async fn resolve_at(
        &self,
        channel: &ChannelRef,
        now: DateTime<Utc>,
    ) -> Result<LiveStatus, ResolverError> {
        let live = self.fetcher.fetch_document(&channel.live_url()).await?;

        let href = live
            .select_attr(&self.selectors.canonical, "href")
            .ok_or_else(|| ResolverError::MalformedPage {
                url: live.url().to_string(),
                reason: "canonical link",
            })?;

        let canonical = absolutize(live.url(), &href).map_err(|_| ResolverError::MalformedPage {
            url: live.url().to_string(),
            reason: "canonical href",
        })?;

        if !self.patterns.is_watch_url(&canonical) {
            tracing::debug!("Channel {} is not live (canonical: {})", channel, canonical);
            return Ok(LiveStatus::NotLive);
        }

        let watch = self.fetcher.fetch_document(&canonical).await?;

        let scheduled_start = watch
            .select_attr(&self.selectors.start_date, "content")
            .and_then(|content| match parse_start_date(&content) {
                Ok(start) => Some(start),
                Err(error) => {
                    tracing::warn!("Ignoring start date on {}: {}", canonical, error);
                    None
                }
            });

        if let Some(start) = scheduled_start {
            if now < start {
                tracing::debug!(
                    "Channel {} has an upcoming stream at {} ({})",
                    channel,
                    start,
                    canonical
                );
                return Ok(LiveStatus::NotLive);
            }
        }

        tracing::debug!("Channel {} is live at {}", channel, canonical);

        Ok(LiveStatus::Live {
            watch_url: canonical,
            scheduled_start,
        })
    }
}

fn absolutize(base: &str, href: &str) -> Result<String, ParseError> {
    let href = href.trim();

    if let Ok(url) = Url::parse(href) {
        return Ok(url.to_string());
    }

    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .map_err(|_| ParseError::Url(href.to_string()))
}

/// Accepts RFC 3339 plus the offset-less forms some pages use, read as UTC
pub fn parse_start_date(content: &str) -> Result<DateTime<Utc>, ParseError> {
    let content = content.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(content) {
        return Ok(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(content, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(date.and_utc());
    }

    NaiveDate::parse_from_str(content, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
        .ok_or_else(|| ParseError::Timestamp(content.to_string()))
}
