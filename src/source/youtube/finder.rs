use super::common::{EmbedTarget, VideoId};
use super::live::{LiveResolver, LiveStatus};
use crate::util::channels::ChannelRef;
use crate::util::config::{FinderPolicy, LivestreamConfig};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStream {
    pub channel: ChannelRef,
    pub video_id: VideoId,
    pub watch_url: String,
    pub embed_url: String,
}

pub struct FinderOptions {
    pub policy: FinderPolicy,
    pub max_concurrency: usize,
    pub player_base: String,
    pub autoplay: bool,
}

impl From<&LivestreamConfig> for FinderOptions {
    fn from(config: &LivestreamConfig) -> Self {
        Self {
            policy: config.policy(),
            max_concurrency: config.max_concurrency(),
            player_base: config.player_base().to_string(),
            autoplay: config.autoplay(),
        }
    }
}

/// Picks the first channel of an ordered list that is live right now.
///
/// Results are consumed in list order under both policies, so a later channel
/// never wins over an earlier live one even if its pages load faster. Once the
/// winner is known the remaining lookups are dropped.
pub struct LiveFinder {
    resolver: Arc<LiveResolver>,
    options: FinderOptions,
}

impl LiveFinder {
    pub fn new(resolver: Arc<LiveResolver>, options: FinderOptions) -> Self {
        Self { resolver, options }
    }

    pub fn resolver(&self) -> &LiveResolver {
        &self.resolver
    }

    pub fn options(&self) -> &FinderOptions {
        &self.options
    }

    pub async fn find_first_live(&self, channels: &[ChannelRef]) -> Option<ResolvedStream> {
        self.find_first_live_at(channels, Utc::now()).await
    }

    #[tracing::instrument(skip_all, fields(channels = channels.len(), policy = ?self.options.policy))]
    pub async fn find_first_live_at(
        &self,
        channels: &[ChannelRef],
        now: DateTime<Utc>,
    ) -> Option<ResolvedStream> {
        if channels.is_empty() {
            return None;
        }

        let in_flight = match self.options.policy {
            FinderPolicy::Sequential => 1,
            FinderPolicy::Concurrent => self.options.max_concurrency.max(1),
        };

        let resolver = &self.resolver;
        let lookups: Vec<_> = channels
            .iter()
            .map(|channel| async move { (channel, resolver.resolve_at(channel, now).await) })
            .collect();
        let mut results = stream::iter(lookups).buffered(in_flight);

        while let Some((channel, result)) = results.next().await {
            let watch_url = match result {
                Ok(LiveStatus::Live { watch_url, .. }) => watch_url,
                Ok(LiveStatus::NotLive) => continue,
                Err(error) => {
                    tracing::warn!("Channel {} is not a candidate: {}", channel, error);
                    continue;
                }
            };

            let video_id = match VideoId::from_watch_url(&watch_url) {
                Ok(video_id) => video_id,
                Err(error) => {
                    tracing::warn!("Channel {} is live but unplayable: {}", channel, error);
                    continue;
                }
            };

            let embed_url = EmbedTarget::Video(video_id.clone())
                .embed_url(&self.options.player_base, self.options.autoplay);

            tracing::info!("Found live stream for {} [{}]", channel, video_id);

            return Some(ResolvedStream {
                channel: channel.clone(),
                video_id,
                watch_url,
                embed_url,
            });
        }

        tracing::debug!("No live stream found in {} channel(s)", channels.len());

        None
    }
}
