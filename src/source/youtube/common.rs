use crate::util::errors::ParseError;
use regex::Regex;
use serde::Serialize;
use std::fmt::{self, Display};
use url::Url;

/// Identifier carried in the `v` parameter of a watch URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the `v` query parameter, the only part of a watch URL the player needs
    pub fn from_watch_url(watch_url: &str) -> Result<Self, ParseError> {
        let url = Url::parse(watch_url).map_err(|_| ParseError::Url(watch_url.to_string()))?;

        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .map(Self)
            .ok_or_else(|| ParseError::MissingParameter {
                url: watch_url.to_string(),
                param: "v",
            })
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmbedTarget {
    Video(VideoId),
    Playlist(String),
}

impl EmbedTarget {
    pub fn embed_url(&self, player_base: &str, autoplay: bool) -> String {
        let base = player_base.trim_end_matches('/');

        match self {
            EmbedTarget::Video(id) => {
                let mut url = format!("{}/embed/{}", base, id);
                if autoplay {
                    url.push_str("?autoplay=1");
                }
                url
            }
            EmbedTarget::Playlist(id) => {
                let mut url = format!("{}/embed?listType=playlist&list={}", base, id);
                if autoplay {
                    url.push_str("&autoplay=1");
                }
                url
            }
        }
    }
}

pub struct UrlPatterns {
    watch: Regex,
}

impl UrlPatterns {
    pub fn new() -> Self {
        Self {
            watch: Regex::new(r"/watch\?v=").unwrap(),
        }
    }

    /// Whether a canonical URL points at a playable broadcast rather than a channel page
    pub fn is_watch_url(&self, url: &str) -> bool {
        self.watch.is_match(url)
    }
}
