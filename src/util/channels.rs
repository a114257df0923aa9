use super::errors::ResolverError;
use serde::{Serialize, Serializer};
use std::fmt::{self, Display};
use url::Url;

/// Base URL of a channel on the video platform
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelRef(Url);

impl ChannelRef {
    pub fn parse(input: &str) -> Result<Self, ResolverError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|_| ResolverError::InvalidChannel(trimmed.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ResolverError::InvalidChannel(trimmed.to_string()));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Page that redirects to the running broadcast when there is one
    pub fn live_url(&self) -> String {
        format!("{}/live", self.0.as_str().trim_end_matches('/'))
    }
}

impl Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChannelRef {
    fn serialize<S>(&self, se: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        se.serialize_str(self.as_str())
    }
}

/// Splits the persisted newline separated list, accepting `\r\n`, `\r` and `\n`.
/// Blank lines are dropped and entries that are not http(s) URLs are skipped.
pub fn parse_channel_list(text: &str) -> Vec<ChannelRef> {
    parse_channel_entries(text.split(['\r', '\n']))
}

pub fn parse_channel_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<ChannelRef> {
    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match ChannelRef::parse(entry) {
            Ok(channel) => Some(channel),
            Err(error) => {
                tracing::warn!("Skipping channel list entry: {}", error);
                None
            }
        })
        .collect()
}
