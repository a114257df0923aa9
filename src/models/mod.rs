use crate::source::youtube::finder::ResolvedStream;
use crate::util::channels::{ChannelRef, parse_channel_entries, parse_channel_list};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Empty;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "status", content = "data")]
pub enum ApiStreamResult {
    Live(ResolvedStream),
    Empty(Option<Empty>),
}

impl From<Option<ResolvedStream>> for ApiStreamResult {
    fn from(stream: Option<ResolvedStream>) -> Self {
        match stream {
            Some(stream) => ApiStreamResult::Live(stream),
            None => ApiStreamResult::Empty(None),
        }
    }
}

/// Either a JSON list or the newline separated text the options page stores
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiChannels {
    List(Vec<String>),
    Text(String),
}

impl ApiChannels {
    pub fn into_channels(self) -> Vec<ChannelRef> {
        match self {
            ApiChannels::List(list) => parse_channel_entries(list.iter().map(String::as_str)),
            ApiChannels::Text(text) => parse_channel_list(&text),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiFindBody {
    pub channels: ApiChannels,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiEmbedKind {
    #[default]
    Video,
    Playlist,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmbed {
    pub embed_url: String,
}
