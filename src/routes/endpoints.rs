use super::{AppState, ChannelStatusQuery, EmbedQuery};
use crate::constants::STREAM_LIST_KEY;
use crate::models::{ApiEmbed, ApiEmbedKind, ApiFindBody, ApiStreamResult};
use crate::source::youtube::common::{EmbedTarget, VideoId};
use crate::source::youtube::live::LiveStatus;
use crate::util::channels::{ChannelRef, parse_channel_list};
use crate::util::errors::EndpointError;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

pub async fn stored_livestream(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiStreamResult>, EndpointError> {
    let Some(list) = state.store.get(STREAM_LIST_KEY).await? else {
        return Ok(Json(ApiStreamResult::Empty(None)));
    };

    let channels = parse_channel_list(&list);
    let stream = state.finder.find_first_live(&channels).await;

    Ok(Json(stream.into()))
}

pub async fn find_livestream(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApiFindBody>,
) -> Result<Json<ApiStreamResult>, EndpointError> {
    let channels = body.channels.into_channels();
    let stream = state.finder.find_first_live(&channels).await;

    Ok(Json(stream.into()))
}

pub async fn channel_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChannelStatusQuery>,
) -> Result<Json<LiveStatus>, EndpointError> {
    let url = query.url.ok_or(EndpointError::MissingOption("url"))?;
    let channel = ChannelRef::parse(&url)?;

    let status = state.finder.resolver().resolve(&channel).await?;

    tracing::debug!("Channel {} live: {}", channel, status.is_live());

    Ok(Json(status))
}

pub async fn get_stream_list(State(state): State<Arc<AppState>>) -> Result<String, EndpointError> {
    Ok(state.store.get(STREAM_LIST_KEY).await?.unwrap_or_default())
}

pub async fn update_stream_list(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<StatusCode, EndpointError> {
    state.store.set(STREAM_LIST_KEY, body).await?;

    tracing::debug!("Stored channel list updated");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_stream_list(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, EndpointError> {
    state.store.remove(STREAM_LIST_KEY).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn embed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmbedQuery>,
) -> Result<Json<ApiEmbed>, EndpointError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or(EndpointError::MissingOption("id"))?;

    let target = match query.kind {
        ApiEmbedKind::Video => EmbedTarget::Video(VideoId::new(id)),
        ApiEmbedKind::Playlist => EmbedTarget::Playlist(id),
    };

    let options = state.finder.options();

    Ok(Json(ApiEmbed {
        embed_url: target.embed_url(&options.player_base, options.autoplay),
    }))
}
