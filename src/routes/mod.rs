use crate::middlewares;
use crate::models::ApiEmbedKind;
use crate::source::youtube::finder::LiveFinder;
use crate::util::store::Store;
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing;
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;

pub mod endpoints;
pub mod global;

pub struct AppState {
    pub authorization: String,
    pub finder: LiveFinder,
    pub store: Arc<dyn Store>,
}

#[derive(Deserialize, Debug)]
pub struct ChannelStatusQuery {
    pub url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct EmbedQuery {
    #[serde(rename = "type", default)]
    pub kind: ApiEmbedKind,
    pub id: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/v{version}/livestream",
            routing::get(endpoints::stored_livestream).post(endpoints::find_livestream),
        )
        .route(
            "/v{version}/channels/status",
            routing::get(endpoints::channel_status),
        )
        .route(
            "/v{version}/streamlist",
            routing::get(endpoints::get_stream_list)
                .put(endpoints::update_stream_list)
                .delete(endpoints::clear_stream_list),
        )
        .route("/v{version}/embed", routing::get(endpoints::embed))
        .route_layer(
            ServiceBuilder::new()
                .layer(from_fn(middlewares::log::request))
                .layer(from_fn(middlewares::version::check))
                .layer(from_fn_with_state(
                    state.clone(),
                    middlewares::auth::authenticate,
                )),
        )
        .route("/", routing::get(global::landing))
        .with_state(state)
}
