//! HTTP surface: one route that upgrades to a subscriber socket

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use super::socket;
use crate::connection::Subscriber;
use crate::hub::Hub;
use crate::session::serve_connection;

/// Shared state handed to every request
#[derive(Clone)]
pub(crate) struct AppState {
    pub hub: Hub,
    pub idle_timeout: Option<Duration>,
}

/// `GET /` upgrades; any other method on `/` is 405
///
/// The method is checked in the handler because axum's `get` router also
/// answers `HEAD`.
pub(crate) fn router(state: AppState) -> Router {
    Router::new().route("/", any(upgrade)).with_state(state)
}

async fn upgrade(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    if method != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
    }

    let ws = match ws {
        Ok(ws) => ws,
        Err(WebSocketUpgradeRejection::ConnectionNotUpgradable(e)) => {
            tracing::warn!(peer = %peer, error = %e, "Upgrade failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            tracing::debug!(peer = %peer, error = %e, "Not a websocket handshake");
            return (StatusCode::BAD_REQUEST, "Not a websocket handshake").into_response();
        }
    };

    ws.on_failed_upgrade(move |e| {
        tracing::warn!(peer = %peer, error = %e, "Upgrade failed");
    })
    .on_upgrade(move |socket| handle_socket(socket, peer, state))
}

async fn handle_socket(socket: WebSocket, peer: SocketAddr, state: AppState) {
    let (sink, source) = socket::split(socket);
    let subscriber = Subscriber::new(Arc::new(sink)).with_peer_addr(peer);

    tracing::debug!(conn = %subscriber.id(), peer = %peer, "WebSocket connected");

    serve_connection(state.hub, subscriber, source, state.idle_timeout).await;
}
