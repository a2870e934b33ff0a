//! HTTP presentation layer.
//!
//! A thin JSON surface over the iterator algebra: every route opens a log,
//! walks it through stream combinators, and serialises the result. No
//! state lives here beyond the shared storage engine handle.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::fact::Facts;
use crate::ident::Ident;
use crate::stream::{self, FactStream};
use crate::view::{self, Direction, Event, Log, LogIter, COMMIT_LOG};

/// Domain partition holding the meta-log of known domains.
const DOMAINS_DOMAIN: &str = "factlog.domains";

type ErrorReply = (StatusCode, Json<Value>);

#[derive(Clone)]
struct AppState {
    engine: Arc<dyn Engine>,
}

/// Builds the HTTP router over the given engine.
#[must_use]
pub fn router(engine: Arc<dyn Engine>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/domains", get(domains))
        .route("/log/:domain", get(log_facts))
        .route("/log/:domain/entities", get(log_entities))
        .route("/log/:domain/attributes", get(log_attributes))
        .route("/log/:domain/values", get(log_values))
        .route("/timeline/:domain", get(timeline_events))
        .with_state(AppState { engine })
}

/// Serves the router until ctrl-c.
///
/// # Errors
///
/// Returns the bind or accept-loop error.
pub async fn serve(engine: Arc<dyn Engine>, addr: std::net::SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

/// Offset/limit window accepted by the log routes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Window {
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: usize,
}

/// Timeline ordering, `desc` by default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Order {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct TimelineQuery {
    #[serde(default)]
    order: Order,
}

impl From<Order> for Direction {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => Self::Ascending,
            Order::Desc => Self::Descending,
        }
    }
}

fn reply_err(err: &Error) -> ErrorReply {
    let code = if err.is_does_not_exist() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (code, Json(json!({ "error": err.to_string() })))
}

/// Opens the domain's commit log and applies the requested window.
fn open_stream(engine: &Arc<dyn Engine>, domain: &str, window: Window) -> Result<impl FactStream> {
    let log = Log::open(Arc::clone(engine), domain, COMMIT_LOG)?;
    debug!(domain, head = log.head(), "opened log");
    Ok(stream::slice(log.iter(), window.offset, window.limit))
}

fn open_log(engine: &Arc<dyn Engine>, domain: &str) -> Result<LogIter> {
    Log::open(Arc::clone(engine), domain, COMMIT_LOG).map(|log| log.iter())
}

async fn root() -> Json<Value> {
    Json(json!({
        "title": "factlog",
        "version": crate::VERSION,
    }))
}

async fn domains(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<String>>, ErrorReply> {
    let mut it = match open_log(&state.engine, DOMAINS_DOMAIN) {
        Ok(it) => it,
        // No domain has ever been committed; show an empty list.
        Err(err) if err.is_does_not_exist() => return Ok(Json(Vec::new())),
        Err(err) => return Err(reply_err(&err)),
    };

    let idents = stream::entities(&mut it).map_err(|err| reply_err(&err))?;
    Ok(Json(idents.into_iter().map(|id| id.name).collect()))
}

async fn log_facts(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(window): Query<Window>,
) -> std::result::Result<Json<Facts>, ErrorReply> {
    let mut it = open_stream(&state.engine, &domain, window).map_err(|err| reply_err(&err))?;
    let facts = stream::read_all(&mut it).map_err(|err| reply_err(&err))?;
    Ok(Json(facts))
}

async fn log_entities(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(window): Query<Window>,
) -> std::result::Result<Json<Vec<Ident>>, ErrorReply> {
    let mut it = open_stream(&state.engine, &domain, window).map_err(|err| reply_err(&err))?;
    let idents = stream::entities(&mut it).map_err(|err| reply_err(&err))?;
    Ok(Json(idents))
}

async fn log_attributes(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(window): Query<Window>,
) -> std::result::Result<Json<Vec<Ident>>, ErrorReply> {
    let mut it = open_stream(&state.engine, &domain, window).map_err(|err| reply_err(&err))?;
    let idents = stream::attributes(&mut it).map_err(|err| reply_err(&err))?;
    Ok(Json(idents))
}

async fn log_values(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(window): Query<Window>,
) -> std::result::Result<Json<Vec<Ident>>, ErrorReply> {
    let mut it = open_stream(&state.engine, &domain, window).map_err(|err| reply_err(&err))?;
    let idents = stream::values(&mut it).map_err(|err| reply_err(&err))?;
    Ok(Json(idents))
}

async fn timeline_events(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> std::result::Result<Json<Vec<Event>>, ErrorReply> {
    let it = open_log(&state.engine, &domain).map_err(|err| reply_err(&err))?;
    let events = view::timeline(it, query.order.into()).map_err(|err| reply_err(&err))?;
    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_err_maps_status() {
        let (code, _) = reply_err(&Error::DoesNotExist {
            domain: "people".to_string(),
            name: COMMIT_LOG.to_string(),
        });
        assert_eq!(code, StatusCode::NOT_FOUND);

        let (code, _) = reply_err(&Error::io("down"));
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_order_maps_to_direction() {
        assert_eq!(Direction::from(Order::Asc), Direction::Ascending);
        assert_eq!(Direction::from(Order::Desc), Direction::Descending);
        // The surface defaults to newest-first.
        assert_eq!(Direction::from(Order::default()), Direction::Descending);
    }
}
