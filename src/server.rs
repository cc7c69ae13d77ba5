use crate::config::ScraperConfig;
use crate::delivery::{DeliveryError, SinkClient};
use crate::error::ScrapeError;
use crate::query::SearchRequest;
use crate::{ProductSearch, SearchOutcome};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

type Reply = (StatusCode, Json<Value>);

/// Shared, read-only state of the HTTP API
pub struct AppState {
    pub config: ScraperConfig,
    pub sink: Option<SinkClient>,
}

impl AppState {
    pub fn new(config: ScraperConfig) -> Result<Self, DeliveryError> {
        let sink = match &config.sink_url {
            Some(url) => Some(SinkClient::new(
                url,
                Duration::from_secs(config.sink_timeout_secs),
            )?),
            None => None,
        };
        Ok(Self { config, sink })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the search API on `config.bind_address` until the process is stopped
pub async fn serve(config: ScraperConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let bind_address = config.bind_address.clone();
    let state = Arc::new(AppState::new(config)?);
    if let Some(sink) = &state.sink {
        ::log::info!("Scraped records will be delivered to {}", sink.url());
    }

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    ::log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /search`: one scraping run per request, each with its own browser session
async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Reply {
    let Ok(Json(request)) = payload else {
        return error(StatusCode::BAD_REQUEST, "Invalid request format. Expected JSON.");
    };
    let query = match request.into_query() {
        Ok(query) => query,
        Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string()),
    };
    ::log::info!("Received request: {:?}", query);

    let outcome = ProductSearch::new(query)
        .with_config(state.config.clone())
        .run()
        .await;
    respond(outcome, state.sink.as_ref()).await
}

/// Maps a finished run, and its delivery when a sink is configured, to a reply
async fn respond(outcome: Result<SearchOutcome, ScrapeError>, sink: Option<&SinkClient>) -> Reply {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(ScrapeError::NoProducts) => return error(StatusCode::NOT_FOUND, "No products found."),
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            return error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string());
        }
    };

    let Some(sink) = sink else {
        return (
            StatusCode::OK,
            Json(json!({
                "message": "Scraping complete.",
                "search_url": outcome.search_url,
                "data": outcome.records,
            })),
        );
    };

    match sink.deliver(&outcome.records).await {
        Ok(reply) => {
            ::log::info!("Sink response: {}", reply);
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Scraping complete. Data sent to sink.",
                    "search_url": outcome.search_url,
                    "data": outcome.records,
                })),
            )
        }
        Err(DeliveryError::Rejected { status, body }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to send data to sink.",
                "status_code": status,
                "response_text": body,
            })),
        ),
        Err(e) => {
            ::log::error!("{}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

fn error(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}
