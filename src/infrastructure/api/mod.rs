//! HTTP surface over the bucket store

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Form, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::traits::BucketStore;

const NOT_ACCEPTABLE: &str = "Not Acceptable";

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn BucketStore>,
}

/// Form body of `POST /{bucket}`
#[derive(Debug, Deserialize)]
pub struct AddQuote {
    pub quote: Option<String>,
}

/// Greeting plus the known buckets
async fn index_handler(State(state): State<ApiState>) -> (StatusCode, String) {
    match state.store.bucket_names().await {
        Ok(names) => {
            let mut body = String::from("Hello!\n");
            for name in names {
                let _ = writeln!(body, "{}", name);
            }
            (StatusCode::OK, body)
        }
        Err(e) => {
            tracing::warn!("Listing buckets failed: {}", e);
            (StatusCode::NOT_ACCEPTABLE, NOT_ACCEPTABLE.to_string())
        }
    }
}

async fn get_quote_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> (StatusCode, String) {
    let mut rng = StdRng::from_entropy();
    match state.store.pick_random(&name, &mut rng).await {
        Ok(quote) if quote.is_empty() => (StatusCode::NOT_FOUND, "Not Found".to_string()),
        Ok(quote) => (StatusCode::OK, quote.into_string()),
        Err(e) => {
            tracing::warn!("GET /{} failed: {}", name, e);
            (StatusCode::NOT_ACCEPTABLE, NOT_ACCEPTABLE.to_string())
        }
    }
}

async fn add_quote_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Form(form): Form<AddQuote>,
) -> (StatusCode, String) {
    let quote = match form.quote {
        Some(quote) if !quote.is_empty() => quote,
        _ => return (StatusCode::BAD_REQUEST, "Missing quote".to_string()),
    };

    match state.store.append(&name, &quote).await {
        Ok(()) => {
            tracing::info!("Added quote to bucket '{}' over HTTP", name);
            (StatusCode::OK, "Danke".to_string())
        }
        Err(e) => {
            tracing::warn!("POST /{} failed: {}", name, e);
            (StatusCode::NOT_ACCEPTABLE, NOT_ACCEPTABLE.to_string())
        }
    }
}

/// Zero-based numbered listing, one quote per line
async fn all_quotes_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> (StatusCode, String) {
    match state.store.read_all(&name).await {
        Ok(quotes) => {
            let mut body = String::new();
            for (i, quote) in quotes.iter().enumerate() {
                let _ = writeln!(body, "{}. {}", i, quote);
            }
            (StatusCode::OK, body)
        }
        Err(e) => {
            tracing::warn!("GET /{}/all failed: {}", name, e);
            (StatusCode::NOT_ACCEPTABLE, NOT_ACCEPTABLE.to_string())
        }
    }
}

/// Create the HTTP router
pub fn create_router(store: Arc<dyn BucketStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/:name", get(get_quote_handler).post(add_quote_handler))
        .route("/:name/all", get(all_quotes_handler))
        .with_state(ApiState { store })
}

/// Start the HTTP server
pub async fn serve(store: Arc<dyn BucketStore>, bind: &str) -> Result<(), BotError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| BotError::Transport(format!("Cannot bind {}: {}", bind, e)))?;

    tracing::info!("HTTP API listening on {}", bind);

    axum::serve(listener, create_router(store))
        .await
        .map_err(|e| BotError::Transport(e.to_string()))
}
