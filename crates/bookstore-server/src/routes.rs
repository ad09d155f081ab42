//! HTTP routes for the catalog.
//!
//! Request values are validated before a pooled connection is checked out,
//! so malformed input is rejected even when the database is unavailable.

use crate::error::{ApiError, ApiResult};
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use bookstore::{Book, BookFilter, BookInput, Pool, parse_id, parse_limit, ping};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
}

pub fn create_router(pool: Pool) -> Router {
    let api = Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/search", get(search_books))
        .route("/books/featured", get(featured_books))
        .route("/books/new", get(new_books))
        .route("/books/discounted", get(discounted_books))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/categories", get(list_categories));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pool })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    year: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let result = match state.pool.get().await {
        Ok(client) => ping(&client).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "healthy" }))),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "message": "Unhealthy", "error": e.to_string() })),
            )
        }
    }
}

async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Book>>> {
    let filter = BookFilter::parse(params.year.as_deref(), params.category.as_deref())?;
    let client = state.pool.get().await?;
    Ok(Json(Book::fetch_filtered(&client, &filter).await?))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Book>> {
    let id = parse_id(&id)?;
    let client = state.pool.get().await?;
    Ok(Json(Book::fetch_by_id(&client, id).await?))
}

async fn create_book(
    State(state): State<AppState>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(input) = body?;
    let client = state.pool.get().await?;
    let book = input.insert(&client).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let client = state.pool.get().await?;
    Ok(Json(input.update_by_id(&client, id).await?))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id)?;
    let client = state.pool.get().await?;
    Book::delete_by_id(&client, id).await?;
    Ok(Json(json!({ "message": "book deleted successfully" })))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let client = state.pool.get().await?;
    Ok(Json(Book::categories(&client).await?))
}

async fn search_books(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Book>>> {
    let term = params.q.unwrap_or_default();
    if term.trim().is_empty() {
        return Err(ApiError::bad_request("Search query 'q' is required"));
    }
    let client = state.pool.get().await?;
    Ok(Json(Book::search(&client, &term).await?))
}

async fn featured_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    let client = state.pool.get().await?;
    Ok(Json(Book::featured(&client).await?))
}

async fn new_books(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> ApiResult<Json<Vec<Book>>> {
    let limit = parse_limit(params.limit.as_deref())?;
    let client = state.pool.get().await?;
    Ok(Json(Book::newest(&client, limit).await?))
}

async fn discounted_books(State(state): State<AppState>) -> ApiResult<Json<Vec<Book>>> {
    let client = state.pool.get().await?;
    Ok(Json(Book::discounted(&client).await?))
}
