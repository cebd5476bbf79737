//! Book lending endpoints
//!
//! The "as of" date for all derived fields is resolved here, at the
//! boundary (explicit `as_of` query parameter or the server clock), and
//! passed down explicitly. Nothing below this layer reads the clock.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookQuery, CreateBook},
    penalty,
};

use super::AuthenticatedUser;

/// Return response with updated book details
#[derive(serde::Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    /// Book details after the transition
    pub book: BookDetails,
}

/// List the current user's books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Books with derived status fields", body = Vec<BookDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let as_of = match query.as_of.as_deref() {
        Some(s) => penalty::parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let books = state
        .services
        .books
        .list(claims.user_id, query.filter.unwrap_or_default(), as_of)
        .await?;

    Ok(Json(books))
}

/// Record a newly lent book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book recorded", body = BookDetails),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let as_of = Utc::now().date_naive();
    let book = state
        .services
        .books
        .create(claims.user_id, request, as_of)
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Mark a book returned (one-way, stamps today's date)
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReturnResponse>> {
    let as_of = Utc::now().date_naive();
    let book = state
        .services
        .books
        .mark_returned(claims.user_id, id, as_of)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        book,
    }))
}

/// Delete a lending record
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.books.delete(claims.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
