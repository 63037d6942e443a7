//! Catalog home page

use axum::{extract::State, response::Response};
use serde_json::json;

use super::error::AppError;
use crate::domain::BookStatus;
use crate::infrastructure::AppState;

/// Record counts for every collection, gathered in parallel
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let (num_books, num_instances, num_available_instances, num_authors, num_genres) = tokio::try_join!(
        state.book_repo.count(),
        state.book_instance_repo.count(None),
        state.book_instance_repo.count(Some(BookStatus::Available)),
        state.author_repo.count(),
        state.genre_repo.count()
    )?;

    Ok(state.render(
        "index",
        json!({
            "title": "Local Library Home",
            "book_count": num_books,
            "book_instance_count": num_instances,
            "book_instance_available_count": num_available_instances,
            "author_count": num_authors,
            "genre_count": num_genres,
        }),
    ))
}
