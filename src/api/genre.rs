//! Genre pages

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;

use super::error::AppError;
use super::form::{FormBody, FormData};
use super::views::{redirect, views};
use crate::domain::{BookSummary, DomainError, Genre};
use crate::infrastructure::AppState;
use crate::services::{FieldError, FieldRule, Validation};

const GENRE_LIST_URL: &str = "/catalog/genres";

fn validate_genre(form: &FormData) -> (Genre, Vec<FieldError>) {
    let mut validation = Validation::new();
    let name = validation.field(
        &FieldRule::new("name")
            .trim()
            .escape()
            .min_length(3, "Genre name must contain at least 3 characters"),
        form.get("name"),
    );
    (Genre::new(name), validation.into_errors())
}

fn render_form(state: &AppState, title: &str, genre: &Genre, errors: &[FieldError]) -> Response {
    state.render(
        "genre_form",
        json!({
            "title": title,
            "genre": genre.to_view(),
            "errors": views(errors, FieldError::to_view),
        }),
    )
}

fn render_delete(state: &AppState, genre: Option<&Genre>, books: &[BookSummary]) -> Response {
    state.render(
        "genre_delete",
        json!({
            "title": "Delete Genre",
            "genre": genre.map(Genre::to_view),
            "genre_books": views(books, BookSummary::to_view),
        }),
    )
}

/// Display list of all genres
pub async fn genre_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let genres = state.genre_repo.find_all().await?;

    Ok(state.render(
        "genre_list",
        json!({
            "title": "Genre List",
            "genre_list": views(&genres, Genre::to_view),
        }),
    ))
}

/// Display detail page for a specific genre
pub async fn genre_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(&id),
        state.book_repo.find_by_genre(&id)
    )?;
    let genre = genre.ok_or_else(|| AppError::not_found("Genre not found"))?;

    Ok(state.render(
        "genre_detail",
        json!({
            "title": "Genre Detail",
            "genre": genre.to_view(),
            "genre_books": views(&books, BookSummary::to_view),
        }),
    ))
}

/// Display Genre create form on GET
pub async fn genre_create_get(State(state): State<AppState>) -> Response {
    state.render("genre_form", json!({ "title": "Create Genre" }))
}

/// Handle Genre create on POST
///
/// A genre whose name matches an existing one case-insensitively is not
/// created again; the existing genre's page is shown instead.
pub async fn genre_create_post(
    State(state): State<AppState>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (genre, errors) = validate_genre(&form);

    if !errors.is_empty() {
        return Ok(render_form(&state, "Create Genre", &genre, &errors));
    }

    if let Some(existing) = state.genre_repo.find_by_name(&genre.name).await? {
        tracing::info!("Genre {:?} already exists as {}", genre.name, existing.id);
        return Ok(redirect(&existing.url()));
    }

    let genre = state.genre_repo.create(genre).await?;
    tracing::info!("Created genre {:?} ({})", genre.name, genre.id);
    Ok(redirect(&genre.url()))
}

/// Display Genre delete form on GET
pub async fn genre_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(&id),
        state.book_repo.find_by_genre(&id)
    )?;

    let Some(genre) = genre else {
        return Ok(redirect(GENRE_LIST_URL));
    };

    Ok(render_delete(&state, Some(&genre), &books))
}

/// Handle Genre delete on POST
pub async fn genre_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (genre, books) = tokio::try_join!(
        state.genre_repo.find_by_id(&id),
        state.book_repo.find_by_genre(&id)
    )?;

    if !books.is_empty() {
        tracing::info!("Genre {} still has {} books, not deleting", id, books.len());
        return Ok(render_delete(&state, genre.as_ref(), &books));
    }

    match state.genre_repo.delete(&id).await {
        Ok(()) | Err(DomainError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Deleted genre {}", id);
    Ok(redirect(GENRE_LIST_URL))
}

/// Display Genre update form on GET
pub async fn genre_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let genre = state
        .genre_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    Ok(render_form(&state, "Update Genre", &genre, &[]))
}

/// Handle Genre update on POST
pub async fn genre_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (mut genre, errors) = validate_genre(&form);
    genre.id = id.clone();

    if !errors.is_empty() {
        return Ok(render_form(&state, "Update Genre", &genre, &errors));
    }

    let genre = state
        .genre_repo
        .update(&id, genre)
        .await?
        .ok_or_else(|| AppError::not_found("Genre not found"))?;

    tracing::info!("Updated genre {}", genre.id);
    Ok(redirect(&genre.url()))
}
