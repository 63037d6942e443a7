//! Author pages

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;

use super::error::AppError;
use super::form::{FormBody, FormData};
use super::views::{redirect, views};
use crate::domain::{Author, BookSummary, DomainError};
use crate::infrastructure::AppState;
use crate::services::{FieldError, FieldRule, Validation};

const AUTHOR_LIST_URL: &str = "/catalog/authors";

/// Build an author draft from a submitted form
fn validate_author(form: &FormData) -> (Author, Vec<FieldError>) {
    let mut validation = Validation::new();

    let first_name = validation.field(
        &FieldRule::new("first_name")
            .trim()
            .escape()
            .min_length(1, "First name must be specified")
            .alphanumeric("First name has non-alphanumeric characters."),
        form.get("first_name"),
    );
    let family_name = validation.field(
        &FieldRule::new("family_name")
            .trim()
            .escape()
            .min_length(1, "Family name must be specified")
            .alphanumeric("Family name has non-alphanumeric characters"),
        form.get("family_name"),
    );
    let date_of_birth = validation.date(
        &FieldRule::new("date_of_birth")
            .optional()
            .trim()
            .iso8601("Invalid date of birth"),
        form.get("date_of_birth"),
    );
    let date_of_death = validation.date(
        &FieldRule::new("date_of_death")
            .optional()
            .trim()
            .iso8601("Invalid date of death"),
        form.get("date_of_death"),
    );

    let author = Author::new(first_name, family_name, date_of_birth, date_of_death);
    (author, validation.into_errors())
}

fn render_form(state: &AppState, title: &str, author: &Author, errors: &[FieldError]) -> Response {
    state.render(
        "author_form",
        json!({
            "title": title,
            "author": author.to_view(),
            "errors": views(errors, FieldError::to_view),
        }),
    )
}

fn render_delete(state: &AppState, author: Option<&Author>, books: &[BookSummary]) -> Response {
    state.render(
        "author_delete",
        json!({
            "title": "Delete Author",
            "author": author.map(Author::to_view),
            "author_books": views(books, BookSummary::to_view),
        }),
    )
}

/// Display list of all authors
pub async fn author_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let authors = state.author_repo.find_all().await?;

    Ok(state.render(
        "author_list",
        json!({
            "title": "Author List",
            "author_list": views(&authors, Author::to_view),
        }),
    ))
}

/// Display detail page for a specific author
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(&id),
        state.book_repo.find_by_author(&id)
    )?;
    let author = author.ok_or_else(|| AppError::not_found("Author not found"))?;

    Ok(state.render(
        "author_detail",
        json!({
            "title": "Author Detail",
            "author": author.to_view(),
            "author_books": views(&books, BookSummary::to_view),
        }),
    ))
}

/// Display Author create form on GET
pub async fn author_create_get(State(state): State<AppState>) -> Response {
    state.render("author_form", json!({ "title": "Create Author" }))
}

/// Handle Author create on POST
pub async fn author_create_post(
    State(state): State<AppState>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (author, errors) = validate_author(&form);

    if !errors.is_empty() {
        return Ok(render_form(&state, "Create Author", &author, &errors));
    }

    let author = state.author_repo.create(author).await?;
    tracing::info!("Created author {} ({})", author.name(), author.id);
    Ok(redirect(&author.url()))
}

/// Display Author delete form on GET
pub async fn author_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(&id),
        state.book_repo.find_by_author(&id)
    )?;

    // Nothing to delete
    let Some(author) = author else {
        return Ok(redirect(AUTHOR_LIST_URL));
    };

    Ok(render_delete(&state, Some(&author), &books))
}

/// Handle Author delete on POST
pub async fn author_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (author, books) = tokio::try_join!(
        state.author_repo.find_by_id(&id),
        state.book_repo.find_by_author(&id)
    )?;

    if !books.is_empty() {
        tracing::info!("Author {} still has {} books, not deleting", id, books.len());
        return Ok(render_delete(&state, author.as_ref(), &books));
    }

    match state.author_repo.delete(&id).await {
        // Idempotent delete
        Ok(()) | Err(DomainError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Deleted author {}", id);
    Ok(redirect(AUTHOR_LIST_URL))
}

/// Display Author update form on GET
pub async fn author_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let author = state
        .author_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    Ok(render_form(&state, "Update Author", &author, &[]))
}

/// Handle Author update on POST
pub async fn author_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (mut author, errors) = validate_author(&form);
    author.id = id.clone();

    if !errors.is_empty() {
        return Ok(render_form(&state, "Update Author", &author, &errors));
    }

    let author = state
        .author_repo
        .update(&id, author)
        .await?
        .ok_or_else(|| AppError::not_found("Author not found"))?;

    tracing::info!("Updated author {}", author.id);
    Ok(redirect(&author.url()))
}
