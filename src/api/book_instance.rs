//! Book instance (physical copy) pages

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;

use super::error::AppError;
use super::form::{FormBody, FormData};
use super::views::{redirect, views};
use crate::domain::{BookInstance, BookInstanceDetail, BookStatus, BookSummary, DomainError};
use crate::infrastructure::AppState;
use crate::services::{FieldError, FieldRule, Validation};

const BOOK_INSTANCE_LIST_URL: &str = "/catalog/bookinstances";

/// Build a copy draft from a submitted form
///
/// A blank status means Maintenance and a blank due date means today.
fn validate_book_instance(form: &FormData) -> (BookInstance, Vec<FieldError>) {
    let mut validation = Validation::new();

    let book = validation.field(
        &FieldRule::new("book")
            .trim()
            .escape()
            .min_length(1, "Book must be specified"),
        form.get("book"),
    );
    let imprint = validation.field(
        &FieldRule::new("imprint")
            .trim()
            .escape()
            .min_length(1, "Imprint must be specified"),
        form.get("imprint"),
    );
    let status = validation.field(
        &FieldRule::new("status")
            .optional()
            .trim()
            .escape()
            .one_of(BookStatus::names(), "Invalid status"),
        form.get("status"),
    );
    let due_back = validation.date(
        &FieldRule::new("due_back")
            .optional()
            .trim()
            .iso8601("Invalid date"),
        form.get("due_back"),
    );

    let instance = BookInstance::new(
        book,
        imprint,
        status.parse().unwrap_or_default(),
        due_back.unwrap_or_else(|| chrono::Local::now().date_naive()),
    );
    (instance, validation.into_errors())
}

fn render_form(
    state: &AppState,
    title: &str,
    instance: Option<&BookInstance>,
    books: &[BookSummary],
    errors: &[FieldError],
) -> Response {
    state.render(
        "bookinstance_form",
        json!({
            "title": title,
            "book_list": views(books, BookSummary::to_view),
            "selected_book": instance.map(|i| i.book.clone()),
            "statuses": BookStatus::names(),
            "bookinstance": instance.map(BookInstance::to_view),
            "errors": views(errors, FieldError::to_view),
        }),
    )
}

/// Display list of all book copies
pub async fn bookinstance_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let copies = state.book_instance_repo.find_all().await?;

    Ok(state.render(
        "bookinstance_list",
        json!({
            "title": "Book Instance List",
            "bookinstance_list": views(&copies, BookInstanceDetail::to_view),
        }),
    ))
}

/// Display detail page for a specific copy
pub async fn bookinstance_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let detail = state
        .book_instance_repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;

    let title = match &detail.book {
        Some(book) => format!("Copy: {}", book.title),
        None => "Book Instance Detail".to_string(),
    };

    Ok(state.render(
        "bookinstance_detail",
        json!({
            "title": title,
            "bookinstance": detail.to_view(),
        }),
    ))
}

/// Display copy create form on GET
pub async fn bookinstance_create_get(State(state): State<AppState>) -> Result<Response, AppError> {
    let books = state.book_repo.find_summaries().await?;
    Ok(render_form(&state, "Create BookInstance", None, &books, &[]))
}

/// Handle copy create on POST
pub async fn bookinstance_create_post(
    State(state): State<AppState>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (instance, errors) = validate_book_instance(&form);

    if !errors.is_empty() {
        let books = state.book_repo.find_summaries().await?;
        return Ok(render_form(
            &state,
            "Create BookInstance",
            Some(&instance),
            &books,
            &errors,
        ));
    }

    let instance = state.book_instance_repo.create(instance).await?;
    tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
    Ok(redirect(&instance.url()))
}

/// Display copy delete form on GET
pub async fn bookinstance_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(detail) = state.book_instance_repo.find_detail(&id).await? else {
        return Ok(redirect(BOOK_INSTANCE_LIST_URL));
    };

    Ok(state.render(
        "bookinstance_delete",
        json!({
            "title": "Delete BookInstance",
            "bookinstance": detail.to_view(),
        }),
    ))
}

/// Handle copy delete on POST
///
/// Nothing references a copy, so there is never anything blocking.
pub async fn bookinstance_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match state.book_instance_repo.delete(&id).await {
        Ok(()) | Err(DomainError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Deleted book instance {}", id);
    Ok(redirect(BOOK_INSTANCE_LIST_URL))
}

/// Display copy update form on GET
pub async fn bookinstance_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (instance, books) = tokio::try_join!(
        state.book_instance_repo.find_by_id(&id),
        state.book_repo.find_summaries()
    )?;
    let instance = instance.ok_or_else(|| AppError::not_found("Book copy not found"))?;

    Ok(render_form(
        &state,
        "Update BookInstance",
        Some(&instance),
        &books,
        &[],
    ))
}

/// Handle copy update on POST
pub async fn bookinstance_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (mut instance, errors) = validate_book_instance(&form);
    instance.id = id.clone();

    if !errors.is_empty() {
        let books = state.book_repo.find_summaries().await?;
        return Ok(render_form(
            &state,
            "Update BookInstance",
            Some(&instance),
            &books,
            &errors,
        ));
    }

    let instance = state
        .book_instance_repo
        .update(&id, instance)
        .await?
        .ok_or_else(|| AppError::not_found("Book copy not found"))?;

    tracing::info!("Updated book instance {}", instance.id);
    Ok(redirect(&instance.url()))
}
