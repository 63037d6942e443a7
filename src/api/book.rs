//! Book pages

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde_json::json;

use super::error::AppError;
use super::form::{FormBody, FormData};
use super::views::{redirect, views};
use crate::domain::{
    Author, Book, BookDetail, BookInstance, BookListing, DomainError, Genre, GenreChoice,
};
use crate::infrastructure::AppState;
use crate::services::{FieldError, FieldRule, Validation};

const BOOK_LIST_URL: &str = "/catalog/books";

/// Build a book draft from a submitted form
///
/// `genre` may arrive zero, one or many times; it always ends up a list.
fn validate_book(form: &FormData) -> (Book, Vec<FieldError>) {
    let mut validation = Validation::new();

    let title = validation.field(
        &FieldRule::new("title")
            .trim()
            .escape()
            .min_length(1, "Title must not be empty."),
        form.get("title"),
    );
    let author = validation.field(
        &FieldRule::new("author")
            .trim()
            .escape()
            .min_length(1, "Author must not be empty."),
        form.get("author"),
    );
    let summary = validation.field(
        &FieldRule::new("summary")
            .trim()
            .escape()
            .min_length(1, "Summary must not be empty."),
        form.get("summary"),
    );
    let isbn = validation.field(
        &FieldRule::new("isbn")
            .trim()
            .escape()
            .min_length(1, "ISBN must not be empty."),
        form.get("isbn"),
    );
    let genre = validation.each(&FieldRule::new("genre").escape(), &form.get_all("genre"));

    let book = Book::new(title, author, summary, isbn, genre);
    (book, validation.into_errors())
}

/// Render the book form, pre-marking the draft's genres as selected
fn render_form(
    state: &AppState,
    title: &str,
    book: Option<&Book>,
    authors: &[Author],
    genres: Vec<Genre>,
    errors: &[FieldError],
) -> Response {
    let selected = book.map(|b| b.genre.as_slice()).unwrap_or_default();
    let choices = GenreChoice::mark(genres, selected);

    state.render(
        "book_form",
        json!({
            "title": title,
            "authors": views(authors, Author::to_view),
            "genres": views(&choices, GenreChoice::to_view),
            "book": book.map(Book::to_view),
            "errors": views(errors, FieldError::to_view),
        }),
    )
}

/// Re-render a rejected submission with fresh selector lists
async fn render_rejected(
    state: &AppState,
    title: &str,
    book: &Book,
    errors: &[FieldError],
) -> Result<Response, AppError> {
    let (authors, genres) = tokio::try_join!(
        state.author_repo.find_all(),
        state.genre_repo.find_all()
    )?;
    Ok(render_form(state, title, Some(book), &authors, genres, errors))
}

fn render_delete(state: &AppState, book: Option<&Book>, copies: &[BookInstance]) -> Response {
    state.render(
        "book_delete",
        json!({
            "title": "Delete Book",
            "book": book.map(Book::to_view),
            "book_instances": views(copies, BookInstance::to_view),
        }),
    )
}

/// Display list of all books
pub async fn book_list(State(state): State<AppState>) -> Result<Response, AppError> {
    let books = state.book_repo.find_all().await?;

    Ok(state.render(
        "book_list",
        json!({
            "title": "Book List",
            "book_list": views(&books, BookListing::to_view),
        }),
    ))
}

/// Display detail page for a specific book
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (detail, copies) = tokio::try_join!(
        state.book_repo.find_detail(&id),
        state.book_instance_repo.find_by_book(&id)
    )?;
    let detail: BookDetail = detail.ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(state.render(
        "book_detail",
        json!({
            "title": detail.book.title,
            "book": detail.to_view(),
            "book_instances": views(&copies, BookInstance::to_view),
        }),
    ))
}

/// Display book create form on GET
pub async fn book_create_get(State(state): State<AppState>) -> Result<Response, AppError> {
    let (authors, genres) = tokio::try_join!(
        state.author_repo.find_all(),
        state.genre_repo.find_all()
    )?;
    Ok(render_form(&state, "Create Book", None, &authors, genres, &[]))
}

/// Handle book create on POST
pub async fn book_create_post(
    State(state): State<AppState>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (book, errors) = validate_book(&form);

    if !errors.is_empty() {
        return render_rejected(&state, "Create Book", &book, &errors).await;
    }

    // The author reference is stored as given
    let book = state.book_repo.create(book).await?;
    tracing::info!("Created book {:?} ({})", book.title, book.id);
    Ok(redirect(&book.url()))
}

/// Display book delete form on GET
pub async fn book_delete_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (book, copies) = tokio::try_join!(
        state.book_repo.find_by_id(&id),
        state.book_instance_repo.find_by_book(&id)
    )?;

    let Some(book) = book else {
        return Ok(redirect(BOOK_LIST_URL));
    };

    Ok(render_delete(&state, Some(&book), &copies))
}

/// Handle book delete on POST
pub async fn book_delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (book, copies) = tokio::try_join!(
        state.book_repo.find_by_id(&id),
        state.book_instance_repo.find_by_book(&id)
    )?;

    if !copies.is_empty() {
        tracing::info!("Book {} still has {} copies, not deleting", id, copies.len());
        return Ok(render_delete(&state, book.as_ref(), &copies));
    }

    match state.book_repo.delete(&id).await {
        Ok(()) | Err(DomainError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Deleted book {}", id);
    Ok(redirect(BOOK_LIST_URL))
}

/// Display book update form on GET
pub async fn book_update_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (book, authors, genres) = tokio::try_join!(
        state.book_repo.find_by_id(&id),
        state.author_repo.find_all(),
        state.genre_repo.find_all()
    )?;
    let book = book.ok_or_else(|| AppError::not_found("Book not found"))?;

    Ok(render_form(&state, "Update Book", Some(&book), &authors, genres, &[]))
}

/// Handle book update on POST
pub async fn book_update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    FormBody(form): FormBody<FormData>,
) -> Result<Response, AppError> {
    let (mut book, errors) = validate_book(&form);
    book.id = id.clone();

    if !errors.is_empty() {
        return render_rejected(&state, "Update Book", &book, &errors).await;
    }

    let book = state
        .book_repo
        .update(&id, book)
        .await?
        .ok_or_else(|| AppError::not_found("Book not found"))?;

    tracing::info!("Updated book {}", book.id);
    Ok(redirect(&book.url()))
}
