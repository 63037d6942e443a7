pub mod author;
pub mod book;
pub mod book_instance;
pub mod catalog;
pub mod error;
pub mod form;
pub mod genre;
pub mod views;

use axum::{Router, routing::get};

use crate::infrastructure::AppState;

/// Routes served under `/catalog`
pub fn catalog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        // Books
        .route(
            "/book/create",
            get(book::book_create_get).post(book::book_create_post),
        )
        .route(
            "/book/:id/delete",
            get(book::book_delete_get).post(book::book_delete_post),
        )
        .route(
            "/book/:id/update",
            get(book::book_update_get).post(book::book_update_post),
        )
        .route("/book/:id", get(book::book_detail))
        .route("/books", get(book::book_list))
        // Authors
        .route(
            "/author/create",
            get(author::author_create_get).post(author::author_create_post),
        )
        .route(
            "/author/:id/delete",
            get(author::author_delete_get).post(author::author_delete_post),
        )
        .route(
            "/author/:id/update",
            get(author::author_update_get).post(author::author_update_post),
        )
        .route("/author/:id", get(author::author_detail))
        .route("/authors", get(author::author_list))
        // Genres
        .route(
            "/genre/create",
            get(genre::genre_create_get).post(genre::genre_create_post),
        )
        .route(
            "/genre/:id/delete",
            get(genre::genre_delete_get).post(genre::genre_delete_post),
        )
        .route(
            "/genre/:id/update",
            get(genre::genre_update_get).post(genre::genre_update_post),
        )
        .route("/genre/:id", get(genre::genre_detail))
        .route("/genres", get(genre::genre_list))
        // Book instances
        .route(
            "/bookinstance/create",
            get(book_instance::bookinstance_create_get)
                .post(book_instance::bookinstance_create_post),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instance::bookinstance_delete_get)
                .post(book_instance::bookinstance_delete_post),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instance::bookinstance_update_get)
                .post(book_instance::bookinstance_update_post),
        )
        .route("/bookinstance/:id", get(book_instance::bookinstance_detail))
        .route("/bookinstances", get(book_instance::bookinstance_list))
}
