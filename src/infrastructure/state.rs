//! Application state containing repositories and shared resources

use axum::response::Response;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;

use crate::api::views::{JsonRenderer, Renderer};
use crate::domain::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::infrastructure::{
    SeaOrmAuthorRepository, SeaOrmBookInstanceRepository, SeaOrmBookRepository,
    SeaOrmGenreRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Store connection the repositories share
    db: DatabaseConnection,
    /// Author repository
    pub author_repo: Arc<dyn AuthorRepository>,
    /// Genre repository
    pub genre_repo: Arc<dyn GenreRepository>,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Book instance (copy) repository
    pub book_instance_repo: Arc<dyn BookInstanceRepository>,
    /// Presentation layer
    pub renderer: Arc<dyn Renderer>,
    /// Expose fault details on error pages
    pub development: bool,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let author_repo = Arc::new(SeaOrmAuthorRepository::new(db.clone()));
        let genre_repo = Arc::new(SeaOrmGenreRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let book_instance_repo = Arc::new(SeaOrmBookInstanceRepository::new(db.clone()));

        Self {
            db,
            author_repo,
            genre_repo,
            book_repo,
            book_instance_repo,
            renderer: Arc::new(JsonRenderer),
            development: false,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Get the store connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Render a view through the configured presentation layer
    pub fn render(&self, view: &str, data: Value) -> Response {
        self.renderer.render(view, data)
    }
}
