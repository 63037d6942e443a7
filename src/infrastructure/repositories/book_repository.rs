//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::domain::{
    Author, Book, BookDetail, BookListing, BookRepository, BookSummary, DomainError, Genre,
};
use crate::models::author::Entity as AuthorEntity;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity, decode_genres};
use crate::models::genre::{Column as GenreColumn, Entity as GenreEntity};

/// Title/summary projection row
#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: String,
    title: String,
    summary: String,
    genre: String,
}

impl From<SummaryRow> for BookSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            summary: row.summary,
        }
    }
}

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn summaries(&self, query: Select<BookEntity>) -> Result<Vec<SummaryRow>, DomainError> {
        let rows = query
            .select_only()
            .column(Column::Id)
            .column(Column::Title)
            .column(Column::Summary)
            .column(Column::Genre)
            .order_by_asc(Column::Title)
            .into_model::<SummaryRow>()
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    fn to_active_model(book: Book) -> Result<ActiveModel, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        Ok(ActiveModel {
            id: Set(book.id),
            title: Set(book.title),
            author_id: Set(book.author),
            summary: Set(book.summary),
            isbn: Set(book.isbn),
            genre: Set(serde_json::to_string(&book.genre)?),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        })
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<BookListing>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .find_also_related(AuthorEntity)
            .all(&self.db)
            .await?;

        Ok(books
            .into_iter()
            .map(|(book, author)| BookListing {
                id: book.id,
                title: book.title,
                author: author.map(Author::from),
            })
            .collect())
    }

    async fn find_summaries(&self) -> Result<Vec<BookSummary>, DomainError> {
        let rows = self.summaries(BookEntity::find()).await?;
        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn find_detail(&self, id: &str) -> Result<Option<BookDetail>, DomainError> {
        let Some((book, author)) = BookEntity::find_by_id(id.to_owned())
            .find_also_related(AuthorEntity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let book = Book::from(book);
        let genres = if book.genre.is_empty() {
            Vec::new()
        } else {
            GenreEntity::find()
                .filter(GenreColumn::Id.is_in(book.genre.clone()))
                .order_by_asc(GenreColumn::Name)
                .all(&self.db)
                .await?
                .into_iter()
                .map(Genre::from)
                .collect()
        };

        Ok(Some(BookDetail {
            book,
            author: author.map(Author::from),
            genres,
        }))
    }

    async fn find_by_author(&self, author_id: &str) -> Result<Vec<BookSummary>, DomainError> {
        let rows = self
            .summaries(BookEntity::find().filter(Column::AuthorId.eq(author_id)))
            .await?;
        Ok(rows.into_iter().map(BookSummary::from).collect())
    }

    async fn find_by_genre(&self, genre_id: &str) -> Result<Vec<BookSummary>, DomainError> {
        // LIKE narrows the candidates; the decoded id list decides
        let needle = serde_json::to_string(genre_id)?;
        let rows = self
            .summaries(BookEntity::find().filter(Column::Genre.contains(needle)))
            .await?;

        Ok(rows
            .into_iter()
            .filter(|row| decode_genres(&row.genre).iter().any(|id| id == genre_id))
            .map(BookSummary::from)
            .collect())
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let model = Self::to_active_model(book)?;
        let result = model.insert(&self.db).await?;
        tracing::debug!("Inserted book {}", result.id);
        Ok(Book::from(result))
    }

    async fn update(&self, id: &str, book: Book) -> Result<Option<Book>, DomainError> {
        let Some(existing) = BookEntity::find_by_id(id.to_owned()).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.title = Set(book.title);
        active.author_id = Set(book.author);
        active.summary = Set(book.summary);
        active.isbn = Set(book.isbn);
        active.genre = Set(serde_json::to_string(&book.genre)?);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Some(Book::from(result)))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(BookEntity::find().count(&self.db).await?)
    }
}
