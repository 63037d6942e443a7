//! SeaORM implementation of BookInstanceRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{
    BookInstance, BookInstanceDetail, BookInstanceRepository, BookStatus, BookSummary,
    DomainError,
};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::book_instance::{ActiveModel, Column, Entity as BookInstanceEntity, Model};
use crate::models::format_date;

fn to_detail(instance: Model, book: Option<book::Model>) -> BookInstanceDetail {
    BookInstanceDetail {
        instance: BookInstance::from(instance),
        book: book.map(|b| BookSummary {
            id: b.id,
            title: b.title,
            summary: b.summary,
        }),
    }
}

/// SeaORM-based implementation of BookInstanceRepository
pub struct SeaOrmBookInstanceRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookInstanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookInstanceRepository for SeaOrmBookInstanceRepository {
    async fn find_all(&self) -> Result<Vec<BookInstanceDetail>, DomainError> {
        let copies = BookInstanceEntity::find()
            .order_by_asc(Column::Imprint)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        Ok(copies
            .into_iter()
            .map(|(copy, book)| to_detail(copy, book))
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BookInstance>, DomainError> {
        let copy = BookInstanceEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?;
        Ok(copy.map(BookInstance::from))
    }

    async fn find_detail(&self, id: &str) -> Result<Option<BookInstanceDetail>, DomainError> {
        let result = BookInstanceEntity::find_by_id(id.to_owned())
            .find_also_related(BookEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(|(copy, book)| to_detail(copy, book)))
    }

    async fn find_by_book(&self, book_id: &str) -> Result<Vec<BookInstance>, DomainError> {
        let copies = BookInstanceEntity::find()
            .filter(Column::BookId.eq(book_id))
            .order_by_asc(Column::Imprint)
            .all(&self.db)
            .await?;

        Ok(copies.into_iter().map(BookInstance::from).collect())
    }

    async fn create(&self, instance: BookInstance) -> Result<BookInstance, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            id: Set(instance.id),
            book_id: Set(instance.book),
            imprint: Set(instance.imprint),
            status: Set(instance.status.to_string()),
            due_back: Set(format_date(instance.due_back)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        tracing::debug!("Inserted book instance {}", result.id);
        Ok(BookInstance::from(result))
    }

    async fn update(
        &self,
        id: &str,
        instance: BookInstance,
    ) -> Result<Option<BookInstance>, DomainError> {
        let Some(existing) = BookInstanceEntity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.book_id = Set(instance.book);
        active.imprint = Set(instance.imprint);
        active.status = Set(instance.status.to_string());
        active.due_back = Set(format_date(instance.due_back));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Some(BookInstance::from(result)))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = BookInstanceEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count(&self, status: Option<BookStatus>) -> Result<u64, DomainError> {
        let mut query = BookInstanceEntity::find();
        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }
        Ok(query.count(&self.db).await?)
    }
}
