//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};

use crate::domain::{Author, AuthorRepository, DomainError};
use crate::models::author::{ActiveModel, Column, Entity as AuthorEntity};
use crate::models::format_date;

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(Column::FamilyName)
            .all(&self.db)
            .await?;

        Ok(authors.into_iter().map(Author::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Author>, DomainError> {
        let author = AuthorEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(author.map(Author::from))
    }

    async fn create(&self, author: Author) -> Result<Author, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            id: Set(author.id),
            first_name: Set(author.first_name),
            family_name: Set(author.family_name),
            date_of_birth: Set(author.date_of_birth.map(format_date)),
            date_of_death: Set(author.date_of_death.map(format_date)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        tracing::debug!("Inserted author {}", result.id);
        Ok(Author::from(result))
    }

    async fn update(&self, id: &str, author: Author) -> Result<Option<Author>, DomainError> {
        let Some(existing) = AuthorEntity::find_by_id(id.to_owned()).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.first_name = Set(author.first_name);
        active.family_name = Set(author.family_name);
        active.date_of_birth = Set(author.date_of_birth.map(format_date));
        active.date_of_death = Set(author.date_of_death.map(format_date));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Some(Author::from(result)))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = AuthorEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(AuthorEntity::find().count(&self.db).await?)
    }
}
