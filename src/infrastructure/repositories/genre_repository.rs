//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, Genre, GenreRepository};
use crate::models::genre::{ActiveModel, Column, Entity as GenreEntity, name_key};

/// SeaORM-based implementation of GenreRepository
pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let genres = GenreEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(genres.into_iter().map(Genre::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find_by_id(id.to_owned()).one(&self.db).await?;
        Ok(genre.map(Genre::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        let genre = GenreEntity::find()
            .filter(Column::NameKey.eq(name_key(name)))
            .order_by_asc(Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(genre.map(Genre::from))
    }

    async fn create(&self, genre: Genre) -> Result<Genre, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ActiveModel {
            id: Set(genre.id),
            name_key: Set(name_key(&genre.name)),
            name: Set(genre.name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await?;
        tracing::debug!("Inserted genre {}", result.id);
        Ok(Genre::from(result))
    }

    async fn update(&self, id: &str, genre: Genre) -> Result<Option<Genre>, DomainError> {
        let Some(existing) = GenreEntity::find_by_id(id.to_owned()).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.name_key = Set(name_key(&genre.name));
        active.name = Set(genre.name);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        Ok(Some(Genre::from(result)))
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = GenreEntity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(GenreEntity::find().count(&self.db).await?)
    }
}
