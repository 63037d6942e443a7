use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, Set, Statement,
};

use crate::models::genre;

/// Lifetime given to the single connection of an in-memory store (a century)
const IN_MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn connect_options(database_url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    // An in-memory SQLite database lives and dies with its connection, so the
    // pool must never retire or reap it
    if database_url.contains(":memory:") {
        options
            .max_connections(1)
            .min_connections(1)
            .max_lifetime(IN_MEMORY_CONNECTION_LIFETIME)
            .idle_timeout(IN_MEMORY_CONNECTION_LIFETIME);
    }

    options
}

/// Connect to the catalog store and make sure every collection exists
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(connect_options(database_url)).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    tracing::debug!("Catalog store ready at {}", database_url);
    Ok(db)
}

/// Release the store connection pool
pub async fn close_db(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    tracing::info!("Catalog store closed");
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            family_name TEXT NOT NULL,
            date_of_birth TEXT,
            date_of_death TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    // Migration: stores created before genres carried a folded name key
    let _ = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "ALTER TABLE genres ADD COLUMN name_key TEXT NOT NULL DEFAULT ''".to_owned(),
        ))
        .await;
    backfill_genre_keys(db).await?;

    // Author and genre references are plain ids: no foreign keys
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            author_id TEXT NOT NULL,
            summary TEXT NOT NULL,
            isbn TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS book_instances (
            id TEXT PRIMARY KEY NOT NULL,
            book_id TEXT NOT NULL,
            imprint TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Maintenance',
            due_back TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)".to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_book_instances_book_id ON book_instances(book_id)"
            .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "CREATE INDEX IF NOT EXISTS idx_genres_name_key ON genres(name_key)".to_owned(),
    ))
    .await?;

    Ok(())
}

/// Fill in the folded key of genres stored without one
async fn backfill_genre_keys(db: &DatabaseConnection) -> Result<(), DbErr> {
    let missing = genre::Entity::find()
        .filter(genre::Column::NameKey.eq(""))
        .all(db)
        .await?;

    for model in missing {
        let key = genre::name_key(&model.name);
        let mut active: genre::ActiveModel = model.into();
        active.name_key = Set(key);
        active.update(db).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenreRepository;
    use crate::infrastructure::SeaOrmGenreRepository;

    #[test]
    fn test_in_memory_connection_is_never_retired() {
        let options = connect_options("sqlite::memory:");
        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_max_lifetime(), Some(IN_MEMORY_CONNECTION_LIFETIME));
        assert_eq!(options.get_idle_timeout(), Some(IN_MEMORY_CONNECTION_LIFETIME));
    }

    #[test]
    fn test_file_store_keeps_pool_defaults() {
        let options = connect_options("sqlite://local_library.db?mode=rwc");
        assert_eq!(options.get_max_lifetime(), None);
        assert_eq!(options.get_idle_timeout(), None);
    }

    #[tokio::test]
    async fn test_migrations_backfill_missing_genre_keys() {
        let db = init_db("sqlite::memory:").await.unwrap();
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "INSERT INTO genres (id, name, name_key, created_at, updated_at) \
             VALUES ('g1', 'Épopée', '', 'now', 'now')"
                .to_owned(),
        ))
        .await
        .unwrap();

        run_migrations(&db).await.unwrap();

        let repo = SeaOrmGenreRepository::new(db);
        let found = repo.find_by_name("ÉPOPÉE").await.unwrap();
        assert_eq!(found.map(|g| g.id), Some("g1".to_string()));
    }
}
