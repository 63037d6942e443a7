//! Demo catalog used by `SEED_DEMO`

use chrono::NaiveDate;

use crate::domain::{Author, Book, BookInstance, BookStatus, DomainError, Genre};
use crate::infrastructure::AppState;
use crate::services::validation::escape;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Fill an empty catalog with a handful of authors, genres, books and copies
///
/// Does nothing when the catalog already holds authors. Text is escaped the
/// same way form input is before it is stored.
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if state.author_repo.count().await? > 0 {
        tracing::info!("Catalog already has authors, skipping demo data");
        return Ok(());
    }

    // 1. Authors
    let mut authors = Vec::new();
    for (first, family, born, died) in [
        ("Patrick", "Rothfuss", date(1973, 6, 6), None),
        ("Ben", "Bova", date(1932, 11, 8), None),
        ("Isaac", "Asimov", date(1920, 1, 2), date(1992, 4, 6)),
        ("Bob", "Billings", None, None),
        ("Jim", "Jones", date(1971, 12, 16), None),
    ] {
        let author = Author::new(escape(first), escape(family), born, died);
        authors.push(state.author_repo.create(author).await?);
    }

    // 2. Genres
    let mut genres = Vec::new();
    for name in ["Fantasy", "Science Fiction", "French Poetry"] {
        genres.push(state.genre_repo.create(Genre::new(escape(name))).await?);
    }

    // 3. Books
    let books_data = [
        ("The Name of the Wind (The Kingkiller Chronicle, #1)", 0, "9781473211896", vec![0]),
        ("The Wise Man's Fear (The Kingkiller Chronicle, #2)", 0, "9788401352836", vec![0]),
        ("The Slow Regard of Silent Things (Kingkiller Chronicle)", 0, "9780756411336", vec![0]),
        ("Apes and Angels", 1, "9780765379528", vec![1]),
        ("Death Wave", 1, "9780765379504", vec![1]),
        ("Test Book 1", 4, "ISBN111111", vec![0, 1]),
        ("Test Book 2", 4, "ISBN222222", vec![]),
    ];

    let mut books = Vec::new();
    for (title, author, isbn, genre_idx) in books_data {
        let book = Book::new(
            escape(title),
            authors[author].id.clone(),
            escape(&format!("Summary of {}", title)),
            escape(isbn),
            genre_idx.iter().map(|&i| genres[i].id.clone()).collect(),
        );
        books.push(state.book_repo.create(book).await?);
    }

    // 4. Copies
    let today = chrono::Local::now().date_naive();
    let copies = [
        (0, "London Gollancz, 2014.", BookStatus::Available),
        (1, "Gollancz, 2011.", BookStatus::Loaned),
        (2, "Gollancz, 2015.", BookStatus::Available),
        (3, "New York Tom Doherty Associates, 2016.", BookStatus::Available),
        (3, "New York Tom Doherty Associates, 2016.", BookStatus::Available),
        (4, "New York, NY Tom Doherty Associates, LLC, 2015.", BookStatus::Available),
        (4, "New York, NY Tom Doherty Associates, LLC, 2015.", BookStatus::Maintenance),
        (5, "Imprint XXX2", BookStatus::Loaned),
        (6, "Imprint XXX3", BookStatus::Reserved),
    ];
    for &(book, imprint, status) in &copies {
        let copy = BookInstance::new(books[book].id.clone(), escape(imprint), status, today);
        state.book_instance_repo.create(copy).await?;
    }

    tracing::info!(
        "Seeded {} authors, {} genres, {} books and {} copies",
        authors.len(),
        genres.len(),
        books.len(),
        copies.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;

    #[tokio::test]
    async fn test_seed_fills_empty_catalog_once() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let state = AppState::new(db);

        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.author_repo.count().await.unwrap(), 5);
        assert_eq!(state.genre_repo.count().await.unwrap(), 3);
        assert_eq!(state.book_repo.count().await.unwrap(), 7);
        assert_eq!(state.book_instance_repo.count(None).await.unwrap(), 9);
        assert_eq!(
            state
                .book_instance_repo
                .count(Some(BookStatus::Available))
                .await
                .unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn test_seeded_text_is_stored_escaped() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let state = AppState::new(db);
        seed_demo_data(&state).await.unwrap();

        let titles: Vec<_> = state
            .book_repo
            .find_summaries()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert!(titles.contains(&"The Wise Man&#x27;s Fear (The Kingkiller Chronicle, #2)".to_string()));
        assert!(titles.iter().all(|t| !t.contains('\'')));
    }
}
