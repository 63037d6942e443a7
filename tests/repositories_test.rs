use chrono::NaiveDate;
use local_library::db;
use local_library::domain::{Author, Book, BookInstance, BookStatus, DomainError, Genre};
use local_library::infrastructure::AppState;

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn book(title: &str, author: &str, genres: Vec<String>) -> Book {
    Book::new(
        title.into(),
        author.into(),
        format!("Summary of {}", title),
        "isbn".into(),
        genres,
    )
}

#[tokio::test]
async fn test_author_roundtrip_keeps_dates() {
    let state = setup_test_state().await;
    let author = Author::new(
        "Isaac".into(),
        "Asimov".into(),
        NaiveDate::from_ymd_opt(1920, 1, 2),
        NaiveDate::from_ymd_opt(1992, 4, 6),
    );
    let created = state.author_repo.create(author.clone()).await.unwrap();
    assert_eq!(created, author);

    let fetched = state.author_repo.find_by_id(&author.id).await.unwrap();
    assert_eq!(fetched, Some(author));
}

#[tokio::test]
async fn test_unknown_ids_are_absent_not_errors() {
    let state = setup_test_state().await;

    assert!(state.author_repo.find_by_id("???").await.unwrap().is_none());
    assert!(state.genre_repo.find_by_id("").await.unwrap().is_none());
    assert!(state.book_repo.find_detail("nope").await.unwrap().is_none());
    assert!(state.book_instance_repo.find_detail("nope").await.unwrap().is_none());
    assert!(state.book_repo.find_by_author("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_reports_not_found() {
    let state = setup_test_state().await;

    let result = state.author_repo.delete("missing").await;
    assert!(matches!(result, Err(DomainError::NotFound)));
    let result = state.book_instance_repo.delete("missing").await;
    assert!(matches!(result, Err(DomainError::NotFound)));
}

#[tokio::test]
async fn test_update_missing_returns_none() {
    let state = setup_test_state().await;

    let genre = Genre::new("Fantasy".into());
    assert!(state.genre_repo.update("missing", genre).await.unwrap().is_none());
    assert_eq!(state.genre_repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_genre_lookup_by_name_ignores_case() {
    let state = setup_test_state().await;
    let genre = state
        .genre_repo
        .create(Genre::new("Science Fiction".into()))
        .await
        .unwrap();

    let found = state.genre_repo.find_by_name("science FICTION").await.unwrap();
    assert_eq!(found.map(|g| g.id), Some(genre.id));
    assert!(state.genre_repo.find_by_name("Science").await.unwrap().is_none());
}

#[tokio::test]
async fn test_genre_lookup_folds_non_ascii_case() {
    let state = setup_test_state().await;
    let genre = state
        .genre_repo
        .create(Genre::new("Épopée".into()))
        .await
        .unwrap();

    for name in ["Épopée", "épopée", "ÉPOPÉE"] {
        let found = state.genre_repo.find_by_name(name).await.unwrap();
        assert_eq!(found.map(|g| g.id), Some(genre.id.clone()), "{}", name);
    }

    // Renaming moves the key along with the name
    state
        .genre_repo
        .update(&genre.id, Genre::new("Élégie".into()))
        .await
        .unwrap();
    assert!(state.genre_repo.find_by_name("épopée").await.unwrap().is_none());
    assert!(state.genre_repo.find_by_name("ÉLÉGIE").await.unwrap().is_some());
}

#[tokio::test]
async fn test_books_by_genre_match_whole_ids() {
    let state = setup_test_state().await;
    let short = Genre {
        id: "abc".into(),
        name: "Short".into(),
    };
    let long = Genre {
        id: "abcdef".into(),
        name: "Long".into(),
    };
    state.genre_repo.create(short.clone()).await.unwrap();
    state.genre_repo.create(long.clone()).await.unwrap();

    state
        .book_repo
        .create(book("Only long", "a1", vec![long.id.clone()]))
        .await
        .unwrap();
    state
        .book_repo
        .create(book("Both", "a1", vec![short.id.clone(), long.id.clone()]))
        .await
        .unwrap();

    let titles: Vec<_> = state
        .book_repo
        .find_by_genre(&short.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["Both"]);
    assert_eq!(state.book_repo.find_by_genre(&long.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_book_listing_resolves_author() {
    let state = setup_test_state().await;
    let author = state
        .author_repo
        .create(Author::new("Ben".into(), "Bova".into(), None, None))
        .await
        .unwrap();
    state
        .book_repo
        .create(book("Death Wave", &author.id, vec![]))
        .await
        .unwrap();
    state
        .book_repo
        .create(book("Apes and Angels", "dangling", vec![]))
        .await
        .unwrap();

    let listing = state.book_repo.find_all().await.unwrap();
    assert_eq!(listing.len(), 2);
    // Ordered by title
    assert_eq!(listing[0].title, "Apes and Angels");
    assert!(listing[0].author.is_none());
    assert_eq!(listing[1].author.as_ref().map(|a| a.name()), Some("Bova, Ben".into()));
}

#[tokio::test]
async fn test_copy_counts_by_status() {
    let state = setup_test_state().await;
    let due = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    for status in [
        BookStatus::Available,
        BookStatus::Reserved,
        BookStatus::Available,
        BookStatus::Maintenance,
    ] {
        state
            .book_instance_repo
            .create(BookInstance::new("b1".into(), "Imprint".into(), status, due))
            .await
            .unwrap();
    }

    let repo = &state.book_instance_repo;
    assert_eq!(repo.count(None).await.unwrap(), 4);
    assert_eq!(repo.count(Some(BookStatus::Available)).await.unwrap(), 2);
    assert_eq!(repo.count(Some(BookStatus::Loaned)).await.unwrap(), 0);
    assert_eq!(repo.find_by_book("b1").await.unwrap().len(), 4);

    // Copies whose book is gone still list, without a book
    let all = repo.find_all().await.unwrap();
    assert!(all.iter().all(|detail| detail.book.is_none()));
}
