//! Catalog entities and the view models handlers hand to the presentation layer
//!
//! Every record receives its identity when it is constructed, so a draft built
//! from a form already knows the URL it will live at once persisted.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::{Value, json};

/// Generate a fresh opaque record identity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn iso_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn new(
        first_name: String,
        family_name: String,
        date_of_birth: Option<NaiveDate>,
        date_of_death: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: new_id(),
            first_name,
            family_name,
            date_of_birth,
            date_of_death,
        }
    }

    /// "Family, First" or an empty string when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            iso_date(self.date_of_birth).unwrap_or_default(),
            iso_date(self.date_of_death).unwrap_or_default()
        )
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "first_name": self.first_name,
            "family_name": self.family_name,
            "date_of_birth": iso_date(self.date_of_birth),
            "date_of_death": iso_date(self.date_of_death),
            "name": self.name(),
            "lifespan": self.lifespan(),
            "url": self.url(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl Genre {
    pub fn new(name: String) -> Self {
        Self { id: new_id(), name }
    }

    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "url": self.url(),
        })
    }
}

/// A genre offered in a book form selector, with its checked state
///
/// The underlying genre record is never touched; selection lives only here.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreChoice {
    pub genre: Genre,
    pub is_selected: bool,
}

impl GenreChoice {
    pub fn mark(genres: Vec<Genre>, selected: &[String]) -> Vec<GenreChoice> {
        genres
            .into_iter()
            .map(|genre| {
                let is_selected = selected.iter().any(|id| *id == genre.id);
                GenreChoice { genre, is_selected }
            })
            .collect()
    }

    pub fn to_view(&self) -> Value {
        json!({
            "genre": self.genre.to_view(),
            "is_selected": self.is_selected,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    /// Identity of the owning author
    pub author: String,
    pub summary: String,
    pub isbn: String,
    /// Identities of the referenced genres
    pub genre: Vec<String>,
}

impl Book {
    pub fn new(
        title: String,
        author: String,
        summary: String,
        isbn: String,
        genre: Vec<String>,
    ) -> Self {
        Self {
            id: new_id(),
            title,
            author,
            summary,
            isbn,
            genre,
        }
    }

    pub fn url(&self) -> String {
        book_url(&self.id)
    }

    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "author": self.author,
            "summary": self.summary,
            "isbn": self.isbn,
            "genre": self.genre,
            "url": self.url(),
        })
    }
}

fn book_url(id: &str) -> String {
    format!("/catalog/book/{}", id)
}

/// Reduced projection of a book used by dependent lists and selectors
#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
}

impl BookSummary {
    pub fn url(&self) -> String {
        book_url(&self.id)
    }

    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "summary": self.summary,
            "url": self.url(),
        })
    }
}

/// Book list row: title with its author resolved
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub id: String,
    pub title: String,
    pub author: Option<Author>,
}

impl BookListing {
    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "author": self.author.as_ref().map(Author::to_view),
            "url": book_url(&self.id),
        })
    }
}

/// A book with its author and genres resolved
///
/// A dangling author reference resolves to `None`; dangling genre references
/// are dropped from `genres`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

impl BookDetail {
    pub fn to_view(&self) -> Value {
        json!({
            "id": self.book.id,
            "title": self.book.title,
            "summary": self.book.summary,
            "isbn": self.book.isbn,
            "author": self.author.as_ref().map(Author::to_view),
            "genre": self.genres.iter().map(Genre::to_view).collect::<Vec<_>>(),
            "url": self.book.url(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Maintenance,
        BookStatus::Loaned,
        BookStatus::Reserved,
    ];

    pub const NAMES: [&'static str; 4] = ["Available", "Maintenance", "Loaned", "Reserved"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Maintenance => "Maintenance",
            BookStatus::Loaned => "Loaned",
            BookStatus::Reserved => "Reserved",
        }
    }

    pub fn names() -> &'static [&'static str] {
        &Self::NAMES
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown book status: {}", s))
    }
}

/// A physical copy of a book
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstance {
    pub id: String,
    /// Identity of the book this is a copy of
    pub book: String,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn new(book: String, imprint: String, status: BookStatus, due_back: NaiveDate) -> Self {
        Self {
            id: new_id(),
            book,
            imprint,
            status,
            due_back,
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_yyyy_mm_dd(&self) -> String {
        self.due_back.format("%Y-%m-%d").to_string()
    }

    /// Medium date, e.g. "Oct 16, 2026"
    pub fn due_back_formatted(&self) -> String {
        self.due_back.format("%b %-d, %Y").to_string()
    }

    pub fn to_view(&self) -> Value {
        json!({
            "id": self.id,
            "book": self.book,
            "imprint": self.imprint,
            "status": self.status.as_str(),
            "due_back": self.due_back_yyyy_mm_dd(),
            "due_back_yyyy_mm_dd": self.due_back_yyyy_mm_dd(),
            "due_back_formatted": self.due_back_formatted(),
            "url": self.url(),
        })
    }
}

/// A copy with its book resolved (`None` when the reference dangles)
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceDetail {
    pub instance: BookInstance,
    pub book: Option<BookSummary>,
}

impl BookInstanceDetail {
    pub fn to_view(&self) -> Value {
        let mut view = self.instance.to_view();
        view["book"] = self
            .book
            .as_ref()
            .map(BookSummary::to_view)
            .unwrap_or(Value::Null);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_author_name_and_lifespan() {
        let author = Author::new(
            "Isaac".to_string(),
            "Asimov".to_string(),
            Some(date("1920-01-02")),
            Some(date("1992-04-06")),
        );
        assert_eq!(author.name(), "Asimov, Isaac");
        assert_eq!(author.lifespan(), "1920-01-02 - 1992-04-06");
        assert_eq!(author.url(), format!("/catalog/author/{}", author.id));

        let partial = Author::new("".to_string(), "Asimov".to_string(), None, None);
        assert_eq!(partial.name(), "");
        assert_eq!(partial.lifespan(), " - ");
    }

    #[test]
    fn test_fresh_records_get_distinct_ids() {
        let a = Genre::new("Fantasy".to_string());
        let b = Genre::new("Fantasy".to_string());
        assert_ne!(a.id, b.id);
        assert!(a.url().starts_with("/catalog/genre/"));
    }

    #[test]
    fn test_genre_choice_marks_only_selected() {
        let fantasy = Genre::new("Fantasy".to_string());
        let poetry = Genre::new("Poetry".to_string());
        let selected = vec![poetry.id.clone()];

        let choices = GenreChoice::mark(vec![fantasy.clone(), poetry.clone()], &selected);
        assert_eq!(choices.len(), 2);
        assert!(!choices[0].is_selected);
        assert!(choices[1].is_selected);
        assert_eq!(choices[1].to_view()["genre"]["name"], "Poetry");
    }

    #[test]
    fn test_book_status_round_trips_names() {
        assert_eq!(BookStatus::default(), BookStatus::Maintenance);
        assert_eq!("Loaned".parse::<BookStatus>(), Ok(BookStatus::Loaned));
        assert!("loaned".parse::<BookStatus>().is_err());
        for (status, name) in BookStatus::ALL.iter().zip(BookStatus::names()) {
            assert_eq!(status.as_str(), *name);
        }
    }

    #[test]
    fn test_due_back_strings() {
        let copy = BookInstance::new(
            "book".to_string(),
            "Gollancz, 2011".to_string(),
            BookStatus::Available,
            date("2026-10-06"),
        );
        assert_eq!(copy.due_back_yyyy_mm_dd(), "2026-10-06");
        assert_eq!(copy.due_back_formatted(), "Oct 6, 2026");
        assert_eq!(copy.to_view()["status"], "Available");
    }

    #[test]
    fn test_detail_view_with_dangling_book() {
        let copy = BookInstance::new(
            "missing".to_string(),
            "Imprint".to_string(),
            BookStatus::Reserved,
            date("2026-01-01"),
        );
        let detail = BookInstanceDetail {
            instance: copy,
            book: None,
        };
        assert!(detail.to_view()["book"].is_null());
    }
}
