use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier for a book in the catalog
pub type BookId = u64;

/// Genre of a catalog book, one of a fixed small set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Dystopian,
    Fantasy,
    Tech,
    ScienceFiction,
    Science,
    History,
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Genre::Dystopian => "Dystopian",
            Genre::Fantasy => "Fantasy",
            Genre::Tech => "Tech",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Science => "Science",
            Genre::History => "History",
        };
        write!(f, "{}", name)
    }
}

/// A book in the static catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub genre: Genre,
}

impl Book {
    /// Creates a new catalog book
    pub fn new(book_id: BookId, title: String, genre: Genre) -> Self {
        Self {
            book_id,
            title,
            genre,
        }
    }
}

/// The standard catalog, with ids assigned in listing order starting at 1
pub fn seed_catalog() -> Vec<Book> {
    const CATALOG: &[(&str, Genre)] = &[
        ("1984", Genre::Dystopian),
        ("Brave New World", Genre::Dystopian),
        ("Fahrenheit 451", Genre::Dystopian),
        ("The Handmaid's Tale", Genre::Dystopian),
        ("Animal Farm", Genre::Dystopian),
        ("The Hobbit", Genre::Fantasy),
        ("The Lord of the Rings", Genre::Fantasy),
        ("Harry Potter", Genre::Fantasy),
        ("Mistborn", Genre::Fantasy),
        ("The Name of the Wind", Genre::Fantasy),
        ("Wheel of Time", Genre::Fantasy),
        ("Clean Code", Genre::Tech),
        ("Design Patterns", Genre::Tech),
        ("The Pragmatic Programmer", Genre::Tech),
        ("Refactoring", Genre::Tech),
        ("Introduction to Algorithms", Genre::Tech),
        ("Artificial Intelligence", Genre::Tech),
        ("Deep Learning", Genre::Tech),
        ("Dune", Genre::ScienceFiction),
        ("Foundation", Genre::ScienceFiction),
        ("Neuromancer", Genre::ScienceFiction),
        ("Snow Crash", Genre::ScienceFiction),
        ("The Martian", Genre::ScienceFiction),
        ("A Brief History of Time", Genre::Science),
        ("Cosmos", Genre::Science),
        ("Sapiens", Genre::History),
        ("Homo Deus", Genre::History),
    ];

    CATALOG
        .iter()
        .enumerate()
        .map(|(index, &(title, genre))| Book::new(index as BookId + 1, title.to_string(), genre))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_serialization() {
        let json = serde_json::to_string(&Genre::ScienceFiction).unwrap();
        assert_eq!(json, "\"science_fiction\"");

        let deserialized: Genre = serde_json::from_str("\"dystopian\"").unwrap();
        assert_eq!(deserialized, Genre::Dystopian);
    }

    #[test]
    fn test_genre_display() {
        assert_eq!(Genre::ScienceFiction.to_string(), "Science Fiction");
        assert_eq!(Genre::Tech.to_string(), "Tech");
    }

    #[test]
    fn test_seed_catalog_ids_are_sequential() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 27);
        for (index, book) in catalog.iter().enumerate() {
            assert_eq!(book.book_id, index as BookId + 1);
        }
    }

    #[test]
    fn test_seed_catalog_first_entry() {
        let catalog = seed_catalog();
        assert_eq!(catalog[0].title, "1984");
        assert_eq!(catalog[0].genre, Genre::Dystopian);
    }
}
