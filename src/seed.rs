//! Catalog inserted the first time a store is created

use crate::models::book::CreateBook;

const SEED_BOOKS: [(&str, &str, i32, &str, &str); 12] = [
    ("1984", "George Orwell", 1949, "Dystopia", "A surveillance state rewrites the past."),
    ("Brave New World", "Aldous Huxley", 1932, "Dystopia", "Engineered happiness in the World State."),
    ("Dune", "Frank Herbert", 1965, "SciFi", "Politics and prophecy on the desert planet Arrakis."),
    ("Foundation", "Isaac Asimov", 1951, "SciFi", "Psychohistory and the fall of a galactic empire."),
    ("Pride and Prejudice", "Jane Austen", 1813, "Classic", "Elizabeth Bennet and Mr. Darcy."),
    ("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", "Bilbo Baggins leaves the Shire."),
    ("The Lord of the Rings", "J.R.R. Tolkien", 1954, "Fantasy", "The quest to destroy the One Ring."),
    ("To Kill a Mockingbird", "Harper Lee", 1960, "Classic", "Justice in a small Alabama town."),
    ("The Great Gatsby", "F. Scott Fitzgerald", 1925, "Classic", "Wealth and longing on Long Island."),
    ("Moby-Dick", "Herman Melville", 1851, "Adventure", "Captain Ahab hunts the white whale."),
    ("Neuromancer", "William Gibson", 1984, "SciFi", "A washed-up hacker takes one last job."),
    ("The Name of the Wind", "Patrick Rothfuss", 2007, "Fantasy", "Kvothe tells his own story."),
];

/// The seed catalog, in insertion order
pub fn seed_books() -> Vec<CreateBook> {
    SEED_BOOKS
        .iter()
        .map(|&(title, author, year, category, description)| {
            CreateBook::new(title, author, year, category).with_description(description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_seed_books_are_valid() {
        let books = seed_books();
        assert_eq!(books.len(), SEED_BOOKS.len());
        assert!(books.iter().all(|b| b.validate().is_ok()));
    }
}
