//! In-memory book collection.
//!
//! Books are kept in insertion order and looked up by linear scan. Ids are
//! caller-assigned and never checked for uniqueness: when duplicates exist,
//! `get` and `delete` act on the first match.

use crate::{Book, CatalogError};

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog a freshly started server holds.
    pub fn seeded() -> Self {
        Catalog {
            books: vec![Book::new(123, "A Tale of Two Cities", "Charles Dickens")],
        }
    }

    pub fn list(&self) -> Vec<Book> {
        self.books.clone()
    }

    pub fn insert(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn get(&self, id: i32) -> Result<Book, CatalogError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound { id })
    }

    /// Removes the first book with `id`; the rest keep their relative order.
    pub fn delete(&mut self, id: i32) -> Result<Book, CatalogError> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::NotFound { id })?;
        Ok(self.books.remove(index))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(catalog: &Catalog) -> Vec<i32> {
        catalog.list().iter().map(|b| b.id).collect()
    }

    #[test]
    fn seeded_catalog_holds_the_example_record() {
        let catalog = Catalog::seeded();
        assert_eq!(
            catalog.list(),
            vec![Book::new(123, "A Tale of Two Cities", "Charles Dickens")]
        );
    }

    #[test]
    fn insert_appends_after_existing_entries() {
        let mut catalog = Catalog::seeded();
        catalog.insert(Book::new(7, "Dune", "Frank Herbert"));
        catalog.insert(Book::new(3, "Emma", "Jane Austen"));

        assert_eq!(ids(&catalog), vec![123, 7, 3]);
        assert_eq!(catalog.get(7).unwrap().title, "Dune");
    }

    #[test]
    fn get_missing_id_is_not_found() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.get(999), Err(CatalogError::NotFound { id: 999 }));
    }

    #[test]
    fn delete_removes_only_the_first_match() {
        let mut catalog = Catalog::new();
        catalog.insert(Book::new(1, "first", "a"));
        catalog.insert(Book::new(2, "middle", "b"));
        catalog.insert(Book::new(1, "second", "c"));

        let removed = catalog.delete(1).unwrap();
        assert_eq!(removed.title, "first");
        assert_eq!(ids(&catalog), vec![2, 1]);
        assert_eq!(catalog.get(1).unwrap().title, "second");
    }

    #[test]
    fn delete_missing_id_leaves_catalog_unchanged() {
        let mut catalog = Catalog::seeded();
        catalog.insert(Book::new(5, "Ulysses", "James Joyce"));
        let before = catalog.list();

        assert_eq!(catalog.delete(42), Err(CatalogError::NotFound { id: 42 }));
        assert_eq!(catalog.list(), before);
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let mut catalog = Catalog::new();
        catalog.insert(Book::new(9, "one", "x"));
        catalog.insert(Book::new(9, "two", "y"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(9).unwrap().title, "one");
    }

    #[test]
    fn insert_then_delete_restores_previous_contents() {
        let mut catalog = Catalog::seeded();
        catalog.insert(Book::new(8, "Middlemarch", "George Eliot"));
        let before = catalog.list();

        catalog.insert(Book::new(77, "Beloved", "Toni Morrison"));
        catalog.delete(77).unwrap();

        assert_eq!(catalog.list(), before);
    }
}
