use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod limits;
pub mod logging;
pub mod service;

pub use catalog::Catalog;
pub use service::CatalogServer;

pub const DEFAULT_PORT: u16 = 50051;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(id: i32, title: impl Into<String>, author: impl Into<String>) -> Self {
        Book {
            id,
            title: title.into(),
            author: author.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<Book>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookIdRequest {
    pub id: i32,
}

/// The only failure a catalog call reports. Transport faults arrive
/// separately as `tarpc::client::RpcError`.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CatalogError {
    #[error("no book with id {id}")]
    NotFound { id: i32 },
}

#[tarpc::service]
pub trait BookService {
    /// List every book in insertion order
    async fn list() -> BookList;
    /// Append a book to the catalog
    async fn insert(book: Book) -> ();
    /// Get the first book with the given id
    async fn get(req: BookIdRequest) -> Result<Book, CatalogError>;
    /// Delete the first book with the given id
    async fn delete(req: BookIdRequest) -> Result<(), CatalogError>;
}
