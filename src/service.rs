use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future;
use tarpc::context;
use tracing::{debug, info};

use crate::{Book, BookIdRequest, BookList, BookService, Catalog, CatalogError};

/// RPC handler for [`BookService`]. Clones share one catalog.
#[derive(Clone)]
pub struct CatalogServer {
    catalog: Arc<Mutex<Catalog>>,
}

impl CatalogServer {
    pub fn new(catalog: Catalog) -> Self {
        CatalogServer {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Server state at process start.
    pub fn seeded() -> Self {
        Self::new(Catalog::seeded())
    }

    // Every Catalog method leaves the Vec valid, so a poisoned lock is still usable.
    fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookService for CatalogServer {
    // Need to define the future types for tarpc
    type ListFut = future::Ready<BookList>;
    type InsertFut = future::Ready<()>;
    type GetFut = future::Ready<Result<Book, CatalogError>>;
    type DeleteFut = future::Ready<Result<(), CatalogError>>;

    fn list(self, _: context::Context) -> Self::ListFut {
        let books = self.catalog().list();
        debug!(count = books.len(), "list");
        future::ready(BookList { books })
    }

    fn insert(self, _: context::Context, book: Book) -> Self::InsertFut {
        info!(id = book.id, title = %book.title, "insert");
        self.catalog().insert(book);
        future::ready(())
    }

    fn get(self, _: context::Context, req: BookIdRequest) -> Self::GetFut {
        let result = self.catalog().get(req.id);
        if result.is_err() {
            debug!(id = req.id, "get: not found");
        }
        future::ready(result)
    }

    fn delete(self, _: context::Context, req: BookIdRequest) -> Self::DeleteFut {
        let result = self.catalog().delete(req.id).map(|book| {
            info!(id = book.id, title = %book.title, "delete");
        });
        if result.is_err() {
            debug!(id = req.id, "delete: not found");
        }
        future::ready(result)
    }
}
