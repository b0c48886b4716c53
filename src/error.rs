use thiserror::Error;

use crate::catalogue::CatalogueError;

/// Crate-wide error type. Ingest failures are fatal; query-time lookups
/// never produce one of these. Absence is surfaced as `None` or as a
/// per-request `Response` variant, never as an exception escaping the
/// request loop.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}
