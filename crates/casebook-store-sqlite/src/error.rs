//! Error type for `casebook-store-sqlite`.

use casebook_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] casebook_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unwraps errors that were smuggled out of a `Connection::call` closure via
/// [`abort`]; everything else is a database error.
impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(own) => *own,
        Err(other) => Error::Database(tokio_rusqlite::Error::Other(other)),
      },
      other => Error::Database(other),
    }
  }
}

impl StoreError for Error {
  fn as_domain(&self) -> Option<&casebook_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

/// Leave a `Connection::call` closure early with one of our own errors. Any
/// open transaction is rolled back when it is dropped.
pub(crate) fn abort(err: impl Into<Error>) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err.into()))
}
