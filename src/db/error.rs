//! Typed error surfaced by the route store (C4) where a caller needs to
//! match on "not found" rather than parse an error string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteStoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
}
