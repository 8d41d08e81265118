//! Route registry errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Route already registered: {0}")]
    DuplicateRoute(String),

    #[error("Route not found: {0}")]
    NotFound(String),
}
