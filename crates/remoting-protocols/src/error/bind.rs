//! Binding errors, raised while wiring services at startup.

use thiserror::Error;

use super::RegistryError;
use crate::method::HttpMethod;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// GET carries no body, so only zero-arity functions can be bound to it.
    #[error("{method} is only supported for functions without parameters ({route} takes {arity})")]
    UnsupportedMethod {
        method: HttpMethod,
        route: String,
        arity: usize,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_method_display() {
        let err = BindError::UnsupportedMethod {
            method: HttpMethod::Get,
            route: "/rpc/add".to_string(),
            arity: 2,
        };
        let display = err.to_string();
        assert!(display.contains("GET"));
        assert!(display.contains("/rpc/add"));
        assert!(display.contains("2"));
    }

    #[test]
    fn test_registry_error_from() {
        let err = BindError::from(RegistryError::DuplicateRoute("x".to_string()));
        assert!(matches!(err, BindError::Registry(RegistryError::DuplicateRoute(_))));
        assert!(err.to_string().contains("already registered"));
    }
}
