//! HTTP route table.

use std::fmt;

use remoting_protocols::{HttpMethod, RegistryError};

use super::OrderedRegistry;
use crate::binder::RpcHandler;

/// An HTTP route is identified by its verb together with its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: HttpMethod,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

pub type RouteRegistry = OrderedRegistry<RouteKey, RpcHandler>;

impl<V> OrderedRegistry<RouteKey, V> {
    pub fn resolve_route(&self, method: HttpMethod, path: &str) -> Result<&V, RegistryError> {
        self.resolve(&RouteKey::new(method, path))
    }

    /// Distinct paths in first-registration order, each with the verbs bound
    /// to it.
    pub fn paths(&self) -> Vec<(String, Vec<HttpMethod>)> {
        let mut grouped: Vec<(String, Vec<HttpMethod>)> = Vec::new();
        for key in self.keys() {
            match grouped.iter_mut().find(|(path, _)| *path == key.path) {
                Some((_, methods)) => methods.push(key.method),
                None => grouped.push((key.path.clone(), vec![key.method])),
            }
        }
        grouped
    }
}
