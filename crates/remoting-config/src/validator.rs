//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(e) => Err(ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_routes(config, &mut result);
        Self::validate_websocket(config, &mut result);
        Self::validate_rpc(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_routes(config: &Config, result: &mut ValidationResult) {
        let routes = &config.routes;
        for (path, prefix) in [
            ("routes.http_prefix", &routes.http_prefix),
            ("routes.ws_prefix", &routes.ws_prefix),
        ] {
            if !prefix.starts_with('/') {
                result.add_error(ValidationError::new(path, "Prefix must start with '/'"));
            }
            if prefix.len() > 1 && prefix.ends_with('/') {
                result.add_error(ValidationError::new(path, "Prefix must not end with '/'"));
            }
        }

        // Identical prefixes would let an HTTP route shadow a WebSocket route.
        if routes.http_prefix == routes.ws_prefix {
            result.add_error(ValidationError::new(
                "routes",
                "http_prefix and ws_prefix must differ",
            ));
        }
    }

    fn validate_websocket(config: &Config, result: &mut ValidationResult) {
        let capacity = config.websocket.channel_capacity;
        if capacity == 0 {
            result.add_error(ValidationError::new(
                "websocket.channel_capacity",
                "channel_capacity must be greater than 0",
            ));
        }

        if capacity > 65536 {
            result.add_warning(ValidationWarning::new(
                "websocket.channel_capacity",
                "channel_capacity is very high (>65536), slow consumers may buffer a lot of memory",
            ));
        }
    }

    fn validate_rpc(config: &Config, result: &mut ValidationResult) {
        match config.rpc.call_timeout_secs {
            Some(0) => result.add_error(ValidationError::new(
                "rpc.call_timeout_secs",
                "call_timeout_secs must be greater than 0",
            )),
            None => result.add_warning(ValidationWarning::new(
                "rpc.call_timeout_secs",
                "No call timeout set, a handler that never returns holds its task forever",
            )),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
