//! HTTP verbs a route can be bound to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// HTTP method of a bound route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// GET requests carry no body, so no parameters can travel with them.
    pub fn carries_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(format!("Unsupported HTTP method: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        for method in HttpMethod::ALL {
            let parsed: HttpMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Options".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "PATCH".parse::<HttpMethod>().unwrap_err();
        assert!(err.contains("PATCH"));
    }

    #[test]
    fn test_serde_uppercase() {
        assert_eq!(serde_json::to_string(&HttpMethod::Delete).unwrap(), r#""DELETE""#);
        let m: HttpMethod = serde_json::from_str(r#""PUT""#).unwrap();
        assert_eq!(m, HttpMethod::Put);
    }

    #[test]
    fn test_carries_body() {
        assert!(!HttpMethod::Get.carries_body());
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Options.carries_body());
    }
}
