//! Fetch request configuration for the storefront AJAX endpoints

use serde::Serialize;

/// Request headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
    #[serde(rename = "Accept")]
    pub accept: String,
}

/// `fetch` init object: JSON POST accepting `application/{kind}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchConfig {
    pub method: String,
    pub headers: FetchHeaders,
}

impl Default for FetchConfig {
    fn default() -> Self {
        fetch_config("json")
    }
}

/// Build the request config; `kind` is the accepted response subtype
pub fn fetch_config(kind: &str) -> FetchConfig {
    FetchConfig {
        method: "POST".to_string(),
        headers: FetchHeaders {
            content_type: "application/json".to_string(),
            accept: format!("application/{kind}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_json() {
        let config = FetchConfig::default();
        assert_eq!(config.method, "POST");
        assert_eq!(config.headers.accept, "application/json");
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(fetch_config("javascript")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "method": "POST",
                "headers": {
                    "Content-Type": "application/json",
                    "Accept": "application/javascript"
                }
            })
        );
    }
}
