//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// Base URL used when no other is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8123";

/// A validated base URL of the Strove API server.
///
/// The URL must be absolute, use `http` or `https`, and carry a host. A path
/// prefix is allowed for deployments behind a reverse proxy.
///
/// # Example
///
/// ```
/// use strove_core::ApiUrl;
///
/// let api = ApiUrl::new("https://strove.example.com/").unwrap();
/// assert_eq!(api.endpoint("/api/auth/login"),
///            "https://strove.example.com/api/auth/login");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Returns the absolute URL of an API path such as `/api/auth/login`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        let scheme = url.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: format!("unsupported scheme '{}'", scheme),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must not carry a query or fragment".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for ApiUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_API_URL).expect("default API URL is valid"))
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_dev_server() {
        let api = ApiUrl::default();
        assert_eq!(api.as_str(), "http://localhost:8123/");
        assert_eq!(api.endpoint("/api/auth/me"), "http://localhost:8123/api/auth/me");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let api = ApiUrl::new("https://strove.example.com/").unwrap();
        assert_eq!(
            api.endpoint("/api/auth/login"),
            "https://strove.example.com/api/auth/login"
        );
    }

    #[test]
    fn endpoint_keeps_path_prefix() {
        let api = ApiUrl::new("https://example.com/strove").unwrap();
        assert_eq!(
            api.endpoint("/api/ai/chat"),
            "https://example.com/strove/api/ai/chat"
        );
    }

    #[test]
    fn plain_http_is_allowed() {
        let api = ApiUrl::new("http://10.0.0.5:8123").unwrap();
        assert_eq!(api.endpoint("api/auth/me"), "http://10.0.0.5:8123/api/auth/me");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(ApiUrl::new("file:///tmp/strove").is_err());
        assert!(ApiUrl::new("ftp://example.com").is_err());
    }

    #[test]
    fn rejects_relative_url() {
        assert!(ApiUrl::new("/api/auth/login").is_err());
    }

    #[test]
    fn rejects_query() {
        assert!(ApiUrl::new("https://example.com/?x=1").is_err());
    }

    #[test]
    fn roundtrips_through_serde() {
        let api: ApiUrl = serde_json::from_str("\"https://example.com\"").unwrap();
        assert_eq!(api.to_string(), "https://example.com/");
        assert!(serde_json::from_str::<ApiUrl>("\"nope\"").is_err());
    }
}
