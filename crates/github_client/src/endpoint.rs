//! GraphQL endpoint resolution for github.com and GitHub Enterprise Server hosts.

use url::Url;

use crate::{models::DEFAULT_HOST, Error};

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;

const DOTCOM_API_BASE: &str = "https://api.github.com";
const DOTCOM_GRAPHQL_PATH: &str = "/graphql";
const ENTERPRISE_GRAPHQL_PATH: &str = "/api/graphql";

/// Where GraphQL requests for a host are sent.
///
/// The client is built against `base_uri` and posts to `graphql_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub base_uri: String,
    pub graphql_path: String,
}

impl ApiEndpoint {
    /// Returns the endpoint serving `host`.
    ///
    /// `github.com` maps to `https://api.github.com/graphql`; any other host is
    /// treated as GitHub Enterprise Server and maps to `https://<host>/api/graphql`.
    pub fn for_host(host: &str) -> Self {
        let host = host.trim().to_ascii_lowercase();
        if host.is_empty() || host == DEFAULT_HOST || host == "api.github.com" {
            return Self {
                base_uri: DOTCOM_API_BASE.to_string(),
                graphql_path: DOTCOM_GRAPHQL_PATH.to_string(),
            };
        }

        Self {
            base_uri: format!("https://{host}"),
            graphql_path: ENTERPRISE_GRAPHQL_PATH.to_string(),
        }
    }

    /// Builds an endpoint from an explicit GraphQL URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the URL cannot be parsed or has no host.
    pub fn from_graphql_url(graphql_url: &str) -> Result<Self, Error> {
        let url = Url::parse(graphql_url).map_err(|e| {
            Error::Configuration(format!("Invalid GraphQL URL '{graphql_url}': {e}"))
        })?;

        let host = url.host_str().ok_or_else(|| {
            Error::Configuration(format!("GraphQL URL '{graphql_url}' has no host"))
        })?;

        let base_uri = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        let graphql_path = match url.path() {
            "" | "/" => DOTCOM_GRAPHQL_PATH.to_string(),
            path => path.to_string(),
        };

        Ok(Self {
            base_uri,
            graphql_path,
        })
    }

    /// Returns the full GraphQL URL.
    pub fn graphql_url(&self) -> String {
        format!("{}{}", self.base_uri, self.graphql_path)
    }
}
