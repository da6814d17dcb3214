//! Jira client error types.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while talking to Jira.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Transport-level failure, including a response body that could not be read.
    #[error("HTTP request to Jira failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Jira answered with a non-success status.
    #[error("Jira API error in {api_method} (status {status}): {state}")]
    Api {
        api_method: &'static str,
        status: u16,
        /// Serialized request/response state, without headers.
        state: String,
    },

    /// Jira answered with a body that does not match the expected shape.
    #[error("Failed to decode Jira response for {api_method}: {source}")]
    Decode {
        api_method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL is unusable.
    #[error("Invalid Jira base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

impl JiraError {
    /// Returns true when Jira reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Builds an [`Api`][`JiraError::Api`] error from the exchanged request.
    pub(crate) fn api(
        api_method: &'static str,
        req: RequestState<'_>,
        status: u16,
        response_body: &str,
    ) -> Self {
        let state = ExchangeState {
            req,
            res: ResponseState {
                status,
                body: response_body,
            },
        };
        let state = serde_json::to_string_pretty(&state)
            .unwrap_or_else(|_| format!("{} {} -> {status}", state.req.method, state.req.url));

        Self::Api {
            api_method,
            status,
            state,
        }
    }
}

/// Request half of an exchange, as recorded in error messages.
#[derive(Debug, Serialize)]
pub(crate) struct RequestState<'a> {
    pub method: &'a str,
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ResponseState<'a> {
    status: u16,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct ExchangeState<'a> {
    req: RequestState<'a>,
    res: ResponseState<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_serializes_state_without_headers() {
        let body = serde_json::json!({ "transition": { "id": "5" } });
        let error = JiraError::api(
            "transitionIssue",
            RequestState {
                method: "POST",
                url: "https://jira.example.com/rest/api/2/issue/API-1/transitions",
                body: Some(&body),
            },
            400,
            "{\"errorMessages\":[\"bad\"]}",
        );

        let message = error.to_string();
        assert!(message.starts_with("Jira API error in transitionIssue (status 400)"));
        assert!(message.contains("\"method\": \"POST\""));
        assert!(message.contains("errorMessages"));
        assert!(!message.to_lowercase().contains("authorization"));
        assert!(!error.is_not_found());
    }

    #[test]
    fn detects_not_found() {
        let error = JiraError::api(
            "getIssue",
            RequestState {
                method: "GET",
                url: "https://jira.example.com/rest/api/3/issue/API-9",
                body: None,
            },
            404,
            "",
        );
        assert!(error.is_not_found());
    }
}
