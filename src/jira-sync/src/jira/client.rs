//! reqwest-backed Jira REST client.

use super::error::{JiraError, RequestState};
use super::types::{
    ApiVersion, IssuePayload, IssueQuery, Transition, TransitionId, TransitionRequest,
    TransitionsResponse,
};
use super::JiraApi;
use crate::keys::IssueKey;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Jira client authenticating with an account email and API token.
pub struct JiraClient {
    http: Client,
    base_url: Url,
    email: String,
    token: String,
}

impl JiraClient {
    /// Creates a client for the Jira site at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::InvalidBaseUrl`] if the URL does not parse or is
    /// not served over HTTPS, since credentials travel in every request.
    pub fn new(base_url: &str, email: String, token: String) -> Result<Self, JiraError> {
        let parsed = Url::parse(base_url).map_err(|e| JiraError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        if parsed.scheme() != "https" {
            return Err(JiraError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: "base URL must use https".to_string(),
            });
        }

        Ok(Self::with_url(parsed, email, token))
    }

    fn with_url(base_url: Url, email: String, token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            email,
            token,
        }
    }

    /// Returns the Jira site URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn fetch(
        &self,
        api_method: &'static str,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<String, JiraError> {
        debug!(api_method, method = %method, url = %url, "Jira request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(&self.email, Some(&self.token))
            .header(ACCEPT, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(JiraError::api(
                api_method,
                RequestState {
                    method: method.as_str(),
                    url: url.as_str(),
                    body: body.as_ref(),
                },
                status.as_u16(),
                &text,
            ));
        }

        Ok(text)
    }

    fn decode<T: DeserializeOwned>(api_method: &'static str, text: &str) -> Result<T, JiraError> {
        serde_json::from_str(text).map_err(|source| JiraError::Decode { api_method, source })
    }
}

#[async_trait]
impl JiraApi for JiraClient {
    async fn get_issue(
        &self,
        key: &IssueKey,
        query: &IssueQuery,
        version: ApiVersion,
    ) -> Result<Option<IssuePayload>, JiraError> {
        let mut params = Vec::new();
        if !query.fields.is_empty() {
            params.push(("fields", query.fields.join(",")));
        }
        if !query.expand.is_empty() {
            params.push(("expand", query.expand.join(",")));
        }
        let url = self.endpoint(
            &format!("/rest/api/{}/issue/{key}", version.as_str()),
            &params,
        );

        match self.fetch("getIssue", Method::GET, url, None).await {
            Ok(text) => Self::decode("getIssue", &text).map(Some),
            Err(e) if e.is_not_found() => {
                debug!(key = %key, "Jira issue not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_issue_transitions(&self, key: &IssueKey) -> Result<Vec<Transition>, JiraError> {
        let url = self.endpoint(&format!("/rest/api/2/issue/{key}/transitions"), &[]);
        let text = self
            .fetch("getIssueTransitions", Method::GET, url, None)
            .await?;
        let response: TransitionsResponse = Self::decode("getIssueTransitions", &text)?;
        Ok(response.transitions)
    }

    async fn transition_issue(&self, key: &IssueKey, transition_id: &str) -> Result<(), JiraError> {
        let url = self.endpoint(&format!("/rest/api/2/issue/{key}/transitions"), &[]);
        let body = serde_json::to_value(TransitionRequest {
            transition: TransitionId { id: transition_id },
        })
        .map_err(|source| JiraError::Decode {
            api_method: "transitionIssue",
            source,
        })?;

        self.fetch("transitionIssue", Method::POST, url, Some(body))
            .await?;
        Ok(())
    }
}
