//! Remote profile lookup.
//!
//! The screen only cares whether a lookup produced a [`ResultSet`] or failed,
//! and if it failed, whether the service answered with a status code.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::model::types::ResultSet;

/// Failure of a single lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("lookup service returned status {0}")]
    Status(u16),
    #[error("lookup transport failed: {0}")]
    Transport(String),
    #[error("lookup response could not be decoded: {0}")]
    Decode(String),
}

impl LookupError {
    /// Status code carried by the failure, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LookupError::Status(code) => Some(*code),
            LookupError::Transport(_) | LookupError::Decode(_) => None,
        }
    }
}

/// Anything that can turn a query into a page of profiles.
pub trait ProfileLookup: Send + Sync + 'static {
    fn search_profiles(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ResultSet, LookupError>> + Send;
}

/// GitHub user search (`GET /search/users?q=...`).
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(
        api_base: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("building http client")?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.api_base.clone(),
            Duration::from_millis(config.http_timeout_ms),
            &config.user_agent,
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}/search/users", self.api_base)
    }

    /// Full request URL, with the query form-encoded (`a b` becomes `a+b`).
    pub fn request_url(&self, query: &str) -> Result<Url, LookupError> {
        Url::parse_with_params(&self.search_url(), &[("q", query)])
            .map_err(|e| LookupError::Transport(format!("invalid lookup url: {e}")))
    }
}

impl ProfileLookup for GithubClient {
    fn search_profiles(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<ResultSet, LookupError>> + Send {
        let url = self.request_url(query);
        let http = self.http.clone();
        let query = query.to_string();
        async move {
            let response = http
                .get(url?)
                .header("Accept", "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| LookupError::Transport(e.to_string()))?;
            let status = response.status();
            debug!(query = %query, status = status.as_u16(), "lookup response");
            if !status.is_success() {
                return Err(LookupError::Status(status.as_u16()));
            }
            response
                .json::<ResultSet>()
                .await
                .map_err(|e| LookupError::Decode(e.to_string()))
        }
    }
}
