//! Client for the Zomato v2.1 REST API.
//!
//! Only the five read endpoints the site needs are covered. Responses are
//! returned as raw JSON; turning them into display types is the job of
//! [`crate::shape`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Parameters of one `/search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    /// Upstream parameter carrying the filter values, see
    /// [`crate::data::FilterKind::search_param`].
    pub filter_param: &'static str,
    /// Comma-joined filter ids.
    pub filter_values: String,
    pub city_id: u32,
    pub start: u32,
}

impl SearchQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.q.clone()),
            (self.filter_param, self.filter_values.clone()),
            ("entity_type", "city".to_string()),
            ("entity_id", self.city_id.to_string()),
            ("start", self.start.to_string()),
        ]
    }
}

/// The read operations of the restaurant API.
#[async_trait]
pub trait RestaurantApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Value>;

    async fn cuisines(&self, city_id: u32) -> Result<Value>;

    async fn categories(&self) -> Result<Value>;

    async fn establishments(&self, city_id: u32) -> Result<Value>;

    async fn restaurant(&self, res_id: &str) -> Result<Value>;
}

pub struct ZomatoClient {
    http: reqwest::Client,
    base_url: String,
    key: String,
}

impl ZomatoClient {
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key: key.into(),
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!("GET {url} {params:?}");

        let response = self
            .http
            .get(&url)
            .header("user-key", &self.key)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{endpoint} answered {status}: {body}");
            return Err(Error::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RestaurantApi for ZomatoClient {
    async fn search(&self, query: &SearchQuery) -> Result<Value> {
        self.get_json("search", &query.to_params()).await
    }

    async fn cuisines(&self, city_id: u32) -> Result<Value> {
        self.get_json("cuisines", &[("city_id", city_id.to_string())])
            .await
    }

    async fn categories(&self) -> Result<Value> {
        self.get_json("categories", &[]).await
    }

    async fn establishments(&self, city_id: u32) -> Result<Value> {
        self.get_json("establishments", &[("city_id", city_id.to_string())])
            .await
    }

    async fn restaurant(&self, res_id: &str) -> Result<Value> {
        self.get_json("restaurant", &[("res_id", res_id.to_string())])
            .await
    }
}
