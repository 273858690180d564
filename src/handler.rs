use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::data::{FilterKind, ReferenceItem, RestaurantDetail, SearchFilter, SearchPage};
use crate::error::{Error, Result};
use crate::pagination::{Navigation, PageCursors};
use crate::shape;
use crate::zomato::{RestaurantApi, SearchQuery};

/// Intent-named operations over the restaurant API, scoped to one city.
#[derive(Clone)]
pub struct ZomatoHandler {
    api: Arc<dyn RestaurantApi>,
    city_id: u32,
}

/// A shaped result page plus the cursors for the page after it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchOutcome {
    #[serde(flatten)]
    pub page: SearchPage,
    pub cursors: PageCursors,
}

impl ZomatoHandler {
    pub fn new(api: Arc<dyn RestaurantApi>, city_id: u32) -> Self {
        Self { api, city_id }
    }

    pub fn city_id(&self) -> u32 {
        self.city_id
    }

    /// Raw search starting at `start`. Fails with [`Error::NoSearchCriteria`]
    /// before touching the network when no filter values were chosen.
    pub async fn search(&self, q: &str, filter: Option<&SearchFilter>, start: u32) -> Result<Value> {
        let filter = match filter {
            Some(filter) if !filter.values.is_empty() => filter,
            _ => return Err(Error::NoSearchCriteria),
        };

        let query = SearchQuery {
            q: q.to_string(),
            filter_param: filter.kind.search_param(),
            filter_values: filter.joined_values(),
            city_id: self.city_id,
            start,
        };
        debug!("searching {} {} from {start}", filter.kind, query.filter_values);
        self.api.search(&query).await
    }

    /// Search the page `nav` points at and shape it.
    pub async fn search_page(
        &self,
        q: &str,
        filter: Option<&SearchFilter>,
        nav: Navigation,
    ) -> Result<SearchOutcome> {
        let data = self.search(q, filter, nav.offset()).await?;
        let page = shape::shape_page(&data)?;
        let cursors = nav.advance(shape::results_shown(&data)?);
        Ok(SearchOutcome { page, cursors })
    }

    pub async fn list_cuisines(&self) -> Result<Value> {
        self.api.cuisines(self.city_id).await
    }

    pub async fn list_categories(&self) -> Result<Value> {
        self.api.categories().await
    }

    pub async fn list_establishment_types(&self) -> Result<Value> {
        self.api.establishments(self.city_id).await
    }

    pub async fn reference_data(&self, kind: FilterKind) -> Result<Vec<ReferenceItem>> {
        let raw = match kind {
            FilterKind::Cuisine => self.list_cuisines().await?,
            FilterKind::Category => self.list_categories().await?,
            FilterKind::Type => self.list_establishment_types().await?,
        };
        let items = shape::reference_items(kind, &raw)?;
        info!("loaded {} {kind} entries", items.len());
        Ok(items)
    }

    pub async fn restaurant(&self, id: &str) -> Result<Value> {
        self.api.restaurant(id).await
    }

    pub async fn restaurant_detail(&self, id: &str) -> Result<RestaurantDetail> {
        let raw = self.restaurant(id).await?;
        shape::detail(&raw)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::error::Result;
    use crate::shape::fixtures;
    use crate::zomato::{RestaurantApi, SearchQuery};

    /// Serves fixed payloads and records every search it receives.
    #[derive(Default)]
    pub struct StubApi {
        pub total: u32,
        pub searches: Mutex<Vec<SearchQuery>>,
    }

    impl StubApi {
        pub fn with_total(total: u32) -> Self {
            Self {
                total,
                ..Self::default()
            }
        }

        pub fn searches(&self) -> Vec<SearchQuery> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RestaurantApi for StubApi {
        async fn search(&self, query: &SearchQuery) -> Result<Value> {
            self.searches.lock().unwrap().push(query.clone());
            let shown = self.total.saturating_sub(query.start).min(20);
            Ok(fixtures::search_response(query.start, shown))
        }

        async fn cuisines(&self, _city_id: u32) -> Result<Value> {
            Ok(json!({
                "cuisines": [
                    { "cuisine": { "cuisine_id": 1, "cuisine_name": "American" } },
                    { "cuisine": { "cuisine_id": 55, "cuisine_name": "Italian" } }
                ]
            }))
        }

        async fn categories(&self) -> Result<Value> {
            Ok(json!({
                "categories": [ { "categories": { "id": 1, "name": "Delivery" } } ]
            }))
        }

        async fn establishments(&self, _city_id: u32) -> Result<Value> {
            Ok(json!({
                "establishments": [ { "establishment": { "id": 16, "name": "Casual Dining" } } ]
            }))
        }

        async fn restaurant(&self, res_id: &str) -> Result<Value> {
            Ok(fixtures::restaurant(res_id.parse().unwrap_or(1), "Otto"))
        }
    }
}
