use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use restaurant_review::{
    config::Config,
    data::{FilterKind, ReferenceItem, RestaurantDetail, RestaurantSummary},
    db as db_api,
    form::{ReviewForm, SearchForm},
    handler::ZomatoHandler,
    zomato::{RestaurantApi, ZomatoClient},
    Error,
};
use serde::{Deserialize, Serialize};

/// Header the fronting proxy puts the signed-in user name in.
pub(super) const REMOTE_USER: &str = "X-Remote-User";

pub(super) struct ApiState {
    db_pool: sqlx::SqlitePool,
    zomato: ZomatoHandler,
}

impl ApiState {
    pub(super) async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = db_api::connect(&config.database_url).await?;
        let client = ZomatoClient::new(&config.api_url, &config.api_key);
        Ok(Self::with_api(db_pool, Arc::new(client), config.city_id))
    }

    pub(super) fn with_api(
        db_pool: sqlx::SqlitePool,
        api: Arc<dyn RestaurantApi>,
        city_id: u32,
    ) -> Self {
        Self {
            db_pool,
            zomato: ZomatoHandler::new(api, city_id),
        }
    }
}

pub(super) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(search_cuisine)
        .service(search_category)
        .service(search_type)
        .service(search_results)
        .service(restaurant_details)
        .service(post_review);
}

#[derive(Serialize)]
struct ErrJsonResp<'a> {
    message: String,
    back: &'a str,
}

#[derive(Serialize)]
struct HomeResp {
    search: [&'static str; 3],
    results: &'static str,
}

#[actix_web::get("/")]
pub(super) async fn home() -> HttpResponse {
    HttpResponse::Ok().json(HomeResp {
        search: ["/search/cuisine/", "/search/category/", "/search/type/"],
        results: "/search-results/",
    })
}

#[derive(Serialize)]
struct ReferenceResp {
    kind: FilterKind,
    items: Vec<ReferenceItem>,
}

async fn reference(data: &ApiState, kind: FilterKind) -> Result<HttpResponse, Error> {
    let items = data.zomato.reference_data(kind).await?;
    Ok(HttpResponse::Ok().json(ReferenceResp { kind, items }))
}

#[actix_web::get("/search/cuisine/")]
pub(super) async fn search_cuisine(data: web::Data<ApiState>) -> Result<HttpResponse, Error> {
    reference(&data, FilterKind::Cuisine).await
}

#[actix_web::get("/search/category/")]
pub(super) async fn search_category(data: web::Data<ApiState>) -> Result<HttpResponse, Error> {
    reference(&data, FilterKind::Category).await
}

#[actix_web::get("/search/type/")]
pub(super) async fn search_type(data: web::Data<ApiState>) -> Result<HttpResponse, Error> {
    reference(&data, FilterKind::Type).await
}

#[derive(Serialize)]
struct SearchResultsResp {
    restaurants: Vec<RestaurantSummary>,
    next: bool,
    previous: bool,
    next_value: u32,
    previous_value: u32,
    search_by: Option<FilterKind>,
    ids: String,
}

#[actix_web::post("/search-results/")]
pub(super) async fn search_results(
    req: HttpRequest,
    data: web::Data<ApiState>,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, Error> {
    let form = SearchForm::from_pairs(&form.into_inner())?;

    let outcome = match data
        .zomato
        .search_page(&form.q, form.filter.as_ref(), form.nav)
        .await
    {
        Err(Error::NoSearchCriteria) => {
            let back = req
                .headers()
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("/");
            return Ok(HttpResponse::BadRequest().json(ErrJsonResp {
                message: Error::NoSearchCriteria.to_string(),
                back,
            }));
        }
        other => other?,
    };

    Ok(HttpResponse::Ok().json(SearchResultsResp {
        restaurants: outcome.page.restaurants,
        next: outcome.page.has_next,
        previous: outcome.page.has_previous,
        next_value: outcome.cursors.next,
        previous_value: outcome.cursors.previous,
        search_by: form.filter.as_ref().map(|f| f.kind),
        ids: form.filter.map(|f| f.joined_values()).unwrap_or_default(),
    }))
}

#[derive(Deserialize)]
pub(super) struct RestaurantPath {
    id: i64,
}

#[derive(Serialize)]
struct DetailResp {
    restaurant: RestaurantDetail,
    reviews: Vec<db_api::Review>,
    errors: Vec<String>,
}

async fn detail_context(
    data: &ApiState,
    restaurant_id: i64,
    errors: Vec<String>,
) -> Result<DetailResp, Error> {
    let restaurant = data
        .zomato
        .restaurant_detail(&restaurant_id.to_string())
        .await?;
    let props = db_api::GetReviewPropsBuilder::default()
        .restaurant_id(restaurant_id)
        .build()
        .map_err(anyhow::Error::from)?;
    let reviews = db_api::get_reviews(&data.db_pool, props).await?;

    Ok(DetailResp {
        restaurant,
        reviews,
        errors,
    })
}

#[actix_web::get("/details/{id}")]
pub(super) async fn restaurant_details(
    data: web::Data<ApiState>,
    path: web::Path<RestaurantPath>,
) -> Result<HttpResponse, Error> {
    let context = detail_context(&data, path.id, Vec::new()).await?;
    Ok(HttpResponse::Ok().json(context))
}

#[actix_web::post("/details/{id}")]
pub(super) async fn post_review(
    req: HttpRequest,
    data: web::Data<ApiState>,
    path: web::Path<RestaurantPath>,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, Error> {
    let Some(reviewer) = req
        .headers()
        .get(REMOTE_USER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    else {
        return Ok(HttpResponse::Unauthorized().json(ErrJsonResp {
            message: "sign in to leave a review".to_string(),
            back: "/",
        }));
    };

    let errors = match form.validate() {
        Ok(review) => {
            let prop = db_api::NewReviewPropsBuilder::default()
                .reviewer(reviewer)
                .restaurant_id(path.id)
                .text(review.text)
                .rating(review.rating)
                .build()
                .map_err(anyhow::Error::from)?;
            db_api::upsert_review(&data.db_pool, prop).await?;
            Vec::new()
        }
        Err(errors) => {
            tracing::debug!("rejected review for {}: {errors:?}", path.id);
            errors
        }
    };

    let context = detail_context(&data, path.id, errors).await?;
    Ok(HttpResponse::Ok().json(context))
}
