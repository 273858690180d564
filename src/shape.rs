//! Projection of raw API payloads into display types.
//!
//! Each display type has a mapping table from target field to a JSON pointer
//! into the upstream record. Projection copies the pointed-at values into a
//! flat object, applies the field's transform and lets serde do the typing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::data::{
    FilterKind, ReferenceItem, RestaurantDetail, RestaurantSummary, SearchPage, PAGE_SIZE,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Copy,
    /// Drop everything from the first `?` on.
    StripQuery,
    /// Split a comma-separated string into a trimmed list.
    SplitList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub field: &'static str,
    pub path: &'static str,
    pub transform: Transform,
}

const fn map(field: &'static str, path: &'static str, transform: Transform) -> FieldMap {
    FieldMap {
        field,
        path,
        transform,
    }
}

pub const SUMMARY_FIELDS: &[FieldMap] = &[
    map("id", "/id", Transform::Copy),
    map("name", "/name", Transform::Copy),
    map("url", "/url", Transform::StripQuery),
    map("has_online_delivery", "/has_online_delivery", Transform::Copy),
    map("cuisines", "/cuisines", Transform::SplitList),
    map("average_cost_for_two", "/average_cost_for_two", Transform::Copy),
    map("phone_numbers", "/phone_numbers", Transform::SplitList),
    map("thumbnail_url", "/thumb", Transform::Copy),
    map("locality", "/location/locality", Transform::Copy),
];

pub const DETAIL_FIELDS: &[FieldMap] = &[
    map("id", "/id", Transform::Copy),
    map("name", "/name", Transform::Copy),
    map("url", "/url", Transform::StripQuery),
    map("has_online_delivery", "/has_online_delivery", Transform::Copy),
    map("cuisines", "/cuisines", Transform::SplitList),
    map("average_cost_for_two", "/average_cost_for_two", Transform::Copy),
    map("phone_numbers", "/phone_numbers", Transform::SplitList),
    map("thumbnail_url", "/featured_image", Transform::Copy),
    map("locality", "/location/locality", Transform::Copy),
    map("address", "/location/address", Transform::Copy),
    map("rating", "/user_rating/aggregate_rating", Transform::Copy),
    map("photos_url", "/photos_url", Transform::Copy),
    map("menu_url", "/menu_url", Transform::Copy),
];

/// Where a reference list lives in its payload and how each entry maps.
pub fn reference_fields(kind: FilterKind) -> (&'static str, &'static [FieldMap]) {
    const CUISINE: &[FieldMap] = &[
        map("id", "/cuisine/cuisine_id", Transform::Copy),
        map("name", "/cuisine/cuisine_name", Transform::Copy),
    ];
    const CATEGORY: &[FieldMap] = &[
        map("id", "/categories/id", Transform::Copy),
        map("name", "/categories/name", Transform::Copy),
    ];
    const TYPE: &[FieldMap] = &[
        map("id", "/establishment/id", Transform::Copy),
        map("name", "/establishment/name", Transform::Copy),
    ];

    match kind {
        FilterKind::Cuisine => ("/cuisines", CUISINE),
        FilterKind::Category => ("/categories", CATEGORY),
        FilterKind::Type => ("/establishments", TYPE),
    }
}

pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn apply(transform: Transform, value: &Value) -> Value {
    match (transform, value) {
        (Transform::StripQuery, Value::String(s)) => Value::String(strip_query(s).to_string()),
        (Transform::SplitList, Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Value::String(part.to_string()))
            .collect(),
        _ => value.clone(),
    }
}

/// Project `record` through `table` and deserialize the result.
pub fn project<T: DeserializeOwned>(record: &Value, table: &[FieldMap]) -> Result<T> {
    let mut object = Map::with_capacity(table.len());
    for entry in table {
        let value = record.pointer(entry.path).ok_or(Error::MissingField {
            field: entry.field,
            path: entry.path,
        })?;
        object.insert(entry.field.to_string(), apply(entry.transform, value));
    }

    Ok(serde_json::from_value(Value::Object(object))?)
}

pub fn summary(record: &Value) -> Result<RestaurantSummary> {
    project(record, SUMMARY_FIELDS)
}

pub fn detail(record: &Value) -> Result<RestaurantDetail> {
    project(record, DETAIL_FIELDS)
}

pub fn reference_items(kind: FilterKind, raw: &Value) -> Result<Vec<ReferenceItem>> {
    let (list_path, table) = reference_fields(kind);
    entries(raw, "items", list_path)?
        .iter()
        .map(|entry| project(entry, table))
        .collect()
}

fn entries<'a>(raw: &'a Value, field: &'static str, path: &'static str) -> Result<&'a Vec<Value>> {
    raw.pointer(path)
        .and_then(Value::as_array)
        .ok_or(Error::MissingField { field, path })
}

fn counter(raw: &Value, field: &'static str, path: &'static str) -> Result<u32> {
    let missing = || Error::MissingField { field, path };
    match raw.pointer(path).ok_or_else(missing)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(missing),
        Value::String(s) => s.trim().parse().map_err(|_| missing()),
        _ => Err(missing()),
    }
}

/// Number of restaurants in this page as reported upstream.
pub fn results_shown(raw: &Value) -> Result<u32> {
    counter(raw, "results_shown", "/results_shown")
}

/// Offset at which this page starts as reported upstream.
pub fn results_start(raw: &Value) -> Result<u32> {
    counter(raw, "results_start", "/results_start")
}

/// Whether another page follows one with `results_shown` entries.
///
/// An empty page means the offset ran past the end. A short page is taken as
/// the last one, which assumes upstream never returns a short page in the
/// middle of a result set.
pub fn has_next(results_shown: u32) -> Result<bool> {
    if results_shown == 0 {
        return Err(Error::NoMoreResults);
    }
    Ok(results_shown == PAGE_SIZE)
}

pub fn has_previous(results_start: u32) -> bool {
    results_start != 0
}

pub fn shape_page(raw: &Value) -> Result<SearchPage> {
    let has_next = has_next(results_shown(raw)?)?;
    let has_previous = has_previous(results_start(raw)?);

    let restaurants = entries(raw, "restaurants", "/restaurants")?
        .iter()
        .map(|item| {
            let record = item.get("restaurant").ok_or(Error::MissingField {
                field: "restaurant",
                path: "/restaurants/*/restaurant",
            })?;
            summary(record)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchPage {
        restaurants,
        has_next,
        has_previous,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn restaurant(id: u32, name: &str) -> Value {
        json!({
            "id": id.to_string(),
            "name": name,
            "url": format!("https://www.zomato.com/new-york-city/{id}?utm_source=api_basic_user&utm_medium=api"),
            "location": {
                "address": "1 Fifth Avenue, New York 10003",
                "locality": "Greenwich Village",
                "city": "New York City"
            },
            "has_online_delivery": 1,
            "cuisines": "Pizza, Italian",
            "average_cost_for_two": 60,
            "phone_numbers": "(212) 995-9559, (212) 228-2930",
            "thumb": format!("https://b.zmtcdn.com/{id}_thumb.jpg"),
            "featured_image": format!("https://b.zmtcdn.com/{id}.jpg"),
            "user_rating": { "aggregate_rating": "4.1", "rating_text": "Very Good" },
            "photos_url": format!("https://www.zomato.com/{id}/photos"),
            "menu_url": format!("https://www.zomato.com/{id}/menu")
        })
    }

    pub fn search_response(start: u32, shown: u32) -> Value {
        let restaurants: Vec<Value> = (0..shown)
            .map(|i| json!({ "restaurant": restaurant(1000 + start + i, "Otto") }))
            .collect();
        json!({
            "results_found": 94,
            "results_start": start,
            "results_shown": shown,
            "restaurants": restaurants
        })
    }
}
