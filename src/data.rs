use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Upstream page size; a full page means there may be more.
pub const PAGE_SIZE: u32 = 20;

/// Dimension that narrows a search. The same three kinds are the reference
/// lists a user picks filter values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Category,
    Cuisine,
    Type,
}

impl FilterKind {
    /// Query parameter of the upstream `/search` endpoint for this kind.
    pub fn search_param(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Cuisine => "cuisines",
            Self::Type => "establishment_type",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Cuisine => "cuisine",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(Self::Category),
            "cuisine" | "cuisines" => Ok(Self::Cuisine),
            "type" | "types" | "establishment" | "establishment_type" => Ok(Self::Type),
            other => Err(format!("unknown filter kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub kind: FilterKind,
    pub values: Vec<String>,
}

impl SearchFilter {
    pub fn new(kind: FilterKind, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            kind,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn joined_values(&self) -> String {
        self.values.join(",")
    }
}

/// A cuisine, category or establishment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceItem {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_online_delivery: bool,
    pub cuisines: Vec<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub average_cost_for_two: u32,
    pub phone_numbers: Vec<String>,
    pub thumbnail_url: String,
    pub locality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub summary: RestaurantSummary,
    pub address: String,
    #[serde(deserialize_with = "lenient::number")]
    pub rating: f64,
    pub photos_url: String,
    pub menu_url: String,
}

/// One page of search results, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub restaurants: Vec<RestaurantSummary>,
    pub has_next: bool,
    pub has_previous: bool,
}

/// The upstream API is loose about scalar types: ids and counters arrive as
/// numbers or numeric strings, flags as `0`/`1` or booleans.
pub(crate) mod lenient {
    use std::{fmt::Display, str::FromStr};

    use serde::{de::Error, Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Value::deserialize(d)? {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => Ok(n.as_f64() != Some(0.0)),
            Value::String(s) => Ok(!matches!(s.trim(), "" | "0" | "false")),
            other => Err(D::Error::custom(format!("expected flag, got {other}"))),
        }
    }

    pub fn number<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let raw = match Value::deserialize(d)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => return Err(D::Error::custom(format!("expected number, got {other}"))),
        };
        raw.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_kind_parse() {
        assert_eq!("category".parse::<FilterKind>(), Ok(FilterKind::Category));
        assert_eq!("cuisines".parse::<FilterKind>(), Ok(FilterKind::Cuisine));
        assert_eq!(" Type ".parse::<FilterKind>(), Ok(FilterKind::Type));
        assert!("dish".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_filter_kind_search_param() {
        assert_eq!(FilterKind::Category.search_param(), "category");
        assert_eq!(FilterKind::Cuisine.search_param(), "cuisines");
        assert_eq!(FilterKind::Type.search_param(), "establishment_type");
    }

    #[test]
    fn test_summary_accepts_loose_scalars() {
        let summary: RestaurantSummary = serde_json::from_value(json!({
            "id": 16774318,
            "name": "Otto Enoteca",
            "url": "https://www.zomato.com/otto",
            "has_online_delivery": 0,
            "cuisines": ["Italian"],
            "average_cost_for_two": "60",
            "phone_numbers": [],
            "thumbnail_url": "",
            "locality": "Greenwich Village"
        }))
        .unwrap();

        assert_eq!(summary.id, "16774318");
        assert!(!summary.has_online_delivery);
        assert_eq!(summary.average_cost_for_two, 60);
    }
}
