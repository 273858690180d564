use serde::Deserialize;

use crate::data::{FilterKind, SearchFilter};
use crate::error::{Error, Result};
use crate::pagination::{Navigation, PageCursors};

pub const REVIEW_TEXT_MAX: usize = 2000;
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// The search-results form, as posted by the search and result pages.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub q: String,
    pub filter: Option<SearchFilter>,
    pub nav: Navigation,
}

impl SearchForm {
    /// Build the form from urlencoded pairs. `ids` may repeat and each value
    /// may itself be comma-joined, which is how result pages echo them back.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let mut by = None;
        let mut ids = Vec::new();
        let mut q = String::new();
        let (mut next, mut previous) = (false, false);
        let (mut next_page, mut previous_page) = (None, None);

        for (key, value) in pairs {
            match key.as_str() {
                "by" => by = Some(value.as_str()),
                "ids" | "ids[]" => ids.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string),
                ),
                "search_dish" => q = value.trim().to_string(),
                "next" => next = true,
                "previous" => previous = true,
                "next_page" => next_page = Some(value.as_str()),
                "previous_page" => previous_page = Some(value.as_str()),
                _ => (),
            }
        }

        let filter = match by.and_then(|by| by.parse::<FilterKind>().ok()) {
            Some(kind) if !ids.is_empty() => Some(SearchFilter { kind, values: ids }),
            _ => None,
        };

        let nav = if next || previous {
            let cursors = PageCursors {
                next: cursor("next_page", next_page)?,
                previous: cursor("previous_page", previous_page)?,
            };
            if next {
                Navigation::Next(cursors)
            } else {
                Navigation::Previous(cursors)
            }
        } else {
            Navigation::First
        };

        Ok(Self { q, filter, nav })
    }
}

fn cursor(name: &str, raw: Option<&str>) -> Result<u32> {
    let raw = raw.ok_or_else(|| Error::invalid_form(format!("{name} is required")))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_form(format!("{name} must be a non-negative integer")))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub text: String,
    pub rating: u8,
}

impl ReviewForm {
    /// Check the form, collecting every problem rather than the first.
    pub fn validate(&self) -> std::result::Result<ValidReview, Vec<String>> {
        let mut errors = Vec::new();

        let text = self.text.trim();
        if text.is_empty() {
            errors.push("text: this field is required".to_string());
        } else if text.chars().count() > REVIEW_TEXT_MAX {
            errors.push(format!(
                "text: ensure this value has at most {REVIEW_TEXT_MAX} characters"
            ));
        }

        let rating = self.rating.trim().parse::<u8>().ok().filter(|r| RATING_RANGE.contains(r));
        if rating.is_none() {
            errors.push(format!(
                "rating: select a value between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ));
        }

        match rating {
            Some(rating) if errors.is_empty() => Ok(ValidReview {
                text: text.to_string(),
                rating,
            }),
            _ => Err(errors),
        }
    }
}
