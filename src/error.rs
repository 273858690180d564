use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No filter kind or filter values came with the search.
    #[error("Select at least one item")]
    NoSearchCriteria,

    /// The requested offset ran past the end of the result set.
    #[error("End of results")]
    NoMoreResults,

    #[error("invalid form: {0}")]
    InvalidForm(String),

    #[error("restaurant api request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("restaurant api answered {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("missing field '{field}' at {path}")]
    MissingField { field: &'static str, path: &'static str },

    #[error("malformed restaurant api payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_form(message: impl Into<String>) -> Self {
        Self::InvalidForm(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(serde::Serialize)]
pub struct ErrJsonResp {
    pub message: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSearchCriteria | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::NoMoreResults => StatusCode::OK,
            Self::Http(_) | Self::ApiStatus { .. } | Self::MissingField { .. } | Self::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::NoMoreResults => HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(self.to_string()),
            _ => HttpResponse::build(self.status_code()).json(ErrJsonResp {
                message: self.to_string(),
            }),
        }
    }
}
