//! Restaurant search over the Zomato API, plus local reviews.

pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod form;
pub mod handler;
pub mod pagination;
pub mod shape;
pub mod zomato;

pub use error::{Error, Result};
