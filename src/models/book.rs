//! Book (catalog entry) model and related types.
//!
//! The `isbn` is the business key; every lookup goes through it. The surrogate
//! `id` belongs to the store and is only carried so updates can target the
//! right row.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// ISBN-10 or ISBN-13, digits only
static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^([0-9]{10}|[0-9]{13})$").unwrap());

/// Full book model (DB + API).
///
/// `version` is the optimistic-lock token: the store increments it on every
/// successful update and rejects writes carrying a stale value. Timestamps and
/// audit identities are assigned by the catalog service, never by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub publisher: Option<String>,
    #[serde(default)]
    pub version: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
}

/// Client-supplied book fields, used as the POST body and the PUT body.
///
/// System-owned fields (`version`, timestamps, audit identities) are not part
/// of this payload, so clients cannot supply them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(regex(path = *ISBN_PATTERN, message = "ISBN must be 10 or 13 digits"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than zero"))]
    pub price: f64,
    pub publisher: Option<String>,
}
