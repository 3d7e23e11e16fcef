//! Catalog entry data structures.

use serde::{Deserialize, Serialize};

/// One sellable catalog entry (a class or a pass).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    /// Unique within one feed
    pub id: i64,

    /// Company name
    pub vendor: String,

    /// Whole currency units
    pub price: i64,

    /// 3-letter currency code
    pub currency: String,

    pub category_id: u32,

    pub picture: String,

    pub url: String,

    /// Display title, length-bounded
    pub name: String,

    /// Full text; may hold newline-separated schedule and marketing copy
    pub description: String,

    /// Length-bounded variant of `description`
    pub short_description: String,
}

/// A feed category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: String,
}
