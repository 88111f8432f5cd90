//! Normalization of list and detail response bodies.
//!
//! List endpoints return either a bare array or an envelope such as
//! `{"journals": [...], "total": 40, "page": 2, "pages": 4}`. Detail
//! endpoints return either the record itself or the record wrapped in
//! `{"journal": {...}}`. Both are decoded with untagged enums and
//! flattened into one shape here.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// One page of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total records across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    pub pages: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageWire<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(alias = "journals", alias = "submissions", alias = "data")]
        items: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default, alias = "currentPage")]
        page: Option<u32>,
        #[serde(default, alias = "totalPages")]
        pages: Option<u32>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SingleWire<T> {
    Wrapped {
        #[serde(alias = "journal", alias = "submission", alias = "data")]
        item: T,
    },
    Bare(T),
}

/// Decode a list body in any supported shape.
pub fn parse_page<T: DeserializeOwned>(body: serde_json::Value) -> Result<Page<T>, serde_json::Error> {
    Ok(match serde_json::from_value::<PageWire<T>>(body)? {
        PageWire::Bare(items) => Page {
            total: items.len() as u64,
            page: 1,
            pages: 1,
            items,
        },
        PageWire::Envelope {
            items,
            total,
            page,
            pages,
        } => Page {
            total: total.unwrap_or(items.len() as u64),
            page: page.unwrap_or(1),
            pages: pages.unwrap_or(1),
            items,
        },
    })
}

/// Decode a detail body, bare or wrapped.
pub fn parse_single<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, serde_json::Error> {
    Ok(match serde_json::from_value::<SingleWire<T>>(body)? {
        SingleWire::Wrapped { item } => item,
        SingleWire::Bare(item) => item,
    })
}
