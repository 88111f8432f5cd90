//! Domain types for resolving and saving journal documents.
//!
//! Everything here is pure data: download requests, the ordered
//! candidate list, attempt errors and the final outcome. Network and
//! filesystem work lives in `folio-download`.

pub mod candidates;
pub mod credentials;
pub mod error;
pub mod outcome;
pub mod request;
pub mod types;
