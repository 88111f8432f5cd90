//! REST client for journal and submission metadata.
//!
//! The backend answers list and detail calls in more than one shape;
//! [`page`] normalizes them into typed values before anything else
//! sees them.

pub mod api;
pub mod models;
pub mod page;
