//! Resilient document download resolution.
//!
//! A [`Resolver`](resolver::Resolver) walks the ordered candidate URLs
//! for a request (CDN hint, backend direct-file proxy, REST download,
//! legacy REST download, optional DOCX fallback) and stops at the first
//! one that yields a document. A [`Downloader`](downloader::Downloader)
//! adds persistence and user notices on top.

pub mod config;
pub mod downloader;
pub mod http;
pub mod notify;
pub mod persist;
pub mod resolver;
pub mod transport;
